//! ==============================================================================
//! predict.rs - irrigation prediction service
//! ==============================================================================
//!
//! ```text
//! purpose:
//!     scores how likely a field needs irrigation from one reading.
//!     dry soil (below 30 %) needs water, more so the hotter it is:
//!
//!         p = 1 + (temperature - 20) / 20    when soilMoisture < 30
//!         p = 0                              otherwise
//!
//!     clipped to [0, 1]. humidity is accepted but does not move the score.
//!     missing or non-numeric measurements count as 0.
//!
//! routes:
//!     GET  /         {"service": "ml-service", "status": "ok"}
//!     POST /predict  object -> {"irrigation_probability": p}
//!                    array  -> [{"irrigation_probability": p}, ...]
//!
//! relationships:
//!     - uses: domain.rs (SensorFields for lenient field access)
//!     - uses: api.rs (json_body, shared request body handling)
//!     - served by: src/bin/ml.rs
//!
//! ```
//! ==============================================================================

use axum::{
    extract::rejection::JsonRejection,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Serialize;
use serde_json::Value;
use tower_http::cors::CorsLayer;

use crate::api::json_body;
use crate::domain::{NewReading, SensorFields};
use crate::error::ApiError;

const NO_JSON_BODY: &str = "no json body";
const INVALID_PAYLOAD: &str = "invalid payload";

/// soil moisture (%) below which the field counts as dry
const DRY_SOIL_THRESHOLD: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Prediction {
    pub irrigation_probability: f64,
}

#[derive(Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PredictResponse {
    One(Prediction),
    Many(Vec<Prediction>),
}

#[derive(Debug, Serialize)]
pub struct ServiceStatus {
    pub service: &'static str,
    pub status: &'static str,
}

/// irrigation probability in [0, 1] for one reading
pub fn irrigation_probability(reading: &impl SensorFields) -> f64 {
    let soil = reading.soil_moisture().unwrap_or(0.0);
    let temperature = reading.temperature().unwrap_or(0.0);

    if soil < DRY_SOIL_THRESHOLD {
        (1.0 + (temperature - 20.0) / 20.0).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

pub fn predict_one(reading: &impl SensorFields) -> Prediction {
    Prediction {
        irrigation_probability: irrigation_probability(reading),
    }
}

/// score a request body: one object, or an array of objects
pub fn predict_body(body: Value) -> Result<PredictResponse, ApiError> {
    if !has_content(&body) {
        return Err(ApiError::BadRequest(NO_JSON_BODY));
    }

    match body {
        Value::Object(_) => Ok(PredictResponse::One(predict_one(&NewReading::from_body(body)))),
        Value::Array(samples) => samples
            .into_iter()
            .map(|sample| match sample {
                Value::Object(_) => Ok(predict_one(&NewReading::from_body(sample))),
                _ => Err(ApiError::BadRequest(INVALID_PAYLOAD)),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(PredictResponse::Many),
        _ => Err(ApiError::BadRequest(INVALID_PAYLOAD)),
    }
}

/// false for null, false, 0, "", [] and {}
fn has_content(body: &Value) -> bool {
    match body {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}

// ==============================================================================
// router
// ==============================================================================

pub fn router() -> Router {
    Router::new()
        .route("/", get(status))
        .route("/predict", post(predict))
        .layer(CorsLayer::permissive())
}

async fn status() -> Json<ServiceStatus> {
    Json(ServiceStatus {
        service: "ml-service",
        status: "ok",
    })
}

/// POST /predict
async fn predict(
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<PredictResponse>, ApiError> {
    let response = predict_body(json_body(payload)?)?;
    if let PredictResponse::Many(predictions) = &response {
        tracing::debug!("[ML] Scored {} samples", predictions.len());
    }
    Ok(Json(response))
}
