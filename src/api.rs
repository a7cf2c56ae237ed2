//! ==============================================================================
//! api.rs - device api routes and handlers
//! ==============================================================================
//!
//! routes:
//!     GET    /                    liveness message
//!     GET    /dashboard           polling html dashboard
//!     POST   /api/devices         store one reading (deviceId required)
//!     GET    /api/devices?limit=N most recent N readings (default 50)
//!     GET    /api/devices/all     every reading
//!     DELETE /api/devices/clear   drop every reading
//!
//! responses are wrapped: `{message, data}` on create, `{count, data}` for
//! recent, `{total, data}` for all. errors are `{error}` with 400 or 500.
//!
//! relationships:
//!     - uses: store (ReadingStore trait object injected through AppState)
//!     - uses: dashboard.rs (page rendered once, served from state)
//!
//! ==============================================================================

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    response::{Html, Json},
    routing::{delete, get},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower_http::cors::CorsLayer;

use crate::config::DashboardConfig;
use crate::dashboard;
use crate::domain::{NewReading, Reading, SensorFields, DEFAULT_RECENT_LIMIT};
use crate::error::ApiError;
use crate::store::ReadingStore;

// ==============================================================================
// shared state
// ==============================================================================
// cloned into every handler. the store is built once in main and shared by
// reference; nothing here is ambient global state.

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ReadingStore>,
    dashboard_html: Arc<str>,
}

impl AppState {
    pub fn new(store: Arc<dyn ReadingStore>, dashboard: &DashboardConfig) -> Self {
        Self {
            store,
            dashboard_html: dashboard::render(dashboard).into(),
        }
    }
}

// ==============================================================================
// response bodies
// ==============================================================================

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub message: &'static str,
    pub data: Reading,
}

#[derive(Debug, Serialize)]
pub struct RecentResponse {
    pub count: usize,
    pub data: Vec<Reading>,
}

#[derive(Debug, Serialize)]
pub struct AllResponse {
    pub total: usize,
    pub data: Vec<Reading>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

// ==============================================================================
// router
// ==============================================================================

pub fn router(state: AppState) -> Router {
    let devices = Router::new()
        .route("/", get(list_recent).post(create_reading))
        .route("/all", get(list_all))
        .route("/clear", delete(clear_readings));

    Router::new()
        .route("/", get(liveness))
        .route("/dashboard", get(dashboard_handler))
        .nest("/api/devices", devices)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ==============================================================================
// handlers
// ==============================================================================

async fn liveness() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Smart Farming Backend",
    })
}

async fn dashboard_handler(State(state): State<AppState>) -> Html<String> {
    Html(state.dashboard_html.to_string())
}

/// unwrap a json request body.
///
/// a request without a json content type is treated as an empty body, so
/// it reaches the handler's own field checks. unparseable json is a 400.
pub(crate) fn json_body(payload: Result<Json<Value>, JsonRejection>) -> Result<Value, ApiError> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(JsonRejection::MissingJsonContentType(_)) => Ok(Value::Null),
        Err(rejection) => {
            tracing::warn!("[API] Rejected request body: {}", rejection.body_text());
            Err(ApiError::BadRequest(ApiError::INVALID_JSON))
        }
    }
}

/// POST /api/devices
async fn create_reading(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    let payload = NewReading::from_body(json_body(payload)?);
    if !payload.has_device_id() {
        return Err(ApiError::BadRequest(ApiError::MISSING_DEVICE_ID));
    }

    let saved = state
        .store
        .append_reading(payload)
        .await
        .map_err(|e| ApiError::from_store("Failed to save sensor data", e))?;
    tracing::debug!("[API] Stored reading {} from {}", saved.id, saved.device_name());

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            message: "Sensor data saved successfully",
            data: saved,
        }),
    ))
}

/// query params for GET /api/devices.
/// kept as a raw string so a non-numeric limit falls back instead of failing
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    limit: Option<String>,
}

/// GET /api/devices?limit=N
async fn list_recent(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<RecentResponse>, ApiError> {
    let limit = parse_limit(params.limit.as_deref());
    let data = state
        .store
        .list_recent(limit)
        .await
        .map_err(|e| ApiError::from_store("Failed to list devices", e))?;

    Ok(Json(RecentResponse {
        count: data.len(),
        data,
    }))
}

/// GET /api/devices/all
async fn list_all(State(state): State<AppState>) -> Result<Json<AllResponse>, ApiError> {
    let data = state
        .store
        .list_all()
        .await
        .map_err(|e| ApiError::from_store("Failed to fetch all devices", e))?;

    Ok(Json(AllResponse {
        total: data.len(),
        data,
    }))
}

/// DELETE /api/devices/clear
async fn clear_readings(State(state): State<AppState>) -> Result<Json<MessageResponse>, ApiError> {
    state
        .store
        .clear_all()
        .await
        .map_err(|e| ApiError::from_store("Failed to clear devices", e))?;
    tracing::info!("[API] All device data cleared");

    Ok(Json(MessageResponse {
        message: "All device data cleared",
    }))
}

/// leading integer of `raw` (so "10", " 10", "10abc" and "10.5" all give 10);
/// absent, non-numeric or non-positive values give the default
fn parse_limit(raw: Option<&str>) -> usize {
    let Some(raw) = raw.map(str::trim) else {
        return DEFAULT_RECENT_LIMIT;
    };
    let digits_end = raw
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || (i == 0 && c == '+')))
        .map(|(i, _)| i)
        .unwrap_or(raw.len());

    match raw[..digits_end].parse::<usize>() {
        Ok(limit) if limit > 0 => limit,
        _ => DEFAULT_RECENT_LIMIT,
    }
}
