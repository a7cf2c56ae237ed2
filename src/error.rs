//! store and api error types.
//!
//! store failures never leak to http callers: handlers wrap them in
//! `ApiError::Internal` with a fixed message, and the underlying error is
//! only logged.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use thiserror::Error;

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("reading has no deviceId")]
    MissingDeviceId,
}

pub type StoreResult<T> = Result<T, StoreError>;

/// errors returned by the http handlers
#[derive(Debug)]
pub enum ApiError {
    /// 400 with `{"error": msg}`
    BadRequest(&'static str),
    /// 500 with `{"error": context}`; `source` is logged, never returned
    Internal {
        context: &'static str,
        source: StoreError,
    },
}

impl ApiError {
    pub const MISSING_DEVICE_ID: &'static str = "Missing deviceId";
    pub const INVALID_JSON: &'static str = "Invalid JSON body";

    /// map a store failure for the handler described by `context`
    pub fn from_store(context: &'static str, source: StoreError) -> Self {
        match source {
            StoreError::MissingDeviceId => ApiError::BadRequest(Self::MISSING_DEVICE_ID),
            source => ApiError::Internal { context, source },
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::Internal { context, source } => {
                tracing::error!(error = %source, "[API] {}", context);
                context
            }
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_device_id_maps_to_bad_request() {
        let err = ApiError::from_store("Failed to save sensor data", StoreError::MissingDeviceId);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_internal_error_hides_source() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "db.json is read-only");
        let response = ApiError::from_store("Failed to list devices", io.into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value, serde_json::json!({"error": "Failed to list devices"}));
    }
}
