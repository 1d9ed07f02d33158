//! Error types for the host-facing API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::cme::TransformError;
use crate::connector::ConnectorError;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Upstream API failure (502)
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<ConnectorError> for ApiError {
    fn from(err: ConnectorError) -> Self {
        match err {
            ConnectorError::Transform(TransformError::UnknownField(_)) => {
                ApiError::BadRequest(err.to_string())
            }
            ConnectorError::Fetch(_)
            | ConnectorError::UpstreamStatus(_)
            | ConnectorError::Parse(_) => ApiError::Upstream(err.to_string()),
            ConnectorError::Store(_) => ApiError::Internal(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            ApiError::Upstream(msg) => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg),
        };

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connector_error_mapping() {
        let unknown = ApiError::from(ConnectorError::Transform(TransformError::UnknownField(
            "bogus".to_string(),
        )));
        assert!(matches!(unknown, ApiError::BadRequest(ref m) if m.contains("bogus")));

        assert!(matches!(
            ApiError::from(ConnectorError::UpstreamStatus(403)),
            ApiError::Upstream(_)
        ));
        assert!(matches!(
            ApiError::from(ConnectorError::Store(donki_common::Error::Config("x".into()))),
            ApiError::Internal(_)
        ));
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::BadRequest("x".into()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Upstream("x".into()).into_response().status(),
            StatusCode::BAD_GATEWAY
        );
    }
}
