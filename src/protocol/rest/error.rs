//! REST API Error Types
//!
//! Provides error types and conversions for the REST API.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::error::EngineError;
use crate::protocol::rest::dto::ApiResponse;

/// API error response
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new("NOT_FOUND", message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new("BAD_REQUEST", message)
    }
}

/// REST API error that can be returned from handlers
#[derive(Debug)]
pub struct RestError {
    pub status: StatusCode,
    pub error: ApiError,
}

impl RestError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            error: ApiError::not_found(message),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error: ApiError::bad_request(message),
        }
    }
}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        let body = ApiResponse::<()>::error(self.error.code, self.error.message);
        (self.status, Json(body)).into_response()
    }
}

// Conversions from domain errors
impl From<EngineError> for RestError {
    fn from(err: EngineError) -> Self {
        let status = match err {
            EngineError::SchemaNotFound { .. } => StatusCode::NOT_FOUND,
            EngineError::EmptyQuery
            | EngineError::UnresolvedTable { .. }
            | EngineError::InvalidParameter { .. } => StatusCode::BAD_REQUEST,
        };
        tracing::warn!(code = err.code(), status = status.as_u16(), "{err}");
        Self {
            status,
            error: ApiError::new(err.code(), err.to_string()),
        }
    }
}

// Malformed or mistyped bodies get the envelope instead of axum's plain text
impl From<JsonRejection> for RestError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::warn!(status = rejection.status().as_u16(), "{rejection}");
        Self::bad_request(format!("Invalid JSON body: {}", rejection.body_text()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_error_status_mapping() {
        assert_eq!(
            RestError::from(EngineError::EmptyQuery).status,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            RestError::from(EngineError::UnresolvedTable { sql: "x".into() }).status,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            RestError::from(EngineError::invalid_parameter("period", "x", &["day"])).status,
            StatusCode::BAD_REQUEST
        );
        let not_found = RestError::from(EngineError::SchemaNotFound { table: "t".into() });
        assert_eq!(not_found.status, StatusCode::NOT_FOUND);
        assert_eq!(not_found.error.code, "SCHEMA_NOT_FOUND");
    }

    #[test]
    fn test_message_is_display_text() {
        let err = RestError::from(EngineError::EmptyQuery);
        assert_eq!(err.error.message, "Query is required");
        assert_eq!(err.error.code, "EMPTY_QUERY");
    }

    #[tokio::test]
    async fn test_error_response_uses_envelope() {
        let response = RestError::not_found("gone").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["success"], false);
        assert!(json.get("data").is_none());
        assert_eq!(json["error"]["code"], "NOT_FOUND");
        assert_eq!(json["error"]["message"], "gone");
    }
}
