//! Common API types and utilities

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;
use utoipa::ToSchema;

use crate::error::PlatformError;

/// Standard API error response
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiError {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Handler result carrying a JSON body or a mapped platform error
pub type ApiResult<T> = std::result::Result<Json<T>, PlatformError>;

/// Success response with optional message
#[derive(Debug, Serialize, ToSchema)]
pub struct SuccessResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
        }
    }
}

/// Created response with the store-assigned ID
#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedResponse {
    pub id: i64,
}

impl CreatedResponse {
    pub fn new(id: i64) -> Self {
        Self { id }
    }
}

impl PlatformError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::Validation { .. } => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            Self::Duplicate { .. } => (StatusCode::CONFLICT, "DUPLICATE_IDENTITY"),
            Self::InvalidCredentials => (StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS"),
            Self::Unauthorized { .. } | Self::TokenExpired | Self::InvalidToken { .. } => {
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED")
            }
            Self::Forbidden { .. } => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            Self::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::InvalidResetToken => (StatusCode::BAD_REQUEST, "INVALID_OR_EXPIRED_TOKEN"),
            Self::Database(_) => (StatusCode::SERVICE_UNAVAILABLE, "STORE_UNAVAILABLE"),
            Self::Configuration { .. } | Self::Internal { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        }
    }
}

impl IntoResponse for PlatformError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        if status.is_server_error() {
            error!(error = %self, "Request failed");
        }

        // Driver details stay in the logs; callers only learn the condition
        // is transient and retryable.
        let message = match &self {
            Self::Database(_) => "Store unavailable, retry later".to_string(),
            other => other.to_string(),
        };

        let body = ApiError {
            error: code.to_string(),
            message,
            details: None,
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_mapping() {
        let cases = [
            (PlatformError::validation("bad input"), 400),
            (PlatformError::duplicate("taken"), 409),
            (PlatformError::InvalidCredentials, 401),
            (PlatformError::TokenExpired, 401),
            (PlatformError::unauthorized("no token"), 401),
            (PlatformError::forbidden("wrong role"), 403),
            (PlatformError::not_found("Actor", "1"), 404),
            (PlatformError::InvalidResetToken, 400),
            (PlatformError::Database(sqlx::Error::PoolTimedOut), 503),
            (PlatformError::internal("boom"), 500),
        ];

        for (err, expected) in cases {
            let response = err.into_response();
            assert_eq!(response.status().as_u16(), expected);
        }
    }

    #[test]
    fn test_retryable_condition() {
        assert!(PlatformError::Database(sqlx::Error::PoolTimedOut).is_retryable());
        assert!(!PlatformError::InvalidCredentials.is_retryable());
    }

    #[test]
    fn test_success_response_serialization() {
        let json = serde_json::to_string(&SuccessResponse::ok()).unwrap();
        assert_eq!(json, r#"{"success":true}"#);

        let json = serde_json::to_string(&SuccessResponse::with_message("done")).unwrap();
        assert!(json.contains("done"));
    }
}
