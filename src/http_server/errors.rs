//! # API Errors
//!
//! Errors surfaced to HTTP callers. Every body is `{"error": <message>}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::assistant::AssistantError;

/// Result type for handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// Handler errors
#[derive(Debug, Error)]
pub enum ApiError {
    // ==================
    // Client Errors (4xx)
    // ==================
    /// Chat request without a usable `message`
    #[error("No message provided")]
    MissingMessage,

    // ==================
    // Server Errors (5xx)
    // ==================
    /// Completion provider failed, for any reason
    #[error("Failed to get response from AI: {0}")]
    Upstream(#[from] AssistantError),
}

impl ApiError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingMessage => StatusCode::BAD_REQUEST,
            ApiError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl From<&ApiError> for ErrorResponse {
    fn from(err: &ApiError) -> Self {
        Self {
            error: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ErrorResponse::from(&self));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::MissingMessage.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::from(AssistantError::EmptyResponse).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_messages() {
        assert_eq!(ApiError::MissingMessage.to_string(), "No message provided");
        assert_eq!(
            ApiError::from(AssistantError::Blocked("SAFETY".into())).to_string(),
            "Failed to get response from AI: prompt blocked: SAFETY"
        );
    }
}
