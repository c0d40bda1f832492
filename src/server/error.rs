//! HTTP error responses.
//!
//! Errors are serialized as `{"success": false, "error": {"code", "message"}}`
//! with the status code implied by [`ErrorCode`]. Generation failures never
//! reach this layer; only authentication, request and configuration errors do.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::ForgeError;

/// Error categories exposed to HTTP clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Missing or unknown bearer token
    Unauthorized,
    /// Request body could not be decoded
    InvalidInput,
    /// Server is missing required configuration
    ConfigurationError,
    /// Anything else
    InternalError,
}

impl ErrorCode {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::InvalidInput => StatusCode::BAD_REQUEST,
            ErrorCode::ConfigurationError | ErrorCode::InternalError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Structured error returned by handlers.
#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    success: bool,
    error: &'a ApiError,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.code.status_code();
        let body = Json(ErrorBody {
            success: false,
            error: &self,
        });
        (status, body).into_response()
    }
}

impl From<ForgeError> for ApiError {
    fn from(err: ForgeError) -> Self {
        match err {
            ForgeError::Configuration(msg) => {
                tracing::error!(error = %msg, "configuration error");
                ApiError::new(ErrorCode::ConfigurationError, msg)
            }
            ForgeError::InvalidInput(msg) => ApiError::invalid_input(msg),
            other => {
                tracing::error!(error = %other, "unexpected error");
                ApiError::new(ErrorCode::InternalError, "internal error")
            }
        }
    }
}
