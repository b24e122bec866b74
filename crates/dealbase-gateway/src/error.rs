//! Error handling for the gateway.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use dealbase_proto::error_codes;

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    /// Bad request.
    BadRequest(String),
    /// Input rejected by validation.
    Validation(String),
    /// Referenced id does not exist.
    NotFound(String),
    /// Delete blocked by dependent rows.
    Conflict(String),
    /// Communication with the record service failed.
    Upstream(String),
    /// Internal gateway error.
    Internal(String),
}

/// Error response body.
#[derive(Serialize)]
pub struct ErrorResponse {
    /// Error flag.
    pub error: bool,
    /// Error code.
    pub code: String,
    /// Error message.
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            AppError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION", msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg),
            AppError::Upstream(msg) => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg),
        };

        let body = ErrorResponse {
            error: true,
            code: code.to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

impl From<dealbase_client::Error> for AppError {
    fn from(err: dealbase_client::Error) -> Self {
        match err {
            dealbase_client::Error::Server { code, message } => match code {
                error_codes::VALIDATION => AppError::Validation(message),
                error_codes::NOT_FOUND => AppError::NotFound(message),
                error_codes::CONFLICT => AppError::Conflict(message),
                error_codes::INVALID_REQUEST => AppError::BadRequest(message),
                _ => AppError::Upstream(message),
            },
            other => AppError::Upstream(other.to_string()),
        }
    }
}
