//! Error types for the book loans server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Caller-facing messages for client errors
pub const MISSING_BODY: &str = "Missing request body";
pub const INVALID_BODY: &str = "Invalid request body";
pub const BODY_TOO_LARGE: &str = "Request body too large";
pub const MISSING_OPERATION: &str = "Missing operation";
pub const INVALID_OPERATION: &str = "Invalid operation";
pub const MISSING_FIELD: &str = "Missing required field";

/// Fault raised by a storage backend
#[derive(Error, Debug)]
pub enum StorageError {
    #[error(transparent)]
    Redis(#[from] redis::RedisError),
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl AppError {
    pub fn bad_request(message: &str) -> Self {
        AppError::BadRequest(message.to_string())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

impl From<&AppError> for ErrorResponse {
    fn from(err: &AppError) -> Self {
        // Storage faults are reported verbatim.
        Self {
            error: err.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::Storage(e) = &self {
            tracing::error!("Storage error: {:?}", e);
        }

        (self.status_code(), Json(ErrorResponse::from(&self))).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

/// Result type alias for storage backends
pub type StorageResult<T> = Result<T, StorageError>;
