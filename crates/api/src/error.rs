//! HTTP error mapping

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use inference_engine::InferenceError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors surfaced to API clients
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Engine {0} not found")]
    EngineNotFound(u32),

    #[error("System unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid engine id: {0:?}, expected a positive integer")]
    InvalidEngineId(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// JSON error body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub detail: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::EngineNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::InvalidEngineId(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::EngineNotFound(_) => "engine_not_found",
            ApiError::Unavailable(_) => "system_unavailable",
            ApiError::InvalidEngineId(_) => "invalid_engine_id",
            ApiError::Internal(_) => "internal_error",
        }
    }
}

impl From<InferenceError> for ApiError {
    fn from(err: InferenceError) -> Self {
        match err {
            InferenceError::EngineNotFound(id) => ApiError::EngineNotFound(id),
            InferenceError::SystemUnavailable(reason) => ApiError::Unavailable(reason),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.code().to_string(),
            detail: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
