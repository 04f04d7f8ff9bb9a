//! Application error handling
//!
//! Two classes of failure leave this API. Domain errors (duplicate
//! username, unknown id) are part of the endpoint contract: they travel
//! as HTTP 200 with a JSON `{"error": ...}` body, and callers inspect the
//! body rather than the status code. Boundary errors (malformed input,
//! store failures) map to a plain-text response with a real HTTP status.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use exercise_tracker_shared::types::ErrorResponse;
use thiserror::Error;
use tracing::error;

/// API error type that can be converted to HTTP responses
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Name already exists.")]
    DuplicateUser,

    #[error("ID not found")]
    UserNotFound,

    #[error("{0}")]
    Validation(String),

    #[error("Database error")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::DuplicateUser | ApiError::UserNotFound => {
                let body = Json(ErrorResponse {
                    error: self.to_string(),
                });
                (StatusCode::OK, body).into_response()
            }
            ApiError::Validation(message) => {
                (StatusCode::BAD_REQUEST, message).into_response()
            }
            ApiError::Database(err) => {
                error!("Store error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
                    .into_response()
            }
            ApiError::Internal(err) => {
                error!("Internal error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
                    .into_response()
            }
        }
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
