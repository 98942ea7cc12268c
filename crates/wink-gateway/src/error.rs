use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::{error, warn};
use wink_redirector::RedirectorError;
use wink_shortener::ShortenerError;

use crate::model::ErrorResponse;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("malformed short code: {0}")]
    MalformedCode(String),
    #[error("short code not found")]
    NotFound,
    #[error("service unavailable: {0}")]
    Unavailable(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<ShortenerError> for AppError {
    fn from(error: ShortenerError) -> Self {
        match error {
            ShortenerError::InvalidUrl(message) => AppError::InvalidUrl(message),
            ShortenerError::InvalidExpiration(message) => AppError::InvalidRequest(message),
            ShortenerError::Unavailable(message) => AppError::Unavailable(message),
            other @ (ShortenerError::Conflict(_) | ShortenerError::Storage(_)) => {
                AppError::Internal(other.to_string())
            }
        }
    }
}

impl From<RedirectorError> for AppError {
    fn from(error: RedirectorError) -> Self {
        match error {
            RedirectorError::MalformedCode(message) => AppError::MalformedCode(message),
            RedirectorError::Storage(source) => AppError::Internal(source.to_string()),
        }
    }
}

fn with_message(status: StatusCode, message: String) -> Response {
    (status, Json(ErrorResponse { error: message })).into_response()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::InvalidUrl(message) | AppError::InvalidRequest(message) => {
                with_message(StatusCode::BAD_REQUEST, message)
            }
            // Resolve misses answer with an empty body so callers never
            // mistake it for a redirect target.
            AppError::MalformedCode(_) => StatusCode::BAD_REQUEST.into_response(),
            AppError::NotFound => StatusCode::NOT_FOUND.into_response(),
            AppError::Unavailable(message) => {
                warn!(error = %message, "id allocation unavailable");
                with_message(StatusCode::SERVICE_UNAVAILABLE, message)
            }
            AppError::Internal(message) => {
                error!(error = %message, "request failed");
                with_message(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        }
    }
}
