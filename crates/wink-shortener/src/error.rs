use thiserror::Error;
use wink_core::{CoreError, SequencerError, StorageError};

pub type Result<T> = std::result::Result<T, ShortenerError>;

#[derive(Debug, Clone, Error)]
pub enum ShortenerError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("invalid expiration: {0}")]
    InvalidExpiration(String),
    #[error("short code conflict: {0}")]
    Conflict(String),
    #[error("id allocation unavailable: {0}")]
    Unavailable(String),
    #[error("storage error: {0}")]
    Storage(String),
}

impl From<StorageError> for ShortenerError {
    fn from(value: StorageError) -> Self {
        match value {
            StorageError::Conflict(code) => Self::Conflict(code),
            other => Self::Storage(other.to_string()),
        }
    }
}

impl From<SequencerError> for ShortenerError {
    fn from(value: SequencerError) -> Self {
        Self::Unavailable(value.to_string())
    }
}

impl From<CoreError> for ShortenerError {
    fn from(value: CoreError) -> Self {
        match value {
            CoreError::InvalidExpiration(message) => Self::InvalidExpiration(message),
            other => Self::Storage(other.to_string()),
        }
    }
}
