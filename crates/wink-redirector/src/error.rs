use thiserror::Error;
use wink_core::{CoreError, StorageError};

pub type Result<T> = std::result::Result<T, RedirectorError>;

#[derive(Debug, Clone, Error)]
pub enum RedirectorError {
    #[error("malformed short code: {0}")]
    MalformedCode(String),
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl From<CoreError> for RedirectorError {
    fn from(value: CoreError) -> Self {
        match value {
            CoreError::MalformedCode(message) => Self::MalformedCode(message),
            other => Self::MalformedCode(other.to_string()),
        }
    }
}
