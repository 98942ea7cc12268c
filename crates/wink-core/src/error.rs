use thiserror::Error;

/// Errors related to the core functionality of the short-link engine.
pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("malformed short code: {0}")]
    MalformedCode(String),
    #[error("invalid obfuscator: {0}")]
    InvalidObfuscator(String),
    #[error("invalid expiration: {0}")]
    InvalidExpiration(String),
}

#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("short code already bound: {0}")]
    Conflict(String),
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("storage operation timed out: {0}")]
    Timeout(String),
    #[error("storage query failed: {0}")]
    Query(String),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
    #[error("storage operation failed: {0}")]
    Operation(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SequencerError {
    #[error("sequence space exhausted")]
    Exhausted,
    #[error("invalid block size {0}; must be greater than zero")]
    InvalidBlockSize(u64),
    #[error("sequence checkpoint failed: {0}")]
    Checkpoint(String),
    #[error("sequencer unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, Error)]
pub enum CacheError {
    #[error("cache backend unavailable: {0}")]
    Unavailable(String),
    #[error("cache operation failed: {0}")]
    Operation(String),
    /// The lookup behind a cache miss failed. Carries the original error.
    #[error("cache loader failed: {0}")]
    Loader(#[from] StorageError),
}
