//! Error types for the channel store.

use thiserror::Error;

/// Main error type for channel store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Consistency violation: {0}")]
    ConsistencyViolation(String),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Deserialization(e.to_string())
    }
}

impl From<chrono::ParseError> for StoreError {
    fn from(e: chrono::ParseError) -> Self {
        StoreError::InvalidTimestamp(e.to_string())
    }
}

/// Result type for channel store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
