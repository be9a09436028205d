//! Store error types.

use thiserror::Error;

/// Errors that can occur in the store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// SQLite error.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A stored row could not be decoded.
    #[error("Corrupt row: {0}")]
    CorruptRow(String),
}

impl From<syntrack_core::CoreError> for StoreError {
    fn from(err: syntrack_core::CoreError) -> Self {
        StoreError::Config(err.to_string())
    }
}
