//! Core error types for Syntrack.

use thiserror::Error;

/// Core error type for Syntrack operations.
///
/// Analytics never fails on degenerate input (empty series, zero elapsed
/// time); those cases are returned as values. This type only covers bad
/// configuration and unparseable data.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Invalid data, e.g. an unparseable week key or time zone.
    #[error("Invalid data: {0}")]
    InvalidData(String),
}
