//! Store Errors
//!
//! Error types for read queries against the platform store.

use std::time::Duration;

/// Errors that can occur while querying the store.
///
/// Every variant means the store could not answer; callers treat them all
/// as "store unavailable" and never receive partial data.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Query did not finish within the configured bound
    #[error("Store query '{operation}' timed out after {}ms", after.as_millis())]
    Timeout {
        operation: &'static str,
        after: Duration,
    },

    /// Store refused or dropped the request
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// Row could not be mapped to a domain type
    #[error("Invalid store data: {0}")]
    InvalidData(String),
}

impl StoreError {
    /// Check if this error is a timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self, StoreError::Timeout { .. })
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;
