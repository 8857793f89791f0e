//! Record store error types
//!
//! Defines all errors that can occur in the persistence layer.

use thiserror::Error;

/// Errors that can occur in the record store
#[derive(Error, Debug)]
pub enum StoreError {
    /// Underlying database operation failed
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Record does not exist, or is owned by another user
    #[error("{kind} not found with id of {id}")]
    NotFound { kind: &'static str, id: i64 },

    /// Uniqueness constraint violated (duplicate email)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Serialization of a stored column failed (activities JSON, dates)
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O operation failed (data directory creation)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;
