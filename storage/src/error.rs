//! Storage error types.
//!
//! Used by repository implementations and callers of storage APIs.

use thiserror::Error;

/// Errors that can occur when using storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    /// A row with this message id is already stored (unique constraint).
    #[error("Already exists: message {0}")]
    Duplicate(i64),
}

impl StorageError {
    pub fn is_duplicate(&self) -> bool {
        matches!(self, StorageError::Duplicate(_))
    }
}
