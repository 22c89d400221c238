//! Error types surfaced by the backup pipeline.

use std::time::Duration;

use storage::StorageError;
use thiserror::Error;

/// The event lacks a field needed to build a message record; it is dropped unpersisted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MappingError {
    #[error("event is missing required field `{0}`")]
    MissingField(&'static str),
}

/// Failure of one `process` call. Fetch failures are not listed: they degrade to a
/// message-only backup and are reported through [`crate::MediaOutcome::Failed`].
#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("Mapping error: {0}")]
    Mapping(#[from] MappingError),

    #[error("Persistence error: {0}")]
    Persistence(#[from] StorageError),

    #[error("Processing exceeded deadline of {0:?}")]
    DeadlineExceeded(Duration),
}
