//! Fetch error types.
//!
//! Messages never include resolved download URLs, which can embed credentials.

use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("No resolver configured for platform file {0}")]
    Unresolvable(String),

    #[error("Failed to resolve file {file_id}: {reason}")]
    Resolve { file_id: String, reason: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Request failed: {0}")]
    Request(reqwest::Error),

    #[error("Unexpected HTTP status {0}")]
    Status(u16),

    #[error("Transfer stalled for {0:?}")]
    Stalled(Duration),

    #[error("Incomplete body: expected {expected} bytes, received {received}")]
    Incomplete { expected: u64, received: u64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Request(err.without_url())
    }
}
