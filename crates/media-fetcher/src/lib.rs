//! # media-fetcher
//!
//! Streams remote attachment bytes into local files.
//!
//! - [`MediaFetcher`] is the seam used by the backup coordinator.
//! - [`HttpMediaFetcher`] streams over HTTP in fixed-size chunks into a `.part` file and renames it
//!   onto the destination only when the transfer completed.
//! - [`LocatorResolver`] turns platform file ids into download URLs (Telegram `getFile`).
//! - [`FileGuard`] removes a file on drop unless kept; this is what cleans up after failures and
//!   cancelled fetches.

mod error;
mod guard;
mod http;

use std::path::{Path, PathBuf};

use archiver_core::RemoteLocator;
use async_trait::async_trait;
use reqwest::Url;

pub use error::FetchError;
pub use guard::FileGuard;
pub use http::{
    HttpMediaFetcher, DEFAULT_CHUNK_SIZE, DEFAULT_CONNECT_TIMEOUT, DEFAULT_STALL_TIMEOUT,
    DEFAULT_TIMEOUT,
};

/// Fetches the bytes behind a remote locator into `destination`.
///
/// On success exactly one file exists at `destination` and its path is returned.
/// On failure nothing is left at `destination` and no partial file remains.
#[async_trait]
pub trait MediaFetcher: Send + Sync {
    async fn fetch(
        &self,
        locator: &RemoteLocator,
        destination: &Path,
    ) -> Result<PathBuf, FetchError>;
}

/// Resolves a platform file id to a download URL.
#[async_trait]
pub trait LocatorResolver: Send + Sync {
    async fn resolve(&self, file_id: &str) -> Result<Url, FetchError>;
}
