//! HTTP streaming fetcher.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use archiver_core::RemoteLocator;
use async_trait::async_trait;
use futures::TryStreamExt;
use reqwest::{Client, Url};
use tokio::fs::{self, File};
use tokio::io::{AsyncReadExt, AsyncWriteExt, BufWriter};
use tokio_util::io::StreamReader;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::error::FetchError;
use crate::guard::FileGuard;
use crate::{LocatorResolver, MediaFetcher};

/// Bytes read from the body per iteration.
pub const DEFAULT_CHUNK_SIZE: usize = 1024;
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
/// Upper bound for a whole transfer.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);
/// Longest wait for the next chunk before the transfer is considered stalled.
pub const DEFAULT_STALL_TIMEOUT: Duration = Duration::from_secs(30);

/// Streams bodies over HTTP into local files.
#[derive(Clone)]
pub struct HttpMediaFetcher {
    client: Client,
    resolver: Option<Arc<dyn LocatorResolver>>,
    chunk_size: usize,
    stall_timeout: Duration,
}

impl Default for HttpMediaFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpMediaFetcher {
    /// Fetcher with default timeouts and no resolver (URL locators only).
    pub fn new() -> Self {
        Self::with_timeouts(DEFAULT_TIMEOUT, DEFAULT_STALL_TIMEOUT)
    }

    /// Builds the client with the given overall and per-chunk timeouts.
    ///
    /// Falls back to the default client if the builder fails.
    pub fn with_timeouts(timeout: Duration, stall_timeout: Duration) -> Self {
        let client = Client::builder()
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client,
            resolver: None,
            chunk_size: DEFAULT_CHUNK_SIZE,
            stall_timeout,
        }
    }

    /// Sets the resolver used for [`RemoteLocator::PlatformFile`] locators.
    pub fn with_resolver(mut self, resolver: Arc<dyn LocatorResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    async fn resolve(&self, locator: &RemoteLocator) -> Result<Url, FetchError> {
        match locator {
            RemoteLocator::Url(url) => {
                Url::parse(url).map_err(|e| FetchError::InvalidUrl(format!("{}: {}", url, e)))
            }
            RemoteLocator::PlatformFile(file_id) => match &self.resolver {
                Some(resolver) => resolver.resolve(file_id).await,
                None => Err(FetchError::Unresolvable(file_id.clone())),
            },
        }
    }

    /// Streams the body of `url` into `path` and returns the number of bytes written.
    async fn stream_to(&self, url: Url, path: &Path) -> Result<u64, FetchError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        let expected = response.content_length();

        let body = response
            .bytes_stream()
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e.without_url()));
        let mut reader = StreamReader::new(Box::pin(body));
        let mut writer = BufWriter::new(File::create(path).await?);
        let mut buf = vec![0u8; self.chunk_size];
        let mut received: u64 = 0;

        loop {
            let n = match tokio::time::timeout(self.stall_timeout, reader.read(&mut buf)).await {
                Ok(read) => read?,
                Err(_) => return Err(FetchError::Stalled(self.stall_timeout)),
            };
            if n == 0 {
                break;
            }
            writer.write_all(&buf[..n]).await?;
            received += n as u64;
        }

        writer.flush().await?;
        writer.into_inner().sync_all().await?;

        if let Some(expected) = expected {
            if expected != received {
                return Err(FetchError::Incomplete { expected, received });
            }
        }

        Ok(received)
    }
}

/// Unique sibling path the body is streamed into before the final rename.
fn part_path_for(destination: &Path) -> PathBuf {
    let file_name = destination
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "download".to_string());
    destination.with_file_name(format!("{}.{}.part", file_name, Uuid::new_v4().simple()))
}

#[async_trait]
impl MediaFetcher for HttpMediaFetcher {
    #[instrument(skip(self, locator, destination), fields(locator = %locator, destination = %destination.display()))]
    async fn fetch(
        &self,
        locator: &RemoteLocator,
        destination: &Path,
    ) -> Result<PathBuf, FetchError> {
        let url = self.resolve(locator).await?;

        if let Some(parent) = destination.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let part = FileGuard::new(part_path_for(destination));
        debug!(part = %part.path().display(), "step: streaming media");

        let bytes = match self.stream_to(url, part.path()).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(error = %e, "Media transfer failed, discarding partial file");
                return Err(e);
            }
        };

        fs::rename(part.path(), destination).await?;
        part.keep();

        info!(bytes, "step: media stored");
        Ok(destination.to_path_buf())
    }
}
