//! Backup coordinator: map -> fetch -> persist for one event.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use archiver_core::{InboundEvent, MediaDescriptor};
use media_fetcher::{FetchError, FileGuard, MediaFetcher};
use storage::{BackupStore, MediaRecord, StorageError};
use tokio::time::Instant;
use tracing::{debug, error, info, instrument, warn};

use crate::error::ProcessingError;
use crate::mapper::map_event;

/// What happened to the media part of an event.
#[derive(Debug)]
pub enum MediaOutcome {
    /// The event carried no attachment.
    None,
    /// Bytes stored at this path and a media row committed.
    Stored(PathBuf),
    /// Fetch failed; the message was committed without media.
    Failed(FetchError),
}

/// Result of a successful `process` call.
#[derive(Debug)]
pub enum BackupOutcome {
    Saved { message_id: i64, media: MediaOutcome },
    /// A message with this id was already stored; nothing new was written.
    AlreadyBackedUp { message_id: i64 },
}

/// Runs `fut`, failing with [`ProcessingError::DeadlineExceeded`] once `limit` passes.
async fn bounded<F: Future>(
    limit: Option<(Instant, Duration)>,
    fut: F,
) -> Result<F::Output, ProcessingError> {
    match limit {
        Some((at, deadline)) => tokio::time::timeout_at(at, fut)
            .await
            .map_err(|_| ProcessingError::DeadlineExceeded(deadline)),
        None => Ok(fut.await),
    }
}

/// Local file name for a media item: `{message_id}_{file_id}`.
///
/// Characters outside `[A-Za-z0-9_-]` in the file id are replaced with `_` so the name stays a
/// single path component.
pub fn media_file_name(message_id: i64, file_id: &str) -> String {
    let safe: String = file_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("{}_{}", message_id, safe)
}

/// Runs the backup of one event against an injected store and fetcher.
///
/// Cheap to share across tasks behind an `Arc`; each `process` call uses its own transaction.
pub struct BackupCoordinator {
    store: Arc<dyn BackupStore>,
    fetcher: Arc<dyn MediaFetcher>,
    backup_dir: PathBuf,
}

impl BackupCoordinator {
    pub fn new(
        store: Arc<dyn BackupStore>,
        fetcher: Arc<dyn MediaFetcher>,
        backup_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            store,
            fetcher,
            backup_dir: backup_dir.into(),
        }
    }

    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    /// Creates the backup directory if it does not exist.
    pub async fn ensure_backup_dir(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.backup_dir).await
    }

    /// Backs up one event. Safe to call again with the same event.
    ///
    /// - Mapping failures return [`ProcessingError::Mapping`]; nothing is written.
    /// - Fetch failures are logged and the message is stored alone.
    /// - Store failures return [`ProcessingError::Persistence`] and the fetched file is removed,
    ///   except for duplicate message ids, which are reported as [`BackupOutcome::AlreadyBackedUp`].
    pub async fn process(&self, event: &InboundEvent) -> Result<BackupOutcome, ProcessingError> {
        self.process_until(event, None).await
    }

    /// [`Self::process`] bounded by `deadline`.
    ///
    /// The deadline covers the existence check and the fetch. A commit that has started always
    /// runs to completion, so a committed media row never loses its file to cancellation.
    /// On expiry before the commit, any partial or uncommitted media file is removed.
    pub async fn process_with_deadline(
        &self,
        event: &InboundEvent,
        deadline: Duration,
    ) -> Result<BackupOutcome, ProcessingError> {
        let result = self
            .process_until(event, Some((Instant::now() + deadline, deadline)))
            .await;
        if let Err(ProcessingError::DeadlineExceeded(_)) = &result {
            error!(message_id = ?event.message_id, deadline = ?deadline, "Event processing exceeded deadline");
        }
        result
    }

    #[instrument(skip(self, event, limit), fields(message_id = ?event.message_id))]
    async fn process_until(
        &self,
        event: &InboundEvent,
        limit: Option<(Instant, Duration)>,
    ) -> Result<BackupOutcome, ProcessingError> {
        let (message, descriptor) = map_event(event).map_err(|e| {
            warn!(error = %e, "Dropping event that cannot be mapped");
            e
        })?;
        let message_id = message.message_id;

        let exists = bounded(limit, self.store.message_exists(message_id))
            .await?
            .map_err(|e| {
                error!(error = %e, message_id, "Failed to check for existing message");
                e
            })?;
        if exists {
            info!(message_id, "step: message already backed up, skipping");
            return Ok(BackupOutcome::AlreadyBackedUp { message_id });
        }

        let (fetched, media_failure) = match &descriptor {
            Some(descriptor) => {
                match bounded(limit, self.fetch_media(message_id, descriptor)).await? {
                    Ok(fetched) => (Some(fetched), None),
                    Err(e) => {
                        warn!(
                            error = %e,
                            message_id,
                            media_type = %descriptor.kind,
                            "Media fetch failed, storing message without media"
                        );
                        (None, Some(e))
                    }
                }
            }
            None => (None, None),
        };

        if let Some((at, deadline)) = limit {
            if Instant::now() >= at {
                return Err(ProcessingError::DeadlineExceeded(deadline));
            }
        }

        let committed = self
            .store
            .insert_message_and_media(&message, fetched.as_ref().map(|(record, _)| record))
            .await;
        match committed {
            Ok(()) => {}
            Err(StorageError::Duplicate(_)) => {
                if let Some((record, guard)) = fetched {
                    self.settle_duplicate_file(message_id, &record.file_name, guard)
                        .await;
                }
                info!(message_id, "step: concurrent duplicate, already backed up");
                return Ok(BackupOutcome::AlreadyBackedUp { message_id });
            }
            Err(e) => {
                error!(error = %e, message_id, "Failed to persist message, abandoning event");
                return Err(e.into());
            }
        }

        let media = match (fetched, media_failure) {
            (Some((_, guard)), _) => MediaOutcome::Stored(guard.keep()),
            (None, Some(e)) => MediaOutcome::Failed(e),
            (None, None) => MediaOutcome::None,
        };

        info!(
            message_id,
            chat_id = message.chat_id,
            media = ?media,
            "step: message backed up"
        );
        Ok(BackupOutcome::Saved { message_id, media })
    }

    /// After losing a commit race, keeps our fetched file only when the winner's media row names
    /// the same file (it was renamed over the winner's copy). Otherwise the guard removes it.
    async fn settle_duplicate_file(&self, message_id: i64, file_name: &str, guard: FileGuard) {
        match self.store.stored_media_file_name(message_id).await {
            Ok(Some(stored)) if stored == file_name => {
                guard.keep();
            }
            Ok(_) => {
                debug!(message_id, file_name, "step: removing media not referenced by stored row");
            }
            Err(e) => {
                // The file may be the one the stored row points at.
                warn!(error = %e, message_id, file_name, "Could not look up stored media, keeping file");
                guard.keep();
            }
        }
    }

    /// Fetches the media item and returns its record plus a guard that deletes the file unless
    /// the commit succeeds.
    async fn fetch_media(
        &self,
        message_id: i64,
        descriptor: &MediaDescriptor,
    ) -> Result<(MediaRecord, FileGuard), FetchError> {
        let file_name = media_file_name(message_id, &descriptor.file_id);
        let destination = self.backup_dir.join(&file_name);

        info!(
            message_id,
            media_type = %descriptor.kind,
            file_name = %file_name,
            "step: fetching media"
        );

        let stored = self
            .fetcher
            .fetch(&descriptor.remote_locator, &destination)
            .await?;
        let guard = FileGuard::new(&stored);

        let record = MediaRecord {
            message_id,
            media_type: descriptor.kind.as_str().to_string(),
            file_name,
            file_path: stored.to_string_lossy().into_owned(),
        };
        Ok((record, guard))
    }
}
