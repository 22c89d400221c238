//! Handlers run by the chain for every inbound event.

use archiver_core::{Handler, HandlerResponse, InboundEvent, Result};
use async_trait::async_trait;
use backup::{BackupCoordinator, BackupOutcome, MediaOutcome};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, instrument};

/// Logs a one-line summary of each received event in before().
#[derive(Clone, Default)]
pub struct LoggingHandler;

impl LoggingHandler {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Handler for LoggingHandler {
    async fn before(&self, event: &InboundEvent) -> Result<bool> {
        info!(
            message_id = ?event.message_id,
            chat_id = ?event.chat.as_ref().map(|c| c.id),
            user_id = ?event.from.as_ref().map(|u| u.id),
            has_text = event.text.is_some(),
            has_media = !event.attachments.is_empty(),
            "Received message"
        );
        Ok(true)
    }
}

/// Backs up each event through the coordinator, bounded by a per-event deadline.
///
/// Processing errors are logged and never propagated: one bad event must not stop the chain.
#[derive(Clone)]
pub struct BackupHandler {
    coordinator: Arc<BackupCoordinator>,
    deadline: Duration,
}

impl BackupHandler {
    pub fn new(coordinator: Arc<BackupCoordinator>, deadline: Duration) -> Self {
        Self {
            coordinator,
            deadline,
        }
    }
}

#[async_trait]
impl Handler for BackupHandler {
    #[instrument(skip(self, event), fields(message_id = ?event.message_id))]
    async fn handle(&self, event: &InboundEvent) -> Result<HandlerResponse> {
        match self
            .coordinator
            .process_with_deadline(event, self.deadline)
            .await
        {
            Ok(BackupOutcome::Saved { message_id, media }) => {
                let media = match &media {
                    MediaOutcome::None => "none",
                    MediaOutcome::Stored(_) => "stored",
                    MediaOutcome::Failed(_) => "failed",
                };
                info!(message_id, media = %media, "step: BackupHandler saved");
            }
            Ok(BackupOutcome::AlreadyBackedUp { message_id }) => {
                info!(message_id, "step: BackupHandler skipped duplicate");
            }
            Err(e) => {
                error!(error = %e, "Backup failed for event");
            }
        }
        Ok(HandlerResponse::Continue)
    }
}
