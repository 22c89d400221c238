use async_trait::async_trait;

use crate::error::StorageError;
use crate::models::{MediaRecord, MessageRecord};

/// Persistence seam for the backup pipeline.
#[async_trait]
pub trait BackupStore: Send + Sync {
    /// Inserts the message and, when given, its media row in one transaction.
    /// Returns [`StorageError::Duplicate`] when `message.message_id` is already stored;
    /// in that case nothing from this call is persisted.
    async fn insert_message_and_media(
        &self,
        message: &MessageRecord,
        media: Option<&MediaRecord>,
    ) -> Result<(), StorageError>;

    async fn message_exists(&self, message_id: i64) -> Result<bool, StorageError>;

    /// File name of the media row stored for `message_id`, if any.
    async fn stored_media_file_name(
        &self,
        message_id: i64,
    ) -> Result<Option<String>, StorageError>;
}
