//! Backup repository: transactional persistence of messages and their media rows.
//!
//! Uses SqlitePoolManager and the models (MessageRecord, MediaRecord, BackupStats).
//! External: SQLite via sqlx; the backup coordinator writes through [`BackupStore`].

use async_trait::async_trait;
use tracing::{debug, info, instrument};

use crate::error::StorageError;
use crate::models::{BackupStats, MediaRecord, MessageRecord};
use crate::repository::BackupStore;
use crate::sqlite_pool::SqlitePoolManager;

const MESSAGE_COLUMNS: &str = "message_id, chat_id, user_id, username, full_name, text, caption, \
     date, reply_to_message_id, chat_type, is_group";

#[derive(Clone)]
pub struct BackupRepository {
    pool_manager: SqlitePoolManager,
}

impl BackupRepository {
    /// Opens (or creates) the database and ensures the schema exists.
    pub async fn new(database_url: &str) -> Result<Self, StorageError> {
        let pool_manager = SqlitePoolManager::new(database_url).await?;
        let repo = Self { pool_manager };
        repo.init().await?;
        Ok(repo)
    }

    async fn init(&self) -> Result<(), StorageError> {
        info!("Creating database tables if not exist");

        let pool = self.pool_manager.pool();

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS messages (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                message_id INTEGER NOT NULL UNIQUE,
                chat_id INTEGER NOT NULL,
                user_id INTEGER NOT NULL,
                username TEXT,
                full_name TEXT,
                text TEXT,
                caption TEXT,
                date TEXT NOT NULL,
                reply_to_message_id INTEGER,
                chat_type TEXT NOT NULL,
                is_group INTEGER NOT NULL DEFAULT 0
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS media (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                message_id INTEGER NOT NULL UNIQUE REFERENCES messages(message_id),
                media_type TEXT NOT NULL,
                file_name TEXT NOT NULL,
                file_path TEXT NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_messages_chat_id ON messages(chat_id);
            CREATE INDEX IF NOT EXISTS idx_messages_user_id ON messages(user_id);
            CREATE INDEX IF NOT EXISTS idx_messages_date ON messages(date);
            CREATE INDEX IF NOT EXISTS idx_media_media_type ON media(media_type);
            "#,
        )
        .execute(pool)
        .await?;

        info!("Database tables created successfully");
        Ok(())
    }

    pub async fn get_message(&self, message_id: i64) -> Result<Option<MessageRecord>, StorageError> {
        let sql = format!("SELECT {MESSAGE_COLUMNS} FROM messages WHERE message_id = ?");
        let message = sqlx::query_as::<_, MessageRecord>(&sql)
            .bind(message_id)
            .fetch_optional(self.pool_manager.pool())
            .await?;
        Ok(message)
    }

    pub async fn get_media(&self, message_id: i64) -> Result<Option<MediaRecord>, StorageError> {
        let media = sqlx::query_as::<_, MediaRecord>(
            "SELECT message_id, media_type, file_name, file_path FROM media WHERE message_id = ?",
        )
        .bind(message_id)
        .fetch_optional(self.pool_manager.pool())
        .await?;
        Ok(media)
    }

    pub async fn count_messages(&self) -> Result<i64, StorageError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM messages")
            .fetch_one(self.pool_manager.pool())
            .await?;
        Ok(count)
    }

    pub async fn count_media(&self) -> Result<i64, StorageError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM media")
            .fetch_one(self.pool_manager.pool())
            .await?;
        Ok(count)
    }

    pub async fn get_stats(&self) -> Result<BackupStats, StorageError> {
        let pool = self.pool_manager.pool();

        let total_messages = self.count_messages().await?;
        let total_media = self.count_media().await?;

        let media_by_type: Vec<(String, i64)> = sqlx::query_as(
            "SELECT media_type, COUNT(*) AS n FROM media GROUP BY media_type ORDER BY n DESC, media_type",
        )
        .fetch_all(pool)
        .await?;

        let (unique_users,): (i64,) =
            sqlx::query_as("SELECT COUNT(DISTINCT user_id) FROM messages")
                .fetch_one(pool)
                .await?;

        let (unique_chats,): (i64,) =
            sqlx::query_as("SELECT COUNT(DISTINCT chat_id) FROM messages")
                .fetch_one(pool)
                .await?;

        let (first_message, last_message): (Option<String>, Option<String>) =
            sqlx::query_as("SELECT MIN(date), MAX(date) FROM messages")
                .fetch_one(pool)
                .await?;

        Ok(BackupStats {
            total_messages,
            total_media,
            media_by_type,
            unique_users,
            unique_chats,
            first_message: first_message.as_deref().and_then(parse_stored_date),
            last_message: last_message.as_deref().and_then(parse_stored_date),
        })
    }
}

pub(crate) fn parse_stored_date(s: &str) -> Option<chrono::DateTime<chrono::Utc>> {
    chrono::DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|d| d.with_timezone(&chrono::Utc))
}

/// Maps a unique-constraint violation to [`StorageError::Duplicate`].
fn map_insert_error(err: sqlx::Error, message_id: i64) -> StorageError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            StorageError::Duplicate(message_id)
        }
        _ => StorageError::Database(err),
    }
}

#[async_trait]
impl BackupStore for BackupRepository {
    #[instrument(skip(self, message, media), fields(message_id = message.message_id))]
    async fn insert_message_and_media(
        &self,
        message: &MessageRecord,
        media: Option<&MediaRecord>,
    ) -> Result<(), StorageError> {
        let mut tx = self.pool_manager.pool().begin().await?;

        sqlx::query(
            r#"
            INSERT INTO messages (message_id, chat_id, user_id, username, full_name, text, caption, date, reply_to_message_id, chat_type, is_group)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(message.message_id)
        .bind(message.chat_id)
        .bind(message.user_id)
        .bind(&message.username)
        .bind(&message.full_name)
        .bind(&message.text)
        .bind(&message.caption)
        .bind(message.date)
        .bind(message.reply_to_message_id)
        .bind(&message.chat_type)
        .bind(message.is_group)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_insert_error(e, message.message_id))?;

        if let Some(media) = media {
            sqlx::query(
                r#"
                INSERT INTO media (message_id, media_type, file_name, file_path)
                VALUES (?, ?, ?, ?)
                "#,
            )
            .bind(media.message_id)
            .bind(&media.media_type)
            .bind(&media.file_name)
            .bind(&media.file_path)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_insert_error(e, message.message_id))?;
        }

        tx.commit().await?;

        debug!(
            message_id = message.message_id,
            chat_id = message.chat_id,
            has_media = media.is_some(),
            "Saved message"
        );
        Ok(())
    }

    async fn message_exists(&self, message_id: i64) -> Result<bool, StorageError> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM messages WHERE message_id = ?")
                .bind(message_id)
                .fetch_one(self.pool_manager.pool())
                .await?;
        Ok(count > 0)
    }

    async fn stored_media_file_name(
        &self,
        message_id: i64,
    ) -> Result<Option<String>, StorageError> {
        let name: Option<(String,)> =
            sqlx::query_as("SELECT file_name FROM media WHERE message_id = ?")
                .bind(message_id)
                .fetch_optional(self.pool_manager.pool())
                .await?;
        Ok(name.map(|(n,)| n))
    }
}
