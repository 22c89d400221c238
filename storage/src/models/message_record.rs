//! Message record model for persistence.
//!
//! Maps to the `messages` table and is used by BackupRepository.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One backed-up message. Created once and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct MessageRecord {
    /// Platform-assigned id, unique across the store.
    pub message_id: i64,
    pub chat_id: i64,
    pub user_id: i64,
    pub username: Option<String>,
    pub full_name: Option<String>,
    /// Absent for pure-media messages.
    pub text: Option<String>,
    pub caption: Option<String>,
    pub date: DateTime<Utc>,
    /// Soft link to another message; never validated.
    pub reply_to_message_id: Option<i64>,
    /// private, group, supergroup or channel.
    pub chat_type: String,
    pub is_group: bool,
}
