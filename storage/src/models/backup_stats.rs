//! Aggregate statistics for the backup.
//!
//! Returned by BackupRepository::get_stats.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupStats {
    pub total_messages: i64,
    pub total_media: i64,
    /// (media_type, count), most frequent first.
    pub media_by_type: Vec<(String, i64)>,
    pub unique_users: i64,
    pub unique_chats: i64,
    pub first_message: Option<DateTime<Utc>>,
    pub last_message: Option<DateTime<Utc>>,
}
