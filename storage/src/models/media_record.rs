//! Media record model: back-reference from a message to its stored bytes.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct MediaRecord {
    pub message_id: i64,
    pub media_type: String,
    pub file_name: String,
    pub file_path: String,
}
