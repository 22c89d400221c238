//! Chat identity type for inbound events.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ArchiverError;

/// Kind of chat the event was posted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatType {
    Private,
    Group,
    Supergroup,
    Channel,
}

impl ChatType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatType::Private => "private",
            ChatType::Group => "group",
            ChatType::Supergroup => "supergroup",
            ChatType::Channel => "channel",
        }
    }

    /// True for basic groups and supergroups.
    pub fn is_group(&self) -> bool {
        matches!(self, ChatType::Group | ChatType::Supergroup)
    }
}

impl fmt::Display for ChatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChatType {
    type Err = ArchiverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "private" => Ok(ChatType::Private),
            "group" => Ok(ChatType::Group),
            "supergroup" => Ok(ChatType::Supergroup),
            "channel" => Ok(ChatType::Channel),
            other => Err(ArchiverError::UnknownChatType(other.to_string())),
        }
    }
}

/// Chat (private, group or channel) identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chat {
    pub id: i64,
    #[serde(rename = "type")]
    pub chat_type: ChatType,
}
