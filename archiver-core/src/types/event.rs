//! Inbound event: one message-like occurrence delivered by a transport.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{chat::Chat, media::Attachments, user::User};

/// Raw event as delivered by the transport. Identity fields are optional here because
/// transports may hand over incomplete events; the record mapper rejects those.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundEvent {
    #[serde(default)]
    pub message_id: Option<i64>,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub from: Option<User>,
    #[serde(default)]
    pub chat: Option<Chat>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub reply_to_message_id: Option<i64>,
    #[serde(default)]
    pub attachments: Attachments,
}

/// Converts a transport-specific message into an [`InboundEvent`].
pub trait ToInboundEvent: Send + Sync {
    fn to_event(&self) -> InboundEvent;
}
