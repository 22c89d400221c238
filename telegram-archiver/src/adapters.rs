//! Converts teloxide messages into transport-agnostic [`InboundEvent`]s.

use archiver_core::{
    Attachments, Chat, ChatType, FileRef, InboundEvent, PhotoSize, ToInboundEvent, User,
};
use teloxide::types::FileMeta;

/// Telegram user to core user.
pub struct TelegramUserWrapper<'a>(pub &'a teloxide::types::User);

impl<'a> TelegramUserWrapper<'a> {
    pub fn to_core(&self) -> User {
        User {
            id: self.0.id.0 as i64,
            username: self.0.username.clone(),
            first_name: Some(self.0.first_name.clone()),
            last_name: self.0.last_name.clone(),
        }
    }
}

/// Telegram message to inbound event.
pub struct TelegramMessageWrapper<'a>(pub &'a teloxide::types::Message);

fn file_ref(meta: &FileMeta) -> FileRef {
    FileRef {
        file_id: meta.id.0.clone(),
        file_unique_id: Some(meta.unique_id.0.clone()),
        file_size: Some(u64::from(meta.size)),
        url: None,
    }
}

impl<'a> TelegramMessageWrapper<'a> {
    fn chat_type(&self) -> ChatType {
        let chat = &self.0.chat;
        if chat.is_supergroup() {
            ChatType::Supergroup
        } else if chat.is_group() {
            ChatType::Group
        } else if chat.is_channel() {
            ChatType::Channel
        } else {
            ChatType::Private
        }
    }

    fn attachments(&self) -> Attachments {
        let msg = self.0;
        Attachments {
            photo: msg
                .photo()
                .map(|sizes| {
                    sizes
                        .iter()
                        .map(|p| PhotoSize {
                            file: file_ref(&p.file),
                            width: p.width,
                            height: p.height,
                        })
                        .collect()
                })
                .unwrap_or_default(),
            video: msg.video().map(|v| file_ref(&v.file)),
            document: msg.document().map(|d| file_ref(&d.file)),
            voice: msg.voice().map(|v| file_ref(&v.file)),
            audio: msg.audio().map(|a| file_ref(&a.file)),
            animation: msg.animation().map(|a| file_ref(&a.file)),
            sticker: msg.sticker().map(|s| file_ref(&s.file)),
        }
    }
}

impl<'a> ToInboundEvent for TelegramMessageWrapper<'a> {
    fn to_event(&self) -> InboundEvent {
        let msg = self.0;
        InboundEvent {
            message_id: Some(i64::from(msg.id.0)),
            date: Some(msg.date),
            from: msg.from.as_ref().map(|u| TelegramUserWrapper(u).to_core()),
            chat: Some(Chat {
                id: msg.chat.id.0,
                chat_type: self.chat_type(),
            }),
            text: msg.text().map(str::to_string),
            caption: msg.caption().map(str::to_string),
            reply_to_message_id: msg.reply_to_message().map(|r| i64::from(r.id.0)),
            attachments: self.attachments(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use archiver_core::MediaKind;

    fn message(json: &str) -> teloxide::types::Message {
        serde_json::from_str(json).expect("Failed to parse Bot API message")
    }

    #[test]
    fn test_telegram_user_wrapper_to_core() {
        let user = teloxide::types::User {
            id: teloxide::types::UserId(123),
            is_bot: false,
            first_name: "Test".to_string(),
            last_name: Some("User".to_string()),
            username: Some("testuser".to_string()),
            language_code: Some("en".to_string()),
            is_premium: false,
            added_to_attachment_menu: false,
        };

        let core_user = TelegramUserWrapper(&user).to_core();

        assert_eq!(core_user.id, 123);
        assert_eq!(core_user.username, Some("testuser".to_string()));
        assert_eq!(core_user.full_name().as_deref(), Some("Test User"));
    }

    #[test]
    fn test_text_message_in_supergroup() {
        let msg = message(
            r#"{
                "message_id": 42,
                "date": 1706529600,
                "chat": {"id": -1001234, "type": "supergroup", "title": "Backup"},
                "from": {"id": 7, "is_bot": false, "first_name": "Ann", "username": "ann"},
                "text": "hello"
            }"#,
        );

        let event = TelegramMessageWrapper(&msg).to_event();

        assert_eq!(event.message_id, Some(42));
        assert_eq!(event.date.unwrap().timestamp(), 1706529600);
        let chat = event.chat.unwrap();
        assert_eq!(chat.id, -1001234);
        assert_eq!(chat.chat_type, ChatType::Supergroup);
        assert_eq!(event.from.unwrap().id, 7);
        assert_eq!(event.text.as_deref(), Some("hello"));
        assert!(event.attachments.is_empty());
    }

    #[test]
    fn test_photo_message_keeps_all_sizes_and_caption() {
        let msg = message(
            r#"{
                "message_id": 43,
                "date": 1706529600,
                "chat": {"id": 7, "type": "private", "first_name": "Ann"},
                "from": {"id": 7, "is_bot": false, "first_name": "Ann"},
                "photo": [
                    {"file_id": "small", "file_unique_id": "u1", "width": 90, "height": 60, "file_size": 1200},
                    {"file_id": "large", "file_unique_id": "u2", "width": 1280, "height": 853, "file_size": 98000}
                ],
                "caption": "sunset"
            }"#,
        );

        let event = TelegramMessageWrapper(&msg).to_event();

        assert_eq!(event.chat.unwrap().chat_type, ChatType::Private);
        assert!(event.text.is_none());
        assert_eq!(event.caption.as_deref(), Some("sunset"));
        assert_eq!(event.attachments.photo.len(), 2);
        assert_eq!(
            event.attachments.best_photo().unwrap().file.file_id,
            "large"
        );
    }

    #[test]
    fn test_document_reply_in_group() {
        let msg = message(
            r#"{
                "message_id": 44,
                "date": 1706529600,
                "chat": {"id": -55, "type": "group", "title": "Team"},
                "from": {"id": 8, "is_bot": false, "first_name": "Bo"},
                "document": {"file_id": "doc-1", "file_unique_id": "ud", "file_name": "a.pdf", "file_size": 10},
                "reply_to_message": {
                    "message_id": 40,
                    "date": 1706529500,
                    "chat": {"id": -55, "type": "group", "title": "Team"},
                    "from": {"id": 9, "is_bot": false, "first_name": "Cy"},
                    "text": "send it"
                }
            }"#,
        );

        let event = TelegramMessageWrapper(&msg).to_event();

        assert_eq!(event.chat.as_ref().unwrap().chat_type, ChatType::Group);
        assert_eq!(event.reply_to_message_id, Some(40));
        let doc = event.attachments.get(MediaKind::Document).unwrap();
        assert_eq!(doc.file_id, "doc-1");
        assert_eq!(doc.file_size, Some(10));
        assert!(doc.url.is_none());
    }
}
