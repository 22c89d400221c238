//! Record mapper: inbound event -> message record + optional media descriptor.

use archiver_core::{Attachments, InboundEvent, MediaDescriptor, MediaKind};
use storage::MessageRecord;

use crate::error::MappingError;

/// Picks the single attachment to back up, following [`MediaKind::PRIORITY`].
///
/// For photos the highest-resolution variant is used.
pub fn classify_attachment(attachments: &Attachments) -> Option<MediaDescriptor> {
    MediaKind::PRIORITY.into_iter().find_map(|kind| {
        attachments.get(kind).map(|file| MediaDescriptor {
            kind,
            file_id: file.file_id.clone(),
            remote_locator: file.locator(),
        })
    })
}

/// Maps an event to the record that will be stored and the media item to fetch, if any.
///
/// Fails when `message_id`, `chat_id`, `user_id` or `date` is missing.
pub fn map_event(
    event: &InboundEvent,
) -> Result<(MessageRecord, Option<MediaDescriptor>), MappingError> {
    let message_id = event
        .message_id
        .ok_or(MappingError::MissingField("message_id"))?;
    let chat = event
        .chat
        .as_ref()
        .ok_or(MappingError::MissingField("chat_id"))?;
    let user = event
        .from
        .as_ref()
        .ok_or(MappingError::MissingField("user_id"))?;
    let date = event.date.ok_or(MappingError::MissingField("date"))?;

    let record = MessageRecord {
        message_id,
        chat_id: chat.id,
        user_id: user.id,
        username: user.username.clone(),
        full_name: user.full_name(),
        text: event.text.clone(),
        caption: event.caption.clone(),
        date,
        reply_to_message_id: event.reply_to_message_id,
        chat_type: chat.chat_type.as_str().to_string(),
        is_group: chat.chat_type.is_group(),
    };

    Ok((record, classify_attachment(&event.attachments)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use archiver_core::{Chat, ChatType, FileRef, PhotoSize, RemoteLocator, User};
    use chrono::{TimeZone, Utc};

    fn file(id: &str) -> FileRef {
        FileRef {
            file_id: id.to_string(),
            file_unique_id: None,
            file_size: None,
            url: None,
        }
    }

    fn event() -> InboundEvent {
        InboundEvent {
            message_id: Some(100),
            date: Some(Utc.with_ymd_and_hms(2024, 2, 1, 9, 0, 0).unwrap()),
            from: Some(User {
                id: 7,
                username: Some("ann".to_string()),
                first_name: Some("Ann".to_string()),
                last_name: Some("Lee".to_string()),
            }),
            chat: Some(Chat {
                id: -42,
                chat_type: ChatType::Supergroup,
            }),
            text: Some("hello".to_string()),
            caption: None,
            reply_to_message_id: Some(99),
            attachments: Attachments::default(),
        }
    }

    #[test]
    fn test_maps_fields_verbatim() {
        let (record, media) = map_event(&event()).unwrap();

        assert_eq!(record.message_id, 100);
        assert_eq!(record.chat_id, -42);
        assert_eq!(record.user_id, 7);
        assert_eq!(record.username.as_deref(), Some("ann"));
        assert_eq!(record.full_name.as_deref(), Some("Ann Lee"));
        assert_eq!(record.text.as_deref(), Some("hello"));
        assert_eq!(record.reply_to_message_id, Some(99));
        assert_eq!(record.chat_type, "supergroup");
        assert!(record.is_group);
        assert!(media.is_none());
    }

    #[test]
    fn test_is_group_false_for_private_and_channel() {
        for chat_type in [ChatType::Private, ChatType::Channel] {
            let mut e = event();
            e.chat = Some(Chat { id: 1, chat_type });
            let (record, _) = map_event(&e).unwrap();
            assert!(!record.is_group);
        }
    }

    #[test]
    fn test_missing_identity_fields_fail() {
        let mut e = event();
        e.message_id = None;
        assert_eq!(
            map_event(&e).unwrap_err(),
            MappingError::MissingField("message_id")
        );

        let mut e = event();
        e.chat = None;
        assert_eq!(map_event(&e).unwrap_err(), MappingError::MissingField("chat_id"));

        let mut e = event();
        e.from = None;
        assert_eq!(map_event(&e).unwrap_err(), MappingError::MissingField("user_id"));

        let mut e = event();
        e.date = None;
        assert_eq!(map_event(&e).unwrap_err(), MappingError::MissingField("date"));
    }

    #[test]
    fn test_pure_media_message_has_no_text() {
        let mut e = event();
        e.text = None;
        e.caption = Some("sunset".to_string());
        e.attachments.video = Some(file("vid"));

        let (record, media) = map_event(&e).unwrap();

        assert!(record.text.is_none());
        assert_eq!(record.caption.as_deref(), Some("sunset"));
        let media = media.unwrap();
        assert_eq!(media.kind, MediaKind::Video);
        assert_eq!(media.file_id, "vid");
        assert_eq!(
            media.remote_locator,
            RemoteLocator::PlatformFile("vid".to_string())
        );
    }

    #[test]
    fn test_photo_wins_over_document() {
        let attachments = Attachments {
            photo: vec![PhotoSize {
                file: file("pic"),
                width: 10,
                height: 10,
            }],
            document: Some(file("doc")),
            ..Default::default()
        };

        let media = classify_attachment(&attachments).unwrap();

        assert_eq!(media.kind, MediaKind::Photo);
        assert_eq!(media.file_id, "pic");
    }

    #[test]
    fn test_priority_order_below_photo() {
        let attachments = Attachments {
            sticker: Some(file("stk")),
            animation: Some(file("gif")),
            audio: Some(file("aud")),
            voice: Some(file("voc")),
            ..Default::default()
        };
        assert_eq!(
            classify_attachment(&attachments).unwrap().kind,
            MediaKind::Voice
        );

        let attachments = Attachments {
            sticker: Some(file("stk")),
            animation: Some(file("gif")),
            ..Default::default()
        };
        assert_eq!(
            classify_attachment(&attachments).unwrap().kind,
            MediaKind::Animation
        );
    }

    #[test]
    fn test_photo_selects_highest_resolution() {
        let attachments = Attachments {
            photo: vec![
                PhotoSize {
                    file: file("small"),
                    width: 90,
                    height: 90,
                },
                PhotoSize {
                    file: file("big"),
                    width: 1280,
                    height: 1280,
                },
                PhotoSize {
                    file: file("mid"),
                    width: 320,
                    height: 320,
                },
            ],
            ..Default::default()
        };

        assert_eq!(classify_attachment(&attachments).unwrap().file_id, "big");
    }
}
