//! Integration tests for [`storage::BackupRepository`].
//!
//! Covers transactional insert, duplicate detection, lookups and stats using a file-backed SQLite
//! database in a temp dir.

use chrono::{TimeZone, Utc};
use storage::{BackupRepository, BackupStore, MediaRecord, MessageRecord, StorageError};
use tempfile::TempDir;

async fn open_repo(dir: &TempDir) -> BackupRepository {
    let path = dir.path().join("backup.db");
    BackupRepository::new(path.to_str().unwrap())
        .await
        .expect("Failed to create repository")
}

fn message(message_id: i64, chat_id: i64, user_id: i64, day: u32) -> MessageRecord {
    MessageRecord {
        message_id,
        chat_id,
        user_id,
        username: Some("ann".to_string()),
        full_name: Some("Ann Lee".to_string()),
        text: Some(format!("message {}", message_id)),
        caption: None,
        date: Utc.with_ymd_and_hms(2024, 1, day, 8, 30, 0).unwrap(),
        reply_to_message_id: None,
        chat_type: "group".to_string(),
        is_group: true,
    }
}

fn media(message_id: i64, media_type: &str) -> MediaRecord {
    let file_name = format!("{}_file", message_id);
    MediaRecord {
        message_id,
        media_type: media_type.to_string(),
        file_path: format!("/backup/{}", file_name),
        file_name,
    }
}

/// **Test: Message and media are stored together and read back unchanged.**
///
/// **Setup:** Empty DB.
/// **Action:** `insert_message_and_media` with a media row, then `get_message` / `get_media`.
/// **Expected:** Both rows exist with the inserted values.
#[tokio::test]
async fn test_insert_message_with_media() {
    let dir = TempDir::new().unwrap();
    let repo = open_repo(&dir).await;

    let msg = MessageRecord {
        reply_to_message_id: Some(41),
        caption: Some("look".to_string()),
        text: None,
        ..message(42, -100, 7, 3)
    };
    let med = media(42, "photo");

    repo.insert_message_and_media(&msg, Some(&med))
        .await
        .expect("Failed to save message");

    let stored = repo.get_message(42).await.unwrap().expect("message row");
    assert_eq!(stored, msg);
    let stored_media = repo.get_media(42).await.unwrap().expect("media row");
    assert_eq!(stored_media, med);
}

/// **Test: Reply target does not need to exist.**
///
/// **Setup:** Empty DB.
/// **Action:** Insert a message replying to an id that was never stored.
/// **Expected:** Insert succeeds; the soft link is kept.
#[tokio::test]
async fn test_reply_to_unknown_message_is_accepted() {
    let dir = TempDir::new().unwrap();
    let repo = open_repo(&dir).await;

    let msg = MessageRecord {
        reply_to_message_id: Some(123_456),
        ..message(1, 1, 1, 1)
    };
    repo.insert_message_and_media(&msg, None).await.unwrap();

    let stored = repo.get_message(1).await.unwrap().unwrap();
    assert_eq!(stored.reply_to_message_id, Some(123_456));
}

/// **Test: Second insert of the same message id is rejected as a duplicate.**
///
/// **Setup:** One stored message.
/// **Action:** Insert a different record with the same `message_id` plus a media row.
/// **Expected:** `StorageError::Duplicate`; still one message row and no media row.
#[tokio::test]
async fn test_duplicate_message_id_is_rejected() {
    let dir = TempDir::new().unwrap();
    let repo = open_repo(&dir).await;

    repo.insert_message_and_media(&message(9, 1, 1, 1), None)
        .await
        .unwrap();

    let err = repo
        .insert_message_and_media(&message(9, 2, 2, 2), Some(&media(9, "video")))
        .await
        .unwrap_err();

    assert!(matches!(err, StorageError::Duplicate(9)));
    assert!(err.is_duplicate());
    assert_eq!(repo.count_messages().await.unwrap(), 1);
    assert_eq!(repo.count_media().await.unwrap(), 0);
    assert_eq!(repo.get_message(9).await.unwrap().unwrap().chat_id, 1);
}

/// **Test: message_exists reflects stored rows.**
#[tokio::test]
async fn test_message_exists() {
    let dir = TempDir::new().unwrap();
    let repo = open_repo(&dir).await;

    assert!(!repo.message_exists(5).await.unwrap());
    repo.insert_message_and_media(&message(5, 1, 1, 1), None)
        .await
        .unwrap();
    assert!(repo.message_exists(5).await.unwrap());
}

/// **Test: stored_media_file_name returns the committed media row's file name only.**
#[tokio::test]
async fn test_stored_media_file_name() {
    let dir = TempDir::new().unwrap();
    let repo = open_repo(&dir).await;

    repo.insert_message_and_media(&message(6, 1, 1, 1), Some(&media(6, "photo")))
        .await
        .unwrap();
    repo.insert_message_and_media(&message(7, 1, 1, 1), None)
        .await
        .unwrap();

    let expected = repo.get_media(6).await.unwrap().unwrap().file_name;
    assert_eq!(
        repo.stored_media_file_name(6).await.unwrap(),
        Some(expected)
    );
    assert_eq!(repo.stored_media_file_name(7).await.unwrap(), None);
    assert_eq!(repo.stored_media_file_name(8).await.unwrap(), None);
}

/// **Test: Data survives reopening the database file.**
#[tokio::test]
async fn test_reopen_keeps_rows() {
    let dir = TempDir::new().unwrap();
    {
        let repo = open_repo(&dir).await;
        repo.insert_message_and_media(&message(3, 1, 1, 1), Some(&media(3, "voice")))
            .await
            .unwrap();
    }

    let repo = open_repo(&dir).await;
    assert!(repo.message_exists(3).await.unwrap());
    assert_eq!(repo.get_media(3).await.unwrap().unwrap().media_type, "voice");
}

/// **Test: Stats aggregate over all stored rows.**
///
/// **Setup:** Four messages across two chats and three users, three with media.
/// **Action:** `get_stats()`.
/// **Expected:** Counts, media grouping and date range match.
#[tokio::test]
async fn test_get_stats() {
    let dir = TempDir::new().unwrap();
    let repo = open_repo(&dir).await;

    repo.insert_message_and_media(&message(1, 100, 1, 5), Some(&media(1, "photo")))
        .await
        .unwrap();
    repo.insert_message_and_media(&message(2, 100, 2, 2), Some(&media(2, "photo")))
        .await
        .unwrap();
    repo.insert_message_and_media(&message(3, 200, 3, 9), Some(&media(3, "sticker")))
        .await
        .unwrap();
    repo.insert_message_and_media(&message(4, 200, 3, 7), None)
        .await
        .unwrap();

    let stats = repo.get_stats().await.unwrap();

    assert_eq!(stats.total_messages, 4);
    assert_eq!(stats.total_media, 3);
    assert_eq!(
        stats.media_by_type,
        vec![("photo".to_string(), 2), ("sticker".to_string(), 1)]
    );
    assert_eq!(stats.unique_chats, 2);
    assert_eq!(stats.unique_users, 3);
    assert_eq!(
        stats.first_message,
        Some(Utc.with_ymd_and_hms(2024, 1, 2, 8, 30, 0).unwrap())
    );
    assert_eq!(
        stats.last_message,
        Some(Utc.with_ymd_and_hms(2024, 1, 9, 8, 30, 0).unwrap())
    );
}

/// **Test: Stats on an empty store.**
#[tokio::test]
async fn test_get_stats_empty() {
    let dir = TempDir::new().unwrap();
    let repo = open_repo(&dir).await;

    let stats = repo.get_stats().await.unwrap();

    assert_eq!(stats.total_messages, 0);
    assert_eq!(stats.total_media, 0);
    assert!(stats.media_by_type.is_empty());
    assert!(stats.first_message.is_none());
    assert!(stats.last_message.is_none());
}
