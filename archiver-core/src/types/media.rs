//! Attachment metadata carried by inbound events and the uniform descriptor produced from it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ArchiverError;

/// Media kinds that can be backed up, one per message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Photo,
    Video,
    Document,
    Voice,
    Audio,
    Animation,
    Sticker,
}

impl MediaKind {
    /// Classification order: the first kind present on an event wins.
    pub const PRIORITY: [MediaKind; 7] = [
        MediaKind::Photo,
        MediaKind::Video,
        MediaKind::Document,
        MediaKind::Voice,
        MediaKind::Audio,
        MediaKind::Animation,
        MediaKind::Sticker,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Photo => "photo",
            MediaKind::Video => "video",
            MediaKind::Document => "document",
            MediaKind::Voice => "voice",
            MediaKind::Audio => "audio",
            MediaKind::Animation => "animation",
            MediaKind::Sticker => "sticker",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaKind {
    type Err = ArchiverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MediaKind::PRIORITY
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ArchiverError::UnknownMediaKind(s.to_string()))
    }
}

/// Where attachment bytes can be streamed from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum RemoteLocator {
    /// Direct download URL.
    Url(String),
    /// Platform file id that must be resolved to a URL first (Telegram `getFile`).
    PlatformFile(String),
}

impl fmt::Display for RemoteLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteLocator::Url(url) => write!(f, "url:{}", url),
            RemoteLocator::PlatformFile(id) => write!(f, "file_id:{}", id),
        }
    }
}

/// A remote file attached to an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRef {
    pub file_id: String,
    #[serde(default)]
    pub file_unique_id: Option<String>,
    #[serde(default)]
    pub file_size: Option<u64>,
    /// Direct download URL; when absent the file id is resolved through the platform.
    #[serde(default)]
    pub url: Option<String>,
}

impl FileRef {
    pub fn locator(&self) -> RemoteLocator {
        match &self.url {
            Some(url) => RemoteLocator::Url(url.clone()),
            None => RemoteLocator::PlatformFile(self.file_id.clone()),
        }
    }
}

/// One resolution of a photo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoSize {
    #[serde(flatten)]
    pub file: FileRef,
    pub width: u32,
    pub height: u32,
}

/// Attachment slots of an event. Platforms normally fill at most one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachments {
    /// All offered resolutions of a photo.
    #[serde(default)]
    pub photo: Vec<PhotoSize>,
    #[serde(default)]
    pub video: Option<FileRef>,
    #[serde(default)]
    pub document: Option<FileRef>,
    #[serde(default)]
    pub voice: Option<FileRef>,
    #[serde(default)]
    pub audio: Option<FileRef>,
    #[serde(default)]
    pub animation: Option<FileRef>,
    #[serde(default)]
    pub sticker: Option<FileRef>,
}

impl Attachments {
    /// Highest-resolution photo variant. Ties on area go to the larger file, then to the later entry.
    pub fn best_photo(&self) -> Option<&PhotoSize> {
        self.photo.iter().max_by_key(|p| {
            (
                u64::from(p.width) * u64::from(p.height),
                p.file.file_size.unwrap_or(0),
            )
        })
    }

    /// File for the given kind; for photos this is the best variant.
    pub fn get(&self, kind: MediaKind) -> Option<&FileRef> {
        match kind {
            MediaKind::Photo => self.best_photo().map(|p| &p.file),
            MediaKind::Video => self.video.as_ref(),
            MediaKind::Document => self.document.as_ref(),
            MediaKind::Voice => self.voice.as_ref(),
            MediaKind::Audio => self.audio.as_ref(),
            MediaKind::Animation => self.animation.as_ref(),
            MediaKind::Sticker => self.sticker.as_ref(),
        }
    }

    pub fn is_empty(&self) -> bool {
        MediaKind::PRIORITY.iter().all(|k| self.get(*k).is_none())
    }
}

/// Uniform description of the single media item selected from an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaDescriptor {
    pub kind: MediaKind,
    /// Remote file identifier; part of the local file name.
    pub file_id: String,
    pub remote_locator: RemoteLocator,
}
