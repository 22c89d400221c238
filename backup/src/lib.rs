//! # backup
//!
//! The ingestion-and-backup pipeline for one inbound event:
//!
//! - [`mapper`] turns an [`archiver_core::InboundEvent`] into a [`storage::MessageRecord`] and an
//!   optional [`archiver_core::MediaDescriptor`].
//! - [`coordinator`] runs map, fetch and persist, owns the per-event transaction and decides which
//!   failures are fatal and which degrade to a message-only backup.

pub mod coordinator;
pub mod error;
pub mod mapper;

pub use coordinator::{media_file_name, BackupCoordinator, BackupOutcome, MediaOutcome};
pub use error::{MappingError, ProcessingError};
pub use mapper::{classify_attachment, map_event};
