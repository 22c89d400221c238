//! Row models for the `messages` and `media` tables.

mod backup_stats;
mod media_record;
mod message_record;

pub use backup_stats::BackupStats;
pub use media_record::MediaRecord;
pub use message_record::MessageRecord;
