//! Storage crate: durable backup of messages and their media references.
//!
//! ## Modules
//!
//! - [`error`] – Storage error types
//! - [`models`] – MessageRecord, MediaRecord, BackupStats
//! - [`repository`] – BackupStore trait (the seam used by the backup coordinator)
//! - [`backup_repo`] – BackupRepository (SQLite)
//! - [`sqlite_pool`] – SqlitePoolManager

mod backup_repo;
mod error;
mod models;
mod repository;
mod sqlite_pool;


pub use backup_repo::BackupRepository;
pub use error::StorageError;
pub use models::{BackupStats, MediaRecord, MessageRecord};
pub use repository::BackupStore;
pub use sqlite_pool::SqlitePoolManager;
