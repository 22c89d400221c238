//! # archiver-core
//!
//! Transport-agnostic building blocks for the archiver: the [`InboundEvent`] model delivered by a
//! transport, media classification types, the [`Handler`] trait run by the handler chain, and
//! tracing initialization. Used by backup, handler-chain and telegram-archiver.

pub mod error;
pub mod logger;
pub mod types;

pub use error::{ArchiverError, Result};
pub use logger::init_tracing;
pub use types::{
    Attachments, Chat, ChatType, FileRef, Handler, HandlerResponse, InboundEvent, MediaDescriptor,
    MediaKind, PhotoSize, RemoteLocator, ToInboundEvent, User,
};
