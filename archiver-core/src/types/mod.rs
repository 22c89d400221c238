//! Core types: sender, chat, inbound event, media classification, and the Handler trait.

mod chat;
mod event;
mod handler;
mod media;
mod user;

pub use chat::{Chat, ChatType};
pub use event::{InboundEvent, ToInboundEvent};
pub use handler::{Handler, HandlerResponse};
pub use media::{Attachments, FileRef, MediaDescriptor, MediaKind, PhotoSize, RemoteLocator};
pub use user::User;
