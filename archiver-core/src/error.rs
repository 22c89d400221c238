use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArchiverError {
    #[error("Handler error: {0}")]
    Handler(String),

    #[error("Unknown chat type: {0}")]
    UnknownChatType(String),

    #[error("Unknown media kind: {0}")]
    UnknownMediaKind(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ArchiverError>;
