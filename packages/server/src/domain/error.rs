//! ドメイン層のエラー型

use thiserror::Error;

/// Value object validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("{0} must not be empty")]
    EmptyId(&'static str),

    #[error("{0} must be at most {1} characters")]
    IdTooLong(&'static str, usize),

    #[error("Message content must not be empty")]
    EmptyContent,

    #[error("Message content must be at most {0} characters")]
    ContentTooLong(usize),

    #[error("Emoji must not be empty")]
    EmptyEmoji,

    #[error("Emoji must be at most {0} characters")]
    EmojiTooLong(usize),
}

/// Repository errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("Chat not found: {0}")]
    ChatNotFound(String),

    #[error("Message not found: {0}")]
    MessageNotFound(String),

    #[error("Notification not found: {0}")]
    NotificationNotFound(String),

    #[error("Storage failure: {0}")]
    Storage(String),
}

/// Message push errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("Connection not found: {0}")]
    ConnectionNotFound(String),

    #[error("Failed to push message: {0}")]
    PushFailed(String),

    #[error("Failed to encode event: {0}")]
    Encode(String),
}

/// Entity invariant violations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntityError {
    #[error("Chat must have at least one participant")]
    EmptyParticipants,
}
