//! チャットドメインの値オブジェクト
//!
//! 識別子は生成時に検証される不透明な文字列。サーバーが発行する識別子
//! （メッセージ、通知、接続）は UUID v4。

use std::fmt;

use super::error::ValueObjectError;

/// Maximum length of an identifier (in characters)
pub const MAX_ID_LEN: usize = 128;
/// Maximum length of message content after trimming (in characters)
pub const MAX_CONTENT_LEN: usize = 4000;
/// Maximum length of a reaction emoji (in characters)
pub const MAX_EMOJI_LEN: usize = 32;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(String);

        impl $name {
            pub fn new(value: String) -> Result<Self, ValueObjectError> {
                let trimmed = value.trim();
                if trimmed.is_empty() {
                    return Err(ValueObjectError::EmptyId($label));
                }
                if trimmed.chars().count() > MAX_ID_LEN {
                    return Err(ValueObjectError::IdTooLong($label, MAX_ID_LEN));
                }
                Ok(Self(trimmed.to_string()))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_string(self) -> String {
                self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValueObjectError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = ValueObjectError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value.to_string())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(
    /// Authenticated user identifier
    UserId,
    "user id"
);
string_id!(
    /// Chat (conversation container) identifier
    ChatId,
    "chat id"
);
string_id!(
    /// Message identifier
    MessageId,
    "message id"
);
string_id!(
    /// Notification identifier
    NotificationId,
    "notification id"
);
string_id!(
    /// Identifier of one live transport connection
    ConnectionId,
    "connection id"
);

/// Generator for server-assigned identifiers
pub struct IdFactory;

impl IdFactory {
    fn uuid() -> String {
        uuid::Uuid::new_v4().to_string()
    }

    pub fn message_id() -> MessageId {
        MessageId(Self::uuid())
    }

    pub fn notification_id() -> NotificationId {
        NotificationId(Self::uuid())
    }

    pub fn connection_id() -> ConnectionId {
        ConnectionId(Self::uuid())
    }
}

/// Realtime room key.
///
/// Chat rooms and personal rooms live in separate namespaces so a chat id can
/// never collide with a user id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RoomId {
    /// Room of every connection subscribed to a chat
    Chat(ChatId),
    /// Personal room of every connection owned by a user
    Personal(UserId),
}

impl RoomId {
    pub fn chat(chat_id: &ChatId) -> Self {
        Self::Chat(chat_id.clone())
    }

    pub fn personal(user_id: &UserId) -> Self {
        Self::Personal(user_id.clone())
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoomId::Chat(id) => write!(f, "chat:{}", id),
            RoomId::Personal(id) => write!(f, "user:{}", id),
        }
    }
}

/// Message body. Stored trimmed; never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageContent(String);

impl MessageContent {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValueObjectError::EmptyContent);
        }
        if trimmed.chars().count() > MAX_CONTENT_LEN {
            return Err(ValueObjectError::ContentTooLong(MAX_CONTENT_LEN));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// First `max_chars` code points of the content
    pub fn preview(&self, max_chars: usize) -> String {
        self.0.chars().take(max_chars).collect()
    }
}

impl TryFrom<String> for MessageContent {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Reaction emoji
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Emoji(String);

impl Emoji {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValueObjectError::EmptyEmoji);
        }
        if trimmed.chars().count() > MAX_EMOJI_LEN {
            return Err(ValueObjectError::EmojiTooLong(MAX_EMOJI_LEN));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Unix timestamp in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(millis: i64) -> Self {
        Self(millis)
    }

    pub fn value(&self) -> i64 {
        self.0
    }

    pub fn plus_seconds(&self, seconds: u64) -> Self {
        let delta = i64::try_from(seconds.saturating_mul(1000)).unwrap_or(i64::MAX);
        Self(self.0.saturating_add(delta))
    }
}
