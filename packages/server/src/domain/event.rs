//! リアルタイムチャンネルで配信するイベント
//!
//! ワイヤー表現は `infrastructure::dto::websocket` にある。

use super::{
    entity::{Message, Notification, PresenceStatus, Reaction},
    value_object::{ChatId, MessageContent, MessageId, Timestamp, UserId},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainEvent {
    MessageNew {
        chat_id: ChatId,
        message: Box<Message>,
    },
    MessageEdit {
        chat_id: ChatId,
        message_id: MessageId,
        new_content: MessageContent,
    },
    MessageDelete {
        chat_id: ChatId,
        message_id: MessageId,
    },
    MessageReaction {
        message_id: MessageId,
        reactions: Vec<Reaction>,
    },
    MessagePinned {
        message_id: MessageId,
        pinned: bool,
        pinned_at: Option<Timestamp>,
    },
    MessageRead {
        message_id: MessageId,
        user_id: UserId,
        read_at: Timestamp,
    },
    NotificationNew(Box<Notification>),
    UserStatus {
        user_id: UserId,
        status: PresenceStatus,
    },
    TypingStart {
        chat_id: ChatId,
        user_id: UserId,
    },
    TypingStop {
        chat_id: ChatId,
        user_id: UserId,
    },
    /// Rejection of an inbound realtime event, sent to the originating connection only
    Rejected {
        event: String,
        error: String,
    },
}

impl DomainEvent {
    /// Wire event name
    pub fn name(&self) -> &'static str {
        match self {
            DomainEvent::MessageNew { .. } => "message-new",
            DomainEvent::MessageEdit { .. } => "message-edit",
            DomainEvent::MessageDelete { .. } => "message-delete",
            DomainEvent::MessageReaction { .. } => "message-reaction",
            DomainEvent::MessagePinned { .. } => "message-pinned",
            DomainEvent::MessageRead { .. } => "message-read",
            DomainEvent::NotificationNew(_) => "notification-new",
            DomainEvent::UserStatus { .. } => "user-status",
            DomainEvent::TypingStart { .. } => "typing-start",
            DomainEvent::TypingStop { .. } => "typing-stop",
            DomainEvent::Rejected { .. } => "error",
        }
    }
}
