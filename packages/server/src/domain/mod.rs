//! Domain 層: 値オブジェクト、エンティティ、イベント、
//! およびユースケースが依存する trait を定義する。

pub mod entity;
pub mod error;
pub mod event;
pub mod identity;
pub mod presence;
pub mod pusher;
pub mod repository;
pub mod value_object;

pub use entity::{
    Attachment, Chat, ChatKind, LastMessage, Message, MessageKind, NewMessage, Notification,
    NotificationData, NotificationKind, Participant, ParticipantRole, Pin, PresenceStatus,
    Reaction, ReadReceipt,
};
pub use error::{EntityError, MessagePushError, RepositoryError, ValueObjectError};
pub use event::DomainEvent;
pub use identity::{TokenResolver, UserDirectory};
pub use presence::{ConnectionRegistry, Departure, RoomMembership};
pub use pusher::{MessagePusher, PusherChannel};
pub use repository::{
    ChatRepository, MessagePage, MessageRepository, NotificationRepository, SearchPage,
};
#[cfg(test)]
pub use repository::{MockChatRepository, MockNotificationRepository};
pub use value_object::{
    ChatId, ConnectionId, Emoji, IdFactory, MessageContent, MessageId, NotificationId, RoomId,
    Timestamp, UserId,
};
