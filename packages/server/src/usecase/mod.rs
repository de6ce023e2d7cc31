//! UseCase 層
//!
//! ビジネスロジックを実装する層です。Domain 層の trait（Repository,
//! MessagePusher など）にのみ依存し、具体的な実装は UI 層から注入されます。

mod access;
pub mod connect;
pub mod disconnect;
pub mod dispatcher;
pub mod edit_message;
pub mod error;
pub mod forward_message;
pub mod get_messages;
pub mod mark_read;
pub mod notifications;
pub mod pin_message;
pub mod presence;
pub mod realtime;
pub mod search_messages;
pub mod send_message;
pub mod set_expiration;
pub mod toggle_reaction;

#[cfg(test)]
pub(crate) mod testing;

pub use connect::ConnectUseCase;
pub use disconnect::DisconnectUseCase;
pub use dispatcher::Dispatcher;
pub use edit_message::EditMessageUseCase;
pub use error::{MessageError, RealtimeError};
pub use forward_message::ForwardMessageUseCase;
pub use get_messages::GetMessagesUseCase;
pub use mark_read::{MarkReadUseCase, ReadOutcome};
pub use notifications::{NotificationList, NotificationsUseCase};
pub use pin_message::PinMessageUseCase;
pub use presence::{GetPresenceUseCase, SetUserStatusUseCase};
pub use realtime::{ChatSubscriptionUseCase, TypingUseCase};
pub use search_messages::{SearchMessagesUseCase, SearchResult};
pub use send_message::{SendMessageCommand, SendMessageUseCase};
pub use set_expiration::SetExpirationUseCase;
pub use toggle_reaction::ToggleReactionUseCase;
