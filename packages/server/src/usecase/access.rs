//! Participation and message lookup shared by the message use cases.

use crate::domain::{
    Chat, ChatId, ChatRepository, Message, MessageId, MessageRepository, UserId,
};

use super::error::MessageError;

/// Load `chat_id` and require `user_id` to be one of its participants.
///
/// An unknown chat has no participants, so it is rejected the same way.
pub(crate) async fn participant_chat(
    chats: &dyn ChatRepository,
    chat_id: &ChatId,
    user_id: &UserId,
) -> Result<Chat, MessageError> {
    match chats.find_by_id(chat_id).await? {
        Some(chat) if chat.is_participant(user_id) => Ok(chat),
        _ => Err(MessageError::NotParticipant),
    }
}

/// Load a live (not deleted, not expired) message
pub(crate) async fn live_message(
    messages: &dyn MessageRepository,
    message_id: &MessageId,
) -> Result<Message, MessageError> {
    match messages.find_by_id(message_id).await? {
        Some(message) if !message.is_deleted() => Ok(message),
        _ => Err(MessageError::MessageNotFound),
    }
}

/// Load a live message whose chat `user_id` participates in
pub(crate) async fn visible_message(
    chats: &dyn ChatRepository,
    messages: &dyn MessageRepository,
    message_id: &MessageId,
    user_id: &UserId,
) -> Result<Message, MessageError> {
    let message = live_message(messages, message_id).await?;
    participant_chat(chats, &message.chat_id, user_id).await?;
    Ok(message)
}
