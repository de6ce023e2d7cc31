//! UseCase: リアクションのトグル
//!
//! トグル自体は Repository がドキュメント単位でアトミックに行う。

use std::sync::Arc;

use crate::domain::{
    ChatRepository, DomainEvent, Emoji, Message, MessageId, MessageRepository, RoomId, UserId,
};

use super::{access, dispatcher::Dispatcher, error::MessageError};

pub struct ToggleReactionUseCase {
    chats: Arc<dyn ChatRepository>,
    messages: Arc<dyn MessageRepository>,
    dispatcher: Arc<Dispatcher>,
}

impl ToggleReactionUseCase {
    pub fn new(
        chats: Arc<dyn ChatRepository>,
        messages: Arc<dyn MessageRepository>,
        dispatcher: Arc<Dispatcher>,
    ) -> Self {
        Self {
            chats,
            messages,
            dispatcher,
        }
    }

    /// リアクションをトグルし、更新後のメッセージを返す
    pub async fn execute(
        &self,
        message_id: &MessageId,
        user_id: &UserId,
        emoji: &str,
    ) -> Result<Message, MessageError> {
        let emoji = Emoji::new(emoji.to_string())?;
        access::visible_message(self.chats.as_ref(), self.messages.as_ref(), message_id, user_id)
            .await?;

        let message = self
            .messages
            .toggle_reaction(message_id, user_id, &emoji)
            .await?;

        self.dispatcher
            .to_room(
                &RoomId::chat(&message.chat_id),
                &DomainEvent::MessageReaction {
                    message_id: message.id.clone(),
                    reactions: message.reactions.clone(),
                },
            )
            .await;
        Ok(message)
    }
}
