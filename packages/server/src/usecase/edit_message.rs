//! UseCase: メッセージの編集と論理削除
//!
//! どちらも送信者本人のみ。削除済みのメッセージは存在しない扱い。

use std::sync::Arc;

use hearth_shared::time::Clock;

use crate::domain::{
    DomainEvent, Message, MessageContent, MessageId, MessageRepository, RoomId, Timestamp, UserId,
};

use super::{access, dispatcher::Dispatcher, error::MessageError};

pub struct EditMessageUseCase {
    messages: Arc<dyn MessageRepository>,
    dispatcher: Arc<Dispatcher>,
    clock: Arc<dyn Clock>,
}

impl EditMessageUseCase {
    pub fn new(
        messages: Arc<dyn MessageRepository>,
        dispatcher: Arc<Dispatcher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            messages,
            dispatcher,
            clock,
        }
    }

    async fn own_message(
        &self,
        message_id: &MessageId,
        actor: &UserId,
    ) -> Result<Message, MessageError> {
        let message = access::live_message(self.messages.as_ref(), message_id).await?;
        if &message.sender_id != actor {
            return Err(MessageError::NotAuthorized);
        }
        Ok(message)
    }

    pub async fn edit(
        &self,
        message_id: &MessageId,
        actor: &UserId,
        content: String,
    ) -> Result<Message, MessageError> {
        self.own_message(message_id, actor).await?;
        let content = MessageContent::new(content)?;

        let now = Timestamp::new(self.clock.now_millis());
        let message = self
            .messages
            .edit_content(message_id, content, now)
            .await?;

        self.dispatcher
            .to_room(
                &RoomId::chat(&message.chat_id),
                &DomainEvent::MessageEdit {
                    chat_id: message.chat_id.clone(),
                    message_id: message.id.clone(),
                    new_content: message.content.clone(),
                },
            )
            .await;
        Ok(message)
    }

    pub async fn delete(
        &self,
        message_id: &MessageId,
        actor: &UserId,
    ) -> Result<Message, MessageError> {
        self.own_message(message_id, actor).await?;

        let now = Timestamp::new(self.clock.now_millis());
        let message = self.messages.soft_delete(message_id, now).await?;
        tracing::info!("Message '{}' deleted by '{}'", message.id, actor);

        self.dispatcher
            .to_room(
                &RoomId::chat(&message.chat_id),
                &DomainEvent::MessageDelete {
                    chat_id: message.chat_id.clone(),
                    message_id: message.id.clone(),
                },
            )
            .await;
        Ok(message)
    }
}
