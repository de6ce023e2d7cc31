//! UseCase: メッセージのピン留め / 解除
//!
//! チャットの参加者であれば誰でもピン留めできる（オーナー等の権限は見ない）。

use std::sync::Arc;

use hearth_shared::time::Clock;

use crate::domain::{
    ChatRepository, DomainEvent, Message, MessageId, MessageRepository, Pin, RoomId, Timestamp,
    UserId,
};

use super::{access, dispatcher::Dispatcher, error::MessageError};

pub struct PinMessageUseCase {
    chats: Arc<dyn ChatRepository>,
    messages: Arc<dyn MessageRepository>,
    dispatcher: Arc<Dispatcher>,
    clock: Arc<dyn Clock>,
}

impl PinMessageUseCase {
    pub fn new(
        chats: Arc<dyn ChatRepository>,
        messages: Arc<dyn MessageRepository>,
        dispatcher: Arc<Dispatcher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            chats,
            messages,
            dispatcher,
            clock,
        }
    }

    pub async fn pin(&self, message_id: &MessageId, actor: &UserId) -> Result<Message, MessageError> {
        let pin = Pin {
            pinned_by: actor.clone(),
            pinned_at: Timestamp::new(self.clock.now_millis()),
        };
        self.set_pin(message_id, actor, Some(pin)).await
    }

    pub async fn unpin(
        &self,
        message_id: &MessageId,
        actor: &UserId,
    ) -> Result<Message, MessageError> {
        self.set_pin(message_id, actor, None).await
    }

    async fn set_pin(
        &self,
        message_id: &MessageId,
        actor: &UserId,
        pin: Option<Pin>,
    ) -> Result<Message, MessageError> {
        access::visible_message(self.chats.as_ref(), self.messages.as_ref(), message_id, actor)
            .await?;
        let message = self.messages.set_pin(message_id, pin).await?;

        let event = DomainEvent::MessagePinned {
            message_id: message.id.clone(),
            pinned: message.is_pinned(),
            pinned_at: message.pin.as_ref().map(|p| p.pinned_at),
        };
        self.dispatcher
            .to_room(&RoomId::chat(&message.chat_id), &event)
            .await;
        Ok(message)
    }
}
