//! UseCase: 既読の記録
//!
//! 既読レシートはユーザーごとにメッセージあたり 1 件のみ。

use std::sync::Arc;

use hearth_shared::time::Clock;

use crate::domain::{
    ChatId, ChatRepository, DomainEvent, MessageId, MessageRepository, ReadReceipt, RoomId,
    Timestamp, UserId,
};

use super::{access, dispatcher::Dispatcher, error::MessageError};

/// 既読処理の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadOutcome {
    pub message_id: MessageId,
    pub receipt: ReadReceipt,
    /// 今回新たに既読になった場合は `true`
    pub newly_read: bool,
}

pub struct MarkReadUseCase {
    chats: Arc<dyn ChatRepository>,
    messages: Arc<dyn MessageRepository>,
    dispatcher: Arc<Dispatcher>,
    clock: Arc<dyn Clock>,
}

impl MarkReadUseCase {
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

    /// メッセージを既読にする。新たに既読になったときだけ `message-read` を配信する。
    pub async fn message(
        &self,
        message_id: &MessageId,
        user_id: &UserId,
    ) -> Result<ReadOutcome, MessageError> {
        let message = access::visible_message(
            self.chats.as_ref(),
            self.messages.as_ref(),
            message_id,
            user_id,
        )
        .await?;

        let now = Timestamp::new(self.clock.now_millis());
        match self
            .messages
            .add_read_receipt(message_id, user_id, now)
            .await?
        {
            Some(receipt) => {
                self.dispatcher
                    .to_room(
                        &RoomId::chat(&message.chat_id),
                        &DomainEvent::MessageRead {
                            message_id: message.id.clone(),
                            user_id: receipt.user_id.clone(),
                            read_at: receipt.read_at,
                        },
                    )
                    .await;
                Ok(ReadOutcome {
                    message_id: message.id,
                    receipt,
                    newly_read: true,
                })
            }
            None => {
                let receipt = message
                    .read_by
                    .iter()
                    .find(|r| &r.user_id == user_id)
                    .cloned()
                    .unwrap_or(ReadReceipt {
                        user_id: user_id.clone(),
                        read_at: now,
                    });
                Ok(ReadOutcome {
                    message_id: message.id,
                    receipt,
                    newly_read: false,
                })
            }
        }
    }

    /// チャット内の全メッセージを既読にし、新たに既読にした件数を返す
    ///
    /// メッセージごとの `message-read` は配信しない。
    pub async fn chat(&self, chat_id: &ChatId, user_id: &UserId) -> Result<usize, MessageError> {
        access::participant_chat(self.chats.as_ref(), chat_id, user_id).await?;
        let now = Timestamp::new(self.clock.now_millis());
        let marked = self
            .messages
            .add_read_receipts_for_chat(chat_id, user_id, now)
            .await?;
        tracing::debug!("Marked {} messages in '{}' as read by '{}'", marked, chat_id, user_id);
        Ok(marked)
    }
}
