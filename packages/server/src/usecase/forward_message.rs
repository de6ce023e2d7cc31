//! UseCase: メッセージの転送
//!
//! 転送先チャットの参加者であることが必須。転送元のメッセージは、転送者が
//! 参加しているチャットのものに限る（見えないメッセージは存在しない扱い）。
//! 転送では通知を作成しない。

use std::sync::Arc;

use hearth_shared::time::Clock;

use crate::domain::{
    ChatId, ChatRepository, DomainEvent, IdFactory, LastMessage, Message, MessageId,
    MessageRepository, NewMessage, RoomId, Timestamp, UserId,
};

use super::{access, dispatcher::Dispatcher, error::MessageError};

/// 最終メッセージに付ける転送の目印
pub const FORWARDED_PREFIX: &str = "[Forwarded] ";

pub struct ForwardMessageUseCase {
    chats: Arc<dyn ChatRepository>,
    messages: Arc<dyn MessageRepository>,
    dispatcher: Arc<Dispatcher>,
    clock: Arc<dyn Clock>,
}

impl ForwardMessageUseCase {
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

    pub async fn execute(
        &self,
        message_id: &MessageId,
        actor: &UserId,
        target_chat_id: &ChatId,
    ) -> Result<Message, MessageError> {
        let target = access::participant_chat(self.chats.as_ref(), target_chat_id, actor).await?;

        let original = access::live_message(self.messages.as_ref(), message_id).await?;
        match self.chats.find_by_id(&original.chat_id).await? {
            Some(source) if source.is_participant(actor) => {}
            _ => return Err(MessageError::MessageNotFound),
        }

        let now = Timestamp::new(self.clock.now_millis());
        let forwarded = NewMessage {
            chat_id: target.id.clone(),
            sender_id: actor.clone(),
            content: original.content.clone(),
            kind: original.kind,
            attachments: original.attachments.clone(),
            mentions: Vec::new(),
            reply_to: None,
            forwarded_from: Some(original.id.clone()),
        }
        .into_message(IdFactory::message_id(), now);
        self.messages.insert(forwarded.clone()).await?;
        tracing::info!(
            "Message '{}' forwarded to chat '{}' as '{}'",
            original.id,
            target.id,
            forwarded.id
        );

        let summary = LastMessage {
            content: format!("{FORWARDED_PREFIX}{}", forwarded.content.as_str()),
            sender_id: actor.clone(),
            timestamp: now,
        };
        if let Err(e) = self.chats.update_last_message(&target.id, summary).await {
            tracing::warn!("Failed to update last message of '{}': {}", target.id, e);
        }

        self.dispatcher
            .to_room(
                &RoomId::chat(&target.id),
                &DomainEvent::MessageNew {
                    chat_id: target.id.clone(),
                    message: Box::new(forwarded.clone()),
                },
            )
            .await;
        Ok(forwarded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{MessageContent, MessageKind, NotificationRepository},
        usecase::testing::{chat, drain, user, Fixture},
    };

    async fn setup() -> (Fixture, ForwardMessageUseCase, MessageId) {
        let fixture = Fixture::new().await;
        let usecase = ForwardMessageUseCase::new(
            fixture.chats.clone(),
            fixture.messages.clone(),
            fixture.dispatcher(),
            fixture.clock.clone(),
        );
        let id = MessageId::new("m1".to_string()).unwrap();
        let mut message = NewMessage::text(
            chat("c1"),
            user("bob"),
            MessageContent::new("see attached".to_string()).unwrap(),
        );
        message.kind = MessageKind::File;
        fixture
            .messages
            .insert(message.into_message(id.clone(), Timestamp::new(0)))
            .await
            .unwrap();
        (fixture, usecase, id)
    }

    #[tokio::test]
    async fn test_forward_success() {
        // テスト項目: 転送メッセージが作成され、転送先に配信され、最終メッセージに目印が付く
        // given (前提条件):
        let (fixture, usecase, id) = setup().await;
        let mut carol_rx = fixture.connect("conn-c", "carol", &["c2"]).await;

        // when (操作):
        let forwarded = usecase.execute(&id, &user("alice"), &chat("c2")).await.unwrap();

        // then (期待する結果):
        assert_eq!(forwarded.chat_id, chat("c2"));
        assert_eq!(forwarded.sender_id, user("alice"));
        assert_eq!(forwarded.kind, MessageKind::File);
        assert_eq!(forwarded.forwarded_from, Some(id));
        let c2 = fixture.chats.find_by_id(&chat("c2")).await.unwrap().unwrap();
        assert_eq!(
            c2.last_message.map(|l| l.content),
            Some("[Forwarded] see attached".to_string())
        );
        let frames = drain(&mut carol_rx);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0]["event"], "message-new");
        assert_eq!(frames[0]["data"]["message"]["forwardedFrom"], "m1");
        assert!(
            fixture
                .notifications
                .list_for_user(&user("carol"))
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_forward_requires_target_participation() {
        // テスト項目: 元メッセージを送った本人でも、転送先の参加者でなければ拒否される（存在しない転送先も同様）
        // given (前提条件):
        let (_fixture, usecase, id) = setup().await;

        // when (操作):
        let result = usecase.execute(&id, &user("bob"), &chat("c2")).await;
        let unknown = usecase.execute(&id, &user("alice"), &chat("nope")).await;

        // then (期待する結果):
        assert_eq!(result, Err(MessageError::NotParticipant));
        assert_eq!(unknown, Err(MessageError::NotParticipant));
    }

    #[tokio::test]
    async fn test_forward_unknown_or_invisible_source() {
        // テスト項目: 存在しない、または参加していないチャットのメッセージは MessageNotFound
        // given (前提条件):
        let (_fixture, usecase, id) = setup().await;

        // when (操作):
        let missing = usecase
            .execute(
                &MessageId::new("nope".to_string()).unwrap(),
                &user("alice"),
                &chat("c2"),
            )
            .await;
        let invisible = usecase.execute(&id, &user("carol"), &chat("c2")).await;

        // then (期待する結果):
        assert_eq!(missing, Err(MessageError::MessageNotFound));
        assert_eq!(invisible, Err(MessageError::MessageNotFound));
    }
}
