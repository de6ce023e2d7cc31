//! UseCase: 履歴・ピン留め一覧・チャット一覧の取得

use std::sync::Arc;

use crate::domain::{
    Chat, ChatId, ChatRepository, Message, MessagePage, MessageRepository, Timestamp, UserId,
};

use super::{access, error::MessageError};

pub const DEFAULT_HISTORY_LIMIT: usize = 50;
pub const MAX_HISTORY_LIMIT: usize = 100;

pub struct GetMessagesUseCase {
    chats: Arc<dyn ChatRepository>,
    messages: Arc<dyn MessageRepository>,
}

impl GetMessagesUseCase {
    pub fn new(chats: Arc<dyn ChatRepository>, messages: Arc<dyn MessageRepository>) -> Self {
        Self { chats, messages }
    }

    /// `before` より古いメッセージを古い順に最大 `limit` 件
    pub async fn history(
        &self,
        user_id: &UserId,
        chat_id: &ChatId,
        limit: Option<usize>,
        before: Option<Timestamp>,
    ) -> Result<MessagePage, MessageError> {
        access::participant_chat(self.chats.as_ref(), chat_id, user_id).await?;
        let limit = limit
            .unwrap_or(DEFAULT_HISTORY_LIMIT)
            .clamp(1, MAX_HISTORY_LIMIT);
        Ok(self.messages.list_history(chat_id, before, limit).await?)
    }

    /// ピン留めされたメッセージ（ピン留めが新しい順）
    pub async fn pinned(
        &self,
        user_id: &UserId,
        chat_id: &ChatId,
    ) -> Result<Vec<Message>, MessageError> {
        access::participant_chat(self.chats.as_ref(), chat_id, user_id).await?;
        Ok(self.messages.list_pinned(chat_id).await?)
    }

    /// ユーザーが参加しているチャット（ID 順）
    pub async fn chats(&self, user_id: &UserId) -> Result<Vec<Chat>, MessageError> {
        Ok(self.chats.list_for_user(user_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{MessageContent, MessageId, NewMessage, Pin},
        usecase::testing::{chat, user, Fixture},
    };

    async fn setup(count: i64) -> (Fixture, GetMessagesUseCase) {
        let fixture = Fixture::new().await;
        let usecase = GetMessagesUseCase::new(fixture.chats.clone(), fixture.messages.clone());
        for i in 0..count {
            let message = NewMessage::text(
                chat("c1"),
                user("alice"),
                MessageContent::new(format!("message {i}")).unwrap(),
            )
            .into_message(
                MessageId::new(format!("m{i}")).unwrap(),
                Timestamp::new(i * 1000),
            );
            fixture.messages.insert(message).await.unwrap();
        }
        (fixture, usecase)
    }

    #[tokio::test]
    async fn test_history_pages_backwards() {
        // テスト項目: 最新から limit 件が古い順で返り、before で遡れる
        // given (前提条件):
        let (_fixture, usecase) = setup(5).await;

        // when (操作):
        let latest = usecase
            .history(&user("bob"), &chat("c1"), Some(2), None)
            .await
            .unwrap();
        let older = usecase
            .history(&user("bob"), &chat("c1"), Some(10), Some(Timestamp::new(3000)))
            .await
            .unwrap();

        // then (期待する結果):
        let ids = |page: &MessagePage| -> Vec<String> {
            page.messages.iter().map(|m| m.id.to_string()).collect()
        };
        assert_eq!(ids(&latest), vec!["m3", "m4"]);
        assert!(latest.has_more);
        assert_eq!(ids(&older), vec!["m0", "m1", "m2"]);
        assert!(!older.has_more);
    }

    #[tokio::test]
    async fn test_history_requires_participation() {
        // テスト項目: 参加していないチャットの履歴・ピン留めは取得できない
        // given (前提条件):
        let (_fixture, usecase) = setup(1).await;

        // when (操作):
        let history = usecase.history(&user("carol"), &chat("c1"), None, None).await;
        let pinned = usecase.pinned(&user("carol"), &chat("c1")).await;

        // then (期待する結果):
        assert_eq!(history, Err(MessageError::NotParticipant));
        assert_eq!(pinned, Err(MessageError::NotParticipant));
    }

    #[tokio::test]
    async fn test_pinned_newest_first() {
        // テスト項目: ピン留め一覧はピン留めが新しい順
        // given (前提条件):
        let (fixture, usecase) = setup(3).await;
        for (id, at) in [("m0", 5000), ("m2", 9000)] {
            fixture
                .messages
                .set_pin(
                    &MessageId::new(id.to_string()).unwrap(),
                    Some(Pin {
                        pinned_by: user("bob"),
                        pinned_at: Timestamp::new(at),
                    }),
                )
                .await
                .unwrap();
        }

        // when (操作):
        let pinned = usecase.pinned(&user("alice"), &chat("c1")).await.unwrap();

        // then (期待する結果):
        let ids: Vec<&str> = pinned.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["m2", "m0"]);
    }

    #[tokio::test]
    async fn test_chats_for_user() {
        // テスト項目: 参加しているチャットだけが返る
        // given (前提条件):
        let (_fixture, usecase) = setup(0).await;

        // when (操作):
        let alice = usecase.chats(&user("alice")).await.unwrap();
        let bob = usecase.chats(&user("bob")).await.unwrap();

        // then (期待する結果):
        assert_eq!(alice.len(), 2);
        assert_eq!(bob.iter().map(|c| c.id.clone()).collect::<Vec<_>>(), vec![chat("c1")]);
    }
}
