//! UseCase: メッセージの有効期限設定
//!
//! 期限を打刻するだけで、削除はストレージ側（読み取り時の除外とスイーパー）が行う。

use std::sync::Arc;

use hearth_shared::time::{Clock, is_representable};

use crate::domain::{Message, MessageId, MessageRepository, Timestamp, UserId};

use super::{access, error::MessageError};

pub struct SetExpirationUseCase {
    messages: Arc<dyn MessageRepository>,
    clock: Arc<dyn Clock>,
}

impl SetExpirationUseCase {
    pub fn new(messages: Arc<dyn MessageRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { messages, clock }
    }

    /// 送信者本人のみ設定可能。`expires_in_seconds` は正の値で、期限が表現可能な範囲に収まること。
    pub async fn execute(
        &self,
        message_id: &MessageId,
        actor: &UserId,
        expires_in_seconds: i64,
    ) -> Result<Message, MessageError> {
        let message = access::live_message(self.messages.as_ref(), message_id).await?;
        if &message.sender_id != actor {
            return Err(MessageError::NotAuthorized);
        }
        let seconds = u64::try_from(expires_in_seconds)
            .ok()
            .filter(|s| *s > 0)
            .ok_or(MessageError::InvalidExpiration)?;

        let now = Timestamp::new(self.clock.now_millis());
        // 期限は RFC 3339 で配信できる範囲に収める
        if !is_representable(now.plus_seconds(seconds).value()) {
            return Err(MessageError::InvalidExpiration);
        }
        let message = self
            .messages
            .set_expiration(message_id, seconds, now)
            .await?;
        tracing::debug!("Message '{}' expires in {}s", message.id, seconds);
        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{MessageContent, NewMessage},
        usecase::testing::{chat, user, Fixture, NOW},
    };

    async fn setup() -> (Fixture, SetExpirationUseCase, MessageId) {
        let fixture = Fixture::new().await;
        let usecase = SetExpirationUseCase::new(fixture.messages.clone(), fixture.clock.clone());
        let id = MessageId::new("m1".to_string()).unwrap();
        let message = NewMessage::text(
            chat("c1"),
            user("alice"),
            MessageContent::new("self destruct".to_string()).unwrap(),
        )
        .into_message(id.clone(), Timestamp::new(NOW));
        fixture.messages.insert(message).await.unwrap();
        (fixture, usecase, id)
    }

    #[tokio::test]
    async fn test_set_expiration_success() {
        // テスト項目: 送信者が設定すると expiresAt = now + expiresIn になる
        // given (前提条件):
        let (_fixture, usecase, id) = setup().await;

        // when (操作):
        let message = usecase.execute(&id, &user("alice"), 60).await.unwrap();

        // then (期待する結果):
        assert_eq!(message.expires_in, Some(60));
        assert_eq!(message.expires_at, Some(Timestamp::new(NOW + 60_000)));
    }

    #[tokio::test]
    async fn test_set_expiration_other_user() {
        // テスト項目: 送信者以外は（参加者であっても）NotAuthorized
        // given (前提条件):
        let (_fixture, usecase, id) = setup().await;

        // when (操作):
        let result = usecase.execute(&id, &user("bob"), 60).await;

        // then (期待する結果):
        assert_eq!(result, Err(MessageError::NotAuthorized));
    }

    #[tokio::test]
    async fn test_set_expiration_non_positive() {
        // テスト項目: 0 以下の秒数は InvalidExpiration
        // given (前提条件):
        let (_fixture, usecase, id) = setup().await;

        // when (操作):
        let zero = usecase.execute(&id, &user("alice"), 0).await;
        let negative = usecase.execute(&id, &user("alice"), -5).await;

        // then (期待する結果):
        assert_eq!(zero, Err(MessageError::InvalidExpiration));
        assert_eq!(negative, Err(MessageError::InvalidExpiration));
    }

    #[tokio::test]
    async fn test_set_expiration_beyond_representable_range() {
        // テスト項目: 表現できない遠い未来の期限は InvalidExpiration になり、メッセージは変更されない
        // given (前提条件):
        let (fixture, usecase, id) = setup().await;

        // when (操作):
        let result = usecase
            .execute(&id, &user("alice"), 10_000_000_000_000)
            .await;

        // then (期待する結果):
        assert_eq!(result, Err(MessageError::InvalidExpiration));
        let stored = fixture.messages.find_by_id(&id).await.unwrap().unwrap();
        assert_eq!(stored.expires_at, None);
    }
}
