//! InMemory Message Repository 実装
//!
//! `expires_at` を過ぎたメッセージは、スイーパーによる物理削除の前でも
//! 全ての操作から見えなくなる（TTL インデックスと同じ振る舞い）。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use hearth_shared::time::Clock;
use tokio::sync::Mutex;

use crate::domain::{
    ChatId, Emoji, Message, MessageContent, MessageId, MessagePage, MessageRepository, Pin,
    ReadReceipt, RepositoryError, SearchPage, Timestamp, UserId,
};

#[derive(Default)]
struct Store {
    messages: HashMap<MessageId, Message>,
    /// チャットごとの挿入順インデックス
    by_chat: HashMap<ChatId, Vec<MessageId>>,
}

impl Store {
    fn live_mut(
        &mut self,
        message_id: &MessageId,
        now: Timestamp,
    ) -> Result<&mut Message, RepositoryError> {
        match self.messages.get_mut(message_id) {
            Some(message) if !message.is_expired(now) => Ok(message),
            _ => Err(RepositoryError::MessageNotFound(message_id.to_string())),
        }
    }

    fn live_in_chat<'a>(&'a self, chat_id: &ChatId, now: Timestamp) -> Vec<&'a Message> {
        let mut messages: Vec<&Message> = self
            .by_chat
            .get(chat_id)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| self.messages.get(id))
                    .filter(|m| !m.is_expired(now))
                    .collect()
            })
            .unwrap_or_default();
        // stable: 同時刻のメッセージは挿入順を保つ
        messages.sort_by_key(|m| m.created_at);
        messages
    }
}

/// インメモリ Message Repository 実装
pub struct InMemoryMessageRepository {
    store: Mutex<Store>,
    clock: Arc<dyn Clock>,
}

impl InMemoryMessageRepository {
    /// 新しい InMemoryMessageRepository を作成
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            store: Mutex::new(Store::default()),
            clock,
        }
    }

    fn now(&self) -> Timestamp {
        Timestamp::new(self.clock.now_millis())
    }
}

#[async_trait]
impl MessageRepository for InMemoryMessageRepository {
    async fn insert(&self, message: Message) -> Result<(), RepositoryError> {
        let mut store = self.store.lock().await;
        store
            .by_chat
            .entry(message.chat_id.clone())
            .or_default()
            .push(message.id.clone());
        store.messages.insert(message.id.clone(), message);
        Ok(())
    }

    async fn find_by_id(&self, message_id: &MessageId) -> Result<Option<Message>, RepositoryError> {
        let now = self.now();
        let store = self.store.lock().await;
        Ok(store
            .messages
            .get(message_id)
            .filter(|m| !m.is_expired(now))
            .cloned())
    }

    async fn list_history(
        &self,
        chat_id: &ChatId,
        before: Option<Timestamp>,
        limit: usize,
    ) -> Result<MessagePage, RepositoryError> {
        let now = self.now();
        let store = self.store.lock().await;
        let candidates: Vec<&Message> = store
            .live_in_chat(chat_id, now)
            .into_iter()
            .filter(|m| before.is_none_or(|b| m.created_at < b))
            .collect();

        let has_more = candidates.len() > limit;
        let start = candidates.len().saturating_sub(limit);
        let messages = candidates[start..].iter().map(|m| (*m).clone()).collect();

        Ok(MessagePage { messages, has_more })
    }

    async fn list_pinned(&self, chat_id: &ChatId) -> Result<Vec<Message>, RepositoryError> {
        let now = self.now();
        let store = self.store.lock().await;
        let mut pinned: Vec<Message> = store
            .live_in_chat(chat_id, now)
            .into_iter()
            .filter(|m| m.is_pinned() && !m.is_deleted())
            .cloned()
            .collect();
        pinned.sort_by(|a, b| {
            let a_at = a.pin.as_ref().map(|p| p.pinned_at);
            let b_at = b.pin.as_ref().map(|p| p.pinned_at);
            b_at.cmp(&a_at)
        });
        Ok(pinned)
    }

    async fn search(
        &self,
        chat_ids: &[ChatId],
        query: &str,
        skip: usize,
        limit: usize,
    ) -> Result<SearchPage, RepositoryError> {
        let now = self.now();
        let needle = query.to_lowercase();
        let guard = self.store.lock().await;
        let store: &Store = &guard;

        let mut matches: Vec<&Message> = chat_ids
            .iter()
            .flat_map(|chat_id| store.live_in_chat(chat_id, now))
            .filter(|m| !m.is_deleted())
            .filter(|m| m.content.as_str().to_lowercase().contains(&needle))
            .collect();
        matches.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = matches.len();
        let messages = matches
            .into_iter()
            .skip(skip)
            .take(limit)
            .cloned()
            .collect();

        Ok(SearchPage { messages, total })
    }

    async fn toggle_reaction(
        &self,
        message_id: &MessageId,
        user_id: &UserId,
        emoji: &Emoji,
    ) -> Result<Message, RepositoryError> {
        let now = self.now();
        let mut store = self.store.lock().await;
        let message = store.live_mut(message_id, now)?;
        message.toggle_reaction(user_id, emoji);
        Ok(message.clone())
    }

    async fn add_read_receipt(
        &self,
        message_id: &MessageId,
        user_id: &UserId,
        read_at: Timestamp,
    ) -> Result<Option<ReadReceipt>, RepositoryError> {
        let now = self.now();
        let mut store = self.store.lock().await;
        let message = store.live_mut(message_id, now)?;
        Ok(message.mark_read(user_id, read_at))
    }

    async fn add_read_receipts_for_chat(
        &self,
        chat_id: &ChatId,
        user_id: &UserId,
        read_at: Timestamp,
    ) -> Result<usize, RepositoryError> {
        let now = self.now();
        let mut store = self.store.lock().await;
        let Store { messages, by_chat } = &mut *store;

        let mut inserted = 0;
        for id in by_chat.get(chat_id).into_iter().flatten() {
            if let Some(message) = messages.get_mut(id) {
                if message.is_expired(now) {
                    continue;
                }
                if message.mark_read(user_id, read_at).is_some() {
                    inserted += 1;
                }
            }
        }
        Ok(inserted)
    }

    async fn set_pin(
        &self,
        message_id: &MessageId,
        pin: Option<Pin>,
    ) -> Result<Message, RepositoryError> {
        let now = self.now();
        let mut store = self.store.lock().await;
        let message = store.live_mut(message_id, now)?;
        match pin {
            Some(pin) => message.pin(pin.pinned_by, pin.pinned_at),
            None => message.unpin(),
        }
        Ok(message.clone())
    }

    async fn set_expiration(
        &self,
        message_id: &MessageId,
        expires_in_seconds: u64,
        now: Timestamp,
    ) -> Result<Message, RepositoryError> {
        let mut store = self.store.lock().await;
        let message = store.live_mut(message_id, now)?;
        message.set_expiration(expires_in_seconds, now);
        Ok(message.clone())
    }

    async fn edit_content(
        &self,
        message_id: &MessageId,
        content: MessageContent,
        edited_at: Timestamp,
    ) -> Result<Message, RepositoryError> {
        let now = self.now();
        let mut store = self.store.lock().await;
        let message = store.live_mut(message_id, now)?;
        message.edit(content, edited_at);
        Ok(message.clone())
    }

    async fn soft_delete(
        &self,
        message_id: &MessageId,
        deleted_at: Timestamp,
    ) -> Result<Message, RepositoryError> {
        let now = self.now();
        let mut store = self.store.lock().await;
        let message = store.live_mut(message_id, now)?;
        message.soft_delete(deleted_at);
        Ok(message.clone())
    }

    async fn purge_expired(&self, now: Timestamp) -> Result<usize, RepositoryError> {
        let mut store = self.store.lock().await;
        let Store { messages, by_chat } = &mut *store;

        let before = messages.len();
        messages.retain(|_, m| !m.is_expired(now));
        let purged = before - messages.len();

        if purged > 0 {
            for ids in by_chat.values_mut() {
                ids.retain(|id| messages.contains_key(id));
            }
            by_chat.retain(|_, ids| !ids.is_empty());
        }
        Ok(purged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NewMessage;
    use hearth_shared::time::FixedClock;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - 履歴のページング（before / limit / has_more）
    // - 検索（大文字小文字の無視、削除済みの除外、total）
    // - 有効期限切れメッセージの不可視化と物理削除
    // ========================================

    const NOW: i64 = 1_000_000;

    fn create_test_repository() -> InMemoryMessageRepository {
        InMemoryMessageRepository::new(Arc::new(FixedClock::new(NOW)))
    }

    fn chat_id(id: &str) -> ChatId {
        ChatId::new(id.to_string()).unwrap()
    }

    fn user(id: &str) -> UserId {
        UserId::new(id.to_string()).unwrap()
    }

    fn message(id: &str, chat: &str, content: &str, created_at: i64) -> Message {
        NewMessage::text(
            chat_id(chat),
            user("alice"),
            MessageContent::new(content.to_string()).unwrap(),
        )
        .into_message(MessageId::new(id.to_string()).unwrap(), Timestamp::new(created_at))
    }

    #[tokio::test]
    async fn test_list_history_pages_backwards() {
        // テスト項目: before より古いメッセージが limit 件、古い順で返される
        // given (前提条件):
        let repo = create_test_repository();
        for i in 1..=5 {
            repo.insert(message(&format!("m{}", i), "c1", "hi", i * 100))
                .await
                .unwrap();
        }
        repo.insert(message("other", "c2", "hi", 150)).await.unwrap();

        // when (操作):
        let page = repo
            .list_history(&chat_id("c1"), Some(Timestamp::new(500)), 2)
            .await
            .unwrap();

        // then (期待する結果):
        let ids: Vec<&str> = page.messages.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["m3", "m4"]);
        assert!(page.has_more);
    }

    #[tokio::test]
    async fn test_list_history_without_more() {
        // テスト項目: 全件が収まる場合 has_more は false
        // given (前提条件):
        let repo = create_test_repository();
        repo.insert(message("m1", "c1", "hi", 100)).await.unwrap();

        // when (操作):
        let page = repo.list_history(&chat_id("c1"), None, 50).await.unwrap();

        // then (期待する結果):
        assert_eq!(page.messages.len(), 1);
        assert!(!page.has_more);
    }

    #[tokio::test]
    async fn test_search_case_insensitive_excludes_deleted() {
        // テスト項目: 検索は大文字小文字を区別せず、削除済みメッセージを含まない
        // given (前提条件):
        let repo = create_test_repository();
        repo.insert(message("m1", "c1", "Hello World", 100)).await.unwrap();
        repo.insert(message("m2", "c1", "say HELLO", 200)).await.unwrap();
        repo.insert(message("m3", "c1", "hello again", 300)).await.unwrap();
        repo.insert(message("m4", "c1", "bye", 400)).await.unwrap();
        repo.soft_delete(&MessageId::new("m3".to_string()).unwrap(), Timestamp::new(500))
            .await
            .unwrap();

        // when (操作):
        let page = repo.search(&[chat_id("c1")], "hello", 0, 1).await.unwrap();

        // then (期待する結果): 新しい順
        assert_eq!(page.total, 2);
        assert_eq!(page.messages.len(), 1);
        assert_eq!(page.messages[0].id.as_str(), "m2");
    }

    #[tokio::test]
    async fn test_expired_messages_are_hidden_and_purged() {
        // テスト項目: 期限切れメッセージは取得できず、purge で物理削除される
        // given (前提条件):
        let repo = create_test_repository();
        let id = MessageId::new("m1".to_string()).unwrap();
        repo.insert(message("m1", "c1", "secret", 100)).await.unwrap();
        repo.insert(message("m2", "c1", "kept", 200)).await.unwrap();
        repo.set_expiration(&id, 1, Timestamp::new(NOW - 5_000))
            .await
            .unwrap();

        // when (操作):
        let found = repo.find_by_id(&id).await.unwrap();
        let purged = repo.purge_expired(Timestamp::new(NOW)).await.unwrap();

        // then (期待する結果):
        assert!(found.is_none());
        assert_eq!(purged, 1);
        let page = repo.list_history(&chat_id("c1"), None, 50).await.unwrap();
        assert_eq!(page.messages.len(), 1);
        assert_eq!(page.messages[0].id.as_str(), "m2");
    }

    #[tokio::test]
    async fn test_read_receipts_for_chat_are_idempotent() {
        // テスト項目: チャット全体の既読は新規分のみカウントされる
        // given (前提条件):
        let repo = create_test_repository();
        repo.insert(message("m1", "c1", "a", 100)).await.unwrap();
        repo.insert(message("m2", "c1", "b", 200)).await.unwrap();
        repo.add_read_receipt(
            &MessageId::new("m1".to_string()).unwrap(),
            &user("bob"),
            Timestamp::new(300),
        )
        .await
        .unwrap();

        // when (操作):
        let inserted = repo
            .add_read_receipts_for_chat(&chat_id("c1"), &user("bob"), Timestamp::new(400))
            .await
            .unwrap();
        let again = repo
            .add_read_receipts_for_chat(&chat_id("c1"), &user("bob"), Timestamp::new(500))
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(inserted, 1);
        assert_eq!(again, 0);
    }

    #[tokio::test]
    async fn test_mutating_unknown_message_fails() {
        // テスト項目: 存在しないメッセージへの操作は MessageNotFound
        // given (前提条件):
        let repo = create_test_repository();

        // when (操作):
        let result = repo
            .toggle_reaction(
                &MessageId::new("nope".to_string()).unwrap(),
                &user("alice"),
                &Emoji::new("👍".to_string()).unwrap(),
            )
            .await;

        // then (期待する結果):
        assert!(matches!(result, Err(RepositoryError::MessageNotFound(_))));
    }
}
