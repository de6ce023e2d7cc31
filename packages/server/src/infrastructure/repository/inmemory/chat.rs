//! InMemory Chat Repository 実装

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{Chat, ChatId, ChatRepository, LastMessage, RepositoryError, UserId};

/// インメモリ Chat Repository 実装
#[derive(Default)]
pub struct InMemoryChatRepository {
    chats: Mutex<HashMap<ChatId, Chat>>,
}

impl InMemoryChatRepository {
    /// 新しい InMemoryChatRepository を作成
    pub fn new() -> Self {
        Self::default()
    }

    /// 初期データ付きで作成
    pub fn with_chats(chats: Vec<Chat>) -> Self {
        let map = chats.into_iter().map(|c| (c.id.clone(), c)).collect();
        Self {
            chats: Mutex::new(map),
        }
    }
}

#[async_trait]
impl ChatRepository for InMemoryChatRepository {
    async fn insert(&self, chat: Chat) -> Result<(), RepositoryError> {
        let mut chats = self.chats.lock().await;
        chats.insert(chat.id.clone(), chat);
        Ok(())
    }

    async fn find_by_id(&self, chat_id: &ChatId) -> Result<Option<Chat>, RepositoryError> {
        let chats = self.chats.lock().await;
        Ok(chats.get(chat_id).cloned())
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Chat>, RepositoryError> {
        let chats = self.chats.lock().await;
        let mut list: Vec<Chat> = chats
            .values()
            .filter(|c| c.is_participant(user_id))
            .cloned()
            .collect();
        list.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(list)
    }

    async fn update_last_message(
        &self,
        chat_id: &ChatId,
        last_message: LastMessage,
    ) -> Result<(), RepositoryError> {
        let mut chats = self.chats.lock().await;
        let chat = chats
            .get_mut(chat_id)
            .ok_or_else(|| RepositoryError::ChatNotFound(chat_id.to_string()))?;
        chat.last_message = Some(last_message);
        Ok(())
    }
}
