//! UseCase: メッセージ検索
//!
//! 削除されていないメッセージ本文の大文字小文字を区別しない部分一致。
//! `chat_id` を省略した場合はユーザーが参加している全てのチャットが対象。

use std::sync::Arc;

use crate::domain::{ChatId, ChatRepository, Message, MessageRepository, UserId};

use super::{access, error::MessageError};

pub const DEFAULT_SEARCH_LIMIT: usize = 20;
pub const MAX_SEARCH_LIMIT: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    /// 新しい順
    pub messages: Vec<Message>,
    pub total: usize,
    pub has_more: bool,
}

pub struct SearchMessagesUseCase {
    chats: Arc<dyn ChatRepository>,
    messages: Arc<dyn MessageRepository>,
}

impl SearchMessagesUseCase {
    pub fn new(chats: Arc<dyn ChatRepository>, messages: Arc<dyn MessageRepository>) -> Self {
        Self { chats, messages }
    }

    pub async fn execute(
        &self,
        user_id: &UserId,
        query: &str,
        chat_id: Option<&ChatId>,
        skip: Option<usize>,
        limit: Option<usize>,
    ) -> Result<SearchResult, MessageError> {
        // 空判定にのみ trim を使い、照合は入力そのままで行う
        if query.trim().is_empty() {
            return Err(MessageError::InvalidQuery(
                "Search query must not be empty".into(),
            ));
        }

        let chat_ids = match chat_id {
            Some(chat_id) => {
                access::participant_chat(self.chats.as_ref(), chat_id, user_id).await?;
                vec![chat_id.clone()]
            }
            None => self
                .chats
                .list_for_user(user_id)
                .await?
                .into_iter()
                .map(|chat| chat.id)
                .collect(),
        };

        let skip = skip.unwrap_or(0);
        let limit = limit
            .unwrap_or(DEFAULT_SEARCH_LIMIT)
            .clamp(1, MAX_SEARCH_LIMIT);
        let page = self.messages.search(&chat_ids, query, skip, limit).await?;

        let has_more = skip + page.messages.len() < page.total;
        Ok(SearchResult {
            messages: page.messages,
            total: page.total,
            has_more,
        })
    }
}
