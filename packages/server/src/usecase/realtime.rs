//! UseCase: チャットルームの購読と入力中シグナル
//!
//! どちらもリアルタイムチャンネルからのみ呼ばれ、永続化は行わない。

use std::sync::Arc;

use crate::domain::{
    ChatId, ChatRepository, ConnectionId, DomainEvent, RoomId, RoomMembership, UserId,
};

use super::{dispatcher::Dispatcher, error::RealtimeError};

/// 未知のチャットも参加者なしとして扱う
async fn require_participant(
    chats: &dyn ChatRepository,
    chat_id: &ChatId,
    user_id: &UserId,
) -> Result<(), RealtimeError> {
    let chat = chats
        .find_by_id(chat_id)
        .await
        .map_err(|e| RealtimeError::Internal(e.to_string()))?;
    if !chat.is_some_and(|c| c.is_participant(user_id)) {
        return Err(RealtimeError::NotParticipant);
    }
    Ok(())
}

/// `chat-join` / `chat-leave` のユースケース
pub struct ChatSubscriptionUseCase {
    chats: Arc<dyn ChatRepository>,
    rooms: Arc<dyn RoomMembership>,
}

impl ChatSubscriptionUseCase {
    pub fn new(chats: Arc<dyn ChatRepository>, rooms: Arc<dyn RoomMembership>) -> Self {
        Self { chats, rooms }
    }

    /// チャットのルームに参加する。参加者でないチャットには参加できない。
    pub async fn join(
        &self,
        connection_id: &ConnectionId,
        user_id: &UserId,
        chat_id: &str,
    ) -> Result<ChatId, RealtimeError> {
        let chat_id = ChatId::new(chat_id.to_string())?;
        require_participant(self.chats.as_ref(), &chat_id, user_id).await?;

        self.rooms.join(connection_id, &RoomId::chat(&chat_id)).await;
        tracing::debug!("Connection '{}' joined chat '{}'", connection_id, chat_id);
        Ok(chat_id)
    }

    pub async fn leave(
        &self,
        connection_id: &ConnectionId,
        chat_id: &str,
    ) -> Result<ChatId, RealtimeError> {
        let chat_id = ChatId::new(chat_id.to_string())?;
        self.rooms
            .leave(connection_id, &RoomId::chat(&chat_id))
            .await;
        Ok(chat_id)
    }
}

/// `typing-start` / `typing-stop` のユースケース
///
/// 送信元の接続を除くチャットルームに中継するだけで、期限切れの管理はしない。
/// 中継できるのはそのチャットの参加者のみ。
pub struct TypingUseCase {
    chats: Arc<dyn ChatRepository>,
    dispatcher: Arc<Dispatcher>,
}

impl TypingUseCase {
    pub fn new(chats: Arc<dyn ChatRepository>, dispatcher: Arc<Dispatcher>) -> Self {
        Self { chats, dispatcher }
    }

    pub async fn execute(
        &self,
        origin: &ConnectionId,
        authenticated: &UserId,
        chat_id: &str,
        claimed_user_id: &str,
        typing: bool,
    ) -> Result<(), RealtimeError> {
        let chat_id = ChatId::new(chat_id.to_string())?;
        let user_id = UserId::new(claimed_user_id.to_string())?;
        if &user_id != authenticated {
            return Err(RealtimeError::IdentityMismatch);
        }
        require_participant(self.chats.as_ref(), &chat_id, &user_id).await?;

        let room_id = RoomId::chat(&chat_id);
        let event = if typing {
            DomainEvent::TypingStart { chat_id, user_id }
        } else {
            DomainEvent::TypingStop { chat_id, user_id }
        };
        self.dispatcher
            .to_room_except(&room_id, Some(origin), &event)
            .await;
        Ok(())
    }
}
