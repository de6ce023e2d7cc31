//! Realtime channel frames.
//!
//! Every frame is `{ "event": "<name>", "data": { ... } }`.

use serde::{Deserialize, Serialize};

use super::model::{MessageDto, NotificationDto, PresenceStatusDto, ReactionDto};

// ========================================
// client → server
// ========================================

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserOnlinePayload {
    pub user_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypingPayload {
    pub chat_id: String,
    pub user_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRoomPayload {
    pub chat_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ClientEvent {
    UserOnline(UserOnlinePayload),
    TypingStart(TypingPayload),
    TypingStop(TypingPayload),
    ChatJoin(ChatRoomPayload),
    ChatLeave(ChatRoomPayload),
}

impl ClientEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ClientEvent::UserOnline(_) => "user-online",
            ClientEvent::TypingStart(_) => "typing-start",
            ClientEvent::TypingStop(_) => "typing-stop",
            ClientEvent::ChatJoin(_) => "chat-join",
            ClientEvent::ChatLeave(_) => "chat-leave",
        }
    }
}

// ========================================
// server → client
// ========================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageNewPayload {
    pub chat_id: String,
    pub message: MessageDto,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageEditPayload {
    pub chat_id: String,
    pub message_id: String,
    pub new_content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageDeletePayload {
    pub chat_id: String,
    pub message_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageReactionPayload {
    pub message_id: String,
    pub reactions: Vec<ReactionDto>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagePinnedPayload {
    pub message_id: String,
    pub pinned: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pinned_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageReadPayload {
    pub message_id: String,
    pub user_id: String,
    pub read_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStatusPayload {
    pub user_id: String,
    pub status: PresenceStatusDto,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub event: String,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ServerEvent {
    MessageNew(MessageNewPayload),
    MessageEdit(MessageEditPayload),
    MessageDelete(MessageDeletePayload),
    MessageReaction(MessageReactionPayload),
    MessagePinned(MessagePinnedPayload),
    MessageRead(MessageReadPayload),
    NotificationNew(NotificationDto),
    UserStatus(UserStatusPayload),
    TypingStart(TypingPayload),
    TypingStop(TypingPayload),
    Error(ErrorPayload),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_client_event() {
        // テスト項目: クライアントイベントが event / data 形式から解析される
        // given (前提条件):
        let json = r#"{"event":"typing-start","data":{"chatId":"c1","userId":"alice"}}"#;

        // when (操作):
        let event: ClientEvent = serde_json::from_str(json).unwrap();

        // then (期待する結果):
        assert_eq!(
            event,
            ClientEvent::TypingStart(TypingPayload {
                chat_id: "c1".into(),
                user_id: "alice".into(),
            })
        );
        assert_eq!(event.name(), "typing-start");
    }

    #[test]
    fn test_malformed_client_event_rejected() {
        // テスト項目: 必須フィールドが欠けたペイロードは拒否される
        // given (前提条件):
        let missing_field = r#"{"event":"chat-join","data":{}}"#;
        let unknown_event = r#"{"event":"launch-rockets","data":{}}"#;

        // when (操作) / then (期待する結果):
        assert!(serde_json::from_str::<ClientEvent>(missing_field).is_err());
        assert!(serde_json::from_str::<ClientEvent>(unknown_event).is_err());
    }

    #[test]
    fn test_server_event_envelope() {
        // テスト項目: サーバーイベントが event / data 形式でシリアライズされる
        // given (前提条件):
        let event = ServerEvent::UserStatus(UserStatusPayload {
            user_id: "alice".into(),
            status: PresenceStatusDto::Offline,
        });

        // when (操作):
        let value = serde_json::to_value(&event).unwrap();

        // then (期待する結果):
        assert_eq!(
            value,
            serde_json::json!({
                "event": "user-status",
                "data": { "userId": "alice", "status": "offline" }
            })
        );
    }
}
