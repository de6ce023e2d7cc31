//! HTTP API request and response bodies.
//!
//! Successful responses are `{ "ok": true, ...body }`; failures are
//! produced by `ui::error::ApiError`.

use serde::{Deserialize, Serialize};

use super::model::{
    AttachmentDto, ChatDto, MessageDto, MessageTypeDto, NotificationDto, PresenceStatusDto,
    ReactionDto,
};

/// Success envelope
#[derive(Debug, Serialize)]
pub struct OkResponse<T: Serialize> {
    pub ok: bool,
    #[serde(flatten)]
    pub body: T,
}

impl<T: Serialize> OkResponse<T> {
    pub fn new(body: T) -> Self {
        Self { ok: true, body }
    }
}

// ========================================
// Requests
// ========================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub chat_id: String,
    pub content: String,
    #[serde(default)]
    pub r#type: MessageTypeDto,
    #[serde(default)]
    pub attachments: Vec<AttachmentDto>,
    #[serde(default)]
    pub mentions: Vec<String>,
    #[serde(default)]
    pub reply_to: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EditMessageRequest {
    pub content: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReactionRequest {
    pub emoji: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForwardRequest {
    pub target_chat_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpireRequest {
    /// Signed so that non-positive values reach validation instead of failing to parse
    pub expires_in: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatusRequest {
    pub status: PresenceStatusDto,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<usize>,
    /// RFC 3339 timestamp; only messages created strictly before it are returned
    pub before: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    #[serde(default)]
    pub query: String,
    pub chat_id: Option<String>,
    pub limit: Option<usize>,
    pub skip: Option<usize>,
}

// ========================================
// Responses
// ========================================

#[derive(Debug, Serialize)]
pub struct MessageBody {
    pub message: MessageDto,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageListBody {
    pub messages: Vec<MessageDto>,
    pub has_more: bool,
}

#[derive(Debug, Serialize)]
pub struct PinnedBody {
    pub messages: Vec<MessageDto>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchBody {
    pub messages: Vec<MessageDto>,
    pub total: usize,
    pub has_more: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionsBody {
    pub message_id: String,
    pub reactions: Vec<ReactionDto>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadBody {
    pub message_id: String,
    pub user_id: String,
    pub read_at: String,
    /// `false` when the message was already read
    pub newly_read: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatReadBody {
    pub chat_id: String,
    pub marked: usize,
}

#[derive(Debug, Serialize)]
pub struct ChatsBody {
    pub chats: Vec<ChatDto>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationsBody {
    pub notifications: Vec<NotificationDto>,
    pub unread_count: usize,
}

#[derive(Debug, Serialize)]
pub struct NotificationBody {
    pub notification: NotificationDto,
}

#[derive(Debug, Serialize)]
pub struct CountBody {
    pub count: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresenceBody {
    pub user_id: String,
    pub online: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OnlineUsersBody {
    pub users: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusBody {
    pub user_id: String,
    pub status: PresenceStatusDto,
}

#[derive(Debug, Serialize)]
pub struct EmptyBody {}
