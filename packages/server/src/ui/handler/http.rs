//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
};
use serde::Serialize;

use crate::{
    domain::{ChatId, Message, MessageId, NotificationId, Timestamp, UserId},
    infrastructure::dto::{
        http::{
            ChatReadBody, ChatsBody, CountBody, EditMessageRequest, EmptyBody, ExpireRequest,
            ForwardRequest, HistoryQuery, MessageBody, MessageListBody, NotificationBody,
            NotificationsBody, OkResponse, OnlineUsersBody, PinnedBody, PresenceBody,
            ReactionRequest, ReactionsBody, ReadBody, SearchBody, SearchQuery,
            SendMessageRequest, StatusBody, StatusRequest,
        },
        model::MessageDto,
    },
    ui::{auth::AuthUser, error::ApiError, state::AppState},
    usecase::{MessageError, SendMessageCommand},
};
use hearth_shared::time::{rfc3339_to_timestamp, timestamp_to_rfc3339};

type ApiResult<T> = Result<Json<OkResponse<T>>, ApiError>;

fn ok<T: Serialize>(body: T) -> ApiResult<T> {
    Ok(Json(OkResponse::new(body)))
}

fn message_body(message: &Message) -> MessageBody {
    MessageBody {
        message: MessageDto::from(message),
    }
}

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

// ========================================
// Chats and messages
// ========================================

/// Chats the caller participates in
pub async fn list_chats(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<ChatsBody> {
    let chats = state.get_messages_usecase.chats(&user_id).await?;
    ok(ChatsBody {
        chats: chats.iter().map(Into::into).collect(),
    })
}

pub async fn send_message(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    payload: Result<Json<SendMessageRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<OkResponse<MessageBody>>), ApiError> {
    let Json(request) = payload?;

    // DTO から Domain Model への変換
    let command = SendMessageCommand {
        sender_id: user_id,
        chat_id: ChatId::new(request.chat_id)?,
        content: request.content,
        kind: request.r#type.into(),
        attachments: request.attachments.into_iter().map(Into::into).collect(),
        mentions: request
            .mentions
            .into_iter()
            .map(UserId::new)
            .collect::<Result<_, _>>()?,
        reply_to: request.reply_to.map(MessageId::new).transpose()?,
    };

    let message = state.send_message_usecase.execute(command).await?;
    Ok((
        StatusCode::CREATED,
        Json(OkResponse::new(message_body(&message))),
    ))
}

pub async fn get_history(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(chat_id): Path<String>,
    query: Result<Query<HistoryQuery>, QueryRejection>,
) -> ApiResult<MessageListBody> {
    let Query(query) = query?;
    let chat_id = ChatId::new(chat_id)?;
    let before = query
        .before
        .map(|value| {
            rfc3339_to_timestamp(&value).map(Timestamp::new).ok_or_else(|| {
                MessageError::InvalidQuery(format!("'{value}' is not an RFC 3339 timestamp"))
            })
        })
        .transpose()?;

    let page = state
        .get_messages_usecase
        .history(&user_id, &chat_id, query.limit, before)
        .await?;
    ok(MessageListBody {
        messages: page.messages.iter().map(Into::into).collect(),
        has_more: page.has_more,
    })
}

pub async fn get_pinned(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(chat_id): Path<String>,
) -> ApiResult<PinnedBody> {
    let chat_id = ChatId::new(chat_id)?;
    let messages = state.get_messages_usecase.pinned(&user_id, &chat_id).await?;
    ok(PinnedBody {
        messages: messages.iter().map(Into::into).collect(),
    })
}

pub async fn search_messages(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> ApiResult<SearchBody> {
    let Query(query) = query?;
    let chat_id = query.chat_id.map(ChatId::new).transpose()?;
    let result = state
        .search_messages_usecase
        .execute(
            &user_id,
            &query.query,
            chat_id.as_ref(),
            query.skip,
            query.limit,
        )
        .await?;
    ok(SearchBody {
        messages: result.messages.iter().map(Into::into).collect(),
        total: result.total,
        has_more: result.has_more,
    })
}

pub async fn edit_message(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(message_id): Path<String>,
    payload: Result<Json<EditMessageRequest>, JsonRejection>,
) -> ApiResult<MessageBody> {
    let Json(request) = payload?;
    let message_id = MessageId::new(message_id)?;
    let message = state
        .edit_message_usecase
        .edit(&message_id, &user_id, request.content)
        .await?;
    ok(message_body(&message))
}

pub async fn delete_message(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(message_id): Path<String>,
) -> ApiResult<MessageBody> {
    let message_id = MessageId::new(message_id)?;
    let message = state
        .edit_message_usecase
        .delete(&message_id, &user_id)
        .await?;
    ok(message_body(&message))
}

pub async fn pin_message(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(message_id): Path<String>,
) -> ApiResult<MessageBody> {
    let message_id = MessageId::new(message_id)?;
    let message = state.pin_message_usecase.pin(&message_id, &user_id).await?;
    ok(message_body(&message))
}

pub async fn unpin_message(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(message_id): Path<String>,
) -> ApiResult<MessageBody> {
    let message_id = MessageId::new(message_id)?;
    let message = state
        .pin_message_usecase
        .unpin(&message_id, &user_id)
        .await?;
    ok(message_body(&message))
}

pub async fn toggle_reaction(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(message_id): Path<String>,
    payload: Result<Json<ReactionRequest>, JsonRejection>,
) -> ApiResult<ReactionsBody> {
    let Json(request) = payload?;
    let message_id = MessageId::new(message_id)?;
    let message = state
        .toggle_reaction_usecase
        .execute(&message_id, &user_id, &request.emoji)
        .await?;
    ok(ReactionsBody {
        message_id: message.id.as_str().to_string(),
        reactions: message.reactions.iter().map(Into::into).collect(),
    })
}

pub async fn mark_message_read(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(message_id): Path<String>,
) -> ApiResult<ReadBody> {
    let message_id = MessageId::new(message_id)?;
    let outcome = state
        .mark_read_usecase
        .message(&message_id, &user_id)
        .await?;
    ok(ReadBody {
        message_id: outcome.message_id.as_str().to_string(),
        user_id: outcome.receipt.user_id.as_str().to_string(),
        read_at: timestamp_to_rfc3339(outcome.receipt.read_at.value()),
        newly_read: outcome.newly_read,
    })
}

pub async fn mark_chat_read(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(chat_id): Path<String>,
) -> ApiResult<ChatReadBody> {
    let chat_id = ChatId::new(chat_id)?;
    let marked = state.mark_read_usecase.chat(&chat_id, &user_id).await?;
    ok(ChatReadBody {
        chat_id: chat_id.into_string(),
        marked,
    })
}

pub async fn forward_message(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(message_id): Path<String>,
    payload: Result<Json<ForwardRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<OkResponse<MessageBody>>), ApiError> {
    let Json(request) = payload?;
    let message_id = MessageId::new(message_id)?;
    let target_chat_id = ChatId::new(request.target_chat_id)?;
    let message = state
        .forward_message_usecase
        .execute(&message_id, &user_id, &target_chat_id)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(OkResponse::new(message_body(&message))),
    ))
}

pub async fn set_expiration(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(message_id): Path<String>,
    payload: Result<Json<ExpireRequest>, JsonRejection>,
) -> ApiResult<MessageBody> {
    let Json(request) = payload?;
    let message_id = MessageId::new(message_id)?;
    let message = state
        .set_expiration_usecase
        .execute(&message_id, &user_id, request.expires_in)
        .await?;
    ok(message_body(&message))
}

// ========================================
// Notifications
// ========================================

pub async fn list_notifications(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<NotificationsBody> {
    let list = state.notifications_usecase.list(&user_id).await?;
    ok(NotificationsBody {
        notifications: list.notifications.iter().map(Into::into).collect(),
        unread_count: list.unread_count,
    })
}

pub async fn mark_notification_read(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(notification_id): Path<String>,
) -> ApiResult<NotificationBody> {
    let notification_id = NotificationId::new(notification_id)?;
    let notification = state
        .notifications_usecase
        .mark_read(&notification_id, &user_id)
        .await?;
    ok(NotificationBody {
        notification: (&notification).into(),
    })
}

pub async fn mark_all_notifications_read(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<CountBody> {
    let count = state.notifications_usecase.mark_all_read(&user_id).await?;
    ok(CountBody { count })
}

pub async fn delete_notification(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(notification_id): Path<String>,
) -> ApiResult<EmptyBody> {
    let notification_id = NotificationId::new(notification_id)?;
    state
        .notifications_usecase
        .delete(&notification_id, &user_id)
        .await?;
    ok(EmptyBody {})
}

pub async fn delete_all_notifications(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<CountBody> {
    let count = state.notifications_usecase.delete_all(&user_id).await?;
    ok(CountBody { count })
}

// ========================================
// Presence
// ========================================

pub async fn set_status(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    payload: Result<Json<StatusRequest>, JsonRejection>,
) -> ApiResult<StatusBody> {
    let Json(request) = payload?;
    let status = state
        .set_user_status_usecase
        .execute(user_id.clone(), request.status.into())
        .await;
    ok(StatusBody {
        user_id: user_id.into_string(),
        status: status.into(),
    })
}

pub async fn online_users(
    State(state): State<Arc<AppState>>,
    AuthUser(_): AuthUser,
) -> ApiResult<OnlineUsersBody> {
    let users = state.get_presence_usecase.online_users().await;
    ok(OnlineUsersBody {
        users: users.into_iter().map(UserId::into_string).collect(),
    })
}

pub async fn user_presence(
    State(state): State<Arc<AppState>>,
    AuthUser(_): AuthUser,
    Path(user_id): Path<String>,
) -> ApiResult<PresenceBody> {
    let user_id = UserId::new(user_id)?;
    let online = state.get_presence_usecase.is_online(&user_id).await;
    ok(PresenceBody {
        user_id: user_id.into_string(),
        online,
    })
}
