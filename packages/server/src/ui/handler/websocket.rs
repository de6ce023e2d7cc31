//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        Query, State,
        rejection::QueryRejection,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::{HeaderMap, header},
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;

use crate::{
    domain::{ConnectionId, DomainEvent, IdFactory, UserId},
    infrastructure::dto::websocket::ClientEvent,
    ui::{
        auth::bearer_token,
        error::ApiError,
        state::AppState,
    },
    usecase::RealtimeError,
};

/// Query parameters for WebSocket connection
#[derive(Debug, Default, Deserialize)]
pub struct ConnectQuery {
    pub token: Option<String>,
}

/// Upgrades an authenticated request to a realtime connection.
///
/// The token is read from `?token=` first, then from the `Authorization` header.
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    query: Result<Query<ConnectQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(query) = query?;
    let token = query
        .token
        .or_else(|| {
            headers
                .get(header::AUTHORIZATION)
                .and_then(|value| value.to_str().ok())
                .and_then(bearer_token)
                .map(str::to_string)
        })
        .ok_or(ApiError::Unauthorized)?;

    let user_id = match state.token_resolver.resolve(&token).await {
        Some(user_id) => user_id,
        None => {
            tracing::warn!("Rejected realtime connection with an unknown token");
            return Err(ApiError::Unauthorized);
        }
    };

    let connection_id = IdFactory::connection_id();
    tracing::info!("User '{}' opened connection '{}'", user_id, connection_id);
    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, connection_id, user_id)))
}

/// Spawns a task that forwards frames queued for this connection to the WebSocket sink.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if sender.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(
    socket: WebSocket,
    state: Arc<AppState>,
    connection_id: ConnectionId,
    user_id: UserId,
) {
    let (sender, mut receiver) = socket.split();

    let (tx, rx) = mpsc::unbounded_channel();
    state.connect_usecase.open(connection_id.clone(), tx).await;
    let mut send_task = pusher_loop(rx, sender);

    let state_clone = state.clone();
    let connection_id_clone = connection_id.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!("WebSocket error on '{}': {}", connection_id_clone, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    handle_frame(&state_clone, &connection_id_clone, &user_id, text.as_str())
                        .await;
                }
                Message::Close(_) => {
                    tracing::debug!("Connection '{}' requested close", connection_id_clone);
                    break;
                }
                _ => {}
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    match state.disconnect_usecase.execute(&connection_id).await {
        Some(departure) => tracing::info!(
            "Connection '{}' of '{}' closed (offline: {})",
            connection_id,
            departure.user_id,
            departure.went_offline
        ),
        None => tracing::debug!("Anonymous connection '{}' closed", connection_id),
    }
}

/// Handles one inbound frame; failures are reported to this connection only.
async fn handle_frame(
    state: &AppState,
    connection_id: &ConnectionId,
    user_id: &UserId,
    text: &str,
) {
    let event = match serde_json::from_str::<ClientEvent>(text) {
        Ok(event) => event,
        Err(e) => {
            tracing::debug!("Malformed frame on '{}': {}", connection_id, e);
            let error = RealtimeError::InvalidPayload(e.to_string());
            reject(state, connection_id, event_name(text), error).await;
            return;
        }
    };

    let name = event.name();
    let result = match event {
        ClientEvent::UserOnline(payload) => state
            .connect_usecase
            .announce(connection_id, user_id, &payload.user_id)
            .await
            .map(|_| ()),
        ClientEvent::TypingStart(payload) => {
            state
                .typing_usecase
                .execute(connection_id, user_id, &payload.chat_id, &payload.user_id, true)
                .await
        }
        ClientEvent::TypingStop(payload) => {
            state
                .typing_usecase
                .execute(connection_id, user_id, &payload.chat_id, &payload.user_id, false)
                .await
        }
        ClientEvent::ChatJoin(payload) => state
            .chat_subscription_usecase
            .join(connection_id, user_id, &payload.chat_id)
            .await
            .map(|_| ()),
        ClientEvent::ChatLeave(payload) => state
            .chat_subscription_usecase
            .leave(connection_id, &payload.chat_id)
            .await
            .map(|_| ()),
    };

    if let Err(error) = result {
        reject(state, connection_id, name.to_string(), error).await;
    }
}

async fn reject(
    state: &AppState,
    connection_id: &ConnectionId,
    event: String,
    error: RealtimeError,
) {
    tracing::debug!("Rejected '{}' on '{}': {}", event, connection_id, error);
    state
        .dispatcher
        .to_connection(
            connection_id,
            &DomainEvent::Rejected {
                event,
                error: error.to_string(),
            },
        )
        .await;
}

/// Best-effort event name of a frame that failed to parse
fn event_name(text: &str) -> String {
    serde_json::from_str::<serde_json::Value>(text)
        .ok()
        .and_then(|value| value.get("event")?.as_str().map(str::to_string))
        .unwrap_or_else(|| "unknown".to_string())
}
