//! Server execution logic.

use std::sync::Arc;

use axum::{
    Router,
    routing::{delete, get, post, put},
};
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;

use super::{
    handler::{
        delete_all_notifications, delete_message, delete_notification, edit_message,
        forward_message, get_history, get_pinned, health_check, list_chats, list_notifications,
        mark_all_notifications_read, mark_chat_read, mark_message_read, mark_notification_read,
        online_users, pin_message, search_messages, send_message, set_expiration, set_status,
        toggle_reaction, unpin_message, user_presence, websocket_handler,
    },
    signal::shutdown_signal,
    state::AppState,
};

/// Builds the application router.
///
/// Exposed separately from [`Server`] so tests can serve it on an ephemeral port.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // WebSocket エンドポイント
        .route("/ws", get(websocket_handler))
        // HTTP エンドポイント
        .route("/api/health", get(health_check))
        .route("/chats", get(list_chats))
        .route("/messages/send", post(send_message))
        .route("/messages/search", get(search_messages))
        .route("/messages/history/{chat_id}", get(get_history))
        .route("/messages/pinned/{chat_id}", get(get_pinned))
        .route("/messages/chat/{chat_id}/read", post(mark_chat_read))
        .route(
            "/messages/{message_id}",
            put(edit_message).delete(delete_message),
        )
        .route(
            "/messages/{message_id}/pin",
            post(pin_message).delete(unpin_message),
        )
        .route("/messages/{message_id}/reactions", post(toggle_reaction))
        .route("/messages/{message_id}/read", post(mark_message_read))
        .route("/messages/{message_id}/forward", post(forward_message))
        .route("/messages/{message_id}/expire", post(set_expiration))
        .route(
            "/notifications",
            get(list_notifications).delete(delete_all_notifications),
        )
        .route("/notifications/read-all", post(mark_all_notifications_read))
        .route(
            "/notifications/{notification_id}",
            delete(delete_notification),
        )
        .route(
            "/notifications/{notification_id}/read",
            post(mark_notification_read),
        )
        .route("/users/me/status", put(set_status))
        .route("/users/online", get(online_users))
        .route("/users/{user_id}/presence", get(user_presence))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Realtime chat server
///
/// # Example
///
/// ```ignore
/// let state = Arc::new(AppState::new(Dependencies::in_memory(users, chats, clock), &config));
/// Server::new(state).run(&config).await?;
/// ```
pub struct Server {
    state: Arc<AppState>,
}

impl Server {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    /// Run the server until a shutdown signal arrives
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the configured address or
    /// if there's an error during server execution.
    pub async fn run(self, config: &ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
        let app = build_router(self.state);

        // Bind the server to the host and port
        let bind_addr = config.bind_addr();
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        tracing::info!("Chat server listening on {}", listener.local_addr()?);
        tracing::info!("Connect to: ws://{}/ws?token=<token>", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
