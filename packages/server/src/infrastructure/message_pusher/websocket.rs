//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - 接続ごとの `UnboundedSender` を管理
//! - `DomainEvent` を `{"event": ..., "data": ...}` 形式の JSON にエンコードして送信
//!
//! WebSocket の生成は UI 層（`ui/handler/websocket.rs`）で行われます。
//! この実装は生成された sender を受け取り、送信にのみ使用します。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{
    domain::{ConnectionId, DomainEvent, MessagePushError, MessagePusher, PusherChannel},
    infrastructure::dto::websocket::ServerEvent,
};

/// WebSocket を使った MessagePusher 実装
pub struct WebSocketMessagePusher {
    /// 接続中の WebSocket sender
    connections: Arc<Mutex<HashMap<ConnectionId, PusherChannel>>>,
}

impl Default for WebSocketMessagePusher {
    fn default() -> Self {
        Self::new(Arc::new(Mutex::new(HashMap::new())))
    }
}

impl WebSocketMessagePusher {
    pub fn new(connections: Arc<Mutex<HashMap<ConnectionId, PusherChannel>>>) -> Self {
        Self { connections }
    }

    fn encode(event: &DomainEvent) -> Result<String, MessagePushError> {
        serde_json::to_string(&ServerEvent::from(event))
            .map_err(|e| MessagePushError::Encode(e.to_string()))
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_connection(&self, connection_id: ConnectionId, sender: PusherChannel) {
        let mut connections = self.connections.lock().await;
        tracing::debug!("Connection '{}' registered to MessagePusher", connection_id);
        connections.insert(connection_id, sender);
    }

    async fn unregister_connection(&self, connection_id: &ConnectionId) {
        let mut connections = self.connections.lock().await;
        connections.remove(connection_id);
        tracing::debug!("Connection '{}' unregistered from MessagePusher", connection_id);
    }

    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        event: &DomainEvent,
    ) -> Result<(), MessagePushError> {
        let frame = Self::encode(event)?;
        let connections = self.connections.lock().await;

        match connections.get(connection_id) {
            Some(sender) => {
                sender
                    .send(frame)
                    .map_err(|e| MessagePushError::PushFailed(e.to_string()))?;
                tracing::debug!("Pushed '{}' to connection '{}'", event.name(), connection_id);
                Ok(())
            }
            None => Err(MessagePushError::ConnectionNotFound(
                connection_id.to_string(),
            )),
        }
    }

    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        event: &DomainEvent,
    ) -> Result<(), MessagePushError> {
        if targets.is_empty() {
            return Ok(());
        }
        let frame = Self::encode(event)?;
        let connections = self.connections.lock().await;

        for target in targets {
            match connections.get(&target) {
                // ブロードキャストでは一部の送信失敗を許容
                Some(sender) => {
                    if let Err(e) = sender.send(frame.clone()) {
                        tracing::warn!("Failed to push '{}' to '{}': {}", event.name(), target, e);
                    }
                }
                None => {
                    tracing::warn!("Connection '{}' not found during broadcast, skipping", target);
                }
            }
        }

        Ok(())
    }

    async fn connection_ids(&self) -> Vec<ConnectionId> {
        let connections = self.connections.lock().await;
        connections.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ChatId, UserId};
    use tokio::sync::mpsc;

    fn create_test_pusher() -> (
        WebSocketMessagePusher,
        Arc<Mutex<HashMap<ConnectionId, PusherChannel>>>,
    ) {
        let connections = Arc::new(Mutex::new(HashMap::new()));
        let pusher = WebSocketMessagePusher::new(connections.clone());
        (pusher, connections)
    }

    fn conn(id: &str) -> ConnectionId {
        ConnectionId::new(id.to_string()).unwrap()
    }

    fn typing_event() -> DomainEvent {
        DomainEvent::TypingStart {
            chat_id: ChatId::new("c1".to_string()).unwrap(),
            user_id: UserId::new("alice".to_string()).unwrap(),
        }
    }

    const TYPING_FRAME: &str =
        r#"{"event":"typing-start","data":{"chatId":"c1","userId":"alice"}}"#;

    #[tokio::test]
    async fn test_push_to_success() {
        // テスト項目: 特定の接続にエンコード済みイベントを送信できる
        // given (前提条件):
        let (pusher, _connections) = create_test_pusher();
        let (tx, mut rx) = mpsc::unbounded_channel();
        pusher.register_connection(conn("c-1"), tx).await;

        // when (操作):
        let result = pusher.push_to(&conn("c-1"), &typing_event()).await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(rx.recv().await, Some(TYPING_FRAME.to_string()));
    }

    #[tokio::test]
    async fn test_push_to_connection_not_found() {
        // テスト項目: 存在しない接続への送信はエラーを返す
        // given (前提条件):
        let (pusher, _connections) = create_test_pusher();

        // when (操作):
        let result = pusher.push_to(&conn("missing"), &typing_event()).await;

        // then (期待する結果):
        assert!(matches!(
            result,
            Err(MessagePushError::ConnectionNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_broadcast_partial_failure() {
        // テスト項目: 一部の接続が存在しない・閉じていても残りには届く
        // given (前提条件):
        let (pusher, connections) = create_test_pusher();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, rx2) = mpsc::unbounded_channel();
        {
            let mut lock = connections.lock().await;
            lock.insert(conn("c-1"), tx1);
            lock.insert(conn("c-2"), tx2);
        }
        drop(rx2);

        // when (操作):
        let targets = vec![conn("c-1"), conn("c-2"), conn("missing")];
        let result = pusher.broadcast(targets, &typing_event()).await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(rx1.recv().await, Some(TYPING_FRAME.to_string()));
    }

    #[tokio::test]
    async fn test_unregister_connection() {
        // テスト項目: 登録解除した接続は一覧から消える
        // given (前提条件):
        let (pusher, _connections) = create_test_pusher();
        let (tx, _rx) = mpsc::unbounded_channel();
        pusher.register_connection(conn("c-1"), tx).await;

        // when (操作):
        pusher.unregister_connection(&conn("c-1")).await;

        // then (期待する結果):
        assert!(pusher.connection_ids().await.is_empty());
    }
}
