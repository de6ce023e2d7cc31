//! Broadcast / notification dispatcher
//!
//! ルーム単位のファンアウト、ユーザー個別の送信、通知の永続化をまとめる。
//! 呼び出し元から見て全ての配信は fire-and-forget であり、失敗はログに
//! 残すだけで呼び出し元には返さない。

use std::sync::Arc;

use crate::domain::{
    ConnectionId, DomainEvent, MessagePusher, Notification, NotificationRepository, RoomId,
    RoomMembership, UserId,
};

pub struct Dispatcher {
    rooms: Arc<dyn RoomMembership>,
    message_pusher: Arc<dyn MessagePusher>,
    notifications: Arc<dyn NotificationRepository>,
}

impl Dispatcher {
    pub fn new(
        rooms: Arc<dyn RoomMembership>,
        message_pusher: Arc<dyn MessagePusher>,
        notifications: Arc<dyn NotificationRepository>,
    ) -> Self {
        Self {
            rooms,
            message_pusher,
            notifications,
        }
    }

    /// ルームの全ての接続に配信
    pub async fn to_room(&self, room_id: &RoomId, event: &DomainEvent) {
        self.to_room_except(room_id, None, event).await;
    }

    /// ルームの接続のうち `exclude` 以外に配信
    pub async fn to_room_except(
        &self,
        room_id: &RoomId,
        exclude: Option<&ConnectionId>,
        event: &DomainEvent,
    ) {
        let targets: Vec<ConnectionId> = self
            .rooms
            .members(room_id)
            .await
            .into_iter()
            .filter(|id| Some(id) != exclude)
            .collect();
        if targets.is_empty() {
            tracing::debug!("No subscribers in room '{}' for '{}'", room_id, event.name());
            return;
        }

        if let Err(e) = self.message_pusher.broadcast(targets, event).await {
            tracing::warn!("Failed to deliver '{}' to room '{}': {}", event.name(), room_id, e);
        }
    }

    /// ユーザーの個人ルームに配信
    pub async fn to_user(&self, user_id: &UserId, event: &DomainEvent) {
        self.to_room(&RoomId::personal(user_id), event).await;
    }

    /// 接続中の全てのクライアントに配信
    pub async fn to_all(&self, event: &DomainEvent) {
        let targets = self.message_pusher.connection_ids().await;
        if let Err(e) = self.message_pusher.broadcast(targets, event).await {
            tracing::warn!("Failed to deliver '{}' to all connections: {}", event.name(), e);
        }
    }

    /// 特定の接続にのみ配信
    pub async fn to_connection(&self, connection_id: &ConnectionId, event: &DomainEvent) {
        if let Err(e) = self.message_pusher.push_to(connection_id, event).await {
            tracing::warn!(
                "Failed to deliver '{}' to connection '{}': {}",
                event.name(),
                connection_id,
                e
            );
        }
    }

    /// 通知を保存し、所有ユーザーの個人ルームに `notification-new` を配信
    ///
    /// 保存に失敗してもリアルタイム配信は行う。
    pub async fn notify(&self, notification: Notification) {
        if let Err(e) = self.notifications.insert(notification.clone()).await {
            tracing::warn!(
                "Failed to persist notification for '{}': {}",
                notification.user_id,
                e
            );
        }
        let user_id = notification.user_id.clone();
        self.to_user(&user_id, &DomainEvent::NotificationNew(Box::new(notification)))
            .await;
    }
}
