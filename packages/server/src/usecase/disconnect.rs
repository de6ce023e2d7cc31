//! UseCase: 接続の切断
//!
//! ## テスト観点
//! - 最後の接続が切れたときだけ `user-status: offline` が配信される
//! - 切断した接続は全てのルームと MessagePusher から取り除かれる

use std::sync::Arc;

use crate::domain::{
    ConnectionId, ConnectionRegistry, Departure, DomainEvent, MessagePusher, PresenceStatus,
    RoomMembership,
};

use super::dispatcher::Dispatcher;

/// 接続切断のユースケース
pub struct DisconnectUseCase {
    registry: Arc<dyn ConnectionRegistry>,
    rooms: Arc<dyn RoomMembership>,
    message_pusher: Arc<dyn MessagePusher>,
    dispatcher: Arc<Dispatcher>,
}

impl DisconnectUseCase {
    pub fn new(
        registry: Arc<dyn ConnectionRegistry>,
        rooms: Arc<dyn RoomMembership>,
        message_pusher: Arc<dyn MessagePusher>,
        dispatcher: Arc<Dispatcher>,
    ) -> Self {
        Self {
            registry,
            rooms,
            message_pusher,
            dispatcher,
        }
    }

    /// 切断を実行
    ///
    /// レジストリの更新は offline の配信より先に行う。未登録の接続は何もしない。
    pub async fn execute(&self, connection_id: &ConnectionId) -> Option<Departure> {
        self.rooms.leave_all(connection_id).await;
        self.message_pusher
            .unregister_connection(connection_id)
            .await;

        let departure = self.registry.unregister(connection_id).await?;
        if departure.went_offline {
            tracing::info!("User '{}' is offline", departure.user_id);
            self.dispatcher
                .to_all(&DomainEvent::UserStatus {
                    user_id: departure.user_id.clone(),
                    status: PresenceStatus::Offline,
                })
                .await;
        }
        Some(departure)
    }
}
