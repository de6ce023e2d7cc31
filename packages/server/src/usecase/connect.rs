//! UseCase: 接続の確立と `user-online` によるオンライン登録
//!
//! ## テスト観点
//! - 最初の接続でのみ `user-status: online` が全接続に配信される
//! - 認証済みユーザーと異なる userId の申告は拒否される
//! - 個人ルームへの参加

use std::sync::Arc;

use crate::domain::{
    ConnectionId, ConnectionRegistry, DomainEvent, MessagePusher, PresenceStatus, PusherChannel,
    RoomId, RoomMembership, UserId,
};

use super::{dispatcher::Dispatcher, error::RealtimeError};

/// 接続確立のユースケース
pub struct ConnectUseCase {
    registry: Arc<dyn ConnectionRegistry>,
    rooms: Arc<dyn RoomMembership>,
    message_pusher: Arc<dyn MessagePusher>,
    dispatcher: Arc<Dispatcher>,
}

impl ConnectUseCase {
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

    /// トランスポート接続時: 送信チャンネルを登録する
    pub async fn open(&self, connection_id: ConnectionId, sender: PusherChannel) {
        self.message_pusher
            .register_connection(connection_id, sender)
            .await;
    }

    /// `user-online` 受信時: 接続をユーザーに紐付け、個人ルームに参加させる
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - ユーザーの最初の接続（online を配信した）
    /// * `Ok(false)` - 既にオンライン
    /// * `Err(RealtimeError)` - 申告された userId が不正
    pub async fn announce(
        &self,
        connection_id: &ConnectionId,
        authenticated: &UserId,
        claimed_user_id: &str,
    ) -> Result<bool, RealtimeError> {
        let claimed = UserId::new(claimed_user_id.to_string())?;
        if &claimed != authenticated {
            return Err(RealtimeError::IdentityMismatch);
        }

        let first = self.registry.register(&claimed, connection_id).await;
        self.rooms
            .join(connection_id, &RoomId::personal(&claimed))
            .await;

        if first {
            tracing::info!("User '{}' is online", claimed);
            self.dispatcher
                .to_all(&DomainEvent::UserStatus {
                    user_id: claimed,
                    status: PresenceStatus::Online,
                })
                .await;
        }
        Ok(first)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecase::testing::{conn, drain, events_named, user, Fixture};
    use tokio::sync::mpsc;

    fn create_usecase(fixture: &Fixture) -> ConnectUseCase {
        ConnectUseCase::new(
            fixture.registry.clone(),
            fixture.rooms.clone(),
            fixture.pusher.clone(),
            fixture.dispatcher(),
        )
    }

    #[tokio::test]
    async fn test_first_connection_broadcasts_online() {
        // テスト項目: 最初の接続で online が全接続に配信され、2 本目では配信されない
        // given (前提条件):
        let fixture = Fixture::new().await;
        let usecase = create_usecase(&fixture);
        let mut bob_rx = fixture.connect("conn-b", "bob", &[]).await;
        let (tx1, _rx1) = mpsc::unbounded_channel();
        let (tx2, _rx2) = mpsc::unbounded_channel();
        usecase.open(conn("conn-a1"), tx1).await;
        usecase.open(conn("conn-a2"), tx2).await;

        // when (操作):
        let first = usecase
            .announce(&conn("conn-a1"), &user("alice"), "alice")
            .await;
        let second = usecase
            .announce(&conn("conn-a2"), &user("alice"), "alice")
            .await;

        // then (期待する結果):
        assert_eq!(first, Ok(true));
        assert_eq!(second, Ok(false));
        let statuses = events_named(&drain(&mut bob_rx), "user-status");
        assert_eq!(statuses.len(), 1);
        assert_eq!(statuses[0]["data"]["userId"], "alice");
        assert_eq!(statuses[0]["data"]["status"], "online");
        assert_eq!(
            fixture.rooms.members(&RoomId::personal(&user("alice"))).await.len(),
            2
        );
    }

    #[tokio::test]
    async fn test_identity_mismatch_is_rejected() {
        // テスト項目: 認証済みユーザーと異なる userId は拒否され、登録されない
        // given (前提条件):
        let fixture = Fixture::new().await;
        let usecase = create_usecase(&fixture);

        // when (操作):
        let result = usecase
            .announce(&conn("conn-a"), &user("alice"), "bob")
            .await;

        // then (期待する結果):
        assert_eq!(result, Err(RealtimeError::IdentityMismatch));
        assert!(!fixture.registry.is_online(&user("bob")).await);
    }

    #[tokio::test]
    async fn test_empty_user_id_is_invalid_payload() {
        // テスト項目: 空の userId はペイロード不正として拒否される
        // given (前提条件):
        let fixture = Fixture::new().await;
        let usecase = create_usecase(&fixture);

        // when (操作):
        let result = usecase.announce(&conn("conn-a"), &user("alice"), "  ").await;

        // then (期待する結果):
        assert!(matches!(result, Err(RealtimeError::InvalidPayload(_))));
    }
}
