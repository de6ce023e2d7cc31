//! UseCase: 明示的なステータス変更とプレゼンス照会

use std::sync::Arc;

use crate::domain::{ConnectionRegistry, DomainEvent, PresenceStatus, UserId};

use super::dispatcher::Dispatcher;

/// ステータス変更のユースケース
///
/// 接続の有無に関係なく `user-status` を全接続に配信する。
pub struct SetUserStatusUseCase {
    dispatcher: Arc<Dispatcher>,
}

impl SetUserStatusUseCase {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }

    pub async fn execute(&self, user_id: UserId, status: PresenceStatus) -> PresenceStatus {
        tracing::debug!("User '{}' set status to {:?}", user_id, status);
        self.dispatcher
            .to_all(&DomainEvent::UserStatus { user_id, status })
            .await;
        status
    }
}

/// プレゼンス照会のユースケース
pub struct GetPresenceUseCase {
    registry: Arc<dyn ConnectionRegistry>,
}

impl GetPresenceUseCase {
    pub fn new(registry: Arc<dyn ConnectionRegistry>) -> Self {
        Self { registry }
    }

    pub async fn is_online(&self, user_id: &UserId) -> bool {
        self.registry.is_online(user_id).await
    }

    /// オンラインのユーザー（ID 順）
    pub async fn online_users(&self) -> Vec<UserId> {
        self.registry.online_users().await
    }
}
