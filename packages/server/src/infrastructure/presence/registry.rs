//! InMemory Connection Registry 実装

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ConnectionId, ConnectionRegistry, Departure, UserId};

#[derive(Default)]
struct Registry {
    /// Key: user_id, Value: ライブ接続の集合（空の集合は保持しない）
    by_user: HashMap<UserId, HashSet<ConnectionId>>,
    /// 逆引き: connection_id → user_id
    owner: HashMap<ConnectionId, UserId>,
}

impl Registry {
    fn remove(&mut self, connection_id: &ConnectionId) -> Option<Departure> {
        let user_id = self.owner.remove(connection_id)?;
        let went_offline = match self.by_user.get_mut(&user_id) {
            Some(connections) => {
                connections.remove(connection_id);
                if connections.is_empty() {
                    self.by_user.remove(&user_id);
                    true
                } else {
                    false
                }
            }
            None => true,
        };
        Some(Departure {
            user_id,
            went_offline,
        })
    }
}

/// インメモリ Connection Registry 実装
#[derive(Default)]
pub struct InMemoryConnectionRegistry {
    inner: Mutex<Registry>,
}

impl InMemoryConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConnectionRegistry for InMemoryConnectionRegistry {
    async fn register(&self, user_id: &UserId, connection_id: &ConnectionId) -> bool {
        let mut inner = self.inner.lock().await;

        if inner.owner.get(connection_id) == Some(user_id) {
            return false;
        }
        // 別ユーザーとして登録済みの接続は付け替える
        inner.remove(connection_id);

        inner
            .owner
            .insert(connection_id.clone(), user_id.clone());
        let connections = inner.by_user.entry(user_id.clone()).or_default();
        connections.insert(connection_id.clone());
        let first = connections.len() == 1;

        tracing::debug!(
            "Connection '{}' registered for user '{}' (first: {})",
            connection_id,
            user_id,
            first
        );
        first
    }

    async fn unregister(&self, connection_id: &ConnectionId) -> Option<Departure> {
        let mut inner = self.inner.lock().await;
        let departure = inner.remove(connection_id);
        if let Some(departure) = &departure {
            tracing::debug!(
                "Connection '{}' unregistered from user '{}' (offline: {})",
                connection_id,
                departure.user_id,
                departure.went_offline
            );
        }
        departure
    }

    async fn is_online(&self, user_id: &UserId) -> bool {
        let inner = self.inner.lock().await;
        inner.by_user.contains_key(user_id)
    }

    async fn online_users(&self) -> Vec<UserId> {
        let inner = self.inner.lock().await;
        let mut users: Vec<UserId> = inner.by_user.keys().cloned().collect();
        users.sort();
        users
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str) -> UserId {
        UserId::new(id.to_string()).unwrap()
    }

    fn conn(id: &str) -> ConnectionId {
        ConnectionId::new(id.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_first_registration_reports_online() {
        // テスト項目: 最初の接続のみ online 遷移として報告される
        // given (前提条件):
        let registry = InMemoryConnectionRegistry::new();

        // when (操作):
        let first = registry.register(&user("u"), &conn("c1")).await;
        let second = registry.register(&user("u"), &conn("c2")).await;
        let again = registry.register(&user("u"), &conn("c1")).await;

        // then (期待する結果):
        assert!(first);
        assert!(!second);
        assert!(!again);
        assert_eq!(registry.online_users().await, vec![user("u")]);
        let departure = registry.unregister(&conn("c1")).await.unwrap();
        assert!(!departure.went_offline);
    }

    #[tokio::test]
    async fn test_offline_only_after_last_connection() {
        // テスト項目: 最後の接続が切れたときだけ offline になる
        // given (前提条件):
        let registry = InMemoryConnectionRegistry::new();
        registry.register(&user("u"), &conn("c1")).await;
        registry.register(&user("u"), &conn("c2")).await;

        // when (操作):
        let first = registry.unregister(&conn("c1")).await.unwrap();
        let still_online = registry.is_online(&user("u")).await;
        let last = registry.unregister(&conn("c2")).await.unwrap();

        // then (期待する結果):
        assert!(!first.went_offline);
        assert!(still_online);
        assert!(last.went_offline);
        assert!(!registry.is_online(&user("u")).await);
        assert!(registry.online_users().await.is_empty());
    }

    #[tokio::test]
    async fn test_unregister_unknown_is_noop() {
        // テスト項目: 未登録の接続の解除はエラーにならない
        // given (前提条件):
        let registry = InMemoryConnectionRegistry::new();

        // when (操作):
        let result = registry.unregister(&conn("ghost")).await;

        // then (期待する結果):
        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn test_reregistration_moves_connection() {
        // テスト項目: 別ユーザーとして再登録された接続は付け替えられる
        // given (前提条件):
        let registry = InMemoryConnectionRegistry::new();
        registry.register(&user("a"), &conn("c1")).await;

        // when (操作):
        let first_for_b = registry.register(&user("b"), &conn("c1")).await;

        // then (期待する結果):
        assert!(first_for_b);
        assert!(!registry.is_online(&user("a")).await);
        let departure = registry.unregister(&conn("c1")).await.unwrap();
        assert_eq!(departure.user_id, user("b"));
    }
}
