//! 接続レジストリとルームメンバーシップのインターフェース
//!
//! どちらもプロセス内の管理情報で、操作は失敗せず、
//! 未知の ID は無視される。

use async_trait::async_trait;

use super::value_object::{ConnectionId, RoomId, UserId};

/// Result of removing a connection from the registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Departure {
    pub user_id: UserId,
    /// `true` when the removed connection was the user's last one
    pub went_offline: bool,
}

/// Maps users to their live connections
#[async_trait]
pub trait ConnectionRegistry: Send + Sync {
    /// Add `connection_id` to the user's set.
    ///
    /// Returns `true` iff this is the user's first live connection. If the
    /// connection belonged to another user, it is moved.
    async fn register(&self, user_id: &UserId, connection_id: &ConnectionId) -> bool;

    /// Remove `connection_id` from whichever user owns it
    async fn unregister(&self, connection_id: &ConnectionId) -> Option<Departure>;

    async fn is_online(&self, user_id: &UserId) -> bool;

    /// Online users, sorted by id
    async fn online_users(&self) -> Vec<UserId>;
}

/// Maps rooms to subscribed connections
#[async_trait]
pub trait RoomMembership: Send + Sync {
    async fn join(&self, connection_id: &ConnectionId, room_id: &RoomId);

    async fn leave(&self, connection_id: &ConnectionId, room_id: &RoomId);

    /// Remove the connection from every room; returns the rooms it was in
    async fn leave_all(&self, connection_id: &ConnectionId) -> Vec<RoomId>;

    async fn members(&self, room_id: &RoomId) -> Vec<ConnectionId>;

    async fn rooms_of(&self, connection_id: &ConnectionId) -> Vec<RoomId>;
}
