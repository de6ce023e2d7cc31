//! InMemory Room Membership 実装

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ConnectionId, RoomId, RoomMembership};

#[derive(Default)]
struct Rooms {
    members: HashMap<RoomId, HashSet<ConnectionId>>,
    joined: HashMap<ConnectionId, HashSet<RoomId>>,
}

/// インメモリ Room Membership 実装
#[derive(Default)]
pub struct InMemoryRoomMembership {
    inner: Mutex<Rooms>,
}

impl InMemoryRoomMembership {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RoomMembership for InMemoryRoomMembership {
    async fn join(&self, connection_id: &ConnectionId, room_id: &RoomId) {
        let mut inner = self.inner.lock().await;
        inner
            .members
            .entry(room_id.clone())
            .or_default()
            .insert(connection_id.clone());
        inner
            .joined
            .entry(connection_id.clone())
            .or_default()
            .insert(room_id.clone());
    }

    async fn leave(&self, connection_id: &ConnectionId, room_id: &RoomId) {
        let mut inner = self.inner.lock().await;
        if let Some(members) = inner.members.get_mut(room_id) {
            members.remove(connection_id);
            if members.is_empty() {
                inner.members.remove(room_id);
            }
        }
        if let Some(rooms) = inner.joined.get_mut(connection_id) {
            rooms.remove(room_id);
            if rooms.is_empty() {
                inner.joined.remove(connection_id);
            }
        }
    }

    async fn leave_all(&self, connection_id: &ConnectionId) -> Vec<RoomId> {
        let mut inner = self.inner.lock().await;
        let rooms: Vec<RoomId> = inner
            .joined
            .remove(connection_id)
            .map(|set| set.into_iter().collect())
            .unwrap_or_default();
        for room_id in &rooms {
            if let Some(members) = inner.members.get_mut(room_id) {
                members.remove(connection_id);
                if members.is_empty() {
                    inner.members.remove(room_id);
                }
            }
        }
        rooms
    }

    async fn members(&self, room_id: &RoomId) -> Vec<ConnectionId> {
        let inner = self.inner.lock().await;
        let mut members: Vec<ConnectionId> = inner
            .members
            .get(room_id)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default();
        members.sort();
        members
    }

    async fn rooms_of(&self, connection_id: &ConnectionId) -> Vec<RoomId> {
        let inner = self.inner.lock().await;
        inner
            .joined
            .get(connection_id)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }
}
