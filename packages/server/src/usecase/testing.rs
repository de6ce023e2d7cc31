//! ユースケースのテスト用フィクスチャ
//!
//! インメモリ実装一式と、チャット `c1`（alice, bob）、`c2`（alice, carol）を用意する。

use std::sync::Arc;

use hearth_shared::time::FixedClock;
use tokio::sync::mpsc;

use crate::{
    domain::{
        Chat, ChatId, ChatKind, ConnectionId, ConnectionRegistry, MessagePusher, Notification,
        NotificationData, NotificationId, NotificationKind, Participant, ParticipantRole, RoomId,
        RoomMembership, Timestamp, UserId,
    },
    infrastructure::{
        message_pusher::WebSocketMessagePusher,
        presence::{InMemoryConnectionRegistry, InMemoryRoomMembership},
        repository::{
            InMemoryChatRepository, InMemoryMessageRepository, InMemoryNotificationRepository,
            InMemoryUserDirectory,
        },
    },
};

use super::Dispatcher;

/// フィクスチャの現在時刻（2023-11-14T22:13:20Z）
pub const NOW: i64 = 1_700_000_000_000;

pub fn user(id: &str) -> UserId {
    UserId::new(id.to_string()).unwrap()
}

pub fn chat(id: &str) -> ChatId {
    ChatId::new(id.to_string()).unwrap()
}

pub fn conn(id: &str) -> ConnectionId {
    ConnectionId::new(id.to_string()).unwrap()
}

/// 受信済みのフレームを全て取り出して JSON として返す
pub fn drain(rx: &mut mpsc::UnboundedReceiver<String>) -> Vec<serde_json::Value> {
    let mut frames = Vec::new();
    while let Ok(frame) = rx.try_recv() {
        frames.push(serde_json::from_str(&frame).unwrap());
    }
    frames
}

/// 指定したイベント名のフレームだけを返す
pub fn events_named(frames: &[serde_json::Value], name: &str) -> Vec<serde_json::Value> {
    frames
        .iter()
        .filter(|f| f["event"] == name)
        .cloned()
        .collect()
}

pub struct Fixture {
    pub chats: Arc<InMemoryChatRepository>,
    pub messages: Arc<InMemoryMessageRepository>,
    pub notifications: Arc<InMemoryNotificationRepository>,
    pub users: Arc<InMemoryUserDirectory>,
    pub registry: Arc<InMemoryConnectionRegistry>,
    pub rooms: Arc<InMemoryRoomMembership>,
    pub pusher: Arc<WebSocketMessagePusher>,
    pub clock: Arc<FixedClock>,
}

impl Fixture {
    pub async fn new() -> Self {
        let clock = Arc::new(FixedClock::new(NOW));
        let c1 = Chat::new(
            chat("c1"),
            "general".into(),
            ChatKind::Group,
            vec![
                Participant::new(user("alice"), ParticipantRole::Owner),
                Participant::member(user("bob")),
            ],
            Timestamp::new(0),
        )
        .unwrap();
        let c2 = Chat::new(
            chat("c2"),
            "random".into(),
            ChatKind::Private,
            vec![Participant::member(user("alice")), Participant::member(user("carol"))],
            Timestamp::new(0),
        )
        .unwrap();

        let users = Arc::new(InMemoryUserDirectory::new());
        for (id, name) in [("alice", "Alice"), ("bob", "Bob"), ("carol", "Carol")] {
            users
                .insert(user(id), name.to_string(), format!("token-{id}"))
                .await;
        }

        Self {
            chats: Arc::new(InMemoryChatRepository::with_chats(vec![c1, c2])),
            messages: Arc::new(InMemoryMessageRepository::new(clock.clone())),
            notifications: Arc::new(InMemoryNotificationRepository::new()),
            users,
            registry: Arc::new(InMemoryConnectionRegistry::new()),
            rooms: Arc::new(InMemoryRoomMembership::new()),
            pusher: Arc::new(WebSocketMessagePusher::default()),
            clock,
        }
    }

    pub fn dispatcher(&self) -> Arc<Dispatcher> {
        Arc::new(Dispatcher::new(
            self.rooms.clone(),
            self.pusher.clone(),
            self.notifications.clone(),
        ))
    }

    /// 接続を登録し、個人ルームと指定したチャットルームに参加させる
    pub async fn connect(
        &self,
        connection: &str,
        user_id: &str,
        chat_ids: &[&str],
    ) -> mpsc::UnboundedReceiver<String> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.pusher.register_connection(conn(connection), tx).await;
        self.registry.register(&user(user_id), &conn(connection)).await;
        self.rooms
            .join(&conn(connection), &RoomId::personal(&user(user_id)))
            .await;
        for chat_id in chat_ids {
            self.rooms
                .join(&conn(connection), &RoomId::chat(&chat(chat_id)))
                .await;
        }
        rx
    }

    pub fn notification(id: &str, owner: &str) -> Notification {
        Notification {
            id: NotificationId::new(id.to_string()).unwrap(),
            user_id: user(owner),
            kind: NotificationKind::System,
            title: "System".into(),
            content: "maintenance".into(),
            data: NotificationData::default(),
            read: false,
            created_at: Timestamp::new(NOW),
        }
    }
}
