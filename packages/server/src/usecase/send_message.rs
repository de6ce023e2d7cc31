//! UseCase: メッセージ送信処理
//!
//! ## 処理順序
//! 1. 送信者がチャットの参加者であることを確認
//! 2. 本文を検証して保存（ここでの失敗だけが呼び出し元に返る）
//! 3. チャットの最終メッセージを更新
//! 4. 送信者以外の参加者に `message` 通知、メンションされたユーザーに `mention` 通知
//! 5. チャットルームに `message-new` を配信
//!
//! 3〜5 の失敗はログに残すだけで、互いに影響しない。

use std::sync::Arc;

use hearth_shared::time::Clock;

use crate::domain::{
    Attachment, ChatId, ChatRepository, DomainEvent, IdFactory, LastMessage, Message,
    MessageContent, MessageId, MessageKind, MessageRepository, NewMessage, Notification,
    NotificationData, NotificationKind, RoomId, Timestamp, UserDirectory, UserId,
};

use super::{access, dispatcher::Dispatcher, error::MessageError};

/// メッセージ送信の入力
#[derive(Debug, Clone)]
pub struct SendMessageCommand {
    pub sender_id: UserId,
    pub chat_id: ChatId,
    /// 未検証の本文（前後の空白は保存時に取り除かれる）
    pub content: String,
    pub kind: MessageKind,
    pub attachments: Vec<Attachment>,
    pub mentions: Vec<UserId>,
    pub reply_to: Option<MessageId>,
}

impl SendMessageCommand {
    pub fn text(sender_id: UserId, chat_id: ChatId, content: impl Into<String>) -> Self {
        Self {
            sender_id,
            chat_id,
            content: content.into(),
            kind: MessageKind::Text,
            attachments: Vec::new(),
            mentions: Vec::new(),
            reply_to: None,
        }
    }
}

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    chats: Arc<dyn ChatRepository>,
    messages: Arc<dyn MessageRepository>,
    users: Arc<dyn UserDirectory>,
    dispatcher: Arc<Dispatcher>,
    clock: Arc<dyn Clock>,
    /// 通知本文の最大文字数（コードポイント単位）
    preview_len: usize,
}

impl SendMessageUseCase {
    pub fn new(
        chats: Arc<dyn ChatRepository>,
        messages: Arc<dyn MessageRepository>,
        users: Arc<dyn UserDirectory>,
        dispatcher: Arc<Dispatcher>,
        clock: Arc<dyn Clock>,
        preview_len: usize,
    ) -> Self {
        Self {
            chats,
            messages,
            users,
            dispatcher,
            clock,
            preview_len,
        }
    }

    pub async fn execute(&self, command: SendMessageCommand) -> Result<Message, MessageError> {
        // 1. 参加者チェック
        let chat =
            access::participant_chat(self.chats.as_ref(), &command.chat_id, &command.sender_id)
                .await?;

        // 2. 検証と保存
        let content = MessageContent::new(command.content)?;
        if let Some(reply_to) = &command.reply_to {
            let original = access::live_message(self.messages.as_ref(), reply_to).await?;
            if original.chat_id != chat.id {
                return Err(MessageError::MessageNotFound);
            }
        }

        let mut mentions: Vec<UserId> = Vec::with_capacity(command.mentions.len());
        for mention in command.mentions {
            if !mentions.contains(&mention) {
                mentions.push(mention);
            }
        }

        let now = Timestamp::new(self.clock.now_millis());
        let message = NewMessage {
            chat_id: chat.id.clone(),
            sender_id: command.sender_id,
            content,
            kind: command.kind,
            attachments: command.attachments,
            mentions,
            reply_to: command.reply_to,
            forwarded_from: None,
        }
        .into_message(IdFactory::message_id(), now);
        self.messages.insert(message.clone()).await?;
        tracing::info!(
            "Message '{}' sent to chat '{}' by '{}'",
            message.id,
            message.chat_id,
            message.sender_id
        );

        // 3. 最終メッセージの更新（後勝ち）
        let summary = LastMessage {
            content: message.content.as_str().to_string(),
            sender_id: message.sender_id.clone(),
            timestamp: message.created_at,
        };
        if let Err(e) = self.chats.update_last_message(&chat.id, summary).await {
            tracing::warn!("Failed to update last message of '{}': {}", chat.id, e);
        }

        // 4. 通知
        let sender_name = self
            .users
            .display_name(&message.sender_id)
            .await
            .unwrap_or_else(|| message.sender_id.to_string());
        let preview = message.content.preview(self.preview_len);

        for recipient in chat.other_participants(&message.sender_id) {
            let notification = build_notification(
                recipient,
                NotificationKind::Message,
                format!("New message from {sender_name}"),
                preview.clone(),
                &message,
                now,
            );
            self.dispatcher.notify(notification).await;
        }
        for mentioned in message.mentions.iter().filter(|u| **u != message.sender_id) {
            let notification = build_notification(
                mentioned.clone(),
                NotificationKind::Mention,
                format!("{sender_name} mentioned you"),
                preview.clone(),
                &message,
                now,
            );
            self.dispatcher.notify(notification).await;
        }

        // 5. ブロードキャスト
        self.dispatcher
            .to_room(
                &RoomId::chat(&message.chat_id),
                &DomainEvent::MessageNew {
                    chat_id: message.chat_id.clone(),
                    message: Box::new(message.clone()),
                },
            )
            .await;

        Ok(message)
    }
}

fn build_notification(
    recipient: UserId,
    kind: NotificationKind,
    title: String,
    content: String,
    message: &Message,
    now: Timestamp,
) -> Notification {
    Notification {
        id: IdFactory::notification_id(),
        user_id: recipient,
        kind,
        title,
        content,
        data: NotificationData {
            chat_id: Some(message.chat_id.clone()),
            message_id: Some(message.id.clone()),
            sender_id: Some(message.sender_id.clone()),
        },
        read: false,
        created_at: now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{
            Chat, ChatKind, MockChatRepository, NotificationRepository, Participant,
            RepositoryError,
        },
        usecase::testing::{chat, drain, events_named, user, Fixture, NOW},
    };

    fn create_usecase(fixture: &Fixture) -> SendMessageUseCase {
        SendMessageUseCase::new(
            fixture.chats.clone(),
            fixture.messages.clone(),
            fixture.users.clone(),
            fixture.dispatcher(),
            fixture.clock.clone(),
            10,
        )
    }

    #[tokio::test]
    async fn test_send_message_success() {
        // テスト項目: 送信が成功し、ルームへの配信と他の参加者への通知が行われる
        // given (前提条件):
        let fixture = Fixture::new().await;
        let usecase = create_usecase(&fixture);
        let mut alice_rx = fixture.connect("conn-a", "alice", &["c1"]).await;
        let mut bob_rx = fixture.connect("conn-b", "bob", &["c1"]).await;

        // when (操作):
        let result = usecase
            .execute(SendMessageCommand::text(user("alice"), chat("c1"), "  hello  "))
            .await;

        // then (期待する結果):
        let message = result.unwrap();
        assert_eq!(message.content.as_str(), "hello");
        assert_eq!(message.sender_id, user("alice"));
        assert_eq!(message.created_at, Timestamp::new(NOW));

        let bob_frames = drain(&mut bob_rx);
        let new_messages = events_named(&bob_frames, "message-new");
        assert_eq!(new_messages.len(), 1);
        assert_eq!(new_messages[0]["data"]["chatId"], "c1");
        assert_eq!(new_messages[0]["data"]["message"]["content"], "hello");
        let notifications = events_named(&bob_frames, "notification-new");
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0]["data"]["type"], "message");
        assert_eq!(notifications[0]["data"]["title"], "New message from Alice");

        // 送信者には通知されない
        let alice_frames = drain(&mut alice_rx);
        assert_eq!(events_named(&alice_frames, "message-new").len(), 1);
        assert!(events_named(&alice_frames, "notification-new").is_empty());
        assert!(
            fixture
                .notifications
                .list_for_user(&user("alice"))
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_send_message_not_participant() {
        // テスト項目: 参加者でないユーザーの送信は拒否され、何も保存されない
        // given (前提条件):
        let fixture = Fixture::new().await;
        let usecase = create_usecase(&fixture);
        let mut bob_rx = fixture.connect("conn-b", "bob", &["c1"]).await;

        // when (操作):
        let result = usecase
            .execute(SendMessageCommand::text(user("carol"), chat("c1"), "hi"))
            .await;

        // then (期待する結果):
        assert_eq!(result, Err(MessageError::NotParticipant));
        let page = fixture
            .messages
            .list_history(&chat("c1"), None, 100)
            .await
            .unwrap();
        assert!(page.messages.is_empty());
        assert!(drain(&mut bob_rx).is_empty());
    }

    #[tokio::test]
    async fn test_send_message_unknown_chat() {
        // テスト項目: 存在しないチャットへの送信も NotParticipant で拒否され、何も保存されない
        // given (前提条件):
        let fixture = Fixture::new().await;
        let usecase = create_usecase(&fixture);

        // when (操作):
        let result = usecase
            .execute(SendMessageCommand::text(user("alice"), chat("nope"), "hi"))
            .await;

        // then (期待する結果):
        assert_eq!(result, Err(MessageError::NotParticipant));
        let page = fixture
            .messages
            .list_history(&chat("nope"), None, 100)
            .await
            .unwrap();
        assert!(page.messages.is_empty());
    }

    #[tokio::test]
    async fn test_send_message_blank_content() {
        // テスト項目: 空白のみの本文は InvalidContent になり保存されない
        // given (前提条件):
        let fixture = Fixture::new().await;
        let usecase = create_usecase(&fixture);

        // when (操作):
        let result = usecase
            .execute(SendMessageCommand::text(user("alice"), chat("c1"), " \n\t "))
            .await;

        // then (期待する結果):
        assert!(matches!(result, Err(MessageError::InvalidContent(_))));
        let page = fixture
            .messages
            .list_history(&chat("c1"), None, 100)
            .await
            .unwrap();
        assert!(page.messages.is_empty());
    }

    #[tokio::test]
    async fn test_mentioned_participant_receives_both_notifications() {
        // テスト項目: メンションされた参加者は message と mention の両方の通知を受け取り、
        //             送信者自身へのメンションは無視される
        // given (前提条件):
        let fixture = Fixture::new().await;
        let usecase = create_usecase(&fixture);
        let mut command =
            SendMessageCommand::text(user("alice"), chat("c1"), "hey @bob, this is a long text");
        command.mentions = vec![user("bob"), user("bob"), user("alice")];

        // when (操作):
        usecase.execute(command).await.unwrap();

        // then (期待する結果):
        let bob_notifications = fixture
            .notifications
            .list_for_user(&user("bob"))
            .await
            .unwrap();
        let mut kinds: Vec<NotificationKind> =
            bob_notifications.iter().map(|n| n.kind).collect();
        kinds.sort_by_key(|k| *k == NotificationKind::Mention);
        assert_eq!(kinds, vec![NotificationKind::Message, NotificationKind::Mention]);
        assert_eq!(bob_notifications[0].content, "hey @bob, ");
        assert!(
            fixture
                .notifications
                .list_for_user(&user("alice"))
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_last_message_is_overwritten() {
        // テスト項目: 最終メッセージは直前に送信したメッセージで上書きされる
        // given (前提条件):
        let fixture = Fixture::new().await;
        let usecase = create_usecase(&fixture);
        usecase
            .execute(SendMessageCommand::text(user("alice"), chat("c1"), "first"))
            .await
            .unwrap();

        // when (操作):
        let second = usecase
            .execute(SendMessageCommand::text(user("bob"), chat("c1"), "second"))
            .await
            .unwrap();

        // then (期待する結果):
        let c1 = fixture.chats.find_by_id(&chat("c1")).await.unwrap().unwrap();
        assert_eq!(
            c1.last_message,
            Some(LastMessage {
                content: "second".into(),
                sender_id: user("bob"),
                timestamp: second.created_at,
            })
        );
    }

    #[tokio::test]
    async fn test_last_message_failure_does_not_fail_send() {
        // テスト項目: 最終メッセージの更新に失敗しても送信は成功し、配信も行われる
        // given (前提条件):
        let fixture = Fixture::new().await;
        let c1 = Chat::new(
            chat("c1"),
            "general".into(),
            ChatKind::Group,
            vec![Participant::member(user("alice")), Participant::member(user("bob"))],
            Timestamp::new(0),
        )
        .unwrap();
        let mut chats = MockChatRepository::new();
        chats
            .expect_find_by_id()
            .returning(move |_| Ok(Some(c1.clone())));
        chats
            .expect_update_last_message()
            .returning(|_, _| Err(RepositoryError::Storage("write conflict".into())));
        let usecase = SendMessageUseCase::new(
            Arc::new(chats),
            fixture.messages.clone(),
            fixture.users.clone(),
            fixture.dispatcher(),
            fixture.clock.clone(),
            100,
        );
        let mut bob_rx = fixture.connect("conn-b", "bob", &["c1"]).await;

        // when (操作):
        let result = usecase
            .execute(SendMessageCommand::text(user("alice"), chat("c1"), "hello"))
            .await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(events_named(&drain(&mut bob_rx), "message-new").len(), 1);
    }

    #[tokio::test]
    async fn test_reply_to_unknown_message() {
        // テスト項目: 存在しないメッセージへの返信は MessageNotFound になる
        // given (前提条件):
        let fixture = Fixture::new().await;
        let usecase = create_usecase(&fixture);
        let mut command = SendMessageCommand::text(user("alice"), chat("c1"), "re");
        command.reply_to = Some(MessageId::new("missing".to_string()).unwrap());

        // when (操作):
        let result = usecase.execute(command).await;

        // then (期待する結果):
        assert_eq!(result, Err(MessageError::MessageNotFound));
    }
}
