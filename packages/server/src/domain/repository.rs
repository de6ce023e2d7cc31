//! Repository trait 定義
//!
//! ドメイン層が必要とするデータアクセスのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。
//!
//! 変更系のメソッドはすべてドキュメント単位の操作で、実装はドキュメントごとに
//! 原子的に適用すること。同じメッセージへの同時のリアクションや既読が失われない。

use async_trait::async_trait;

use super::{
    entity::{Chat, LastMessage, Message, Notification, Pin, ReadReceipt},
    error::RepositoryError,
    value_object::{ChatId, Emoji, MessageContent, MessageId, NotificationId, Timestamp, UserId},
};

/// One page of chat history, oldest first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessagePage {
    pub messages: Vec<Message>,
    pub has_more: bool,
}

/// One page of search results, newest first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPage {
    pub messages: Vec<Message>,
    pub total: usize,
}

/// Chat Repository trait
///
/// チャット（会話コンテナ）へのアクセス。チャットの作成・参加者管理そのものは
/// このサービスの範囲外で、ここでは参照と最終メッセージの更新のみを扱う。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatRepository: Send + Sync {
    /// チャットを保存（既存の場合は置き換え）
    async fn insert(&self, chat: Chat) -> Result<(), RepositoryError>;

    /// ID でチャットを取得
    async fn find_by_id(&self, chat_id: &ChatId) -> Result<Option<Chat>, RepositoryError>;

    /// ユーザーが参加している全てのチャットを取得（ID 順）
    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Chat>, RepositoryError>;

    /// 最終メッセージのサマリーを上書き（last-write-wins）
    async fn update_last_message(
        &self,
        chat_id: &ChatId,
        last_message: LastMessage,
    ) -> Result<(), RepositoryError>;
}

/// Message Repository trait
///
/// 有効期限（`expires_at`）を過ぎたメッセージは存在しないものとして扱う。
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// メッセージを保存
    async fn insert(&self, message: Message) -> Result<(), RepositoryError>;

    /// ID でメッセージを取得
    async fn find_by_id(&self, message_id: &MessageId) -> Result<Option<Message>, RepositoryError>;

    /// `before` より古いメッセージを最大 `limit` 件取得（古い順）
    async fn list_history(
        &self,
        chat_id: &ChatId,
        before: Option<Timestamp>,
        limit: usize,
    ) -> Result<MessagePage, RepositoryError>;

    /// ピン留めされたメッセージを取得（ピン留めが新しい順）
    async fn list_pinned(&self, chat_id: &ChatId) -> Result<Vec<Message>, RepositoryError>;

    /// 削除されていないメッセージ本文の部分一致検索（大文字小文字を区別しない）
    async fn search(
        &self,
        chat_ids: &[ChatId],
        query: &str,
        skip: usize,
        limit: usize,
    ) -> Result<SearchPage, RepositoryError>;

    /// リアクションをトグルし、更新後のメッセージを返す
    async fn toggle_reaction(
        &self,
        message_id: &MessageId,
        user_id: &UserId,
        emoji: &Emoji,
    ) -> Result<Message, RepositoryError>;

    /// 既読を追加（既に既読なら `None`）
    async fn add_read_receipt(
        &self,
        message_id: &MessageId,
        user_id: &UserId,
        read_at: Timestamp,
    ) -> Result<Option<ReadReceipt>, RepositoryError>;

    /// チャット内の全メッセージに既読を追加し、新規に追加した件数を返す
    async fn add_read_receipts_for_chat(
        &self,
        chat_id: &ChatId,
        user_id: &UserId,
        read_at: Timestamp,
    ) -> Result<usize, RepositoryError>;

    /// ピン留め状態を設定（`None` で解除）
    async fn set_pin(
        &self,
        message_id: &MessageId,
        pin: Option<Pin>,
    ) -> Result<Message, RepositoryError>;

    /// 有効期限を設定
    async fn set_expiration(
        &self,
        message_id: &MessageId,
        expires_in_seconds: u64,
        now: Timestamp,
    ) -> Result<Message, RepositoryError>;

    /// 本文を編集
    async fn edit_content(
        &self,
        message_id: &MessageId,
        content: MessageContent,
        edited_at: Timestamp,
    ) -> Result<Message, RepositoryError>;

    /// 論理削除
    async fn soft_delete(
        &self,
        message_id: &MessageId,
        deleted_at: Timestamp,
    ) -> Result<Message, RepositoryError>;

    /// 有効期限切れのメッセージを物理削除し、削除件数を返す
    async fn purge_expired(&self, now: Timestamp) -> Result<usize, RepositoryError>;
}

/// Notification Repository trait
///
/// 通知は所有ユーザーのみが参照・更新・削除できる。他人の通知は
/// `NotificationNotFound` として扱う。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// 通知を保存
    async fn insert(&self, notification: Notification) -> Result<(), RepositoryError>;

    /// ユーザーの通知一覧を取得（新しい順）
    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Notification>, RepositoryError>;

    /// 通知を既読にする
    async fn mark_read(
        &self,
        notification_id: &NotificationId,
        user_id: &UserId,
    ) -> Result<Notification, RepositoryError>;

    /// ユーザーの全通知を既読にし、更新件数を返す
    async fn mark_all_read(&self, user_id: &UserId) -> Result<usize, RepositoryError>;

    /// 通知を削除
    async fn delete(
        &self,
        notification_id: &NotificationId,
        user_id: &UserId,
    ) -> Result<(), RepositoryError>;

    /// ユーザーの全通知を削除し、削除件数を返す
    async fn delete_all(&self, user_id: &UserId) -> Result<usize, RepositoryError>;
}
