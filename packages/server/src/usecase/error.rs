//! UseCase 層のエラー型

use thiserror::Error;

use crate::domain::{RepositoryError, ValueObjectError};

/// メッセージ・通知系ユースケースのエラー
///
/// 表示用のメッセージは安定しており、UI 層はそのままレスポンスに載せる。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessageError {
    #[error("You are not a participant of this chat")]
    NotParticipant,

    #[error("Message not found")]
    MessageNotFound,

    #[error("Chat not found")]
    ChatNotFound,

    #[error("Invalid content: {0}")]
    InvalidContent(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Expiration must be a positive number of seconds")]
    InvalidExpiration,

    #[error("Only the sender can modify this message")]
    NotAuthorized,

    #[error("Notification not found")]
    NotificationNotFound,

    #[error("Internal failure: {0}")]
    Internal(String),
}

impl From<RepositoryError> for MessageError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::ChatNotFound(_) => MessageError::ChatNotFound,
            RepositoryError::MessageNotFound(_) => MessageError::MessageNotFound,
            RepositoryError::NotificationNotFound(_) => MessageError::NotificationNotFound,
            RepositoryError::Storage(reason) => MessageError::Internal(reason),
        }
    }
}

impl From<ValueObjectError> for MessageError {
    fn from(error: ValueObjectError) -> Self {
        MessageError::InvalidContent(error.to_string())
    }
}

/// リアルタイムチャンネルの受信イベントの拒否理由
///
/// 送信元の接続にのみ `error` イベントとして返される。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RealtimeError {
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("userId does not match the authenticated user")]
    IdentityMismatch,

    #[error("You are not a participant of this chat")]
    NotParticipant,

    #[error("Internal failure: {0}")]
    Internal(String),
}

impl From<ValueObjectError> for RealtimeError {
    fn from(error: ValueObjectError) -> Self {
        RealtimeError::InvalidPayload(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_error_mapping() {
        // テスト項目: Repository のエラーが対応する MessageError に変換される
        // given (前提条件):
        let errors = vec![
            RepositoryError::MessageNotFound("m1".into()),
            RepositoryError::ChatNotFound("c1".into()),
            RepositoryError::Storage("disk full".into()),
        ];

        // when (操作):
        let mapped: Vec<MessageError> = errors.into_iter().map(Into::into).collect();

        // then (期待する結果):
        assert_eq!(
            mapped,
            vec![
                MessageError::MessageNotFound,
                MessageError::ChatNotFound,
                MessageError::Internal("disk full".into()),
            ]
        );
        assert_eq!(mapped[2].to_string(), "Internal failure: disk full");
    }
}
