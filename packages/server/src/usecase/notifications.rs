//! UseCase: 通知の一覧・既読・削除
//!
//! 通知は所有ユーザーのみが操作できる。

use std::sync::Arc;

use crate::domain::{Notification, NotificationId, NotificationRepository, UserId};

use super::error::MessageError;

/// 通知一覧（新しい順）と未読件数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationList {
    pub notifications: Vec<Notification>,
    pub unread_count: usize,
}

pub struct NotificationsUseCase {
    notifications: Arc<dyn NotificationRepository>,
}

impl NotificationsUseCase {
    pub fn new(notifications: Arc<dyn NotificationRepository>) -> Self {
        Self { notifications }
    }

    pub async fn list(&self, user_id: &UserId) -> Result<NotificationList, MessageError> {
        let notifications = self.notifications.list_for_user(user_id).await?;
        let unread_count = notifications.iter().filter(|n| !n.read).count();
        Ok(NotificationList {
            notifications,
            unread_count,
        })
    }

    pub async fn mark_read(
        &self,
        notification_id: &NotificationId,
        user_id: &UserId,
    ) -> Result<Notification, MessageError> {
        Ok(self.notifications.mark_read(notification_id, user_id).await?)
    }

    /// 全て既読にし、更新件数を返す
    pub async fn mark_all_read(&self, user_id: &UserId) -> Result<usize, MessageError> {
        Ok(self.notifications.mark_all_read(user_id).await?)
    }

    pub async fn delete(
        &self,
        notification_id: &NotificationId,
        user_id: &UserId,
    ) -> Result<(), MessageError> {
        Ok(self.notifications.delete(notification_id, user_id).await?)
    }

    /// 全て削除し、削除件数を返す
    pub async fn delete_all(&self, user_id: &UserId) -> Result<usize, MessageError> {
        Ok(self.notifications.delete_all(user_id).await?)
    }
}
