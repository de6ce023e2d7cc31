//! InMemory Notification Repository 実装

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{Notification, NotificationId, NotificationRepository, RepositoryError, UserId};

/// インメモリ Notification Repository 実装
///
/// Key: 所有ユーザー、Value: 作成順の通知リスト
#[derive(Default)]
pub struct InMemoryNotificationRepository {
    notifications: Mutex<HashMap<UserId, Vec<Notification>>>,
}

impl InMemoryNotificationRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn not_found(notification_id: &NotificationId) -> RepositoryError {
    RepositoryError::NotificationNotFound(notification_id.to_string())
}

#[async_trait]
impl NotificationRepository for InMemoryNotificationRepository {
    async fn insert(&self, notification: Notification) -> Result<(), RepositoryError> {
        let mut notifications = self.notifications.lock().await;
        notifications
            .entry(notification.user_id.clone())
            .or_default()
            .push(notification);
        Ok(())
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Notification>, RepositoryError> {
        let notifications = self.notifications.lock().await;
        let mut list: Vec<Notification> = notifications
            .get(user_id)
            .map(|items| items.iter().rev().cloned().collect())
            .unwrap_or_default();
        // stable: 同時刻の通知は新しく挿入された方が先
        list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(list)
    }

    async fn mark_read(
        &self,
        notification_id: &NotificationId,
        user_id: &UserId,
    ) -> Result<Notification, RepositoryError> {
        let mut notifications = self.notifications.lock().await;
        let notification = notifications
            .get_mut(user_id)
            .and_then(|items| items.iter_mut().find(|n| &n.id == notification_id))
            .ok_or_else(|| not_found(notification_id))?;
        notification.read = true;
        Ok(notification.clone())
    }

    async fn mark_all_read(&self, user_id: &UserId) -> Result<usize, RepositoryError> {
        let mut notifications = self.notifications.lock().await;
        let mut updated = 0;
        for notification in notifications.get_mut(user_id).into_iter().flatten() {
            if !notification.read {
                notification.read = true;
                updated += 1;
            }
        }
        Ok(updated)
    }

    async fn delete(
        &self,
        notification_id: &NotificationId,
        user_id: &UserId,
    ) -> Result<(), RepositoryError> {
        let mut notifications = self.notifications.lock().await;
        let items = notifications
            .get_mut(user_id)
            .ok_or_else(|| not_found(notification_id))?;
        let index = items
            .iter()
            .position(|n| &n.id == notification_id)
            .ok_or_else(|| not_found(notification_id))?;
        items.remove(index);
        Ok(())
    }

    async fn delete_all(&self, user_id: &UserId) -> Result<usize, RepositoryError> {
        let mut notifications = self.notifications.lock().await;
        Ok(notifications.remove(user_id).map(|items| items.len()).unwrap_or(0))
    }
}
