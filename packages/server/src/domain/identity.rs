//! 認証トークンの解決とプロフィール参照のインターフェース

use async_trait::async_trait;

use super::value_object::UserId;

/// Resolves a bearer token to the authenticated user
#[async_trait]
pub trait TokenResolver: Send + Sync {
    async fn resolve(&self, token: &str) -> Option<UserId>;
}

/// User profile lookup
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn display_name(&self, user_id: &UserId) -> Option<String>;
}
