//! InMemory user directory: display names and bearer tokens.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{TokenResolver, UserDirectory, UserId};

#[derive(Default)]
struct Directory {
    display_names: HashMap<UserId, String>,
    tokens: HashMap<String, UserId>,
}

/// インメモリのユーザーディレクトリ
///
/// プロフィール管理と認証はこのサービスの範囲外のため、起動時のシードデータ
/// からのみ登録される。
#[derive(Default)]
pub struct InMemoryUserDirectory {
    inner: Mutex<Directory>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// ユーザーを登録（既存の場合は上書き）
    pub async fn insert(&self, user_id: UserId, display_name: String, token: String) {
        let mut inner = self.inner.lock().await;
        inner.display_names.insert(user_id.clone(), display_name);
        inner.tokens.insert(token, user_id);
    }
}

#[async_trait]
impl TokenResolver for InMemoryUserDirectory {
    async fn resolve(&self, token: &str) -> Option<UserId> {
        let inner = self.inner.lock().await;
        inner.tokens.get(token).cloned()
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn display_name(&self, user_id: &UserId) -> Option<String> {
        let inner = self.inner.lock().await;
        inner.display_names.get(user_id).cloned()
    }
}
