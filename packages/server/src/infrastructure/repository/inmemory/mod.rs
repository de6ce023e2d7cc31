//! InMemory Repository 実装
//!
//! HashMap をインメモリ DB として使用します。ドキュメント単位の更新は
//! 1 回のロック取得の中で完結させ、ドキュメントストアのアトミックな
//! フィールド更新と同じ保証を提供します。

mod chat;
mod message;
mod notification;
mod user;

pub use chat::InMemoryChatRepository;
pub use message::InMemoryMessageRepository;
pub use notification::InMemoryNotificationRepository;
pub use user::InMemoryUserDirectory;
