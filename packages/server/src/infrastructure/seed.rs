//! Startup seed data: users with bearer tokens and chats with participants.
//!
//! Format:
//!
//! ```json
//! {
//!   "users": [{ "id": "alice", "displayName": "Alice", "token": "token-alice" }],
//!   "chats": [{
//!     "id": "general", "name": "General", "kind": "group",
//!     "participants": [{ "userId": "alice", "role": "owner" }]
//!   }]
//! }
//! ```

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::{
    domain::{
        Chat, ChatId, ChatKind, ChatRepository, EntityError, Participant, ParticipantRole,
        RepositoryError, Timestamp, UserId, ValueObjectError,
    },
    infrastructure::repository::InMemoryUserDirectory,
};

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Failed to read seed file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse seed file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid seed value: {0}")]
    InvalidValue(#[from] ValueObjectError),

    #[error("Invalid chat '{0}': {1}")]
    InvalidChat(String, EntityError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
enum SeedChatKind {
    Private,
    Group,
    Channel,
    Saved,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
enum SeedRole {
    Owner,
    Admin,
    #[default]
    Member,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SeedUser {
    id: String,
    display_name: String,
    token: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SeedParticipant {
    user_id: String,
    #[serde(default)]
    role: SeedRole,
}

#[derive(Debug, Deserialize)]
struct SeedChat {
    id: String,
    name: String,
    kind: SeedChatKind,
    participants: Vec<SeedParticipant>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Seed {
    #[serde(default)]
    users: Vec<SeedUser>,
    #[serde(default)]
    chats: Vec<SeedChat>,
}

impl Seed {
    pub fn from_json(json: &str) -> Result<Self, SeedError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SeedError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load users into the directory and chats into the repository.
    ///
    /// Returns `(users, chats)` counts.
    pub async fn apply(
        self,
        directory: &InMemoryUserDirectory,
        chats: &dyn ChatRepository,
        now: Timestamp,
    ) -> Result<(usize, usize), SeedError> {
        let user_count = self.users.len();
        for user in self.users {
            directory
                .insert(UserId::new(user.id)?, user.display_name, user.token)
                .await;
        }

        let chat_count = self.chats.len();
        for seed_chat in self.chats {
            let participants = seed_chat
                .participants
                .into_iter()
                .map(|p| {
                    let role = match p.role {
                        SeedRole::Owner => ParticipantRole::Owner,
                        SeedRole::Admin => ParticipantRole::Admin,
                        SeedRole::Member => ParticipantRole::Member,
                    };
                    UserId::new(p.user_id).map(|user_id| Participant::new(user_id, role))
                })
                .collect::<Result<Vec<_>, _>>()?;
            let kind = match seed_chat.kind {
                SeedChatKind::Private => ChatKind::Private,
                SeedChatKind::Group => ChatKind::Group,
                SeedChatKind::Channel => ChatKind::Channel,
                SeedChatKind::Saved => ChatKind::Saved,
            };

            let chat = Chat::new(
                ChatId::new(seed_chat.id.clone())?,
                seed_chat.name,
                kind,
                participants,
                now,
            )
            .map_err(|e| SeedError::InvalidChat(seed_chat.id, e))?;
            chats.insert(chat).await?;
        }

        tracing::info!("Seeded {} users and {} chats", user_count, chat_count);
        Ok((user_count, chat_count))
    }
}
