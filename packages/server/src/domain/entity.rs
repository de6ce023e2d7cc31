//! ドメインエンティティ: チャット、メッセージ、通知
//!
//! ドキュメント単位で原子的に行う必要がある変更（リアクションの切り替え、
//! 既読、ピン留め）はメソッドとしてここに置き、リポジトリがドキュメントの
//! ロックを保持したまま適用できるようにしている。

use super::{
    error::EntityError,
    value_object::{ChatId, Emoji, MessageContent, MessageId, NotificationId, Timestamp, UserId},
};

/// Kind of conversation container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatKind {
    Private,
    Group,
    Channel,
    Saved,
}

/// Role of a participant inside a chat
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticipantRole {
    Owner,
    Admin,
    Member,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub user_id: UserId,
    pub role: ParticipantRole,
}

impl Participant {
    pub fn new(user_id: UserId, role: ParticipantRole) -> Self {
        Self { user_id, role }
    }

    pub fn member(user_id: UserId) -> Self {
        Self::new(user_id, ParticipantRole::Member)
    }
}

/// Denormalized summary of the latest message in a chat
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastMessage {
    pub content: String,
    pub sender_id: UserId,
    pub timestamp: Timestamp,
}

/// Conversation container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chat {
    pub id: ChatId,
    pub name: String,
    pub kind: ChatKind,
    pub participants: Vec<Participant>,
    pub last_message: Option<LastMessage>,
    pub created_at: Timestamp,
}

impl Chat {
    /// Create a chat. Duplicate participants are collapsed (first entry wins).
    pub fn new(
        id: ChatId,
        name: String,
        kind: ChatKind,
        participants: Vec<Participant>,
        created_at: Timestamp,
    ) -> Result<Self, EntityError> {
        let mut unique: Vec<Participant> = Vec::with_capacity(participants.len());
        for participant in participants {
            if !unique.iter().any(|p| p.user_id == participant.user_id) {
                unique.push(participant);
            }
        }
        if unique.is_empty() {
            return Err(EntityError::EmptyParticipants);
        }

        Ok(Self {
            id,
            name,
            kind,
            participants: unique,
            last_message: None,
            created_at,
        })
    }

    pub fn is_participant(&self, user_id: &UserId) -> bool {
        self.participants.iter().any(|p| &p.user_id == user_id)
    }

    /// Every participant except `exclude`
    pub fn other_participants(&self, exclude: &UserId) -> Vec<UserId> {
        self.participants
            .iter()
            .filter(|p| &p.user_id != exclude)
            .map(|p| p.user_id.clone())
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Text,
    Image,
    File,
    System,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub url: String,
    pub name: String,
    pub size: u64,
    pub mime_type: String,
}

/// Users who reacted with one emoji. Never empty while stored on a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reaction {
    pub emoji: Emoji,
    pub users: Vec<UserId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadReceipt {
    pub user_id: UserId,
    pub read_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pin {
    pub pinned_by: UserId,
    pub pinned_at: Timestamp,
}

/// Input for creating a message
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub chat_id: ChatId,
    pub sender_id: UserId,
    pub content: MessageContent,
    pub kind: MessageKind,
    pub attachments: Vec<Attachment>,
    pub mentions: Vec<UserId>,
    pub reply_to: Option<MessageId>,
    pub forwarded_from: Option<MessageId>,
}

impl NewMessage {
    /// Plain text message without attachments, mentions or references
    pub fn text(chat_id: ChatId, sender_id: UserId, content: MessageContent) -> Self {
        Self {
            chat_id,
            sender_id,
            content,
            kind: MessageKind::Text,
            attachments: Vec::new(),
            mentions: Vec::new(),
            reply_to: None,
            forwarded_from: None,
        }
    }

    pub fn into_message(self, id: MessageId, created_at: Timestamp) -> Message {
        Message {
            id,
            chat_id: self.chat_id,
            sender_id: self.sender_id,
            content: self.content,
            kind: self.kind,
            attachments: self.attachments,
            mentions: self.mentions,
            reply_to: self.reply_to,
            forwarded_from: self.forwarded_from,
            edited_at: None,
            deleted_at: None,
            reactions: Vec::new(),
            pin: None,
            read_by: Vec::new(),
            expires_in: None,
            expires_at: None,
            created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: MessageId,
    pub chat_id: ChatId,
    pub sender_id: UserId,
    pub content: MessageContent,
    pub kind: MessageKind,
    pub attachments: Vec<Attachment>,
    pub mentions: Vec<UserId>,
    pub reply_to: Option<MessageId>,
    pub forwarded_from: Option<MessageId>,
    pub edited_at: Option<Timestamp>,
    pub deleted_at: Option<Timestamp>,
    pub reactions: Vec<Reaction>,
    pub pin: Option<Pin>,
    pub read_by: Vec<ReadReceipt>,
    /// Lifetime in seconds, as requested by the sender
    pub expires_in: Option<u64>,
    pub expires_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl Message {
    pub fn is_edited(&self) -> bool {
        self.edited_at.is_some()
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    pub fn is_pinned(&self) -> bool {
        self.pin.is_some()
    }

    /// Whether the TTL deadline has passed at `now`
    pub fn is_expired(&self, now: Timestamp) -> bool {
        self.expires_at.is_some_and(|deadline| deadline <= now)
    }

    /// Toggle `user_id` in the reactor set of `emoji`.
    ///
    /// Returns `true` when the user now has reacted, `false` when the
    /// reaction was removed. Empty emoji entries are dropped.
    pub fn toggle_reaction(&mut self, user_id: &UserId, emoji: &Emoji) -> bool {
        match self.reactions.iter().position(|r| &r.emoji == emoji) {
            Some(index) => {
                let reaction = &mut self.reactions[index];
                if let Some(user_index) = reaction.users.iter().position(|u| u == user_id) {
                    reaction.users.remove(user_index);
                    if reaction.users.is_empty() {
                        self.reactions.remove(index);
                    }
                    false
                } else {
                    reaction.users.push(user_id.clone());
                    true
                }
            }
            None => {
                self.reactions.push(Reaction {
                    emoji: emoji.clone(),
                    users: vec![user_id.clone()],
                });
                true
            }
        }
    }

    /// Insert a read receipt unless `user_id` already has one.
    ///
    /// Returns the inserted receipt, or `None` if the message was already read.
    pub fn mark_read(&mut self, user_id: &UserId, read_at: Timestamp) -> Option<ReadReceipt> {
        if self.read_by.iter().any(|r| &r.user_id == user_id) {
            return None;
        }
        let receipt = ReadReceipt {
            user_id: user_id.clone(),
            read_at,
        };
        self.read_by.push(receipt.clone());
        Some(receipt)
    }

    pub fn pin(&mut self, pinned_by: UserId, pinned_at: Timestamp) {
        self.pin = Some(Pin {
            pinned_by,
            pinned_at,
        });
    }

    pub fn unpin(&mut self) {
        self.pin = None;
    }

    pub fn edit(&mut self, content: MessageContent, edited_at: Timestamp) {
        self.content = content;
        self.edited_at = Some(edited_at);
    }

    pub fn soft_delete(&mut self, deleted_at: Timestamp) {
        self.deleted_at = Some(deleted_at);
    }

    pub fn set_expiration(&mut self, expires_in_seconds: u64, now: Timestamp) {
        self.expires_in = Some(expires_in_seconds);
        self.expires_at = Some(now.plus_seconds(expires_in_seconds));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Message,
    Mention,
    FriendRequest,
    System,
}

/// References to the event a notification originates from
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationData {
    pub chat_id: Option<ChatId>,
    pub message_id: Option<MessageId>,
    pub sender_id: Option<UserId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: NotificationId,
    /// Owner of the notification
    pub user_id: UserId,
    pub kind: NotificationKind,
    pub title: String,
    pub content: String,
    pub data: NotificationData,
    pub read: bool,
    pub created_at: Timestamp,
}

/// Presence status broadcast in `user-status` events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenceStatus {
    Online,
    Offline,
    Away,
    Dnd,
}
