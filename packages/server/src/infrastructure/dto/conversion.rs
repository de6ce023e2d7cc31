//! Conversion logic between DTOs and domain entities.

use hearth_shared::time::timestamp_to_rfc3339;

use crate::domain::{
    Attachment, Chat, ChatKind, DomainEvent, LastMessage, Message, MessageKind, Notification,
    NotificationKind, ParticipantRole, PresenceStatus, Reaction, ReadReceipt, Timestamp,
};
use crate::infrastructure::dto::{model as dto, websocket as ws};

fn rfc3339(timestamp: Timestamp) -> String {
    timestamp_to_rfc3339(timestamp.value())
}

// ========================================
// DTO → Domain Entity
// ========================================

impl From<dto::MessageTypeDto> for MessageKind {
    fn from(dto: dto::MessageTypeDto) -> Self {
        match dto {
            dto::MessageTypeDto::Text => MessageKind::Text,
            dto::MessageTypeDto::Image => MessageKind::Image,
            dto::MessageTypeDto::File => MessageKind::File,
            dto::MessageTypeDto::System => MessageKind::System,
        }
    }
}

impl From<dto::AttachmentDto> for Attachment {
    fn from(dto: dto::AttachmentDto) -> Self {
        Self {
            url: dto.url,
            name: dto.name,
            size: dto.size,
            mime_type: dto.mime_type,
        }
    }
}

impl From<dto::PresenceStatusDto> for PresenceStatus {
    fn from(dto: dto::PresenceStatusDto) -> Self {
        match dto {
            dto::PresenceStatusDto::Online => PresenceStatus::Online,
            dto::PresenceStatusDto::Offline => PresenceStatus::Offline,
            dto::PresenceStatusDto::Away => PresenceStatus::Away,
            dto::PresenceStatusDto::Dnd => PresenceStatus::Dnd,
        }
    }
}

// ========================================
// Domain Entity → DTO
// ========================================

impl From<MessageKind> for dto::MessageTypeDto {
    fn from(kind: MessageKind) -> Self {
        match kind {
            MessageKind::Text => dto::MessageTypeDto::Text,
            MessageKind::Image => dto::MessageTypeDto::Image,
            MessageKind::File => dto::MessageTypeDto::File,
            MessageKind::System => dto::MessageTypeDto::System,
        }
    }
}

impl From<PresenceStatus> for dto::PresenceStatusDto {
    fn from(status: PresenceStatus) -> Self {
        match status {
            PresenceStatus::Online => dto::PresenceStatusDto::Online,
            PresenceStatus::Offline => dto::PresenceStatusDto::Offline,
            PresenceStatus::Away => dto::PresenceStatusDto::Away,
            PresenceStatus::Dnd => dto::PresenceStatusDto::Dnd,
        }
    }
}

impl From<&Attachment> for dto::AttachmentDto {
    fn from(model: &Attachment) -> Self {
        Self {
            url: model.url.clone(),
            name: model.name.clone(),
            size: model.size,
            mime_type: model.mime_type.clone(),
        }
    }
}

impl From<&Reaction> for dto::ReactionDto {
    fn from(model: &Reaction) -> Self {
        Self {
            emoji: model.emoji.as_str().to_string(),
            users: model.users.iter().map(|u| u.to_string()).collect(),
        }
    }
}

impl From<&ReadReceipt> for dto::ReadReceiptDto {
    fn from(model: &ReadReceipt) -> Self {
        Self {
            user_id: model.user_id.to_string(),
            read_at: rfc3339(model.read_at),
        }
    }
}

impl From<&Message> for dto::MessageDto {
    fn from(model: &Message) -> Self {
        let content = if model.is_deleted() {
            String::new()
        } else {
            model.content.as_str().to_string()
        };

        Self {
            id: model.id.to_string(),
            chat_id: model.chat_id.to_string(),
            sender_id: model.sender_id.to_string(),
            content,
            r#type: model.kind.into(),
            attachments: model.attachments.iter().map(Into::into).collect(),
            mentions: model.mentions.iter().map(|u| u.to_string()).collect(),
            reply_to: model.reply_to.as_ref().map(|id| id.to_string()),
            forwarded_from: model.forwarded_from.as_ref().map(|id| id.to_string()),
            edited: model.is_edited(),
            edited_at: model.edited_at.map(rfc3339),
            deleted: model.is_deleted(),
            deleted_at: model.deleted_at.map(rfc3339),
            reactions: model.reactions.iter().map(Into::into).collect(),
            pinned: model.is_pinned(),
            pinned_by: model.pin.as_ref().map(|p| p.pinned_by.to_string()),
            pinned_at: model.pin.as_ref().map(|p| rfc3339(p.pinned_at)),
            read_by: model.read_by.iter().map(Into::into).collect(),
            expires_in: model.expires_in,
            expires_at: model.expires_at.map(rfc3339),
            created_at: rfc3339(model.created_at),
        }
    }
}

impl From<&Notification> for dto::NotificationDto {
    fn from(model: &Notification) -> Self {
        let r#type = match model.kind {
            NotificationKind::Message => dto::NotificationTypeDto::Message,
            NotificationKind::Mention => dto::NotificationTypeDto::Mention,
            NotificationKind::FriendRequest => dto::NotificationTypeDto::FriendRequest,
            NotificationKind::System => dto::NotificationTypeDto::System,
        };

        Self {
            id: model.id.to_string(),
            r#type,
            title: model.title.clone(),
            content: model.content.clone(),
            data: dto::NotificationDataDto {
                chat_id: model.data.chat_id.as_ref().map(|id| id.to_string()),
                message_id: model.data.message_id.as_ref().map(|id| id.to_string()),
                sender_id: model.data.sender_id.as_ref().map(|id| id.to_string()),
            },
            read: model.read,
            created_at: rfc3339(model.created_at),
        }
    }
}

impl From<&LastMessage> for dto::LastMessageDto {
    fn from(model: &LastMessage) -> Self {
        Self {
            content: model.content.clone(),
            sender_id: model.sender_id.to_string(),
            timestamp: rfc3339(model.timestamp),
        }
    }
}

impl From<&Chat> for dto::ChatDto {
    fn from(model: &Chat) -> Self {
        let kind = match model.kind {
            ChatKind::Private => "private",
            ChatKind::Group => "group",
            ChatKind::Channel => "channel",
            ChatKind::Saved => "saved",
        };

        Self {
            id: model.id.to_string(),
            name: model.name.clone(),
            r#type: kind.to_string(),
            participants: model
                .participants
                .iter()
                .map(|p| dto::ParticipantDto {
                    user_id: p.user_id.to_string(),
                    role: match p.role {
                        ParticipantRole::Owner => "owner",
                        ParticipantRole::Admin => "admin",
                        ParticipantRole::Member => "member",
                    }
                    .to_string(),
                })
                .collect(),
            last_message: model.last_message.as_ref().map(Into::into),
            created_at: rfc3339(model.created_at),
        }
    }
}

impl From<&DomainEvent> for ws::ServerEvent {
    fn from(event: &DomainEvent) -> Self {
        match event {
            DomainEvent::MessageNew { chat_id, message } => {
                ws::ServerEvent::MessageNew(ws::MessageNewPayload {
                    chat_id: chat_id.to_string(),
                    message: message.as_ref().into(),
                })
            }
            DomainEvent::MessageEdit {
                chat_id,
                message_id,
                new_content,
            } => ws::ServerEvent::MessageEdit(ws::MessageEditPayload {
                chat_id: chat_id.to_string(),
                message_id: message_id.to_string(),
                new_content: new_content.as_str().to_string(),
            }),
            DomainEvent::MessageDelete {
                chat_id,
                message_id,
            } => ws::ServerEvent::MessageDelete(ws::MessageDeletePayload {
                chat_id: chat_id.to_string(),
                message_id: message_id.to_string(),
            }),
            DomainEvent::MessageReaction {
                message_id,
                reactions,
            } => ws::ServerEvent::MessageReaction(ws::MessageReactionPayload {
                message_id: message_id.to_string(),
                reactions: reactions.iter().map(Into::into).collect(),
            }),
            DomainEvent::MessagePinned {
                message_id,
                pinned,
                pinned_at,
            } => ws::ServerEvent::MessagePinned(ws::MessagePinnedPayload {
                message_id: message_id.to_string(),
                pinned: *pinned,
                pinned_at: pinned_at.map(rfc3339),
            }),
            DomainEvent::MessageRead {
                message_id,
                user_id,
                read_at,
            } => ws::ServerEvent::MessageRead(ws::MessageReadPayload {
                message_id: message_id.to_string(),
                user_id: user_id.to_string(),
                read_at: rfc3339(*read_at),
            }),
            DomainEvent::NotificationNew(notification) => {
                ws::ServerEvent::NotificationNew(notification.as_ref().into())
            }
            DomainEvent::UserStatus { user_id, status } => {
                ws::ServerEvent::UserStatus(ws::UserStatusPayload {
                    user_id: user_id.to_string(),
                    status: (*status).into(),
                })
            }
            DomainEvent::TypingStart { chat_id, user_id } => {
                ws::ServerEvent::TypingStart(ws::TypingPayload {
                    chat_id: chat_id.to_string(),
                    user_id: user_id.to_string(),
                })
            }
            DomainEvent::TypingStop { chat_id, user_id } => {
                ws::ServerEvent::TypingStop(ws::TypingPayload {
                    chat_id: chat_id.to_string(),
                    user_id: user_id.to_string(),
                })
            }
            DomainEvent::Rejected { event, error } => ws::ServerEvent::Error(ws::ErrorPayload {
                event: event.clone(),
                error: error.clone(),
            }),
        }
    }
}
