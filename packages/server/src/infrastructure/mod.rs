//! Infrastructure layer: in-memory storage, presence bookkeeping, the
//! WebSocket pusher and wire DTOs.

pub mod dto;
pub mod message_pusher;
pub mod presence;
pub mod repository;
pub mod seed;
pub mod sweeper;
