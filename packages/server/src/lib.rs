//! Hearth: realtime message delivery and presence.
//!
//! Layers, from the inside out:
//!
//! - `domain`: value objects, entities, events and the traits at the seams
//! - `usecase`: message lifecycle, presence and notification operations
//! - `infrastructure`: in-memory storage, WebSocket pusher, wire DTOs
//! - `ui`: axum router, REST and WebSocket handlers

pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
