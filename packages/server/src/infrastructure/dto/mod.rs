//! Data Transfer Objects (DTOs) for the chat server.
//!
//! DTOs are organized by protocol:
//! - `model`: message / notification / chat representations shared by both protocols
//! - `websocket`: realtime channel frames
//! - `http`: REST request and response bodies

pub mod conversion;
pub mod http;
pub mod model;
pub mod websocket;
