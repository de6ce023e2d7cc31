//! HTTP and WebSocket surface of the chat server.

mod auth;
mod error;
mod handler;
mod server;
mod signal;
pub mod state;

pub use error::ApiError;
pub use server::{Server, build_router};
pub use state::{AppState, Dependencies};
