//! Request handlers.

mod http;
mod websocket;

pub use http::*;
pub use websocket::websocket_handler;
