//! Resolved server configuration.
//!
//! The binary fills this from command-line flags and their `HEARTH_*`
//! environment variables; the defaults match the flag defaults.

use std::{path::PathBuf, time::Duration};

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind to.
    /// Env: `HEARTH_HOST`
    pub host: String,

    /// Port to bind to. `0` picks an ephemeral port.
    /// Env: `HEARTH_PORT`
    pub port: u16,

    /// JSON seed file with users and chats.
    /// Env: `HEARTH_SEED`
    pub seed_path: Option<PathBuf>,

    /// Maximum code points of message content copied into notifications.
    /// Env: `HEARTH_PREVIEW_LEN`
    pub preview_len: usize,

    /// Interval between purges of expired messages.
    /// Env: `HEARTH_SWEEP_INTERVAL_SECS`
    pub sweep_interval: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            seed_path: None,
            preview_len: 100,
            sweep_interval: Duration::from_secs(30),
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
