//! Realtime chat server: message delivery, presence and notifications.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin hearth-server -- --seed config/seed.example.json
//! cargo run --bin hearth-server -- --host 0.0.0.0 --port 3000
//! ```

use std::{path::PathBuf, sync::Arc, time::Duration};

use clap::Parser;
use hearth_server::{
    config::ServerConfig,
    domain::Timestamp,
    infrastructure::{
        repository::{InMemoryChatRepository, InMemoryUserDirectory},
        seed::Seed,
        sweeper::ExpirationSweeper,
    },
    ui::{AppState, Dependencies, Server},
};
use hearth_shared::{
    logger::setup_logger,
    time::{Clock, SystemClock},
};

#[derive(Parser, Debug)]
#[command(name = "hearth-server")]
#[command(about = "Realtime chat server with presence and notifications", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "HEARTH_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "HEARTH_PORT", default_value = "8080")]
    port: u16,

    /// JSON file with users (and their tokens) and chats to load at startup
    #[arg(long, env = "HEARTH_SEED")]
    seed: Option<PathBuf>,

    /// Maximum characters of message content copied into notifications
    #[arg(long, env = "HEARTH_PREVIEW_LEN", default_value = "100")]
    preview_len: usize,

    /// Seconds between purges of expired messages
    #[arg(long, env = "HEARTH_SWEEP_INTERVAL_SECS", default_value = "30")]
    sweep_interval_secs: u64,

    /// Default log level when RUST_LOG is unset
    #[arg(long, env = "HEARTH_LOG_LEVEL", default_value = "info")]
    log_level: String,
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            seed_path: args.seed,
            preview_len: args.preview_len,
            sweep_interval: Duration::from_secs(args.sweep_interval_secs.max(1)),
        }
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);
    let config = ServerConfig::from(args);

    // Initialize dependencies in order:
    // 1. Clock and seeded directories
    // 2. Repositories, presence and MessagePusher
    // 3. Background sweeper
    // 4. UseCases (AppState) and Server

    // 1. Seed users and chats
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let users = Arc::new(InMemoryUserDirectory::new());
    let chats = Arc::new(InMemoryChatRepository::new());
    if let Some(path) = &config.seed_path {
        let applied = match Seed::from_path(path) {
            Ok(seed) => {
                let now = Timestamp::new(clock.now_millis());
                seed.apply(&users, chats.as_ref(), now).await
            }
            Err(e) => Err(e),
        };
        match applied {
            Ok((user_count, chat_count)) => tracing::info!(
                "Loaded {} users and {} chats from {}",
                user_count,
                chat_count,
                path.display()
            ),
            Err(e) => {
                tracing::error!("Failed to load seed {}: {}", path.display(), e);
                std::process::exit(1);
            }
        }
    } else {
        tracing::warn!("No seed file given; every token will be rejected");
    }

    // 2. Create in-memory infrastructure
    let deps = Dependencies::in_memory(users, chats, clock.clone());

    // 3. Start the expiration sweeper
    let _sweeper =
        ExpirationSweeper::new(deps.messages.clone(), clock, config.sweep_interval).spawn();

    // 4. Create the use cases and run the server
    let state = Arc::new(AppState::new(deps, &config));
    if let Err(e) = Server::new(state).run(&config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
