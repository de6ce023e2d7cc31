//! Background purge of messages whose TTL has elapsed.

use std::{sync::Arc, time::Duration};

use hearth_shared::time::Clock;
use tokio::task::JoinHandle;

use crate::domain::{MessageRepository, Timestamp};

/// Periodically removes expired messages from storage.
///
/// Reads already hide expired messages, so the sweep interval only bounds
/// how long they occupy memory.
pub struct ExpirationSweeper {
    messages: Arc<dyn MessageRepository>,
    clock: Arc<dyn Clock>,
    interval: Duration,
}

impl ExpirationSweeper {
    pub fn new(
        messages: Arc<dyn MessageRepository>,
        clock: Arc<dyn Clock>,
        interval: Duration,
    ) -> Self {
        Self {
            messages,
            clock,
            interval,
        }
    }

    /// Run one sweep and return the number of purged messages
    pub async fn sweep_once(&self) -> usize {
        let now = Timestamp::new(self.clock.now_millis());
        match self.messages.purge_expired(now).await {
            Ok(0) => 0,
            Ok(purged) => {
                tracing::info!("Purged {} expired messages", purged);
                purged
            }
            Err(e) => {
                tracing::warn!("Failed to purge expired messages: {}", e);
                0
            }
        }
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                self.sweep_once().await;
            }
        })
    }
}
