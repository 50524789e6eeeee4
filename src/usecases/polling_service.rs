//! Long-polling loop: pull updates from the chat platform and hand each one to the sink.
//!
//! Used when no webhook is configured. Runs until the shutdown signal fires.

use crate::ports::{ChatGateway, UpdateSink};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Server-side long-poll window.
pub const LONG_POLL_SECS: u64 = 30;
/// Pause after a failed `get_updates` before trying again.
pub const ERROR_BACKOFF: Duration = Duration::from_secs(5);

pub struct PollingService {
    gateway: Arc<dyn ChatGateway>,
    sink: Arc<dyn UpdateSink>,
    poll_secs: u64,
    backoff: Duration,
}

impl PollingService {
    pub fn new(gateway: Arc<dyn ChatGateway>, sink: Arc<dyn UpdateSink>) -> Self {
        Self {
            gateway,
            sink,
            poll_secs: LONG_POLL_SECS,
            backoff: ERROR_BACKOFF,
        }
    }

    /// Override the poll window and back-off (tests, local development).
    pub fn with_timing(mut self, poll_secs: u64, backoff: Duration) -> Self {
        self.poll_secs = poll_secs;
        self.backoff = backoff;
        self
    }

    /// Poll until `shutdown` becomes true. Each update is processed on its own task
    /// so a slow fan-out never holds up the next poll.
    pub async fn run_loop(&self, mut shutdown: watch::Receiver<bool>) {
        info!(poll_secs = self.poll_secs, "polling for updates");
        let mut offset: i64 = 0;

        loop {
            if *shutdown.borrow() {
                break;
            }

            let polled = tokio::select! {
                result = self.gateway.get_updates(offset, self.poll_secs) => result,
                _ = shutdown.changed() => break,
            };

            match polled {
                Ok(updates) => {
                    for update in updates {
                        offset = offset.max(update.update_id + 1);
                        let sink = Arc::clone(&self.sink);
                        tokio::spawn(async move {
                            let update_id = update.update_id;
                            if let Err(e) = sink.handle_update(update).await {
                                warn!(update_id, error = %e, "update processing failed");
                            }
                        });
                    }
                    debug!(offset, "poll cycle complete");
                }
                Err(e) => {
                    warn!(
                        error = %e,
                        backoff_secs = self.backoff.as_secs(),
                        "getUpdates failed; backing off"
                    );
                    tokio::select! {
                        _ = tokio::time::sleep(self.backoff) => {}
                        _ = shutdown.changed() => break,
                    }
                }
            }
        }

        info!("polling stopped");
    }
}
