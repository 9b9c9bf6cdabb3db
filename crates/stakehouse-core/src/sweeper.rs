use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::session::SessionDirectory;

/// Periodically removes expired sessions from a [`SessionDirectory`].
pub struct Sweeper {
    directory: Arc<SessionDirectory>,
    interval: Duration,
}

impl Sweeper {
    pub fn new(directory: Arc<SessionDirectory>, interval: Duration) -> Self {
        Self {
            directory,
            // tokio intervals panic on zero
            interval: interval.max(Duration::from_millis(1)),
        }
    }

    /// Start the sweep loop on the current runtime. It stops once `cancel`
    /// fires; await the handle to wait for the last pass to finish.
    pub fn spawn(self, cancel: CancellationToken) -> JoinHandle<()> {
        let sweeper = Arc::new(self);
        tokio::spawn(async move {
            sweeper.run(cancel).await;
        })
    }

    pub async fn run(self: Arc<Self>, cancel: CancellationToken) {
        info!(interval_ms = self.interval.as_millis() as u64, "session sweeper starting");

        // First pass one full interval after start, not immediately.
        let mut ticker = interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    let report = self.directory.sweep();
                    if report.sessions_removed > 0 || report.stale_tokens_removed > 0 {
                        info!(
                            sessions_removed = report.sessions_removed,
                            stale_tokens_removed = report.stale_tokens_removed,
                            remaining = self.directory.len(),
                            "session sweep finished"
                        );
                    } else {
                        debug!(remaining = self.directory.len(), "session sweep found nothing");
                    }
                }
            }
        }
        info!("session sweeper stopped");
    }
}
