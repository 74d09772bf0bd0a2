//! Active health checking.
//!
//! # Responsibilities
//! - Periodically refresh the manager's status
//! - Stop cleanly on shutdown

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time;

use crate::blockchain::ExecutionClient;
use crate::manager::ExecutionClientManager;

/// Background task calling `refresh_status` on a fixed interval.
pub struct StatusPoller<C: ExecutionClient> {
    manager: Arc<ExecutionClientManager<C>>,
    interval: Duration,
}

impl<C: ExecutionClient> StatusPoller<C> {
    pub fn new(manager: Arc<ExecutionClientManager<C>>, interval: Duration) -> Self {
        Self { manager, interval }
    }

    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(
            interval_secs = self.interval.as_secs(),
            "Status poller starting"
        );

        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let status = self.manager.refresh_status().await;
                    tracing::debug!(
                        primary_ready = status.primary.is_ready(),
                        fallback_ready = status.fallback.as_ref().map(|s| s.is_ready()),
                        "Execution client status refreshed"
                    );
                }
                _ = shutdown.recv() => {
                    tracing::info!("Status poller received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }
}
