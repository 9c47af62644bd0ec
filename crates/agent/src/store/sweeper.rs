//! Background TTL sweep for stores that do not expire entries themselves

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use travel_chat_core::ContextStore;

/// Handle to the running sweep task
pub struct ContextSweeper {
    shutdown_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl ContextSweeper {
    /// Spawn the sweep loop on the current tokio runtime
    ///
    /// Every `interval`, contexts idle for longer than `ttl` are removed.
    pub fn start(store: Arc<dyn ContextStore>, ttl: Duration, interval: Duration) -> Self {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

        let handle = tokio::spawn(async move {
            let mut timer = tokio::time::interval(interval);
            timer.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = timer.tick() => {
                        match store.purge_expired(ttl) {
                            Ok(0) => {},
                            Ok(removed) => {
                                let remaining = store.len().unwrap_or_default();
                                tracing::info!(
                                    removed,
                                    remaining,
                                    "Context sweep removed expired conversations"
                                );
                            },
                            Err(e) => tracing::warn!(error = %e, "Context sweep failed"),
                        }
                    }
                    _ = shutdown_rx.changed() => {
                        if *shutdown_rx.borrow() {
                            tracing::info!("Context sweeper shutting down");
                            break;
                        }
                    }
                }
            }
        });

        tracing::debug!(
            ttl_secs = ttl.as_secs(),
            interval_secs = interval.as_secs(),
            "Context sweeper started"
        );
        Self {
            shutdown_tx,
            handle,
        }
    }

    /// Signal shutdown and wait for the task to finish
    pub async fn stop(self) {
        let _ = self.shutdown_tx.send(true);
        if let Err(e) = self.handle.await {
            tracing::warn!(error = %e, "Context sweeper task ended abnormally");
        }
    }
}
