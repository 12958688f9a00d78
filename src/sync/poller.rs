//! Background refresh of the selected rack.

use std::sync::Weak;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use super::GridEngine;
use crate::models::RackId;

/// Periodic poll task bound to one rack.
///
/// Dropping the poller closes its shutdown channel and the task exits at its next wait.
/// A poll already in flight is allowed to finish; its response goes through the engine's
/// usual staleness check.
#[derive(Debug)]
pub struct Poller {
    rack_id: RackId,
    shutdown: watch::Sender<()>,
    task: JoinHandle<()>,
}

impl Poller {
    pub(crate) fn spawn(engine: Weak<GridEngine>, rack_id: RackId, period: Duration) -> Self {
        let (shutdown, mut shutdown_rx) = watch::channel(());

        let task = tokio::spawn(async move {
            // The initial fetch is done by the caller, so the first tick is one period out.
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {}
                    _ = shutdown_rx.changed() => break,
                }

                let Some(engine) = engine.upgrade() else {
                    break;
                };
                if let Err(e) = engine.poll_rack(rack_id).await {
                    tracing::debug!(rack_id, error = %e, "poll failed");
                }
            }

            tracing::debug!(rack_id, "poller stopped");
        });

        tracing::debug!(rack_id, period_ms = period.as_millis() as u64, "poller started");

        Self {
            rack_id,
            shutdown,
            task,
        }
    }

    pub fn rack_id(&self) -> RackId {
        self.rack_id
    }

    /// Signal the task and wait for it to finish.
    pub async fn stop(self) {
        let Poller { shutdown, task, .. } = self;
        drop(shutdown);
        if let Err(e) = task.await {
            tracing::warn!(error = %e, "poller task ended abnormally");
        }
    }
}
