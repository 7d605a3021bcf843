//! Elapsed-time ticker for a running game.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Publishes whole seconds since the game started on a fixed interval.
///
/// The ticker stops once the game's completion channel carries the final
/// time; that value is published and then the reading stays frozen.
pub struct ElapsedTimer {
    elapsed: watch::Receiver<u64>,
    handle: Option<JoinHandle<()>>,
}

impl ElapsedTimer {
    /// Spawn the ticker on the current tokio runtime. Returns `None` when
    /// called outside a runtime.
    ///
    /// `finished` carries `None` while the game runs and `Some(seconds)`
    /// once it is complete.
    pub fn spawn(
        started_at: DateTime<Utc>,
        interval: Duration,
        mut finished: watch::Receiver<Option<u64>>,
    ) -> Option<Self> {
        let runtime = Handle::try_current().ok()?;
        let (tx, elapsed) = watch::channel(seconds_since(started_at));

        let handle = runtime.spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                let done = *finished.borrow_and_update();
                if let Some(final_seconds) = done {
                    let _ = tx.send(final_seconds);
                    break;
                }

                tokio::select! {
                    _ = ticker.tick() => {
                        if tx.send(seconds_since(started_at)).is_err() {
                            break;
                        }
                    }
                    changed = finished.changed() => {
                        if changed.is_err() {
                            // Game dropped without finishing.
                            break;
                        }
                    }
                }
            }

            tracing::debug!("elapsed timer stopped");
        });

        Some(Self {
            elapsed,
            handle: Some(handle),
        })
    }

    /// Latest published reading.
    pub fn elapsed(&self) -> u64 {
        *self.elapsed.borrow()
    }

    /// A receiver that wakes on every new reading.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.elapsed.clone()
    }

    pub fn is_stopped(&self) -> bool {
        self.handle.as_ref().map_or(true, |h| h.is_finished())
    }

    /// Wait for the ticker to stop.
    pub async fn join(mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for ElapsedTimer {
    fn drop(&mut self) {
        if let Some(handle) = &self.handle {
            handle.abort();
        }
    }
}

fn seconds_since(started_at: DateTime<Utc>) -> u64 {
    (Utc::now() - started_at).num_seconds().max(0) as u64
}
