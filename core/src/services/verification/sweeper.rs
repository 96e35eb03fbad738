//! Background reclamation of expired codes
//!
//! Expiry is already enforced when a code is consumed, so the sweep only
//! bounds memory. It holds weak references and stops by itself once the
//! owning service is dropped.

use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info};

use super::store::CodeStore;
use super::throttle::ResendThrottle;

/// Counts from one sweep pass
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepReport {
    /// Expired verification records removed
    pub expired_codes: usize,
    /// Throttle entries whose cooldown had elapsed
    pub elapsed_cooldowns: usize,
}

impl SweepReport {
    pub fn is_empty(&self) -> bool {
        self.expired_codes == 0 && self.elapsed_cooldowns == 0
    }
}

/// Periodic sweep over the code store and resend throttle
pub struct ExpirySweeper {
    store: Weak<CodeStore>,
    throttle: Weak<ResendThrottle>,
    interval: Duration,
}

impl ExpirySweeper {
    pub fn new(store: &Arc<CodeStore>, throttle: &Arc<ResendThrottle>, interval: Duration) -> Self {
        Self {
            store: Arc::downgrade(store),
            throttle: Arc::downgrade(throttle),
            interval,
        }
    }

    /// Run a single sweep pass
    ///
    /// # Returns
    ///
    /// `None` once the store has been dropped
    pub fn run_once(&self) -> Option<SweepReport> {
        let store = self.store.upgrade()?;
        let expired_codes = store.sweep_expired();
        let elapsed_cooldowns = self
            .throttle
            .upgrade()
            .map(|throttle| throttle.sweep_elapsed())
            .unwrap_or(0);

        Some(SweepReport {
            expired_codes,
            elapsed_cooldowns,
        })
    }

    /// Spawn the sweep loop on the current tokio runtime
    ///
    /// The first pass runs one interval after start.
    pub fn start(self) -> SweeperHandle {
        let task = tokio::spawn(async move {
            info!(
                interval_seconds = self.interval.as_secs(),
                "Expiry sweeper started"
            );

            let mut timer = interval_at(Instant::now() + self.interval, self.interval);
            timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                timer.tick().await;

                match self.run_once() {
                    Some(report) if !report.is_empty() => {
                        info!(
                            expired_codes = report.expired_codes,
                            elapsed_cooldowns = report.elapsed_cooldowns,
                            event = "otp_sweep",
                            "Reclaimed expired verification state"
                        );
                    }
                    Some(_) => debug!(event = "otp_sweep", "Nothing to reclaim"),
                    None => {
                        info!("Code store dropped, expiry sweeper stopping");
                        break;
                    }
                }
            }
        });

        SweeperHandle { task: Some(task) }
    }
}

/// Owner of the running sweep task; aborts it on drop
#[derive(Debug)]
pub struct SweeperHandle {
    task: Option<JoinHandle<()>>,
}

impl SweeperHandle {
    /// Handle for a sweeper that was never started
    pub fn disabled() -> Self {
        Self { task: None }
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Stop the sweep loop and wait for the task to wind down
    pub async fn shutdown(mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            // Cancellation is the expected outcome
            let _ = task.await;
        }
    }
}

impl Drop for SweeperHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
