//! Deferred completion of delayed submissions
//!
//! [`DelayedCreationWorker::submit`] registers a pending task and returns at
//! once. The spawned work waits for the configured delay, persists the
//! payload under the task id and records the outcome in the [`TaskTracker`].
//! Scheduled work is never cancelled; shutdown waits for it up to a timeout.
//!
//! A sweeper spawned with [`DelayedCreationWorker::spawn_sweeper`] evicts
//! finished entries once they are older than the retention window.

use std::time::Duration;

use chrono::{TimeDelta, Utc};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker as InFlightTasks;

use super::tracker::TaskTracker;
use crate::ids::BreederId;
use crate::models::NewBreeder;
use crate::repository::{BreederRepository, BreederStore};

/// Schedules delayed breeder creation on the tokio runtime
#[derive(Debug, Clone)]
pub struct DelayedCreationWorker {
    tracker: TaskTracker,
    store: BreederStore,
    delay: Duration,
    in_flight: InFlightTasks,
    shutdown: CancellationToken,
}

impl DelayedCreationWorker {
    pub fn new(tracker: TaskTracker, store: BreederStore, delay: Duration) -> Self {
        Self {
            tracker,
            store,
            delay,
            in_flight: InFlightTasks::new(),
            shutdown: CancellationToken::new(),
        }
    }

    pub fn tracker(&self) -> &TaskTracker {
        &self.tracker
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Number of submissions whose completion work has not finished yet
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Register a new pending task and schedule its completion.
    ///
    /// Returns the task id, which is also the id the record will be stored under.
    pub fn submit(&self, payload: NewBreeder) -> BreederId {
        let mut payload = payload;
        loop {
            let task_id = BreederId::new();
            match self.schedule(&task_id, payload) {
                Ok(()) => return task_id,
                Err(returned) => {
                    tracing::warn!(task_id = %task_id, "Task id already tracked; generating another");
                    payload = returned;
                }
            }
        }
    }

    /// Schedule completion under `task_id`.
    ///
    /// Hands the payload back untouched when the id is already tracked.
    fn schedule(&self, task_id: &BreederId, payload: NewBreeder) -> Result<(), NewBreeder> {
        if !self.tracker.register(task_id) {
            return Err(payload);
        }

        let tracker = self.tracker.clone();
        let store = self.store.clone();
        let delay = self.delay;
        let id = task_id.clone();

        self.in_flight.spawn(async move {
            tokio::time::sleep(delay).await;

            match store.create(&id, payload).await {
                Ok(_) => {
                    tracker.complete(&id);
                    tracing::info!(task_id = %id, "Delayed breeder creation completed");
                }
                Err(e) => {
                    tracing::warn!(task_id = %id, error = %e, "Delayed breeder creation failed");
                    tracker.fail(&id, e.to_string());
                }
            }
        });

        tracing::info!(task_id = %task_id, delay_secs = delay.as_secs(), "Delayed breeder creation scheduled");
        Ok(())
    }

    /// Periodically evict finished entries older than `retention`.
    ///
    /// Runs until [`shutdown`](Self::shutdown) is called.
    pub fn spawn_sweeper(&self, retention: Duration, every: Duration) {
        let tracker = self.tracker.clone();
        let token = self.shutdown.clone();
        let retention = TimeDelta::from_std(retention).unwrap_or(TimeDelta::MAX);

        self.in_flight.spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;

                    () = token.cancelled() => {
                        tracing::debug!("Task status sweeper stopped");
                        break;
                    }
                    _ = ticker.tick() => {
                        let Some(cutoff) = Utc::now().checked_sub_signed(retention) else {
                            continue;
                        };
                        let evicted = tracker.evict_finished_before(cutoff);
                        if evicted > 0 {
                            tracing::debug!(evicted, remaining = tracker.len(), "Evicted finished task statuses");
                        }
                    }
                }
            }
        });
    }

    /// Stop the sweeper and wait up to `timeout` for scheduled work to finish.
    pub async fn shutdown(&self, timeout: Duration) {
        self.shutdown.cancel();
        self.in_flight.close();

        let pending = self.tracker.pending_count();
        if pending > 0 {
            tracing::info!(pending, "Waiting for delayed breeder creations to finish...");
        }

        if tokio::time::timeout(timeout, self.in_flight.wait())
            .await
            .is_err()
        {
            tracing::warn!(
                abandoned = self.tracker.pending_count(),
                "Shutdown timeout elapsed; abandoning delayed breeder creations"
            );
        } else {
            tracing::info!("All delayed breeder creations stopped");
        }
    }
}
