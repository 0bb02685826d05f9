mod reconcile;
mod timers;


use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use autodelete_core::{Clock, DeleteAction, DeletionKey, clamp_delay};
use autodelete_storage::DeletionStore;
use tokio_util::task::TaskTracker;

use crate::ServiceError;
pub use reconcile::ReconcileReport;
use timers::{TimerPhase, TimerRegistry};
pub use timers::Completion;

/// Result of [`DeletionScheduler::cancel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelOutcome {
    /// The timer was stopped and its record removed; the message will not be deleted.
    Cancelled,
    /// The deletion is already running; it is left to finish.
    AlreadyCompleting,
    /// No live timer for this key.
    NotScheduled,
}

/// Schedules message deletions and keeps a durable record of each one until it completes.
///
/// At most one live timer exists per [`DeletionKey`]. A record is persisted before its
/// timer is armed and removed only after the chat service confirmed the message is gone.
pub struct DeletionScheduler {
    store: Arc<dyn DeletionStore>,
    deleter: Arc<dyn DeleteAction>,
    clock: Arc<dyn Clock>,
    delay_secs: f64,
    timers: Mutex<TimerRegistry>,
    tracker: TaskTracker,
}

impl std::fmt::Debug for DeletionScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeletionScheduler")
            .field("delay_secs", &self.delay_secs)
            .field("in_flight", &self.in_flight())
            .finish_non_exhaustive()
    }
}

impl DeletionScheduler {
    /// `delay_secs` is the configured delay used by [`schedule_default`](Self::schedule_default)
    /// and by [`reconcile`](Self::reconcile) to compute remaining wait times.
    #[must_use]
    pub fn new(
        store: Arc<dyn DeletionStore>,
        deleter: Arc<dyn DeleteAction>,
        clock: Arc<dyn Clock>,
        delay_secs: f64,
    ) -> Arc<Self> {
        Arc::new(Self {
            store,
            deleter,
            clock,
            delay_secs,
            timers: Mutex::new(TimerRegistry::default()),
            tracker: TaskTracker::new(),
        })
    }

    #[must_use]
    pub const fn delay_secs(&self) -> f64 {
        self.delay_secs
    }

    /// Schedule `key` for deletion after the configured delay.
    pub async fn schedule_default(self: &Arc<Self>, key: DeletionKey) -> Result<bool, ServiceError> {
        self.schedule(key, self.delay_secs).await
    }

    /// Persist `key` and arm a timer that deletes it after `delay_secs`.
    ///
    /// Negative delays fire immediately. Returns `false` without touching the store
    /// if a live timer for `key` already exists. Returns once the record is durable;
    /// the wait itself runs in the background.
    pub async fn schedule(
        self: &Arc<Self>,
        key: DeletionKey,
        delay_secs: f64,
    ) -> Result<bool, ServiceError> {
        let id = {
            let mut timers = self.timers();
            if timers.closed {
                return Err(ServiceError::ShuttingDown);
            }
            if timers.contains(key) {
                tracing::debug!(%key, "deletion already scheduled, ignoring");
                return Ok(false);
            }
            timers.reserve(key)
        };

        let registered_at = self.clock.now();
        if let Err(e) = self.store.add_deletion(key, registered_at).await {
            self.timers().release(key, id);
            return Err(e.into());
        }

        let delay = clamp_delay(delay_secs);
        let (armed, cancel_requested) = {
            let mut timers = self.timers();
            let persisting = matches!(timers.phase(key, id), Some(TimerPhase::Persisting));
            let cancel_requested =
                matches!(timers.phase(key, id), Some(TimerPhase::CancelRequested));
            let armed = persisting && !timers.closed;
            if armed {
                self.spawn_timer(&mut timers, key, id, delay);
            } else if let Some(entry) = timers.get_mut(key).filter(|_| cancel_requested) {
                entry.phase = TimerPhase::Cancelling;
            } else {
                timers.release(key, id);
            }
            (armed, cancel_requested)
        };

        if cancel_requested {
            // Same as `cancel`: the key stays reserved until the record is gone.
            let removed = self.store.remove_deletion(key).await;
            self.timers().release(key, id);
            removed?;
            tracing::info!(%key, "deletion cancelled while scheduling");
        } else if armed {
            tracing::info!(
                chat_id = key.chat_id,
                message_id = key.message_id,
                expires_in_secs = delay.as_secs_f64(),
                "scheduled deletion"
            );
        } else {
            tracing::info!(%key, "scheduler stopped before arming, record kept for next start");
        }
        Ok(true)
    }

    /// Stop a pending deletion and drop its record.
    ///
    /// A deletion whose timer has already fired is not interrupted, and its record
    /// is left for the completion path to settle.
    pub async fn cancel(&self, key: DeletionKey) -> Result<CancelOutcome, ServiceError> {
        let id = {
            let mut timers = self.timers();
            let Some(entry) = timers.get_mut(key) else {
                return Ok(CancelOutcome::NotScheduled);
            };
            match &entry.phase {
                TimerPhase::Persisting => {
                    entry.phase = TimerPhase::CancelRequested;
                    return Ok(CancelOutcome::Cancelled);
                },
                TimerPhase::CancelRequested | TimerPhase::Cancelling => {
                    return Ok(CancelOutcome::Cancelled);
                },
                TimerPhase::Completing => return Ok(CancelOutcome::AlreadyCompleting),
                TimerPhase::Sleeping(abort) => {
                    abort.abort();
                    entry.phase = TimerPhase::Cancelling;
                    entry.id
                },
            }
        };

        // Keep the key reserved until the record is gone so a new schedule cannot
        // have its fresh record removed by this call.
        let removed = self.store.remove_deletion(key).await;
        self.timers().release(key, id);
        removed?;

        tracing::info!(%key, "deletion cancelled");
        Ok(CancelOutcome::Cancelled)
    }

    /// Stop accepting work, drop sleeping timers and wait for running deletions.
    ///
    /// Records of dropped timers remain in the store and are picked up by the next
    /// [`reconcile`](Self::reconcile).
    pub async fn shutdown(&self) {
        let dropped = {
            let mut timers = self.timers();
            timers.closed = true;
            timers.abort_sleeping()
        };
        self.tracker.close();
        self.tracker.wait().await;
        tracing::info!(dropped, "deletion scheduler stopped");
    }

    /// Whether a live timer exists for `key`.
    #[must_use]
    pub fn is_scheduled(&self, key: DeletionKey) -> bool {
        self.timers().contains(key)
    }

    /// Number of keys with a live timer.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.timers().len()
    }

    fn timers(&self) -> MutexGuard<'_, TimerRegistry> {
        self.timers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
