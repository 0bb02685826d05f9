use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use autodelete_core::{DeleteOutcome, DeletionKey};
use tokio::task::AbortHandle;

use super::DeletionScheduler;

/// How a fired timer ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Message gone (deleted now or earlier), record removed.
    Removed,
    /// Deletion failed or the record could not be removed; retried after the next start.
    PendingRetry,
}

#[derive(Debug)]
pub(super) enum TimerPhase {
    /// Record being written; no task spawned yet.
    Persisting,
    /// Cancelled while persisting; the scheduling call removes the record.
    CancelRequested,
    /// Waiting for the deadline.
    Sleeping(AbortHandle),
    /// Deadline passed, deletion in progress. Not cancellable.
    Completing,
    /// Aborted by `cancel`, record removal in progress.
    Cancelling,
}

#[derive(Debug)]
pub(super) struct TimerEntry {
    /// Distinguishes successive timers for the same key.
    pub(super) id: u64,
    pub(super) phase: TimerPhase,
}

#[derive(Debug, Default)]
pub(super) struct TimerRegistry {
    next_id: u64,
    pub(super) closed: bool,
    entries: HashMap<DeletionKey, TimerEntry>,
}

impl TimerRegistry {
    pub(super) fn contains(&self, key: DeletionKey) -> bool {
        self.entries.contains_key(&key)
    }

    pub(super) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(super) fn get_mut(&mut self, key: DeletionKey) -> Option<&mut TimerEntry> {
        self.entries.get_mut(&key)
    }

    pub(super) fn phase(&self, key: DeletionKey, id: u64) -> Option<&TimerPhase> {
        self.entries.get(&key).filter(|e| e.id == id).map(|e| &e.phase)
    }

    /// Claim `key` before its record is written. Caller checked `contains` first.
    pub(super) fn reserve(&mut self, key: DeletionKey) -> u64 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        self.entries.insert(key, TimerEntry { id, phase: TimerPhase::Persisting });
        id
    }

    /// Drop the entry for `key` if it still belongs to timer `id`.
    pub(super) fn release(&mut self, key: DeletionKey, id: u64) {
        if self.entries.get(&key).is_some_and(|e| e.id == id) {
            self.entries.remove(&key);
        }
    }

    /// Sleeping -> Completing. `false` if the timer was cancelled or replaced meanwhile.
    fn begin_completion(&mut self, key: DeletionKey, id: u64) -> bool {
        match self.entries.get_mut(&key) {
            Some(entry) if entry.id == id && matches!(entry.phase, TimerPhase::Sleeping(_)) => {
                entry.phase = TimerPhase::Completing;
                true
            },
            _ => false,
        }
    }

    /// Abort every sleeping timer and forget it. Returns how many were dropped.
    pub(super) fn abort_sleeping(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| match &entry.phase {
            TimerPhase::Sleeping(abort) => {
                abort.abort();
                false
            },
            _ => true,
        });
        before - self.entries.len()
    }
}

impl DeletionScheduler {
    /// Spawn the timer task for an entry already reserved under `id`.
    ///
    /// Called with the registry locked, so the task cannot observe its entry before
    /// the abort handle is recorded.
    pub(super) fn spawn_timer(
        self: &Arc<Self>,
        timers: &mut TimerRegistry,
        key: DeletionKey,
        id: u64,
        delay: Duration,
    ) {
        let this = Arc::clone(self);
        let handle = self.tracker.spawn(async move {
            tokio::time::sleep(delay).await;
            this.fire(key, id).await;
        });
        match timers.entries.get_mut(&key) {
            Some(entry) if entry.id == id => entry.phase = TimerPhase::Sleeping(handle.abort_handle()),
            _ => handle.abort(),
        }
    }

    /// Insert a fresh entry for `key` and spawn its timer. Used for records that are
    /// already persisted. Returns `false` if `key` already has a live timer.
    pub(super) fn arm_persisted(
        self: &Arc<Self>,
        timers: &mut TimerRegistry,
        key: DeletionKey,
        delay: Duration,
    ) -> bool {
        if timers.contains(key) {
            return false;
        }
        let id = timers.reserve(key);
        self.spawn_timer(timers, key, id, delay);
        true
    }

    async fn fire(&self, key: DeletionKey, id: u64) {
        if !self.timers().begin_completion(key, id) {
            return;
        }
        self.complete(key).await;
        self.timers().release(key, id);
    }

    /// Ask the chat service to delete `key` and settle its record accordingly.
    pub(super) async fn complete(&self, key: DeletionKey) -> Completion {
        match self.deleter.delete_message(key).await {
            DeleteOutcome::Deleted => {
                tracing::info!(chat_id = key.chat_id, message_id = key.message_id, "deleted");
                self.forget(key).await
            },
            DeleteOutcome::NotFound => {
                tracing::info!(
                    chat_id = key.chat_id,
                    message_id = key.message_id,
                    "message was probably already deleted"
                );
                self.forget(key).await
            },
            DeleteOutcome::Failed(reason) => {
                tracing::warn!(
                    chat_id = key.chat_id,
                    message_id = key.message_id,
                    %reason,
                    "deletion failed, record kept until next start"
                );
                Completion::PendingRetry
            },
        }
    }

    async fn forget(&self, key: DeletionKey) -> Completion {
        match self.store.remove_deletion(key).await {
            Ok(_) => Completion::Removed,
            Err(e) => {
                tracing::error!(%key, error = %e, "failed to remove completed deletion record");
                Completion::PendingRetry
            },
        }
    }
}
