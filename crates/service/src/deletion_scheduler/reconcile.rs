use std::collections::HashMap;
use std::sync::Arc;

use autodelete_core::{DeletionKey, PendingDeletion, clamp_delay};

use super::DeletionScheduler;
use crate::ServiceError;

/// What a reconciliation pass did with the stored records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Records re-armed with their remaining delay.
    pub rearmed: usize,
    /// Records already past their deadline, fired immediately.
    pub overdue: usize,
    /// Records whose key already had a live timer.
    pub skipped: usize,
}

impl ReconcileReport {
    #[must_use]
    pub const fn total(&self) -> usize {
        self.rearmed + self.overdue + self.skipped
    }
}

impl DeletionScheduler {
    /// Rebuild timers for every stored record, using `now` (epoch seconds) to shrink
    /// each wait to what is left of the configured delay.
    ///
    /// Meant to run once at startup. Records are not re-inserted; keys stored more
    /// than once get a single timer based on their earliest registration.
    pub async fn reconcile(self: &Arc<Self>, now: f64) -> Result<ReconcileReport, ServiceError> {
        tracing::info!("Scheduling deletion of messages recorded before this start");

        let records = self.store.list_deletions().await?;
        let mut earliest: HashMap<DeletionKey, f64> = HashMap::with_capacity(records.len());
        for record in &records {
            earliest
                .entry(record.key)
                .and_modify(|at| *at = at.min(record.registered_at))
                .or_insert(record.registered_at);
        }

        let mut report = ReconcileReport::default();
        let mut timers = self.timers();
        if timers.closed {
            return Err(ServiceError::ShuttingDown);
        }
        for (key, registered_at) in earliest {
            let remaining = PendingDeletion::new(key, registered_at).remaining(self.delay_secs, now);
            if !self.arm_persisted(&mut timers, key, clamp_delay(remaining)) {
                report.skipped += 1;
            } else if remaining > 0.0 {
                report.rearmed += 1;
            } else {
                report.overdue += 1;
            }
        }
        drop(timers);

        tracing::info!(
            rearmed = report.rearmed,
            overdue = report.overdue,
            skipped = report.skipped,
            "Scheduling done"
        );
        Ok(report)
    }
}
