use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::MAX_DELAY_SECS;

/// Identifies one message awaiting deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DeletionKey {
    pub chat_id: i64,
    pub message_id: i64,
}

impl DeletionKey {
    #[must_use]
    pub const fn new(chat_id: i64, message_id: i64) -> Self {
        Self { chat_id, message_id }
    }
}

impl fmt::Display for DeletionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "chatid:{} msgid:{}", self.chat_id, self.message_id)
    }
}

/// A persisted deletion that has not completed yet.
///
/// `registered_at` is epoch seconds captured when the deletion was scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PendingDeletion {
    #[serde(flatten)]
    pub key: DeletionKey,
    pub registered_at: f64,
}

impl PendingDeletion {
    #[must_use]
    pub const fn new(key: DeletionKey, registered_at: f64) -> Self {
        Self { key, registered_at }
    }

    /// Seconds left before this deletion is due, given the configured delay.
    /// Zero or negative means overdue.
    #[must_use]
    pub fn remaining(&self, delay_secs: f64, now: f64) -> f64 {
        delay_secs - (now - self.registered_at)
    }
}

/// Convert a delay in seconds into a timer duration.
///
/// Negative and NaN delays fire immediately; anything above
/// [`MAX_DELAY_SECS`] is capped.
#[must_use]
pub fn clamp_delay(secs: f64) -> Duration {
    if secs.is_nan() || secs <= 0.0 {
        return Duration::ZERO;
    }
    Duration::from_secs_f64(secs.min(MAX_DELAY_SECS))
}
