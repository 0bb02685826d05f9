//! Narrow interfaces to the things the scheduler depends on but does not own.

use std::fmt;

use async_trait::async_trait;
use chrono::Utc;

use crate::DeletionKey;

/// Result of asking the chat service to delete a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// The message is already gone (or can never be deleted). Treated as done.
    NotFound,
    /// Anything else: network errors, timeouts, permission problems.
    Failed(String),
}

impl fmt::Display for DeleteOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Deleted => f.write_str("deleted"),
            Self::NotFound => f.write_str("not found"),
            Self::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

/// Deletes a message on the chat service.
///
/// Implementations must be idempotent: deleting an already deleted message
/// yields [`DeleteOutcome::NotFound`].
#[async_trait]
pub trait DeleteAction: Send + Sync {
    async fn delete_message(&self, key: DeletionKey) -> DeleteOutcome;
}

/// Wall-clock source, in epoch seconds.
pub trait Clock: Send + Sync {
    fn now(&self) -> f64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[allow(clippy::cast_precision_loss, reason = "microsecond epoch fits the f64 mantissa")]
    fn now(&self) -> f64 {
        Utc::now().timestamp_micros() as f64 / 1_000_000.0
    }
}
