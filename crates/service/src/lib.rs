//! Service layer for autodelete
//!
//! Owns the in-flight deletion timers and keeps them consistent with the
//! durable store across restarts.

#![allow(clippy::missing_errors_doc, reason = "Errors are self-explanatory from Result types")]
#![allow(clippy::question_mark_used, reason = "? operator is idiomatic Rust")]
#![allow(clippy::implicit_return, reason = "Implicit return is idiomatic Rust")]

mod deletion_scheduler;
mod error;

pub use deletion_scheduler::{CancelOutcome, Completion, DeletionScheduler, ReconcileReport};
pub use error::ServiceError;
