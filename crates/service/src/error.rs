//! Typed error enum for the service layer.

use autodelete_storage::StorageError;
use thiserror::Error;

/// Service-layer error.
///
/// Deletion failures reported by the chat service are not errors here: they
/// leave the record pending and are retried on the next start.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Storage operation failed. A scheduling request that hits this was not persisted.
    #[error("storage: {0}")]
    Storage(#[from] StorageError),

    /// The scheduler has been shut down and accepts no new timers.
    #[error("scheduler is shutting down")]
    ShuttingDown,
}
