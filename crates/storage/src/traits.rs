//! Async storage trait used by the scheduler.

use async_trait::async_trait;
use autodelete_core::{DeletionKey, PendingDeletion};

use crate::error::StorageError;

/// Durable CRUD over pending deletions.
///
/// Implementations must tolerate concurrent calls from many timer tasks.
#[async_trait]
pub trait DeletionStore: Send + Sync {
    /// Persist a record. Durable once this returns `Ok`.
    async fn add_deletion(&self, key: DeletionKey, registered_at: f64)
    -> Result<(), StorageError>;

    /// Delete every record for `key`. Absent keys are not an error; returns rows removed.
    async fn remove_deletion(&self, key: DeletionKey) -> Result<usize, StorageError>;

    /// Stored `registered_at` for `key`, if any. Diagnostics only.
    async fn get_deletion(&self, key: DeletionKey) -> Result<Option<f64>, StorageError>;

    /// Consistent snapshot of every stored record.
    async fn list_deletions(&self) -> Result<Vec<PendingDeletion>, StorageError>;
}
