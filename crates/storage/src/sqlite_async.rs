//! Async trait implementation for SQLite `Storage` via `spawn_blocking`.

use async_trait::async_trait;
use autodelete_core::{DeletionKey, PendingDeletion};

use crate::traits::DeletionStore;
use crate::{Storage, StorageError};

/// Helper: run a blocking closure on the tokio blocking pool.
async fn blocking<F, T>(f: F) -> Result<T, StorageError>
where
    F: FnOnce() -> Result<T, StorageError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| StorageError::TaskJoin(format!("spawn_blocking join error: {e}")))?
}

/// Body-generating macro for async-to-blocking delegation.
///
/// Arguments must be `Copy`; each one is moved into the blocking closure.
macro_rules! delegate {
    ($self:ident, $method:ident $(, $arg:ident)*) => {{
        let s = $self.clone();
        blocking(move || s.$method($($arg),*)).await
    }};
}

#[async_trait]
impl DeletionStore for Storage {
    async fn add_deletion(
        &self,
        key: DeletionKey,
        registered_at: f64,
    ) -> Result<(), StorageError> {
        delegate!(self, add_deletion, key, registered_at)
    }
    async fn remove_deletion(&self, key: DeletionKey) -> Result<usize, StorageError> {
        delegate!(self, remove_deletion, key)
    }
    async fn get_deletion(&self, key: DeletionKey) -> Result<Option<f64>, StorageError> {
        delegate!(self, get_deletion, key)
    }
    async fn list_deletions(&self) -> Result<Vec<PendingDeletion>, StorageError> {
        delegate!(self, list_deletions)
    }
}
