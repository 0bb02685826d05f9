//! Typed error enum for the storage layer.

use thiserror::Error;

/// Storage-layer error. Any of these is fatal to the operation that hit it.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Could not obtain a connection from the pool.
    #[error("connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    /// SQL / IO / locking failure.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Row data could not be turned into a domain value.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// The blocking worker running the query panicked or was cancelled.
    #[error("blocking task failed: {0}")]
    TaskJoin(String),
}

impl StorageError {
    /// Whether this error is likely transient (worth retrying).
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Pool(_) => true,
            Self::Database(rusqlite::Error::SqliteFailure(err, _)) => matches!(
                err.code,
                rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked
            ),
            _ => false,
        }
    }
}
