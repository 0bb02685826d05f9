//! Storage layer for autodelete
//!
//! SQLite-backed table of pending deletions. Every write is committed
//! durably before the call returns, so a crash right after scheduling
//! still leaves a record for the next startup to pick up.

mod error;
mod migrations;
mod sqlite_async;
mod storage;
#[cfg(test)]
mod tests;
pub mod traits;

pub use error::StorageError;
pub use migrations::SCHEMA_VERSION;
pub use storage::Storage;
pub use traits::DeletionStore;
