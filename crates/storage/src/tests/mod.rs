//! Test utilities and module declarations for storage tests.

use crate::Storage;
use tempfile::TempDir;

#[expect(clippy::unwrap_used, reason = "test code")]
pub fn create_test_storage() -> (Storage, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.db");
    let storage = Storage::with_pool_size(&db_path, 2).unwrap();
    (storage, temp_dir)
}

mod deletion_tests;
