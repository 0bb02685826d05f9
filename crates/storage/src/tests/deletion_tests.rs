use autodelete_core::DeletionKey;

use super::create_test_storage;
use crate::{SCHEMA_VERSION, Storage};

#[test]
fn test_add_and_get_deletion() {
    let (storage, _temp_dir) = create_test_storage();
    let key = DeletionKey::new(100, 1);

    storage.add_deletion(key, 1_700_000_000.25).unwrap();

    let registered_at = storage.get_deletion(key).unwrap();
    assert_eq!(registered_at, Some(1_700_000_000.25));
    assert_eq!(storage.count_deletions().unwrap(), 1);
}

#[test]
fn test_get_missing_is_none() {
    let (storage, _temp_dir) = create_test_storage();
    assert_eq!(storage.get_deletion(DeletionKey::new(100, 9)).unwrap(), None);
}

#[test]
fn test_add_deletion_now_uses_current_time() {
    let (storage, _temp_dir) = create_test_storage();
    let key = DeletionKey::new(100, 2);

    let before = chrono::Utc::now().timestamp() as f64;
    let stored = storage.add_deletion_now(key).unwrap();
    let after = chrono::Utc::now().timestamp() as f64 + 1.0;

    assert!(stored >= before && stored <= after);
    assert_eq!(storage.get_deletion(key).unwrap(), Some(stored));
}

#[test]
fn test_remove_deletes_all_matching_rows() {
    let (storage, _temp_dir) = create_test_storage();
    let key = DeletionKey::new(100, 3);
    let other = DeletionKey::new(100, 4);

    storage.add_deletion(key, 10.0).unwrap();
    storage.add_deletion(key, 20.0).unwrap();
    storage.add_deletion(other, 30.0).unwrap();

    assert_eq!(storage.remove_deletion(key).unwrap(), 2);
    assert_eq!(storage.get_deletion(key).unwrap(), None);
    assert_eq!(storage.get_deletion(other).unwrap(), Some(30.0));
}

#[test]
fn test_remove_absent_is_noop() {
    let (storage, _temp_dir) = create_test_storage();
    let key = DeletionKey::new(100, 5);

    assert_eq!(storage.remove_deletion(key).unwrap(), 0);

    storage.add_deletion(key, 1.0).unwrap();
    assert_eq!(storage.remove_deletion(key).unwrap(), 1);
    assert_eq!(storage.remove_deletion(key).unwrap(), 0);
}

#[test]
fn test_get_returns_earliest_duplicate() {
    let (storage, _temp_dir) = create_test_storage();
    let key = DeletionKey::new(7, 7);

    storage.add_deletion(key, 50.0).unwrap();
    storage.add_deletion(key, 40.0).unwrap();

    assert_eq!(storage.get_deletion(key).unwrap(), Some(40.0));
}

#[test]
fn test_same_message_id_in_different_chats_is_distinct() {
    let (storage, _temp_dir) = create_test_storage();

    storage.add_deletion(DeletionKey::new(1, 42), 1.0).unwrap();
    storage.add_deletion(DeletionKey::new(2, 42), 2.0).unwrap();
    storage.remove_deletion(DeletionKey::new(1, 42)).unwrap();

    assert_eq!(storage.get_deletion(DeletionKey::new(2, 42)).unwrap(), Some(2.0));
}

#[test]
fn test_list_deletions_returns_everything() {
    let (storage, _temp_dir) = create_test_storage();

    storage.add_deletion(DeletionKey::new(-100, 1), 3.0).unwrap();
    storage.add_deletion(DeletionKey::new(-100, 2), 1.0).unwrap();
    storage.add_deletion(DeletionKey::new(-200, 1), 2.0).unwrap();

    let listed = storage.list_deletions().unwrap();
    assert_eq!(listed.len(), 3);
    let mut keys: Vec<_> = listed.iter().map(|d| d.key).collect();
    keys.sort();
    assert_eq!(
        keys,
        vec![DeletionKey::new(-200, 1), DeletionKey::new(-100, 1), DeletionKey::new(-100, 2)]
    );
    let first = listed.iter().find(|d| d.key == DeletionKey::new(-100, 2)).unwrap();
    assert_eq!(first.registered_at, 1.0);
}

#[test]
fn test_list_empty_store() {
    let (storage, _temp_dir) = create_test_storage();
    assert!(storage.list_deletions().unwrap().is_empty());
}

#[test]
fn test_non_finite_timestamp_rejected() {
    let (storage, _temp_dir) = create_test_storage();
    let result = storage.add_deletion(DeletionKey::new(1, 1), f64::NAN);
    assert!(matches!(result, Err(crate::StorageError::DataCorruption(_))));
    assert_eq!(storage.count_deletions().unwrap(), 0);
}

#[test]
fn test_records_survive_reopen() {
    let (storage, temp_dir) = create_test_storage();
    let key = DeletionKey::new(100, 6);
    storage.add_deletion(key, 123.5).unwrap();
    drop(storage);

    let reopened = Storage::with_pool_size(&temp_dir.path().join("test.db"), 1).unwrap();
    assert_eq!(reopened.get_deletion(key).unwrap(), Some(123.5));
}

#[test]
fn test_migrations_set_schema_version_and_are_idempotent() {
    let (storage, temp_dir) = create_test_storage();
    drop(storage);
    let _again = Storage::with_pool_size(&temp_dir.path().join("test.db"), 1).unwrap();

    let conn = rusqlite::Connection::open(temp_dir.path().join("test.db")).unwrap();
    let version: i32 = conn.pragma_query_value(None, "user_version", |row| row.get(0)).unwrap();
    assert_eq!(version, SCHEMA_VERSION);
}

#[test]
fn test_key_index_is_non_unique() {
    let (storage, temp_dir) = create_test_storage();
    let key = DeletionKey::new(-5, 9);
    storage.add_deletion(key, 1.0).unwrap();
    storage.add_deletion(key, 2.0).unwrap();
    drop(storage);

    let conn = rusqlite::Connection::open(temp_dir.path().join("test.db")).unwrap();
    let unique: i64 = conn
        .query_row(
            "SELECT \"unique\" FROM pragma_index_list('pending_deletions') \
             WHERE name = 'idx_pending_deletions_key'",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(unique, 0);
}
