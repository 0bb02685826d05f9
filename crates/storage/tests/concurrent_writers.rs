#![expect(clippy::unwrap_used, reason = "test code")]

use std::sync::Arc;

use autodelete_core::DeletionKey;
use autodelete_storage::{DeletionStore, Storage};
use tempfile::tempdir;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_many_concurrent_adds_and_removes() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("test.db");
    let storage: Arc<dyn DeletionStore> = Arc::new(Storage::with_pool_size(&db_path, 4).unwrap());

    let mut handles = vec![];
    for i in 0..50_i64 {
        let storage = Arc::clone(&storage);
        handles.push(tokio::spawn(async move {
            let key = DeletionKey::new(100, i);
            storage.add_deletion(key, i as f64).await.unwrap();
            if i % 2 == 0 {
                storage.remove_deletion(key).await.unwrap();
            }
        }));
    }

    for handle in handles {
        handle.await.unwrap();
    }

    let remaining = storage.list_deletions().await.unwrap();
    assert_eq!(remaining.len(), 25, "odd message ids should remain, found {}", remaining.len());
    assert!(remaining.iter().all(|d| d.key.message_id % 2 == 1));
}

#[tokio::test]
async fn test_records_visible_to_fresh_connection() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("test.db");
    let storage = Storage::new(&db_path).unwrap();

    DeletionStore::add_deletion(&storage, DeletionKey::new(5, 6), 7.0).await.unwrap();

    let conn = rusqlite::Connection::open(&db_path).unwrap();
    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM pending_deletions WHERE chat_id = 5 AND message_id = 6",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(count, 1);
}
