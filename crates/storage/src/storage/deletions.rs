use autodelete_core::{Clock, DeletionKey, PendingDeletion, SystemClock};
use rusqlite::params;

use super::{Storage, get_conn};
use crate::StorageError;

fn row_to_pending_deletion(row: &rusqlite::Row<'_>) -> rusqlite::Result<PendingDeletion> {
    Ok(PendingDeletion::new(DeletionKey::new(row.get(0)?, row.get(1)?), row.get(2)?))
}

impl Storage {
    /// Persist a pending deletion registered at `registered_at` (epoch seconds).
    ///
    /// The row is committed before this returns.
    ///
    /// # Errors
    /// Returns error if the insert fails.
    pub fn add_deletion(&self, key: DeletionKey, registered_at: f64) -> Result<(), StorageError> {
        if !registered_at.is_finite() {
            return Err(StorageError::DataCorruption(format!(
                "refusing non-finite registered_at {registered_at} for {key}"
            )));
        }
        let conn = get_conn(&self.pool)?;
        conn.execute(
            "INSERT INTO pending_deletions (chat_id, message_id, registered_at)
               VALUES (?1, ?2, ?3)",
            params![key.chat_id, key.message_id, registered_at],
        )?;
        Ok(())
    }

    /// Persist a pending deletion registered now. Returns the stored timestamp.
    ///
    /// # Errors
    /// Returns error if the insert fails.
    pub fn add_deletion_now(&self, key: DeletionKey) -> Result<f64, StorageError> {
        let registered_at = SystemClock.now();
        self.add_deletion(key, registered_at)?;
        Ok(registered_at)
    }

    /// Remove every row for `key`. Returns how many rows went away; absent keys yield 0.
    ///
    /// # Errors
    /// Returns error if the delete fails.
    pub fn remove_deletion(&self, key: DeletionKey) -> Result<usize, StorageError> {
        let conn = get_conn(&self.pool)?;
        let removed = conn.execute(
            "DELETE FROM pending_deletions WHERE chat_id = ?1 AND message_id = ?2",
            params![key.chat_id, key.message_id],
        )?;
        Ok(removed)
    }

    /// Stored `registered_at` for `key`, earliest one if the key was stored twice.
    ///
    /// # Errors
    /// Returns error if the query fails.
    pub fn get_deletion(&self, key: DeletionKey) -> Result<Option<f64>, StorageError> {
        let conn = get_conn(&self.pool)?;
        let registered_at: Option<f64> = conn.query_row(
            "SELECT MIN(registered_at) FROM pending_deletions
               WHERE chat_id = ?1 AND message_id = ?2",
            params![key.chat_id, key.message_id],
            |row| row.get(0),
        )?;
        Ok(registered_at)
    }

    /// Every stored record, read inside one transaction.
    ///
    /// # Errors
    /// Returns error if the query fails or a row cannot be decoded.
    pub fn list_deletions(&self) -> Result<Vec<PendingDeletion>, StorageError> {
        let mut conn = get_conn(&self.pool)?;
        let tx = conn.transaction()?;
        let deletions = {
            let mut stmt = tx.prepare(
                "SELECT chat_id, message_id, registered_at FROM pending_deletions
                   ORDER BY registered_at ASC",
            )?;
            let rows: rusqlite::Result<Vec<_>> =
                stmt.query_map([], row_to_pending_deletion)?.collect();
            rows.map_err(|e| StorageError::DataCorruption(format!("pending_deletions row: {e}")))?
        };
        tx.commit()?;
        Ok(deletions)
    }

    /// Number of stored rows.
    ///
    /// # Errors
    /// Returns error if the query fails.
    pub fn count_deletions(&self) -> Result<usize, StorageError> {
        let conn = get_conn(&self.pool)?;
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM pending_deletions", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or(0))
    }
}
