//! `SQLite` storage implementation.
//!
//! All methods are synchronous; async callers go through the
//! [`DeletionStore`](crate::DeletionStore) impl, which runs them on the blocking pool.

mod deletions;

use autodelete_core::constants::DEFAULT_DB_POOL_SIZE;
use autodelete_core::{ENV_DB_POOL_SIZE, env_parse_with_default};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use std::path::Path;

use crate::StorageError;
use crate::migrations;

/// Type alias for pooled connection
pub(crate) type PooledConn = PooledConnection<SqliteConnectionManager>;

/// Main storage struct wrapping `SQLite` connection pool
#[derive(Clone, Debug)]
pub struct Storage {
    pub(crate) pool: Pool<SqliteConnectionManager>,
}

/// Get a connection from the pool
pub(crate) fn get_conn(pool: &Pool<SqliteConnectionManager>) -> Result<PooledConn, StorageError> {
    Ok(pool.get()?)
}

/// Connection initializer: durability and concurrency settings.
///
/// `synchronous = FULL` so a committed insert survives power loss, not just a crash.
fn init_connection(conn: &mut Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "PRAGMA busy_timeout = 30000;
         PRAGMA journal_mode = WAL;
         PRAGMA synchronous = FULL;",
    )?;
    Ok(())
}

fn db_pool_size() -> u32 {
    env_parse_with_default(ENV_DB_POOL_SIZE, DEFAULT_DB_POOL_SIZE).max(1)
}

impl Storage {
    /// Open (or create) the store at `db_path`, pool size taken from the environment.
    ///
    /// # Errors
    /// Returns error if the database cannot be opened or migrated.
    pub fn new(db_path: &Path) -> Result<Self, StorageError> {
        Self::with_pool_size(db_path, db_pool_size())
    }

    /// Open (or create) the store at `db_path` with an explicit pool size.
    ///
    /// # Errors
    /// Returns error if the database cannot be opened or migrated.
    pub fn with_pool_size(db_path: &Path, pool_size: u32) -> Result<Self, StorageError> {
        let manager = SqliteConnectionManager::file(db_path).with_init(init_connection);
        let pool = Pool::builder().max_size(pool_size.max(1)).build(manager)?;

        // Run migrations on first connection
        let conn = pool.get()?;
        migrations::run_migrations(&conn)?;
        drop(conn);

        tracing::info!(
            path = %db_path.display(),
            pool_size,
            "Storage initialized with connection pool"
        );

        Ok(Self { pool })
    }
}
