//! Shared constants for autodelete.

/// Default Telegram Bot API base URL.
pub const DEFAULT_API_URL: &str = "https://api.telegram.org";

/// Default timeout for a single Bot API request, in seconds.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Default long-poll timeout passed to `getUpdates`, in seconds.
pub const DEFAULT_POLL_TIMEOUT_SECS: u64 = 50;

/// Default size of the SQLite connection pool.
pub const DEFAULT_DB_POOL_SIZE: u32 = 4;

/// Upper bound for any single timer. Larger delays are capped.
pub const MAX_DELAY_SECS: f64 = 365.0 * 24.0 * 60.0 * 60.0;

/// Directory (under the platform data dir) holding the default database.
pub const DATA_DIR_NAME: &str = "autodelete";

/// File name of the default database.
pub const DB_FILE_NAME: &str = "deletions.db";
