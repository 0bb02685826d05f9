//! Process configuration, read once at startup.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{
    DATA_DIR_NAME, DB_FILE_NAME, DEFAULT_API_URL, DEFAULT_DB_POOL_SIZE, DEFAULT_HTTP_TIMEOUT_SECS,
    DEFAULT_POLL_TIMEOUT_SECS,
};
use crate::{ConfigError, parse_required, parse_with_default};

pub const ENV_BOT_TOKEN: &str = "AUTODELETE_BOT_TOKEN";
pub const ENV_CHAT_ID: &str = "AUTODELETE_CHAT_ID";
pub const ENV_DELAY_SECS: &str = "AUTODELETE_DELAY_SECS";
pub const ENV_API_URL: &str = "AUTODELETE_API_URL";
pub const ENV_DB_PATH: &str = "AUTODELETE_DB_PATH";
pub const ENV_HTTP_TIMEOUT_SECS: &str = "AUTODELETE_HTTP_TIMEOUT_SECS";
pub const ENV_POLL_TIMEOUT_SECS: &str = "AUTODELETE_POLL_TIMEOUT_SECS";
pub const ENV_DB_POOL_SIZE: &str = "AUTODELETE_DB_POOL_SIZE";
pub const ENV_MESSAGE_LOG: &str = "AUTODELETE_MESSAGE_LOG";

/// Everything the bot needs to run. Immutable once loaded.
#[derive(Clone)]
pub struct Settings {
    pub bot_token: String,
    /// The only chat whose messages get scheduled for deletion.
    pub chat_id: i64,
    pub delay_secs: f64,
    pub api_url: String,
    pub db_path: PathBuf,
    pub http_timeout: Duration,
    pub poll_timeout_secs: u64,
    pub db_pool_size: u32,
    pub message_log: Option<PathBuf>,
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("bot_token", &"***")
            .field("chat_id", &self.chat_id)
            .field("delay_secs", &self.delay_secs)
            .field("api_url", &self.api_url)
            .field("db_path", &self.db_path)
            .field("http_timeout", &self.http_timeout)
            .field("poll_timeout_secs", &self.poll_timeout_secs)
            .field("db_pool_size", &self.db_pool_size)
            .field("message_log", &self.message_log)
            .finish()
    }
}

impl Settings {
    /// Load settings from the process environment.
    ///
    /// # Errors
    /// Returns `ConfigError` if a required variable is missing or malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load settings from an arbitrary variable lookup.
    ///
    /// # Errors
    /// Returns `ConfigError` if a required variable is missing or malformed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bot_token: String = parse_required(ENV_BOT_TOKEN, lookup(ENV_BOT_TOKEN))?;
        let chat_id: i64 = parse_required(ENV_CHAT_ID, lookup(ENV_CHAT_ID))?;

        let raw_delay = lookup(ENV_DELAY_SECS);
        let delay_secs: f64 = parse_required(ENV_DELAY_SECS, raw_delay.clone())?;
        if !delay_secs.is_finite() || delay_secs <= 0.0 {
            return Err(ConfigError::Invalid {
                var: ENV_DELAY_SECS,
                value: raw_delay.unwrap_or_default(),
                reason: "must be a positive number of seconds".to_owned(),
            });
        }

        let api_url = lookup(ENV_API_URL)
            .filter(|v| !v.trim().is_empty())
            .map_or_else(|| DEFAULT_API_URL.to_owned(), |v| v.trim().trim_end_matches('/').to_owned());

        let db_path = db_path_from(lookup(ENV_DB_PATH));
        let http_timeout_secs = parse_with_default(
            ENV_HTTP_TIMEOUT_SECS,
            lookup(ENV_HTTP_TIMEOUT_SECS),
            DEFAULT_HTTP_TIMEOUT_SECS,
        );
        let poll_timeout_secs = parse_with_default(
            ENV_POLL_TIMEOUT_SECS,
            lookup(ENV_POLL_TIMEOUT_SECS),
            DEFAULT_POLL_TIMEOUT_SECS,
        );
        let db_pool_size =
            parse_with_default(ENV_DB_POOL_SIZE, lookup(ENV_DB_POOL_SIZE), DEFAULT_DB_POOL_SIZE)
                .max(1);
        let message_log =
            lookup(ENV_MESSAGE_LOG).filter(|v| !v.trim().is_empty()).map(PathBuf::from);

        Ok(Self {
            bot_token,
            chat_id,
            delay_secs,
            api_url,
            db_path,
            // Long polls must not be cut short by the per-request timeout.
            http_timeout: Duration::from_secs(http_timeout_secs.max(poll_timeout_secs.saturating_add(10))),
            poll_timeout_secs,
            db_pool_size,
            message_log,
        })
    }
}

/// Default database location under the platform data directory.
#[must_use]
pub fn default_db_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DATA_DIR_NAME)
        .join(DB_FILE_NAME)
}

/// Database path from `AUTODELETE_DB_PATH`, falling back to [`default_db_path`].
#[must_use]
pub fn db_path_from_env() -> PathBuf {
    db_path_from(std::env::var(ENV_DB_PATH).ok())
}

fn db_path_from(raw: Option<String>) -> PathBuf {
    raw.filter(|v| !v.trim().is_empty()).map_or_else(default_db_path, PathBuf::from)
}
