use std::path::{Path, PathBuf};

use serde_json::Value;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::api_types::Message;
use crate::error::TelegramError;

/// Append-only JSONL file with one line per inbound message.
///
/// The Unix `date` of each message is replaced by its RFC 3339 form.
#[derive(Debug)]
pub struct MessageLog {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl MessageLog {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), write_lock: Mutex::new(()) }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// # Errors
    /// Returns an error if the message cannot be serialized or the file written.
    pub async fn append(&self, message: &Message) -> Result<(), TelegramError> {
        let mut line = log_record(message)?.to_string();
        line.push('\n');

        let _guard = self.write_lock.lock().await;
        let mut file =
            tokio::fs::OpenOptions::new().create(true).append(true).open(&self.path).await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}

fn log_record(message: &Message) -> Result<Value, TelegramError> {
    let mut record = serde_json::to_value(message).map_err(|source| TelegramError::JsonParse {
        context: "message log record".to_owned(),
        source,
    })?;
    if let (Some(fields), Some(date)) = (record.as_object_mut(), message.date_iso()) {
        fields.insert("date".to_owned(), Value::String(date));
    }
    Ok(record)
}
