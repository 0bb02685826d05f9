use std::sync::Arc;
use std::time::Duration;

use crate::api_types::{Message, Update};
use crate::client::TelegramClient;
use crate::error::TelegramError;

const INITIAL_BACKOFF: Duration = Duration::from_secs(1);
const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// Long-polls `getUpdates` and hands out inbound messages.
///
/// The offset only moves forward after a batch was fetched, so an update is
/// confirmed to Telegram by the next poll, never before it reached the caller.
#[derive(Debug)]
pub struct UpdatePoller {
    client: Arc<TelegramClient>,
    poll_timeout_secs: u64,
    offset: Option<i64>,
    initial_backoff: Duration,
    max_backoff: Duration,
}

impl UpdatePoller {
    #[must_use]
    pub const fn new(client: Arc<TelegramClient>, poll_timeout_secs: u64) -> Self {
        Self {
            client,
            poll_timeout_secs,
            offset: None,
            initial_backoff: INITIAL_BACKOFF,
            max_backoff: MAX_BACKOFF,
        }
    }

    #[must_use]
    pub const fn with_backoff(mut self, initial: Duration, max: Duration) -> Self {
        self.initial_backoff = initial;
        self.max_backoff = max;
        self
    }

    /// Offset sent with the next `getUpdates` call.
    #[must_use]
    pub const fn offset(&self) -> Option<i64> {
        self.offset
    }

    /// Wait for the next batch of messages. May return an empty batch when the
    /// long poll times out or the updates carried no message.
    ///
    /// Transient failures are retried with exponential backoff.
    ///
    /// # Errors
    /// Returns the first non-transient error, e.g. a revoked token.
    pub async fn next_batch(&mut self) -> Result<Vec<Message>, TelegramError> {
        let mut backoff = self.initial_backoff;
        loop {
            match self.client.get_updates(self.offset, self.poll_timeout_secs).await {
                Ok(updates) => return Ok(self.accept(updates)),
                Err(e) if e.is_transient() => {
                    tracing::warn!(error = %e, retry_in = ?backoff, "getUpdates failed");
                    tokio::time::sleep(backoff).await;
                    backoff = backoff.saturating_mul(2).min(self.max_backoff);
                },
                Err(e) => return Err(e),
            }
        }
    }

    fn accept(&mut self, updates: Vec<Update>) -> Vec<Message> {
        if let Some(last) = updates.iter().map(|u| u.update_id).max() {
            self.offset = Some(last.saturating_add(1));
        }
        updates.into_iter().filter_map(Update::into_message).collect()
    }
}
