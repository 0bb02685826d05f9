use std::time::Duration;

use async_trait::async_trait;
use autodelete_core::{DeleteAction, DeleteOutcome, DeletionKey};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::api_types::{ApiResponse, Update, User};
use crate::error::TelegramError;

/// Longest slice of a response body quoted in errors.
const MAX_BODY_IN_ERROR: usize = 200;

/// Updates the poller asks for; everything else is never delivered.
const ALLOWED_UPDATES: &[&str] = &["message", "channel_post"];

/// Client for the Telegram Bot API.
pub struct TelegramClient {
    client: reqwest::Client,
    token: String,
    base_url: String,
}

impl std::fmt::Debug for TelegramClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramClient")
            .field("client", &self.client)
            .field("token", &"***")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[derive(Serialize)]
struct NoParams {}

#[derive(Serialize)]
struct GetUpdatesParams<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    offset: Option<i64>,
    timeout: u64,
    allowed_updates: &'a [&'a str],
}

#[derive(Serialize)]
struct DeleteMessageParams {
    chat_id: i64,
    message_id: i64,
}

impl TelegramClient {
    /// Creates a client for `token` against `base_url` (e.g. `https://api.telegram.org`).
    ///
    /// `timeout` bounds every request, long polls included.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built (TLS backend failure).
    pub fn new(token: String, base_url: &str, timeout: Duration) -> Result<Self, TelegramError> {
        let base_url = base_url.trim_end_matches('/').to_owned();
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TelegramError::ClientInit(e.to_string()))?;
        Ok(Self { client, token, base_url })
    }

    /// Returns the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The bot's own account. Used at startup to check the token.
    ///
    /// # Errors
    /// Returns an error if the request fails or the token is rejected.
    pub async fn get_me(&self) -> Result<User, TelegramError> {
        self.call("getMe", &NoParams {}).await
    }

    /// Long-poll for updates after `offset`, waiting up to `timeout_secs` for one to arrive.
    ///
    /// # Errors
    /// Returns an error if the request fails or the response cannot be parsed.
    pub async fn get_updates(
        &self,
        offset: Option<i64>,
        timeout_secs: u64,
    ) -> Result<Vec<Update>, TelegramError> {
        let params = GetUpdatesParams { offset, timeout: timeout_secs, allowed_updates: ALLOWED_UPDATES };
        self.call("getUpdates", &params).await
    }

    /// Delete one message.
    ///
    /// # Errors
    /// Returns [`TelegramError::Api`] with code 400 if the message does not exist
    /// or cannot be deleted, other errors for transport failures.
    pub async fn delete_message(&self, chat_id: i64, message_id: i64) -> Result<bool, TelegramError> {
        self.call("deleteMessage", &DeleteMessageParams { chat_id, message_id }).await
    }

    async fn call<P, T>(&self, method: &str, params: &P) -> Result<T, TelegramError>
    where
        P: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let url = format!("{}/bot{}/{method}", self.base_url, self.token);
        // The URL carries the token; keep it out of error messages and logs.
        let response = self
            .client
            .post(url)
            .json(params)
            .send()
            .await
            .map_err(|e| TelegramError::HttpRequest(e.without_url()))?;

        let status = response.status();
        let body =
            response.text().await.map_err(|e| TelegramError::HttpRequest(e.without_url()))?;

        let envelope: ApiResponse<T> = match serde_json::from_str(&body) {
            Ok(envelope) => envelope,
            Err(_) if !status.is_success() => {
                return Err(TelegramError::Api {
                    code: status.as_u16(),
                    description: truncate(&body, MAX_BODY_IN_ERROR).to_owned(),
                });
            },
            Err(source) => {
                return Err(TelegramError::JsonParse {
                    context: format!("{method} response (body: {})", truncate(&body, MAX_BODY_IN_ERROR)),
                    source,
                });
            },
        };

        match envelope {
            ApiResponse { ok: true, result: Some(result), .. } => Ok(result),
            ApiResponse { ok: true, result: None, .. } => Err(TelegramError::Api {
                code: status.as_u16(),
                description: format!("{method} succeeded without a result"),
            }),
            ApiResponse { description, error_code, .. } => Err(TelegramError::Api {
                code: error_code.unwrap_or_else(|| status.as_u16()),
                description: description.unwrap_or_default(),
            }),
        }
    }
}

#[async_trait]
impl DeleteAction for TelegramClient {
    async fn delete_message(&self, key: DeletionKey) -> DeleteOutcome {
        match Self::delete_message(self, key.chat_id, key.message_id).await {
            Ok(_) => DeleteOutcome::Deleted,
            Err(e) if e.is_bad_request() => {
                tracing::debug!(%key, error = %e, "deleteMessage rejected");
                DeleteOutcome::NotFound
            },
            Err(e) => DeleteOutcome::Failed(e.to_string()),
        }
    }
}

/// Truncates a string to the given maximum length at a char boundary.
#[must_use]
pub(crate) fn truncate(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        s
    } else {
        let mut end = max_len;
        while end > 0 && !s.is_char_boundary(end) {
            end = end.saturating_sub(1);
        }
        s.get(..end).unwrap_or("")
    }
}
