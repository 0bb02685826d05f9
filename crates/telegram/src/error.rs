//! Typed error enum for the Telegram crate.

use thiserror::Error;

/// Errors from Bot API calls and the message log.
#[derive(Debug, Error)]
pub enum TelegramError {
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),
    #[error("Bot API error {code}: {description}")]
    Api { code: u16, description: String },
    #[error("JSON parse error in {context}: {source}")]
    JsonParse {
        context: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("client initialization failed: {0}")]
    ClientInit(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TelegramError {
    /// Whether retrying the same call later may succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::HttpRequest(_) => true,
            Self::Api { code, .. } => matches!(code, 409 | 429 | 500..=599),
            Self::JsonParse { .. } | Self::ClientInit(_) | Self::Io(_) => false,
        }
    }

    /// Bot API rejected the request itself (HTTP 400). For `deleteMessage` this
    /// means the message is gone or can never be deleted.
    #[must_use]
    pub const fn is_bad_request(&self) -> bool {
        matches!(self, Self::Api { code: 400, .. })
    }
}
