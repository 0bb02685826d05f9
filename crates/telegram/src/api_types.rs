//! Bot API wire types. Only the fields the service reads are typed; the rest of
//! a message is carried along untouched for the message log.

use autodelete_core::DeletionKey;
use chrono::DateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Envelope every Bot API method answers with.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub error_code: Option<u16>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub is_bot: bool,
    pub first_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chat {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub message_id: i64,
    /// Unix time the message was sent.
    pub date: i64,
    pub chat: Chat,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Every other field of the message as received.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Message {
    #[must_use]
    pub const fn key(&self) -> DeletionKey {
        DeletionKey::new(self.chat.id, self.message_id)
    }

    /// `date` as an RFC 3339 string, `None` if out of range.
    #[must_use]
    pub fn date_iso(&self) -> Option<String> {
        DateTime::from_timestamp(self.date, 0).map(|d| d.to_rfc3339())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
    #[serde(default)]
    pub channel_post: Option<Message>,
}

impl Update {
    /// The new message this update carries, from a group or a channel.
    #[must_use]
    pub fn into_message(self) -> Option<Message> {
        self.message.or(self.channel_post)
    }
}
