//! Telegram Bot API collaborator for autodelete
//!
//! A small `reqwest` client for the three Bot API methods the service needs,
//! a long-poll loop over `getUpdates`, and an append-only log of inbound messages.

mod api_types;
mod client;
mod error;
mod message_log;
mod poller;

#[cfg(test)]
mod client_tests;

pub use api_types::{ApiResponse, Chat, Message, Update, User};
pub use client::TelegramClient;
pub use error::TelegramError;
pub use message_log::MessageLog;
pub use poller::UpdatePoller;
