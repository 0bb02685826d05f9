//! Core types and traits for autodelete
//!
//! Domain types shared by the store, the scheduler and the Telegram collaborator,
//! plus process configuration.

mod collaborator;
mod config;
pub mod constants;
mod deletion;
mod env_config;
mod error;

pub use collaborator::*;
pub use config::*;
pub use deletion::*;
pub use env_config::*;
pub use error::*;
