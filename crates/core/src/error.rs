use thiserror::Error;

/// Startup configuration failures. Fatal: the process refuses to start.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value {value:?} for {var}: {reason}")]
    Invalid { var: &'static str, value: String, reason: String },
}
