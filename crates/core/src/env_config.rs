//! Environment variable parsing with warn-level logging for invalid values.

use std::fmt::Display;
use std::str::FromStr;

use crate::ConfigError;

/// Parse an environment variable with a default fallback.
///
/// - If the variable is not set: returns `default` silently (expected case).
/// - If the variable is set but cannot be parsed: logs a warning and returns `default`.
pub fn env_parse_with_default<T: FromStr + Display>(var: &str, default: T) -> T {
    parse_with_default(var, std::env::var(var).ok(), default)
}

/// Same as [`env_parse_with_default`] but over an already looked-up value.
pub fn parse_with_default<T: FromStr + Display>(var: &str, raw: Option<String>, default: T) -> T {
    match raw {
        Some(v) => match v.trim().parse() {
            Ok(n) => n,
            Err(_) => {
                tracing::warn!(
                    var,
                    value = %v,
                    default = %default,
                    "invalid env var value, using default"
                );
                default
            },
        },
        None => default,
    }
}

/// Parse a required value. Absence and parse failures are both errors.
///
/// # Errors
/// `ConfigError::Missing` when unset or blank, `ConfigError::Invalid` when unparsable.
pub fn parse_required<T>(var: &'static str, raw: Option<String>) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    let value = raw.filter(|v| !v.trim().is_empty()).ok_or(ConfigError::Missing(var))?;
    let parsed = value.trim().parse::<T>();
    parsed.map_err(|e| ConfigError::Invalid { var, reason: e.to_string(), value })
}
