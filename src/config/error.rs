//! Configuration error types.

use thiserror::Error;

/// Problems found while reading the settings form.
///
/// None of these stop the controller: each one names the value that was
/// substituted for the offending field.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("Max number {raw:?} is not a usable integer, using {fallback}")]
    UnparsableMaxNumber { raw: String, fallback: i64 },

    #[error("Max number {value} is not positive, draws are disabled")]
    NonPositiveMaxNumber { value: i64 },

    #[error("Max number {value} exceeds {limit}, using {fallback}")]
    MaxNumberTooLarge { value: i64, limit: u32, fallback: i64 },

    #[error("Duration {raw:?} is not a number of seconds, using {fallback_secs}s")]
    UnparsableDuration { raw: String, fallback_secs: f64 },

    #[error("Duration {secs}s is negative, using {fallback_secs}s")]
    NegativeDuration { secs: f64, fallback_secs: f64 },

    #[error("Duration {secs}s exceeds {limit_secs}s, clamped")]
    DurationTooLong { secs: f64, limit_secs: f64 },
}
