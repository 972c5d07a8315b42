//! Draw configuration.
//!
//! Two values drive a draw: the largest ticket number and how long each
//! binary digit spins during the reveal. Both arrive as raw text from a
//! settings form. Every problem in a submission is collected in one pass
//! using `Validation`, and a default is substituted for each bad field, so
//! saving the form never fails.
//!
//! # Example
//!
//! ```rust
//! use bitdraw::config::DrawConfiguration;
//! use std::time::Duration;
//!
//! let (config, issues) = DrawConfiguration::resolve("25", "0.4");
//! assert!(issues.is_empty());
//! assert_eq!(config.max_number, 25);
//! assert_eq!(config.per_digit(), Duration::from_millis(400));
//!
//! let (config, issues) = DrawConfiguration::resolve("lots", "-1");
//! assert_eq!(issues.len(), 2);
//! assert_eq!(config, DrawConfiguration::default());
//! ```

mod error;

pub use error::ConfigError;

use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::time::Duration;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Ticket range used when the form value cannot be used.
pub const DEFAULT_MAX_NUMBER: i64 = 100;

/// Per-digit spin time used when the form value cannot be used.
pub const DEFAULT_PER_DIGIT_SECS: f64 = 1.0;

/// Longest accepted per-digit spin time.
pub const MAX_PER_DIGIT_SECS: f64 = 3600.0;

type Check = Validation<(), NonEmptyVec<ConfigError>>;

/// Process-wide draw settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawConfiguration {
    /// Largest ticket number. Values `<= 0` disable drawing.
    pub max_number: i64,
    /// Spin time of a single binary digit, in milliseconds.
    pub per_digit_ms: f64,
}

impl Default for DrawConfiguration {
    fn default() -> Self {
        Self {
            max_number: DEFAULT_MAX_NUMBER,
            per_digit_ms: DEFAULT_PER_DIGIT_SECS * 1000.0,
        }
    }
}

impl DrawConfiguration {
    /// Build a configuration from raw form values.
    ///
    /// `max_raw` is read as a leading integer (`"12 tickets"` is 12); blank,
    /// unparsable or zero falls back to [`DEFAULT_MAX_NUMBER`]. Negative
    /// values are kept, which turns draws into no-ops. `seconds_raw` is read
    /// as a leading decimal number of seconds (`"1.5s"` is 1.5, `".5"` is
    /// 0.5, `"2e1"` is 20).
    ///
    /// Returns the resolved configuration together with every problem found.
    pub fn resolve(max_raw: &str, seconds_raw: &str) -> (Self, Vec<ConfigError>) {
        let (max_number, max_check) = resolve_max_number(max_raw);
        let (per_digit_secs, duration_check) = resolve_seconds(seconds_raw);

        let issues = match Validation::all_vec(vec![max_check, duration_check]) {
            Validation::Success(_) => Vec::new(),
            Validation::Failure(errors) => errors.iter().cloned().collect(),
        };

        let config = Self {
            max_number,
            per_digit_ms: per_digit_secs * 1000.0,
        };
        (config, issues)
    }

    /// Largest ticket as a positive number, or `None` when draws must be
    /// ignored.
    pub fn max_ticket(&self) -> Option<NonZeroU32> {
        u32::try_from(self.max_number).ok().and_then(NonZeroU32::new)
    }

    /// Per-digit spin time. Non-finite or negative values read as zero.
    pub fn per_digit(&self) -> Duration {
        let secs = self.per_digit_ms / 1000.0;
        if !secs.is_finite() || secs <= 0.0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(secs.min(MAX_PER_DIGIT_SECS))
    }
}

fn resolve_max_number(raw: &str) -> (i64, Check) {
    let parsed = parse_leading_int(raw);
    match parsed {
        None if raw.trim().is_empty() => (DEFAULT_MAX_NUMBER, Validation::success(())),
        None | Some(0) => (
            DEFAULT_MAX_NUMBER,
            Validation::fail(ConfigError::UnparsableMaxNumber {
                raw: raw.to_string(),
                fallback: DEFAULT_MAX_NUMBER,
            }),
        ),
        Some(value) if value < 0 => (
            value,
            Validation::fail(ConfigError::NonPositiveMaxNumber { value }),
        ),
        Some(value) if value > i64::from(u32::MAX) => (
            DEFAULT_MAX_NUMBER,
            Validation::fail(ConfigError::MaxNumberTooLarge {
                value,
                limit: u32::MAX,
                fallback: DEFAULT_MAX_NUMBER,
            }),
        ),
        Some(value) => (value, Validation::success(())),
    }
}

fn resolve_seconds(raw: &str) -> (f64, Check) {
    let secs = match parse_leading_float(raw) {
        Some(secs) if secs.is_finite() => secs,
        _ => {
            return (
                DEFAULT_PER_DIGIT_SECS,
                Validation::fail(ConfigError::UnparsableDuration {
                    raw: raw.to_string(),
                    fallback_secs: DEFAULT_PER_DIGIT_SECS,
                }),
            )
        }
    };

    if secs < 0.0 {
        (
            DEFAULT_PER_DIGIT_SECS,
            Validation::fail(ConfigError::NegativeDuration {
                secs,
                fallback_secs: DEFAULT_PER_DIGIT_SECS,
            }),
        )
    } else if secs > MAX_PER_DIGIT_SECS {
        (
            MAX_PER_DIGIT_SECS,
            Validation::fail(ConfigError::DurationTooLong {
                secs,
                limit_secs: MAX_PER_DIGIT_SECS,
            }),
        )
    } else {
        (secs, Validation::success(()))
    }
}

/// Parse an optional sign and the run of ASCII digits at the start of
/// `raw`, ignoring leading whitespace and anything after the digits.
/// Saturates instead of overflowing.
fn parse_leading_int(raw: &str) -> Option<i64> {
    let text = raw.trim_start();
    let (negative, rest) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    let digits: Vec<i64> = rest
        .bytes()
        .take_while(u8::is_ascii_digit)
        .map(|b| i64::from(b - b'0'))
        .collect();
    if digits.is_empty() {
        return None;
    }

    let magnitude = digits
        .into_iter()
        .fold(0i64, |acc, d| acc.saturating_mul(10).saturating_add(d));
    Some(if negative { -magnitude } else { magnitude })
}

/// Parse the longest decimal number at the start of `raw`: an optional
/// sign, digits with an optional fraction, then an optional exponent.
/// Leading whitespace and anything after the number are ignored.
fn parse_leading_float(raw: &str) -> Option<f64> {
    let text = raw.trim_start();
    let bytes = text.as_bytes();
    let digits_at = |start: usize| {
        bytes
            .get(start..)
            .map_or(0, |rest| rest.iter().take_while(|b| b.is_ascii_digit()).count())
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let whole = digits_at(end);
    end += whole;
    let mut fraction = 0;
    if bytes.get(end) == Some(&b'.') {
        fraction = digits_at(end + 1);
        if whole + fraction > 0 {
            end += 1 + fraction;
        }
    }
    if whole + fraction == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let sign = usize::from(matches!(bytes.get(end + 1), Some(b'+' | b'-')));
        let exponent = digits_at(end + 1 + sign);
        if exponent > 0 {
            end += 1 + sign + exponent;
        }
    }
    text[..end].parse().ok()
}
