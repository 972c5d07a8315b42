//! Reveal pacing.
//!
//! Each digit spins for [`SPIN_TICKS`] ticks. Tick dwell grows along a
//! cubic ease-out, so the flips start fast and slow down before the digit
//! settles. A short gap separates consecutive digits.

use std::time::Duration;

/// Flips shown per digit before it settles.
pub const SPIN_TICKS: u32 = 20;

/// Per-digit duration divided by this gives the first tick's dwell.
pub const TICK_DIVISOR: f64 = SPIN_TICKS as f64 * 1.5;

/// Fraction of the per-digit duration waited between digits.
pub const DIGIT_GAP_FRACTION: f64 = 0.05;

/// Shortest delay ever scheduled. A zero per-digit duration still moves
/// one scheduler tick at a time.
pub const MIN_DELAY: Duration = Duration::from_millis(1);

/// `1 - (1 - p)^3`.
pub fn ease_out_cubic(progress: f64) -> f64 {
    1.0 - (1.0 - progress).powi(3)
}

/// Delay schedule for one reveal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RevealTiming {
    per_digit: Duration,
}

impl RevealTiming {
    pub fn new(per_digit: Duration) -> Self {
        Self { per_digit }
    }

    pub fn per_digit(&self) -> Duration {
        self.per_digit
    }

    /// Dwell after showing flip number `tick` (0-based).
    ///
    /// `base * (1 + ease_out(tick / SPIN_TICKS))` with
    /// `base = per_digit / TICK_DIVISOR`.
    pub fn tick_interval(&self, tick: u32) -> Duration {
        let base = self.per_digit.as_secs_f64() / TICK_DIVISOR;
        let progress = f64::from(tick) / f64::from(SPIN_TICKS);
        floored(base * (1.0 + ease_out_cubic(progress)))
    }

    /// Pause between a settled digit and the next one.
    pub fn digit_gap(&self) -> Duration {
        floored(self.per_digit.as_secs_f64() * DIGIT_GAP_FRACTION)
    }

    /// Wall time one digit occupies, gap included.
    pub fn digit_span(&self) -> Duration {
        (0..SPIN_TICKS)
            .map(|tick| self.tick_interval(tick))
            .sum::<Duration>()
            + self.digit_gap()
    }

    /// Wall time of a whole reveal of `width` digits.
    pub fn reveal_span(&self, width: usize) -> Duration {
        let digits = u32::try_from(width).unwrap_or(u32::MAX);
        self.digit_span().saturating_mul(digits)
    }
}

fn floored(secs: f64) -> Duration {
    Duration::try_from_secs_f64(secs)
        .unwrap_or(MIN_DELAY)
        .max(MIN_DELAY)
}
