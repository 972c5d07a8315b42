//! Animated disclosure of a winner.
//!
//! The winner's zero-based index is written in binary (at least
//! [`MIN_WIDTH`] digits) and revealed one digit at a time: each digit flips
//! between `0` and `1` on an easing schedule, settles on its real bit, and
//! hands over to the next digit. Once the last digit settles the decimal
//! winner is shown.
//!
//! The engine is an explicit state machine: all progress happens through
//! [`RevealEngine::advance`] calls made by a scheduler, so a reveal can be
//! cancelled between callbacks or stepped on a virtual clock.

mod encoding;
mod engine;
mod error;
mod timing;

pub use encoding::{BinaryCode, MIN_WIDTH};
pub use engine::{RevealEngine, RevealPhase, RevealState, RevealStep};
pub use error::CodeError;
pub use timing::{
    ease_out_cubic, RevealTiming, DIGIT_GAP_FRACTION, MIN_DELAY, SPIN_TICKS, TICK_DIVISOR,
};
