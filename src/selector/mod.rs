//! Winner selection.
//!
//! Picks one ticket uniformly from `1..=max`, skipping the most recent
//! winners. When every ticket in range was a recent winner the full range
//! is used instead, so a winner always exists for `max >= 1`.

mod ticket;

pub use ticket::TicketNumber;

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use std::num::NonZeroU32;

/// How many of the latest winners are excluded from the next draw.
pub const RECENT_WINDOW: usize = 3;

/// Source of winners for the draw controller.
pub trait Selector {
    /// Pick a winner in `1..=max_number`, avoiding `recent_winners` when
    /// possible.
    fn select_winner(
        &mut self,
        max_number: NonZeroU32,
        recent_winners: &[TicketNumber],
    ) -> TicketNumber;
}

/// Selector backed by a seedable random number generator.
///
/// The generator does not need to be cryptographically secure; it only has
/// to sample ranges uniformly.
#[derive(Debug, Clone)]
pub struct RandomSelector<R = ChaCha8Rng> {
    rng: R,
}

impl RandomSelector<ChaCha8Rng> {
    /// Deterministic selector: the same seed yields the same winners.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Selector seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self {
            rng: ChaCha8Rng::from_os_rng(),
        }
    }
}

impl<R: Rng> RandomSelector<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> Selector for RandomSelector<R> {
    fn select_winner(
        &mut self,
        max_number: NonZeroU32,
        recent_winners: &[TicketNumber],
    ) -> TicketNumber {
        select_winner(max_number, recent_winners, &mut self.rng)
    }
}

/// Number of tickets left in `1..=max_number` after exclusion.
///
/// Zero means the exclusion covers the whole range.
pub fn candidate_count(max_number: NonZeroU32, recent_winners: &[TicketNumber]) -> u32 {
    let excluded = excluded_in_range(max_number, recent_winners);
    // excluded values are distinct and within range
    max_number.get() - excluded.len() as u32
}

/// Pick a winner uniformly from the candidate set.
///
/// The candidate set is never materialised: a uniform index into the
/// remaining tickets is mapped back onto `1..=max_number` by stepping over
/// the sorted exclusions.
pub fn select_winner<R: Rng>(
    max_number: NonZeroU32,
    recent_winners: &[TicketNumber],
    rng: &mut R,
) -> TicketNumber {
    let max = max_number.get();
    let excluded = excluded_in_range(max_number, recent_winners);
    let remaining = max - excluded.len() as u32;

    if remaining == 0 {
        log::debug!("all {max} tickets were recent winners, drawing from the full range");
        return ticket_at(rng.random_range(0..max));
    }

    let mut value = rng.random_range(0..remaining) + 1;
    for skipped in excluded {
        if skipped <= value {
            value += 1;
        } else {
            break;
        }
    }
    ticket_at(value - 1)
}

/// Ticket at a zero-based index; `index` comes from sampling `0..max`, so
/// `index + 1` fits in `u32` and is non-zero.
fn ticket_at(index: u32) -> TicketNumber {
    TicketNumber::new(index.saturating_add(1)).unwrap_or(TicketNumber::from(NonZeroU32::MIN))
}

/// Distinct recent winners inside `1..=max_number`, ascending.
fn excluded_in_range(max_number: NonZeroU32, recent_winners: &[TicketNumber]) -> Vec<u32> {
    let mut excluded: Vec<u32> = recent_winners
        .iter()
        .map(|ticket| ticket.get())
        .filter(|&value| value <= max_number.get())
        .collect();
    excluded.sort_unstable();
    excluded.dedup();
    excluded
}
