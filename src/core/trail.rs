//! Phase transition trail.
//!
//! Records each phase change of a machine together with the offset on the
//! machine's own timeline at which it happened. The reveal engine keeps one
//! per session, so tests and diagnostics can inspect the exact order in
//! which digits spun and settled.

use super::state::State;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Record of a single phase change.
///
/// `at` is measured from the start of the machine's timeline, not from the
/// wall clock, so trails recorded on a virtual clock are reproducible.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct PhaseChange<S: State> {
    /// The phase being left
    pub from: S,
    /// The phase being entered
    pub to: S,
    /// Offset on the machine's timeline
    pub at: Duration,
}

/// Ordered trail of phase changes.
///
/// The trail is immutable - `record` returns a new trail with the change
/// appended.
///
/// # Example
///
/// ```rust
/// use bitdraw::core::{PhaseChange, PhaseTrail};
/// use bitdraw::reveal::RevealPhase;
/// use std::time::Duration;
///
/// let trail = PhaseTrail::new()
///     .record(PhaseChange {
///         from: RevealPhase::Idle,
///         to: RevealPhase::Spinning { digit: 0 },
///         at: Duration::ZERO,
///     })
///     .record(PhaseChange {
///         from: RevealPhase::Spinning { digit: 0 },
///         to: RevealPhase::Settling { digit: 0 },
///         at: Duration::from_millis(40),
///     });
///
/// assert_eq!(trail.path().len(), 3);
/// assert_eq!(trail.span(), Some(Duration::from_millis(40)));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct PhaseTrail<S: State> {
    changes: Vec<PhaseChange<S>>,
}

impl<S: State> Default for PhaseTrail<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State> PhaseTrail<S> {
    /// Create an empty trail.
    pub fn new() -> Self {
        Self {
            changes: Vec::new(),
        }
    }

    /// Record a change, returning a new trail.
    pub fn record(&self, change: PhaseChange<S>) -> Self {
        let mut changes = self.changes.clone();
        changes.push(change);
        Self { changes }
    }

    /// Phases traversed: the first `from`, then every `to` in order.
    pub fn path(&self) -> Vec<&S> {
        let mut path = Vec::with_capacity(self.changes.len() + 1);
        if let Some(first) = self.changes.first() {
            path.push(&first.from);
        }
        for change in &self.changes {
            path.push(&change.to);
        }
        path
    }

    /// Time between the first and the last recorded change.
    ///
    /// `None` for an empty trail.
    pub fn span(&self) -> Option<Duration> {
        match (self.changes.first(), self.changes.last()) {
            (Some(first), Some(last)) => Some(last.at.saturating_sub(first.at)),
            _ => None,
        }
    }

    /// The most recently entered phase, if any change was recorded.
    pub fn last_phase(&self) -> Option<&S> {
        self.changes.last().map(|change| &change.to)
    }

    pub fn changes(&self) -> &[PhaseChange<S>] {
        &self.changes
    }
}
