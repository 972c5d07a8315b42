//! Guard predicates for controlling phase transitions.
//!
//! A guard wraps a pure boolean function over a phase. The draw controller
//! uses one to decide whether a start command may leave its current phase.

use super::state::State;
use std::fmt;
use std::marker::PhantomData;

/// Pure predicate that determines if a transition can leave a phase.
///
/// # Example
///
/// ```rust
/// use bitdraw::controller::DrawPhase;
/// use bitdraw::core::Guard;
///
/// let may_start = Guard::new(|p: &DrawPhase| matches!(p, DrawPhase::Idle));
///
/// assert!(may_start.check(&DrawPhase::Idle));
/// assert!(!may_start.check(&DrawPhase::Animating));
/// ```
pub struct Guard<S: State> {
    predicate: Box<dyn Fn(&S) -> bool + Send + Sync>,
    _phantom: PhantomData<S>,
}

impl<S: State> Guard<S> {
    /// Create a guard from a pure predicate function.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&S) -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Box::new(predicate),
            _phantom: PhantomData,
        }
    }

    /// Guard that only passes for phases equal to `phase`.
    pub fn only(phase: S) -> Self
    where
        S: 'static,
    {
        Self::new(move |current| *current == phase)
    }

    /// Check if the guard allows leaving this phase.
    pub fn check(&self, state: &S) -> bool {
        (self.predicate)(state)
    }
}

impl<S: State> fmt::Debug for Guard<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Guard").finish_non_exhaustive()
    }
}
