//! Scheduling of reveal callbacks.
//!
//! The controller asks a [`Scheduler`] to wake it after a delay. A wakeup
//! carries the [`SessionId`] of the reveal that requested it, so callbacks
//! belonging to a reveal that was reset in the meantime are recognisably
//! stale. Hosts back the trait with their event loop's timers;
//! [`VirtualClock`] is a manual timeline for tests and headless runs.

use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::fmt;
use std::time::Duration;
use uuid::Uuid;

/// Identity of one reveal session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A scheduled callback, delivered back to the controller when due.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Wakeup {
    pub session: SessionId,
}

/// Timer service used by the draw controller.
pub trait Scheduler {
    /// Deliver `wakeup` once `delay` has passed.
    fn schedule_after(&mut self, delay: Duration, wakeup: Wakeup);

    /// Drop pending wakeups of `session`. Schedulers that cannot cancel may
    /// keep the default; the controller ignores stale wakeups anyway.
    fn cancel(&mut self, _session: SessionId) {}
}

impl<S: Scheduler + ?Sized> Scheduler for &mut S {
    fn schedule_after(&mut self, delay: Duration, wakeup: Wakeup) {
        (**self).schedule_after(delay, wakeup)
    }

    fn cancel(&mut self, session: SessionId) {
        (**self).cancel(session)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct Pending {
    due: Duration,
    seq: u64,
    wakeup: Wakeup,
}

/// Manually advanced timeline.
///
/// Wakeups fire in due order; wakeups due at the same instant fire in the
/// order they were scheduled.
///
/// # Example
///
/// ```rust
/// use bitdraw::schedule::{Scheduler, SessionId, VirtualClock, Wakeup};
/// use std::time::Duration;
///
/// let mut clock = VirtualClock::new();
/// let wakeup = Wakeup { session: SessionId::new() };
/// clock.schedule_after(Duration::from_millis(30), wakeup);
///
/// assert_eq!(clock.fire_until(Duration::from_millis(10)), None);
/// assert_eq!(clock.fire_next(), Some(wakeup));
/// assert_eq!(clock.now(), Duration::from_millis(30));
/// ```
#[derive(Clone, Debug, Default)]
pub struct VirtualClock {
    now: Duration,
    seq: u64,
    pending: BinaryHeap<Reverse<Pending>>,
}

impl VirtualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current position on the timeline.
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// When the earliest pending wakeup is due.
    pub fn next_due(&self) -> Option<Duration> {
        self.pending.peek().map(|Reverse(entry)| entry.due)
    }

    /// Jump to the earliest pending wakeup and return it.
    pub fn fire_next(&mut self) -> Option<Wakeup> {
        let Reverse(entry) = self.pending.pop()?;
        self.now = self.now.max(entry.due);
        Some(entry.wakeup)
    }

    /// Return the earliest wakeup due at or before `deadline`, moving the
    /// clock to its due time. `None` when nothing is due by then.
    pub fn fire_until(&mut self, deadline: Duration) -> Option<Wakeup> {
        match self.next_due() {
            Some(due) if due <= deadline => self.fire_next(),
            _ => None,
        }
    }

    /// Move the clock forward to `deadline` without firing anything.
    pub fn settle_at(&mut self, deadline: Duration) {
        self.now = self.now.max(deadline);
    }
}

impl Scheduler for VirtualClock {
    fn schedule_after(&mut self, delay: Duration, wakeup: Wakeup) {
        let entry = Pending {
            due: self.now.saturating_add(delay),
            seq: self.seq,
            wakeup,
        };
        self.seq += 1;
        self.pending.push(Reverse(entry));
    }

    fn cancel(&mut self, session: SessionId) {
        self.pending
            .retain(|Reverse(entry)| entry.wakeup.session != session);
    }
}
