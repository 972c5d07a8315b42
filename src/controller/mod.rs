//! Draw lifecycle orchestration.
//!
//! [`DrawController`] owns the lifecycle `Idle -> Animating -> Idle`. A
//! start command picks a winner with the [`Selector`], consulting the
//! recent winners kept by the [`HistoryStore`], then hands it to a fresh
//! [`RevealEngine`]. Every engine step that asks to wait becomes a
//! [`Wakeup`] on the [`Scheduler`]; the host feeds due wakeups back through
//! [`DrawController::on_wakeup`]. When the reveal finishes the result is
//! appended to the history and the controller is idle again.
//!
//! # Example
//!
//! ```rust
//! use bitdraw::controller::{DrawController, DrawPhase};
//! use bitdraw::display::ResultPanel;
//! use bitdraw::history::MemoryStore;
//! use bitdraw::schedule::VirtualClock;
//! use bitdraw::selector::RandomSelector;
//!
//! let mut controller = DrawController::builder()
//!     .selector(RandomSelector::seeded(42))
//!     .storage(MemoryStore::new())
//!     .scheduler(VirtualClock::new())
//!     .display(ResultPanel::new())
//!     .build()
//!     .unwrap();
//!
//! controller.update_configuration("8", "0.1");
//! controller.start_draw().unwrap();
//! assert_eq!(controller.phase(), DrawPhase::Animating);
//!
//! let done = controller.run_until_idle().unwrap();
//! assert_eq!(controller.phase(), DrawPhase::Idle);
//! assert_eq!(controller.history().latest(), Some(&done.record));
//! ```

mod builder;
mod error;

pub use builder::DrawControllerBuilder;
pub use error::BuildError;

use crate::config::{ConfigError, DrawConfiguration};
use crate::core::{Guard, State};
use crate::display::{Controls, RevealDisplay};
use crate::history::{
    DrawRecord, HistoryError, HistoryLog, HistoryStore, KeyValueStore, PersistOutcome,
    StoreWarning,
};
use crate::reveal::{RevealEngine, RevealStep, RevealTiming};
use crate::schedule::{Scheduler, SessionId, VirtualClock, Wakeup};
use crate::selector::Selector;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Lifecycle of the draw controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrawPhase {
    /// Ready for a draw; a previous result may be on display.
    Idle,
    /// A reveal is running; start commands are ignored.
    Animating,
}

impl State for DrawPhase {
    fn name(&self) -> &str {
        match self {
            Self::Idle => "Idle",
            Self::Animating => "Animating",
        }
    }
}

/// A draw that ran to completion.
#[derive(Debug)]
pub struct CompletedDraw {
    pub session: SessionId,
    /// The record prepended to the history.
    pub record: DrawRecord,
    /// Whether the history reached storage.
    pub persisted: PersistOutcome,
}

struct ActiveReveal {
    session: SessionId,
    engine: RevealEngine,
}

/// Lottery controller with injected collaborators.
pub struct DrawController<Sel, K, Sch, D> {
    phase: DrawPhase,
    start_guard: Guard<DrawPhase>,
    config: DrawConfiguration,
    selector: Sel,
    history: HistoryStore<K>,
    scheduler: Sch,
    display: D,
    active: Option<ActiveReveal>,
    load_warning: Option<StoreWarning>,
}

impl<Sel, K, Sch, D> DrawController<Sel, K, Sch, D> {
    /// Start assembling a controller.
    pub fn builder() -> DrawControllerBuilder<Sel, K, Sch, D> {
        DrawControllerBuilder::new()
    }
}

impl<Sel, K, Sch, D> DrawController<Sel, K, Sch, D>
where
    Sel: Selector,
    K: KeyValueStore,
    Sch: Scheduler,
    D: RevealDisplay,
{
    fn assemble(
        config: DrawConfiguration,
        selector: Sel,
        history: HistoryStore<K>,
        scheduler: Sch,
        mut display: D,
        load_warning: Option<StoreWarning>,
    ) -> Self {
        display.set_controls(Controls::READY);
        Self {
            phase: DrawPhase::Idle,
            start_guard: Guard::only(DrawPhase::Idle),
            config,
            selector,
            history,
            scheduler,
            display,
            active: None,
            load_warning,
        }
    }

    pub fn phase(&self) -> DrawPhase {
        self.phase
    }

    pub fn config(&self) -> &DrawConfiguration {
        &self.config
    }

    pub fn history(&self) -> &HistoryLog {
        self.history.log()
    }

    pub fn history_store(&self) -> &HistoryStore<K> {
        &self.history
    }

    /// Warning raised while loading the history at build time, if any.
    pub fn load_warning(&self) -> Option<&StoreWarning> {
        self.load_warning.as_ref()
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn scheduler(&self) -> &Sch {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut Sch {
        &mut self.scheduler
    }

    pub fn selector_mut(&mut self) -> &mut Sel {
        &mut self.selector
    }

    /// Session of the running reveal.
    pub fn session(&self) -> Option<SessionId> {
        self.active.as_ref().map(|active| active.session)
    }

    /// Engine of the running reveal.
    pub fn reveal(&self) -> Option<&RevealEngine> {
        self.active.as_ref().map(|active| &active.engine)
    }

    /// Begin a draw.
    ///
    /// Ignored (returns `None`) while a reveal is running or when the
    /// configured maximum leaves no ticket to draw.
    pub fn start_draw(&mut self) -> Option<SessionId> {
        if !self.start_guard.check(&self.phase) {
            log::debug!("draw is {}, ignoring start", self.phase.name());
            return None;
        }
        let Some(max_number) = self.config.max_ticket() else {
            log::debug!(
                "max number {} leaves nothing to draw, ignoring start",
                self.config.max_number
            );
            return None;
        };

        let recent = self.history.recent_winners();
        let winner = self.selector.select_winner(max_number, &recent);
        let session = SessionId::new();
        let mut engine = RevealEngine::new(winner, RevealTiming::new(self.config.per_digit()));
        log::debug!(
            "session {session}: drawing from 1..={max_number} excluding {} recent winners",
            recent.len()
        );

        self.display.set_controls(Controls::LOCKED);
        self.phase = DrawPhase::Animating;
        match engine.start(&mut self.display) {
            RevealStep::Wait(delay) => {
                self.scheduler.schedule_after(delay, Wakeup { session });
                self.active = Some(ActiveReveal { session, engine });
                Some(session)
            }
            step => {
                log::debug!("session {session}: reveal did not start ({step:?})");
                self.phase = DrawPhase::Idle;
                self.display.set_controls(Controls::READY);
                None
            }
        }
    }

    /// Run the reveal callback carried by `wakeup`.
    ///
    /// Wakeups of a session that is no longer active are ignored. Returns
    /// the completed draw when this callback finished the reveal.
    pub fn on_wakeup(&mut self, wakeup: Wakeup) -> Option<CompletedDraw> {
        let step = match self.active.as_mut() {
            Some(active) if active.session == wakeup.session => {
                active.engine.advance(&mut self.display)
            }
            _ => {
                log::debug!("ignoring stale wakeup for session {}", wakeup.session);
                return None;
            }
        };
        self.follow(wakeup.session, step)
    }

    /// Clear the result surface and return to idle.
    ///
    /// A running reveal is cancelled, its pending wakeups are dropped and
    /// its winner is not recorded.
    pub fn reset_draw(&mut self) {
        if let Some(mut active) = self.active.take() {
            active.engine.cancel();
            self.scheduler.cancel(active.session);
            log::debug!(
                "session {}: reveal of {} cancelled by reset",
                active.session,
                active.engine.state().winner
            );
        }
        self.phase = DrawPhase::Idle;
        self.display.clear();
        self.display.set_controls(Controls::READY);
    }

    /// Attach a memo to the most recent record. Blank text is ignored.
    pub fn set_memo_on_latest(&mut self, text: &str) -> Result<PersistOutcome, HistoryError> {
        if text.trim().is_empty() {
            log::debug!("ignoring blank memo");
            return Ok(PersistOutcome::Ok);
        }
        self.history.set_memo(0, text)
    }

    /// Overwrite the memo of the record at `index`; blank text clears it.
    pub fn edit_memo(&mut self, index: usize, text: &str) -> Result<PersistOutcome, HistoryError> {
        self.history.set_memo(index, text)
    }

    /// Apply raw settings-form values. Bad fields fall back to defaults and
    /// are returned. A running reveal keeps the timing it started with.
    pub fn update_configuration(&mut self, max_raw: &str, seconds_raw: &str) -> Vec<ConfigError> {
        let (config, issues) = DrawConfiguration::resolve(max_raw, seconds_raw);
        for issue in &issues {
            log::debug!("configuration: {issue}");
        }
        self.set_configuration(config);
        issues
    }

    pub fn set_configuration(&mut self, config: DrawConfiguration) {
        log::info!(
            "configuration: max number {}, {:?} per digit",
            config.max_number,
            config.per_digit()
        );
        self.config = config;
    }

    fn follow(&mut self, session: SessionId, step: RevealStep) -> Option<CompletedDraw> {
        match step {
            RevealStep::Wait(delay) => {
                self.scheduler.schedule_after(delay, Wakeup { session });
                None
            }
            RevealStep::Done(winner) => {
                self.active = None;
                let (record, persisted) = self.history.append(winner);
                self.display.set_controls(Controls::SHOWING_RESULT);
                self.phase = DrawPhase::Idle;
                log::info!("session {session}: ticket {winner} wins");
                Some(CompletedDraw {
                    session,
                    record,
                    persisted,
                })
            }
            RevealStep::Halted => {
                log::debug!("session {session}: reveal halted without a result");
                self.active = None;
                self.phase = DrawPhase::Idle;
                self.display.set_controls(Controls::READY);
                None
            }
        }
    }
}

impl<Sel, K, D> DrawController<Sel, K, VirtualClock, D>
where
    Sel: Selector,
    K: KeyValueStore,
    D: RevealDisplay,
{
    /// Fire wakeups until nothing is pending. Returns the last completed
    /// draw, if any.
    pub fn run_until_idle(&mut self) -> Option<CompletedDraw> {
        let mut completed = None;
        while let Some(wakeup) = self.scheduler.fire_next() {
            if let Some(draw) = self.on_wakeup(wakeup) {
                completed = Some(draw);
            }
        }
        completed
    }

    /// Move the virtual clock forward by `by`, firing every wakeup that
    /// falls due on the way.
    pub fn advance_clock(&mut self, by: Duration) -> Vec<CompletedDraw> {
        let deadline = self.scheduler.now().saturating_add(by);
        let mut completed = Vec::new();
        while let Some(wakeup) = self.scheduler.fire_until(deadline) {
            completed.extend(self.on_wakeup(wakeup));
        }
        self.scheduler.settle_at(deadline);
        completed
    }
}
