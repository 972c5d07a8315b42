//! Digit-by-digit reveal state machine.

use super::encoding::BinaryCode;
use super::timing::{RevealTiming, SPIN_TICKS};
use crate::core::{PhaseChange, PhaseTrail, State};
use crate::display::{DigitFace, RevealDisplay};
use crate::selector::TicketNumber;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Position of a reveal.
///
/// `Idle -> Spinning{0} -> Settling{0} -> Spinning{1} -> ... -> Done`, or
/// `Cancelled` from any non-final phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RevealPhase {
    Idle,
    /// Flipping the digit at this index.
    Spinning { digit: usize },
    /// The digit at this index shows its final bit; waiting for the gap.
    Settling { digit: usize },
    Done,
    Cancelled,
}

impl State for RevealPhase {
    fn name(&self) -> &str {
        match self {
            Self::Idle => "Idle",
            Self::Spinning { .. } => "Spinning",
            Self::Settling { .. } => "Settling",
            Self::Done => "Done",
            Self::Cancelled => "Cancelled",
        }
    }

    fn is_final(&self) -> bool {
        matches!(self, Self::Done | Self::Cancelled)
    }

    fn is_aborted(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Data of one reveal. Created per draw and dropped afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct RevealState {
    pub winner: TicketNumber,
    pub code: BinaryCode,
    /// Digit being animated; equals the code width once `Done`.
    pub current_digit: usize,
    /// Flip number within the current digit.
    pub tick: u32,
    pub phase: RevealPhase,
}

/// What the caller must do after driving the engine once.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RevealStep {
    /// Call `advance` again after this delay.
    Wait(Duration),
    /// The winner has been disclosed.
    Done(TicketNumber),
    /// Nothing to do: the reveal is not running.
    Halted,
}

/// Reveal state machine.
///
/// The engine never sleeps or spawns timers. Each call to [`start`] or
/// [`advance`] performs one callback's worth of work against the display
/// and says how long to wait before the next one, so a scheduler (real or
/// virtual) owns all the timing.
///
/// [`start`]: RevealEngine::start
/// [`advance`]: RevealEngine::advance
///
/// # Example
///
/// ```rust
/// use bitdraw::display::ResultPanel;
/// use bitdraw::reveal::{RevealEngine, RevealStep, RevealTiming};
/// use bitdraw::selector::TicketNumber;
/// use std::time::Duration;
///
/// let winner = TicketNumber::new(5).unwrap();
/// let mut engine = RevealEngine::new(winner, RevealTiming::new(Duration::from_millis(300)));
/// let mut panel = ResultPanel::new();
///
/// let mut step = engine.start(&mut panel);
/// while let RevealStep::Wait(_) = step {
///     step = engine.advance(&mut panel);
/// }
///
/// assert_eq!(step, RevealStep::Done(winner));
/// assert_eq!(panel.digits(), "0000100");
/// ```
#[derive(Clone, Debug)]
pub struct RevealEngine {
    state: RevealState,
    timing: RevealTiming,
    elapsed: Duration,
    trail: PhaseTrail<RevealPhase>,
}

impl RevealEngine {
    pub fn new(winner: TicketNumber, timing: RevealTiming) -> Self {
        Self::with_code(winner, BinaryCode::for_ticket(winner), timing)
    }

    /// Reveal `winner` using a pre-computed code, e.g. one with a custom
    /// minimum width.
    pub fn with_code(winner: TicketNumber, code: BinaryCode, timing: RevealTiming) -> Self {
        Self {
            state: RevealState {
                winner,
                code,
                current_digit: 0,
                tick: 0,
                phase: RevealPhase::Idle,
            },
            timing,
            elapsed: Duration::ZERO,
            trail: PhaseTrail::new(),
        }
    }

    pub fn state(&self) -> &RevealState {
        &self.state
    }

    pub fn phase(&self) -> RevealPhase {
        self.state.phase
    }

    pub fn width(&self) -> usize {
        self.state.code.width()
    }

    pub fn timing(&self) -> RevealTiming {
        self.timing
    }

    /// Offset of the next scheduled callback from the start of the reveal.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn trail(&self) -> &PhaseTrail<RevealPhase> {
        &self.trail
    }

    /// Lay out the digit boxes and start spinning the first digit.
    pub fn start<D: RevealDisplay + ?Sized>(&mut self, display: &mut D) -> RevealStep {
        if self.state.phase != RevealPhase::Idle {
            log::debug!("reveal already {}, ignoring start", self.state.phase.name());
            return RevealStep::Halted;
        }
        display.begin(self.width());
        self.enter_digit(0, display)
    }

    /// Run the callback that was due after the last `Wait`.
    pub fn advance<D: RevealDisplay + ?Sized>(&mut self, display: &mut D) -> RevealStep {
        match self.state.phase {
            RevealPhase::Spinning { digit } => {
                let tick = self.state.tick + 1;
                if tick < SPIN_TICKS {
                    self.state.tick = tick;
                    display.show_digit(digit, DigitFace::Flashing((tick % 2) as u8));
                    self.wait(self.timing.tick_interval(tick))
                } else {
                    let bit = self.state.code.bit(digit).unwrap_or(0);
                    display.show_digit(digit, DigitFace::Final(bit));
                    self.enter(RevealPhase::Settling { digit });
                    self.wait(self.timing.digit_gap())
                }
            }
            RevealPhase::Settling { digit } => {
                let next = digit + 1;
                if next < self.width() {
                    self.enter_digit(next, display)
                } else {
                    self.state.current_digit = next;
                    self.enter(RevealPhase::Done);
                    display.show_winner(self.state.winner, &self.state.code);
                    log::debug!(
                        "revealed {} as {} after {:?}",
                        self.state.winner,
                        self.state.code,
                        self.elapsed
                    );
                    RevealStep::Done(self.state.winner)
                }
            }
            RevealPhase::Idle | RevealPhase::Done | RevealPhase::Cancelled => RevealStep::Halted,
        }
    }

    /// Abort the reveal. Returns `false` if it had already finished.
    pub fn cancel(&mut self) -> bool {
        if self.state.phase.is_final() {
            return false;
        }
        self.enter(RevealPhase::Cancelled);
        true
    }

    fn enter_digit<D: RevealDisplay + ?Sized>(&mut self, digit: usize, display: &mut D) -> RevealStep {
        self.state.current_digit = digit;
        self.state.tick = 0;
        self.enter(RevealPhase::Spinning { digit });
        display.show_digit(digit, DigitFace::Flashing(0));
        self.wait(self.timing.tick_interval(0))
    }

    fn enter(&mut self, to: RevealPhase) {
        self.trail = self.trail.record(PhaseChange {
            from: self.state.phase,
            to,
            at: self.elapsed,
        });
        self.state.phase = to;
    }

    fn wait(&mut self, delay: Duration) -> RevealStep {
        self.elapsed += delay;
        RevealStep::Wait(delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::ResultPanel;
    use crate::reveal::timing::MIN_DELAY;

    fn ticket(value: u32) -> TicketNumber {
        TicketNumber::new(value).unwrap()
    }

    fn engine(value: u32, per_digit_ms: u64) -> RevealEngine {
        RevealEngine::new(
            ticket(value),
            RevealTiming::new(Duration::from_millis(per_digit_ms)),
        )
    }

    /// Drive to completion, returning the final step and every wait.
    fn run(engine: &mut RevealEngine, panel: &mut ResultPanel) -> (RevealStep, Vec<Duration>) {
        let mut waits = Vec::new();
        let mut step = engine.start(panel);
        while let RevealStep::Wait(delay) = step {
            waits.push(delay);
            step = engine.advance(panel);
        }
        (step, waits)
    }

    #[test]
    fn starts_idle() {
        let engine = engine(5, 100);
        assert_eq!(engine.phase(), RevealPhase::Idle);
        assert!(engine.trail().changes().is_empty());
        assert_eq!(engine.elapsed(), Duration::ZERO);
    }

    #[test]
    fn start_shows_hidden_boxes_and_first_flip() {
        let mut engine = engine(5, 100);
        let mut panel = ResultPanel::new();

        let step = engine.start(&mut panel);

        assert_eq!(step, RevealStep::Wait(engine.timing().tick_interval(0)));
        assert_eq!(engine.phase(), RevealPhase::Spinning { digit: 0 });
        assert_eq!(panel.digits(), "0??????");
        assert_eq!(panel.cells()[0], DigitFace::Flashing(0));
    }

    #[test]
    fn flips_alternate_within_a_digit() {
        let mut engine = engine(5, 100);
        let mut panel = ResultPanel::new();
        engine.start(&mut panel);

        let mut faces = vec![panel.cells()[0]];
        for _ in 1..SPIN_TICKS {
            engine.advance(&mut panel);
            faces.push(panel.cells()[0]);
        }

        let expected: Vec<DigitFace> = (0..SPIN_TICKS)
            .map(|t| DigitFace::Flashing((t % 2) as u8))
            .collect();
        assert_eq!(faces, expected);
        assert_eq!(engine.phase(), RevealPhase::Spinning { digit: 0 });
    }

    #[test]
    fn twenty_flips_then_settle() {
        let mut engine = engine(1, 100);
        let mut panel = ResultPanel::new();
        engine.start(&mut panel);
        for _ in 1..SPIN_TICKS {
            engine.advance(&mut panel);
        }

        let step = engine.advance(&mut panel);

        assert_eq!(step, RevealStep::Wait(engine.timing().digit_gap()));
        assert_eq!(engine.phase(), RevealPhase::Settling { digit: 0 });
        assert_eq!(panel.cells()[0], DigitFace::Final(0));
    }

    #[test]
    fn scenario_max_eight_winner_five() {
        let mut engine = engine(5, 50);
        let mut panel = ResultPanel::new();

        let (step, waits) = run(&mut engine, &mut panel);

        assert_eq!(step, RevealStep::Done(ticket(5)));
        assert_eq!(engine.state().code.as_str(), "0000100");
        assert_eq!(engine.width(), 7);
        assert_eq!(engine.state().current_digit, 7);
        assert_eq!(panel.digits(), "0000100");
        assert_eq!(panel.winner(), Some(ticket(5)));
        // 20 flips and one gap per digit
        assert_eq!(waits.len(), 7 * (SPIN_TICKS as usize + 1));
    }

    #[test]
    fn scenario_winner_two_hundred_needs_eight_digits() {
        let mut engine = engine(200, 10);
        let mut panel = ResultPanel::new();

        let (step, _) = run(&mut engine, &mut panel);

        assert_eq!(step, RevealStep::Done(ticket(200)));
        assert_eq!(engine.width(), 8);
        assert_eq!(panel.digits(), "11000111");
        assert_eq!(panel.label(), "binary: 11000111");
    }

    #[test]
    fn trail_visits_digits_in_order() {
        let mut engine = engine(3, 30);
        let mut panel = ResultPanel::new();
        run(&mut engine, &mut panel);

        let path: Vec<RevealPhase> = engine.trail().path().into_iter().copied().collect();
        let mut expected = vec![RevealPhase::Idle];
        for digit in 0..7 {
            expected.push(RevealPhase::Spinning { digit });
            expected.push(RevealPhase::Settling { digit });
        }
        expected.push(RevealPhase::Done);
        assert_eq!(path, expected);

        let offsets: Vec<Duration> = engine.trail().changes().iter().map(|c| c.at).collect();
        assert!(offsets.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn elapsed_matches_the_timing_schedule() {
        let mut engine = engine(64, 400);
        let mut panel = ResultPanel::new();
        let (_, waits) = run(&mut engine, &mut panel);

        let total: Duration = waits.iter().sum();
        assert_eq!(total, engine.elapsed());
        assert_eq!(total, engine.timing().reveal_span(engine.width()));
    }

    #[test]
    fn zero_duration_still_progresses() {
        let mut engine = engine(9, 0);
        let mut panel = ResultPanel::new();
        let (step, waits) = run(&mut engine, &mut panel);

        assert_eq!(step, RevealStep::Done(ticket(9)));
        assert!(waits.iter().all(|&wait| wait == MIN_DELAY));
    }

    #[test]
    fn finished_engine_halts() {
        let mut engine = engine(2, 10);
        let mut panel = ResultPanel::new();
        run(&mut engine, &mut panel);

        assert_eq!(engine.advance(&mut panel), RevealStep::Halted);
        assert_eq!(engine.start(&mut panel), RevealStep::Halted);
        assert!(!engine.cancel());
        assert_eq!(engine.phase(), RevealPhase::Done);
    }

    #[test]
    fn advance_before_start_halts() {
        let mut engine = engine(2, 10);
        let mut panel = ResultPanel::new();
        assert_eq!(engine.advance(&mut panel), RevealStep::Halted);
        assert!(panel.is_blank());
    }

    #[test]
    fn cancel_mid_reveal_stops_updates() {
        let mut engine = engine(100, 10);
        let mut panel = ResultPanel::new();
        engine.start(&mut panel);
        engine.advance(&mut panel);

        assert!(engine.cancel());
        let updates = panel.updates();

        assert_eq!(engine.advance(&mut panel), RevealStep::Halted);
        assert_eq!(panel.updates(), updates);
        assert_eq!(engine.phase(), RevealPhase::Cancelled);
        assert!(engine.phase().is_aborted());
        assert_eq!(engine.trail().last_phase(), Some(&RevealPhase::Cancelled));
    }

    #[test]
    fn decoded_code_is_revealed_digit_for_digit() {
        let winner = ticket(6);
        let code: BinaryCode = serde_json::from_str(r#""101""#).unwrap();
        let mut engine =
            RevealEngine::with_code(winner, code, RevealTiming::new(Duration::from_millis(5)));
        let mut panel = ResultPanel::new();

        let (step, _) = run(&mut engine, &mut panel);

        assert_eq!(step, RevealStep::Done(winner));
        assert_eq!(panel.digits(), "101");
    }

    #[test]
    fn custom_code_width_is_animated() {
        let winner = ticket(2);
        let code = BinaryCode::with_min_width(winner, 3);
        let mut engine = RevealEngine::with_code(
            winner,
            code,
            RevealTiming::new(Duration::from_millis(10)),
        );
        let mut panel = ResultPanel::new();
        let (step, waits) = run(&mut engine, &mut panel);

        assert_eq!(step, RevealStep::Done(winner));
        assert_eq!(panel.digits(), "001");
        assert_eq!(waits.len(), 3 * (SPIN_TICKS as usize + 1));
    }
}
