//! Rendering surface seam.
//!
//! The reveal engine and the draw controller never draw anything
//! themselves; they push updates through [`RevealDisplay`]. Hosts implement
//! it for their UI toolkit. [`ResultPanel`] is an in-memory implementation
//! that keeps the current surface as plain data, which is what tests and
//! text front-ends read.

use crate::reveal::BinaryCode;
use crate::selector::TicketNumber;
use std::fmt::Write as _;

/// What a single digit box currently shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DigitFace {
    /// Not reached yet (`?`).
    Hidden,
    /// Spinning, showing a transient bit.
    Flashing(u8),
    /// Settled on its final bit.
    Final(u8),
}

impl DigitFace {
    pub fn glyph(self) -> char {
        match self {
            Self::Hidden => '?',
            Self::Flashing(bit) | Self::Final(bit) => {
                if bit == 0 {
                    '0'
                } else {
                    '1'
                }
            }
        }
    }
}

/// Enablement of the start and reset commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Controls {
    pub start_enabled: bool,
    pub reset_enabled: bool,
}

impl Controls {
    /// Nothing drawn yet, or the panel was just reset.
    pub const READY: Self = Self {
        start_enabled: true,
        reset_enabled: false,
    };
    /// A reveal is running.
    pub const LOCKED: Self = Self {
        start_enabled: false,
        reset_enabled: false,
    };
    /// A result is on screen.
    pub const SHOWING_RESULT: Self = Self {
        start_enabled: true,
        reset_enabled: true,
    };
}

/// Surface that shows a reveal.
pub trait RevealDisplay {
    /// Lay out `width` hidden digit boxes.
    fn begin(&mut self, width: usize);

    /// Update the box at `index` (0 is the most significant digit).
    fn show_digit(&mut self, index: usize, face: DigitFace);

    /// Disclose the winner next to its full binary code.
    fn show_winner(&mut self, winner: TicketNumber, code: &BinaryCode);

    /// Remove any reveal or result from the surface.
    fn clear(&mut self);

    fn set_controls(&mut self, controls: Controls);
}

impl<D: RevealDisplay + ?Sized> RevealDisplay for &mut D {
    fn begin(&mut self, width: usize) {
        (**self).begin(width)
    }

    fn show_digit(&mut self, index: usize, face: DigitFace) {
        (**self).show_digit(index, face)
    }

    fn show_winner(&mut self, winner: TicketNumber, code: &BinaryCode) {
        (**self).show_winner(winner, code)
    }

    fn clear(&mut self) {
        (**self).clear()
    }

    fn set_controls(&mut self, controls: Controls) {
        (**self).set_controls(controls)
    }
}

/// In-memory result surface.
#[derive(Clone, Debug, PartialEq)]
pub struct ResultPanel {
    cells: Vec<DigitFace>,
    winner: Option<(TicketNumber, String)>,
    controls: Controls,
    updates: usize,
}

impl Default for ResultPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultPanel {
    pub fn new() -> Self {
        Self {
            cells: Vec::new(),
            winner: None,
            controls: Controls::READY,
            updates: 0,
        }
    }

    pub fn cells(&self) -> &[DigitFace] {
        &self.cells
    }

    /// The digits as text, `?` for boxes not reached yet.
    pub fn digits(&self) -> String {
        self.cells.iter().map(|cell| cell.glyph()).collect()
    }

    /// Winner currently disclosed, if any.
    pub fn winner(&self) -> Option<TicketNumber> {
        self.winner.as_ref().map(|(winner, _)| *winner)
    }

    /// True when nothing is shown.
    pub fn is_blank(&self) -> bool {
        self.cells.is_empty() && self.winner.is_none()
    }

    pub fn controls(&self) -> Controls {
        self.controls
    }

    /// Number of surface updates received, controls excluded.
    pub fn updates(&self) -> usize {
        self.updates
    }

    /// Caption under the digit boxes.
    pub fn label(&self) -> String {
        match (&self.winner, self.cells.is_empty()) {
            (Some((_, code)), _) => format!("binary: {code}"),
            (None, false) => "drawing in binary...".to_string(),
            (None, true) => "results appear here".to_string(),
        }
    }

    /// Plain-text rendering of the whole panel.
    pub fn render(&self) -> String {
        let mut out = String::new();
        if !self.cells.is_empty() {
            for cell in &self.cells {
                let _ = write!(out, "[{}]", cell.glyph());
            }
            out.push('\n');
        }
        out.push_str(&self.label());
        match self.winner() {
            Some(winner) => {
                let _ = write!(out, "\n*** {winner} ***");
            }
            None if !self.cells.is_empty() => out.push_str("\ndrawing..."),
            None => {}
        }
        out
    }
}

impl RevealDisplay for ResultPanel {
    fn begin(&mut self, width: usize) {
        self.cells = vec![DigitFace::Hidden; width];
        self.winner = None;
        self.updates += 1;
    }

    fn show_digit(&mut self, index: usize, face: DigitFace) {
        if let Some(cell) = self.cells.get_mut(index) {
            *cell = face;
            self.updates += 1;
        } else {
            log::debug!("digit {index} is outside a {}-box panel", self.cells.len());
        }
    }

    fn show_winner(&mut self, winner: TicketNumber, code: &BinaryCode) {
        self.winner = Some((winner, code.as_str().to_string()));
        self.updates += 1;
    }

    fn clear(&mut self) {
        self.cells.clear();
        self.winner = None;
        self.updates += 1;
    }

    fn set_controls(&mut self, controls: Controls) {
        self.controls = controls;
    }
}
