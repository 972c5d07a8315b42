//! Bitdraw: a single-winner drawing with an animated binary reveal
//!
//! A draw picks one ticket from `1..=max`, avoiding the three most recent
//! winners when it can, then discloses it digit by digit in binary before
//! showing the decimal number. Every completed draw is kept in a
//! newest-first history with free-text memos, persisted as JSON.
//!
//! The crate follows a "pure core, imperative shell" layout. Selection,
//! encoding, timing and the reveal state machine are pure; the shell is a
//! [`DrawController`](controller::DrawController) with injected
//! collaborators for randomness, storage, timers and rendering.
//!
//! # Core Concepts
//!
//! - **Phases**: reveal and lifecycle phases implement the `State` trait
//! - **Selector**: uniform winner selection with recent-winner exclusion
//! - **Reveal**: an explicit state machine stepped by a scheduler
//! - **History**: best-effort persistence that never blocks a draw
//!
//! # Example
//!
//! ```rust
//! use bitdraw::controller::DrawController;
//! use bitdraw::display::ResultPanel;
//! use bitdraw::history::MemoryStore;
//! use bitdraw::schedule::VirtualClock;
//! use bitdraw::selector::RandomSelector;
//!
//! let mut controller = DrawController::builder()
//!     .selector(RandomSelector::seeded(2024))
//!     .storage(MemoryStore::new())
//!     .scheduler(VirtualClock::new())
//!     .display(ResultPanel::new())
//!     .build()
//!     .unwrap();
//!
//! let issues = controller.update_configuration("20", "0.2");
//! assert!(issues.is_empty());
//!
//! controller.start_draw();
//! let draw = controller.run_until_idle().unwrap();
//! let winner = draw.record.winner().get();
//!
//! assert!((1..=20).contains(&winner));
//! assert!(controller.display().label().starts_with("binary: "));
//! ```

pub mod config;
pub mod controller;
pub mod core;
pub mod display;
pub mod history;
pub mod reveal;
pub mod schedule;
pub mod selector;

// Re-export commonly used types
pub use config::DrawConfiguration;
pub use controller::{DrawController, DrawPhase};
pub use core::{Guard, State};
pub use history::{DrawRecord, HistoryStore};
pub use selector::{RandomSelector, Selector, TicketNumber};
