//! Core phase-machine types.
//!
//! This module contains the pure pieces shared by the reveal engine and the
//! draw controller:
//! - Phase definitions via the `State` trait
//! - Guard predicates for transition control
//! - Immutable phase trails with timeline offsets
//!
//! Nothing in here performs I/O or reads a clock.

mod guard;
mod state;
mod trail;

pub use guard::Guard;
pub use state::State;
pub use trail::{PhaseChange, PhaseTrail};
