//! Core State trait for draw and reveal phases.
//!
//! Both state machines in this crate (the controller lifecycle and the
//! digit-by-digit reveal) describe their position with a phase value that
//! implements this trait, so transitions can be logged and recorded the
//! same way.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Trait for phase values of a state machine.
///
/// All methods are pure - no side effects.
///
/// # Required Traits
///
/// - `Clone`: phases are copied into the transition trail
/// - `PartialEq`: phases are compared by guards
/// - `Debug`: phases show up in log lines
/// - `Serialize` + `Deserialize`: trails can be dumped for diagnostics
///
/// # Example
///
/// ```rust
/// use bitdraw::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// enum Lamp {
///     Off,
///     Blinking,
///     Burnt,
/// }
///
/// impl State for Lamp {
///     fn name(&self) -> &str {
///         match self {
///             Self::Off => "Off",
///             Self::Blinking => "Blinking",
///             Self::Burnt => "Burnt",
///         }
///     }
///
///     fn is_final(&self) -> bool {
///         matches!(self, Self::Burnt)
///     }
/// }
///
/// assert!(Lamp::Burnt.is_final());
/// assert!(!Lamp::Off.is_aborted());
/// ```
pub trait State:
    Clone + PartialEq + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync
{
    /// Get the phase's name for display/logging.
    fn name(&self) -> &str;

    /// Check if this is a terminal phase.
    ///
    /// Default implementation returns `false`.
    fn is_final(&self) -> bool {
        false
    }

    /// Check if this phase was reached by aborting the machine.
    ///
    /// Aborted phases are normally final as well, but this is not enforced.
    ///
    /// Default implementation returns `false`.
    fn is_aborted(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
    enum TestPhase {
        Waiting,
        Rolling { lane: usize },
        Stopped,
        Abandoned,
    }

    impl State for TestPhase {
        fn name(&self) -> &str {
            match self {
                Self::Waiting => "Waiting",
                Self::Rolling { .. } => "Rolling",
                Self::Stopped => "Stopped",
                Self::Abandoned => "Abandoned",
            }
        }

        fn is_final(&self) -> bool {
            matches!(self, Self::Stopped | Self::Abandoned)
        }

        fn is_aborted(&self) -> bool {
            matches!(self, Self::Abandoned)
        }
    }

    #[test]
    fn name_ignores_variant_data() {
        assert_eq!(TestPhase::Rolling { lane: 0 }.name(), "Rolling");
        assert_eq!(TestPhase::Rolling { lane: 9 }.name(), "Rolling");
        assert_eq!(TestPhase::Waiting.name(), "Waiting");
    }

    #[test]
    fn final_and_aborted_are_independent() {
        assert!(!TestPhase::Waiting.is_final());
        assert!(!TestPhase::Rolling { lane: 1 }.is_final());
        assert!(TestPhase::Stopped.is_final());
        assert!(!TestPhase::Stopped.is_aborted());
        assert!(TestPhase::Abandoned.is_final());
        assert!(TestPhase::Abandoned.is_aborted());
    }

    #[test]
    fn phase_serializes_with_data() {
        let phase = TestPhase::Rolling { lane: 3 };
        let json = serde_json::to_string(&phase).unwrap();
        let back: TestPhase = serde_json::from_str(&json).unwrap();
        assert_eq!(phase, back);
    }
}
