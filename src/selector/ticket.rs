//! Ticket numbers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU32;

/// A drawable number, always `>= 1`.
///
/// Serializes as a bare JSON integer; `0` and negative values are rejected
/// on deserialization.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketNumber(NonZeroU32);

impl TicketNumber {
    /// `None` for zero.
    pub fn new(value: u32) -> Option<Self> {
        NonZeroU32::new(value).map(Self)
    }

    pub fn get(self) -> u32 {
        self.0.get()
    }

    /// Zero-based position of this ticket in `1..=max`.
    pub fn index(self) -> u32 {
        self.0.get() - 1
    }
}

impl From<NonZeroU32> for TicketNumber {
    fn from(value: NonZeroU32) -> Self {
        Self(value)
    }
}

impl From<TicketNumber> for u32 {
    fn from(ticket: TicketNumber) -> Self {
        ticket.get()
    }
}

impl fmt::Display for TicketNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_not_a_ticket() {
        assert!(TicketNumber::new(0).is_none());
        assert_eq!(TicketNumber::new(7).map(TicketNumber::get), Some(7));
    }

    #[test]
    fn index_is_zero_based() {
        assert_eq!(TicketNumber::new(1).unwrap().index(), 0);
        assert_eq!(TicketNumber::new(200).unwrap().index(), 199);
    }

    #[test]
    fn serde_rejects_zero() {
        assert!(serde_json::from_str::<TicketNumber>("0").is_err());
        assert!(serde_json::from_str::<TicketNumber>("-3").is_err());
        let ticket: TicketNumber = serde_json::from_str("42").unwrap();
        assert_eq!(ticket.get(), 42);
        assert_eq!(serde_json::to_string(&ticket).unwrap(), "42");
    }
}
