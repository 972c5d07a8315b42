//! Binary encoding of a winning ticket.

use super::error::CodeError;
use crate::selector::TicketNumber;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fewest digit boxes a reveal animates.
pub const MIN_WIDTH: usize = 7;

/// Zero-padded, most-significant-first binary form of a ticket's
/// zero-based index.
///
/// Only `0` and `1` digits are ever held; decoding or parsing anything
/// else fails with [`CodeError`]. Serialized as a bare string.
///
/// # Example
///
/// ```rust
/// use bitdraw::reveal::BinaryCode;
/// use bitdraw::selector::TicketNumber;
///
/// let code = BinaryCode::for_ticket(TicketNumber::new(5).unwrap());
/// assert_eq!(code.as_str(), "0000100");
/// assert_eq!(code.width(), 7);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BinaryCode {
    digits: String,
}

impl BinaryCode {
    /// Encode with at least [`MIN_WIDTH`] digits.
    pub fn for_ticket(ticket: TicketNumber) -> Self {
        Self::with_min_width(ticket, MIN_WIDTH)
    }

    /// Encode with `max(min_width, natural bit length)` digits.
    pub fn with_min_width(ticket: TicketNumber, min_width: usize) -> Self {
        let index = ticket.index();
        let width = min_width.max(bit_length(index));
        Self {
            digits: format!("{index:0width$b}"),
        }
    }

    pub fn width(&self) -> usize {
        self.digits.len()
    }

    /// Bit at `position` (0 is the most significant), `None` past the end.
    pub fn bit(&self, position: usize) -> Option<u8> {
        match self.digits.as_bytes().get(position)? {
            b'0' => Some(0),
            b'1' => Some(1),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.digits
    }
}

impl FromStr for BinaryCode {
    type Err = CodeError;

    fn from_str(digits: &str) -> Result<Self, Self::Err> {
        if digits.is_empty() {
            return Err(CodeError::Empty);
        }
        if let Some((position, found)) = digits
            .char_indices()
            .find(|&(_, c)| c != '0' && c != '1')
        {
            return Err(CodeError::InvalidDigit { position, found });
        }
        Ok(Self {
            digits: digits.to_string(),
        })
    }
}

impl TryFrom<String> for BinaryCode {
    type Error = CodeError;

    fn try_from(digits: String) -> Result<Self, Self::Error> {
        digits.parse()
    }
}

impl From<BinaryCode> for String {
    fn from(code: BinaryCode) -> Self {
        code.digits
    }
}

impl fmt::Display for BinaryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.digits)
    }
}

/// Digits needed to write `value` in binary; zero still takes one digit.
fn bit_length(value: u32) -> usize {
    (u32::BITS - value.leading_zeros()).max(1) as usize
}
