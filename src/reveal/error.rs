//! Errors for binary codes.

use thiserror::Error;

/// Why text could not be used as a [`BinaryCode`](super::BinaryCode).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodeError {
    #[error("Binary code is empty")]
    Empty,

    #[error("Binary code has {found:?} at position {position}; only 0 and 1 are allowed")]
    InvalidDigit { position: usize, found: char },
}
