//! History error types.

use thiserror::Error;

/// Failure of a key-value storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage quota of {limit} bytes exceeded ({attempted} bytes requested)")]
    QuotaExceeded { limit: usize, attempted: usize },

    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Storage key {0:?} is not usable as a file name; use only A-Z, a-z, 0-9, '-' and '_'")]
    InvalidKey(String),
}

/// Recoverable persistence problem.
///
/// Persistence is best-effort: these are reported and logged, while the
/// in-memory history stays authoritative for the session.
#[derive(Debug, Error)]
pub enum StoreWarning {
    #[error("Failed to read history: {0}")]
    Read(#[source] StorageError),

    #[error("Failed to write history: {0}")]
    Write(#[source] StorageError),

    #[error("Stored history is malformed: {0}")]
    Malformed(#[source] serde_json::Error),

    #[error("Failed to encode history: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Rejected history edit.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HistoryError {
    #[error("No history record at index {index} (history holds {len})")]
    OutOfRange { index: usize, len: usize },
}
