//! Draw history and its persistence.
//!
//! The history is a newest-first list of [`DrawRecord`]s owned by a
//! [`HistoryStore`]. The store writes the whole list as one JSON array to a
//! [`KeyValueStore`] after every change:
//!
//! ```text
//! [ { "winner": 5, "timestamp": "2024-03-01T09:04:09.000Z", "memo": "" }, ... ]
//! ```
//!
//! Persistence is best-effort. Read and write problems come back as
//! [`PersistOutcome::Warning`] and are logged, but never interrupt a draw.

mod error;
mod ledger;
mod record;
mod storage;
mod store;

pub use error::{HistoryError, StorageError, StoreWarning};
pub use ledger::HistoryLog;
pub use record::DrawRecord;
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use store::{HistoryStore, PersistOutcome, HISTORY_KEY};
