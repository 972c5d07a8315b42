//! History persistence.

use super::error::{HistoryError, StoreWarning};
use super::ledger::HistoryLog;
use super::record::DrawRecord;
use super::storage::KeyValueStore;
use crate::selector::{TicketNumber, RECENT_WINDOW};
use chrono::{DateTime, Utc};

/// Storage key the history is kept under by default.
pub const HISTORY_KEY: &str = "lotteryHistory";

/// Result of a best-effort persistence step.
///
/// A warning never means the in-memory history is wrong; it only means
/// storage does not reflect it.
#[must_use]
#[derive(Debug)]
pub enum PersistOutcome {
    Ok,
    Warning(StoreWarning),
}

impl PersistOutcome {
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }

    pub fn warning(&self) -> Option<&StoreWarning> {
        match self {
            Self::Ok => None,
            Self::Warning(warning) => Some(warning),
        }
    }

    pub fn into_warning(self) -> Option<StoreWarning> {
        match self {
            Self::Ok => None,
            Self::Warning(warning) => Some(warning),
        }
    }
}

/// Owner of the draw history and its persisted copy.
///
/// Every mutation (`append`, `set_memo`) writes the whole log back to
/// storage. Mutations are read-modify-write on one log, so a store shared
/// between threads must be wrapped so that only one writer runs at a time.
///
/// # Example
///
/// ```rust
/// use bitdraw::history::{HistoryStore, MemoryStore};
/// use bitdraw::selector::TicketNumber;
///
/// let (mut store, outcome) = HistoryStore::open(MemoryStore::new());
/// assert!(outcome.is_ok());
///
/// let (record, outcome) = store.append(TicketNumber::new(7).unwrap());
/// assert!(outcome.is_ok());
/// assert_eq!(record.winner().get(), 7);
///
/// store.set_memo(0, "  first prize ").unwrap();
/// assert_eq!(store.log().latest().unwrap().memo(), "first prize");
/// ```
#[derive(Debug)]
pub struct HistoryStore<K> {
    storage: K,
    key: String,
    log: HistoryLog,
}

impl<K: KeyValueStore> HistoryStore<K> {
    /// Store with an empty log; nothing is read from `storage` yet.
    pub fn new(storage: K) -> Self {
        Self {
            storage,
            key: HISTORY_KEY.to_string(),
            log: HistoryLog::new(),
        }
    }

    /// Use `key` instead of [`HISTORY_KEY`].
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Create a store and load whatever `storage` holds.
    pub fn open(storage: K) -> (Self, PersistOutcome) {
        let mut store = Self::new(storage);
        let outcome = store.load();
        (store, outcome)
    }

    pub fn log(&self) -> &HistoryLog {
        &self.log
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn storage(&self) -> &K {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut K {
        &mut self.storage
    }

    /// Winners of the last [`RECENT_WINDOW`] draws, newest first.
    pub fn recent_winners(&self) -> Vec<TicketNumber> {
        self.log.recent_winners(RECENT_WINDOW)
    }

    /// Replace the in-memory log with the persisted one.
    ///
    /// An absent key is an empty history. Unreadable or malformed data is
    /// reported as a warning and leaves the in-memory log as it was, which
    /// is empty right after [`open`](Self::open).
    pub fn load(&mut self) -> PersistOutcome {
        let loaded = match self.storage.get(&self.key) {
            Ok(None) => Ok(HistoryLog::new()),
            Ok(Some(json)) => HistoryLog::from_json(&json).map_err(StoreWarning::Malformed),
            Err(err) => Err(StoreWarning::Read(err)),
        };

        match loaded {
            Ok(history) => {
                log::debug!("loaded {} history records from {:?}", history.len(), self.key);
                self.log = history;
                PersistOutcome::Ok
            }
            Err(warning) => {
                log::warn!(
                    "{warning}; keeping {} history records in memory",
                    self.log.len()
                );
                PersistOutcome::Warning(warning)
            }
        }
    }

    /// Write the in-memory log to storage.
    pub fn persist(&mut self) -> PersistOutcome {
        let written = self
            .log
            .to_json()
            .map_err(StoreWarning::Encode)
            .and_then(|json| {
                self.storage
                    .put(&self.key, &json)
                    .map_err(StoreWarning::Write)
            });

        match written {
            Ok(()) => PersistOutcome::Ok,
            Err(warning) => {
                log::warn!("{warning}; history kept in memory only");
                PersistOutcome::Warning(warning)
            }
        }
    }

    /// Record a draw won by `winner` now.
    pub fn append(&mut self, winner: TicketNumber) -> (DrawRecord, PersistOutcome) {
        self.append_at(winner, Utc::now())
    }

    /// Record a draw won by `winner` at `at`.
    pub fn append_at(
        &mut self,
        winner: TicketNumber,
        at: DateTime<Utc>,
    ) -> (DrawRecord, PersistOutcome) {
        let record = DrawRecord::new(winner, at);
        self.log.prepend(record.clone());
        (record, self.persist())
    }

    /// Overwrite the memo of the record at `index` with `text` trimmed.
    /// Blank text clears the memo.
    pub fn set_memo(&mut self, index: usize, text: &str) -> Result<PersistOutcome, HistoryError> {
        let len = self.log.len();
        let record = self
            .log
            .get_mut(index)
            .ok_or(HistoryError::OutOfRange { index, len })?;
        record.set_memo(text);
        Ok(self.persist())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::error::StorageError;
    use crate::history::storage::{FileStore, MemoryStore};
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn ticket(value: u32) -> TicketNumber {
        TicketNumber::new(value).unwrap()
    }

    fn at(second: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 7, 1, 20, 0, second).unwrap()
    }

    fn winners<K: KeyValueStore>(store: &HistoryStore<K>) -> Vec<u32> {
        store.log().iter().map(|r| r.winner().get()).collect()
    }

    #[test]
    fn absent_key_is_an_empty_history() {
        let (store, outcome) = HistoryStore::open(MemoryStore::new());
        assert!(outcome.is_ok());
        assert!(store.log().is_empty());
    }

    #[test]
    fn append_prepends_and_persists() {
        let (mut store, _) = HistoryStore::open(MemoryStore::new());
        for (i, w) in [11, 22, 33].into_iter().enumerate() {
            let (record, outcome) = store.append_at(ticket(w), at(i as u32));
            assert!(outcome.is_ok());
            assert_eq!(record.memo(), "");
        }

        assert_eq!(winners(&store), vec![33, 22, 11]);
        let stored = store.storage().get(HISTORY_KEY).unwrap().unwrap();
        assert_eq!(HistoryLog::from_json(&stored).unwrap(), *store.log());
    }

    #[test]
    fn reopening_restores_the_same_log() {
        let mut backing = MemoryStore::new();
        let expected = {
            let (mut store, _) = HistoryStore::open(&mut backing);
            let _ = store.append_at(ticket(3), at(1));
            let _ = store.append_at(ticket(9), at(2));
            store.set_memo(1, "runner-up").unwrap().into_warning();
            store.log().clone()
        };

        let (reopened, outcome) = HistoryStore::open(backing);
        assert!(outcome.is_ok());
        assert_eq!(*reopened.log(), expected);
    }

    #[test]
    fn malformed_data_loads_empty_with_warning() {
        let mut backing = MemoryStore::new();
        backing.put(HISTORY_KEY, "{not json").unwrap();

        let (store, outcome) = HistoryStore::open(backing);

        assert!(store.log().is_empty());
        assert!(matches!(outcome.warning(), Some(StoreWarning::Malformed(_))));
    }

    #[test]
    fn unreadable_storage_loads_empty_with_warning() {
        let mut backing = MemoryStore::new();
        backing.set_offline(true);

        let (store, outcome) = HistoryStore::open(backing);

        assert!(store.log().is_empty());
        assert!(matches!(
            outcome.into_warning(),
            Some(StoreWarning::Read(StorageError::Unavailable(_)))
        ));
    }

    #[test]
    fn failed_reload_keeps_records_in_memory() {
        let (mut store, _) = HistoryStore::open(MemoryStore::new());
        for (i, w) in [1, 2, 3].into_iter().enumerate() {
            let _ = store.append_at(ticket(w), at(i as u32));
        }

        store.storage_mut().set_offline(true);
        let outcome = store.load();
        store.storage_mut().set_offline(false);
        let _ = store.append_at(ticket(4), at(9));

        assert!(matches!(outcome.warning(), Some(StoreWarning::Read(_))));
        assert_eq!(winners(&store), vec![4, 3, 2, 1]);
        let stored = store.storage().get(HISTORY_KEY).unwrap().unwrap();
        assert_eq!(HistoryLog::from_json(&stored).unwrap().len(), 4);
    }

    #[test]
    fn malformed_reload_keeps_records_in_memory() {
        let (mut store, _) = HistoryStore::open(MemoryStore::new());
        let _ = store.append_at(ticket(5), at(0));
        store.storage_mut().put(HISTORY_KEY, "[{").unwrap();

        let outcome = store.load();

        assert!(matches!(outcome.warning(), Some(StoreWarning::Malformed(_))));
        assert_eq!(winners(&store), vec![5]);
    }

    #[test]
    fn failed_write_keeps_memory_authoritative() {
        let (mut store, _) = HistoryStore::open(MemoryStore::with_quota(8));

        let (record, outcome) = store.append_at(ticket(4), at(0));

        assert!(matches!(
            outcome.warning(),
            Some(StoreWarning::Write(StorageError::QuotaExceeded { .. }))
        ));
        assert_eq!(store.log().latest(), Some(&record));
        assert!(store.storage().get(HISTORY_KEY).unwrap().is_none());
    }

    #[test]
    fn set_memo_out_of_range() {
        let (mut store, _) = HistoryStore::open(MemoryStore::new());
        let _ = store.append_at(ticket(1), at(0));

        let err = store.set_memo(1, "nope").unwrap_err();
        assert_eq!(err, HistoryError::OutOfRange { index: 1, len: 1 });
    }

    #[test]
    fn set_memo_is_idempotent() {
        let (mut store, _) = HistoryStore::open(MemoryStore::new());
        let _ = store.append_at(ticket(1), at(0));

        let _ = store.set_memo(0, "x").unwrap();
        let once = store.log().clone();
        let once_stored = store.storage().get(HISTORY_KEY).unwrap();
        let _ = store.set_memo(0, "x").unwrap();

        assert_eq!(*store.log(), once);
        assert_eq!(store.storage().get(HISTORY_KEY).unwrap(), once_stored);
    }

    #[test]
    fn blank_memo_clears() {
        let (mut store, _) = HistoryStore::open(MemoryStore::new());
        let _ = store.append_at(ticket(1), at(0));
        let _ = store.set_memo(0, "keep me").unwrap();
        let _ = store.set_memo(0, "  \t").unwrap();
        assert_eq!(store.log().latest().unwrap().memo(), "");
    }

    #[test]
    fn custom_key_is_used() {
        let (mut store, _) = HistoryStore::open(MemoryStore::new());
        store = store.with_key("staging");
        let _ = store.append_at(ticket(2), at(0));

        assert_eq!(store.key(), "staging");
        assert!(store.storage().get("staging").unwrap().is_some());
        assert!(store.storage().get(HISTORY_KEY).unwrap().is_none());
    }

    #[test]
    fn file_backed_history_survives_reopen() {
        let dir = TempDir::new().unwrap();
        {
            let (mut store, _) = HistoryStore::open(FileStore::new(dir.path()));
            let _ = store.append_at(ticket(8), at(5));
            let _ = store.set_memo(0, "from disk").unwrap();
        }

        let (store, outcome) = HistoryStore::open(FileStore::new(dir.path()));
        assert!(outcome.is_ok());
        assert_eq!(winners(&store), vec![8]);
        assert_eq!(store.log().latest().unwrap().memo(), "from disk");
        assert_eq!(store.log().latest().unwrap().timestamp(), at(5));
    }
}
