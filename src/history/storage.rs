//! Key-value storage backends.
//!
//! The history is stored as one UTF-8 string under a single key. Anything
//! that can put and get such a string can back a [`HistoryStore`].
//!
//! [`HistoryStore`]: super::HistoryStore

use super::error::StorageError;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Durable string storage.
pub trait KeyValueStore {
    /// `Ok(None)` when nothing is stored under `key`.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn put(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<K: KeyValueStore + ?Sized> KeyValueStore for &mut K {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn put(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).put(key, value)
    }
}

/// In-process storage with an optional size quota.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    quota: Option<usize>,
    offline: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject writes that would make the stored values exceed `bytes`.
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            quota: Some(bytes),
            ..Self::default()
        }
    }

    /// Fail every read and write while `offline` is set.
    pub fn set_offline(&mut self, offline: bool) {
        self.offline = offline;
    }

    /// Bytes currently stored across all keys.
    pub fn used_bytes(&self) -> usize {
        self.entries.values().map(String::len).sum()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.offline {
            return Err(StorageError::Unavailable("memory store is offline".into()));
        }
        Ok(self.entries.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.offline {
            return Err(StorageError::Unavailable("memory store is offline".into()));
        }
        if let Some(limit) = self.quota {
            let replaced = self.entries.get(key).map_or(0, String::len);
            let attempted = self.used_bytes() - replaced + value.len();
            if attempted > limit {
                return Err(StorageError::QuotaExceeded { limit, attempted });
            }
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Directory-backed storage: each key is one `<key>.json` file.
#[derive(Clone, Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// The directory is created on the first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File that holds `key`.
    ///
    /// Keys map to file names one to one, so only `[A-Za-z0-9_-]` is
    /// accepted. Anything else is rejected with [`StorageError::InvalidKey`].
    pub fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)?) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn put(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir)?;
        let staging = path.with_extension("json.tmp");
        fs::write(&staging, value)?;
        fs::rename(&staging, &path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn memory_store_round_trips() {
        let mut store = MemoryStore::new();
        assert!(store.get("k").unwrap().is_none());
        store.put("k", "value").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("value"));
    }

    #[test]
    fn quota_counts_replaced_values_once() {
        let mut store = MemoryStore::with_quota(10);
        store.put("a", "12345").unwrap();
        store.put("a", "1234567890").unwrap();

        let err = store.put("b", "x").unwrap_err();
        assert!(matches!(
            err,
            StorageError::QuotaExceeded {
                limit: 10,
                attempted: 11
            }
        ));
        assert_eq!(store.used_bytes(), 10);
    }

    #[test]
    fn offline_store_fails_both_ways() {
        let mut store = MemoryStore::new();
        store.put("k", "v").unwrap();
        store.set_offline(true);

        assert!(matches!(store.get("k"), Err(StorageError::Unavailable(_))));
        assert!(matches!(store.put("k", "w"), Err(StorageError::Unavailable(_))));

        store.set_offline(false);
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn file_store_missing_key_is_none() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("nested"));
        assert!(store.get("lotteryHistory").unwrap().is_none());
    }

    #[test]
    fn file_store_round_trips_and_creates_directory() {
        let dir = TempDir::new().unwrap();
        let mut store = FileStore::new(dir.path().join("nested"));

        store.put("lotteryHistory", "[]").unwrap();
        store.put("lotteryHistory", "[1]").unwrap();

        assert_eq!(store.get("lotteryHistory").unwrap().as_deref(), Some("[1]"));
        let path = store.path_for("lotteryHistory").unwrap();
        assert!(path.exists());
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn keys_map_to_distinct_files() {
        let store = FileStore::new("/data");
        assert_eq!(store.path_for("a_b").unwrap(), Path::new("/data/a_b.json"));
        assert_eq!(store.path_for("a-b").unwrap(), Path::new("/data/a-b.json"));
    }

    #[test]
    fn dotted_and_traversal_keys_are_rejected() {
        let dir = TempDir::new().unwrap();
        let mut store = FileStore::new(dir.path());

        for key in ["a.b", "../evil key", "", "a/b"] {
            assert!(
                matches!(store.path_for(key), Err(StorageError::InvalidKey(ref k)) if k == key),
                "{key:?} accepted"
            );
            assert!(matches!(store.get(key), Err(StorageError::InvalidKey(_))));
            assert!(matches!(store.put(key, "[]"), Err(StorageError::InvalidKey(_))));
        }

        // "a.b" no longer shadows "a_b"
        store.put("a_b", "[1]").unwrap();
        assert_eq!(store.get("a_b").unwrap().as_deref(), Some("[1]"));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
