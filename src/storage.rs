//! # Cache Storage Module
//!
//! Opaque key/value persistence for the two dashboard caches. Values are
//! JSON strings; the store does not interpret them.
//!
//! ## Keys
//! - `detectionHistory`: serialized `DetectionHistory`
//! - `itemTypeTimes`: serialized `ItemTypeTimes`
//!
//! `FileStore` keeps one `<key>.json` file per entry in the data directory.
//! `MemoryStore` keeps everything in a map and backs the tests, and stands in
//! when the data directory cannot be created.

use crate::error::StorageError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

pub const DETECTION_HISTORY_KEY: &str = "detectionHistory";
pub const ITEM_TYPE_TIMES_KEY: &str = "itemTypeTimes";

pub trait CacheStore {
    /// `Ok(None)` when the key has never been written
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    /// Removing a missing key is not an error
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Opens (and creates if needed) the cache directory
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, std::io::Error> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl CacheStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::ReadFailed {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        // Readers only ever see a complete file
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)
            .and_then(|_| fs::rename(&tmp, &path))
            .map_err(|source| StorageError::WriteFailed {
                key: key.to_string(),
                source,
            })
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::WriteFailed {
                key: key.to_string(),
                source,
            }),
        }
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CacheStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Read and decode a cache entry. A missing entry decodes to `None`.
pub fn read_json<T: DeserializeOwned>(
    store: &dyn CacheStore,
    key: &str,
) -> Result<Option<T>, StorageError> {
    match store.get(key)? {
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StorageError::Corrupt {
                key: key.to_string(),
                source,
            }),
        None => Ok(None),
    }
}

/// Like `read_json`, but any failure is logged and yields the default value.
pub fn read_json_or_default<T: DeserializeOwned + Default>(store: &dyn CacheStore, key: &str) -> T {
    match read_json(store, key) {
        Ok(Some(value)) => value,
        Ok(None) => T::default(),
        Err(e) => {
            log::warn!("{}; starting with an empty cache", e);
            T::default()
        }
    }
}

pub fn write_json<T: Serialize>(
    store: &mut dyn CacheStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(value).map_err(|source| StorageError::SerializeFailed {
        key: key.to_string(),
        source,
    })?;
    store.set(key, &raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::ItemTypeTimes;

    #[test]
    fn test_file_store_set_get_remove() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let mut store = FileStore::open(dir.path().join("cache")).expect("Failed to open store");

        assert_eq!(store.get(ITEM_TYPE_TIMES_KEY).unwrap(), None);

        store.set(ITEM_TYPE_TIMES_KEY, r#"{"can":1.5}"#).unwrap();
        assert_eq!(store.get(ITEM_TYPE_TIMES_KEY).unwrap().as_deref(), Some(r#"{"can":1.5}"#));
        assert!(dir.path().join("cache").join("itemTypeTimes.json").exists());

        store.remove(ITEM_TYPE_TIMES_KEY).unwrap();
        assert_eq!(store.get(ITEM_TYPE_TIMES_KEY).unwrap(), None);
        // removing twice is fine
        store.remove(ITEM_TYPE_TIMES_KEY).unwrap();
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        {
            let mut store = FileStore::open(dir.path()).unwrap();
            store.set(DETECTION_HISTORY_KEY, "[]").unwrap();
        }
        let store = FileStore::open(dir.path()).unwrap();
        assert_eq!(store.get(DETECTION_HISTORY_KEY).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_read_json_missing_and_corrupt() {
        let mut store = MemoryStore::new();
        let missing: Option<ItemTypeTimes> = read_json(&store, ITEM_TYPE_TIMES_KEY).unwrap();
        assert!(missing.is_none());

        store.set(ITEM_TYPE_TIMES_KEY, "{not json").unwrap();
        let corrupt = read_json::<ItemTypeTimes>(&store, ITEM_TYPE_TIMES_KEY);
        assert!(matches!(corrupt, Err(StorageError::Corrupt { .. })));

        let fallback: ItemTypeTimes = read_json_or_default(&store, ITEM_TYPE_TIMES_KEY);
        assert!(fallback.is_empty());
    }

    #[test]
    fn test_write_then_read_json() {
        let mut store = MemoryStore::new();
        let mut times = ItemTypeTimes::new();
        times.insert("bottle".to_string(), 4.25);

        write_json(&mut store, ITEM_TYPE_TIMES_KEY, &times).unwrap();
        let restored: ItemTypeTimes = read_json_or_default(&store, ITEM_TYPE_TIMES_KEY);
        assert_eq!(restored, times);
    }
}
