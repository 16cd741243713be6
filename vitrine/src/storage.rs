//! Local key/value persistence.
//!
//! [`KeyValueStore`] is the raw string store a browser would offer.
//! [`LocalStorage`] sits on top of it and moves typed values in and out as
//! JSON: writes report an explicit result, reads fall back to a default.

use serde::{Serialize, de::DeserializeOwned};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Storage keys used by the site.
pub mod keys {
    pub const USERS: &str = "cv_users";
    pub const SESSION: &str = "cv_session";
    pub const THEME: &str = "cv_theme";
    pub const COOKIES: &str = "cv_cookies";
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage is blocked")]
    Blocked,

    #[error("storage I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("value could not be encoded: {0}")]
    Encode(#[from] serde_json::Error),
}

pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&mut self, key: &str, value: String) -> Result<(), StorageError>;
    fn remove_item(&mut self, key: &str) -> Result<(), StorageError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get_item(key)
    }

    fn set_item(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        (**self).set_item(key, value)
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        (**self).remove_item(key)
    }
}

/// In-memory store. A blocked store fails every call, like a browser with
/// storage disabled.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: HashMap<String, String>,
    blocked: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn blocked() -> Self {
        Self {
            items: HashMap::new(),
            blocked: true,
        }
    }

    pub fn set_blocked(&mut self, blocked: bool) {
        self.blocked = blocked;
    }

    pub fn is_blocked(&self) -> bool {
        self.blocked
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.blocked {
            return Err(StorageError::Blocked);
        }
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        if self.blocked {
            return Err(StorageError::Blocked);
        }
        self.items.insert(key.to_string(), value);
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        if self.blocked {
            return Err(StorageError::Blocked);
        }
        self.items.remove(key);
        Ok(())
    }
}

/// One JSON object file holding every key of a store.
///
/// The file is read once on open and rewritten in full after each mutation,
/// through a temporary file renamed over the original.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    items: BTreeMap<String, String>,
}

impl FileStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let items = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(items) => items,
                Err(e) => {
                    tracing::warn!("Discarding unreadable store {}: {}", path.display(), e);
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };

        Ok(Self { path, items })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StorageError> {
        let encoded = serde_json::to_string_pretty(&self.items)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, encoded)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        let previous = self.items.insert(key.to_string(), value);
        if let Err(e) = self.flush() {
            // Keep memory in step with disk
            match previous {
                Some(old) => self.items.insert(key.to_string(), old),
                None => self.items.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        if let Some(old) = self.items.remove(key) {
            if let Err(e) = self.flush() {
                self.items.insert(key.to_string(), old);
                return Err(e);
            }
        }
        Ok(())
    }
}

/// Typed JSON access over a [`KeyValueStore`].
pub struct LocalStorage<S> {
    store: S,
}

impl<S: KeyValueStore> LocalStorage<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Encodes `value` as JSON and writes it under `key`.
    pub fn save<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<(), StorageError> {
        let result = serde_json::to_string(value)
            .map_err(StorageError::from)
            .and_then(|encoded| self.store.set_item(key, encoded));
        if let Err(e) = &result {
            tracing::error!("Storage error on {}: {}", key, e);
        }
        result
    }

    /// Reads and decodes `key`. Missing, unreadable and undecodable values all
    /// come back as `None`.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.store.get_item(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!("Storage read of {} failed: {}", key, e);
                return None;
            }
        };
        match serde_json::from_str::<Option<T>>(&raw) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Ignoring undecodable value under {}: {}", key, e);
                None
            }
        }
    }

    pub fn load_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        self.load(key).unwrap_or_default()
    }

    pub fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        let result = self.store.remove_item(key);
        if let Err(e) = &result {
            tracing::error!("Storage error removing {}: {}", key, e);
        }
        result
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Entry {
        name: String,
        score: u64,
    }

    #[test]
    fn test_save_then_load() {
        let mut storage = LocalStorage::new(MemoryStore::new());
        let entries = vec![Entry {
            name: "ana".to_string(),
            score: 3,
        }];

        storage.save(keys::USERS, &entries).unwrap();
        let loaded: Vec<Entry> = storage.load_or_default(keys::USERS);
        assert_eq!(loaded, entries);
    }

    #[test]
    fn test_missing_key_falls_back_to_default() {
        let storage = LocalStorage::new(MemoryStore::new());
        let users: Vec<Entry> = storage.load_or_default(keys::USERS);
        assert!(users.is_empty());
        assert!(storage.load::<Entry>(keys::SESSION).is_none());
    }

    #[test]
    fn test_corrupt_value_falls_back_to_default() {
        let mut store = MemoryStore::new();
        store
            .set_item(keys::USERS, "{not json".to_string())
            .unwrap();
        let storage = LocalStorage::new(store);

        let users: Vec<Entry> = storage.load_or_default(keys::USERS);
        assert!(users.is_empty());
    }

    #[test]
    fn test_null_loads_as_none() {
        let mut storage = LocalStorage::new(MemoryStore::new());
        storage.save(keys::SESSION, &Option::<Entry>::None).unwrap();
        assert_eq!(storage.store().get_item(keys::SESSION).unwrap().unwrap(), "null");
        assert!(storage.load::<Entry>(keys::SESSION).is_none());
    }

    #[test]
    fn test_blocked_store_reports_failure() {
        let mut storage = LocalStorage::new(MemoryStore::blocked());

        let result = storage.save(keys::THEME, "dark");
        assert!(matches!(result, Err(StorageError::Blocked)));

        // Reads on a blocked store fall back instead of failing
        let users: Vec<Entry> = storage.load_or_default(keys::USERS);
        assert!(users.is_empty());
    }

    #[test]
    fn test_unblocking_restores_writes() {
        let mut storage = LocalStorage::new(MemoryStore::blocked());
        assert!(storage.save(keys::THEME, "light").is_err());

        storage.store_mut().set_blocked(false);
        storage.save(keys::THEME, "light").unwrap();
        assert_eq!(storage.load::<String>(keys::THEME).unwrap(), "light");
    }

    #[test]
    fn test_remove() {
        let mut storage = LocalStorage::new(MemoryStore::new());
        storage.save(keys::THEME, "dark").unwrap();
        storage.remove(keys::THEME).unwrap();
        assert!(storage.load::<String>(keys::THEME).is_none());
        assert!(storage.store().is_empty());

        storage.store_mut().set_blocked(true);
        assert!(matches!(storage.remove(keys::THEME), Err(StorageError::Blocked)));
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("visitor.json");

        {
            let mut storage = LocalStorage::new(FileStore::open(&path).unwrap());
            storage.save(keys::THEME, "light").unwrap();
            storage.save(keys::COOKIES, &vec![1, 2, 3]).unwrap();
        }

        let storage = LocalStorage::new(FileStore::open(&path).unwrap());
        assert_eq!(storage.load::<String>(keys::THEME).unwrap(), "light");
        assert_eq!(storage.load::<Vec<u32>>(keys::COOKIES).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_file_store_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("visitor.json");

        let mut store = FileStore::open(&path).unwrap();
        store.set_item(keys::THEME, "\"dark\"".to_string()).unwrap();
        assert!(path.exists());
        assert_eq!(store.path(), path.as_path());
    }

    #[test]
    fn test_file_store_discards_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("visitor.json");
        fs::write(&path, "definitely not json").unwrap();

        let store = FileStore::open(&path).unwrap();
        assert!(store.get_item(keys::USERS).unwrap().is_none());
    }

    #[test]
    fn test_file_store_remove_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("visitor.json");

        let mut store = FileStore::open(&path).unwrap();
        store.set_item(keys::THEME, "\"dark\"".to_string()).unwrap();
        store.remove_item(keys::THEME).unwrap();

        let reopened = FileStore::open(&path).unwrap();
        assert!(reopened.get_item(keys::THEME).unwrap().is_none());
    }

    #[test]
    fn test_boxed_store_delegates() {
        let boxed: Box<dyn KeyValueStore> = Box::new(MemoryStore::new());
        let mut storage = LocalStorage::new(boxed);
        storage.save(keys::THEME, "dark").unwrap();
        assert_eq!(storage.load::<String>(keys::THEME).unwrap(), "dark");
    }
}
