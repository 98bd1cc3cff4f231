//! Key-value persistence for the countdown record

use std::{
    collections::{BTreeMap, HashMap},
    fs, io,
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

use anyhow::{anyhow, Context, Result};
use tracing::{debug, warn};

use crate::state::CountdownState;

/// Namespaced key the countdown record is stored under
pub const DEFAULT_STORAGE_KEY: &str = "lifeClock:v1";

/// String key-value store with local-storage semantics
pub trait Storage: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> Result<()>;
}

/// Stores all keys in one JSON object on disk
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raw file contents; a missing file reads as `None`, other I/O errors propagate
    fn read_raw(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(anyhow::Error::new(e)
                .context(format!("failed to read storage file {}", self.path.display()))),
        }
    }

    fn parse_items(&self, data: &str) -> Result<BTreeMap<String, String>> {
        serde_json::from_str(data)
            .with_context(|| format!("failed to parse storage file {}", self.path.display()))
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let Some(data) = self.read_raw()? else {
            return Ok(None);
        };
        Ok(self.parse_items(&data)?.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        // Only a file that reads but does not parse is replaced wholesale
        let mut items = match self.read_raw()? {
            None => BTreeMap::new(),
            Some(data) => self.parse_items(&data).unwrap_or_else(|e| {
                warn!("Discarding corrupt storage file: {:#}", e);
                BTreeMap::new()
            }),
        };
        items.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create dir {}", parent.display()))?;
        }

        let data = serde_json::to_string_pretty(&items)?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, data)
            .with_context(|| format!("failed to write {}", tmp_path.display()))?;
        fs::rename(&tmp_path, &self.path)
            .with_context(|| format!("failed to replace {}", self.path.display()))?;
        Ok(())
    }
}

/// In-process store that counts writes
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<HashMap<String, String>>,
    writes: AtomicUsize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful `set_item` calls so far
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let items = self
            .items
            .lock()
            .map_err(|e| anyhow!("Failed to lock memory storage: {}", e))?;
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let mut items = self
            .items
            .lock()
            .map_err(|e| anyhow!("Failed to lock memory storage: {}", e))?;
        items.insert(key.to_string(), value.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Reads and writes the countdown record under a fixed key
#[derive(Clone)]
pub struct StateStore {
    storage: Arc<dyn Storage>,
    key: String,
}

impl StateStore {
    pub fn new(storage: Arc<dyn Storage>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    pub fn with_default_key(storage: Arc<dyn Storage>) -> Self {
        Self::new(storage, DEFAULT_STORAGE_KEY)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Load the saved record; anything missing or unreadable yields `{active: false}`
    pub fn load(&self) -> CountdownState {
        match self.try_load() {
            Ok(Some(state)) => state,
            Ok(None) => {
                debug!("No saved countdown under {}", self.key);
                CountdownState::idle()
            }
            Err(e) => {
                warn!("Ignoring saved countdown: {:#}", e);
                CountdownState::idle()
            }
        }
    }

    /// Load the saved record, reporting why it could not be used
    pub fn try_load(&self) -> Result<Option<CountdownState>> {
        let Some(raw) = self.storage.get_item(&self.key)? else {
            return Ok(None);
        };
        let state: CountdownState = serde_json::from_str(&raw)
            .with_context(|| format!("malformed countdown record under {}", self.key))?;
        if !state.is_consistent() {
            return Err(anyhow!("inconsistent countdown record under {}", self.key));
        }
        Ok(Some(state))
    }

    pub fn save(&self, state: &CountdownState) -> Result<()> {
        let data = serde_json::to_string(state)?;
        self.storage.set_item(&self.key, &data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Years;

    fn memory_store() -> (Arc<MemoryStorage>, StateStore) {
        let storage = Arc::new(MemoryStorage::new());
        let store = StateStore::with_default_key(storage.clone());
        (storage, store)
    }

    #[test]
    fn test_missing_key_is_idle() {
        let (_, store) = memory_store();
        assert_eq!(store.load(), CountdownState::idle());
    }

    #[test]
    fn test_malformed_record_is_idle() {
        let (storage, store) = memory_store();
        storage.set_item(DEFAULT_STORAGE_KEY, "{not json").unwrap();
        assert!(store.try_load().is_err());
        assert_eq!(store.load(), CountdownState::idle());
    }

    #[test]
    fn test_inconsistent_record_is_idle() {
        let (storage, store) = memory_store();
        storage
            .set_item(
                DEFAULT_STORAGE_KEY,
                r#"{"active":true,"years":1,"totalMs":10,"startedAt":0,"endsAt":99}"#,
            )
            .unwrap();
        assert_eq!(store.load(), CountdownState::idle());
    }

    #[test]
    fn test_save_then_load() {
        let (storage, store) = memory_store();
        let state = CountdownState::started(Years::new(2.0).unwrap(), 1_000).unwrap();
        store.save(&state).unwrap();
        assert_eq!(storage.write_count(), 1);
        assert_eq!(store.load(), state);
    }

    #[test]
    fn test_file_storage_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("life-clock.json");
        let storage = FileStorage::new(&path);

        assert_eq!(storage.get_item("a").unwrap(), None);
        storage.set_item("a", "1").unwrap();
        storage.set_item("b", "2").unwrap();

        let reopened = FileStorage::new(&path);
        assert_eq!(reopened.get_item("a").unwrap().as_deref(), Some("1"));
        assert_eq!(reopened.get_item("b").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn test_file_storage_recovers_from_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("life-clock.json");
        fs::write(&path, "garbage").unwrap();

        let storage = FileStorage::new(&path);
        let store = StateStore::with_default_key(Arc::new(storage.clone()));
        assert_eq!(store.load(), CountdownState::idle());

        store.save(&CountdownState::idle()).unwrap();
        assert_eq!(
            storage.get_item(DEFAULT_STORAGE_KEY).unwrap().as_deref(),
            Some(r#"{"active":false}"#)
        );
    }

    #[test]
    fn test_file_storage_read_error_keeps_existing_data() {
        let dir = tempfile::tempdir().unwrap();
        // a directory where the file should be cannot be read as text
        let path = dir.path().join("life-clock.json");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep"), "other data").unwrap();

        let storage = FileStorage::new(&path);
        assert!(storage.get_item("a").is_err());
        assert!(storage.set_item("a", "1").is_err());
        assert_eq!(fs::read_to_string(path.join("keep")).unwrap(), "other data");

        let store = StateStore::with_default_key(Arc::new(storage));
        assert_eq!(store.load(), CountdownState::idle());
    }
}
