use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing::{info, warn};

use crate::config::BaseDir;
use crate::error::StoreError;

/// String keys to string values, like browser local storage.
pub trait KeyValueStore: Send {
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value`. On error the value is still visible to later `get`s
    /// for the rest of the session.
    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError>;
}

pub type StoreHandle = Arc<Mutex<dyn KeyValueStore>>;

/// Volatile store, used in tests and when no file can be opened.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }
}

/// A JSON object on disk, rewritten in full on every `set`.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl JsonFileStore {
    /// Open `path`, treating a missing file as an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(text) if text.trim().is_empty() => BTreeMap::new(),
            Ok(text) => serde_json::from_str(&text)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let text = serde_json::to_string_pretty(&self.entries)?;

        // Write aside and rename so readers never observe a half-written file.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, text).map_err(io_err)?;
        fs::rename(&tmp, &self.path).map_err(io_err)
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value);
        self.persist()
    }
}

/// `$XDG_DATA_HOME/tryza/store.json`, else `~/.local/share/tryza/store.json`.
pub fn default_store_path() -> Option<PathBuf> {
    BaseDir::Data.app_dir().map(|dir| dir.join("store.json"))
}

/// A fresh in-memory store behind a shared handle.
pub fn memory_store() -> StoreHandle {
    Arc::new(Mutex::new(MemoryStore::default()))
}

/// Open the file store at `path`, falling back to memory when that fails.
pub fn open_store(path: Option<&Path>) -> StoreHandle {
    let Some(path) = path else {
        warn!("no storage location available, keeping preferences in memory");
        return memory_store();
    };

    match JsonFileStore::open(path) {
        Ok(store) => {
            info!(path = %path.display(), "opened storage");
            let handle: StoreHandle = Arc::new(Mutex::new(store));
            handle
        }
        Err(e) => {
            warn!("storage unavailable, keeping preferences in memory: {e}");
            memory_store()
        }
    }
}
