use super::*;
use std::sync::{Arc, Mutex};
use tempfile::tempdir;

use crate::error::StoreError;

/// Accepts values in memory but fails every write, like a full disk.
#[derive(Default)]
struct FailingStore {
    inner: MemoryStore,
}

impl KeyValueStore for FailingStore {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key)
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        self.inner.set(key, value)?;
        Err(StoreError::Io {
            path: "/dev/full".into(),
            source: std::io::Error::other("disk full"),
        })
    }
}

#[test]
fn increment_adds_exactly_one_per_call() {
    let counts = PlayCountStore::new(memory_store());
    assert_eq!(counts.get("a"), 0);
    assert_eq!(counts.increment("a"), 1);
    assert_eq!(counts.increment("a"), 2);
    assert_eq!(counts.increment("b"), 1);
    assert_eq!(counts.get("a"), 2);
    assert_eq!(counts.snapshot().len(), 2);
}

#[test]
fn play_counts_are_stored_as_a_json_map() {
    let store = memory_store();
    let counts = PlayCountStore::new(store.clone());
    counts.increment("track-1");
    counts.increment("track-1");

    let raw = store.lock().unwrap().get(PLAY_COUNTS_KEY).unwrap();
    let parsed: std::collections::BTreeMap<String, u64> = serde_json::from_str(&raw).unwrap();
    assert_eq!(parsed.get("track-1"), Some(&2));
}

#[test]
fn unreadable_counts_start_over() {
    let store = memory_store();
    store
        .lock()
        .unwrap()
        .set(PLAY_COUNTS_KEY, "not json".into())
        .unwrap();
    let counts = PlayCountStore::new(store);
    assert_eq!(counts.get("x"), 0);
    assert_eq!(counts.increment("x"), 1);
}

#[test]
fn failed_writes_degrade_to_memory() {
    let store: StoreHandle = Arc::new(Mutex::new(FailingStore::default()));
    let counts = PlayCountStore::new(store.clone());
    assert_eq!(counts.increment("a"), 1);
    assert_eq!(counts.increment("a"), 2);

    let prefs = Preferences::new(store);
    prefs.set_theme(Theme::Light);
    assert_eq!(prefs.theme(), Theme::Light);
}

#[test]
fn json_file_store_persists_across_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("store.json");

    {
        let store: StoreHandle = Arc::new(Mutex::new(JsonFileStore::open(&path).unwrap()));
        PlayCountStore::new(store.clone()).increment("song");
        Preferences::new(store).set_theme(Theme::Light);
    }

    let reopened = JsonFileStore::open(&path).unwrap();
    assert_eq!(reopened.path(), path.as_path());
    assert_eq!(reopened.get(THEME_KEY).as_deref(), Some("light"));
    let store: StoreHandle = Arc::new(Mutex::new(reopened));
    assert_eq!(PlayCountStore::new(store).get("song"), 1);
}

#[test]
fn json_file_store_rejects_corrupt_file_and_open_store_falls_back() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("store.json");
    std::fs::write(&path, "[1, 2").unwrap();

    assert!(matches!(
        JsonFileStore::open(&path),
        Err(StoreError::Serialization(_))
    ));

    let handle = open_store(Some(path.as_path()));
    let prefs = Preferences::new(handle);
    prefs.set_volume(0.5);
    assert_eq!(prefs.volume(), Some(0.5));
    // The corrupt file is left alone.
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "[1, 2");
}

#[test]
fn theme_defaults_to_dark_and_toggles() {
    let prefs = Preferences::new(memory_store());
    assert_eq!(prefs.theme(), Theme::Dark);
    prefs.set_theme(prefs.theme().toggled());
    assert_eq!(prefs.theme(), Theme::Light);
    assert_eq!(Theme::parse("purple"), None);
}

#[test]
fn volume_outside_range_is_ignored() {
    let store = memory_store();
    store
        .lock()
        .unwrap()
        .set(VOLUME_KEY, "7".into())
        .unwrap();
    assert_eq!(Preferences::new(store).volume(), None);
}
