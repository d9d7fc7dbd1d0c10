use std::collections::BTreeMap;

use tracing::{debug, warn};

use super::kv::{KeyValueStore, StoreHandle};

/// Key holding the serialized id -> count map.
pub const PLAY_COUNTS_KEY: &str = "playCounts";

/// Per-track play counters, read from storage on every query.
#[derive(Clone)]
pub struct PlayCountStore {
    store: StoreHandle,
}

fn read_counts(store: &dyn KeyValueStore) -> BTreeMap<String, u64> {
    let Some(raw) = store.get(PLAY_COUNTS_KEY) else {
        return BTreeMap::new();
    };
    serde_json::from_str(&raw).unwrap_or_else(|e| {
        warn!("ignoring unreadable play counts: {e}");
        BTreeMap::new()
    })
}

impl PlayCountStore {
    pub fn new(store: StoreHandle) -> Self {
        Self { store }
    }

    pub fn get(&self, track_id: &str) -> u64 {
        self.snapshot().get(track_id).copied().unwrap_or(0)
    }

    /// All counts at once, for rendering a whole list.
    pub fn snapshot(&self) -> BTreeMap<String, u64> {
        match self.store.lock() {
            Ok(store) => read_counts(&*store),
            Err(_) => BTreeMap::new(),
        }
    }

    /// Add exactly one play for `track_id` and return the new count.
    ///
    /// The read-modify-write happens under one lock. A failed write is logged
    /// and the count survives in memory.
    pub fn increment(&self, track_id: &str) -> u64 {
        let Ok(mut store) = self.store.lock() else {
            return 0;
        };

        let mut counts = read_counts(&*store);
        let count = counts.entry(track_id.to_string()).or_insert(0);
        *count = count.saturating_add(1);
        let value = *count;

        match serde_json::to_string(&counts) {
            Ok(raw) => {
                if let Err(e) = store.set(PLAY_COUNTS_KEY, raw) {
                    warn!("play count for {track_id:?} not persisted: {e}");
                }
            }
            Err(e) => warn!("play counts not serializable: {e}"),
        }

        debug!(track_id, count = value, "play counted");
        value
    }
}
