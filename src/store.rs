//! Key-value persistence and the records kept in it.
//!
//! The player stores three things: per-track play counts, the theme and the
//! volume level. Storage failures never stop playback; values keep living in
//! memory for the rest of the session.

mod kv;
mod play_counts;
mod preferences;

pub use kv::{
    JsonFileStore, KeyValueStore, MemoryStore, StoreHandle, default_store_path, memory_store,
    open_store,
};
pub use play_counts::{PLAY_COUNTS_KEY, PlayCountStore};
pub use preferences::{Preferences, THEME_KEY, Theme, VOLUME_KEY};

#[cfg(test)]
mod tests;
