//! Error taxonomy shared across the player.
//!
//! Only `LoadError` can stop the player from offering anything to play;
//! everything else degrades (placeholder artwork, in-memory storage) or is
//! funnelled into `PlaybackState::last_error` as a `DeviceFault`.

use std::path::PathBuf;

use thiserror::Error;

/// The catalog could not be produced.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("catalog source {0:?} does not exist")]
    Missing(PathBuf),

    #[error("failed to read catalog {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed catalog {path:?}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("track id {0:?} appears more than once")]
    DuplicateId(String),
}

/// Settings could not be used. The player falls back to defaults.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to load config: {0}")]
    Load(#[from] ::config::ConfigError),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Key-value persistence failed. Callers log and carry on in memory.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage io error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("storage contents are not valid json: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Artwork could not be reached. Purely cosmetic.
#[derive(Debug, Error)]
#[error("artwork {reference:?} for track {track_id:?} is unreachable")]
pub struct AssetError {
    pub track_id: String,
    pub reference: String,
}

/// Error descriptor reported by the audio-output device.
///
/// Codes follow the media element convention so that a fault read from the
/// state means the same thing regardless of which device produced it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("device error {code}: {message}")]
pub struct DeviceFault {
    pub code: u16,
    pub message: String,
}

impl DeviceFault {
    pub const ABORTED: u16 = 1;
    pub const NETWORK: u16 = 2;
    pub const DECODE: u16 = 3;
    pub const UNSUPPORTED: u16 = 4;

    pub fn new(code: u16, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}
