//! JSON manifest loading.
//!
//! The manifest is an array of track records. Field names follow the
//! camelCase convention of the web player manifests, with short aliases.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::LoadError;

use super::model::{Catalog, Track};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TrackRecord {
    id: serde_json::Value,
    title: String,
    #[serde(default)]
    artist: String,
    #[serde(default, alias = "albumArtFileId", alias = "albumArtRef")]
    album_art: String,
    #[serde(alias = "audioFileId", alias = "audioRef")]
    audio: String,
}

impl TrackRecord {
    fn into_track(self) -> Track {
        // Manifests in the wild use both numeric and string ids.
        let id = match self.id {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        };
        Track {
            id,
            title: self.title,
            artist: self.artist,
            album_art: self.album_art,
            audio: self.audio,
        }
    }
}

pub(super) fn load_manifest(path: &Path) -> Result<Catalog, LoadError> {
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    parse_manifest(&text, path)
}

pub(super) fn parse_manifest(text: &str, path: &Path) -> Result<Catalog, LoadError> {
    let records: Vec<TrackRecord> =
        serde_json::from_str(text).map_err(|source| LoadError::Malformed {
            path: path.to_path_buf(),
            source,
        })?;

    let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
    Catalog::new(
        records.into_iter().map(TrackRecord::into_track).collect(),
        base_dir,
    )
}
