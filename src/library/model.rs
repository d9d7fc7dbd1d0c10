use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::error::LoadError;

/// One playable item. Refs are resolved against the catalog's base directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub album_art: String,
    pub audio: String,
}

impl Track {
    /// "Artist - Title", or just the title when the artist is blank.
    pub fn display(&self) -> String {
        let artist = self.artist.trim();
        if artist.is_empty() {
            self.title.clone()
        } else {
            format!("{} - {}", artist, self.title)
        }
    }
}

/// Ordered tracks with unique ids. Insertion order is display order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    tracks: Vec<Track>,
    base_dir: PathBuf,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate ids.
    pub fn new(tracks: Vec<Track>, base_dir: impl Into<PathBuf>) -> Result<Self, LoadError> {
        let mut seen = HashSet::with_capacity(tracks.len());
        for track in &tracks {
            if !seen.insert(track.id.as_str()) {
                return Err(LoadError::DuplicateId(track.id.clone()));
            }
        }

        Ok(Self {
            tracks,
            base_dir: base_dir.into(),
        })
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Resolve a track ref to a filesystem path. Absolute refs pass through.
    pub fn resolve(&self, reference: &str) -> PathBuf {
        let path = Path::new(reference);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }
}
