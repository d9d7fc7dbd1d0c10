use std::path::Path;

use lofty::prelude::*;
use walkdir::WalkDir;

use crate::config::LibrarySettings;
use crate::error::LoadError;

use super::model::{Catalog, Track};

const ARTWORK_NAMES: [&str; 6] = [
    "cover.jpg",
    "cover.png",
    "folder.jpg",
    "folder.png",
    "cover.jpeg",
    "folder.jpeg",
];

fn is_audio_file(path: &Path, settings: &LibrarySettings) -> bool {
    let exts: Vec<String> = settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Path of `path` relative to `root`, with forward slashes.
fn relative_ref(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.to_string_lossy().replace('\\', "/")
}

fn find_artwork(root: &Path, audio: &Path) -> String {
    let Some(dir) = audio.parent() else {
        return String::new();
    };
    ARTWORK_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|candidate| candidate.is_file())
        .map(|found| relative_ref(root, &found))
        .unwrap_or_default()
}

fn read_tags(path: &Path) -> (Option<String>, Option<String>) {
    let Ok(tagged) = lofty::read_from_path(path) else {
        return (None, None);
    };
    let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) else {
        return (None, None);
    };

    let clean = |v: Option<std::borrow::Cow<'_, str>>| {
        v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
    };
    (clean(tag.title()), clean(tag.artist()))
}

/// Walk `dir` and build a catalog from the audio files found.
pub(super) fn scan(dir: &Path, settings: &LibrarySettings) -> Result<Catalog, LoadError> {
    let mut tracks: Vec<Track> = Vec::new();

    let mut walker = WalkDir::new(dir).follow_links(settings.follow_links);

    // Non-recursive = only the root directory.
    let depth_cap = if settings.recursive {
        settings.max_depth
    } else {
        Some(1)
    };
    if let Some(d) = depth_cap {
        walker = walker.max_depth(d);
    }

    for entry in walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        .filter_map(Result::ok)
    {
        let path = entry.path();
        if !path.is_file() || !is_audio_file(path, settings) {
            continue;
        }

        let (title, artist) = read_tags(path);
        let title = title.unwrap_or_else(|| {
            path.file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("UNKNOWN")
                .to_string()
        });
        let audio = relative_ref(dir, path);

        tracks.push(Track {
            id: audio.clone(),
            title,
            artist: artist.unwrap_or_default(),
            album_art: find_artwork(dir, path),
            audio,
        });
    }

    tracks.sort_by_key(|t| t.display().to_lowercase());
    Catalog::new(tracks, dir)
}
