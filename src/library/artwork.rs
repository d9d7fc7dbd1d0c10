use std::path::PathBuf;

use tracing::debug;

use crate::error::AssetError;

use super::model::{Catalog, Track};

/// Resolved artwork for one track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Artwork {
    Available(PathBuf),
    Placeholder,
}

impl Artwork {
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }
}

fn resolve(catalog: &Catalog, track: &Track) -> Result<PathBuf, AssetError> {
    let unreachable = || AssetError {
        track_id: track.id.clone(),
        reference: track.album_art.clone(),
    };

    if track.album_art.trim().is_empty() {
        return Err(unreachable());
    }
    let path = catalog.resolve(&track.album_art);
    if path.is_file() { Ok(path) } else { Err(unreachable()) }
}

/// Resolve every track's artwork once, in catalog order.
///
/// Unreachable artwork degrades to `Artwork::Placeholder`.
pub fn preload_artwork(catalog: &Catalog) -> Vec<Artwork> {
    catalog
        .tracks()
        .iter()
        .map(|track| match resolve(catalog, track) {
            Ok(path) => Artwork::Available(path),
            Err(e) => {
                debug!("{e}");
                Artwork::Placeholder
            }
        })
        .collect()
}
