//! Track catalog: the immutable, ordered list of everything playable.
//!
//! A catalog comes either from a JSON manifest or from scanning a directory
//! of audio files. Once loaded it is never mutated.

mod artwork;
mod manifest;
mod model;
mod scan;

use std::path::Path;

use tracing::info;

use crate::config::LibrarySettings;
use crate::error::LoadError;

pub use artwork::{Artwork, preload_artwork};
pub use model::{Catalog, Track};

/// Load a catalog from `source`.
///
/// `source` may be a manifest file, a directory holding a manifest named
/// `settings.manifest_name`, or a plain directory of audio files to scan.
pub fn load(source: &Path, settings: &LibrarySettings) -> Result<Catalog, LoadError> {
    if !source.exists() {
        return Err(LoadError::Missing(source.to_path_buf()));
    }

    let catalog = if source.is_file() {
        manifest::load_manifest(source)?
    } else {
        let manifest_path = source.join(&settings.manifest_name);
        if manifest_path.is_file() {
            manifest::load_manifest(&manifest_path)?
        } else {
            scan::scan(source, settings)?
        }
    };

    info!(tracks = catalog.len(), source = %source.display(), "catalog loaded");
    Ok(catalog)
}
