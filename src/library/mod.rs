//! Library loading and export discovery

pub mod plist;
pub mod text;

pub use text::{TextEncoding, TextExportOptions};

use crate::error::{ErrorContext, PlaysortError, Result};
use crate::types::{SourceFormat, Track};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Load tracks from a library file
///
/// `.txt` files are read as tab-separated exports, everything else as
/// `Library.xml`.
pub fn load_library(path: &Path, options: &TextExportOptions) -> Result<Vec<Track>> {
    if !path.exists() {
        return Err(PlaysortError::FileNotFound(path.to_path_buf()));
    }

    let tracks = match SourceFormat::from_path(path) {
        Some(SourceFormat::TabText) => text::read_export(path, options)?,
        _ => {
            let xml = std::fs::read_to_string(path).map_err(|e| PlaysortError::input_error(path, e))?;
            plist::parse_tracks(&xml).with_input_context(path)?
        }
    };

    info!("Parsed {} tracks from {}", tracks.len(), path.display());
    Ok(tracks)
}

/// Find `.txt` exports directly inside `dir`, sorted by path
pub fn scan_exports(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(PlaysortError::FileNotFound(dir.to_path_buf()));
    }

    let mut exports = Vec::new();
    for entry in WalkDir::new(dir).max_depth(1) {
        let path = entry.map_err(std::io::Error::from)?.into_path();
        if path.is_file() && SourceFormat::from_path(&path) == Some(SourceFormat::TabText) {
            exports.push(path);
        }
    }
    exports.sort();

    for path in &exports {
        debug!("Discovered export: {}", path.display());
    }
    if exports.is_empty() {
        warn!("No .txt exports found in {}", dir.display());
    }

    Ok(exports)
}
