//! M3U playlist writer

use super::location::{resolve, ResolvedLocation};
use super::{EXTINF_PREFIX, HEADER, MISSING_MARKER, NO_LOCATION_MARKER, PLAYLIST_PREFIX};
use crate::error::Result;
use crate::export::write_atomic;
use crate::types::Track;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Likely reasons a playlist ended up without a single usable path
pub const NO_USABLE_CAUSES: [&str; 3] = [
    "the library file does not contain file:// locations",
    "music files have been moved or deleted",
    "the library was exported on a different computer",
];

/// Counts for one written playlist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteSummary {
    pub path: PathBuf,
    pub title: String,
    /// Entries with a path line a player can open
    pub usable: usize,
    /// Entries written as `# MISSING` or `# NO LOCATION` comments
    pub skipped: usize,
}

impl WriteSummary {
    pub fn total(&self) -> usize {
        self.usable + self.skipped
    }

    /// Warning text when no entry is usable
    pub fn warning(&self) -> Option<String> {
        if self.usable > 0 {
            return None;
        }
        let mut text = format!("No valid file paths found in {}. This may be because:", self.path.display());
        for (i, cause) in NO_USABLE_CAUSES.iter().enumerate() {
            let _ = write!(text, "\n  {}. {}", i + 1, cause);
        }
        Some(text)
    }
}

/// Render tracks as M3U text, in the given order
///
/// Returns the text plus the usable and skipped counts.
pub fn render_playlist(tracks: &[Track], title: &str) -> (String, usize, usize) {
    let mut out = String::new();
    let mut usable = 0;
    let mut skipped = 0;

    let _ = writeln!(out, "{}", HEADER);
    let _ = writeln!(out, "{}{}", PLAYLIST_PREFIX, title);

    for track in tracks {
        let _ = writeln!(out, "{}{},{}", EXTINF_PREFIX, track.duration_secs(), track.display_name());

        match resolve(&track.location) {
            ResolvedLocation::Usable(path) => {
                let _ = writeln!(out, "{}", path);
                usable += 1;
            }
            ResolvedLocation::Missing(path) => {
                debug!("Missing file for {}: {}", track.display_name(), path);
                let _ = writeln!(out, "{}{}", MISSING_MARKER, path);
                skipped += 1;
            }
            ResolvedLocation::Empty => {
                let _ = writeln!(out, "{}{}", NO_LOCATION_MARKER, track.display_name());
                skipped += 1;
            }
        }
    }

    (out, usable, skipped)
}

/// Write tracks to an M3U playlist file
///
/// Uses atomic write pattern: writes to a temp file first, then renames.
pub fn write_playlist(tracks: &[Track], output_path: &Path, title: &str) -> Result<WriteSummary> {
    let (content, usable, skipped) = render_playlist(tracks, title);
    write_atomic(output_path, &content)?;

    info!("Wrote {} tracks to {}", tracks.len(), output_path.display());

    Ok(WriteSummary {
        path: output_path.to_path_buf(),
        title: title.to_string(),
        usable,
        skipped,
    })
}
