//! Deduplication by (artist, title) identity
//!
//! Tracks and already-written playlist entries share one identity key, built
//! from the "Artist - Title" display text. Case and whitespace runs are
//! ignored, so a track and the playlist line written for it always agree.

use crate::error::Result;
use crate::export::m3u::M3uDocument;
use crate::types::Track;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info};

/// Canonical identity of a track
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdentityKey(String);

impl IdentityKey {
    /// Build from "Artist - Title" display text
    pub fn from_display(display: &str) -> Self {
        let normalized = display.split_whitespace().collect::<Vec<_>>().join(" ");
        IdentityKey(normalized.to_lowercase())
    }

    pub fn of_track(track: &Track) -> Self {
        Self::from_display(&track.display_name())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Keep the first item for each identity, in original order
///
/// Items for which `key` returns `None` are always kept.
pub fn retain_first<T, F>(items: Vec<T>, key: F) -> Vec<T>
where
    F: Fn(&T) -> Option<IdentityKey>,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| match key(item) {
            Some(k) => seen.insert(k),
            None => true,
        })
        .collect()
}

/// Remove repeated tracks, keeping first occurrences
pub fn dedupe_tracks(tracks: Vec<Track>) -> Vec<Track> {
    let before = tracks.len();
    let unique = retain_first(tracks, |t| Some(IdentityKey::of_track(t)));
    if unique.len() < before {
        info!("Removed {} duplicate tracks", before - unique.len());
    }
    unique
}

/// Remove repeated entries from a parsed playlist; returns how many were removed
pub fn dedupe_document(doc: &mut M3uDocument) -> usize {
    let before = doc.entries.len();
    let entries = std::mem::take(&mut doc.entries);
    doc.entries = retain_first(entries, |e| e.display().map(IdentityKey::from_display));
    before - doc.entries.len()
}

/// Deduplicate a playlist file in place; returns how many entries were removed
///
/// The file is only rewritten when something was removed.
pub fn repair_playlist(path: &Path) -> Result<usize> {
    let mut doc = M3uDocument::load(path)?;
    let removed = dedupe_document(&mut doc);
    if removed > 0 {
        doc.save(path)?;
        info!("Removed {} duplicate entries from {}", removed, path.display());
    } else {
        debug!("No duplicates in {}", path.display());
    }
    Ok(removed)
}
