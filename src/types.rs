//! Core data types for playsort
//!
//! These types represent the domain model and flow through the pipeline.

use serde::{Deserialize, Serialize};

/// URL scheme prefix used by library files for local tracks
pub const FILE_SCHEME: &str = "file://";

// =============================================================================
// Track representation
// =============================================================================

/// Metadata for one library track
///
/// Built once by a parser and never modified afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub artist: String,
    pub title: String,
    pub album: Option<String>,
    pub genre: Option<String>,
    /// Beats per minute, 0 when unknown
    pub bpm: u32,
    /// Duration in milliseconds, 0 when unknown
    pub duration_ms: u64,
    /// Absolute path, `file://` URL, or empty
    pub location: String,
}

impl Track {
    pub fn new(artist: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            artist: artist.into(),
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    pub fn with_genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = Some(genre.into());
        self
    }

    pub fn with_bpm(mut self, bpm: u32) -> Self {
        self.bpm = bpm;
        self
    }

    pub fn with_duration_ms(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    /// "Artist - Title", as shown in playlist info lines
    pub fn display_name(&self) -> String {
        format!("{} - {}", self.artist, self.title)
    }

    /// Whole seconds, truncated
    pub fn duration_secs(&self) -> u64 {
        self.duration_ms / 1000
    }

    pub fn has_location(&self) -> bool {
        !self.location.is_empty()
    }

    pub fn has_file_url(&self) -> bool {
        self.location.starts_with(FILE_SCHEME)
    }

    /// Sort key applied when a bucket is written
    pub fn sort_key(&self) -> (&str, &str) {
        (self.artist.as_str(), self.title.as_str())
    }
}

// =============================================================================
// Input sources
// =============================================================================

/// Library input formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// iTunes / Music "Library.xml" property list
    PlistXml,
    /// Tab-separated playlist export (File > Library > Export Playlist)
    TabText,
}

impl SourceFormat {
    /// Detect format from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "xml" => Some(SourceFormat::PlistXml),
            "txt" => Some(SourceFormat::TabText),
            _ => None,
        }
    }

    pub fn from_path(path: &std::path::Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_and_duration() {
        let track = Track::new("Artist", "Song").with_duration_ms(245_999);
        assert_eq!(track.display_name(), "Artist - Song");
        assert_eq!(track.duration_secs(), 245);
    }

    #[test]
    fn test_location_kinds() {
        let url = Track::new("a", "b").with_location("file:///Music/a.mp3");
        assert!(url.has_location());
        assert!(url.has_file_url());

        let plain = Track::new("a", "b").with_location("/Volumes/Music/a.aif");
        assert!(!plain.has_file_url());

        assert!(!Track::new("a", "b").has_location());
    }

    #[test]
    fn test_source_format_from_path() {
        use std::path::Path;
        assert_eq!(SourceFormat::from_path(Path::new("Library.XML")), Some(SourceFormat::PlistXml));
        assert_eq!(SourceFormat::from_path(Path::new("mix.txt")), Some(SourceFormat::TabText));
        assert_eq!(SourceFormat::from_path(Path::new("mix.m3u")), None);
    }
}
