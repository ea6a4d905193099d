//! Track location resolution for M3U path lines
//!
//! Library files store local tracks as `file://` URLs:
//! - `file:///Users/DJ/My%20Music/Track.mp3` → `/Users/DJ/My Music/Track.mp3`
//! - `file://localhost/Users/DJ/Track.mp3` → `/Users/DJ/Track.mp3`
//! - `file://localhost/C:/Music/Track.mp3` → `C:/Music/Track.mp3`
//!
//! Any other non-empty location is used verbatim.

use crate::types::FILE_SCHEME;
use percent_encoding::percent_decode_str;
use std::path::Path;

/// Outcome of resolving a track location
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedLocation {
    /// Path line to write
    Usable(String),
    /// File URL whose decoded path does not exist
    Missing(String),
    /// Track has no location at all
    Empty,
}

impl ResolvedLocation {
    pub fn is_usable(&self) -> bool {
        matches!(self, ResolvedLocation::Usable(_))
    }
}

/// Resolve a location, checking file URLs against the filesystem
pub fn resolve(location: &str) -> ResolvedLocation {
    resolve_with(location, |path| path.exists())
}

/// Resolve a location with a custom existence check
pub fn resolve_with(location: &str, exists: impl Fn(&Path) -> bool) -> ResolvedLocation {
    if location.is_empty() {
        return ResolvedLocation::Empty;
    }

    match file_url_to_path(location) {
        Some(path) if exists(Path::new(&path)) => ResolvedLocation::Usable(path),
        Some(path) => ResolvedLocation::Missing(path),
        None => ResolvedLocation::Usable(location.to_string()),
    }
}

/// Convert a `file://` URL to a local path string
///
/// Returns `None` for locations that are not file URLs.
pub fn file_url_to_path(url: &str) -> Option<String> {
    let rest = url.strip_prefix(FILE_SCHEME)?;

    // Drop the host part, which is empty or "localhost" for local files
    let rest = match rest.strip_prefix("localhost") {
        Some(after) if after.starts_with('/') => after,
        _ => rest,
    };

    let decoded = percent_decode_str(rest).decode_utf8_lossy().into_owned();

    // Windows drive letters: /C:/... → C:/...
    if let Some(stripped) = decoded.strip_prefix('/') {
        if is_windows_path(stripped) {
            return Some(stripped.to_string());
        }
    }

    Some(decoded)
}

/// Check if a path string looks like a Windows path (has drive letter)
fn is_windows_path(path: &str) -> bool {
    let mut chars = path.chars();
    matches!(
        (chars.next(), chars.next()),
        (Some(drive), Some(':')) if drive.is_ascii_alphabetic()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_url_decoding() {
        assert_eq!(
            file_url_to_path("file:///Users/DJ/My%20Music/Track%20%231.mp3").as_deref(),
            Some("/Users/DJ/My Music/Track #1.mp3")
        );
    }

    #[test]
    fn test_localhost_host_is_stripped() {
        assert_eq!(
            file_url_to_path("file://localhost/Users/DJ/Track.mp3").as_deref(),
            Some("/Users/DJ/Track.mp3")
        );
    }

    #[test]
    fn test_windows_drive() {
        assert_eq!(
            file_url_to_path("file://localhost/C:/Music/Track.mp3").as_deref(),
            Some("C:/Music/Track.mp3")
        );
    }

    #[test]
    fn test_utf8_percent_sequences() {
        assert_eq!(
            file_url_to_path("file:///Music/Beyonc%C3%A9.m4a").as_deref(),
            Some("/Music/Beyoncé.m4a")
        );
    }

    #[test]
    fn test_non_file_locations() {
        assert_eq!(file_url_to_path("/Volumes/Music/a.aif"), None);
        assert_eq!(file_url_to_path("https://example.com/a.mp3"), None);
    }

    #[test]
    fn test_resolve_missing_file_url() {
        let resolved = resolve("file:///definitely/not/here/track.mp3");
        assert_eq!(resolved, ResolvedLocation::Missing("/definitely/not/here/track.mp3".to_string()));
        assert!(!resolved.is_usable());
    }

    #[test]
    fn test_resolve_existing_file_url() {
        let resolved = resolve_with("file:///Music/a%20b.mp3", |p| p == Path::new("/Music/a b.mp3"));
        assert_eq!(resolved, ResolvedLocation::Usable("/Music/a b.mp3".to_string()));
    }

    #[test]
    fn test_resolve_verbatim_and_empty() {
        assert_eq!(
            resolve("/Volumes/Music/a.aif"),
            ResolvedLocation::Usable("/Volumes/Music/a.aif".to_string())
        );
        assert_eq!(resolve(""), ResolvedLocation::Empty);
    }

    #[test]
    fn test_is_windows_path() {
        assert!(is_windows_path("C:/Music/Track.mp3"));
        assert!(is_windows_path("D:/"));
        assert!(!is_windows_path("Users/DJ"));
        assert!(!is_windows_path("1:/x"));
    }
}
