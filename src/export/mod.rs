//! Export modules for M3U playlists and the JSON library report

pub mod json;
pub mod m3u;

pub use json::write_report_json;
pub use m3u::{write_playlist, M3uDocument, WriteSummary};

use crate::error::{PlaysortError, Result};
use std::path::Path;

/// Write `contents` to `path` through a temp file in the same directory
///
/// Either the whole new file is in place or the old one is untouched.
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let temp_path = path.with_extension("tmp");

    std::fs::write(&temp_path, contents).map_err(|e| {
        let _ = std::fs::remove_file(&temp_path);
        PlaysortError::output_error(path, e)
    })?;

    std::fs::rename(&temp_path, path).map_err(|e| {
        let _ = std::fs::remove_file(&temp_path);
        PlaysortError::OutputError {
            path: path.to_path_buf(),
            reason: format!("Failed to finalize file: {}", e),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_atomic_replaces_and_cleans_up() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("out.m3u");
        write_atomic(&path, "one").unwrap();
        write_atomic(&path, "two").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "two");
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn test_write_atomic_missing_dir() {
        let err = write_atomic(Path::new("/nonexistent/dir/out.m3u"), "x").unwrap_err();
        assert!(matches!(err, PlaysortError::OutputError { .. }));
    }
}
