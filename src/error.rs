//! Unified error types for playsort
//!
//! Error strategy:
//! - Per-input errors (missing column, bad encoding, malformed XML): recoverable,
//!   skip the input and continue the batch
//! - System errors (output, configuration): fatal, abort the run
//!
//! Missing per-track data is never an error; it is defaulted instead.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Columns a tab-separated export must carry
pub const REQUIRED_COLUMNS: &str = "Name, Artist, Location, Time";

/// Top-level error type for playsort operations
#[derive(Debug, Error)]
pub enum PlaysortError {
    // =========================================================================
    // Recoverable errors - skip input, continue batch
    // =========================================================================
    #[error("Export '{path}' has no '{column}' column\n  Required columns: {REQUIRED_COLUMNS}\n  Tip: In Music, select the playlist and use File > Library > Export Playlist... as plain text")]
    MissingColumn { path: PathBuf, column: String },

    #[error("Failed to parse library '{path}': {reason}\n  Tip: Re-export the library with File > Library > Export Library...")]
    LibraryParse { path: PathBuf, reason: String },

    #[error("Cannot decode '{path}': {reason}\n  Supported encodings: UTF-8, UTF-16 (LE/BE)")]
    Encoding { path: PathBuf, reason: String },

    #[error("File not found: '{0}'\n  Tip: Check the path exists and is accessible")]
    FileNotFound(PathBuf),

    // =========================================================================
    // Fatal errors - abort run
    // =========================================================================
    #[error("Cannot write output to '{path}': {reason}\n  Tip: Check write permissions for the output directory")]
    OutputError { path: PathBuf, reason: String },

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Directory traversal and other unclassified I/O failures
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for playsort operations
pub type Result<T> = std::result::Result<T, PlaysortError>;

impl PlaysortError {
    /// Returns true if this error is recoverable (should skip input, continue batch)
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            PlaysortError::MissingColumn { .. }
                | PlaysortError::LibraryParse { .. }
                | PlaysortError::Encoding { .. }
                | PlaysortError::FileNotFound(_)
        )
    }

    pub fn missing_column(path: impl Into<PathBuf>, column: impl Into<String>) -> Self {
        PlaysortError::MissingColumn {
            path: path.into(),
            column: column.into(),
        }
    }

    pub fn encoding(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        PlaysortError::Encoding {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create an input read error, mapping a missing file to `FileNotFound`
    pub fn input_error(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        let path = path.into();
        match err.kind() {
            std::io::ErrorKind::NotFound => PlaysortError::FileNotFound(path),
            _ => PlaysortError::LibraryParse {
                path,
                reason: err.to_string(),
            },
        }
    }

    /// Create an output error, checking for common issues
    pub fn output_error(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        let path = path.into();
        let reason = match err.kind() {
            std::io::ErrorKind::PermissionDenied => {
                format!("Permission denied. Check that you have write access to {}", path.display())
            }
            std::io::ErrorKind::NotFound => {
                format!("Directory does not exist: {}", path.parent().map(|p| p.display().to_string()).unwrap_or_default())
            }
            _ => err.to_string(),
        };
        PlaysortError::OutputError { path, reason }
    }
}

/// Extension trait for adding context to errors
pub trait ErrorContext<T> {
    /// Attach the library or export file that was being parsed
    fn with_input_context(self, path: &Path) -> Result<T>;
}

impl<T, E: std::fmt::Display> ErrorContext<T> for std::result::Result<T, E> {
    fn with_input_context(self, path: &Path) -> Result<T> {
        self.map_err(|e| PlaysortError::LibraryParse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}
