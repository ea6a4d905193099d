//! Extended M3U playlists
//!
//! ```text
//! #EXTM3U
//! #PLAYLIST:<title>
//! #EXTINF:<seconds>,<artist> - <title>
//! <path, or a "# MISSING:" / "# NO LOCATION:" comment>
//! ```

pub mod document;
pub mod location;
pub mod writer;

pub use document::{M3uDocument, M3uEntry};
pub use location::{file_url_to_path, ResolvedLocation};
pub use writer::{write_playlist, WriteSummary};

pub const HEADER: &str = "#EXTM3U";
pub const PLAYLIST_PREFIX: &str = "#PLAYLIST:";
pub const EXTINF_PREFIX: &str = "#EXTINF:";
pub const MISSING_MARKER: &str = "# MISSING: ";
pub const NO_LOCATION_MARKER: &str = "# NO LOCATION: ";

/// File extension of generated playlists
pub const EXTENSION: &str = "m3u";
