//! playsort - Playlists from music library exports
//!
//! Converts an iTunes/Music `Library.xml` or tab-separated playlist exports
//! into M3U playlists: duplicates removed, grouped by tempo range or genre,
//! and shuffled so artists and albums do not cluster.
//!
//! # Architecture
//!
//! - `config`: CLI argument parsing, config file, and runtime settings
//! - `library`: `Library.xml` and text export parsing
//! - `dedup`: (artist, title) identity and deduplication
//! - `group`: tempo-range and genre buckets
//! - `export`: M3U writing/reading and the JSON library report
//! - `shuffle`: entry ordering strategies
//! - `report`: library diagnostics and statistics
//! - `pipeline`: the `library`, `exports` and `repair` runs
//!
//! # Example
//!
//! ```no_run
//! use playsort::{config::Settings, pipeline};
//!
//! let settings = Settings::default();
//! let result = pipeline::run_library(&settings).expect("Playlist generation failed");
//! println!("Wrote {} playlists", result.playlists.len());
//! ```

pub mod config;
pub mod dedup;
pub mod error;
pub mod export;
pub mod group;
pub mod library;
pub mod pipeline;
pub mod report;
pub mod shuffle;
pub mod types;

// Re-export key types at crate root
pub use error::{PlaysortError, Result};
pub use types::Track;
