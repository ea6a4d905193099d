//! Optional configuration file
//!
//! `FileConfig::load` reads an optional TOML file, then environment variables
//! with prefix `PLAYSORT__` (e.g. `PLAYSORT__MIN_GENRE_TRACKS=3`), and falls
//! back to struct defaults.
//!
//! ```toml
//! min_genre_tracks = 5
//! audio_extension = ".aif"
//! location_prefix = "/Volumes/"
//!
//! [[tempo_ranges]]
//! min = 0
//! max = 90
//! label = "Chill (0-90 BPM)"
//! ```

use crate::error::{PlaysortError, Result};
use crate::group::{default_tempo_ranges, TempoRange, DEFAULT_MIN_GENRE_TRACKS};
use crate::library::TextExportOptions;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub tempo_ranges: Vec<TempoRange>,
    pub min_genre_tracks: usize,
    pub audio_extension: String,
    pub location_prefix: String,
}

impl Default for FileConfig {
    fn default() -> Self {
        let export = TextExportOptions::default();
        Self {
            tempo_ranges: default_tempo_ranges(),
            min_genre_tracks: DEFAULT_MIN_GENRE_TRACKS,
            audio_extension: export.audio_extension,
            location_prefix: export.location_prefix,
        }
    }
}

impl FileConfig {
    /// Load from an optional file and the environment
    ///
    /// A file passed explicitly must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = ::config::Config::builder();

        if let Some(path) = path {
            if !path.exists() {
                return Err(PlaysortError::ConfigError(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            builder = builder.add_source(::config::File::from(path));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("PLAYSORT")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder
            .build()
            .map_err(|e| PlaysortError::ConfigError(e.to_string()))?;
        let file_config: FileConfig = cfg
            .try_deserialize()
            .map_err(|e| PlaysortError::ConfigError(e.to_string()))?;

        file_config.validate()?;
        Ok(file_config)
    }

    /// Perform basic validation checks on loaded settings
    pub fn validate(&self) -> Result<()> {
        if self.tempo_ranges.is_empty() {
            return Err(PlaysortError::ConfigError("tempo_ranges must not be empty".to_string()));
        }
        for range in &self.tempo_ranges {
            if range.min > range.max {
                return Err(PlaysortError::ConfigError(format!(
                    "tempo range '{}' has min {} > max {}",
                    range.label, range.min, range.max
                )));
            }
            if range.label.trim().is_empty() {
                return Err(PlaysortError::ConfigError(format!(
                    "tempo range {}-{} has an empty label",
                    range.min, range.max
                )));
            }
        }
        if self.min_genre_tracks == 0 {
            return Err(PlaysortError::ConfigError("min_genre_tracks must be >= 1".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_without_file() {
        let config = FileConfig::load(None).unwrap();
        assert_eq!(config.tempo_ranges.len(), 7);
        assert_eq!(config.min_genre_tracks, 5);
        assert_eq!(config.audio_extension, ".aif");
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("playsort.toml");
        fs::write(
            &path,
            r#"
min_genre_tracks = 3
location_prefix = "/mnt/music/"

[[tempo_ranges]]
min = 0
max = 99
label = "Slow"

[[tempo_ranges]]
min = 100
max = 999
label = "Fast"
"#,
        )
        .unwrap();

        let config = FileConfig::load(Some(&path)).unwrap();
        assert_eq!(config.min_genre_tracks, 3);
        assert_eq!(config.location_prefix, "/mnt/music/");
        assert_eq!(config.audio_extension, ".aif");
        assert_eq!(
            config.tempo_ranges,
            vec![TempoRange::new(0, 99, "Slow"), TempoRange::new(100, 999, "Fast")]
        );
    }

    #[test]
    fn test_missing_explicit_file() {
        let err = FileConfig::load(Some(Path::new("/nonexistent/playsort.toml"))).unwrap_err();
        assert!(matches!(err, PlaysortError::ConfigError(_)));
    }

    #[test]
    fn test_validate_rejects_inverted_range() {
        let config = FileConfig {
            tempo_ranges: vec![TempoRange::new(120, 100, "Broken")],
            ..FileConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_threshold() {
        let config = FileConfig {
            min_genre_tracks: 0,
            ..FileConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
