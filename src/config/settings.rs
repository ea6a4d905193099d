//! Runtime configuration settings

use super::cli::{Cli, Command};
use super::file::FileConfig;
use crate::group::{default_tempo_ranges, GroupingMode, TempoRange, DEFAULT_MIN_GENRE_TRACKS};
use crate::library::TextExportOptions;
use std::path::PathBuf;

/// Runtime settings shared by the pipelines
#[derive(Debug, Clone)]
pub struct Settings {
    /// Library file, export directory, or playlist directory (repair)
    pub input: PathBuf,
    /// Output directory for playlists
    pub output: PathBuf,
    /// Grouping strategies for library runs
    pub grouping: GroupingMode,
    /// Ordered tempo bands
    pub tempo_ranges: Vec<TempoRange>,
    /// Smallest genre bucket that becomes a playlist
    pub min_genre_tracks: usize,
    /// Row filter and path prefix for text exports
    pub export: TextExportOptions,
    /// Shuffle written playlists
    pub shuffle: bool,
    /// Seed for a reproducible shuffle
    pub seed: Option<u64>,
    /// Print library diagnostics
    pub report: bool,
    /// Write library diagnostics as JSON
    pub report_json: bool,
}

impl Settings {
    /// Create settings from CLI arguments layered over the config file
    pub fn from_cli(cli: &Cli, file: &FileConfig) -> Self {
        let mut settings = Self {
            tempo_ranges: file.tempo_ranges.clone(),
            min_genre_tracks: file.min_genre_tracks,
            export: TextExportOptions {
                audio_extension: file.audio_extension.clone(),
                location_prefix: file.location_prefix.clone(),
            },
            shuffle: !cli.no_shuffle,
            seed: cli.seed,
            ..Self::default()
        };

        match &cli.command {
            Command::Library {
                input,
                output,
                group_by,
                no_report,
                report_json,
            } => {
                settings.input = input.clone();
                settings.output = output.clone();
                settings.grouping = *group_by;
                settings.report = !*no_report;
                settings.report_json = *report_json;
            }
            Command::Exports {
                input,
                output,
                extension,
                location_prefix,
            } => {
                settings.input = input.clone();
                settings.output = output.clone();
                if let Some(ext) = extension {
                    settings.export.audio_extension = ext.clone();
                }
                if let Some(prefix) = location_prefix {
                    settings.export.location_prefix = prefix.clone();
                }
            }
            Command::Repair { dir } => {
                settings.input = dir.clone();
                settings.output = dir.clone();
            }
        }

        settings
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            input: PathBuf::from("data/Library.xml"),
            output: PathBuf::from("playlists"),
            grouping: GroupingMode::All,
            tempo_ranges: default_tempo_ranges(),
            min_genre_tracks: DEFAULT_MIN_GENRE_TRACKS,
            export: TextExportOptions::default(),
            shuffle: true,
            seed: None,
            report: true,
            report_json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_overrides_file() {
        let cli = Cli::try_parse_from([
            "playsort", "exports", "-i", "in", "-o", "out", "--location-prefix", "/mnt/",
        ])
        .unwrap();
        let file = FileConfig {
            audio_extension: ".mp3".to_string(),
            location_prefix: "/Volumes/".to_string(),
            ..FileConfig::default()
        };

        let settings = Settings::from_cli(&cli, &file);
        assert_eq!(settings.input, PathBuf::from("in"));
        assert_eq!(settings.output, PathBuf::from("out"));
        assert_eq!(settings.export.audio_extension, ".mp3");
        assert_eq!(settings.export.location_prefix, "/mnt/");
        assert!(settings.shuffle);
    }

    #[test]
    fn test_library_report_printed_by_default() {
        let cli = Cli::try_parse_from(["playsort", "library", "--no-shuffle"]).unwrap();
        let settings = Settings::from_cli(&cli, &FileConfig::default());
        assert!(settings.report);
        assert!(!settings.report_json);
        assert!(!settings.shuffle);
    }

    #[test]
    fn test_no_report_keeps_json_export() {
        let cli = Cli::try_parse_from(["playsort", "library", "--no-report", "--report-json"]).unwrap();
        let settings = Settings::from_cli(&cli, &FileConfig::default());
        assert!(!settings.report);
        assert!(settings.report_json);
    }

    #[test]
    fn test_repair_uses_dir_for_both() {
        let cli = Cli::try_parse_from(["playsort", "repair", "-d", "lists"]).unwrap();
        let settings = Settings::from_cli(&cli, &FileConfig::default());
        assert_eq!(settings.input, settings.output);
    }
}
