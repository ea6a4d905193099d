//! CLI argument parsing

use crate::group::GroupingMode;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// playsort - Build de-duplicated, shuffled M3U playlists from a music library
///
/// Reads an iTunes/Music `Library.xml` or tab-separated playlist exports and
/// writes M3U playlists grouped by tempo range or genre.
#[derive(Parser, Debug)]
#[command(name = "playsort")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// TOML file with tempo ranges and export options
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Seed for a reproducible shuffle
    #[arg(long, global = true, value_name = "N")]
    pub seed: Option<u64>,

    /// Keep playlists in sorted order instead of shuffling
    #[arg(long, global = true, default_value = "false")]
    pub no_shuffle: bool,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true, default_value = "false")]
    pub quiet: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create tempo and genre playlists from a Library.xml
    Library {
        /// Library file (Library.xml, or a .txt export)
        #[arg(short, long, value_name = "PATH", default_value = "data/Library.xml")]
        input: PathBuf,

        /// Output directory for playlists
        #[arg(short, long, value_name = "DIR", default_value = "playlists")]
        output: PathBuf,

        /// Grouping strategies to apply
        #[arg(long, value_enum, default_value_t = GroupingMode::All)]
        group_by: GroupingMode,

        /// Skip the library diagnostics printed before the playlists
        #[arg(long, default_value = "false")]
        no_report: bool,

        /// Also write the report to <output>/library_report.json
        #[arg(long, default_value = "false")]
        report_json: bool,
    },

    /// De-duplicate and shuffle every .txt playlist export in a directory
    Exports {
        /// Directory of tab-separated exports
        #[arg(short, long, value_name = "DIR", default_value = "data/exported_playlist")]
        input: PathBuf,

        /// Output directory for playlists
        #[arg(short, long, value_name = "DIR", default_value = "playlists")]
        output: PathBuf,

        /// Only keep rows whose location ends with this extension
        #[arg(long, value_name = "EXT")]
        extension: Option<String>,

        /// Prefix joined with each export location
        #[arg(long, value_name = "PREFIX")]
        location_prefix: Option<String>,
    },

    /// De-duplicate and shuffle existing .m3u playlists in place
    Repair {
        /// Directory containing playlists
        #[arg(short, long, value_name = "DIR", default_value = "playlists")]
        dir: PathBuf,
    },
}

impl Cli {
    /// Get the log level based on verbosity flags
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            return tracing::Level::ERROR;
        }
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_defaults() {
        let cli = Cli::try_parse_from(["playsort", "library"]).unwrap();
        match cli.command.clone() {
            Command::Library {
                input,
                output,
                group_by,
                no_report,
                ..
            } => {
                assert_eq!(input, PathBuf::from("data/Library.xml"));
                assert_eq!(output, PathBuf::from("playlists"));
                assert_eq!(group_by, GroupingMode::All);
                assert!(!no_report);
            }
            other => panic!("unexpected command: {:?}", other),
        }
        assert_eq!(cli.log_level(), tracing::Level::WARN);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "playsort", "exports", "--seed", "9", "--no-shuffle", "-vv", "--extension", ".mp3",
        ])
        .unwrap();
        assert_eq!(cli.seed, Some(9));
        assert!(cli.no_shuffle);
        assert_eq!(cli.log_level(), tracing::Level::DEBUG);
        assert!(matches!(
            cli.command,
            Command::Exports { extension: Some(ref e), .. } if e == ".mp3"
        ));
    }

    #[test]
    fn test_group_by_values() {
        let cli = Cli::try_parse_from(["playsort", "library", "--group-by", "genre"]).unwrap();
        assert!(matches!(cli.command, Command::Library { group_by: GroupingMode::Genre, .. }));
        assert!(Cli::try_parse_from(["playsort", "library", "--group-by", "mood"]).is_err());
    }

    #[test]
    fn test_quiet_wins() {
        let cli = Cli::try_parse_from(["playsort", "-q", "-v", "repair"]).unwrap();
        assert_eq!(cli.log_level(), tracing::Level::ERROR);
    }
}
