//! playsort CLI entry point

use clap::Parser;
use playsort::config::{Cli, Command, FileConfig, Settings};
use playsort::pipeline::{self, PipelineResult};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(&cli);

    let file_config = match FileConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let settings = Settings::from_cli(&cli, &file_config);

    if let Err(e) = validate_inputs(&cli.command, &settings) {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    let outcome = match cli.command {
        Command::Library { .. } => pipeline::run_library(&settings),
        Command::Exports { .. } => pipeline::run_exports(&settings),
        Command::Repair { .. } => pipeline::run_repair(&settings),
    };

    match outcome {
        Ok(result) => {
            print_result(&result);
            if result.failed_inputs > 0 {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            eprintln!("Fatal error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(cli: &Cli) {
    let filter = cli.log_level().to_string().to_lowercase();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();
}

fn validate_inputs(command: &Command, settings: &Settings) -> Result<(), String> {
    if settings.input.exists() {
        return Ok(());
    }

    let tip = match command {
        Command::Library { .. } => "  Export your library first:\n    1. Open the Music app (or iTunes)\n    2. Go to File > Library > Export Library...\n    3. Save it and pass the path with -i, e.g. playsort library -i data/Library.xml",
        Command::Exports { .. } => "  Export playlists as text with File > Library > Export Playlist...\n  and pass their directory with -i, e.g. playsort exports -i data/exported_playlist",
        Command::Repair { .. } => "  Pass the directory containing .m3u files with -d, e.g. playsort repair -d playlists",
    };

    Err(format!(
        "Input path does not exist: {}\n\n{}",
        settings.input.display(),
        tip
    ))
}

fn print_result(result: &PipelineResult) {
    println!();
    println!(
        "Summary: {} playlists, {} usable entries, {} skipped entries, {} duplicates removed",
        result.playlists.len(),
        result.usable_entries(),
        result.skipped_entries(),
        result.duplicates_removed
    );
    if result.failed_inputs > 0 {
        println!(
            "  {} of {} inputs failed (see warnings above)",
            result.failed_inputs, result.total_inputs
        );
    }
}
