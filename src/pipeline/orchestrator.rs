//! Pipeline orchestration
//!
//! Each entry point runs sequentially: parse, deduplicate, group, write, then
//! the repair and shuffle passes over the files just written.

use crate::config::Settings;
use crate::dedup;
use crate::error::{PlaysortError, Result};
use crate::export::json::REPORT_FILE_NAME;
use crate::export::m3u::{self, WriteSummary};
use crate::export::{write_playlist, write_report_json};
use crate::group::{genre_playlists, group_by_genre, group_by_tempo, tempo_playlists, PlannedPlaylist};
use crate::library::{self, text};
use crate::report::LibraryReport;
use crate::shuffle::{self, EntryOrder};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Pipeline result summary
#[derive(Debug, Default)]
pub struct PipelineResult {
    /// Library files, exports, or playlists considered
    pub total_inputs: usize,
    /// Inputs skipped because of a recoverable error
    pub failed_inputs: usize,
    /// One summary per playlist written
    pub playlists: Vec<WriteSummary>,
    /// Entries dropped as duplicates, in memory and on disk
    pub duplicates_removed: usize,
}

impl PipelineResult {
    pub fn usable_entries(&self) -> usize {
        self.playlists.iter().map(|p| p.usable).sum()
    }

    pub fn skipped_entries(&self) -> usize {
        self.playlists.iter().map(|p| p.skipped).sum()
    }
}

/// Build tempo and/or genre playlists from a library file
pub fn run_library(settings: &Settings) -> Result<PipelineResult> {
    let pipeline_start = Instant::now();

    info!("Parsing library {}", settings.input.display());
    let tracks = library::load_library(&settings.input, &settings.export)?;

    if settings.report || settings.report_json {
        let report = LibraryReport::build(&tracks, &settings.tempo_ranges);
        if settings.report {
            report.print();
        }
        if settings.report_json {
            ensure_output_dir(&settings.output)?;
            write_report_json(&report, &settings.input, &settings.output.join(REPORT_FILE_NAME))?;
        }
    }

    let mut result = PipelineResult {
        total_inputs: 1,
        ..Default::default()
    };

    let before = tracks.len();
    let tracks = dedup::dedupe_tracks(tracks);
    result.duplicates_removed += before - tracks.len();

    if tracks.is_empty() {
        warn!("No usable tracks in {}", settings.input.display());
        return Ok(result);
    }

    let mut planned: Vec<PlannedPlaylist> = Vec::new();
    if settings.grouping.includes_tempo() {
        planned.extend(tempo_playlists(group_by_tempo(&tracks, &settings.tempo_ranges)));
    }
    if settings.grouping.includes_genre() {
        planned.extend(genre_playlists(group_by_genre(&tracks), settings.min_genre_tracks));
    }
    info!("Writing {} playlists", planned.len());

    ensure_output_dir(&settings.output)?;
    for playlist in &planned {
        let path = settings.output.join(&playlist.file_name);
        let summary = write_playlist(&playlist.tracks, &path, &playlist.title)?;
        print_summary(&summary);
        result.playlists.push(summary);
    }

    let written: Vec<PathBuf> = result.playlists.iter().map(|p| p.path.clone()).collect();
    let mut order = shuffle::strategy(settings.shuffle, settings.seed);
    for path in &written {
        result.duplicates_removed += finalize_playlist(path, order.as_mut())?;
    }

    info!(
        "Total pipeline time: {:.2}s",
        pipeline_start.elapsed().as_secs_f64()
    );
    Ok(result)
}

/// Turn every `.txt` export in a directory into its own playlist
///
/// A broken export is logged and counted; the others are still processed.
pub fn run_exports(settings: &Settings) -> Result<PipelineResult> {
    let exports = library::scan_exports(&settings.input)?;
    let mut result = PipelineResult {
        total_inputs: exports.len(),
        ..Default::default()
    };
    if exports.is_empty() {
        return Ok(result);
    }

    ensure_output_dir(&settings.output)?;
    let mut order = shuffle::strategy(settings.shuffle, settings.seed);

    for export in &exports {
        println!("Processing {}...", export.display());
        match process_export(export, settings, order.as_mut()) {
            Ok((summary, removed)) => {
                result.duplicates_removed += removed;
                print_summary(&summary);
                result.playlists.push(summary);
            }
            Err(e) if e.is_recoverable() => {
                warn!("Skipping {}: {}", export.display(), e);
                result.failed_inputs += 1;
            }
            Err(e) => return Err(e),
        }
    }

    Ok(result)
}

fn process_export(
    export: &Path,
    settings: &Settings,
    order: &mut dyn EntryOrder,
) -> Result<(WriteSummary, usize)> {
    let tracks = text::read_export(export, &settings.export)?;
    println!("  Found {} tracks", tracks.len());

    let before = tracks.len();
    let unique = dedup::dedupe_tracks(tracks);
    let removed = before - unique.len();
    println!("  After dedup: {} tracks", unique.len());

    let stem = export
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "export".to_string());
    let path = settings
        .output
        .join(format!("{}_deduplicated.{}", stem, m3u::EXTENSION));

    let summary = write_playlist(&unique, &path, &stem)?;
    shuffle::shuffle_playlist(&path, order)?;
    Ok((summary, removed))
}

/// Deduplicate and shuffle every `.m3u` playlist in a directory
pub fn run_repair(settings: &Settings) -> Result<PipelineResult> {
    let playlists = find_playlists(&settings.input)?;
    let mut result = PipelineResult {
        total_inputs: playlists.len(),
        ..Default::default()
    };
    let mut order = shuffle::strategy(settings.shuffle, settings.seed);

    for path in &playlists {
        match finalize_playlist(path, order.as_mut()) {
            Ok(removed) => {
                if removed > 0 {
                    println!("Removed {} duplicates from {}", removed, path.display());
                }
                result.duplicates_removed += removed;
            }
            Err(e) if e.is_recoverable() => {
                warn!("Skipping {}: {}", path.display(), e);
                result.failed_inputs += 1;
            }
            Err(e) => return Err(e),
        }
    }

    Ok(result)
}

/// Dedup repair, then shuffle; returns entries removed
fn finalize_playlist(path: &Path, order: &mut dyn EntryOrder) -> Result<usize> {
    let removed = dedup::repair_playlist(path)?;
    shuffle::shuffle_playlist(path, order)?;
    Ok(removed)
}

fn find_playlists(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(PlaysortError::FileNotFound(dir.to_path_buf()));
    }

    let mut playlists = Vec::new();
    for entry in WalkDir::new(dir).max_depth(1) {
        let path = entry.map_err(std::io::Error::from)?.into_path();
        if path.is_file() && path.extension().is_some_and(|e| e == m3u::EXTENSION) {
            playlists.push(path);
        }
    }
    playlists.sort();

    debug!("Found {} playlists in {}", playlists.len(), dir.display());
    Ok(playlists)
}

fn ensure_output_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).map_err(|e| PlaysortError::output_error(dir, e))
}

fn print_summary(summary: &WriteSummary) {
    println!("Created playlist: {}", summary.path.display());
    println!("  - {} tracks with valid paths", summary.usable);
    println!("  - {} tracks skipped (missing/invalid paths)", summary.skipped);

    if let Some(warning) = summary.warning() {
        warn!("{}", warning);
    }
}
