//! Library diagnostics and statistics
//!
//! Answers the usual "why is my playlist empty?" questions: how many tracks
//! have a location at all, how many are `file://` URLs, and how many of those
//! still point at an existing file.

use crate::export::m3u::file_url_to_path;
use crate::group::{group_by_genre, group_by_tempo, TempoRange};
use crate::types::Track;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How many located tracks to show in the sample
const SAMPLE_SIZE: usize = 10;

/// How many genres to list
const TOP_GENRES: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibraryReport {
    pub total_tracks: usize,
    pub tracks_with_location: usize,
    pub tracks_with_file_urls: usize,
    /// File URLs whose decoded path exists on this machine
    pub tracks_with_valid_paths: usize,
    pub sample: Vec<SampleTrack>,
    /// (label, count) in range order
    pub tempo_distribution: Vec<(String, usize)>,
    /// (genre, count), most common first
    pub top_genres: Vec<(String, usize)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tempo_stats: Option<TempoStats>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleTrack {
    pub display: String,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub exists: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TempoStats {
    pub count: usize,
    pub average: f64,
    pub min: u32,
    pub max: u32,
}

impl LibraryReport {
    pub fn build(tracks: &[Track], ranges: &[TempoRange]) -> Self {
        Self::build_with(tracks, ranges, |p| p.exists())
    }

    /// Build with a custom existence check for decoded paths
    pub fn build_with(tracks: &[Track], ranges: &[TempoRange], exists: impl Fn(&Path) -> bool) -> Self {
        let decoded: Vec<Option<String>> = tracks.iter().map(|t| file_url_to_path(&t.location)).collect();

        let tracks_with_valid_paths = decoded
            .iter()
            .flatten()
            .filter(|p| exists(Path::new(p)))
            .count();

        let sample = tracks
            .iter()
            .zip(&decoded)
            .take(SAMPLE_SIZE)
            .filter(|(t, _)| t.has_location())
            .map(|(t, path)| SampleTrack {
                display: t.display_name(),
                location: t.location.clone(),
                exists: path.as_deref().is_some_and(|p| exists(Path::new(p))),
                path: path.clone(),
            })
            .collect();

        let tempo_distribution = group_by_tempo(tracks, ranges)
            .iter()
            .map(|b| (b.label.clone(), b.tracks.len()))
            .collect();

        let mut top_genres: Vec<(String, usize)> = group_by_genre(tracks)
            .iter()
            .map(|b| (b.label.clone(), b.tracks.len()))
            .collect();
        // Stable sort keeps first-seen order among equal counts
        top_genres.sort_by(|a, b| b.1.cmp(&a.1));
        top_genres.truncate(TOP_GENRES);

        Self {
            total_tracks: tracks.len(),
            tracks_with_location: tracks.iter().filter(|t| t.has_location()).count(),
            tracks_with_file_urls: decoded.iter().filter(|p| p.is_some()).count(),
            tracks_with_valid_paths,
            sample,
            tempo_distribution,
            top_genres,
            tempo_stats: TempoStats::from_tracks(tracks),
        }
    }

    /// Print the report to stdout
    pub fn print(&self) {
        println!();
        println!("=== LIBRARY DATA ANALYSIS ===");
        println!("Total tracks: {}", self.total_tracks);
        println!("Tracks with location data: {}", self.tracks_with_location);
        println!("Tracks with file:// URLs: {}", self.tracks_with_file_urls);
        println!("Tracks with existing files: {}", self.tracks_with_valid_paths);

        if !self.sample.is_empty() {
            println!();
            println!("Sample locations (first {} tracks):", self.sample.len());
            for (i, sample) in self.sample.iter().enumerate() {
                println!("  {}. {}", i + 1, sample.display);
                match &sample.path {
                    Some(path) => {
                        println!("     Path: {}", path);
                        println!("     Exists: {}", if sample.exists { "yes" } else { "no" });
                    }
                    None => println!("     Location: {}", sample.location),
                }
            }
        }

        if self.tracks_with_file_urls == 0 {
            println!();
            println!("No file:// URLs found in library!");
            println!("  The library file does not contain local file paths. Possible solutions:");
            println!("  1. Re-export the library with File > Library > Export Library...");
            println!("  2. Check that music files are stored locally (not streaming/cloud)");
            println!("  3. Make sure the Music app has indexed your local files");
        }

        println!();
        println!("=== MUSIC LIBRARY ANALYSIS ===");
        println!("Total tracks: {}", self.total_tracks);

        println!();
        println!("--- BPM Distribution ---");
        for (label, count) in &self.tempo_distribution {
            println!("{}: {} tracks", label, count);
        }

        println!();
        println!("--- Top Genres ---");
        for (genre, count) in &self.top_genres {
            println!("{}: {} tracks", genre, count);
        }

        if let Some(stats) = &self.tempo_stats {
            println!();
            println!("--- BPM Statistics ---");
            println!("Tracks with BPM data: {}", stats.count);
            println!("Average BPM: {:.1}", stats.average);
            println!("BPM range: {} - {}", stats.min, stats.max);
        }
        println!();
    }
}

impl TempoStats {
    /// Statistics over tracks with a known tempo; `None` if there are none
    pub fn from_tracks(tracks: &[Track]) -> Option<Self> {
        let bpms: Vec<u32> = tracks.iter().map(|t| t.bpm).filter(|b| *b > 0).collect();
        let min = *bpms.iter().min()?;
        let max = *bpms.iter().max()?;
        let sum: u64 = bpms.iter().map(|b| u64::from(*b)).sum();

        Some(Self {
            count: bpms.len(),
            average: sum as f64 / bpms.len() as f64,
            min,
            max,
        })
    }
}
