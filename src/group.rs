//! Grouping tracks into tempo-range and genre buckets
//!
//! The two strategies are independent: a run may use either or both, and
//! each produces its own set of playlists.

use crate::export::m3u::EXTENSION;
use crate::types::Track;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Bucket for tracks with tempo 0
pub const NO_TEMPO_LABEL: &str = "No BPM Data";

/// Bucket for tracks with a blank or absent genre
pub const UNKNOWN_GENRE: &str = "Unknown";

/// Genre buckets smaller than this do not become playlists
pub const DEFAULT_MIN_GENRE_TRACKS: usize = 5;

/// Which grouping strategies a run applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupingMode {
    Tempo,
    Genre,
    #[default]
    All,
}

impl GroupingMode {
    pub fn includes_tempo(self) -> bool {
        matches!(self, GroupingMode::Tempo | GroupingMode::All)
    }

    pub fn includes_genre(self) -> bool {
        matches!(self, GroupingMode::Genre | GroupingMode::All)
    }
}

/// Inclusive tempo band
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TempoRange {
    pub min: u32,
    pub max: u32,
    pub label: String,
}

impl TempoRange {
    pub fn new(min: u32, max: u32, label: impl Into<String>) -> Self {
        Self {
            min,
            max,
            label: label.into(),
        }
    }

    pub fn contains(&self, bpm: u32) -> bool {
        self.min <= bpm && bpm <= self.max
    }
}

/// The seven default bands covering 0-999 BPM
pub fn default_tempo_ranges() -> Vec<TempoRange> {
    vec![
        TempoRange::new(0, 80, "Slow (0-80 BPM)"),
        TempoRange::new(81, 100, "Moderate (81-100 BPM)"),
        TempoRange::new(101, 120, "Medium (101-120 BPM)"),
        TempoRange::new(121, 140, "Upbeat (121-140 BPM)"),
        TempoRange::new(141, 160, "Fast (141-160 BPM)"),
        TempoRange::new(161, 180, "Very Fast (161-180 BPM)"),
        TempoRange::new(181, 999, "Extreme (181+ BPM)"),
    ]
}

// =============================================================================
// Buckets
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Bucket {
    pub label: String,
    pub tracks: Vec<Track>,
}

/// Label → tracks, in first-insertion order of labels
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BucketMap {
    buckets: Vec<Bucket>,
}

impl BucketMap {
    pub fn insert(&mut self, label: &str, track: Track) {
        match self.buckets.iter_mut().find(|b| b.label == label) {
            Some(bucket) => bucket.tracks.push(track),
            None => self.buckets.push(Bucket {
                label: label.to_string(),
                tracks: vec![track],
            }),
        }
    }

    pub fn get(&self, label: &str) -> Option<&[Track]> {
        self.buckets
            .iter()
            .find(|b| b.label == label)
            .map(|b| b.tracks.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Bucket> {
        self.buckets.iter()
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

impl IntoIterator for BucketMap {
    type Item = Bucket;
    type IntoIter = std::vec::IntoIter<Bucket>;

    fn into_iter(self) -> Self::IntoIter {
        self.buckets.into_iter()
    }
}

/// Group by tempo; the first range containing the tempo wins
///
/// Tempo 0 goes to [`NO_TEMPO_LABEL`], which is placed last. Tempos outside
/// every range are left out.
pub fn group_by_tempo(tracks: &[Track], ranges: &[TempoRange]) -> BucketMap {
    let mut per_range: Vec<Vec<Track>> = vec![Vec::new(); ranges.len()];
    let mut no_tempo = Vec::new();

    for track in tracks {
        if track.bpm == 0 {
            no_tempo.push(track.clone());
            continue;
        }
        match ranges.iter().position(|r| r.contains(track.bpm)) {
            Some(i) => per_range[i].push(track.clone()),
            None => debug!("{} BPM matches no range: {}", track.bpm, track.display_name()),
        }
    }

    let mut map = BucketMap::default();
    for (range, bucket) in ranges.iter().zip(per_range) {
        for track in bucket {
            map.insert(&range.label, track);
        }
    }
    for track in no_tempo {
        map.insert(NO_TEMPO_LABEL, track);
    }
    map
}

/// Group by trimmed genre; blank genres go to [`UNKNOWN_GENRE`]
pub fn group_by_genre(tracks: &[Track]) -> BucketMap {
    let mut map = BucketMap::default();
    for track in tracks {
        let genre = track.genre.as_deref().map(str::trim).unwrap_or_default();
        let label = if genre.is_empty() { UNKNOWN_GENRE } else { genre };
        map.insert(label, track.clone());
    }
    map
}

// =============================================================================
// Playlist planning
// =============================================================================

/// A playlist ready to be written
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedPlaylist {
    pub file_name: String,
    pub title: String,
    /// Sorted by (artist, title)
    pub tracks: Vec<Track>,
}

impl PlannedPlaylist {
    fn new(file_name: String, title: String, mut tracks: Vec<Track>) -> Self {
        tracks.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
        Self {
            file_name,
            title,
            tracks,
        }
    }
}

/// One playlist per non-empty tempo bucket
pub fn tempo_playlists(buckets: BucketMap) -> Vec<PlannedPlaylist> {
    buckets
        .into_iter()
        .filter(|b| !b.tracks.is_empty())
        .map(|b| PlannedPlaylist::new(tempo_file_name(&b.label), b.label, b.tracks))
        .collect()
}

/// One playlist per genre bucket holding at least `min_tracks` tracks
pub fn genre_playlists(buckets: BucketMap, min_tracks: usize) -> Vec<PlannedPlaylist> {
    buckets
        .into_iter()
        .filter(|b| {
            let keep = b.tracks.len() >= min_tracks;
            if !keep {
                debug!("Skipping genre '{}' with {} tracks", b.label, b.tracks.len());
            }
            keep
        })
        .map(|b| {
            let title = format!("Genre: {}", b.label);
            PlannedPlaylist::new(genre_file_name(&b.label), title, b.tracks)
        })
        .collect()
}

/// "Slow (0-80 BPM)" → "BPM_Slow_0-80_BPM.m3u"
pub fn tempo_file_name(label: &str) -> String {
    let stem: String = label
        .chars()
        .filter(|c| !matches!(c, '(' | ')'))
        .map(|c| match c {
            ' ' | '/' | '\\' => '_',
            c => c,
        })
        .collect();
    format!("BPM_{}.{}", stem, EXTENSION)
}

/// "Hip-Hop/Rap" → "Genre_Hip-HopRap.m3u"
pub fn genre_file_name(genre: &str) -> String {
    let safe: String = genre
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .collect();
    format!("Genre_{}.{}", safe.trim(), EXTENSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracks_with_bpm(bpms: &[u32]) -> Vec<Track> {
        bpms.iter()
            .enumerate()
            .map(|(i, bpm)| Track::new("Artist", format!("Song {}", i)).with_bpm(*bpm))
            .collect()
    }

    #[test]
    fn test_boundary_tempo_falls_in_lower_band() {
        let map = group_by_tempo(&tracks_with_bpm(&[80, 81]), &default_tempo_ranges());
        assert_eq!(map.get("Slow (0-80 BPM)").unwrap().len(), 1);
        assert_eq!(map.get("Slow (0-80 BPM)").unwrap()[0].bpm, 80);
        assert_eq!(map.get("Moderate (81-100 BPM)").unwrap()[0].bpm, 81);
    }

    #[test]
    fn test_zero_tempo_goes_to_reserved_bucket_last() {
        let map = group_by_tempo(&tracks_with_bpm(&[0, 125, 0]), &default_tempo_ranges());
        let labels: Vec<_> = map.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["Upbeat (121-140 BPM)", NO_TEMPO_LABEL]);
        assert_eq!(map.get(NO_TEMPO_LABEL).unwrap().len(), 2);
    }

    #[test]
    fn test_first_matching_range_wins() {
        let ranges = vec![
            TempoRange::new(100, 130, "A"),
            TempoRange::new(120, 140, "B"),
        ];
        let map = group_by_tempo(&tracks_with_bpm(&[125, 135]), &ranges);
        assert_eq!(map.get("A").unwrap()[0].bpm, 125);
        assert_eq!(map.get("B").unwrap()[0].bpm, 135);
    }

    #[test]
    fn test_out_of_range_tempo_is_left_out() {
        let map = group_by_tempo(&tracks_with_bpm(&[1200]), &default_tempo_ranges());
        assert!(map.is_empty());
    }

    #[test]
    fn test_genre_grouping_trims_and_defaults() {
        let tracks = vec![
            Track::new("A", "1").with_genre(" House "),
            Track::new("A", "2").with_genre("House"),
            Track::new("A", "3").with_genre("   "),
            Track::new("A", "4"),
        ];
        let map = group_by_genre(&tracks);
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("House").unwrap().len(), 2);
        assert_eq!(map.get(UNKNOWN_GENRE).unwrap().len(), 2);
    }

    #[test]
    fn test_genre_threshold() {
        let mut tracks = Vec::new();
        for i in 0..4 {
            tracks.push(Track::new("A", format!("{}", i)).with_genre("Jazz"));
        }
        for i in 0..5 {
            tracks.push(Track::new("A", format!("{}", i)).with_genre("Rock"));
        }

        let playlists = genre_playlists(group_by_genre(&tracks), DEFAULT_MIN_GENRE_TRACKS);
        assert_eq!(playlists.len(), 1);
        assert_eq!(playlists[0].title, "Genre: Rock");
        assert_eq!(playlists[0].file_name, "Genre_Rock.m3u");
    }

    #[test]
    fn test_planned_playlists_are_sorted() {
        let tracks = vec![
            Track::new("B", "a").with_bpm(90),
            Track::new("A", "z").with_bpm(90),
            Track::new("A", "b").with_bpm(90),
        ];
        let playlists = tempo_playlists(group_by_tempo(&tracks, &default_tempo_ranges()));
        let order: Vec<_> = playlists[0].tracks.iter().map(|t| t.display_name()).collect();
        assert_eq!(order, vec!["A - b", "A - z", "B - a"]);
        assert_eq!(playlists[0].file_name, "BPM_Moderate_81-100_BPM.m3u");
    }

    #[test]
    fn test_file_names() {
        assert_eq!(tempo_file_name("Slow (0-80 BPM)"), "BPM_Slow_0-80_BPM.m3u");
        assert_eq!(tempo_file_name(NO_TEMPO_LABEL), "BPM_No_BPM_Data.m3u");
        assert_eq!(genre_file_name("Hip-Hop/Rap"), "Genre_Hip-HopRap.m3u");
        assert_eq!(genre_file_name("R&B "), "Genre_RB.m3u");
    }

    #[test]
    fn test_grouping_mode() {
        assert!(GroupingMode::All.includes_tempo() && GroupingMode::All.includes_genre());
        assert!(!GroupingMode::Genre.includes_tempo());
        assert!(!GroupingMode::Tempo.includes_genre());
    }
}
