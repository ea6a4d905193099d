//! Tab-separated playlist export parsing
//!
//! Music's "Export Playlist..." writes a header row naming the columns and
//! one row per track. Older exports are UTF-16 with a byte-order mark, newer
//! ones may be UTF-8, so the encoding is detected rather than assumed.

use crate::error::{PlaysortError, Result};
use crate::types::Track;
use std::path::Path;
use tracing::debug;

/// Options controlling which export rows become tracks
#[derive(Debug, Clone)]
pub struct TextExportOptions {
    /// Only rows whose location ends with this suffix are kept
    pub audio_extension: String,
    /// Prepended to the location column to form a usable path
    pub location_prefix: String,
}

impl Default for TextExportOptions {
    fn default() -> Self {
        Self {
            audio_extension: ".aif".to_string(),
            location_prefix: "/Volumes/".to_string(),
        }
    }
}

/// Text encodings recognized in exports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    Utf16Le,
    Utf16Be,
}

/// Read and parse one export file
pub fn read_export(path: &Path, options: &TextExportOptions) -> Result<Vec<Track>> {
    let bytes = std::fs::read(path).map_err(|e| PlaysortError::input_error(path, e))?;
    let (text, encoding) = decode(&bytes).map_err(|reason| PlaysortError::encoding(path, reason))?;
    debug!("Decoded {} as {:?}", path.display(), encoding);
    parse_export(&text, options, path)
}

/// Parse decoded export text
///
/// `source` is only used in error messages.
pub fn parse_export(text: &str, options: &TextExportOptions, source: &Path) -> Result<Vec<Track>> {
    let mut lines = split_rows(text);
    let Some(header_line) = lines.next() else {
        return Ok(Vec::new());
    };

    // Cells are trimmed individually so an empty first cell keeps its index
    let header: Vec<&str> = header_line.split('\t').map(str::trim).collect();
    let column = |name: &str| -> Result<usize> {
        header
            .iter()
            .position(|c| *c == name)
            .ok_or_else(|| PlaysortError::missing_column(source, name))
    };

    let name_idx = column("Name")?;
    let artist_idx = column("Artist")?;
    let location_idx = column("Location")?;
    let time_idx = column("Time")?;
    let album_idx = column("Album").ok();
    let genre_idx = column("Genre").ok();
    let bpm_idx = column("BPM").ok();

    let mut tracks = Vec::new();
    for line in lines {
        let fields: Vec<&str> = line.split('\t').collect();
        let Some(location) = fields.get(location_idx) else {
            continue;
        };
        if !location.ends_with(&options.audio_extension) {
            continue;
        }

        let field = |idx: usize| fields.get(idx).copied().unwrap_or_default();
        let optional = |idx: Option<usize>| {
            idx.and_then(|i| fields.get(i))
                .filter(|v| !v.trim().is_empty())
                .map(|v| v.to_string())
        };

        tracks.push(Track {
            artist: field(artist_idx).to_string(),
            title: field(name_idx).to_string(),
            album: optional(album_idx),
            genre: optional(genre_idx),
            bpm: bpm_idx.map(|i| field(i).trim().parse().unwrap_or(0)).unwrap_or(0),
            duration_ms: parse_time_secs(field(time_idx)).checked_mul(1000).unwrap_or(0),
            location: format!("{}{}", options.location_prefix, location),
        });
    }

    debug!("Parsed {} tracks from {}", tracks.len(), source.display());
    Ok(tracks)
}

/// Non-empty rows, ended by `\n`, `\r\n` or a lone `\r`
fn split_rows(text: &str) -> impl Iterator<Item = &str> {
    text.split(['\r', '\n']).filter(|line| !line.is_empty())
}

/// Parse a Time column: plain seconds, `m:ss` or `h:mm:ss`
///
/// Anything else, including values too large to hold, is 0.
pub fn parse_time_secs(value: &str) -> u64 {
    value
        .trim()
        .split(':')
        .try_fold(0u64, |acc, part| {
            let part = part.parse::<u64>().ok()?;
            acc.checked_mul(60)?.checked_add(part)
        })
        .unwrap_or(0)
}

/// Decode export bytes, detecting the encoding from the byte-order mark
pub fn decode(bytes: &[u8]) -> std::result::Result<(String, TextEncoding), String> {
    match bytes {
        [0xFF, 0xFE, rest @ ..] => decode_utf16(rest, u16::from_le_bytes).map(|s| (s, TextEncoding::Utf16Le)),
        [0xFE, 0xFF, rest @ ..] => decode_utf16(rest, u16::from_be_bytes).map(|s| (s, TextEncoding::Utf16Be)),
        [0xEF, 0xBB, 0xBF, rest @ ..] => std::str::from_utf8(rest)
            .map(|s| (s.to_string(), TextEncoding::Utf8))
            .map_err(|e| format!("invalid UTF-8: {}", e)),
        _ => match std::str::from_utf8(bytes) {
            Ok(s) => Ok((s.to_string(), TextEncoding::Utf8)),
            Err(e) if looks_like_utf16le(bytes) => {
                debug!("Not UTF-8 ({}), decoding as BOM-less UTF-16LE", e);
                decode_utf16(bytes, u16::from_le_bytes).map(|s| (s, TextEncoding::Utf16Le))
            }
            Err(e) => Err(format!("not UTF-8 and no UTF-16 byte-order mark: {}", e)),
        },
    }
}

fn decode_utf16(bytes: &[u8], to_unit: fn([u8; 2]) -> u16) -> std::result::Result<String, String> {
    if bytes.len() % 2 != 0 {
        return Err("odd number of bytes in UTF-16 text".to_string());
    }
    let units: Vec<u16> = bytes.chunks_exact(2).map(|c| to_unit([c[0], c[1]])).collect();
    String::from_utf16(&units).map_err(|e| format!("invalid UTF-16: {}", e))
}

/// ASCII-heavy UTF-16LE text has a NUL in most odd positions
fn looks_like_utf16le(bytes: &[u8]) -> bool {
    if bytes.len() < 2 || bytes.len() % 2 != 0 {
        return false;
    }
    let odd_nuls = bytes.iter().skip(1).step_by(2).filter(|b| **b == 0).count();
    odd_nuls * 2 >= bytes.len() / 2
}
