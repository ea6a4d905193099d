//! iTunes / Music `Library.xml` parsing
//!
//! The library is an Apple property list: a root `<dict>` whose `Tracks` key
//! maps track IDs to per-track dictionaries. Values are read into a small
//! tree and the track dictionaries are then mapped to [`Track`]s.

use crate::types::Track;
use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::{debug, warn};

/// Parse error with a human-readable reason
pub type PlistResult<T> = std::result::Result<T, String>;

/// A property list value
///
/// Scalars (`string`, `integer`, `date`, `true`, ...) keep their text form;
/// callers convert on demand.
#[derive(Debug, Clone, PartialEq)]
pub enum PlistValue {
    Scalar(String),
    Array(Vec<PlistValue>),
    Dict(Vec<(String, PlistValue)>),
}

impl PlistValue {
    /// Look up a key in a dictionary value
    pub fn get(&self, key: &str) -> Option<&PlistValue> {
        match self {
            PlistValue::Dict(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            PlistValue::Scalar(text) => Some(text),
            _ => None,
        }
    }
}

/// Parse library XML text into tracks
///
/// A library without a `Tracks` key yields no tracks.
pub fn parse_tracks(xml: &str) -> PlistResult<Vec<Track>> {
    let root = parse_document(xml)?;

    let Some(PlistValue::Dict(entries)) = root.get("Tracks") else {
        warn!("No tracks found in library");
        return Ok(Vec::new());
    };

    let mut tracks = Vec::with_capacity(entries.len());
    for (id, value) in entries {
        match track_from_dict(value) {
            Some(track) => tracks.push(track),
            None => debug!("Dropping track {} without name or artist", id),
        }
    }

    Ok(tracks)
}

/// Map one track dictionary to a [`Track`]
///
/// Returns `None` when the name or the artist is missing or empty.
fn track_from_dict(value: &PlistValue) -> Option<Track> {
    let PlistValue::Dict(fields) = value else {
        return None;
    };

    let mut track = Track::default();
    for (key, value) in fields {
        let text = value.as_text().unwrap_or_default();
        match key.as_str() {
            "Name" => track.title = text.to_string(),
            "Artist" => track.artist = text.to_string(),
            "Album" => track.album = Some(text.to_string()),
            "Genre" => track.genre = Some(text.to_string()),
            "BPM" => track.bpm = parse_number(text),
            "Total Time" => track.duration_ms = parse_number(text),
            "Location" => track.location = text.to_string(),
            _ => {}
        }
    }

    if track.title.is_empty() || track.artist.is_empty() {
        return None;
    }
    Some(track)
}

/// Absent or non-numeric values count as 0
fn parse_number<T: std::str::FromStr + Default>(text: &str) -> T {
    text.trim().parse().unwrap_or_default()
}

/// Parse the document and return the root `<dict>`
pub fn parse_document(xml: &str) -> PlistResult<PlistValue> {
    let mut parser = PlistParser::new(xml);
    loop {
        match parser.next()? {
            Event::Start(e) => {
                let name = e.name().as_ref().to_vec();
                // <plist> wraps the root value
                if name == b"plist" {
                    continue;
                }
                return match parser.read_value(&name)? {
                    dict @ PlistValue::Dict(_) => Ok(dict),
                    _ => Err("root element is not a <dict>".to_string()),
                };
            }
            Event::Empty(e) if e.name().as_ref() == b"dict" => return Ok(PlistValue::Dict(Vec::new())),
            Event::Eof => return Err("no root <dict> found".to_string()),
            _ => {}
        }
    }
}

struct PlistParser<'a> {
    reader: Reader<&'a [u8]>,
}

impl<'a> PlistParser<'a> {
    fn new(xml: &'a str) -> Self {
        // Whitespace between elements arrives as text events and is skipped;
        // string values keep their whitespace
        Self {
            reader: Reader::from_str(xml),
        }
    }

    fn next(&mut self) -> PlistResult<Event<'a>> {
        self.reader.read_event().map_err(|e| {
            format!("XML error at byte {}: {}", self.reader.buffer_position(), e)
        })
    }

    /// Read the value whose start tag `tag` was just consumed
    fn read_value(&mut self, tag: &[u8]) -> PlistResult<PlistValue> {
        match tag {
            b"dict" => self.read_dict(),
            b"array" => self.read_array(),
            _ => self.read_text(tag).map(PlistValue::Scalar),
        }
    }

    fn read_dict(&mut self) -> PlistResult<PlistValue> {
        let mut entries = Vec::new();
        let mut pending_key: Option<String> = None;

        loop {
            let value = match self.next()? {
                Event::Start(e) => {
                    let name = e.name().as_ref().to_vec();
                    if name == b"key" {
                        pending_key = Some(self.read_text(&name)?.trim().to_string());
                        continue;
                    }
                    self.read_value(&name)?
                }
                Event::Empty(e) => {
                    if e.name().as_ref() == b"key" {
                        pending_key = Some(String::new());
                        continue;
                    }
                    empty_value(e.name().as_ref())
                }
                Event::End(_) => return Ok(PlistValue::Dict(entries)),
                Event::Eof => return Err("unexpected end of file inside <dict>".to_string()),
                _ => continue,
            };

            match pending_key.take() {
                Some(key) => entries.push((key, value)),
                None => debug!("Ignoring <dict> value without a key"),
            }
        }
    }

    fn read_array(&mut self) -> PlistResult<PlistValue> {
        let mut items = Vec::new();
        loop {
            match self.next()? {
                Event::Start(e) => {
                    let name = e.name().as_ref().to_vec();
                    items.push(self.read_value(&name)?);
                }
                Event::Empty(e) => items.push(empty_value(e.name().as_ref())),
                Event::End(_) => return Ok(PlistValue::Array(items)),
                Event::Eof => return Err("unexpected end of file inside <array>".to_string()),
                _ => {}
            }
        }
    }

    fn read_text(&mut self, tag: &[u8]) -> PlistResult<String> {
        let mut text = String::new();
        loop {
            match self.next()? {
                Event::Text(t) => {
                    let unescaped = t.unescape().map_err(|e| e.to_string())?;
                    text.push_str(&unescaped);
                }
                Event::CData(c) => text.push_str(&String::from_utf8_lossy(&c.into_inner())),
                Event::End(_) => return Ok(text),
                Event::Start(_) | Event::Empty(_) => {
                    return Err(format!(
                        "unexpected element inside <{}>",
                        String::from_utf8_lossy(tag)
                    ))
                }
                Event::Eof => {
                    return Err(format!(
                        "unexpected end of file inside <{}>",
                        String::from_utf8_lossy(tag)
                    ))
                }
                _ => {}
            }
        }
    }
}

/// Value of a self-closing element such as `<true/>` or `<string/>`
fn empty_value(tag: &[u8]) -> PlistValue {
    match tag {
        b"dict" => PlistValue::Dict(Vec::new()),
        b"array" => PlistValue::Array(Vec::new()),
        b"true" => PlistValue::Scalar("true".to_string()),
        b"false" => PlistValue::Scalar("false".to_string()),
        _ => PlistValue::Scalar(String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIBRARY: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
	<key>Major Version</key><integer>1</integer>
	<key>Show Content Ratings</key><true/>
	<key>Tracks</key>
	<dict>
		<key>101</key>
		<dict>
			<key>Track ID</key><integer>101</integer>
			<key>Name</key><string>Blue Monday</string>
			<key>Artist</key><string>New Order</string>
			<key>Album</key><string>Power, Corruption &#38; Lies</string>
			<key>Genre</key><string>Synth-pop</string>
			<key>BPM</key><integer>130</integer>
			<key>Total Time</key><integer>448000</integer>
			<key>Date Added</key><date>2020-01-01T00:00:00Z</date>
			<key>Compilation</key><true/>
			<key>Location</key><string>file:///Users/dj/Music/Blue%20Monday.mp3</string>
		</dict>
		<key>102</key>
		<dict>
			<key>Name</key><string>Untitled</string>
			<key>Total Time</key><integer>1000</integer>
		</dict>
		<key>103</key>
		<dict>
			<key>Name</key><string>Ceremony</string>
			<key>Artist</key><string>New Order &amp; Friends</string>
			<key>BPM</key><string>fast</string>
		</dict>
	</dict>
	<key>Playlists</key>
	<array>
		<dict><key>Name</key><string>Library</string><key>Master</key><true/></dict>
	</array>
</dict>
</plist>
"#;

    #[test]
    fn test_parse_tracks_extracts_known_fields() {
        let tracks = parse_tracks(LIBRARY).unwrap();
        assert_eq!(tracks.len(), 2);

        let first = &tracks[0];
        assert_eq!(first.title, "Blue Monday");
        assert_eq!(first.artist, "New Order");
        assert_eq!(first.album.as_deref(), Some("Power, Corruption & Lies"));
        assert_eq!(first.genre.as_deref(), Some("Synth-pop"));
        assert_eq!(first.bpm, 130);
        assert_eq!(first.duration_ms, 448_000);
        assert_eq!(first.location, "file:///Users/dj/Music/Blue%20Monday.mp3");
    }

    #[test]
    fn test_track_without_artist_is_dropped() {
        let tracks = parse_tracks(LIBRARY).unwrap();
        assert!(tracks.iter().all(|t| t.title != "Untitled"));
    }

    #[test]
    fn test_non_numeric_bpm_defaults_to_zero() {
        let tracks = parse_tracks(LIBRARY).unwrap();
        let ceremony = tracks.iter().find(|t| t.title == "Ceremony").unwrap();
        assert_eq!(ceremony.artist, "New Order & Friends");
        assert_eq!(ceremony.bpm, 0);
        assert_eq!(ceremony.duration_ms, 0);
        assert!(ceremony.genre.is_none());
    }

    #[test]
    fn test_string_values_keep_surrounding_whitespace() {
        let xml = r#"<plist version="1.0"><dict>
            <key> Tracks </key>
            <dict>
                <key>1</key>
                <dict>
                    <key>Name</key><string>Intro </string>
                    <key>Artist</key><string> Band</string>
                    <key>BPM</key><integer> 96 </integer>
                    <key>Location</key><string>/Music/Intro .mp3</string>
                </dict>
            </dict>
        </dict></plist>"#;
        let tracks = parse_tracks(xml).unwrap();
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].title, "Intro ");
        assert_eq!(tracks[0].artist, " Band");
        assert_eq!(tracks[0].bpm, 96);
        assert_eq!(tracks[0].location, "/Music/Intro .mp3");
    }

    #[test]
    fn test_library_without_tracks_key() {
        let xml = r#"<plist version="1.0"><dict><key>Major Version</key><integer>1</integer></dict></plist>"#;
        assert!(parse_tracks(xml).unwrap().is_empty());
    }

    #[test]
    fn test_truncated_document_is_an_error() {
        let xml = r#"<plist version="1.0"><dict><key>Tracks</key><dict>"#;
        assert!(parse_tracks(xml).is_err());
    }

    #[test]
    fn test_root_must_be_dict() {
        let xml = r#"<plist version="1.0"><array></array></plist>"#;
        assert!(parse_document(xml).is_err());
    }
}
