//! Reading playlist files back for repair and shuffling

use super::{EXTINF_PREFIX, PLAYLIST_PREFIX};
use crate::error::{PlaysortError, Result};
use crate::export::write_atomic;
use std::path::Path;
use tracing::debug;

/// One playlist entry: the info line and the line that follows it
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct M3uEntry {
    pub info: String,
    /// Absent only for an info line at the very end of the file
    pub path: Option<String>,
}

impl M3uEntry {
    /// The "Artist - Title" text after the first comma of the info line
    pub fn display(&self) -> Option<&str> {
        self.info.split_once(',').map(|(_, display)| display.trim())
    }
}

/// A parsed playlist: header lines followed by entries
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct M3uDocument {
    /// Every line before the first info line
    pub header: Vec<String>,
    pub entries: Vec<M3uEntry>,
}

fn is_info_line(line: &str) -> bool {
    line.trim_start().starts_with(EXTINF_PREFIX)
}

impl M3uDocument {
    pub fn parse(text: &str) -> Self {
        let mut lines = text.lines().peekable();

        let mut header = Vec::new();
        while let Some(line) = lines.next_if(|l| !is_info_line(l)) {
            header.push(line.to_string());
        }

        let mut entries = Vec::new();
        while let Some(line) = lines.next() {
            if is_info_line(line) {
                entries.push(M3uEntry {
                    info: line.to_string(),
                    path: lines.next().map(str::to_string),
                });
            } else {
                debug!("Dropping stray playlist line: {}", line);
            }
        }

        Self { header, entries }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| PlaysortError::input_error(path, e))?;
        Ok(Self::parse(&text))
    }

    /// Title from the `#PLAYLIST:` header line, if any
    pub fn title(&self) -> Option<&str> {
        self.header
            .iter()
            .find_map(|l| l.trim().strip_prefix(PLAYLIST_PREFIX))
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        for line in &self.header {
            out.push_str(line);
            out.push('\n');
        }
        for entry in &self.entries {
            out.push_str(&entry.info);
            out.push('\n');
            if let Some(path) = &entry.path {
                out.push_str(path);
                out.push('\n');
            }
        }
        out
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        write_atomic(path, &self.render())
    }
}
