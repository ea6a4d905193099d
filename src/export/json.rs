//! JSON export of the library report for other tools

use super::write_atomic;
use crate::error::{PlaysortError, Result};
use crate::report::LibraryReport;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// JSON output schema version
const SCHEMA_VERSION: &str = "1.0";

/// File name of the report inside the output directory
pub const REPORT_FILE_NAME: &str = "library_report.json";

/// Top-level JSON output structure
#[derive(Debug, Serialize, Deserialize)]
pub struct ReportJson {
    /// Schema version for forward compatibility
    pub version: String,
    pub metadata: ExportMetadata,
    pub report: LibraryReport,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExportMetadata {
    /// playsort version that generated this file
    pub generator_version: String,
    pub exported_at: String,
    /// Library file the report describes
    pub source: String,
}

/// Write a library report to a JSON file
pub fn write_report_json(report: &LibraryReport, source: &Path, output_path: &Path) -> Result<()> {
    let output = ReportJson {
        version: SCHEMA_VERSION.to_string(),
        metadata: ExportMetadata {
            generator_version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: chrono::Utc::now().to_rfc3339(),
            source: source.to_string_lossy().to_string(),
        },
        report: report.clone(),
    };

    let json = serde_json::to_string_pretty(&output).map_err(|e| PlaysortError::OutputError {
        path: output_path.to_path_buf(),
        reason: e.to_string(),
    })?;
    write_atomic(output_path, &json)?;

    info!("Wrote library report to {}", output_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::default_tempo_ranges;
    use crate::types::Track;

    #[test]
    fn test_report_json_structure() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join(REPORT_FILE_NAME);
        let tracks = vec![Track::new("A", "X").with_bpm(120).with_location("file:///x.mp3")];
        let report = LibraryReport::build(&tracks, &default_tempo_ranges());

        write_report_json(&report, Path::new("Library.xml"), &path).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["version"], "1.0");
        assert_eq!(json["metadata"]["source"], "Library.xml");
        assert_eq!(json["report"]["total_tracks"], 1);
        assert_eq!(json["report"]["tracks_with_file_urls"], 1);
        assert_eq!(json["report"]["tempo_stats"]["max"], 120);
    }
}
