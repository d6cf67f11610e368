//! Loading engagement records from JSON or YAML files.

use std::path::Path;

use crate::models::EngagementRecord;
use crate::GeoweaveError;

/// Supported record file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordFormat {
    Json,
    Yaml,
}

impl RecordFormat {
    /// Pick the format from the file extension.
    pub fn from_path(path: &Path) -> Result<Self, GeoweaveError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("json") => Ok(RecordFormat::Json),
            Some("yaml") | Some("yml") => Ok(RecordFormat::Yaml),
            _ => Err(GeoweaveError::Input(format!(
                "Unsupported record file '{}': expected .json, .yaml or .yml",
                path.display()
            ))),
        }
    }
}

/// Parse a list of records from a string.
pub fn parse_records(contents: &str, format: RecordFormat) -> Result<Vec<EngagementRecord>, GeoweaveError> {
    match format {
        RecordFormat::Json => Ok(serde_json::from_str(contents)?),
        RecordFormat::Yaml => Ok(serde_yaml_ng::from_str(contents)?),
    }
}

/// Read all records from `path`.
pub fn load_records(path: &Path) -> Result<Vec<EngagementRecord>, GeoweaveError> {
    let format = RecordFormat::from_path(path)?;
    let contents = std::fs::read_to_string(path).map_err(|e| {
        GeoweaveError::Input(format!("Failed to read {}: {}", path.display(), e))
    })?;
    let records = parse_records(&contents, format)?;
    tracing::info!(records = records.len(), path = %path.display(), "Loaded engagement records");
    Ok(records)
}
