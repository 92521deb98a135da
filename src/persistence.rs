//! Persistence layer for saving/loading tagged chunk records.
//!
//! Supports pretty JSON, JSON Lines (one record per line) and bincode.

use crate::error::{Result, TaggerError};
use crate::record::TaggedChunk;
use std::fs;
use std::path::Path;

/// Default path for pipeline output.
pub const DEFAULT_RECORDS_PATH: &str = "data/tagged_chunks.jsonl";

/// Save format for record files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveFormat {
    /// A single pretty-printed JSON array.
    Json,
    /// One JSON object per line.
    JsonLines,
    /// Bincode format (binary, compact).
    Bincode,
}

impl SaveFormat {
    /// Determine format from file extension.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => SaveFormat::Json,
            Some("bin") | Some("bincode") => SaveFormat::Bincode,
            _ => SaveFormat::JsonLines, // Default to JSON Lines
        }
    }
}

/// Save records to a file, picking the format from the extension.
pub fn save_records(records: &[TaggedChunk], path: &Path) -> Result<()> {
    let format = SaveFormat::from_path(path);
    save_records_with_format(records, path, format)
}

/// Save records with specific format.
pub fn save_records_with_format(
    records: &[TaggedChunk],
    path: &Path,
    format: SaveFormat,
) -> Result<()> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| TaggerError::io(parent, e))?;
        }
    }

    let data = match format {
        SaveFormat::Json => serde_json::to_string_pretty(records)
            .map_err(|e| TaggerError::Serialization(e.to_string()))?
            .into_bytes(),
        SaveFormat::JsonLines => {
            let mut out = String::new();
            for record in records {
                let line = serde_json::to_string(record)
                    .map_err(|e| TaggerError::Serialization(e.to_string()))?;
                out.push_str(&line);
                out.push('\n');
            }
            out.into_bytes()
        }
        SaveFormat::Bincode => {
            let config = bincode::config::standard();
            bincode::encode_to_vec(records, config)
                .map_err(|e| TaggerError::Serialization(e.to_string()))?
        }
    };

    fs::write(path, &data).map_err(|e| TaggerError::io(path, e))?;
    tracing::debug!(path = %path.display(), records = records.len(), ?format, "records saved");

    Ok(())
}

/// Load records from a file.
pub fn load_records(path: &Path) -> Result<Vec<TaggedChunk>> {
    if !path.exists() {
        return Err(TaggerError::RecordsNotFound(path.to_path_buf()));
    }

    let format = SaveFormat::from_path(path);
    load_records_with_format(path, format)
}

/// Load records with specific format.
pub fn load_records_with_format(path: &Path, format: SaveFormat) -> Result<Vec<TaggedChunk>> {
    let data = fs::read(path).map_err(|e| TaggerError::io(path, e))?;

    let records = match format {
        SaveFormat::Json => serde_json::from_slice(&data)
            .map_err(|e| TaggerError::Serialization(e.to_string()))?,
        SaveFormat::JsonLines => {
            let text =
                String::from_utf8(data).map_err(|e| TaggerError::Serialization(e.to_string()))?;
            text.lines()
                .enumerate()
                .filter(|(_, line)| !line.trim().is_empty())
                .map(|(i, line)| {
                    serde_json::from_str(line).map_err(|e| {
                        TaggerError::Serialization(format!("line {}: {}", i + 1, e))
                    })
                })
                .collect::<Result<Vec<_>>>()?
        }
        SaveFormat::Bincode => {
            let config = bincode::config::standard();
            let (records, _): (Vec<TaggedChunk>, usize) =
                bincode::decode_from_slice(&data, config)
                    .map_err(|e| TaggerError::Serialization(e.to_string()))?;
            records
        }
    };

    Ok(records)
}

/// Check if a records file exists at the given path.
pub fn records_exist(path: &Path) -> bool {
    path.exists() && path.is_file()
}

/// Get the size of a records file in bytes.
pub fn records_size(path: &Path) -> Result<u64> {
    let metadata = fs::metadata(path).map_err(|e| TaggerError::io(path, e))?;
    Ok(metadata.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::collections::BTreeSet;
    use tempfile::TempDir;

    fn create_test_records() -> Vec<TaggedChunk> {
        let date = NaiveDate::from_ymd_opt(2025, 5, 5).unwrap();
        let music: BTreeSet<String> = ["music".to_string(), "festival".to_string()].into();
        let none: BTreeSet<String> = ["uncategorized".to_string()].into();
        vec![
            TaggedChunk::new("Jazz festival in the park", music, "sfchronicle.com", date),
            TaggedChunk::new("Parking info", none, "sfchronicle.com", date),
        ]
    }

    #[test]
    fn test_save_and_load_jsonl() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.jsonl");

        let original = create_test_records();
        save_records(&original, &path).unwrap();
        assert!(records_exist(&path));

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);

        assert_eq!(load_records(&path).unwrap(), original);
    }

    #[test]
    fn test_save_and_load_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.json");

        let original = create_test_records();
        save_records(&original, &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.trim_start().starts_with('['));
        assert_eq!(load_records(&path).unwrap(), original);
    }

    #[test]
    fn test_save_and_load_bincode() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.bin");

        let original = create_test_records();
        save_records(&original, &path).unwrap();

        assert_eq!(load_records(&path).unwrap(), original);
    }

    #[test]
    fn test_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/deeper/out.jsonl");

        save_records(&create_test_records(), &path).unwrap();
        assert!(records_size(&path).unwrap() > 0);
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(SaveFormat::from_path(Path::new("a.json")), SaveFormat::Json);
        assert_eq!(SaveFormat::from_path(Path::new("a.jsonl")), SaveFormat::JsonLines);
        assert_eq!(SaveFormat::from_path(Path::new("a.bin")), SaveFormat::Bincode);
        assert_eq!(SaveFormat::from_path(Path::new("a.bincode")), SaveFormat::Bincode);
        assert_eq!(SaveFormat::from_path(Path::new("a")), SaveFormat::JsonLines);
    }

    #[test]
    fn test_load_nonexistent() {
        let result = load_records(Path::new("/nonexistent/out.jsonl"));
        assert!(matches!(result, Err(TaggerError::RecordsNotFound(_))));
    }

    #[test]
    fn test_bad_jsonl_line_reports_line_number() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.jsonl");
        fs::write(&path, "\n{not json}\n").unwrap();

        let err = load_records(&path).unwrap_err().to_string();
        assert!(err.contains("line 2"), "{err}");
    }
}
