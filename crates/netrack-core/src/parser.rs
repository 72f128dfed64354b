//! Record file parser.
//!
//! Loads exam records from JSON or TOML files and directories, and lints
//! them without failing.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::model::ExamRecord;
use crate::validate::validate_record;

/// Supported record file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordFormat {
    Json,
    Toml,
}

impl RecordFormat {
    /// Guess the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "json" => Some(RecordFormat::Json),
            "toml" => Some(RecordFormat::Toml),
            _ => None,
        }
    }
}

/// `{ "exams": [...] }` wrapper used by both formats.
#[derive(Debug, Deserialize)]
struct RecordFile {
    #[serde(default)]
    exams: Vec<ExamRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JsonRecords {
    Wrapped(RecordFile),
    Bare(Vec<ExamRecord>),
}

/// Parse a single record file.
pub fn parse_record_file(path: &Path) -> Result<Vec<ExamRecord>> {
    let format = RecordFormat::from_path(path)
        .with_context(|| format!("unsupported record file: {}", path.display()))?;
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read record file: {}", path.display()))?;

    parse_records_str(&content, format, path)
}

/// Parse records from a string (useful for testing).
pub fn parse_records_str(
    content: &str,
    format: RecordFormat,
    source_path: &Path,
) -> Result<Vec<ExamRecord>> {
    match format {
        RecordFormat::Json => {
            let parsed: JsonRecords = serde_json::from_str(content)
                .with_context(|| format!("failed to parse JSON: {}", source_path.display()))?;
            Ok(match parsed {
                JsonRecords::Wrapped(file) => file.exams,
                JsonRecords::Bare(records) => records,
            })
        }
        RecordFormat::Toml => {
            let parsed: RecordFile = toml::from_str(content)
                .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;
            Ok(parsed.exams)
        }
    }
}

/// Recursively load all `.json` and `.toml` record files from a directory.
pub fn load_record_directory(dir: &Path) -> Result<Vec<ExamRecord>> {
    let mut records = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut entries: Vec<_> = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .collect::<std::io::Result<_>>()?;
    entries.sort_by_key(|e| e.path());

    for entry in entries {
        let path = entry.path();

        if path.is_dir() {
            records.extend(load_record_directory(&path)?);
        } else if RecordFormat::from_path(&path).is_some() {
            match parse_record_file(&path) {
                Ok(parsed) => records.extend(parsed),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    Ok(records)
}

/// Load a file or a directory of record files.
pub fn load_records(path: &Path) -> Result<Vec<ExamRecord>> {
    if path.is_dir() {
        load_record_directory(path)
    } else {
        parse_record_file(path)
    }
}

/// A warning from record validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The record ID.
    pub record_id: String,
    /// Warning message.
    pub message: String,
}

/// Lint a batch of records, reporting every problem instead of stopping.
pub fn validate_records(records: &[ExamRecord], today: NaiveDate) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    let mut seen_ids = HashSet::new();
    for record in records {
        if !seen_ids.insert(record.id.as_str()) {
            warnings.push(ValidationWarning {
                record_id: record.id.clone(),
                message: format!("duplicate record ID: {}", record.id),
            });
        }
    }

    for record in records {
        if let Err(e) = validate_record(record, today) {
            warnings.push(ValidationWarning {
                record_id: record.id.clone(),
                message: e.to_string(),
            });
        }
    }

    warnings
}
