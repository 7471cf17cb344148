//! Run journal
//!
//! Append-only record of abbreviation runs: which file, its identity at the
//! time (size, MD5, mtime), the parameters used and what was saved. The
//! journal is purely informational; nothing reads it back to make decisions.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::error::{AbbrevError, Result, ResultExt};
use crate::core::files::FileReport;
use crate::core::models::AbbreviationConfig;

/// Value of [`RunRecord::analysis_type`] for abbreviation runs
pub const ANALYSIS_TYPE: &str = "code_abbreviation";

/// Current journal format version
pub const JOURNAL_VERSION: u32 = 1;

/// One abbreviated file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub file_path: String,
    pub file_size: u64,
    pub file_md5: String,
    /// RFC 3339 modification time of the input
    pub modified_date: String,
    /// RFC 3339 time the record was made
    pub analysis_date: String,
    pub analysis_type: String,
    pub parameters: serde_json::Value,
    pub output_path: String,
    pub characters_saved: i64,
    pub percent_saved: f64,
}

impl RunRecord {
    /// Build a record for `report`, reading the input's identity from disk
    pub fn from_report(report: &FileReport, config: &AbbreviationConfig) -> Result<Self> {
        let path = &report.input_path;
        let metadata = std::fs::metadata(path)
            .map_err(AbbrevError::from)
            .context(format!("reading metadata of {}", path.display()))?;
        let bytes = std::fs::read(path)?;

        let modified: chrono::DateTime<chrono::Local> = metadata.modified()?.into();

        Ok(Self {
            file_path: path.display().to_string(),
            file_size: metadata.len(),
            file_md5: crate::calculate_md5(&bytes),
            modified_date: modified.to_rfc3339(),
            analysis_date: chrono::Local::now().to_rfc3339(),
            analysis_type: ANALYSIS_TYPE.to_string(),
            parameters: config.to_parameters(),
            output_path: report.output_path.display().to_string(),
            characters_saved: report.chars_saved,
            percent_saved: report.percent_saved,
        })
    }
}

/// Persistent list of [`RunRecord`]s stored as one JSON document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunJournal {
    pub version: u32,
    pub records: Vec<RunRecord>,
}

impl Default for RunJournal {
    fn default() -> Self {
        Self {
            version: JOURNAL_VERSION,
            records: Vec::new(),
        }
    }
}

impl RunJournal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, record: RunRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records for one input file, oldest first
    pub fn records_for<'a>(&'a self, file_path: &'a str) -> impl Iterator<Item = &'a RunRecord> {
        self.records.iter().filter(move |r| r.file_path == file_path)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load from file path
    ///
    /// A missing or malformed journal yields an empty one.
    pub fn load_from_file(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => Self::from_json(&content).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    /// Save to file path, creating parent directories
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Default journal location for a project
    pub fn default_path(project_root: &Path) -> PathBuf {
        project_root.join(".abbrev").join("journal.json")
    }
}
