//! File and directory drivers
//!
//! Thin I/O layer around [`Abbreviator`]: read a script, abbreviate it,
//! write the result to a derived path and report how much was saved.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, warn};
use walkdir::{DirEntry, WalkDir};

use crate::core::abbreviator::{Abbreviator, DebugInfo};
use crate::core::error::{AbbrevError, Result, ResultExt};
use crate::core::models::AbbreviationConfig;
use crate::core::syntax::char_len;

/// Suffix inserted before the extension of sibling outputs
pub const ABBREVIATED_SUFFIX: &str = ".abbreviated";

/// Directory names never descended into by [`abbreviate_tree`]
const SKIPPED_DIRS: &[&str] = &["__pycache__", "venv", "env", "site-packages", "node_modules"];

/// Where abbreviated files are written
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputLayout {
    /// `<stem>.abbreviated.<ext>` next to the input
    Sibling,
    /// `<dir>/<stem>_depth<D>_<unix-ts>.<ext>`
    Directory(PathBuf),
}

impl OutputLayout {
    fn nested(&self, relative_parent: &Path) -> Self {
        match self {
            OutputLayout::Sibling => OutputLayout::Sibling,
            OutputLayout::Directory(dir) => OutputLayout::Directory(dir.join(relative_parent)),
        }
    }
}

/// Derive the output path for `input`
pub fn output_path_for(input: &Path, layout: &OutputLayout, max_depth: i32, timestamp: i64) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = input
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    match layout {
        OutputLayout::Sibling => {
            input.with_file_name(format!("{stem}{ABBREVIATED_SUFFIX}{ext}"))
        }
        OutputLayout::Directory(dir) => {
            dir.join(format!("{stem}_depth{max_depth}_{timestamp}{ext}"))
        }
    }
}

/// Size statistics for one abbreviated file
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub original_chars: usize,
    pub abbreviated_chars: usize,
    pub chars_saved: i64,
    pub percent_saved: f64,
    /// Set when the file was copied through unchanged because of an error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub soft_failure: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<DebugInfo>,
}

/// Percentage of `original` characters saved, 0 for empty input
pub fn percent_saved(original_chars: usize, chars_saved: i64) -> f64 {
    if original_chars == 0 {
        return 0.0;
    }
    chars_saved as f64 / original_chars as f64 * 100.0
}

/// Abbreviate one script and write the result according to `layout`
pub fn abbreviate_file(
    path: &Path,
    config: &AbbreviationConfig,
    layout: &OutputLayout,
) -> Result<FileReport> {
    let abbreviator = Abbreviator::new(config.clone());
    let timestamp = chrono::Utc::now().timestamp();
    abbreviate_with(&abbreviator, path, layout, timestamp)
}

fn abbreviate_with(
    abbreviator: &Abbreviator,
    path: &Path,
    layout: &OutputLayout,
    timestamp: i64,
) -> Result<FileReport> {
    if !path.is_file() {
        return Err(AbbrevError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let source = std::fs::read_to_string(path)
        .map_err(AbbrevError::from)
        .context(format!("reading {}", path.display()))?;

    let result = abbreviator.abbreviate(&source);
    let output_path = output_path_for(path, layout, abbreviator.config().max_depth, timestamp);

    if let Some(parent) = output_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&output_path, &result.code)
        .map_err(AbbrevError::from)
        .context(format!("writing {}", output_path.display()))?;

    let original_chars = char_len(&source);
    let abbreviated_chars = char_len(&result.code);
    let chars_saved = original_chars as i64 - abbreviated_chars as i64;

    info!(
        input = %path.display(),
        output = %output_path.display(),
        original_chars,
        chars_saved,
        "abbreviated file"
    );

    Ok(FileReport {
        input_path: path.to_path_buf(),
        output_path,
        original_chars,
        abbreviated_chars,
        chars_saved,
        percent_saved: percent_saved(original_chars, chars_saved),
        soft_failure: result.soft_failure.map(|e| e.to_string()),
        debug: result.debug,
    })
}

/// A file the batch driver could not process
#[derive(Debug, Clone, Serialize)]
pub struct BatchFailure {
    pub path: PathBuf,
    pub error: String,
}

/// Outcome of [`abbreviate_tree`]
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub reports: Vec<FileReport>,
    pub failures: Vec<BatchFailure>,
}

impl BatchReport {
    pub fn total_original_chars(&self) -> usize {
        self.reports.iter().map(|r| r.original_chars).sum()
    }

    pub fn total_chars_saved(&self) -> i64 {
        self.reports.iter().map(|r| r.chars_saved).sum()
    }

    pub fn percent_saved(&self) -> f64 {
        percent_saved(self.total_original_chars(), self.total_chars_saved())
    }
}

/// Whether `path` is a Python script that has not already been abbreviated
pub fn is_candidate_script(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    name.ends_with(".py") && !name.ends_with(&format!("{ABBREVIATED_SUFFIX}.py"))
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || SKIPPED_DIRS.contains(&&*name)
}

/// Whether `entry` is the directory outputs are written to
fn is_output_dir(entry: &DirEntry, output_dir: Option<&Path>) -> bool {
    let Some(output_dir) = output_dir else {
        return false;
    };
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .path()
            .canonicalize()
            .map(|path| path == output_dir)
            .unwrap_or(false)
}

/// Abbreviate every script under `root`
///
/// Per-file failures are logged and collected; only an unreadable root is
/// an error. With [`OutputLayout::Directory`] the input tree's layout is
/// mirrored under the output directory.
pub fn abbreviate_tree(
    root: &Path,
    config: &AbbreviationConfig,
    layout: &OutputLayout,
) -> Result<BatchReport> {
    if !root.is_dir() {
        return Err(AbbrevError::FileNotFound {
            path: root.to_path_buf(),
        });
    }

    let abbreviator = Abbreviator::new(config.clone());
    let timestamp = chrono::Utc::now().timestamp();
    let mut batch = BatchReport::default();

    let output_dir = match layout {
        OutputLayout::Directory(dir) => dir.canonicalize().ok(),
        OutputLayout::Sibling => None,
    };

    let mut scripts = Vec::new();
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_skipped_dir(e) && !is_output_dir(e, output_dir.as_deref()));
    for entry in walker {
        match entry {
            Ok(entry) if entry.file_type().is_file() && is_candidate_script(entry.path()) => {
                scripts.push(entry.into_path());
            }
            Ok(_) => {}
            Err(err) => {
                warn!(error = %err, "skipping unreadable entry");
                batch.failures.push(BatchFailure {
                    path: err.path().map(Path::to_path_buf).unwrap_or_default(),
                    error: err.to_string(),
                });
            }
        }
    }

    // collected up front so outputs written into the tree are never revisited
    for path in scripts {
        let relative_parent = path
            .parent()
            .and_then(|p| p.strip_prefix(root).ok())
            .unwrap_or_else(|| Path::new(""));

        match abbreviate_with(&abbreviator, &path, &layout.nested(relative_parent), timestamp) {
            Ok(report) => batch.reports.push(report),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "failed to abbreviate");
                batch.failures.push(BatchFailure {
                    path,
                    error: err.to_string(),
                });
            }
        }
    }

    info!(
        files = batch.reports.len(),
        failures = batch.failures.len(),
        chars_saved = batch.total_chars_saved(),
        "batch complete"
    );

    Ok(batch)
}
