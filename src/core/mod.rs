//! Core module for the depth abbreviator
//!
//! # Architecture
//!
//! - `models`: Configuration (AbbreviationConfig, ConfigFile)
//! - `error`: Error types using thiserror
//! - `syntax`: Tree-sitter Python parser and node helpers
//! - `abbreviator`: Traversal, placeholder building and the size policy
//! - `files`: Single-file and directory drivers
//! - `journal`: Persistent run journal

pub mod abbreviator;
pub mod error;
pub mod files;
pub mod journal;
pub mod models;
pub mod syntax;

// Re-export commonly used types
pub use abbreviator::{abbreviate_code, Abbreviation, Abbreviator, DebugInfo};
pub use error::{AbbrevError, Result, ResultExt};
pub use files::{abbreviate_file, abbreviate_tree, BatchReport, FileReport, OutputLayout};
pub use journal::{RunJournal, RunRecord};
pub use models::{AbbreviationConfig, ConfigFile, DEFAULT_MAX_DEPTH, DEFAULT_PRESERVE_LINES};
