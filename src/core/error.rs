//! Error types for the abbreviator
//!
//! This module provides structured error handling using thiserror.
//! The abbreviation entry point never returns these to its caller; it
//! records them as a soft failure and hands back the original text. The
//! file and batch drivers propagate them normally.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for abbreviator operations
pub type Result<T> = std::result::Result<T, AbbrevError>;

/// Errors that can occur while abbreviating source text or files
#[derive(Error, Debug)]
pub enum AbbrevError {
    /// Input text is not valid for the grammar
    #[error("Parse error at line {line}, column {column}: {message}")]
    Parse {
        line: usize,
        column: usize,
        message: String,
    },

    /// Unexpected failure while rewriting a node
    #[error("Transform error: {message}")]
    Transform { message: String },

    /// Invalid configuration
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Tree-sitter could not be initialised for the grammar
    #[error("Tree-sitter initialization failed: {0}")]
    Initialization(String),

    /// IO error during file operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// File not found
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<AbbrevError>,
    },
}

impl AbbrevError {
    /// Wrap an error with additional context
    pub fn with_context(self, context: impl Into<String>) -> Self {
        AbbrevError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        AbbrevError::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create a transform error
    pub fn transform(message: impl Into<String>) -> Self {
        AbbrevError::Transform {
            message: message.into(),
        }
    }

    /// Whether this error came from parsing the input (possibly wrapped)
    pub fn is_parse_error(&self) -> bool {
        match self {
            AbbrevError::Parse { .. } => true,
            AbbrevError::WithContext { source, .. } => source.is_parse_error(),
            _ => false,
        }
    }
}

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, ctx: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(ctx))
    }
}
