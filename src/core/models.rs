//! Core data models for the abbreviator
//!
//! Configuration values and their JSON file representation.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::error::{AbbrevError, Result};

/// Default nesting depth preserved verbatim
pub const DEFAULT_MAX_DEPTH: i32 = 2;

/// Default number of preview lines kept per abbreviated body
pub const DEFAULT_PRESERVE_LINES: usize = 2;

/// Runtime configuration for one abbreviation call
///
/// `preserve_chars` has no default and must be chosen by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbbreviationConfig {
    /// Deepest nesting level left untouched; negative abbreviates everything
    #[serde(default = "default_max_depth")]
    pub max_depth: i32,
    /// Characters kept per preview line before `...` is appended
    pub preserve_chars: usize,
    /// Non-blank body lines echoed as preview comments
    #[serde(default = "default_preserve_lines")]
    pub preserve_lines: usize,
    /// Collect and return traversal diagnostics
    #[serde(default)]
    pub debug: bool,
}

fn default_max_depth() -> i32 {
    DEFAULT_MAX_DEPTH
}

fn default_preserve_lines() -> usize {
    DEFAULT_PRESERVE_LINES
}

impl AbbreviationConfig {
    /// Create a config with the given preview width and default everything else
    pub fn new(preserve_chars: usize) -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            preserve_chars,
            preserve_lines: DEFAULT_PRESERVE_LINES,
            debug: false,
        }
    }

    /// Set the maximum preserved depth
    pub fn with_max_depth(mut self, max_depth: i32) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set the number of preview lines
    pub fn with_preserve_lines(mut self, preserve_lines: usize) -> Self {
        self.preserve_lines = preserve_lines;
        self
    }

    /// Enable or disable debug collection
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Whether a node at `depth` may be abbreviated
    pub fn is_eligible(&self, depth: usize) -> bool {
        depth as i64 > i64::from(self.max_depth)
    }

    /// Parameters as recorded in the run journal
    pub fn to_parameters(&self) -> serde_json::Value {
        serde_json::json!({
            "depth": self.max_depth,
            "preserve_chars": self.preserve_chars,
            "preserve_lines": self.preserve_lines,
            "debug": self.debug,
        })
    }
}

/// Partial configuration, as read from a JSON file or command-line flags
///
/// Every field is optional; [`ConfigFile::resolve`] layers two of these and
/// produces a complete [`AbbreviationConfig`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub max_depth: Option<i32>,
    #[serde(default)]
    pub preserve_chars: Option<usize>,
    #[serde(default)]
    pub preserve_lines: Option<usize>,
    #[serde(default)]
    pub debug: Option<bool>,
}

impl ConfigFile {
    /// Load from JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load from file path
    ///
    /// Unlike the journal, an explicitly named config file must exist and be
    /// well-formed.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(AbbrevError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
            .map_err(|e| e.with_context(format!("reading config {}", path.display())))
    }

    /// Combine with overrides (overrides win) into a full config
    pub fn resolve(self, overrides: ConfigFile) -> Result<AbbreviationConfig> {
        let preserve_chars = overrides
            .preserve_chars
            .or(self.preserve_chars)
            .ok_or_else(|| {
                AbbrevError::invalid_config(
                    "preserve_chars must be set (no default is assumed)",
                )
            })?;

        Ok(AbbreviationConfig {
            max_depth: overrides
                .max_depth
                .or(self.max_depth)
                .unwrap_or(DEFAULT_MAX_DEPTH),
            preserve_chars,
            preserve_lines: overrides
                .preserve_lines
                .or(self.preserve_lines)
                .unwrap_or(DEFAULT_PRESERVE_LINES),
            debug: overrides.debug.or(self.debug).unwrap_or(false),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = AbbreviationConfig::new(30);
        assert_eq!(config.max_depth, 2);
        assert_eq!(config.preserve_chars, 30);
        assert_eq!(config.preserve_lines, 2);
        assert!(!config.debug);
    }

    #[test]
    fn test_eligibility_threshold() {
        let config = AbbreviationConfig::new(30).with_max_depth(2);
        assert!(!config.is_eligible(1));
        assert!(!config.is_eligible(2));
        assert!(config.is_eligible(3));
    }

    #[test]
    fn test_negative_depth_makes_everything_eligible() {
        let config = AbbreviationConfig::new(30).with_max_depth(-1);
        assert!(config.is_eligible(0));
        assert!(config.is_eligible(1));
    }

    #[test]
    fn test_config_json_requires_preserve_chars() {
        let ok: AbbreviationConfig = serde_json::from_str(r#"{"preserve_chars": 90}"#).unwrap();
        assert_eq!(ok.max_depth, 2);
        assert_eq!(ok.preserve_chars, 90);

        let missing = serde_json::from_str::<AbbreviationConfig>(r#"{"max_depth": 1}"#);
        assert!(missing.is_err());
    }

    #[test]
    fn test_resolve_overrides_win() {
        let file = ConfigFile::from_json(r#"{"max_depth": 4, "preserve_chars": 90}"#).unwrap();
        let overrides = ConfigFile {
            max_depth: Some(1),
            ..Default::default()
        };
        let config = file.resolve(overrides).unwrap();
        assert_eq!(config.max_depth, 1);
        assert_eq!(config.preserve_chars, 90);
        assert_eq!(config.preserve_lines, 2);
    }

    #[test]
    fn test_resolve_without_preserve_chars_fails() {
        let err = ConfigFile::default()
            .resolve(ConfigFile::default())
            .unwrap_err();
        assert!(matches!(err, AbbrevError::InvalidConfig { .. }));
    }

    #[test]
    fn test_load_missing_config_file() {
        let err = ConfigFile::load_from_file(Path::new("/nonexistent/abbrev.json")).unwrap_err();
        assert!(matches!(err, AbbrevError::FileNotFound { .. }));
    }

    #[test]
    fn test_parameters_shape() {
        let params = AbbreviationConfig::new(90).with_max_depth(3).to_parameters();
        assert_eq!(params["depth"], 3);
        assert_eq!(params["preserve_chars"], 90);
        assert_eq!(params["preserve_lines"], 2);
        assert_eq!(params["debug"], false);
    }
}
