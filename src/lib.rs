//! depth-abbreviator - shrink Python sources by eliding deeply nested bodies
//!
//! Block-bearing statements (functions, classes, `if`, loops, `try`, `with`)
//! nested deeper than a configured level have their bodies replaced by a
//! short placeholder: a couple of preview comments, `# ...` and `pass`. A
//! statement is rewritten only when that strictly reduces its size, and the
//! result always parses with the same grammar.
//!
//! # Architecture
//!
//! This crate follows the "Library-First" pattern:
//! - **lib.rs** (this file): re-exports and small helpers
//! - **core/**: parsing, traversal, file drivers and the run journal
//! - **bin/abbrev.rs**: thin CLI wrapper that calls the library
//!
//! # Example
//!
//! ```rust
//! use depth_abbreviator::{abbreviate_code, AbbreviationConfig};
//!
//! let config = AbbreviationConfig::new(40).with_max_depth(0);
//! let source = "def f():\n    x = 1\n    return x\n";
//! assert_eq!(abbreviate_code(source, &config.with_preserve_lines(0)), "def f():\n    # ...\n    pass\n");
//! ```

pub mod core;

pub use crate::core::abbreviator::{
    abbreviate_code, Abbreviation, Abbreviator, DebugInfo, TraversalContext,
};
pub use crate::core::error::{AbbrevError, Result};
pub use crate::core::files::{
    abbreviate_file, abbreviate_tree, BatchReport, FileReport, OutputLayout,
};
pub use crate::core::journal::{RunJournal, RunRecord};
pub use crate::core::models::{AbbreviationConfig, ConfigFile};
pub use crate::core::syntax::{BlockKind, PythonParser};

/// Library version, as recorded by the CLI
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Returns the version of the depth-abbreviator library
pub fn version() -> &'static str {
    VERSION
}

/// Calculate MD5 checksum of content
///
/// # Returns
///
/// * MD5 checksum as hexadecimal string
pub fn calculate_md5(content: &[u8]) -> String {
    format!("{:x}", md5::compute(content))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert_eq!(version(), env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_md5_calculation() {
        let md5 = calculate_md5(b"Hello, world!");
        assert_eq!(md5, "6cd3556deb0da54bca060b4c39479839");
    }

    #[test]
    fn test_reexports_compose() {
        let config = AbbreviationConfig::new(30).with_max_depth(0);
        let result = Abbreviator::new(config).abbreviate("");
        assert_eq!(result.code, "");
        assert!(!result.is_soft_failure());
    }
}
