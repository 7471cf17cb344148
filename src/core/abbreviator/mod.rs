//! Depth-bounded abbreviation of nested Python blocks
//!
//! Bodies of block-bearing statements nested deeper than `max_depth` are
//! replaced by a short placeholder: a couple of preview comments, an
//! ellipsis comment and `pass`. A statement is only rewritten when that
//! makes it strictly shorter, and all of its suites (try handlers, loop
//! `else`, the `elif` chain) are rewritten together or not at all.
//!
//! ## Key Components
//!
//! - [`Abbreviator`]: entry point; parse, traverse, splice, re-validate
//! - [`TraversalContext`]: explicit depth / ancestor stack
//! - [`BlockReplacer`]: builds whole-statement candidates
//! - [`decide`]: the strict size-benefit test
//! - [`DebugInfo`]: optional statistics, never affects output
//!
//! ## Example
//!
//! ```rust
//! use depth_abbreviator::{AbbreviationConfig, Abbreviator};
//!
//! let source = "def outer():\n    def inner():\n        total = 0\n        for i in range(100):\n            total += i * i\n        return total\n    return inner()\n";
//! let config = AbbreviationConfig::new(30).with_max_depth(1);
//! let result = Abbreviator::new(config).abbreviate(source);
//!
//! assert!(result.code.contains("# ..."));
//! assert!(result.code.len() < source.len());
//! ```
//!
//! Failures never escape: if the input does not parse, or a rewrite would
//! not re-parse, the original text comes back unchanged and the error is
//! reported through [`Abbreviation::soft_failure`].

mod debug;
mod placeholder;
mod policy;
mod preview;
mod traversal;


pub use debug::{AbbreviatedNode, DebugInfo, SkippedNode};
pub use placeholder::{
    render_placeholder, splice, AbbreviationCandidate, BlockReplacer, Edit, ELLIPSIS_MARKER,
    NO_OP_STATEMENT,
};
pub use policy::{chars_saved, decide, Decision, NO_CHARACTER_REDUCTION};
pub use preview::{preview_comments, TRUNCATION_MARKER};
pub use traversal::{collect_edits, TraversalContext};

use tracing::warn;

use crate::core::error::{AbbrevError, Result, ResultExt};
use crate::core::models::AbbreviationConfig;
use crate::core::syntax::{char_len, PythonParser};

/// Result of one abbreviation call
#[derive(Debug)]
pub struct Abbreviation {
    /// Transformed source, or the input verbatim after a soft failure
    pub code: String,
    /// Traversal statistics, present when `debug` was enabled
    pub debug: Option<DebugInfo>,
    /// Why the input was returned unchanged, if it was
    pub soft_failure: Option<AbbrevError>,
}

impl Abbreviation {
    /// Whether the call fell back to the original text because of an error
    pub fn is_soft_failure(&self) -> bool {
        self.soft_failure.is_some()
    }

    /// Characters saved relative to `original`
    pub fn chars_saved(&self, original: &str) -> i64 {
        char_len(original) as i64 - char_len(&self.code) as i64
    }
}

/// Abbreviates Python source according to an [`AbbreviationConfig`]
///
/// Stateless between calls; one instance can serve many threads.
#[derive(Debug, Clone)]
pub struct Abbreviator {
    config: AbbreviationConfig,
    parser: PythonParser,
}

impl Abbreviator {
    pub fn new(config: AbbreviationConfig) -> Self {
        Self {
            config,
            parser: PythonParser::new(),
        }
    }

    pub fn config(&self) -> &AbbreviationConfig {
        &self.config
    }

    /// Abbreviate `source`, falling back to it unchanged on any failure
    pub fn abbreviate(&self, source: &str) -> Abbreviation {
        let mut info = DebugInfo::new(self.config.debug);

        let (code, soft_failure) = match self.try_abbreviate(source, &mut info) {
            Ok(code) => (code, None),
            Err(err) => {
                warn!(error = %err, "Error abbreviating code; returning input unchanged");
                (source.to_string(), Some(err))
            }
        };

        Abbreviation {
            code,
            debug: info.is_enabled().then_some(info),
            soft_failure,
        }
    }

    /// Abbreviate, propagating parse and transform errors instead of falling back
    pub fn try_abbreviate(&self, source: &str, info: &mut DebugInfo) -> Result<String> {
        let tree = self.parser.parse(source)?;
        let mut edits = collect_edits(&tree, source, &self.config, info)?;
        if edits.is_empty() {
            return Ok(source.to_string());
        }

        edits.sort_by_key(|edit| edit.range.start);
        let code = splice(source, 0..source.len(), &edits)?;

        self.parser
            .parse(&code)
            .map_err(|e| AbbrevError::transform(e.to_string()))
            .context("abbreviated output no longer parses")?;

        Ok(code)
    }
}

/// Abbreviate `source` with `config` and return only the text
pub fn abbreviate_code(source: &str, config: &AbbreviationConfig) -> String {
    Abbreviator::new(config.clone()).abbreviate(source).code
}
