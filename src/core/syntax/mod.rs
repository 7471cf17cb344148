//! Core Syntax Infrastructure
//!
//! Parsing for the one grammar the abbreviator understands (Python), using
//! Tree-sitter. The tree is full-fidelity by construction: every node knows
//! its byte range in the original buffer, so any region the abbreviator does
//! not touch is reproduced by copying the source verbatim.
//!
//! # Architecture
//!
//! ```text
//! source ──► PythonParser::parse ──► tree_sitter::Tree
//!                                        │
//!                     BlockKind::of(node) │ node_text / find_child_by_kind
//!                                        ▼
//!                         abbreviator traversal + splice
//! ```

mod adapter;

pub use adapter::PythonParser;

use std::fmt;
use std::ops::Range;

use serde::Serialize;

/// Block-bearing constructs tracked by the abbreviator
///
/// `elif` and `else` clauses are part of their owning statement and never
/// count as a construct of their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BlockKind {
    FunctionDef,
    ClassDef,
    If,
    While,
    For,
    Try,
    With,
}

impl BlockKind {
    /// Map a Tree-sitter node kind onto a tracked construct
    pub fn from_node_kind(kind: &str) -> Option<Self> {
        match kind {
            "function_definition" => Some(BlockKind::FunctionDef),
            "class_definition" => Some(BlockKind::ClassDef),
            "if_statement" => Some(BlockKind::If),
            "while_statement" => Some(BlockKind::While),
            "for_statement" => Some(BlockKind::For),
            "try_statement" => Some(BlockKind::Try),
            "with_statement" => Some(BlockKind::With),
            _ => None,
        }
    }

    /// Classify a node
    pub fn of(node: &tree_sitter::Node) -> Option<Self> {
        Self::from_node_kind(node.kind())
    }

    /// Display name
    pub fn name(&self) -> &'static str {
        match self {
            BlockKind::FunctionDef => "FunctionDef",
            BlockKind::ClassDef => "ClassDef",
            BlockKind::If => "If",
            BlockKind::While => "While",
            BlockKind::For => "For",
            BlockKind::Try => "Try",
            BlockKind::With => "With",
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Byte range of a node in the source
pub fn node_range(node: &tree_sitter::Node) -> Range<usize> {
    node.start_byte()..node.end_byte()
}

/// Get the text content of a Tree-sitter node
pub fn node_text<'a>(node: &tree_sitter::Node, source: &'a str) -> &'a str {
    &source[node.start_byte()..node.end_byte()]
}

/// Find the first child node of a given kind
#[allow(clippy::manual_find)]
pub fn find_child_by_kind<'tree>(
    node: &tree_sitter::Node<'tree>,
    kind: &str,
) -> Option<tree_sitter::Node<'tree>> {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == kind {
            return Some(child);
        }
    }
    None
}

/// Find all children whose kind is one of `kinds`, in source order
pub fn find_children_by_kinds<'tree>(
    node: &tree_sitter::Node<'tree>,
    kinds: &[&str],
) -> Vec<tree_sitter::Node<'tree>> {
    let mut cursor = node.walk();
    node.children(&mut cursor)
        .filter(|child| kinds.contains(&child.kind()))
        .collect()
}

/// Leading whitespace of the line containing `byte`
///
/// Returns the whitespace prefix only when `byte` sits right after it, which
/// is the case for any statement or clause that begins its own line.
pub fn line_indent(source: &str, byte: usize) -> Option<&str> {
    let line_start = source[..byte].rfind('\n').map(|i| i + 1).unwrap_or(0);
    let prefix = &source[line_start..byte];
    if prefix.chars().all(|c| c == ' ' || c == '\t') {
        Some(prefix)
    } else {
        None
    }
}

/// Character length used for every size comparison
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}
