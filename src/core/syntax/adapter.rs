//! Tree-sitter adapter for the Python grammar

use super::node_text;
use crate::core::error::{AbbrevError, Result};

/// Python parser backed by Tree-sitter
///
/// A fresh `tree_sitter::Parser` is created per call, so one `PythonParser`
/// can be shared freely between threads.
#[derive(Debug, Default, Clone, Copy)]
pub struct PythonParser;

impl PythonParser {
    /// Create a new parser handle
    pub fn new() -> Self {
        Self
    }

    fn get_parser(&self) -> Result<tree_sitter::Parser> {
        let language: tree_sitter::Language = tree_sitter_python::LANGUAGE.into();

        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&language)
            .map_err(|e| AbbrevError::Initialization(e.to_string()))?;

        Ok(parser)
    }

    /// Parse source text, rejecting anything Tree-sitter had to recover from
    pub fn parse(&self, source: &str) -> Result<tree_sitter::Tree> {
        let mut parser = self.get_parser()?;
        let tree = parser.parse(source, None).ok_or_else(|| AbbrevError::Parse {
            line: 1,
            column: 0,
            message: "parser produced no tree".to_string(),
        })?;

        if tree.root_node().has_error() {
            return Err(first_error(&tree, source));
        }

        Ok(tree)
    }

    /// Whether `source` parses cleanly
    pub fn is_valid(&self, source: &str) -> bool {
        self.parse(source).is_ok()
    }
}

/// Describe the first ERROR or MISSING node in document order
fn first_error(tree: &tree_sitter::Tree, source: &str) -> AbbrevError {
    fn visit(cursor: &mut tree_sitter::TreeCursor, source: &str) -> Option<AbbrevError> {
        loop {
            let node = cursor.node();

            if node.is_error() || node.is_missing() {
                let position = node.start_position();
                let message = if node.is_missing() {
                    format!("Missing syntax element `{}`", node.kind())
                } else {
                    let snippet: String = node_text(&node, source).chars().take(40).collect();
                    format!("Syntax error near `{}`", snippet.trim())
                };
                return Some(AbbrevError::Parse {
                    line: position.row + 1,
                    column: position.column,
                    message,
                });
            }

            if node.has_error() && cursor.goto_first_child() {
                let found = visit(cursor, source);
                cursor.goto_parent();
                if found.is_some() {
                    return found;
                }
            }

            if !cursor.goto_next_sibling() {
                return None;
            }
        }
    }

    let mut cursor = tree.walk();
    visit(&mut cursor, source).unwrap_or(AbbrevError::Parse {
        line: 1,
        column: 0,
        message: "Syntax error".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_module() {
        let tree = PythonParser::new()
            .parse("import os\n\ndef main():\n    return os.getcwd()\n")
            .unwrap();
        let root = tree.root_node();
        assert_eq!(root.kind(), "module");
        assert_eq!(root.named_child_count(), 2);
    }

    #[test]
    fn test_parse_empty_source() {
        let tree = PythonParser::new().parse("").unwrap();
        assert_eq!(tree.root_node().named_child_count(), 0);
    }

    #[test]
    fn test_parse_error_reports_location() {
        let err = PythonParser::new()
            .parse("def broken(:\n    pass\n")
            .unwrap_err();
        match err {
            AbbrevError::Parse { line, .. } => assert_eq!(line, 1),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_is_valid() {
        let parser = PythonParser::new();
        assert!(parser.is_valid("x = 1\n"));
        assert!(!parser.is_valid("x = (1,\n"));
    }
}
