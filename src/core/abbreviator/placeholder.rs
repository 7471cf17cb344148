//! Block replacer: placeholder bodies and whole-statement candidates
//!
//! A placeholder is `preview comments + "# ..." + "pass"`, one per line at
//! the body's indentation. Candidates are built as text by splicing
//! placeholders over the original bytes of a statement; nothing outside the
//! replaced suites is re-rendered.

use std::ops::Range;

use super::policy::chars_saved;
use super::preview::preview_comments;
use crate::core::error::{AbbrevError, Result};
use crate::core::models::AbbreviationConfig;
use crate::core::syntax::{
    find_child_by_kind, find_children_by_kinds, line_indent, node_range, BlockKind,
};

/// Comment line standing in for the elided body
pub const ELLIPSIS_MARKER: &str = "# ...";

/// No-op statement that keeps the placeholder a valid suite
pub const NO_OP_STATEMENT: &str = "pass";

const SPACE_INDENT: &str = "    ";
const TAB_INDENT: &str = "\t";

/// A replacement of one byte range of the source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub range: Range<usize>,
    pub replacement: String,
}

/// A fully built abbreviation of one statement, not yet committed
#[derive(Debug, Clone)]
pub struct AbbreviationCandidate {
    pub kind: BlockKind,
    pub depth: usize,
    /// Byte range of the original statement
    pub span: Range<usize>,
    /// Statement text with every suite replaced
    pub text: String,
    /// Original length minus candidate length; may be negative
    pub chars_saved: i64,
}

impl AbbreviationCandidate {
    /// The whole-statement edit applied when the candidate is committed
    pub fn into_edit(self) -> Edit {
        Edit {
            range: self.span,
            replacement: self.text,
        }
    }
}

/// Apply sorted, non-overlapping `edits` to `source[window]`
pub fn splice(source: &str, window: Range<usize>, edits: &[Edit]) -> Result<String> {
    let mut out = String::with_capacity(window.len());
    let mut cursor = window.start;

    for edit in edits {
        if edit.range.start < cursor
            || edit.range.end > window.end
            || edit.range.start > edit.range.end
        {
            return Err(AbbrevError::transform(format!(
                "edit {:?} overlaps a previous edit or escapes {:?}",
                edit.range, window
            )));
        }
        out.push_str(&source[cursor..edit.range.start]);
        out.push_str(&edit.replacement);
        cursor = edit.range.end;
    }

    out.push_str(&source[cursor..window.end]);
    Ok(out)
}

/// Render a placeholder suite, starting with the newline after the colon
pub fn render_placeholder(indent: &str, previews: &[String], newline: &str) -> String {
    let mut out = String::new();
    for line in previews
        .iter()
        .map(String::as_str)
        .chain([ELLIPSIS_MARKER, NO_OP_STATEMENT])
    {
        out.push_str(newline);
        out.push_str(indent);
        out.push_str(line);
    }
    out
}

/// Builds abbreviation candidates for block-bearing statements
pub struct BlockReplacer<'a> {
    source: &'a str,
    config: &'a AbbreviationConfig,
    newline: &'static str,
}

impl<'a> BlockReplacer<'a> {
    pub fn new(source: &'a str, config: &'a AbbreviationConfig) -> Self {
        let newline = if source.contains("\r\n") { "\r\n" } else { "\n" };
        Self {
            source,
            config,
            newline,
        }
    }

    /// Build the candidate for `node`, abbreviating every suite it owns
    pub fn build(
        &self,
        node: &tree_sitter::Node,
        kind: BlockKind,
        depth: usize,
    ) -> Result<AbbreviationCandidate> {
        let edits = self.candidate_edits(node, kind)?;
        let span = node_range(node);
        let text = splice(self.source, span.clone(), &edits)?;
        let chars_saved = chars_saved(&self.source[span.clone()], &text);

        Ok(AbbreviationCandidate {
            kind,
            depth,
            span,
            text,
            chars_saved,
        })
    }

    fn candidate_edits(&self, node: &tree_sitter::Node, kind: BlockKind) -> Result<Vec<Edit>> {
        let mut edits = vec![self.suite_edit(node)?];

        match kind {
            BlockKind::FunctionDef | BlockKind::ClassDef | BlockKind::With => {}
            BlockKind::While | BlockKind::For => {
                for clause in find_children_by_kinds(node, &["else_clause"]) {
                    edits.push(self.suite_edit(&clause)?);
                }
            }
            BlockKind::If => {
                if let Some(edit) = self.alternative_edit(node)? {
                    edits.push(edit);
                }
            }
            BlockKind::Try => {
                let clauses = find_children_by_kinds(
                    node,
                    &[
                        "except_clause",
                        "except_group_clause",
                        "else_clause",
                        "finally_clause",
                    ],
                );
                for clause in clauses {
                    edits.push(self.suite_edit(&clause)?);
                }
            }
        }

        Ok(edits)
    }

    /// Abbreviate the `elif`/`else` part of an if statement
    ///
    /// An `elif` chain is collapsed into a single `else:` previewing the
    /// first `elif` body. This only ever happens on the candidate.
    fn alternative_edit(&self, node: &tree_sitter::Node) -> Result<Option<Edit>> {
        let alternatives = find_children_by_kinds(node, &["elif_clause", "else_clause"]);
        let (Some(first), Some(last)) = (alternatives.first(), alternatives.last()) else {
            return Ok(None);
        };

        if first.kind() == "else_clause" {
            return Ok(Some(self.suite_edit(first)?));
        }

        let suite = self.suite(first)?;
        let last_suite = self.suite(last)?;
        let end = self.body_end(last, &last_suite);
        let placeholder = self.placeholder(first, &suite)?;

        Ok(Some(Edit {
            range: first.start_byte()..end,
            replacement: format!("else:{placeholder}"),
        }))
    }

    /// Edit replacing everything from the header colon to the end of the body
    fn suite_edit(&self, clause: &tree_sitter::Node) -> Result<Edit> {
        let suite = self.suite(clause)?;
        let colon = self.header_colon(clause, &suite)?;
        let end = self.body_end(clause, &suite);

        Ok(Edit {
            range: colon.end_byte()..end,
            replacement: self.placeholder(clause, &suite)?,
        })
    }

    fn placeholder(&self, clause: &tree_sitter::Node, suite: &tree_sitter::Node) -> Result<String> {
        let colon = self.header_colon(clause, suite)?;
        let end = self.body_end(clause, suite);
        let first = first_statement(suite);
        let inline = first
            .map(|stmt| stmt.start_position().row == colon.end_position().row)
            .unwrap_or(false);

        let after_colon = &self.source[colon.end_byte()..end];
        let body = if inline {
            after_colon
        } else {
            after_colon
                .split_once('\n')
                .map(|(_, rest)| rest)
                .unwrap_or("")
        };

        let previews = preview_comments(body, self.config.preserve_lines, self.config.preserve_chars);
        let indent = self.body_indent(clause, first, inline);
        Ok(render_placeholder(&indent, &previews, self.newline))
    }

    /// The `block` child holding a clause's statements
    fn suite<'tree>(&self, clause: &tree_sitter::Node<'tree>) -> Result<tree_sitter::Node<'tree>> {
        clause
            .child_by_field_name("body")
            .or_else(|| clause.child_by_field_name("consequence"))
            .or_else(|| find_child_by_kind(clause, "block"))
            .ok_or_else(|| {
                AbbrevError::transform(format!(
                    "{} at line {} has no body",
                    clause.kind(),
                    clause.start_position().row + 1
                ))
            })
    }

    /// The `:` token closing the clause header
    fn header_colon<'tree>(
        &self,
        clause: &tree_sitter::Node<'tree>,
        suite: &tree_sitter::Node<'tree>,
    ) -> Result<tree_sitter::Node<'tree>> {
        let mut cursor = clause.walk();
        let colon = clause
            .children(&mut cursor)
            .filter(|child| child.kind() == ":" && child.end_byte() <= suite.start_byte())
            .last();

        colon.ok_or_else(|| {
            AbbrevError::transform(format!(
                "{} at line {} has no header colon",
                clause.kind(),
                clause.start_position().row + 1
            ))
        })
    }

    fn clause_indent(&self, clause: &tree_sitter::Node) -> &'a str {
        line_indent(self.source, clause.start_byte()).unwrap_or("")
    }

    /// End of the last statement in the suite
    ///
    /// Trailing comments still count as body while they are indented deeper
    /// than the clause header.
    fn body_end(&self, clause: &tree_sitter::Node, suite: &tree_sitter::Node) -> usize {
        // a header not preceded by pure whitespace (BOM, form feed) falls back to its column
        let header_width = line_indent(self.source, clause.start_byte())
            .map(str::len)
            .unwrap_or(clause.start_position().column);
        let mut cursor = suite.walk();
        let children: Vec<_> = suite.children(&mut cursor).collect();

        let Some(last_statement) = children.iter().rposition(|child| child.kind() != "comment")
        else {
            return suite.end_byte();
        };

        let mut end = children[last_statement].end_byte();
        for comment in &children[last_statement + 1..] {
            if comment.start_position().column <= header_width {
                break;
            }
            end = comment.end_byte();
        }
        end
    }

    fn body_indent(
        &self,
        clause: &tree_sitter::Node,
        first_statement: Option<tree_sitter::Node>,
        inline: bool,
    ) -> String {
        if !inline {
            if let Some(indent) =
                first_statement.and_then(|stmt| line_indent(self.source, stmt.start_byte()))
            {
                return indent.to_string();
            }
        }

        let header = self.clause_indent(clause);
        let unit = if header.contains('\t') {
            TAB_INDENT
        } else {
            SPACE_INDENT
        };
        format!("{header}{unit}")
    }
}

fn first_statement<'tree>(suite: &tree_sitter::Node<'tree>) -> Option<tree_sitter::Node<'tree>> {
    let mut cursor = suite.walk();
    let first = suite
        .children(&mut cursor)
        .find(|child| child.kind() != "comment");
    first
}
