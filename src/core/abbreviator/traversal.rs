//! Traversal engine
//!
//! Walks the parse tree keeping a stack of the block-bearing statements
//! currently open. Each statement adds exactly one level on entry and
//! removes it on exit; `elif`/`else`/`except` clauses and decorators are not
//! statements of their own and add nothing.

use tracing::debug;

use super::debug::DebugInfo;
use super::placeholder::{BlockReplacer, Edit};
use super::policy::{decide, Decision};
use crate::core::error::Result;
use crate::core::models::AbbreviationConfig;
use crate::core::syntax::{node_text, BlockKind};

/// Explicit traversal state threaded through the recursive walk
#[derive(Debug, Clone, Default)]
pub struct TraversalContext {
    ancestors: Vec<BlockKind>,
}

impl TraversalContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current nesting depth (0 at module level)
    pub fn depth(&self) -> usize {
        self.ancestors.len()
    }

    /// Enter a block-bearing statement, returning its depth
    pub fn enter(&mut self, kind: BlockKind) -> usize {
        self.ancestors.push(kind);
        self.depth()
    }

    /// Leave the innermost open statement
    pub fn leave(&mut self) -> Option<BlockKind> {
        self.ancestors.pop()
    }

    /// Open statements, outermost first
    pub fn ancestors(&self) -> &[BlockKind] {
        &self.ancestors
    }
}

/// Walk `tree` and return the committed whole-statement edits, in source order
pub fn collect_edits(
    tree: &tree_sitter::Tree,
    source: &str,
    config: &AbbreviationConfig,
    info: &mut DebugInfo,
) -> Result<Vec<Edit>> {
    let walker = Walker {
        source,
        config,
        replacer: BlockReplacer::new(source, config),
    };
    let mut ctx = TraversalContext::new();
    let mut edits = Vec::new();

    walker.visit(tree.root_node(), &mut ctx, &mut edits, info)?;
    debug_assert_eq!(ctx.depth(), 0);

    Ok(edits)
}

struct Walker<'a> {
    source: &'a str,
    config: &'a AbbreviationConfig,
    replacer: BlockReplacer<'a>,
}

impl Walker<'_> {
    fn visit(
        &self,
        node: tree_sitter::Node,
        ctx: &mut TraversalContext,
        edits: &mut Vec<Edit>,
        info: &mut DebugInfo,
    ) -> Result<()> {
        let Some(kind) = BlockKind::of(&node) else {
            return self.visit_children(node, ctx, edits, info);
        };

        let depth = ctx.enter(kind);
        info.consider(kind, depth);

        let result = if self.config.is_eligible(depth) {
            self.resolve(node, kind, depth, edits, info)
        } else {
            self.visit_children(node, ctx, edits, info)
        };

        ctx.leave();
        result
    }

    fn visit_children(
        &self,
        node: tree_sitter::Node,
        ctx: &mut TraversalContext,
        edits: &mut Vec<Edit>,
        info: &mut DebugInfo,
    ) -> Result<()> {
        let mut cursor = node.walk();
        let children: Vec<_> = node.named_children(&mut cursor).collect();
        for child in children {
            self.visit(child, ctx, edits, info)?;
        }
        Ok(())
    }

    /// Build, judge and possibly commit the candidate for an eligible node
    fn resolve(
        &self,
        node: tree_sitter::Node,
        kind: BlockKind,
        depth: usize,
        edits: &mut Vec<Edit>,
        info: &mut DebugInfo,
    ) -> Result<()> {
        let candidate = self.replacer.build(&node, kind, depth)?;
        let original = node_text(&node, self.source);

        match decide(original, &candidate.text) {
            Decision::Commit { chars_saved } => {
                debug!(
                    kind = %kind,
                    depth,
                    line = node.start_position().row + 1,
                    chars_saved,
                    "abbreviated"
                );
                info.record_abbreviated(kind, depth, chars_saved);
                edits.push(candidate.into_edit());
            }
            Decision::Skip {
                chars_saved,
                reason,
            } => {
                debug!(
                    kind = %kind,
                    depth,
                    line = node.start_position().row + 1,
                    chars_saved,
                    reason,
                    "kept"
                );
                info.record_skipped(kind, depth, reason);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::syntax::PythonParser;

    fn depths(source: &str) -> DebugInfo {
        let tree = PythonParser::new().parse(source).unwrap();
        let config = AbbreviationConfig::new(30).with_max_depth(i32::MAX).with_debug(true);
        let mut info = DebugInfo::new(true);
        let edits = collect_edits(&tree, source, &config, &mut info).unwrap();
        assert!(edits.is_empty());
        info
    }

    #[test]
    fn test_context_enter_leave() {
        let mut ctx = TraversalContext::new();
        assert_eq!(ctx.depth(), 0);
        assert_eq!(ctx.enter(BlockKind::ClassDef), 1);
        assert_eq!(ctx.enter(BlockKind::FunctionDef), 2);
        assert_eq!(ctx.ancestors(), &[BlockKind::ClassDef, BlockKind::FunctionDef]);
        assert_eq!(ctx.leave(), Some(BlockKind::FunctionDef));
        assert_eq!(ctx.depth(), 1);
        assert_eq!(ctx.leave(), Some(BlockKind::ClassDef));
        assert_eq!(ctx.leave(), None);
    }

    #[test]
    fn test_siblings_do_not_stack() {
        let info = depths("def a():\n    pass\n\ndef b():\n    pass\n\nclass C:\n    pass\n");
        assert_eq!(info.nodes_considered, 3);
        assert_eq!(info.depth_counts.get(&1), Some(&3));
        assert_eq!(info.max_depth_reached, 1);
    }

    #[test]
    fn test_nesting_increments_by_one() {
        let source = "class A:\n    def m(self):\n        for x in y:\n            with open(x) as f:\n                pass\n";
        let info = depths(source);
        assert_eq!(info.max_depth_reached, 4);
        for depth in 1..=4 {
            assert_eq!(info.depth_counts.get(&depth), Some(&1));
        }
    }

    #[test]
    fn test_elif_shares_depth_with_if() {
        let source = "if a:\n    def f():\n        pass\nelif b:\n    def g():\n        pass\nelse:\n    def h():\n        pass\n";
        let info = depths(source);
        assert_eq!(info.depth_counts.get(&1), Some(&1));
        assert_eq!(info.depth_counts.get(&2), Some(&3));
        assert_eq!(info.kind_counts.get("If"), Some(&1));
    }

    #[test]
    fn test_decorated_and_async_definitions_are_tracked() {
        let source = "@cache\nasync def fetch():\n    async with session() as s:\n        async for row in s:\n            pass\n";
        let info = depths(source);
        assert_eq!(info.kind_counts.get("FunctionDef"), Some(&1));
        assert_eq!(info.kind_counts.get("With"), Some(&1));
        assert_eq!(info.kind_counts.get("For"), Some(&1));
        assert_eq!(info.max_depth_reached, 3);
    }

    #[test]
    fn test_try_handlers_share_depth() {
        let source = "try:\n    if a:\n        pass\nexcept E:\n    while b:\n        pass\nfinally:\n    with c:\n        pass\n";
        let info = depths(source);
        assert_eq!(info.depth_counts.get(&1), Some(&1));
        assert_eq!(info.depth_counts.get(&2), Some(&3));
    }

    #[test]
    fn test_eligible_nodes_are_not_descended() {
        let source = "def outer():\n    def inner():\n        x = 1\n";
        let tree = PythonParser::new().parse(source).unwrap();
        let config = AbbreviationConfig::new(30).with_max_depth(0).with_debug(true);
        let mut info = DebugInfo::new(true);
        collect_edits(&tree, source, &config, &mut info).unwrap();
        assert_eq!(info.nodes_considered, 1);
        assert_eq!(info.nodes_abbreviated + info.nodes_skipped, 1);
    }
}
