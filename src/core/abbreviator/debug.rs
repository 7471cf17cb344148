//! Debug collector: purely observational traversal statistics

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::core::syntax::BlockKind;

/// A statement that was replaced by its placeholder
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AbbreviatedNode {
    pub kind: BlockKind,
    pub depth: usize,
    pub chars_saved: i64,
}

/// An eligible statement that was left as-is
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedNode {
    pub kind: BlockKind,
    pub depth: usize,
    pub reason: String,
}

/// Per-call record of what the traversal saw and decided
///
/// When disabled every recording method is a no-op.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DebugInfo {
    #[serde(skip)]
    enabled: bool,
    pub nodes_considered: usize,
    pub nodes_abbreviated: usize,
    pub nodes_skipped: usize,
    pub chars_saved: i64,
    pub max_depth_reached: usize,
    /// Depth histogram of every considered node
    pub depth_counts: BTreeMap<usize, usize>,
    /// Considered nodes per construct kind
    pub kind_counts: BTreeMap<&'static str, usize>,
    pub abbreviated: Vec<AbbreviatedNode>,
    pub skipped: Vec<SkippedNode>,
}

impl DebugInfo {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            ..Default::default()
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Record that a block-bearing node was visited
    pub fn consider(&mut self, kind: BlockKind, depth: usize) {
        if !self.enabled {
            return;
        }
        self.nodes_considered += 1;
        self.max_depth_reached = self.max_depth_reached.max(depth);
        *self.depth_counts.entry(depth).or_insert(0) += 1;
        *self.kind_counts.entry(kind.name()).or_insert(0) += 1;
    }

    /// Record a committed abbreviation
    pub fn record_abbreviated(&mut self, kind: BlockKind, depth: usize, chars_saved: i64) {
        if !self.enabled {
            return;
        }
        self.nodes_abbreviated += 1;
        self.chars_saved += chars_saved;
        self.abbreviated.push(AbbreviatedNode {
            kind,
            depth,
            chars_saved,
        });
    }

    /// Record an eligible node that was kept
    pub fn record_skipped(&mut self, kind: BlockKind, depth: usize, reason: &str) {
        if !self.enabled {
            return;
        }
        self.nodes_skipped += 1;
        self.skipped.push(SkippedNode {
            kind,
            depth,
            reason: reason.to_string(),
        });
    }
}

impl fmt::Display for DebugInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "----- Debug Summary -----")?;
        writeln!(f, "Nodes considered: {}", self.nodes_considered)?;
        writeln!(f, "Nodes abbreviated: {}", self.nodes_abbreviated)?;
        writeln!(f, "Nodes skipped: {}", self.nodes_skipped)?;
        writeln!(f, "Total characters saved: {}", self.chars_saved)?;
        writeln!(f, "Maximum depth reached: {}", self.max_depth_reached)?;

        writeln!(f)?;
        writeln!(f, "Depth distribution:")?;
        for (depth, count) in &self.depth_counts {
            writeln!(f, "  Depth {depth}: {count} nodes")?;
        }

        if !self.kind_counts.is_empty() {
            writeln!(f)?;
            writeln!(f, "Node kinds:")?;
            for (kind, count) in &self.kind_counts {
                writeln!(f, "  {kind}: {count}")?;
            }
        }

        if !self.abbreviated.is_empty() {
            writeln!(f)?;
            writeln!(f, "Abbreviated nodes:")?;
            for node in &self.abbreviated {
                writeln!(
                    f,
                    "  {} at depth {} (saved {} chars)",
                    node.kind, node.depth, node.chars_saved
                )?;
            }
        }

        if !self.skipped.is_empty() {
            writeln!(f)?;
            writeln!(f, "Skipped nodes:")?;
            for node in &self.skipped {
                writeln!(f, "  {} at depth {} - {}", node.kind, node.depth, node.reason)?;
            }
        }

        if self.abbreviated.is_empty() && self.skipped.is_empty() {
            writeln!(f)?;
            writeln!(f, "No nodes were abbreviated. Try:")?;
            writeln!(f, "  1. Decreasing the --depth parameter")?;
            writeln!(f, "  2. Using a file with deeper nesting")?;
        }

        write!(f, "-------------------------")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_collector_records_nothing() {
        let mut info = DebugInfo::new(false);
        info.consider(BlockKind::If, 1);
        info.record_abbreviated(BlockKind::If, 1, 40);
        info.record_skipped(BlockKind::If, 1, "No character reduction");
        assert_eq!(info.nodes_considered, 0);
        assert_eq!(info.nodes_abbreviated, 0);
        assert!(info.depth_counts.is_empty());
    }

    #[test]
    fn test_histogram_and_totals() {
        let mut info = DebugInfo::new(true);
        info.consider(BlockKind::FunctionDef, 1);
        info.consider(BlockKind::If, 2);
        info.consider(BlockKind::For, 2);
        info.consider(BlockKind::FunctionDef, 3);
        info.record_abbreviated(BlockKind::FunctionDef, 3, 120);
        info.record_skipped(BlockKind::For, 3, "No character reduction");

        assert_eq!(info.nodes_considered, 4);
        assert_eq!(info.max_depth_reached, 3);
        assert_eq!(info.depth_counts.get(&2), Some(&2));
        assert_eq!(info.nodes_abbreviated, 1);
        assert_eq!(info.nodes_skipped, 1);
        assert_eq!(info.chars_saved, 120);
        assert_eq!(info.kind_counts.get("FunctionDef"), Some(&2));
    }

    #[test]
    fn test_summary_rendering() {
        let mut info = DebugInfo::new(true);
        info.consider(BlockKind::Try, 3);
        info.record_abbreviated(BlockKind::Try, 3, 57);
        let summary = info.to_string();
        assert!(summary.contains("Nodes considered: 1"));
        assert!(summary.contains("Depth 3: 1 nodes"));
        assert!(summary.contains("Try at depth 3 (saved 57 chars)"));
        assert!(!summary.contains("No nodes were abbreviated"));
    }

    #[test]
    fn test_summary_hint_when_nothing_eligible() {
        let mut info = DebugInfo::new(true);
        info.consider(BlockKind::FunctionDef, 1);
        assert!(info.to_string().contains("No nodes were abbreviated"));
    }
}
