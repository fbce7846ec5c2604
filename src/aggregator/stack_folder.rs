//! Fold call stacks into a prefix-sharing tree.
//!
//! This is the standard flame-graph folding step: every stack is walked
//! from its outermost frame down, creating or reusing one node per
//! frame, so stacks with a common call prefix share a single chain of
//! nodes. Total work is proportional to the sum of all stack depths.

use indexmap::IndexMap;
use log::debug;

use crate::parser::StackTrace;
use crate::progress::{Phase, ProgressSink};
use crate::utils::error::AnalyzeError;

/// One node of the transient prefix tree.
///
/// Children are keyed by frame label and owned exclusively by their
/// parent; the tree is acyclic by construction since it is only ever
/// appended to. Insertion order is preserved so the final tree (and its
/// JSON form) is deterministic for a given dump.
#[derive(Debug, Default)]
pub struct StackTreeNode {
    children: IndexMap<String, StackTreeNode>,
    self_count: u64,
}

impl StackTreeNode {
    pub fn children(&self) -> &IndexMap<String, StackTreeNode> {
        &self.children
    }

    /// Number of stacks that terminated exactly at this node.
    pub fn self_count(&self) -> u64 {
        self.self_count
    }

    /// Nodes in the subtree rooted here, this node included.
    pub fn node_count(&self) -> usize {
        1 + self
            .children
            .values()
            .map(StackTreeNode::node_count)
            .sum::<usize>()
    }
}

/// Fold the parsed stacks into a prefix tree.
///
/// The returned node is the implicit call-tree root and is never itself
/// a frame. Frames arrive innermost-first from the parsers and are
/// inserted in reverse, so the tree grows in caller-to-callee order.
pub fn fold_stacks(
    stacks: &[StackTrace],
    progress: &mut dyn ProgressSink,
) -> Result<StackTreeNode, AnalyzeError> {
    progress.report_phase(Phase::FoldStacks, stacks.len());

    let mut root = StackTreeNode::default();
    for (i, stack) in stacks.iter().enumerate() {
        if progress.is_cancelled() {
            return Err(AnalyzeError::Cancelled);
        }
        progress.report_progress(i);

        let mut node = &mut root;
        for frame in stack.frames.iter().rev() {
            node = node
                .children
                .entry(frame.clone())
                .or_insert_with(StackTreeNode::default);
        }
        node.self_count += 1;
    }
    progress.report_progress(stacks.len());

    debug!(
        "folded {} stacks into {} tree nodes",
        stacks.len(),
        root.node_count()
    );
    Ok(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::NullProgress;
    use pretty_assertions::assert_eq;

    fn stack(frames: &[&str]) -> StackTrace {
        StackTrace {
            thread: None,
            frames: frames.iter().map(|f| f.to_string()).collect(),
        }
    }

    #[test]
    fn test_shared_prefix_shares_nodes() {
        // Innermost-first: both stacks run a() -> b() at the root.
        let stacks = vec![stack(&["c", "b", "a"]), stack(&["d", "b", "a"])];
        let root = fold_stacks(&stacks, &mut NullProgress).unwrap();

        assert_eq!(root.children().len(), 1);
        let a = &root.children()["a"];
        assert_eq!(a.children().len(), 1);
        let b = &a.children()["b"];
        assert_eq!(b.children().len(), 2);
        assert_eq!(b.children()["c"].self_count(), 1);
        assert_eq!(b.children()["d"].self_count(), 1);
    }

    #[test]
    fn test_terminal_node_counts_identical_stacks() {
        let stacks = vec![stack(&["b", "a"]), stack(&["b", "a"]), stack(&["a"])];
        let root = fold_stacks(&stacks, &mut NullProgress).unwrap();

        let a = &root.children()["a"];
        // One stack ends at a(), two end at a() -> b().
        assert_eq!(a.self_count(), 1);
        assert_eq!(a.children()["b"].self_count(), 2);
    }

    #[test]
    fn test_children_keep_discovery_order() {
        let stacks = vec![stack(&["z"]), stack(&["m"]), stack(&["a"])];
        let root = fold_stacks(&stacks, &mut NullProgress).unwrap();
        let names: Vec<&str> = root.children().keys().map(String::as_str).collect();
        assert_eq!(names, vec!["z", "m", "a"]);
    }

    #[test]
    fn test_node_count_includes_root() {
        let stacks = vec![stack(&["b", "a"])];
        let root = fold_stacks(&stacks, &mut NullProgress).unwrap();
        assert_eq!(root.node_count(), 3);
    }
}
