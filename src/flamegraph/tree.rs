//! Weighted call-tree construction from the folded prefix tree.

use serde::{Deserialize, Serialize};

use crate::aggregator::StackTreeNode;
use crate::progress::{Phase, ProgressSink};
use crate::utils::config::ROOT_NAME;
use crate::utils::error::AnalyzeError;

/// How a childless node's value is derived.
///
/// Two historical behaviors exist and the rendering side exposes a
/// matching "self value" toggle, so both are kept selectable rather
/// than picking one as canonical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LeafValuePolicy {
    /// Leaf value = number of stacks that terminated at the leaf
    #[default]
    CountedLeaves,
    /// Every leaf counts as exactly one sample
    UnitLeaves,
}

/// The renderer-facing call tree.
///
/// Serializes to the `{name, value, children}` JSON shape flame-graph
/// renderers consume; the `children` key is omitted for leaves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlameGraphTree {
    pub name: String,
    /// Total samples dominated by this node
    pub value: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<FlameGraphTree>>,
}

impl FlameGraphTree {
    /// Nodes in this subtree, this node included.
    pub fn node_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .flatten()
            .map(FlameGraphTree::node_count)
            .sum::<usize>()
    }

    /// Depth of the deepest node below this one.
    pub fn max_depth(&self) -> usize {
        self.children
            .iter()
            .flatten()
            .map(|child| child.max_depth() + 1)
            .max()
            .unwrap_or(0)
    }

    /// Check the structural invariants every renderer relies on: an
    /// internal node's value is the sum of its children's values, and a
    /// leaf carries at least one sample. Returns the first violation.
    pub fn check_invariants(&self) -> Result<(), String> {
        match &self.children {
            Some(children) => {
                let sum: u64 = children.iter().map(|child| child.value).sum();
                if sum != self.value {
                    return Err(format!(
                        "node '{}' has value {} but its children sum to {}",
                        self.name, self.value, sum
                    ));
                }
                for child in children {
                    child.check_invariants()?;
                }
                Ok(())
            }
            None if self.value == 0 => Err(format!("leaf '{}' has zero value", self.name)),
            None => Ok(()),
        }
    }
}

/// Convert the folded prefix tree into the final weighted call tree.
///
/// An internal node's value is the sum of its children's values; a
/// leaf's value follows `policy`. Children appear in discovery order,
/// which makes the output deterministic for a given dump. The synthetic
/// root is always named `"(root)"`.
pub fn build_flame_graph_tree(
    root: &StackTreeNode,
    policy: LeafValuePolicy,
    progress: &mut dyn ProgressSink,
) -> Result<FlameGraphTree, AnalyzeError> {
    let total = root.node_count();
    progress.report_phase(Phase::BuildTree, total);

    let mut visited = 0usize;
    let tree = build_node(ROOT_NAME, root, policy, progress, &mut visited)?;
    progress.report_progress(total);
    Ok(tree)
}

fn build_node(
    name: &str,
    node: &StackTreeNode,
    policy: LeafValuePolicy,
    progress: &mut dyn ProgressSink,
    visited: &mut usize,
) -> Result<FlameGraphTree, AnalyzeError> {
    if progress.is_cancelled() {
        return Err(AnalyzeError::Cancelled);
    }
    progress.report_progress(*visited);
    *visited += 1;

    if node.children().is_empty() {
        let value = match policy {
            // Nodes recorded without a count still stand for one sample.
            LeafValuePolicy::CountedLeaves => node.self_count().max(1),
            LeafValuePolicy::UnitLeaves => 1,
        };
        return Ok(FlameGraphTree {
            name: name.to_string(),
            value,
            children: None,
        });
    }

    let mut children = Vec::with_capacity(node.children().len());
    let mut value = 0u64;
    for (child_name, child_node) in node.children() {
        let child = build_node(child_name, child_node, policy, progress, visited)?;
        value += child.value;
        children.push(child);
    }
    Ok(FlameGraphTree {
        name: name.to_string(),
        value,
        children: Some(children),
    })
}
