//! The flame graph tree value and its builder.

pub mod tree;

// Re-export main types
pub use tree::{build_flame_graph_tree, FlameGraphTree, LeafValuePolicy};
