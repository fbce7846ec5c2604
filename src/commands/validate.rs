//! Validate command implementation.
//!
//! Re-reads a previously written tree JSON and checks the structural
//! invariants every renderer relies on.

use anyhow::{Context, Result};
use std::path::Path;

use crate::output::read_tree;

/// Execute the validate command
pub fn execute_validate(file_path: &Path) -> Result<()> {
    println!("Validating tree: {}", file_path.display());

    let tree = read_tree(file_path)
        .with_context(|| format!("Failed to read {}", file_path.display()))?;

    tree.check_invariants()
        .map_err(|violation| anyhow::anyhow!("Invariant violation: {}", violation))?;

    println!("✓ Valid flame graph tree");
    println!("  Root: {}", tree.name);
    println!("  Total samples: {}", tree.value);
    println!("  Nodes: {}", tree.node_count());
    println!("  Max depth: {}", tree.max_depth());

    Ok(())
}
