//! Collapsed-stack ("folded") output.
//!
//! One line per distinct root-to-leaf path: frame labels joined by
//! semicolons followed by the leaf's sample count, e.g.
//! `com.example.Main.main;com.example.Worker.run 3`. This is the common
//! interchange format for flamegraph tooling.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::info;

use super::{create_parent_dirs, validate_output_path};
use crate::flamegraph::FlameGraphTree;
use crate::utils::error::OutputError;

/// Flatten the tree into folded lines.
///
/// The synthetic `"(root)"` node is elided, so a bare root yields no
/// lines. Lines come out in the tree's child order.
pub fn to_folded_lines(tree: &FlameGraphTree) -> Vec<String> {
    let mut lines = Vec::new();
    let mut path = Vec::new();
    for child in tree.children.iter().flatten() {
        collect_lines(child, &mut path, &mut lines);
    }
    lines
}

fn collect_lines<'a>(
    node: &'a FlameGraphTree,
    path: &mut Vec<&'a str>,
    lines: &mut Vec<String>,
) {
    path.push(&node.name);
    match &node.children {
        Some(children) => {
            for child in children {
                collect_lines(child, path, lines);
            }
        }
        None => lines.push(format!("{} {}", path.join(";"), node.value)),
    }
    path.pop();
}

/// Write the tree as folded lines to a file
pub fn write_folded(
    tree: &FlameGraphTree,
    output_path: impl AsRef<Path>,
) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing folded stacks to: {}", output_path.display());

    validate_output_path(output_path)?;
    create_parent_dirs(output_path)?;

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let mut writer = BufWriter::new(file);
    for line in to_folded_lines(tree) {
        writeln!(writer, "{}", line).map_err(OutputError::WriteFailed)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn leaf(name: &str, value: u64) -> FlameGraphTree {
        FlameGraphTree {
            name: name.to_string(),
            value,
            children: None,
        }
    }

    #[test]
    fn test_one_line_per_leaf() {
        let tree = FlameGraphTree {
            name: "(root)".to_string(),
            value: 3,
            children: Some(vec![FlameGraphTree {
                name: "a".to_string(),
                value: 3,
                children: Some(vec![leaf("b", 2), leaf("c", 1)]),
            }]),
        };
        assert_eq!(to_folded_lines(&tree), vec!["a;b 2", "a;c 1"]);
    }

    #[test]
    fn test_bare_root_yields_no_lines() {
        let tree = leaf("(root)", 1);
        assert!(to_folded_lines(&tree).is_empty());
    }
}
