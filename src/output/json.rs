//! JSON tree output writer.
//!
//! Writes the flame graph tree in the exact shape renderers such as
//! d3-flame-graph consume, with pretty formatting.

use log::{debug, info};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use super::{create_parent_dirs, validate_output_path};
use crate::flamegraph::FlameGraphTree;
use crate::utils::error::OutputError;

/// Write a flame graph tree to a JSON file
///
/// **Public** - main entry point for JSON output
///
/// # Arguments
/// * `tree` - tree produced by the analysis pipeline
/// * `output_path` - path to the output JSON file
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - path cannot be created or is invalid
pub fn write_tree(
    tree: &FlameGraphTree,
    output_path: impl AsRef<Path>,
) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing flame graph tree to: {}", output_path.display());

    validate_output_path(output_path)?;
    create_parent_dirs(output_path)?;

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, tree).map_err(OutputError::SerializationFailed)?;

    Ok(())
}

/// Read a flame graph tree back from a JSON file
///
/// **Public** - used by the validate command and by tests
pub fn read_tree(input_path: impl AsRef<Path>) -> Result<FlameGraphTree, OutputError> {
    let input_path = input_path.as_ref();

    debug!("Reading flame graph tree from: {}", input_path.display());

    let file = File::open(input_path).map_err(OutputError::ReadFailed)?;
    let tree: FlameGraphTree =
        serde_json::from_reader(file).map_err(OutputError::SerializationFailed)?;

    debug!(
        "Tree loaded: {} nodes, {} total samples",
        tree.node_count(),
        tree.value
    );

    Ok(tree)
}
