//! SVG flamegraph output.
//!
//! Rendering is delegated to inferno, the same engine cargo-flamegraph
//! uses; this tool only feeds it the folded stacks derived from the
//! tree.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use inferno::flamegraph::{self, Options};
use log::info;

use super::folded::to_folded_lines;
use super::{create_parent_dirs, validate_output_path};
use crate::flamegraph::FlameGraphTree;
use crate::utils::error::OutputError;

/// Render the tree as an SVG flamegraph
///
/// # Errors
/// * `OutputError::RenderFailed` - inferno rejected the stack data
pub fn render_svg(tree: &FlameGraphTree, title: &str) -> Result<Vec<u8>, OutputError> {
    let lines = to_folded_lines(tree);

    let mut options = Options::default();
    options.title = title.to_string();
    options.count_name = "samples".to_string();

    let mut svg = Vec::new();
    flamegraph::from_lines(&mut options, lines.iter().map(String::as_str), &mut svg)
        .map_err(|e| OutputError::RenderFailed(e.to_string()))?;

    Ok(svg)
}

/// Render the tree and write the SVG to a file
pub fn write_svg(
    tree: &FlameGraphTree,
    title: &str,
    output_path: impl AsRef<Path>,
) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing SVG flamegraph to: {}", output_path.display());

    validate_output_path(output_path)?;
    create_parent_dirs(output_path)?;

    let svg = render_svg(tree, title)?;

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(&svg).map_err(OutputError::WriteFailed)?;

    Ok(())
}
