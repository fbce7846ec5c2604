//! Output writers for the analyzed tree.
//!
//! This module handles writing the analysis result to disk:
//! - JSON: the renderer-facing `{name, value, children}` tree
//! - folded: collapsed-stack lines for flamegraph tooling
//! - SVG: a rendered flamegraph via inferno

pub mod folded;
pub mod json;
pub mod svg;

// Re-export main functions
pub use folded::{to_folded_lines, write_folded};
pub use json::{read_tree, write_tree};
pub use svg::{render_svg, write_svg};

use log::debug;
use std::path::Path;

use crate::utils::error::OutputError;

/// Validate that an output path is plausibly writable.
pub(crate) fn validate_output_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }
    if path.exists() && path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }
    Ok(())
}

/// Create missing parent directories for an output path.
pub(crate) fn create_parent_dirs(path: &Path) -> Result<(), OutputError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!(
                    "Cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }
    Ok(())
}
