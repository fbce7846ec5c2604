//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use thiserror::Error;

/// Errors that can occur while analyzing a dump
///
/// `UnrecognizedFormat` and `NoUsableData` are distinct, user-meaningful
/// outcomes and are never collapsed into one another: the first means no
/// dialect signature matched at all, the second means a dialect matched
/// but the dump held no call stacks.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalyzeError {
    #[error("unrecognized dump format")]
    UnrecognizedFormat,

    #[error("no usable stack data found in the dump")]
    NoUsableData,

    /// The host requested cancellation through the progress sink
    #[error("analysis cancelled")]
    Cancelled,
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to read file: {0}")]
    ReadFailed(std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Failed to render flamegraph: {0}")]
    RenderFailed(String),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}
