//! Stackflame
//!
//! Flame graph analysis for JVM thread and core dumps.
//!
//! Converts textual dumps produced by JVM-family runtimes (IBM
//! javacore files, IBM SystemOut hung-thread reports, OpenJDK "Full
//! thread dump" output) into a single weighted call tree suitable for
//! flame-graph rendering.
//!
//! Most users should install and use the CLI:
//!
//! ```bash
//! cargo install stackflame
//! stackflame analyze javacore.20190314.txt -o tree.json
//! ```
//!
//! Library users call [`analyze_dump`] directly and consume the
//! returned [`FlameGraphTree`].

pub mod aggregator;
pub mod commands;
pub mod flamegraph;
pub mod output;
pub mod parser;
pub mod progress;
pub mod utils;

use log::{debug, warn};

// Re-export the types that make up the public entry point
pub use flamegraph::{FlameGraphTree, LeafValuePolicy};
pub use parser::{detect_format, AnalysisSettings, DumpFormat, SkippedLine, StackTrace};
pub use progress::{NullProgress, Phase, ProgressSink, ThrottledProgress};
pub use utils::error::AnalyzeError;

/// Result of a successful dump analysis.
#[derive(Debug)]
pub struct Analysis {
    /// The weighted call tree, ready for rendering
    pub tree: FlameGraphTree,
    /// Which dialect the dump was recognized as
    pub format: DumpFormat,
    /// Lines the dialect parser could not interpret
    pub skipped_lines: Vec<SkippedLine>,
}

/// Analyze raw dump text into a flame graph tree.
///
/// Detects the dialect, parses one call stack per thread, folds the
/// stacks into a prefix tree, and converts that into the weighted call
/// tree. Progress is reported through `progress` at every iteration
/// boundary; the whole computation is synchronous and owns no state
/// beyond this call.
///
/// # Errors
/// * `AnalyzeError::UnrecognizedFormat` - no dialect signature matched
/// * `AnalyzeError::NoUsableData` - a dialect matched but the dump held no stacks
/// * `AnalyzeError::Cancelled` - the progress sink requested cancellation
pub fn analyze_dump(
    text: &str,
    settings: &AnalysisSettings,
    leaf_policy: LeafValuePolicy,
    progress: &mut dyn ProgressSink,
) -> Result<Analysis, AnalyzeError> {
    let format = detect_format(text).ok_or(AnalyzeError::UnrecognizedFormat)?;
    debug!("detected dump format: {:?}", format);

    let parsed = format.parse_dump(text, settings, progress)?;
    if parsed.stacks.is_empty() {
        return Err(AnalyzeError::NoUsableData);
    }
    if !parsed.skipped.is_empty() {
        warn!(
            "{} lines did not match the {:?} grammar",
            parsed.skipped.len(),
            format
        );
    }

    let folded = aggregator::fold_stacks(&parsed.stacks, progress)?;
    let tree = flamegraph::build_flame_graph_tree(&folded, leaf_policy, progress)?;

    Ok(Analysis {
        tree,
        format,
        skipped_lines: parsed.skipped,
    })
}
