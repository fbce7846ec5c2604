//! Dump format detection and the per-dialect parsers.
//!
//! Each supported dialect walks the dump text line by line and recovers
//! one call stack per thread. The dialect set is fixed and enumerable,
//! so detection returns a closed enum dispatched here rather than a
//! trait object.

pub mod ibm_core;
pub mod openjdk;
pub mod system_out;

use log::warn;

use crate::progress::ProgressSink;
use crate::utils::config::{IBM_CORE_SIGNATURE, OPENJDK_TID_MARKER, SYSTEM_OUT_SIGNATURE};
use crate::utils::error::AnalyzeError;

/// Settings controlling which synthetic annotation frames the parsers
/// inject. Immutable for the duration of one parse; these two flags are
/// the only settings the parsing core reads.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalysisSettings {
    /// Inject "waiting on" / "parked" frames into stacks
    pub include_wait_or_park_annotations: bool,
    /// Inject "locked" / "entered lock" frames into stacks
    pub include_lock_annotations: bool,
}

/// One thread's call stack as listed in the dump text.
///
/// Frames are stored in the order the dialect printed them, which is
/// innermost-first; the aggregator reverses them into caller-to-callee
/// order when folding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackTrace {
    /// Opaque thread identifier, `None` when the dump does not name one
    pub thread: Option<String>,
    pub frames: Vec<String>,
}

/// A line a recognized dialect could not interpret.
///
/// Dumps are frequently slightly malformed or carry runtime-specific
/// extensions, so these are skipped with a warning rather than failing
/// the parse, and collected so callers can inspect coverage gaps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    /// 1-based line number in the input text
    pub line_number: usize,
    pub content: String,
}

/// Everything a dialect parser extracts from a dump.
#[derive(Debug, Default)]
pub struct ParseOutput {
    pub stacks: Vec<StackTrace>,
    pub skipped: Vec<SkippedLine>,
}

/// The supported dump dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DumpFormat {
    /// IBM javacore text dump
    IbmCoreDump,
    /// IBM WebSphere SystemOut.log hung-thread report
    IbmSystemOut,
    /// OpenJDK / HotSpot "Full thread dump" output
    OpenJdk,
}

impl DumpFormat {
    /// Run this dialect's parser over the dump text.
    pub fn parse_dump(
        self,
        text: &str,
        settings: &AnalysisSettings,
        progress: &mut dyn ProgressSink,
    ) -> Result<ParseOutput, AnalyzeError> {
        match self {
            DumpFormat::IbmCoreDump => ibm_core::parse_dump(text, settings, progress),
            DumpFormat::IbmSystemOut => system_out::parse_dump(text, settings, progress),
            DumpFormat::OpenJdk => openjdk::parse_dump(text, settings, progress),
        }
    }
}

/// Identify which dialect produced the dump text.
///
/// Rules are checked in order and the first match wins: an input that
/// opens with `0SECTION` is an IBM core dump even if it also contains
/// `tid=` further down. Only prefix and substring probes are used, no
/// per-line iteration.
pub fn detect_format(text: &str) -> Option<DumpFormat> {
    if text.starts_with(SYSTEM_OUT_SIGNATURE) {
        Some(DumpFormat::IbmSystemOut)
    } else if text.starts_with(IBM_CORE_SIGNATURE) {
        Some(DumpFormat::IbmCoreDump)
    } else if text.starts_with('"') && text.contains(OPENJDK_TID_MARKER) {
        Some(DumpFormat::OpenJdk)
    } else {
        None
    }
}

/// Record a line that did not match the dialect grammar.
pub(crate) fn skip_line(out: &mut ParseOutput, line_index: usize, line: &str) {
    warn!("skipping unrecognized line {}: {}", line_index + 1, line);
    out.skipped.push(SkippedLine {
        line_number: line_index + 1,
        content: line.to_string(),
    });
}

/// Complete the in-progress stack, if it has any frames.
///
/// Empty frame lists are never flushed; a dump whose threads all carry
/// empty bodies degrades to the NoUsableData outcome instead of
/// producing degenerate tree nodes.
pub(crate) fn flush_stack(
    stacks: &mut Vec<StackTrace>,
    thread: Option<String>,
    frames: &mut Vec<String>,
) {
    if !frames.is_empty() {
        stacks.push(StackTrace {
            thread,
            frames: std::mem::take(frames),
        });
    }
}
