//! Shared constants for format detection and progress pacing.

use std::time::Duration;

/// Minimum delay between externally visible progress updates
pub const PROGRESS_UPDATE_INTERVAL: Duration = Duration::from_millis(800);

/// Signature of an IBM SystemOut.log "Display Current Environment" header
pub const SYSTEM_OUT_SIGNATURE: &str = "************ Start Display Current Environment";

/// Signature of an IBM javacore text dump
pub const IBM_CORE_SIGNATURE: &str = "0SECTION";

/// Substring required (together with a leading quote) for OpenJDK thread dumps
pub const OPENJDK_TID_MARKER: &str = "tid=";

/// Sentinel prefix for synthetic synchronization-state frames
pub const ANNOTATION_PREFIX: &str = "> ";

/// Synthetic frame recorded for native portions of a stack
pub const NATIVE_FRAME: &str = "[native code]";

/// Name of the synthetic call-tree root
pub const ROOT_NAME: &str = "(root)";
