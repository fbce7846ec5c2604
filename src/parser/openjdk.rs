//! OpenJDK / HotSpot thread dump parser.
//!
//! Unlike the IBM dialects, these dumps interleave a quoted thread
//! header, a mandatory state line, a variable-length stack body, and an
//! optional "Locked ownable synchronizers" block per thread. A flat
//! prefix dispatch cannot disambiguate those sections (an `at ` line
//! means different things depending on where it appears), so this
//! parser runs an explicit state machine over trimmed lines.

use regex::Regex;

use super::{flush_stack, skip_line, AnalysisSettings, ParseOutput};
use crate::progress::{Phase, ProgressSink};
use crate::utils::config::{ANNOTATION_PREFIX, NATIVE_FRAME};
use crate::utils::error::AnalyzeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Skipping the leading timestamp / "Full thread dump" header
    Start,
    /// Scanning for the next quoted thread name
    Between,
    /// The line immediately after a thread header (state summary)
    ThreadState,
    /// Accumulating stack frames
    CallStack,
    /// Consuming a "Locked ownable synchronizers" block
    Locks,
}

/// Parse an OpenJDK "Full thread dump" into per-thread stacks.
pub fn parse_dump(
    text: &str,
    settings: &AnalysisSettings,
    progress: &mut dyn ProgressSink,
) -> Result<ParseOutput, AnalyzeError> {
    OpenJdkParser::new(settings).parse(text, progress)
}

struct OpenJdkParser<'a> {
    settings: &'a AnalysisSettings,
    /// Matches the leading `2019-03-14 10:23:45` style date stamp
    date_re: Regex,
    state: State,
    output: ParseOutput,
    current_thread: Option<String>,
    current_stack: Vec<String>,
}

impl<'a> OpenJdkParser<'a> {
    fn new(settings: &'a AnalysisSettings) -> Self {
        Self {
            settings,
            date_re: Regex::new(r"^\d{4}-\d{2}-\d{2}").expect("invalid date regex"),
            state: State::Start,
            output: ParseOutput::default(),
            current_thread: None,
            current_stack: Vec::new(),
        }
    }

    fn parse(
        mut self,
        text: &str,
        progress: &mut dyn ProgressSink,
    ) -> Result<ParseOutput, AnalyzeError> {
        progress.report_phase(Phase::Split, 1);
        let lines: Vec<&str> = text.lines().collect();
        progress.report_progress(1);

        progress.report_phase(Phase::ParseText, lines.len());
        for (i, &line) in lines.iter().enumerate() {
            if progress.is_cancelled() {
                return Err(AnalyzeError::Cancelled);
            }
            progress.report_progress(i);
            self.process_line(i, line.trim());
        }
        progress.report_progress(lines.len());

        flush_stack(
            &mut self.output.stacks,
            self.current_thread.take(),
            &mut self.current_stack,
        );
        Ok(self.output)
    }

    fn process_line(&mut self, index: usize, line: &str) {
        match self.state {
            State::Start => {
                if self.date_re.is_match(line) || line.starts_with("Full thread dump ") {
                    // header noise, stay
                } else {
                    // Not a header: reprocess this same line as Between.
                    self.state = State::Between;
                    self.between(index, line);
                }
            }
            State::Between => self.between(index, line),
            State::ThreadState => {
                // The thread's state summary carries no stack
                // information for this model; consume and move on.
                self.state = State::CallStack;
            }
            State::CallStack => self.call_stack(index, line),
            State::Locks => self.locks(line),
        }
    }

    fn between(&mut self, index: usize, line: &str) {
        if let Some(rest) = line.strip_prefix('"') {
            flush_stack(
                &mut self.output.stacks,
                self.current_thread.take(),
                &mut self.current_stack,
            );
            let name = match rest.find('"') {
                Some(end) => &rest[..end],
                None => rest,
            };
            self.current_thread = Some(name.to_string());
            self.state = State::ThreadState;
        } else if line.is_empty() || line.starts_with("JNI global references:") {
            // stay between threads
        } else {
            skip_line(&mut self.output, index, line);
        }
    }

    fn call_stack(&mut self, index: usize, line: &str) {
        if line.is_empty() {
            // blank lines inside a stack body are absorbed
        } else if line.starts_with('"') {
            // Next thread header; Between will flush and restart.
            self.state = State::Between;
            self.between(index, line);
        } else if line == "(in native)" {
            self.current_stack.push(NATIVE_FRAME.to_string());
        } else if let Some(rest) = line.strip_prefix("on ") {
            if self.settings.include_wait_or_park_annotations {
                self.push_annotation(rest);
            }
        } else if let Some(rest) = line.strip_prefix("at ") {
            // Frame names are kept verbatim, no path normalization.
            self.current_stack.push(rest.to_string());
        } else if line.starts_with("- locked") {
            if self.settings.include_lock_annotations {
                self.push_annotation(line[2..].trim());
            }
        } else if line.starts_with("- parking") || line.starts_with("- waiting") {
            if self.settings.include_wait_or_park_annotations {
                self.push_annotation(line[2..].trim());
            }
        } else if line == "Locked ownable synchronizers:" {
            self.state = State::Locks;
        } else if line.starts_with("JNI global references:") {
            self.state = State::Between;
        } else {
            skip_line(&mut self.output, index, line);
        }
    }

    fn locks(&mut self, line: &str) {
        if line.is_empty() {
            self.state = State::Between;
            return;
        }
        // One bulleted resource per line; "- None" closes an empty block.
        let resource = line.get(1..).unwrap_or("").trim();
        if !resource.is_empty() && resource != "None" && self.settings.include_lock_annotations {
            self.push_annotation(resource);
        }
    }

    fn push_annotation(&mut self, text: &str) {
        self.current_stack
            .push(format!("{}{}", ANNOTATION_PREFIX, text));
    }
}
