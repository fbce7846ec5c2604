//! IBM javacore ("core dump") parser.
//!
//! Javacore files tag every line with a section code, so a flat prefix
//! dispatch is enough. Only four tags carry stack-relevant content;
//! everything else (3XMJAVALTHREAD, 3XMTHREADINFO1/2, 3XMCPUTIME,
//! 3XMHEAPALLOC, ...) is ignored. The trailing space in each tag
//! matters: it keeps `3XMTHREADINFO1` from matching the thread marker.

use regex::Regex;

use super::{flush_stack, skip_line, AnalysisSettings, ParseOutput, StackTrace};
use crate::progress::{Phase, ProgressSink};
use crate::utils::config::ANNOTATION_PREFIX;
use crate::utils::error::AnalyzeError;

const THREAD_INFO_TAG: &str = "3XMTHREADINFO ";
const STACK_FRAME_TAG: &str = "4XESTACKTRACE ";
const THREAD_BLOCK_TAG: &str = "3XMTHREADBLOCK ";
const LOCK_FRAME_TAG: &str = "5XESTACKTRACE ";

/// Parse an IBM javacore dump into per-thread stacks.
pub fn parse_dump(
    text: &str,
    settings: &AnalysisSettings,
    progress: &mut dyn ProgressSink,
) -> Result<ParseOutput, AnalyzeError> {
    IbmCoreParser::new().parse(text, settings, progress)
}

struct IbmCoreParser {
    /// Matches `4XESTACKTRACE    at com/ibm/Foo.bar(Foo.java:42)`
    frame_re: Regex,
    /// Generic "tag + optional-paren-wrapped text" grammar shared by
    /// the annotation-carrying tags
    annotation_re: Regex,
}

impl IbmCoreParser {
    fn new() -> Self {
        Self {
            frame_re: Regex::new(r"^4XESTACKTRACE\s*at ([^(]+)").expect("invalid frame regex"),
            annotation_re: Regex::new(r"^[0-9A-Z]*\s*\(?(.+)\)?$")
                .expect("invalid annotation regex"),
        }
    }

    fn parse(
        &self,
        text: &str,
        settings: &AnalysisSettings,
        progress: &mut dyn ProgressSink,
    ) -> Result<ParseOutput, AnalyzeError> {
        progress.report_phase(Phase::Split, 1);
        let lines: Vec<&str> = text.lines().collect();
        progress.report_progress(1);

        progress.report_phase(Phase::ParseText, lines.len());

        let mut out = ParseOutput::default();
        let mut current_thread: Option<String> = None;
        let mut current_stack: Vec<String> = Vec::new();

        for (i, &line) in lines.iter().enumerate() {
            if progress.is_cancelled() {
                return Err(AnalyzeError::Cancelled);
            }
            progress.report_progress(i);

            if line.starts_with(THREAD_INFO_TAG) {
                // The thread context only advances once a stack has
                // accumulated, so the first thread's identifier stays
                // unknown. Historical behavior, kept as-is.
                if !current_stack.is_empty() {
                    out.stacks.push(StackTrace {
                        thread: current_thread.take(),
                        frames: std::mem::take(&mut current_stack),
                    });
                    current_thread = Some(line.to_string());
                }
            } else if line.starts_with(STACK_FRAME_TAG) {
                match self.frame_re.captures(line) {
                    Some(caps) => current_stack.push(caps[1].replace('/', ".")),
                    None => skip_line(&mut out, i, line),
                }
            } else if line.starts_with(THREAD_BLOCK_TAG) {
                if settings.include_wait_or_park_annotations {
                    self.push_annotation(&mut out, &mut current_stack, i, line);
                }
            } else if line.starts_with(LOCK_FRAME_TAG) {
                if settings.include_lock_annotations {
                    self.push_annotation(&mut out, &mut current_stack, i, line);
                }
            }
        }
        progress.report_progress(lines.len());

        flush_stack(&mut out.stacks, current_thread, &mut current_stack);
        Ok(out)
    }

    fn push_annotation(
        &self,
        out: &mut ParseOutput,
        stack: &mut Vec<String>,
        line_index: usize,
        line: &str,
    ) {
        match self.annotation_re.captures(line) {
            Some(caps) => stack.push(format!("{}{}", ANNOTATION_PREFIX, &caps[1])),
            None => skip_line(out, line_index, line),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::NullProgress;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_frames_are_dot_normalized() {
        let text = concat!(
            "0SECTION       TITLE subcomponent dump routine\n",
            "3XMTHREADINFO      \"main\" J9VMThread:0x0000000000144C00\n",
            "4XESTACKTRACE          at java/lang/Object.wait(Native Method)\n",
            "4XESTACKTRACE          at com/example/Worker.run(Worker.java:42)\n",
        );
        let out = parse_dump(text, &AnalysisSettings::default(), &mut NullProgress).unwrap();
        assert_eq!(out.stacks.len(), 1);
        assert_eq!(
            out.stacks[0].frames,
            vec!["java.lang.Object.wait", "com.example.Worker.run"]
        );
    }

    #[test]
    fn test_thread_marker_flushes_previous_stack() {
        let text = concat!(
            "3XMTHREADINFO      \"main\" J9VMThread:0x144C00\n",
            "4XESTACKTRACE          at com/example/A.a(A.java:1)\n",
            "3XMTHREADINFO      \"worker-1\" J9VMThread:0x145800\n",
            "4XESTACKTRACE          at com/example/B.b(B.java:2)\n",
        );
        let out = parse_dump(text, &AnalysisSettings::default(), &mut NullProgress).unwrap();
        assert_eq!(out.stacks.len(), 2);
        // First stack predates any flush, so its thread is unknown.
        assert_eq!(out.stacks[0].thread, None);
        assert!(out.stacks[1]
            .thread
            .as_deref()
            .unwrap()
            .contains("worker-1"));
    }

    #[test]
    fn test_annotations_are_gated_by_settings() {
        let text = concat!(
            "3XMTHREADINFO      \"main\" J9VMThread:0x144C00\n",
            "4XESTACKTRACE          at com/example/A.a(A.java:1)\n",
            "3XMTHREADBLOCK     Blocked on: java/lang/Object@0x00000000E0034530\n",
            "5XESTACKTRACE                   (entered lock: com/example/B@0x00000000E0034600, entry count: 1)\n",
        );

        let out = parse_dump(text, &AnalysisSettings::default(), &mut NullProgress).unwrap();
        assert_eq!(out.stacks[0].frames.len(), 1);

        let settings = AnalysisSettings {
            include_wait_or_park_annotations: true,
            include_lock_annotations: true,
        };
        let out = parse_dump(text, &settings, &mut NullProgress).unwrap();
        assert_eq!(out.stacks[0].frames.len(), 3);
        assert_eq!(
            out.stacks[0].frames[1],
            "> Blocked on: java/lang/Object@0x00000000E0034530"
        );
        assert!(out.stacks[0].frames[2].starts_with("> entered lock:"));
    }

    #[test]
    fn test_header_only_dump_yields_no_stacks() {
        let out = parse_dump(
            "0SECTION       TITLE subcomponent dump routine\n",
            &AnalysisSettings::default(),
            &mut NullProgress,
        )
        .unwrap();
        assert!(out.stacks.is_empty());
    }

    #[test]
    fn test_malformed_frame_line_is_collected() {
        let text = concat!(
            "4XESTACKTRACE          at com/example/A.a(A.java:1)\n",
            "4XESTACKTRACE          garbage with no frame\n",
        );
        let out = parse_dump(text, &AnalysisSettings::default(), &mut NullProgress).unwrap();
        assert_eq!(out.stacks[0].frames.len(), 1);
        assert_eq!(out.skipped.len(), 1);
        assert_eq!(out.skipped[0].line_number, 2);
    }
}
