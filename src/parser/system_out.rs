//! IBM WebSphere SystemOut.log hung-thread report parser.
//!
//! The ThreadMonitor WSVR0605W warning introduces each hung thread and
//! is followed by a plain Java stack listing. Any other line ends the
//! listing; that accounts for footer text and blank separators between
//! reports.

use regex::Regex;

use super::{flush_stack, skip_line, AnalysisSettings, ParseOutput};
use crate::progress::{Phase, ProgressSink};
use crate::utils::error::AnalyzeError;

/// Parse an IBM SystemOut.log hang report into per-thread stacks.
///
/// SystemOut listings carry no synchronization annotations, so the
/// settings flags have no effect on this dialect.
pub fn parse_dump(
    text: &str,
    _settings: &AnalysisSettings,
    progress: &mut dyn ProgressSink,
) -> Result<ParseOutput, AnalyzeError> {
    SystemOutParser::new().parse(text, progress)
}

struct SystemOutParser {
    hung_thread_re: Regex,
    frame_re: Regex,
}

impl SystemOutParser {
    fn new() -> Self {
        Self {
            hung_thread_re: Regex::new(
                r#"ThreadMonitor W   WSVR0605W: Thread "[^"]+" \([0-9a-z]+\) has been active for [0-9]+ milliseconds and may be hung"#,
            )
            .expect("invalid hung-thread regex"),
            frame_re: Regex::new(r"\s*at ([^(]+)").expect("invalid frame regex"),
        }
    }

    fn parse(
        &self,
        text: &str,
        progress: &mut dyn ProgressSink,
    ) -> Result<ParseOutput, AnalyzeError> {
        progress.report_phase(Phase::Split, 1);
        let lines: Vec<&str> = text.lines().collect();
        progress.report_progress(1);

        progress.report_phase(Phase::ParseText, lines.len());

        let mut out = ParseOutput::default();
        let mut current_thread: Option<String> = None;
        let mut current_stack: Vec<String> = Vec::new();
        let mut inside_hung_stack = false;

        for (i, &line) in lines.iter().enumerate() {
            if progress.is_cancelled() {
                return Err(AnalyzeError::Cancelled);
            }
            progress.report_progress(i);

            if self.hung_thread_re.is_match(line) {
                if inside_hung_stack {
                    flush_stack(&mut out.stacks, current_thread.take(), &mut current_stack);
                    current_thread = Some(line.to_string());
                }
                inside_hung_stack = true;
            } else if inside_hung_stack {
                if line.starts_with("\tat") {
                    match self.frame_re.captures(line) {
                        Some(caps) => current_stack.push(caps[1].replace('/', ".")),
                        None => skip_line(&mut out, i, line),
                    }
                } else {
                    // Footer or blank line: the stack listing is over.
                    flush_stack(&mut out.stacks, current_thread.take(), &mut current_stack);
                    inside_hung_stack = false;
                }
            }
        }
        progress.report_progress(lines.len());

        if inside_hung_stack {
            flush_stack(&mut out.stacks, current_thread, &mut current_stack);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::NullProgress;
    use pretty_assertions::assert_eq;

    const REPORT: &str = concat!(
        "************ Start Display Current Environment ************\n",
        "WebSphere Platform 8.5.5.18 running with process name cell\\node\\server1\n",
        "************* End Display Current Environment *************\n",
        "[3/14/19 10:23:45:678 GMT] 00000054 ThreadMonitor W   WSVR0605W: Thread \"WebContainer : 2\" (00000041) has been active for 653080 milliseconds and may be hung.  There is/are 1 thread(s) in total in the server that may be hung.\n",
        "\tat java/net/SocketInputStream.socketRead0(Native Method)\n",
        "\tat java/net/SocketInputStream.read(SocketInputStream.java:161)\n",
        "\tat com/example/dao/CustomerDao.query(CustomerDao.java:88)\n",
        "[3/14/19 10:23:45:912 GMT] 00000054 ThreadMonitor W   WSVR0605W: Thread \"WebContainer : 5\" (00000049) has been active for 612003 milliseconds and may be hung.  There is/are 2 thread(s) in total in the server that may be hung.\n",
        "\tat java/lang/Object.wait(Native Method)\n",
        "\tat com/example/pool/ConnectionPool.acquire(ConnectionPool.java:120)\n",
        "[3/14/19 10:24:02:004 GMT] 00000055 SystemOut     O request served\n",
    );

    #[test]
    fn test_extracts_one_stack_per_hang_block() {
        let out = parse_dump(REPORT, &AnalysisSettings::default(), &mut NullProgress).unwrap();
        assert_eq!(out.stacks.len(), 2);
        assert_eq!(
            out.stacks[0].frames,
            vec![
                "java.net.SocketInputStream.socketRead0",
                "java.net.SocketInputStream.read",
                "com.example.dao.CustomerDao.query",
            ]
        );
        assert_eq!(out.stacks[1].frames.len(), 2);
    }

    #[test]
    fn test_second_block_is_keyed_by_its_delimiter_line() {
        let out = parse_dump(REPORT, &AnalysisSettings::default(), &mut NullProgress).unwrap();
        assert_eq!(out.stacks[0].thread, None);
        assert!(out.stacks[1]
            .thread
            .as_deref()
            .unwrap()
            .contains("WebContainer : 5"));
    }

    #[test]
    fn test_end_of_input_flushes_open_block() {
        let text = concat!(
            "[3/14/19 10:23:45:678 GMT] 00000054 ThreadMonitor W   WSVR0605W: Thread \"T\" (0000001a) has been active for 100 milliseconds and may be hung.\n",
            "\tat com/example/A.a(A.java:1)\n",
        );
        let out = parse_dump(text, &AnalysisSettings::default(), &mut NullProgress).unwrap();
        assert_eq!(out.stacks.len(), 1);
        assert_eq!(out.stacks[0].frames, vec!["com.example.A.a"]);
    }

    #[test]
    fn test_lines_outside_hang_blocks_are_ignored() {
        let text = concat!(
            "************ Start Display Current Environment ************\n",
            "Host Operating System is Linux\n",
        );
        let out = parse_dump(text, &AnalysisSettings::default(), &mut NullProgress).unwrap();
        assert!(out.stacks.is_empty());
        assert!(out.skipped.is_empty());
    }
}
