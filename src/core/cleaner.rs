// BugReportCleaner - core/cleaner.rs
//
// Line-by-line classification of a bug report for one target process.
// Core layer: reads any BufRead, writes any Write. No filesystem access.
//
// State machine per input line (first matching rule wins):
//   1. Idle     + start line          -> extract pid, emit, start tracking
//   2. Tracking + not end + pid line  -> emit (unless GC noise is dropped)
//   3. Tracking + end line            -> emit, emit separator, back to Idle
//   4. anything else                  -> drop
//
// A second start line while tracking has no transition: the current session
// is kept and the line is dropped unless it happens to carry the tracked
// PID/TID prefix.

use crate::core::pattern::{self, FilterConfig, PidPattern};
use crate::util::constants;
use crate::util::error::FilterError;
use std::io::{BufRead, Write};

/// Whether a process session is currently open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanState {
    #[default]
    Idle,
    Tracking { pid: u32 },
}

impl ScanState {
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Tracking { .. })
    }

    pub fn tracked_pid(&self) -> Option<u32> {
        match self {
            Self::Idle => None,
            Self::Tracking { pid } => Some(*pid),
        }
    }
}

/// Outcome of classifying a single line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Not part of the tracked process.
    Drop,
    /// Part of the tracked process but GC noise, and GC lines are not kept.
    DropGc,
    /// Emit the line.
    Keep,
    /// Emit the line followed by the session separator.
    KeepAndCloseSession,
}

/// Counters for one run over one input stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanStats {
    pub lines_read: u64,
    pub lines_written: u64,
    /// Sessions closed by an end line.
    pub sessions: u64,
    pub gc_dropped: u64,
}

/// Stateful classifier for one input stream.
///
/// State never crosses streams: create one `LineFilter` per file.
pub struct LineFilter<'a> {
    config: &'a FilterConfig,
    state: ScanState,
    /// Compiled pattern for the most recently tracked PID. Survives the end
    /// of a session so a restart with the same PID does not recompile.
    pid_pattern: Option<PidPattern>,
}

impl<'a> LineFilter<'a> {
    pub fn new(config: &'a FilterConfig) -> Self {
        Self {
            config,
            state: ScanState::Idle,
            pid_pattern: None,
        }
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    /// Classify one line (without its terminator) and advance the state.
    ///
    /// `line_number` is 1-based and only used for error reporting.
    pub fn classify(&mut self, line: &[u8], line_number: u64) -> Result<Verdict, FilterError> {
        match self.state {
            ScanState::Idle => {
                let Some(field) = self.config.start_pid_field(line) else {
                    return Ok(Verdict::Drop);
                };
                let pid = pattern::parse_pid(field).ok_or_else(|| FilterError::PidExtraction {
                    line_number,
                    line: preview(line),
                })?;
                self.track(pid)?;
                tracing::debug!(pid, line_number, "Process session started");
                Ok(Verdict::Keep)
            }
            ScanState::Tracking { pid } => {
                if self.config.is_end(line) {
                    self.state = ScanState::Idle;
                    tracing::debug!(pid, line_number, "Process session ended");
                    return Ok(Verdict::KeepAndCloseSession);
                }
                if !self.pid_line(line) {
                    if self.config.is_start(line) {
                        tracing::debug!(
                            pid,
                            line_number,
                            "Start line while a session is open; keeping current session"
                        );
                    }
                    return Ok(Verdict::Drop);
                }
                if !self.config.keep_gc_lines() && self.config.is_gc(line) {
                    return Ok(Verdict::DropGc);
                }
                Ok(Verdict::Keep)
            }
        }
    }

    fn track(&mut self, pid: u32) -> Result<(), FilterError> {
        let cached = self.pid_pattern.as_ref().is_some_and(|p| p.pid() == pid);
        if !cached {
            self.pid_pattern = Some(PidPattern::new(pid)?);
        }
        self.state = ScanState::Tracking { pid };
        Ok(())
    }

    fn pid_line(&self, line: &[u8]) -> bool {
        self.pid_pattern.as_ref().is_some_and(|p| p.matches(line))
    }
}

/// Filter `input` into `output` for the package in `config`.
///
/// Every emitted line is written unchanged followed by `\n`, whatever the
/// input terminator was. Output is flushed before returning. On error the
/// lines already written stay written.
pub fn run<R, W>(mut input: R, mut output: W, config: &FilterConfig) -> Result<CleanStats, FilterError>
where
    R: BufRead,
    W: Write,
{
    let separator = constants::SESSION_SEPARATOR_CHAR
        .to_string()
        .repeat(constants::SESSION_SEPARATOR_WIDTH);

    let mut filter = LineFilter::new(config);
    let mut stats = CleanStats::default();
    let mut buf: Vec<u8> = Vec::with_capacity(256);

    loop {
        buf.clear();
        let read = input
            .read_until(b'\n', &mut buf)
            .map_err(|e| FilterError::Read {
                line_number: stats.lines_read,
                source: e,
            })?;
        if read == 0 {
            break;
        }
        stats.lines_read += 1;
        let line_number = stats.lines_read;
        let line = strip_terminator(&buf);

        let write_err = |e: std::io::Error| FilterError::Write {
            line_number,
            source: e,
        };

        match filter.classify(line, line_number)? {
            Verdict::Drop => {}
            Verdict::DropGc => stats.gc_dropped += 1,
            Verdict::Keep => {
                write_line(&mut output, line).map_err(write_err)?;
                stats.lines_written += 1;
            }
            Verdict::KeepAndCloseSession => {
                write_line(&mut output, line).map_err(write_err)?;
                write_line(&mut output, separator.as_bytes()).map_err(write_err)?;
                stats.lines_written += 2;
                stats.sessions += 1;
            }
        }
    }

    output.flush().map_err(|e| FilterError::Write {
        line_number: stats.lines_read,
        source: e,
    })?;

    if let Some(pid) = filter.state().tracked_pid() {
        tracing::debug!(pid, "Input ended with a session still open");
    }

    Ok(stats)
}

fn write_line<W: Write>(output: &mut W, line: &[u8]) -> std::io::Result<()> {
    output.write_all(line)?;
    output.write_all(constants::LINE_TERMINATOR)
}

/// Remove a trailing `\n` or `\r\n`.
fn strip_terminator(buf: &[u8]) -> &[u8] {
    let line = buf.strip_suffix(b"\n").unwrap_or(buf);
    line.strip_suffix(b"\r").unwrap_or(line)
}

/// Lossy, length-capped rendering of a line for error messages.
fn preview(line: &[u8]) -> String {
    String::from_utf8_lossy(line)
        .chars()
        .take(constants::DEBUG_MAX_LINE_PREVIEW)
        .collect()
}
