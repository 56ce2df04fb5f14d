// BugReportCleaner - core/pattern.rs
//
// Compiled line patterns for one target package.
// Core layer: pure logic, no I/O.
//
// Patterns match raw bytes (`regex::bytes`) so that lines containing invalid
// UTF-8 are still classified and can be emitted byte-for-byte.

use crate::util::error::FilterError;
use regex::bytes::Regex;

/// Recognises Android runtime GC diagnostics, e.g.
/// `GC_CONCURRENT freed 2048K, 45% free 9334K/16903K, paused 2ms+3ms`.
const GC_PATTERN: &str = r"GC_(?:CONCURRENT|FOR_M?ALLOC|EXTERNAL_ALLOC|EXPLICIT) freed <?\d+., \d+% free \d+./\d+., paused \d+ms(?:\+\d+ms)?";

/// Immutable filter configuration: the target package, the GC toggle, and
/// the three patterns compiled from them.
///
/// Built once per invocation and shared by reference between batch workers.
#[derive(Debug, Clone)]
pub struct FilterConfig {
    target_package: String,
    keep_gc_lines: bool,
    start: Regex,
    end: Regex,
    gc: Regex,
}

impl FilterConfig {
    /// Compile the patterns for `target_package`.
    ///
    /// The package name is substituted literally (regex metacharacters such
    /// as `.` are escaped), so `com.example.app` never matches
    /// `com.example.app2` or `comXexampleXapp`.
    pub fn new(target_package: &str, keep_gc_lines: bool) -> Result<Self, FilterError> {
        let target_package = target_package.trim();
        if target_package.is_empty() {
            return Err(FilterError::EmptyPackage);
        }
        let escaped = regex::escape(target_package);

        let start = compile(&format!(
            r"Start proc {escaped} for [a-z]+ [^:]+: pid=([0-9]+) uid=\d+ gids="
        ))?;
        let end = compile(&format!(r"Process {escaped} \(pid \d+\) has died"))?;
        let gc = compile(GC_PATTERN)?;

        tracing::debug!(
            package = target_package,
            keep_gc_lines,
            "Filter patterns compiled"
        );

        Ok(Self {
            target_package: target_package.to_string(),
            keep_gc_lines,
            start,
            end,
            gc,
        })
    }

    pub fn target_package(&self) -> &str {
        &self.target_package
    }

    pub fn keep_gc_lines(&self) -> bool {
        self.keep_gc_lines
    }

    /// `Start proc <pkg> for ...: pid=N uid=N gids=...` anywhere in the line.
    pub fn is_start(&self, line: &[u8]) -> bool {
        self.start.is_match(line)
    }

    /// The digits of the `pid=` field of a start line, or `None` when `line`
    /// is not a start line. Only the field the start pattern matched is
    /// returned; other `pid=` text on the line is ignored.
    pub fn start_pid_field<'l>(&self, line: &'l [u8]) -> Option<&'l [u8]> {
        self.start
            .captures(line)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_bytes())
    }

    /// `Process <pkg> (pid N) has died` anywhere in the line.
    pub fn is_end(&self, line: &[u8]) -> bool {
        self.end.is_match(line)
    }

    pub fn is_gc(&self, line: &[u8]) -> bool {
        self.gc.is_match(line)
    }
}

/// Full-line prefix pattern for log lines emitted by one process:
/// `MM-DD hh:mm:ss.mmm  <pid>  <pid> ...` where both the PID and the TID
/// columns equal the tracked PID.
///
/// Compiled once per tracked PID; callers keep it until the PID changes.
#[derive(Debug, Clone)]
pub struct PidPattern {
    pid: u32,
    regex: Regex,
}

impl PidPattern {
    pub fn new(pid: u32) -> Result<Self, FilterError> {
        let regex = compile(&format!(
            r"^\d+-\d+\s+\d+:\d+:\d+\.\d+\s+{pid}\s+{pid}(?:\s|$)"
        ))?;
        Ok(Self { pid, regex })
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }

    /// True if the line starts with the timestamp and PID/TID prefix.
    /// Anything after the prefix is accepted.
    pub fn matches(&self, line: &[u8]) -> bool {
        self.regex.is_match(line)
    }
}

/// Parse the digits of a `pid=` field. `None` when the value does not fit a
/// `u32`.
pub fn parse_pid(field: &[u8]) -> Option<u32> {
    std::str::from_utf8(field).ok()?.parse().ok()
}

fn compile(pattern: &str) -> Result<Regex, FilterError> {
    Regex::new(pattern).map_err(|e| FilterError::InvalidRegex {
        pattern: pattern.to_string(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const START: &[u8] = b"I/ActivityManager(  378): Start proc com.example.app for activity com.example.app/.Main: pid=1234 uid=10055 gids={3003, 1028}";
    const DIED: &[u8] = b"I/ActivityManager(  378): Process com.example.app (pid 1234) has died.";

    fn config() -> FilterConfig {
        FilterConfig::new("com.example.app", false).unwrap()
    }

    #[test]
    fn test_empty_package_rejected() {
        assert!(matches!(
            FilterConfig::new("   ", false),
            Err(FilterError::EmptyPackage)
        ));
    }

    #[test]
    fn test_start_matches_exact_package_only() {
        let cfg = config();
        assert!(cfg.is_start(START));
        assert!(cfg.is_start(
            b"Start proc com.example.app for activity com.example.app/.Main: pid=1234 uid=10055 gids=3003"
        ));

        let other = FilterConfig::new("com.example", false).unwrap();
        assert!(!other.is_start(START), "prefix of the package must not match");

        let dotted = FilterConfig::new("comXexampleXapp", false).unwrap();
        assert!(!dotted.is_start(START));
        let cfg_wild = FilterConfig::new("com.example.ap", false).unwrap();
        assert!(!cfg_wild.is_start(START));
    }

    #[test]
    fn test_end_matches_with_and_without_trailing_char() {
        let cfg = config();
        assert!(cfg.is_end(DIED));
        assert!(cfg.is_end(b"Process com.example.app (pid 1234) has died"));
        assert!(!cfg.is_end(b"Process com.example.app2 (pid 1234) has died."));
        assert!(!cfg.is_end(START));
    }

    #[test]
    fn test_gc_kinds() {
        let cfg = config();
        for kind in [
            "CONCURRENT",
            "FOR_ALLOC",
            "FOR_MALLOC",
            "EXTERNAL_ALLOC",
            "EXPLICIT",
        ] {
            let line = format!(
                "01-02 03:04:05.678  1234  1234 D dalvikvm: GC_{kind} freed 2048K, 45% free 9334K/16903K, paused 2ms+3ms"
            );
            assert!(cfg.is_gc(line.as_bytes()), "GC_{kind} should match");
        }
        assert!(cfg.is_gc(
            b"GC_FOR_ALLOC freed <1K, 12% free 7000K/7943K, paused 25ms"
        ));
        assert!(!cfg.is_gc(b"GC_BEFORE_OOM freed 1K, 1% free 1K/2K, paused 1ms"));
        assert!(!cfg.is_gc(b"D dalvikvm: nothing to see here"));
    }

    #[test]
    fn test_pid_pattern_requires_pid_and_tid() {
        let p = PidPattern::new(1234).unwrap();
        assert_eq!(p.pid(), 1234);
        assert!(p.matches(b"01-02 03:04:05.678  1234  1234 I MyTag: hello"));
        assert!(p.matches(b"01-02 03:04:05.678 1234 1234"));
        // Different TID.
        assert!(!p.matches(b"01-02 03:04:05.678  1234  1250 I MyTag: worker"));
        // PID as a prefix of a longer number.
        assert!(!p.matches(b"01-02 03:04:05.678  12345  12345 I MyTag: other"));
        assert!(!p.matches(b"01-02 03:04:05.678  1234  12345 I MyTag: other"));
        // Must be anchored at the start of the line.
        assert!(!p.matches(b"noise 01-02 03:04:05.678  1234  1234 I MyTag: x"));
    }

    #[test]
    fn test_pid_pattern_accepts_invalid_utf8_tail() {
        let p = PidPattern::new(7).unwrap();
        let mut line = b"12-31 23:59:59.999     7     7 W Tag: ".to_vec();
        line.extend_from_slice(&[0xff, 0xfe, b'!']);
        assert!(p.matches(&line));
    }

    #[test]
    fn test_start_pid_field_reads_matched_field() {
        let cfg = config();
        assert_eq!(cfg.start_pid_field(START), Some(&b"1234"[..]));
        assert_eq!(cfg.start_pid_field(DIED), None);

        let trailing = b"Start proc com.example.app for activity com.example.app/.Main: pid=1234 uid=10055 gids={3003} caller pid=42 uid=7";
        assert_eq!(cfg.start_pid_field(trailing), Some(&b"1234"[..]));
    }

    #[test]
    fn test_parse_pid() {
        assert_eq!(parse_pid(b"1234"), Some(1234));
        assert_eq!(parse_pid(b"4294967295"), Some(u32::MAX));
        assert_eq!(parse_pid(b"99999999999"), None);
        assert_eq!(parse_pid(b""), None);
    }
}
