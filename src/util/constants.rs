// BugReportCleaner - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "BugReportCleaner";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "BugReportCleaner";

/// Current application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Report file naming
// =============================================================================

/// Filenames must start with this prefix to be picked up in directory mode.
pub const BUG_REPORT_PREFIX: &str = "bugreport";

/// Extension shared by bug reports and their cleaned outputs.
pub const TXT_SUFFIX: &str = ".txt";

/// Replaces `TXT_SUFFIX` when deriving an output path from an input path.
pub const CLEAN_TXT_SUFFIX: &str = "_clean.txt";

// =============================================================================
// Output format
// =============================================================================

/// Width of the dashed line written after each process session.
pub const SESSION_SEPARATOR_WIDTH: usize = 68;

/// Character repeated to build the session separator.
pub const SESSION_SEPARATOR_CHAR: char = '-';

/// Line terminator appended to every emitted line, regardless of platform
/// or of the terminator used by the input.
pub const LINE_TERMINATOR: &[u8] = b"\n";

/// Maximum length of a log line included in debug output.
pub const DEBUG_MAX_LINE_PREVIEW: usize = 200;

// =============================================================================
// Batch limits
// =============================================================================

/// Default number of batch worker threads. 0 means one per CPU core.
pub const DEFAULT_WORKER_THREADS: usize = 0;

/// Hard upper bound on batch worker threads (prevents configuration mistakes).
pub const MAX_WORKER_THREADS: usize = 256;

// =============================================================================
// Process exit codes
// =============================================================================

/// Exit status for missing or malformed command-line arguments.
pub const EXIT_USAGE: i32 = 6;

/// Exit status when one or more reports could not be cleaned.
pub const EXIT_FAILURE: i32 = 1;

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Log levels accepted in `[logging] level`.
pub const VALID_LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";
