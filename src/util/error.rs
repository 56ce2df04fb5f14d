// BugReportCleaner - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// All errors preserve the causal chain for diagnostic logging.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all BugReportCleaner operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum CleanerError {
    /// Command-line arguments are missing or inconsistent.
    Usage { message: String },

    /// Filter construction failed (before any file was touched).
    Filter(FilterError),

    /// Report selection in a directory failed.
    Discovery(DiscoveryError),

    /// Configuration loading or validation failed.
    Config(ConfigError),

    /// Cleaning a single report failed part-way through.
    Clean { path: PathBuf, source: FilterError },

    /// I/O error with path context.
    Io {
        path: PathBuf,
        operation: &'static str,
        source: io::Error,
    },
}

impl fmt::Display for CleanerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Usage { message } => write!(f, "{message}"),
            Self::Filter(e) => write!(f, "Filter error: {e}"),
            Self::Discovery(e) => write!(f, "Discovery error: {e}"),
            Self::Config(e) => write!(f, "Configuration error: {e}"),
            Self::Clean { path, source } => {
                write!(f, "Failed to clean '{}': {source}", path.display())
            }
            Self::Io {
                path,
                operation,
                source,
            } => write!(
                f,
                "I/O error during {operation} on '{}': {source}",
                path.display()
            ),
        }
    }
}

impl std::error::Error for CleanerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Usage { .. } => None,
            Self::Filter(e) => Some(e),
            Self::Discovery(e) => Some(e),
            Self::Config(e) => Some(e),
            Self::Clean { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
        }
    }
}

// ---------------------------------------------------------------------------
// Filter errors
// ---------------------------------------------------------------------------

/// Errors raised while building or running the line filter.
#[derive(Debug)]
pub enum FilterError {
    /// The target package name is empty.
    EmptyPackage,

    /// A pattern built from the package name or PID failed to compile.
    InvalidRegex {
        pattern: String,
        source: regex::Error,
    },

    /// A line matched the start pattern but no PID could be read from it.
    PidExtraction { line_number: u64, line: String },

    /// Reading the input stream failed.
    Read { line_number: u64, source: io::Error },

    /// Writing the output stream failed.
    Write { line_number: u64, source: io::Error },
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPackage => write!(f, "target package name must not be empty"),
            Self::InvalidRegex { pattern, source } => {
                write!(f, "invalid pattern '{pattern}': {source}")
            }
            Self::PidExtraction { line_number, line } => write!(
                f,
                "line {line_number}: cannot extract pid from start line '{line}'"
            ),
            Self::Read {
                line_number,
                source,
            } => write!(f, "read failed after line {line_number}: {source}"),
            Self::Write {
                line_number,
                source,
            } => write!(f, "write failed at line {line_number}: {source}"),
        }
    }
}

impl std::error::Error for FilterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidRegex { source, .. } => Some(source),
            Self::Read { source, .. } => Some(source),
            Self::Write { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<FilterError> for CleanerError {
    fn from(e: FilterError) -> Self {
        Self::Filter(e)
    }
}

// ---------------------------------------------------------------------------
// Discovery errors
// ---------------------------------------------------------------------------

/// Errors related to selecting bug reports in a directory.
#[derive(Debug)]
pub enum DiscoveryError {
    /// The directory does not exist or is not accessible.
    RootNotFound { path: PathBuf },

    /// The path is not a directory.
    NotADirectory { path: PathBuf },

    /// The prefix/suffix pair does not form a valid filename pattern.
    InvalidSelection {
        prefix: String,
        suffix: String,
        source: glob::PatternError,
    },

    /// Walkdir traversal error on the directory itself.
    Traversal {
        path: PathBuf,
        source: walkdir::Error,
    },
}

impl fmt::Display for DiscoveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RootNotFound { path } => {
                write!(f, "Report directory '{}' does not exist", path.display())
            }
            Self::NotADirectory { path } => {
                write!(f, "'{}' is not a directory", path.display())
            }
            Self::InvalidSelection {
                prefix,
                suffix,
                source,
            } => write!(
                f,
                "Cannot match reports by prefix '{prefix}' and suffix '{suffix}': {source}"
            ),
            Self::Traversal { path, source } => {
                write!(f, "Error reading '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for DiscoveryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidSelection { source, .. } => Some(source),
            Self::Traversal { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<DiscoveryError> for CleanerError {
    fn from(e: DiscoveryError) -> Self {
        Self::Discovery(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A config value is out of the allowed range.
    ValueOutOfRange {
        field: String,
        value: String,
        expected: String,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::ValueOutOfRange {
                field,
                value,
                expected,
            } => write!(
                f,
                "Config '{field}' = '{value}' is out of range. Expected: {expected}"
            ),
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ConfigError> for CleanerError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Convenience type alias for BugReportCleaner results.
pub type Result<T> = std::result::Result<T, CleanerError>;
