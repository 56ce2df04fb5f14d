// BugReportCleaner - platform/config.rs
//
// Platform config directory resolution and config.toml loading with
// validation against named constants.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Default location of config.toml, if platform directories can be resolved.
pub fn default_config_path() -> Option<PathBuf> {
    let proj_dirs = ProjectDirs::from("", "", constants::APP_ID)?;
    let path = proj_dirs.config_dir().join(constants::CONFIG_FILE_NAME);
    tracing::debug!(path = %path.display(), "Default config path resolved");
    Some(path)
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[logging]` section.
    pub logging: LoggingSection,
    /// `[batch]` section.
    pub batch: BatchSection,
    /// `[output]` section.
    pub output: OutputSection,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
}

/// `[batch]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct BatchSection {
    /// Worker threads for directory mode (0 = one per core).
    pub worker_threads: Option<usize>,
    /// Skip `*_clean.txt` files when selecting reports.
    pub skip_cleaned: Option<bool>,
}

/// `[output]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct OutputSection {
    /// Truncate output files instead of appending to them.
    pub truncate: Option<bool>,
}

/// Validated application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
    /// Batch worker threads; 0 means one per core.
    pub worker_threads: usize,
    /// Skip already-cleaned outputs in directory mode.
    pub skip_cleaned: bool,
    /// Truncate instead of append.
    pub truncate_output: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: None,
            worker_threads: constants::DEFAULT_WORKER_THREADS,
            skip_cleaned: true,
            truncate_output: false,
        }
    }
}

/// Load and validate the config file at `path`.
///
/// A missing file yields defaults with no warnings. A file that exists but
/// cannot be read or parsed is an error; the caller decides whether that is
/// fatal. Out-of-range values become warnings and fall back to defaults.
pub fn load_config(path: &Path) -> Result<(AppConfig, Vec<String>), ConfigError> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "No config.toml found; using defaults");
        return Ok((AppConfig::default(), Vec::new()));
    }

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let raw: RawConfig = toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
        path: path.to_path_buf(),
        source: e,
    })?;

    tracing::debug!(path = %path.display(), "Loaded config.toml");
    Ok(validate(raw))
}

/// Validate each field against named constants, accumulating all warnings.
pub fn validate(raw: RawConfig) -> (AppConfig, Vec<String>) {
    let mut config = AppConfig::default();
    let mut warnings: Vec<String> = Vec::new();

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        if constants::VALID_LOG_LEVELS.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.to_lowercase());
        } else {
            warnings.push(out_of_range(
                "logging.level",
                level,
                "one of error, warn, info, debug, trace",
            ));
        }
    }

    // -- Batch: worker_threads --
    if let Some(threads) = raw.batch.worker_threads {
        if threads <= constants::MAX_WORKER_THREADS {
            config.worker_threads = threads;
        } else {
            warnings.push(out_of_range(
                "batch.worker_threads",
                &threads.to_string(),
                &format!("0-{} (0 = one per core)", constants::MAX_WORKER_THREADS),
            ));
        }
    }

    if let Some(skip) = raw.batch.skip_cleaned {
        config.skip_cleaned = skip;
    }

    if let Some(truncate) = raw.output.truncate {
        config.truncate_output = truncate;
    }

    (config, warnings)
}

fn out_of_range(field: &str, value: &str, expected: &str) -> String {
    let err = ConfigError::ValueOutOfRange {
        field: field.to_string(),
        value: value.to_string(),
        expected: expected.to_string(),
    };
    format!("{err}. Using default.")
}
