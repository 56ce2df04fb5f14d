// BugReportCleaner - core/discovery.rs
//
// Selection of bug-report files in a directory and output path derivation.
//
// Only the top level of the directory is examined. Reads metadata only,
// never file contents.
//
// Per-entry I/O errors are non-fatal and collected as warnings; only an
// invalid root returns Err.

use crate::util::constants;
use crate::util::error::DiscoveryError;
use std::path::{Path, PathBuf};

// =============================================================================
// Configuration
// =============================================================================

/// Which files in a directory count as bug reports.
#[derive(Debug, Clone)]
pub struct ReportSelection {
    /// Filenames must start with this.
    pub prefix: String,

    /// Filenames must end with this.
    pub suffix: String,

    /// Skip files that already carry the cleaned-output suffix, so a second
    /// pass over a directory does not clean its own outputs.
    pub skip_cleaned: bool,
}

impl Default for ReportSelection {
    fn default() -> Self {
        Self {
            prefix: constants::BUG_REPORT_PREFIX.to_string(),
            suffix: constants::TXT_SUFFIX.to_string(),
            skip_cleaned: true,
        }
    }
}

impl ReportSelection {
    /// `<prefix>*<suffix>` with both literal parts escaped.
    fn compile(&self) -> Result<glob::Pattern, glob::PatternError> {
        glob::Pattern::new(&format!(
            "{}*{}",
            glob::Pattern::escape(&self.prefix),
            glob::Pattern::escape(&self.suffix)
        ))
    }
}

// =============================================================================
// Discovery
// =============================================================================

/// List the bug reports directly inside `root`, sorted by path.
///
/// Returns the accepted paths and human-readable warnings for entries that
/// could not be inspected.
pub fn select_reports(
    root: &Path,
    selection: &ReportSelection,
) -> Result<(Vec<PathBuf>, Vec<String>), DiscoveryError> {
    match std::fs::metadata(root) {
        Ok(meta) if meta.is_dir() => {}
        Ok(_) => {
            return Err(DiscoveryError::NotADirectory {
                path: root.to_path_buf(),
            })
        }
        Err(_) => {
            return Err(DiscoveryError::RootNotFound {
                path: root.to_path_buf(),
            })
        }
    }

    let pattern = selection
        .compile()
        .map_err(|source| DiscoveryError::InvalidSelection {
            prefix: selection.prefix.clone(),
            suffix: selection.suffix.clone(),
            source,
        })?;
    tracing::debug!(
        root = %root.display(),
        pattern = pattern.as_str(),
        skip_cleaned = selection.skip_cleaned,
        "Report selection starting"
    );

    let mut reports: Vec<PathBuf> = Vec::new();
    let mut warnings: Vec<String> = Vec::new();

    let walker = walkdir::WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true);

    for entry_result in walker {
        let entry = match entry_result {
            Ok(e) => e,
            Err(e) if e.depth() == 0 => {
                return Err(DiscoveryError::Traversal {
                    path: root.to_path_buf(),
                    source: e,
                });
            }
            Err(e) => {
                let path_str = e
                    .path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "<unknown>".to_string());
                let msg = format!("Cannot access '{path_str}': {e}");
                tracing::debug!(warning = %msg, "Discovery warning");
                warnings.push(msg);
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let file_name = match path.file_name().and_then(|n| n.to_str()) {
            Some(n) => n,
            None => {
                warnings.push(format!("Skipping '{}': non-UTF-8 filename", path.display()));
                continue;
            }
        };

        if !pattern.matches(file_name) {
            tracing::trace!(file = file_name, "Not a bug report");
            continue;
        }
        if selection.skip_cleaned && file_name.ends_with(constants::CLEAN_TXT_SUFFIX) {
            tracing::trace!(file = file_name, "Already a cleaned output");
            continue;
        }

        reports.push(path.to_path_buf());
    }

    reports.sort();

    tracing::debug!(
        reports = reports.len(),
        warnings = warnings.len(),
        "Report selection complete"
    );

    Ok((reports, warnings))
}

/// Output path for `input`: a trailing `.txt` becomes `_clean.txt`; any
/// other name gets `_clean.txt` appended.
pub fn derive_output_path(input: &Path) -> PathBuf {
    let Some(name) = input.file_name().and_then(|n| n.to_str()) else {
        let mut raw = input.as_os_str().to_os_string();
        raw.push(constants::CLEAN_TXT_SUFFIX);
        return PathBuf::from(raw);
    };
    let stem = name.strip_suffix(constants::TXT_SUFFIX).unwrap_or(name);
    input.with_file_name(format!("{stem}{}", constants::CLEAN_TXT_SUFFIX))
}

// =============================================================================
// Tests
// =============================================================================
