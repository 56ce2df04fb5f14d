// BugReportCleaner - app/job.rs
//
// One report in, one cleaned file out.

use crate::core::cleaner::{self, CleanStats};
use crate::core::discovery;
use crate::core::pattern::FilterConfig;
use crate::platform::fs::{self, WriteMode};
use crate::util::error::{CleanerError, Result};
use std::path::PathBuf;
use std::time::Instant;

/// Input/output pair for a single clean.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanJob {
    pub input: PathBuf,
    pub output: PathBuf,
}

impl CleanJob {
    pub fn new(input: PathBuf, output: PathBuf) -> Self {
        Self { input, output }
    }

    /// Job whose output path is derived from the input name
    /// (`bugreport-x.txt` -> `bugreport-x_clean.txt`).
    pub fn for_report(input: PathBuf) -> Self {
        let output = discovery::derive_output_path(&input);
        Self { input, output }
    }

    /// Run the line filter from `input` into `output`.
    ///
    /// Refuses to run when both paths name the same file. On a filter
    /// failure whatever was written before it stays in the output.
    pub fn run(&self, config: &FilterConfig, mode: WriteMode) -> Result<CleanStats> {
        if fs::same_file(&self.input, &self.output) {
            return Err(CleanerError::Usage {
                message: format!(
                    "Output '{}' is the same file as the input",
                    self.output.display()
                ),
            });
        }

        let started = Instant::now();
        let reader = fs::open_input(&self.input)?;
        let writer = fs::open_output(&self.output, mode)?;

        let stats = cleaner::run(reader, writer, config).map_err(|e| CleanerError::Clean {
            path: self.input.clone(),
            source: e,
        })?;

        tracing::info!(
            input = %self.input.display(),
            output = %self.output.display(),
            lines_read = stats.lines_read,
            lines_written = stats.lines_written,
            sessions = stats.sessions,
            gc_dropped = stats.gc_dropped,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Report cleaned"
        );

        Ok(stats)
    }
}
