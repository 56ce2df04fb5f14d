// BugReportCleaner - app/batch.rs
//
// Directory mode: select every bug report in a directory and clean each one
// on a rayon worker pool.
//
// Jobs share only the immutable `FilterConfig`. Each job owns its streams
// and its scan state, so a failure in one never touches its siblings; all
// outcomes are collected and reported together.

use crate::app::job::CleanJob;
use crate::core::cleaner::CleanStats;
use crate::core::discovery::{self, ReportSelection};
use crate::core::pattern::FilterConfig;
use crate::platform::fs::WriteMode;
use crate::util::constants;
use crate::util::error::{CleanerError, Result};
use rayon::prelude::*;
use std::path::Path;
use std::time::Instant;

/// Result of one job in a batch.
#[derive(Debug)]
pub struct FileOutcome {
    pub job: CleanJob,
    pub result: Result<CleanStats>,
}

/// All outcomes of a batch, in report path order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<FileOutcome>,
    /// Non-fatal problems met while selecting reports.
    pub warnings: Vec<String>,
}

impl BatchReport {
    /// First failure in report path order, if any.
    pub fn first_error(&self) -> Option<&CleanerError> {
        self.outcomes.iter().find_map(|o| o.result.as_ref().err())
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    /// Sum of the statistics of all successful jobs.
    pub fn totals(&self) -> CleanStats {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok())
            .fold(CleanStats::default(), |acc, s| CleanStats {
                lines_read: acc.lines_read + s.lines_read,
                lines_written: acc.lines_written + s.lines_written,
                sessions: acc.sessions + s.sessions,
                gc_dropped: acc.gc_dropped + s.gc_dropped,
            })
    }
}

/// Cleans every report in a directory in parallel.
#[derive(Debug, Clone, Default)]
pub struct BatchRunner {
    pub selection: ReportSelection,
    /// 0 means one thread per core.
    pub worker_threads: usize,
    pub write_mode: WriteMode,
}

impl BatchRunner {
    /// Select the reports in `dir` and clean them all.
    ///
    /// Returns `Err` only if the directory itself cannot be listed; per-file
    /// failures are recorded in the returned report.
    pub fn run(&self, dir: &Path, config: &FilterConfig) -> Result<BatchReport> {
        let (reports, warnings) = discovery::select_reports(dir, &self.selection)?;
        for warning in &warnings {
            tracing::warn!(warning = %warning, "Report selection warning");
        }

        let jobs: Vec<CleanJob> = reports.into_iter().map(CleanJob::for_report).collect();
        if jobs.is_empty() {
            tracing::warn!(dir = %dir.display(), "No bug reports found");
            return Ok(BatchReport {
                outcomes: Vec::new(),
                warnings,
            });
        }

        let threads = self.worker_threads.min(constants::MAX_WORKER_THREADS);
        tracing::info!(
            dir = %dir.display(),
            reports = jobs.len(),
            threads,
            "Batch starting"
        );

        let started = Instant::now();
        let outcomes = match rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("cleaner-{i}"))
            .build()
        {
            Ok(pool) => pool.install(|| self.run_jobs(jobs, config)),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to build worker pool; using global pool");
                self.run_jobs(jobs, config)
            }
        };

        let report = BatchReport { outcomes, warnings };
        tracing::info!(
            succeeded = report.succeeded(),
            failed = report.failed(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Batch complete"
        );
        Ok(report)
    }

    fn run_jobs(&self, jobs: Vec<CleanJob>, config: &FilterConfig) -> Vec<FileOutcome> {
        jobs.into_par_iter()
            .map(|job| {
                let result = job.run(config, self.write_mode);
                if let Err(ref e) = result {
                    tracing::error!(input = %job.input.display(), error = %e, "Report failed");
                }
                FileOutcome { job, result }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const START: &str = "Start proc com.example.app for activity com.example.app/.Main: pid=42 uid=10001 gids=3003";
    const APP: &str = "03-04 05:06:07.890    42    42 I App: hello";
    const DIED: &str = "Process com.example.app (pid 42) has died.";

    fn write_report(dir: &Path, name: &str) {
        fs::write(dir.join(name), format!("noise\n{START}\n{APP}\n{DIED}\n")).unwrap();
    }

    #[test]
    fn test_cleans_every_report() {
        let dir = tempfile::tempdir().unwrap();
        write_report(dir.path(), "bugreport-1.txt");
        write_report(dir.path(), "bugreport-2.txt");
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let config = FilterConfig::new("com.example.app", false).unwrap();
        let runner = BatchRunner {
            worker_threads: 2,
            ..Default::default()
        };
        let report = runner.run(dir.path(), &config).unwrap();

        assert_eq!(report.succeeded(), 2);
        assert!(report.first_error().is_none());
        assert_eq!(report.totals().sessions, 2);
        for name in ["bugreport-1_clean.txt", "bugreport-2_clean.txt"] {
            let out = fs::read_to_string(dir.path().join(name)).unwrap();
            assert!(out.starts_with(START), "{name}: {out}");
        }
        assert!(!dir.path().join("notes_clean.txt").exists());
    }

    #[test]
    fn test_one_failure_does_not_stop_siblings() {
        let dir = tempfile::tempdir().unwrap();
        write_report(dir.path(), "bugreport-1.txt");
        write_report(dir.path(), "bugreport-3.txt");
        // A start line whose pid overflows fails this file only.
        fs::write(
            dir.path().join("bugreport-2.txt"),
            "Start proc com.example.app for activity x: pid=99999999999 uid=1 gids=3003\n",
        )
        .unwrap();

        let config = FilterConfig::new("com.example.app", false).unwrap();
        let report = BatchRunner::default().run(dir.path(), &config).unwrap();

        assert_eq!(report.outcomes.len(), 3);
        assert_eq!(report.succeeded(), 2);
        assert_eq!(report.failed(), 1);
        let first = report.first_error().expect("one failure");
        assert!(
            matches!(first, CleanerError::Clean { path, .. } if path.ends_with("bugreport-2.txt")),
            "got {first:?}"
        );
        assert!(dir.path().join("bugreport-3_clean.txt").exists());
    }

    #[test]
    fn test_rerun_skips_cleaned_outputs() {
        let dir = tempfile::tempdir().unwrap();
        write_report(dir.path(), "bugreport-1.txt");
        let config = FilterConfig::new("com.example.app", false).unwrap();
        let runner = BatchRunner {
            write_mode: WriteMode::Truncate,
            ..Default::default()
        };

        runner.run(dir.path(), &config).unwrap();
        let report = runner.run(dir.path(), &config).unwrap();

        assert_eq!(report.outcomes.len(), 1);
        assert!(!dir.path().join("bugreport-1_clean_clean.txt").exists());
    }

    #[test]
    fn test_empty_directory_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = FilterConfig::new("com.example.app", false).unwrap();
        let report = BatchRunner::default().run(dir.path(), &config).unwrap();
        assert!(report.outcomes.is_empty());
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let config = FilterConfig::new("com.example.app", false).unwrap();
        let result = BatchRunner::default().run(Path::new("/nonexistent/reports"), &config);
        assert!(matches!(result, Err(CleanerError::Discovery(_))));
    }
}
