// BugReportCleaner - app/mod.rs
//
// Application layer: per-file jobs and directory batches.
// Dependencies: core, platform.

pub mod batch;
pub mod job;
