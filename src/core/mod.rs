// BugReportCleaner - core/mod.rs
//
// Core business logic layer.
// Must NOT depend on: platform or app.

pub mod cleaner;
pub mod discovery;
pub mod pattern;
