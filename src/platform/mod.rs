// BugReportCleaner - platform/mod.rs
//
// Platform abstraction layer: filesystem access and config files.
// Dependencies: util, directories crate.
// Must NOT depend on: core, app.

pub mod config;
pub mod fs;
