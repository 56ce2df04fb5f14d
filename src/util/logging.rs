// BugReportCleaner - util/logging.rs
//
// Structured logging with runtime-selectable debug mode.
//
// Activation:
//   - Environment variable: RUST_LOG=debug (or trace)
//   - CLI flag: --debug
//   - Config file: [logging] level = "debug"
//
// Output: stderr, so stdout only carries the run summary.
//
// The --debug, config and default levels apply to this crate only; other
// crates stay at `warn`. RUST_LOG is taken verbatim.

use tracing_subscriber::EnvFilter;

/// Initialise the logging subsystem.
///
/// Priority: RUST_LOG env var > CLI --debug flag > config level > default "info".
pub fn init(debug_flag: bool, config_level: Option<&str>) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if debug_flag {
        EnvFilter::new(crate_directive("debug"))
    } else if let Some(level) = config_level {
        EnvFilter::new(crate_directive(level))
    } else {
        EnvFilter::new(crate_directive(super::constants::DEFAULT_LOG_LEVEL))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(true)
        .compact()
        .init();

    tracing::debug!(
        app = super::constants::APP_NAME,
        version = super::constants::APP_VERSION,
        "Logging initialised"
    );
}

/// Filter directive enabling `level` for this crate and `warn` elsewhere.
fn crate_directive(level: &str) -> String {
    format!("warn,{}={level}", env!("CARGO_CRATE_NAME"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crate_directive_scopes_level() {
        assert_eq!(crate_directive("debug"), "warn,bugreport_cleaner=debug");
    }

    #[test]
    fn test_crate_directive_parses() {
        for level in crate::util::constants::VALID_LOG_LEVELS {
            assert!(
                EnvFilter::try_new(crate_directive(level)).is_ok(),
                "level {level}"
            );
        }
    }
}
