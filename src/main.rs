// BugReportCleaner - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing (including the legacy `-gc` spelling)
// 2. config.toml loading
// 3. Logging initialisation
// 4. Dispatch to a single-file clean or a directory batch

use bugreport_cleaner::app::batch::BatchRunner;
use bugreport_cleaner::app::job::CleanJob;
use bugreport_cleaner::core::discovery::ReportSelection;
use bugreport_cleaner::core::pattern::FilterConfig;
use bugreport_cleaner::platform::config::{self, AppConfig};
use bugreport_cleaner::platform::fs::WriteMode;
use bugreport_cleaner::util::constants;
use bugreport_cleaner::util::error::{CleanerError, FilterError};
use bugreport_cleaner::util::logging;
use clap::{CommandFactory, Parser};
use std::ffi::OsString;
use std::path::PathBuf;

/// Filter Android bug reports down to the log lines of one application
/// process, optionally dropping garbage-collector noise.
#[derive(Parser, Debug)]
#[command(name = "bugreport-cleaner", version, about)]
struct Cli {
    /// Target package / process name, e.g. com.example.app.
    #[arg(short = 'p', long = "package")]
    package: String,

    /// Bug report file, or a directory of bugreport*.txt files. In directory
    /// mode existing *_clean.txt outputs are skipped.
    #[arg(short = 'i', long = "input")]
    input: PathBuf,

    /// Output file. Required for a single input file; ignored for a directory.
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Keep GC log lines (also accepted as `-gc`).
    #[arg(long = "gc")]
    keep_gc: bool,

    /// Truncate output files instead of appending to them.
    #[arg(long = "truncate")]
    truncate: bool,

    /// Worker threads in directory mode (0 = one per core).
    #[arg(short = 'j', long = "jobs")]
    jobs: Option<usize>,

    /// Configuration file (defaults to the platform config directory).
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

/// Rewrite the legacy single-dash `-gc` flag to `--gc`.
fn normalise_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .map(|arg| if arg == "-gc" { OsString::from("--gc") } else { arg })
        .collect()
}

fn main() {
    let cli = match Cli::try_parse_from(normalise_args(std::env::args_os())) {
        Ok(cli) => cli,
        Err(e) => {
            use clap::error::ErrorKind;
            if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
                e.exit();
            }
            let _ = e.print();
            std::process::exit(constants::EXIT_USAGE);
        }
    };

    let (app_config, config_warnings) = load_app_config(cli.config.as_ref());

    logging::init(cli.debug, app_config.log_level.as_deref());
    for warning in &config_warnings {
        tracing::warn!(warning = %warning, "Config warning");
    }

    tracing::info!(
        version = constants::APP_VERSION,
        package = %cli.package,
        input = %cli.input.display(),
        keep_gc = cli.keep_gc,
        "BugReportCleaner starting"
    );

    match run(&cli, &app_config) {
        Ok(()) => println!("Done!"),
        Err(e) => exit_with(e),
    }
}

/// Load config.toml. A broken file at the default location only warns; a
/// broken file named with `--config` is fatal.
fn load_app_config(explicit: Option<&PathBuf>) -> (AppConfig, Vec<String>) {
    let path = match explicit {
        Some(p) => p.clone(),
        None => match config::default_config_path() {
            Some(p) => p,
            None => return (AppConfig::default(), Vec::new()),
        },
    };

    match config::load_config(&path) {
        Ok(loaded) => loaded,
        Err(e) if explicit.is_some() => exit_with(e.into()),
        Err(e) => (AppConfig::default(), vec![format!("{e}. Using defaults.")]),
    }
}

fn run(cli: &Cli, app_config: &AppConfig) -> Result<(), CleanerError> {
    let filter_config = FilterConfig::new(&cli.package, cli.keep_gc)?;
    let write_mode = WriteMode::from_truncate_flag(cli.truncate || app_config.truncate_output);

    if cli.input.is_dir() {
        if let Some(ref output) = cli.output {
            tracing::warn!(
                output = %output.display(),
                "Output path ignored in directory mode; outputs are derived per report"
            );
        }

        let runner = BatchRunner {
            selection: ReportSelection {
                skip_cleaned: app_config.skip_cleaned,
                ..Default::default()
            },
            worker_threads: cli.jobs.unwrap_or(app_config.worker_threads),
            write_mode,
        };
        let report = runner.run(&cli.input, &filter_config)?;

        let totals = report.totals();
        println!(
            "Cleaned {} of {} reports ({} lines kept, {} sessions)",
            report.succeeded(),
            report.outcomes.len(),
            totals.lines_written,
            totals.sessions
        );
        return match report.outcomes.into_iter().find_map(|o| o.result.err()) {
            Some(first) => Err(first),
            None => Ok(()),
        };
    }

    let Some(ref output) = cli.output else {
        return Err(CleanerError::Usage {
            message: "Output file is missing".to_string(),
        });
    };

    let stats = CleanJob::new(cli.input.clone(), output.clone()).run(&filter_config, write_mode)?;
    println!(
        "Cleaned '{}' ({} of {} lines kept, {} sessions)",
        cli.input.display(),
        stats.lines_written,
        stats.lines_read,
        stats.sessions
    );
    Ok(())
}

/// Report `e` and terminate. Usage problems print the usage line and exit
/// with the usage status; everything else exits with the failure status.
fn exit_with(e: CleanerError) -> ! {
    match e {
        CleanerError::Usage { ref message } => {
            eprintln!("{message}");
            eprintln!("{}", Cli::command().render_usage());
            std::process::exit(constants::EXIT_USAGE);
        }
        CleanerError::Filter(FilterError::EmptyPackage) => {
            eprintln!("Package name is missing");
            eprintln!("{}", Cli::command().render_usage());
            std::process::exit(constants::EXIT_USAGE);
        }
        other => {
            tracing::error!(error = %other, "Clean failed");
            eprintln!("Error: {other}");
            std::process::exit(constants::EXIT_FAILURE);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(normalise_args(args.iter().map(OsString::from)))
    }

    #[test]
    fn test_legacy_gc_flag() {
        let cli = parse(&["prog", "-p", "com.x", "-i", "in.txt", "-o", "out.txt", "-gc"]).unwrap();
        assert!(cli.keep_gc);
        assert_eq!(cli.package, "com.x");
        assert_eq!(cli.output, Some(PathBuf::from("out.txt")));
    }

    #[test]
    fn test_gc_off_by_default() {
        let cli = parse(&["prog", "-p", "com.x", "-i", "dir"]).unwrap();
        assert!(!cli.keep_gc);
        assert!(cli.output.is_none());
    }

    #[test]
    fn test_missing_package_is_usage_error() {
        let err = parse(&["prog", "-i", "in.txt"]).unwrap_err();
        assert_eq!(
            err.kind(),
            clap::error::ErrorKind::MissingRequiredArgument
        );
    }

    #[test]
    fn test_package_containing_gc_untouched() {
        let cli = parse(&["prog", "-p", "com.gc", "-i", "x"]).unwrap();
        assert_eq!(cli.package, "com.gc");
    }

    #[test]
    fn test_input_help_mentions_skipped_outputs() {
        let help = Cli::command().render_long_help().to_string();
        assert!(help.contains("*_clean.txt"), "{help}");
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }
}
