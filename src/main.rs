//! `gemsecrets` application entry point.
//!
//! This binary generates Kubernetes secrets and Helm overrides for Grafana
//! Enterprise Metrics. It uses `eyre` for opaque error handling at the
//! application boundary, converting domain-specific errors into
//! human-readable reports.
//!
//! Generator input is resolved per field with precedence:
//! 1. Command-line arguments
//! 2. Environment variables (`GEMSECRETS_*`)
//! 3. JSON configuration file
//! 4. Interactive prompt (`admin` and `metrics` only)

use std::io::IsTerminal;

use camino::Utf8Path;
use clap::Parser;
use eyre::{Report, Result as EyreResult};
use gemsecrets::api::{GenerateRequest, generate};
use gemsecrets::config::{Cli, LinePrompter, TerminalPrompter};
use gemsecrets::error::{GemSecretsError, Result as GemSecretsResult};
use gemsecrets::files::{OutputDir, WriteReport};
use mockable::DefaultEnv;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Application entry point.
///
/// Runs the selected generator, prints one status line per manifest, and
/// exits non-zero when anything failed, including a single failed write.
fn main() -> EyreResult<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let report = run(&cli).map_err(Report::from)?;
    print_report(&cli.output_dir, &report);
    report
        .into_result()
        .map_err(|error| Report::from(GemSecretsError::from(error)))
}

/// Initialise the tracing subscriber; logs go to stderr.
fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("warn"),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

/// Execute the CLI command, returning domain-specific errors.
///
/// Keeps semantic errors inside the run loop so the CLI boundary owns
/// conversion to `eyre::Report`.
fn run(cli: &Cli) -> GemSecretsResult<WriteReport> {
    let output = OutputDir::open(&cli.output_dir)?;
    let request = GenerateRequest {
        kind: cli.command.kind(),
        config_path: cli.command.config(),
        cli_layer: cli.command.cli_layer(),
    };
    let env = DefaultEnv::new();

    let stdin = std::io::stdin();
    if stdin.is_terminal() {
        let mut prompter = TerminalPrompter;
        generate(request, &env, Some(&mut prompter), &output)
    } else {
        let mut prompter = LinePrompter::new(stdin.lock(), std::io::stderr());
        generate(request, &env, Some(&mut prompter), &output)
    }
}

/// Report the outcome of every attempted write.
#[expect(clippy::print_stdout, reason = "CLI output is the intended behaviour")]
#[expect(clippy::print_stderr, reason = "CLI output is the intended behaviour")]
fn print_report(output_dir: &Utf8Path, report: &WriteReport) {
    for outcome in report.outcomes() {
        let path = output_dir.join(&outcome.file_name);
        match &outcome.result {
            Ok(()) => println!("Created {path}"),
            Err(error) => eprintln!("Failed to write {path}: {error}"),
        }
    }
}
