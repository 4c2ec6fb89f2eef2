//! Application entry point.
//!
//! Parses command-line arguments and delegates execution to [`runner::run`].

use clap::Parser;
use ctest::status::{ConsoleReporter, SilentReporter, StatusReporter, failure_banner};
use ctest::{cli::Cli, diagnostics, runner};
use std::io::{self, Write};
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::fmt;

fn main() -> ExitCode {
    let cli = Cli::parse().with_default_command();
    let max_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };
    fmt()
        .with_max_level(max_level)
        .with_writer(io::stderr)
        .init();
    let reporter: Box<dyn StatusReporter> = if cli.quiet {
        Box::new(SilentReporter)
    } else {
        Box::new(ConsoleReporter::stdout())
    };
    match runner::run(&cli, reporter.as_ref()) {
        Ok(outcome) => outcome.exit_code(),
        Err(err) => {
            tracing::debug!(error = ?err, "runner failed");
            let mut stderr = io::stderr().lock();
            drop(writeln!(stderr, "{}", diagnostics::render(&err)));
            drop(writeln!(stderr, "{}", failure_banner()));
            ExitCode::FAILURE
        }
    }
}
