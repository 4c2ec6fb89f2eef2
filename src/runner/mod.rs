//! CLI execution and command dispatch logic.
//!
//! This module keeps `main` minimal by providing a single entry point that
//! runs the pipeline: write the support header, scan, generate, compile and
//! run. Every stage runs to completion before the next starts, and every
//! failure before the harness starts is fatal.

mod error;
mod process;

pub use error::RunnerError;
pub use process::{canonicalize_work_dir, compile_harness, compiler_command, run_harness};

use crate::cli::{Cli, Commands, RunArgs};
use crate::config::{HarnessConfig, resolve_compiler};
use crate::harness::{self, GeneratedUnit, support_header};
use crate::registry::Registry;
use crate::scanner;
use crate::status::{PipelineStage, SilentReporter, StatusReporter};
use anyhow::{Context, Result};
use camino::Utf8Path;
use std::fmt::Write as _;
use std::path::Path;
use std::process::{ExitCode, ExitStatus};
use tracing::{debug, info, warn};

/// How a successful invocation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A command that does not run the harness completed.
    Completed,
    /// The harness ran to completion with `status`.
    Harness {
        /// Exit status reported by the harness.
        status: ExitStatus,
        /// Whether the tool should adopt the harness status.
        propagate: bool,
    },
}

impl Outcome {
    /// Process exit code for this outcome.
    ///
    /// Without propagation a finished harness run counts as success whatever
    /// its own status; the harness's printed summary is authoritative.
    #[must_use]
    pub fn exit_code(&self) -> ExitCode {
        match *self {
            Self::Harness { status, propagate } if propagate => exit_code_from_status(status),
            Self::Completed | Self::Harness { .. } => ExitCode::SUCCESS,
        }
    }
}

fn exit_code_from_status(status: ExitStatus) -> ExitCode {
    match status.code() {
        Some(0) => ExitCode::SUCCESS,
        Some(code) => u8::try_from(code)
            .ok()
            .filter(|c| *c != 0)
            .map_or(ExitCode::FAILURE, ExitCode::from),
        None => ExitCode::FAILURE,
    }
}

/// Build the run configuration from CLI flags and the environment.
///
/// # Errors
///
/// Returns an error when the working directory does not exist or its path is
/// not valid UTF-8.
pub fn resolve_config(cli: &Cli) -> Result<HarnessConfig> {
    let dir = cli.directory.as_deref().unwrap_or_else(|| Path::new("."));
    let work_dir = canonicalize_work_dir(dir)
        .with_context(|| format!("resolve working directory {}", dir.display()))?;
    let mut config = HarnessConfig::new(work_dir);
    config.compiler = resolve_compiler(cli.compiler.as_deref());
    config.products_dir.clone_from(&cli.out_dir);
    config.generated_main.clone_from(&cli.main_name);
    Ok(config)
}

/// Execute the parsed [`Cli`] command.
///
/// # Errors
///
/// Returns an error if writing artefacts, scanning, compiling, or starting
/// the harness fails.
pub fn run(cli: &Cli, reporter: &dyn StatusReporter) -> Result<Outcome> {
    let config = resolve_config(cli)?;
    debug!(?config, "resolved configuration");
    let command = cli
        .command
        .clone()
        .unwrap_or_else(|| Commands::Run(RunArgs::default()));
    match command {
        Commands::Run(args) => handle_run(&config, &args, reporter),
        Commands::Generate { stdout } => {
            handle_generate(&config, stdout, reporter)?;
            Ok(Outcome::Completed)
        }
        Commands::List => {
            let registry = discover(&config, reporter)?;
            process::write_stdout(&render_listing(&registry))?;
            Ok(Outcome::Completed)
        }
    }
}

fn handle_run(
    config: &HarnessConfig,
    args: &RunArgs,
    reporter: &dyn StatusReporter,
) -> Result<Outcome> {
    reporter.report_start(config);
    let unit = write_artefacts(config, reporter)?;
    debug!(lines = unit.render().lines().count(), "generated harness");

    reporter.report_stage(PipelineStage::Compilation);
    compile_harness(config).context("compile test driver")?;

    reporter.report_stage(PipelineStage::Execution);
    let status = run_harness(config).context("run test driver")?;
    if status.success() {
        info!(%status, "test driver finished");
    } else {
        warn!(%status, "test driver reported failures");
    }
    Ok(Outcome::Harness {
        status,
        propagate: args.propagate_exit_code,
    })
}

fn handle_generate(
    config: &HarnessConfig,
    to_stdout: bool,
    reporter: &dyn StatusReporter,
) -> Result<()> {
    if to_stdout {
        // Progress lines would corrupt the emitted source.
        let registry = discover(config, &SilentReporter)?;
        return process::write_stdout(&harness::generate(&registry).render());
    }
    reporter.report_start(config);
    write_artefacts(config, reporter).map(drop)
}

/// Write the support header, scan, and write the generated unit.
///
/// The unit is written only after the scan succeeded, so a malformed
/// declaration leaves no generated source behind.
fn write_artefacts(config: &HarnessConfig, reporter: &dyn StatusReporter) -> Result<GeneratedUnit> {
    let dir = process::open_work_dir(&config.work_dir)?;

    reporter.report_stage(PipelineStage::SupportHeader);
    process::write_text_file(&dir, config.support_header_path(), support_header())
        .context("write support header")?;

    let registry = discover(config, reporter)?;
    let unit = harness::generate(&registry);
    process::write_text_file(&dir, &config.generated_unit_path(), &unit.render())
        .context("write generated test driver")?;
    reporter.report_stage(PipelineStage::Generation);
    Ok(unit)
}

/// Scan the working directory, reporting progress as files register.
///
/// # Errors
///
/// Returns an error if the scan fails.
pub fn discover(config: &HarnessConfig, reporter: &dyn StatusReporter) -> Result<Registry> {
    reporter.report_stage(PipelineStage::Discovery);
    reporter.report_traversal(&config.work_dir);
    let mut on_register = |path: &Utf8Path| reporter.report_file(path);
    let work_dir = &config.work_dir;
    let registry = scanner::scan_with_observer(work_dir, &config.generated_main, &mut on_register)
        .with_context(|| format!("scan {work_dir}"))?;
    reporter.report_discovered(registry.test_count(), registry.file_count());

    for name in registry.duplicate_names() {
        warn!(
            test = name,
            "duplicate test name; the generated driver will likely fail to compile"
        );
    }
    if tracing::enabled!(tracing::Level::DEBUG) {
        let json = serde_json::to_string_pretty(&registry).context("serialise registry")?;
        debug!("registry:\n{json}");
    }
    Ok(registry)
}

/// Render discovered tests grouped by file, one test per indented line.
#[must_use]
pub fn render_listing(registry: &Registry) -> String {
    let mut out = String::new();
    for file in registry.files() {
        // Writing to a String cannot fail.
        drop(writeln!(out, "{}:", file.path));
        for test in registry.tests_in(&file.path) {
            drop(writeln!(out, "  {}", test.test_name));
        }
    }
    out
}
