//! Console progress reporting.
//!
//! Progress lines are informational only: write failures are ignored so a
//! closed stdout never aborts a run. The pass/fail transcript comes from the
//! compiled harness itself, not from here.

use crate::config::HarnessConfig;
use camino::Utf8Path;
use std::cell::RefCell;
use std::io::{self, Stdout, Write};

/// ANSI escape selecting green foreground.
pub const GREEN: &str = "\x1b[32m";
/// ANSI escape selecting red foreground.
pub const RED: &str = "\x1b[31m";
/// ANSI escape resetting all attributes.
pub const RESET: &str = "\x1b[0m";

/// Red banner printed after any fatal error.
#[must_use]
pub fn failure_banner() -> String {
    format!("{RED}test process failed{RESET}")
}

/// Steps of the scan, generate, compile and run pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    /// Writing the support header.
    SupportHeader,
    /// Walking the source tree.
    Discovery,
    /// Harness source written.
    Generation,
    /// External compiler running.
    Compilation,
    /// Compiled harness running.
    Execution,
}

impl PipelineStage {
    /// Progress line announcing the stage.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::SupportHeader => "writing ctest.h header file",
            Self::Discovery => "finding tests",
            Self::Generation => "test driver code generated",
            Self::Compilation => "compiling test driver",
            Self::Execution => "running test driver",
        }
    }
}

/// Report pipeline progress to the user.
pub trait StatusReporter {
    /// Announce the run and its settings.
    fn report_start(&self, config: &HarnessConfig);

    /// Emit a status update for the given pipeline stage.
    fn report_stage(&self, stage: PipelineStage);

    /// Announce the root of the traversal.
    fn report_traversal(&self, root: &Utf8Path);

    /// Announce a source file that contributed its first test.
    fn report_file(&self, path: &Utf8Path);

    /// Summarise discovery.
    fn report_discovered(&self, tests: usize, files: usize);
}

/// Silent reporter: emits nothing.
pub struct SilentReporter;

impl StatusReporter for SilentReporter {
    fn report_start(&self, _config: &HarnessConfig) {}
    fn report_stage(&self, _stage: PipelineStage) {}
    fn report_traversal(&self, _root: &Utf8Path) {}
    fn report_file(&self, _path: &Utf8Path) {}
    fn report_discovered(&self, _tests: usize, _files: usize) {}
}

/// Line-oriented reporter writing plain progress lines.
pub struct ConsoleReporter<W: Write = Stdout> {
    out: RefCell<W>,
}

impl ConsoleReporter {
    /// Reporter writing to the process's standard output.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ConsoleReporter<W> {
    /// Reporter writing to `out`.
    pub const fn new(out: W) -> Self {
        Self {
            out: RefCell::new(out),
        }
    }

    /// Recover the underlying writer.
    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }

    fn line(&self, message: &str) {
        let mut out = self.out.borrow_mut();
        // Progress output must never abort the pipeline.
        drop(writeln!(out, "{message}"));
        drop(out.flush());
    }
}

impl<W: Write> StatusReporter for ConsoleReporter<W> {
    fn report_start(&self, config: &HarnessConfig) {
        self.line(&format!("{GREEN}starting tests{RESET}"));
        self.line(&format!("compiler: {}", config.compiler));
        self.line(&format!("test_products_dir: {}", config.products_dir));
        self.line(&format!("generated_main: {}", config.generated_main));
    }

    fn report_stage(&self, stage: PipelineStage) {
        self.line(stage.message());
    }

    fn report_traversal(&self, root: &Utf8Path) {
        self.line(&format!("traversing from: {root}"));
    }

    fn report_file(&self, path: &Utf8Path) {
        self.line(&format!("assembling tests from: {path}"));
    }

    fn report_discovered(&self, tests: usize, files: usize) {
        self.line(&format!("found {tests} tests in {files} files"));
    }
}
