//! Command line interface definition using clap.
//!
//! This module defines the [`Cli`] structure and its subcommands. Running
//! without a subcommand behaves like `ctest run`.

use crate::config::{DEFAULT_GENERATED_MAIN, DEFAULT_PRODUCTS_DIR};
use camino::{Utf8Component, Utf8PathBuf};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

fn parse_products_dir(s: &str) -> Result<Utf8PathBuf, String> {
    let path = Utf8PathBuf::from(s);
    if path.as_str().is_empty() {
        return Err("output directory must not be empty".to_owned());
    }
    let escapes = path
        .components()
        .any(|c| !matches!(c, Utf8Component::Normal(_) | Utf8Component::CurDir));
    if escapes {
        let message = format!("{s} must be a relative path inside the working directory");
        return Err(message);
    }
    Ok(path)
}

fn parse_main_name(s: &str) -> Result<String, String> {
    if s.is_empty() || s.contains(['/', '\\']) || s == "." || s == ".." {
        return Err(format!("{s} is not a plain file name"));
    }
    Ok(s.to_owned())
}

/// Discover `CTEST_DEF` tests in a C source tree, build one harness and run it.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Run as if started in this directory.
    ///
    /// The directory is scanned for tests, receives `ctest.h`, and is passed
    /// to the compiler as the include path.
    #[arg(short = 'C', long, value_name = "DIR")]
    pub directory: Option<PathBuf>,

    /// C compiler used to build the harness.
    ///
    /// Overrides the `CTEST_CC` environment variable; defaults to `clang`.
    #[arg(long, value_name = "CMD")]
    pub compiler: Option<String>,

    /// Directory for generated artefacts, relative to the working directory.
    #[arg(
        long,
        value_name = "DIR",
        default_value = DEFAULT_PRODUCTS_DIR,
        value_parser = parse_products_dir
    )]
    pub out_dir: Utf8PathBuf,

    /// File name of the generated harness source; never scanned for tests.
    #[arg(
        long,
        value_name = "NAME",
        default_value = DEFAULT_GENERATED_MAIN,
        value_parser = parse_main_name
    )]
    pub main_name: String,

    /// Enable verbose diagnostic logging.
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress progress lines; the harness transcript is still shown.
    #[arg(short, long)]
    pub quiet: bool,

    /// Optional subcommand to execute; defaults to `run` when omitted.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Apply the default command if none was specified.
    #[must_use]
    pub fn with_default_command(mut self) -> Self {
        if self.command.is_none() {
            self.command = Some(Commands::Run(RunArgs::default()));
        }
        self
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            directory: None,
            compiler: None,
            out_dir: Utf8PathBuf::from(DEFAULT_PRODUCTS_DIR),
            main_name: DEFAULT_GENERATED_MAIN.to_owned(),
            verbose: false,
            quiet: false,
            command: None,
        }
        .with_default_command()
    }
}

/// Arguments accepted by the `run` command.
#[derive(Debug, Args, PartialEq, Eq, Clone, Default)]
pub struct RunArgs {
    /// Exit with the harness's status instead of reporting success whenever
    /// the harness could be built and started.
    #[arg(long)]
    pub propagate_exit_code: bool,
}

/// Available top-level commands.
#[derive(Debug, Subcommand, PartialEq, Eq, Clone)]
pub enum Commands {
    /// Scan, generate, compile and run the harness (default).
    Run(RunArgs),

    /// Write `ctest.h` and the generated harness source without compiling.
    Generate {
        /// Print the harness source to stdout instead of writing it.
        #[arg(long)]
        stdout: bool,
    },

    /// List discovered tests grouped by source file.
    List,
}
