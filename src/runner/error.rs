//! Error types for the runner module.

// The unused_assignments lint fires on some toolchains inside the
// thiserror/miette derive expansion for struct variants.
// FIXME(rust-lang/rust#130021): remove once upstream is fixed.
#![allow(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    unused_assignments
)]

use camino::Utf8PathBuf;
use miette::Diagnostic;
use std::io;
use std::process::ExitStatus;
use thiserror::Error;

/// Errors raised while building or starting the harness.
#[derive(Debug, Error, Diagnostic)]
pub enum RunnerError {
    /// The compiler could not be started at all.
    #[error("failed to start compiler {program}")]
    #[diagnostic(
        code(ctest::runner::compiler_spawn),
        help("install the compiler, pass --compiler, or set CTEST_CC")
    )]
    CompilerSpawn {
        /// Compiler command as configured.
        program: String,
        /// Underlying spawn error.
        #[source]
        source: io::Error,
    },

    /// The compiler ran and rejected the generated harness.
    #[error("compiler {program} exited with {status} while building {unit}\n{output}")]
    #[diagnostic(
        code(ctest::runner::compiler_failed),
        help("the generated source is kept in the products directory for inspection")
    )]
    CompilerFailed {
        /// Compiler command as configured.
        program: String,
        /// Exit status reported by the compiler.
        status: ExitStatus,
        /// Captured diagnostic output of the compiler.
        output: String,
        /// Generated unit that failed to compile.
        unit: Utf8PathBuf,
    },

    /// The compiled harness could not be started.
    #[error("failed to start test driver {path}")]
    #[diagnostic(code(ctest::runner::driver_spawn))]
    DriverSpawn {
        /// Path of the compiled harness.
        path: Utf8PathBuf,
        /// Underlying spawn error.
        #[source]
        source: io::Error,
    },
}
