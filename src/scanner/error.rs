//! Error types for the source scanner.

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
use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a scan.
#[derive(Debug, Error, Diagnostic)]
pub enum ScanError {
    /// A marker line without a `(` followed by a `)` on the same line.
    #[error("test syntax error in {path}:{line_number}: {line}")]
    #[diagnostic(
        code(ctest::scanner::declaration_syntax),
        help("test declarations must be written on one line as CTEST_DEF(name)")
    )]
    DeclarationSyntax {
        /// File containing the offending line.
        path: Utf8PathBuf,
        /// One-based line number.
        line_number: usize,
        /// The offending line without its terminator.
        line: String,
    },

    /// A well-formed marker whose parentheses enclose nothing.
    #[error("empty test name in {path}:{line_number}: {line}")]
    #[diagnostic(
        code(ctest::scanner::empty_test_name),
        help("name the test function between the parentheses")
    )]
    EmptyTestName {
        /// File containing the offending line.
        path: Utf8PathBuf,
        /// One-based line number.
        line_number: usize,
        /// The offending line without its terminator.
        line: String,
    },

    /// Directory traversal failed.
    #[error("failed to traverse {root}")]
    #[diagnostic(code(ctest::scanner::walk))]
    Walk {
        /// Root of the traversal.
        root: Utf8PathBuf,
        /// Underlying walker error.
        #[source]
        source: walkdir::Error,
    },

    /// A candidate source file could not be read.
    #[error("failed to read {path}")]
    #[diagnostic(code(ctest::scanner::read))]
    Read {
        /// File that could not be read.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A discovered path cannot be written into an include directive.
    #[error("path {} is not valid UTF-8", path.display())]
    #[diagnostic(code(ctest::scanner::non_utf8_path))]
    NonUtf8Path {
        /// The offending path.
        path: PathBuf,
    },
}
