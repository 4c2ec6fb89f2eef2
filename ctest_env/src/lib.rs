#![forbid(unsafe_code)]

//! Shared environment constants used across ctest crates (library, tests, and
//! helpers).

/// Environment variable override for the C compiler used to build the
/// generated harness.
///
/// The `--compiler` flag takes precedence over this variable.
///
/// # Examples
///
/// ```
/// use ctest_env::COMPILER_ENV;
/// assert_eq!(COMPILER_ENV, "CTEST_CC");
/// ```
pub const COMPILER_ENV: &str = "CTEST_CC";

/// Compiler invoked when neither the CLI nor [`COMPILER_ENV`] names one.
pub const DEFAULT_COMPILER: &str = "clang";
