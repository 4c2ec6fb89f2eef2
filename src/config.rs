//! Run configuration.
//!
//! The tool has no configuration file; every setting has an in-tool default
//! that the command line may override. The compiler can additionally be
//! chosen through the [`COMPILER_ENV`] environment variable.

pub use ctest_env::{COMPILER_ENV, DEFAULT_COMPILER};

use crate::harness::SUPPORT_HEADER_NAME;
use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;
use std::env;
use std::ffi::OsString;

/// Default directory, relative to the working directory, for generated
/// artefacts.
pub const DEFAULT_PRODUCTS_DIR: &str = "ctest_temp";
/// Default filename of the generated compilation unit.
pub const DEFAULT_GENERATED_MAIN: &str = "cmainc.c";
/// Filename of the compiled harness inside the products directory.
pub const DRIVER_BINARY: &str = "ctest_driver";

/// Settings for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HarnessConfig {
    /// Absolute working directory: scan root, header location, include path.
    pub work_dir: Utf8PathBuf,
    /// Compiler command name or path.
    pub compiler: String,
    /// Products directory, relative to `work_dir`.
    pub products_dir: Utf8PathBuf,
    /// Filename of the generated unit; also excluded from scanning.
    pub generated_main: String,
}

impl HarnessConfig {
    /// Configuration with every default applied for `work_dir`.
    #[must_use]
    pub fn new(work_dir: Utf8PathBuf) -> Self {
        Self {
            work_dir,
            compiler: DEFAULT_COMPILER.to_owned(),
            products_dir: Utf8PathBuf::from(DEFAULT_PRODUCTS_DIR),
            generated_main: DEFAULT_GENERATED_MAIN.to_owned(),
        }
    }

    /// Path of the support header, relative to `work_dir`.
    #[must_use]
    pub fn support_header_path(&self) -> &Utf8Path {
        Utf8Path::new(SUPPORT_HEADER_NAME)
    }

    /// Path of the generated unit, relative to `work_dir`.
    #[must_use]
    pub fn generated_unit_path(&self) -> Utf8PathBuf {
        self.products_dir.join(&self.generated_main)
    }

    /// Path of the compiled harness, relative to `work_dir`.
    #[must_use]
    pub fn driver_path(&self) -> Utf8PathBuf {
        self.products_dir.join(DRIVER_BINARY)
    }
}

fn resolve_compiler_with<F>(cli_value: Option<&str>, mut read_env: F) -> String
where
    F: FnMut(&str) -> Option<OsString>,
{
    if let Some(value) = cli_value {
        return value.to_owned();
    }
    read_env(COMPILER_ENV)
        .and_then(|value| value.into_string().ok())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| DEFAULT_COMPILER.to_owned())
}

/// Pick the compiler: the CLI value, else [`COMPILER_ENV`], else
/// [`DEFAULT_COMPILER`].
#[must_use]
pub fn resolve_compiler(cli_value: Option<&str>) -> String {
    resolve_compiler_with(cli_value, |key| env::var_os(key))
}
