//! Process helpers for artefact writing, compiler invocation and harness
//! execution. Internal to `runner`; public API is defined in `runner/mod.rs`.

use super::RunnerError;
use crate::config::HarnessConfig;
use camino::Utf8PathBuf;
use std::process::{Command, ExitStatus, Output};
use tracing::{debug, info};

mod file_io;
mod paths;

pub use file_io::*;
pub use paths::*;

/// Build the compiler invocation for `config`.
///
/// The compiler runs inside the working directory with that directory on the
/// include path, so `#include "ctest.h"` resolves for the harness and for
/// every included test source.
#[must_use]
pub fn compiler_command(config: &HarnessConfig) -> Command {
    let mut cmd = Command::new(&config.compiler);
    cmd.current_dir(config.work_dir.as_std_path())
        .arg("-I./")
        .arg(format!("./{}", config.generated_unit_path()))
        .arg("-o")
        .arg(format!("./{}", config.driver_path()));
    cmd
}

fn log_command_execution(cmd: &Command) {
    let args: Vec<_> = cmd
        .get_args()
        .map(|a| a.to_string_lossy().into_owned())
        .collect();
    info!(
        "Running command: {} {}",
        cmd.get_program().to_string_lossy(),
        args.join(" ")
    );
}

fn diagnostic_text(output: &Output) -> String {
    let stream = if output.stderr.is_empty() {
        &output.stdout
    } else {
        &output.stderr
    };
    String::from_utf8_lossy(stream).trim_end().to_owned()
}

/// Compile the generated unit, capturing the compiler's output.
///
/// # Errors
///
/// Returns [`RunnerError::CompilerSpawn`] when the compiler cannot be
/// started and [`RunnerError::CompilerFailed`] when it exits unsuccessfully.
pub fn compile_harness(config: &HarnessConfig) -> Result<(), RunnerError> {
    let mut cmd = compiler_command(config);
    log_command_execution(&cmd);
    let output = cmd.output().map_err(|source| RunnerError::CompilerSpawn {
        program: config.compiler.clone(),
        source,
    })?;
    if output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        debug!("compiler output: {stderr}");
        return Ok(());
    }
    Err(RunnerError::CompilerFailed {
        program: config.compiler.clone(),
        status: output.status,
        output: diagnostic_text(&output),
        unit: config.generated_unit_path(),
    })
}

/// Run the compiled harness with inherited standard streams.
///
/// The returned status is whatever the harness reported; a failing test run
/// is not an error here.
///
/// # Errors
///
/// Returns [`RunnerError::DriverSpawn`] when the harness cannot be started.
pub fn run_harness(config: &HarnessConfig) -> Result<ExitStatus, RunnerError> {
    let path: Utf8PathBuf = config.work_dir.join(config.driver_path());
    let mut cmd = Command::new(path.as_std_path());
    cmd.current_dir(config.work_dir.as_std_path());
    log_command_execution(&cmd);
    cmd.status().map_err(|source| RunnerError::DriverSpawn { path, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::ffi::OsStr;

    #[rstest]
    fn compiler_command_uses_fixed_flags() {
        let mut config = HarnessConfig::new(Utf8PathBuf::from("/work"));
        config.compiler = "gcc".to_owned();
        let cmd = compiler_command(&config);

        assert_eq!(cmd.get_program(), OsStr::new("gcc"));
        let args: Vec<_> = cmd.get_args().collect();
        assert_eq!(
            args,
            [
                OsStr::new("-I./"),
                OsStr::new("./ctest_temp/cmainc.c"),
                OsStr::new("-o"),
                OsStr::new("./ctest_temp/ctest_driver"),
            ]
        );
        assert_eq!(cmd.get_current_dir(), Some(std::path::Path::new("/work")));
    }

    #[rstest]
    fn missing_compiler_is_a_spawn_error() {
        let temp = tempfile::tempdir().expect("temp dir");
        let work_dir = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("utf8");
        let mut config = HarnessConfig::new(work_dir);
        config.compiler = "ctest-no-such-compiler".to_owned();

        let err = compile_harness(&config).expect_err("spawn should fail");
        assert!(matches!(err, RunnerError::CompilerSpawn { .. }));
    }

    #[rstest]
    fn diagnostic_text_prefers_stderr() {
        let output = Output {
            status: ExitStatus::default(),
            stdout: b"from stdout\n".to_vec(),
            stderr: b"error: boom\n".to_vec(),
        };
        assert_eq!(diagnostic_text(&output), "error: boom");
        let quiet = Output {
            stderr: Vec::new(),
            ..output
        };
        assert_eq!(diagnostic_text(&quiet), "from stdout");
    }
}
