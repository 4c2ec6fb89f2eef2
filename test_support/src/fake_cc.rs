//! Fake compiler executables.
//!
//! Each fake understands the argument shape ctest passes to a compiler
//! (`-I<dir> <unit> -o <binary>`), records its arguments, and either fails
//! or writes a shell script in place of the compiled harness.

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Make a script file executable on Unix platforms.
#[cfg(unix)]
fn make_script_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    let mut perms = fs::metadata(path)
        .with_context(|| format!("read metadata {}", path.display()))?
        .permissions();
    perms.set_mode(0o755);
    fs::set_permissions(path, perms)
        .with_context(|| format!("set permissions {}", path.display()))?;
    Ok(())
}

#[cfg(not(unix))]
fn make_script_executable(_path: &Path) -> Result<()> {
    Ok(())
}

/// A fake compiler living in its own temporary directory.
pub struct FakeCompiler {
    _dir: TempDir,
    path: PathBuf,
    args_log: PathBuf,
}

impl FakeCompiler {
    /// A compiler that "builds" a harness exiting with `driver_exit` after
    /// printing `driver_output`.
    pub fn building_driver(driver_output: &str, driver_exit: i32) -> Result<Self> {
        let body = format!(
            concat!(
                "out=\"\"\n",
                "src=\"\"\n",
                "while [ $# -gt 0 ]; do\n",
                "  case \"$1\" in\n",
                "    -o) out=\"$2\"; shift ;;\n",
                "    -I*) ;;\n",
                "    *) src=\"$1\" ;;\n",
                "  esac\n",
                "  shift\n",
                "done\n",
                "if [ ! -f \"$src\" ]; then\n",
                "  echo \"fake-cc: missing source $src\" >&2\n",
                "  exit 2\n",
                "fi\n",
                "printf '#!/bin/sh\\necho \"%s\"\\nexit %s\\n' '{output}' '{code}' > \"$out\"\n",
                "chmod +x \"$out\"\n",
            ),
            output = driver_output,
            code = driver_exit,
        );
        Self::with_body(&body)
    }

    /// A compiler that prints `message` to stderr and exits with status 1.
    pub fn failing(message: &str) -> Result<Self> {
        Self::with_body(&format!("echo '{message}' >&2\nexit 1\n"))
    }

    fn with_body(body: &str) -> Result<Self> {
        let dir = TempDir::new().context("fake compiler: create temp dir")?;
        let path = dir.path().join("fake-cc");
        let args_log = dir.path().join("args.log");
        let mut file = File::create(&path)
            .with_context(|| format!("fake compiler: create script {}", path.display()))?;
        writeln!(
            file,
            "#!/bin/sh\nprintf '%s\\n' \"$@\" > '{}'\n{body}",
            args_log.display()
        )
        .context("fake compiler: write script")?;
        drop(file);
        make_script_executable(&path)?;
        Ok(Self {
            _dir: dir,
            path,
            args_log,
        })
    }

    /// Path of the executable.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Arguments of the most recent invocation, one per entry.
    pub fn recorded_args(&self) -> Result<Vec<String>> {
        let text = fs::read_to_string(&self.args_log)
            .with_context(|| format!("read {}", self.args_log.display()))?;
        Ok(text.lines().map(str::to_owned).collect())
    }
}
