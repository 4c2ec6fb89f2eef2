//! File creation helpers for the runner.
//! Writes generated artefacts through a capability handle on the working
//! directory.

use anyhow::{Context, Result as AnyResult};
use camino::Utf8Path;
use cap_std::{ambient_authority, fs as cap_fs};
use std::io::{self, Write};
use tracing::info;

/// Open the working directory as a capability handle.
pub fn open_work_dir(work_dir: &Utf8Path) -> AnyResult<cap_fs::Dir> {
    cap_fs::Dir::open_ambient_dir(work_dir.as_std_path(), ambient_authority())
        .with_context(|| format!("open working directory {work_dir}"))
}

/// Write `content` to `path` inside `dir`, creating missing parents and
/// replacing any previous file.
pub fn write_text_file(dir: &cap_fs::Dir, path: &Utf8Path, content: &str) -> AnyResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_str().is_empty()) {
        dir.create_dir_all(parent.as_str())
            .with_context(|| format!("create directory {parent}"))?;
    }
    let mut file = dir
        .create(path.as_str())
        .with_context(|| format!("create {path}"))?;
    file.write_all(content.as_bytes())
        .with_context(|| format!("write {path}"))?;
    file.flush().with_context(|| format!("flush {path}"))?;
    file.sync_all().with_context(|| format!("sync {path}"))?;
    info!("Wrote {path}");
    Ok(())
}

fn is_broken_pipe(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::BrokenPipe
}

/// Write `content` to stdout, treating a closed pipe as success.
pub fn write_stdout(content: &str) -> AnyResult<()> {
    let mut stdout = io::stdout().lock();
    let bytes = content.as_bytes();
    match stdout.write_all(bytes).and_then(|()| stdout.flush()) {
        Ok(()) => Ok(()),
        Err(err) if is_broken_pipe(&err) => Ok(()),
        Err(err) => Err(err).context("write to stdout"),
    }
}
