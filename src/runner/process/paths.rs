//! Working-directory resolution for the runner.

use camino::Utf8PathBuf;
use std::fs;
use std::io::{self, ErrorKind};
use std::path::Path;

/// Resolve `path` to an absolute, canonical UTF-8 directory path.
///
/// Relative paths are resolved against the current directory; the empty path
/// means the current directory itself.
///
/// # Errors
///
/// Fails when `path` does not exist, is not a directory, or resolves to a
/// path that is not valid UTF-8.
pub fn canonicalize_work_dir(path: &Path) -> io::Result<Utf8PathBuf> {
    let target = if path.as_os_str().is_empty() {
        Path::new(".")
    } else {
        path
    };
    let resolved = fs::canonicalize(target)?;
    if !resolved.is_dir() {
        return Err(io::Error::new(
            ErrorKind::NotADirectory,
            format!("{} is not a directory", resolved.display()),
        ));
    }
    Utf8PathBuf::from_path_buf(resolved).map_err(|p| {
        io::Error::new(
            ErrorKind::InvalidData,
            format!("path {} is not valid UTF-8", p.display()),
        )
    })
}
