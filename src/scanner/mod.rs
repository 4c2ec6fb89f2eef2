//! Source tree scanner.
//!
//! Walks a directory and extracts `CTEST_DEF(name)` declarations line by
//! line. This is deliberately not a parser for C: a line qualifies when it
//! contains the marker, and the name is whatever sits between the first `(`
//! and the first `)` that follow the marker on that line. Declarations must
//! therefore fit on a single line. A marker without that shape aborts the
//! whole scan; there is no skip-and-continue mode.
//!
//! Traversal is depth-first. Within a directory the regular files are
//! visited before any subdirectory, each group in the order the directory
//! listing yields it. Symlinked files are read through the link; symlinked
//! directories are not entered. Entries below the root that cannot be read
//! are skipped with a warning.

mod error;

pub use error::ScanError;

use crate::registry::Registry;
use camino::{Utf8Path, Utf8PathBuf};
use std::ffi::OsStr;
use std::fs;
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

/// Token that marks a test declaration.
pub const TEST_MARKER: &str = "CTEST_DEF";
/// Filename suffix of eligible source files.
pub const SOURCE_SUFFIX: &str = ".c";

/// Why a marker line could not be turned into a test name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationFault {
    /// No `(` followed by a `)` after the marker.
    Syntax,
    /// The parentheses enclose an empty name.
    EmptyName,
}

/// Extract the test name declared on `line`.
///
/// Returns `Ok(None)` when the line does not contain [`TEST_MARKER`]. The
/// name is returned verbatim, without trimming.
///
/// # Errors
///
/// Returns a [`DeclarationFault`] when the marker is present but the line
/// lacks a `(` preceding a `)`, or when the parentheses are empty.
///
/// # Examples
/// ```
/// use ctest::scanner::{DeclarationFault, extract_test_name};
/// assert_eq!(extract_test_name("CTEST_DEF(adds) {"), Ok(Some("adds")));
/// assert_eq!(extract_test_name("int x = 0;"), Ok(None));
/// assert_eq!(extract_test_name("CTEST_DEF adds"), Err(DeclarationFault::Syntax));
/// ```
pub fn extract_test_name(line: &str) -> Result<Option<&str>, DeclarationFault> {
    let Some(marker) = line.find(TEST_MARKER) else {
        return Ok(None);
    };
    let rest = line.get(marker..).unwrap_or_default();
    match (rest.find('('), rest.find(')')) {
        (Some(open), Some(close)) if open < close => {
            let name = rest.get(open + 1..close).unwrap_or_default();
            if name.is_empty() {
                Err(DeclarationFault::EmptyName)
            } else {
                Ok(Some(name))
            }
        }
        _ => Err(DeclarationFault::Syntax),
    }
}

/// Whether a file called `name` should be scanned.
///
/// The generated main is excluded so that repeated runs in the same tree do
/// not pick up their own output.
#[must_use]
pub fn is_eligible(name: &OsStr, generated_main: &str) -> bool {
    name.as_encoded_bytes().ends_with(SOURCE_SUFFIX.as_bytes())
        && name != OsStr::new(generated_main)
}

/// Scan the text of one source file, appending its declarations.
///
/// `on_register` is called once, when the file contributes its first
/// declaration.
///
/// # Errors
///
/// Returns [`ScanError::DeclarationSyntax`] or [`ScanError::EmptyTestName`]
/// for the first malformed marker line.
pub fn scan_source(
    path: &Utf8Path,
    text: &str,
    registry: &mut Registry,
    on_register: &mut dyn FnMut(&Utf8Path),
) -> Result<(), ScanError> {
    for (index, line) in text.lines().enumerate() {
        let name = match extract_test_name(line) {
            Ok(Some(found)) => found,
            Ok(None) => continue,
            Err(fault) => return Err(declaration_error(fault, path, index + 1, line)),
        };
        if registry.push_test(path, name) {
            debug!(path = %path, "registered source file");
            on_register(path);
        }
    }
    Ok(())
}

fn declaration_error(
    fault: DeclarationFault,
    path: &Utf8Path,
    line_number: usize,
    line: &str,
) -> ScanError {
    let file = path.to_owned();
    let text = line.to_owned();
    match fault {
        DeclarationFault::Syntax => ScanError::DeclarationSyntax {
            path: file,
            line_number,
            line: text,
        },
        DeclarationFault::EmptyName => ScanError::EmptyTestName {
            path: file,
            line_number,
            line: text,
        },
    }
}

/// Regular files, plus symlinks whose target is a regular file. Links to
/// directories are listed but never descended into.
fn is_file_or_file_link(entry: &DirEntry) -> bool {
    let file_type = entry.file_type();
    file_type.is_file()
        || (file_type.is_symlink() && fs::metadata(entry.path()).is_ok_and(|meta| meta.is_file()))
}

/// Scan the tree under `root`.
///
/// # Errors
///
/// Returns a [`ScanError`] when the root cannot be traversed, a candidate
/// file cannot be read, or a declaration is malformed.
pub fn scan(root: &Utf8Path, generated_main: &str) -> Result<Registry, ScanError> {
    scan_with_observer(root, generated_main, &mut |_: &Utf8Path| {})
}

/// Scan the tree under `root`, reporting each newly registered file.
///
/// # Errors
///
/// See [`scan`].
pub fn scan_with_observer(
    root: &Utf8Path,
    generated_main: &str,
    on_register: &mut dyn FnMut(&Utf8Path),
) -> Result<Registry, ScanError> {
    let mut registry = Registry::new();
    let walker = WalkDir::new(root.as_std_path())
        .follow_links(false)
        .sort_by(|a, b| a.file_type().is_dir().cmp(&b.file_type().is_dir()));
    for item in walker {
        let entry = match item {
            Ok(found) => found,
            Err(err) if err.depth() == 0 => {
                return Err(ScanError::Walk {
                    root: root.to_owned(),
                    source: err,
                });
            }
            Err(err) => {
                warn!(path = ?err.path(), error = %err, "skipping unreadable entry");
                continue;
            }
        };
        if !is_file_or_file_link(&entry) {
            continue;
        }
        if !is_eligible(entry.file_name(), generated_main) {
            debug!(path = %entry.path().display(), "skipping ineligible file");
            continue;
        }
        let path = Utf8PathBuf::from_path_buf(entry.into_path())
            .map_err(|raw| ScanError::NonUtf8Path { path: raw })?;
        let bytes = fs::read(&path).map_err(|source| ScanError::Read {
            path: path.clone(),
            source,
        })?;
        let text = String::from_utf8_lossy(&bytes);
        scan_source(&path, &text, &mut registry, &mut *on_register)?;
    }
    Ok(registry)
}
