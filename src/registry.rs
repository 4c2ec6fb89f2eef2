//! Ordered record of discovered test declarations.
//!
//! The registry is append-only: source files are registered lazily the first
//! time a declaration is found in them, and every declaration receives the
//! next value of a run-wide discovery counter. Generated code follows this
//! order, never an alphabetical one.

use camino::{Utf8Path, Utf8PathBuf};
use indexmap::IndexMap;
use itertools::Itertools;
use serde::Serialize;

/// A single `CTEST_DEF(name)` occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestDeclaration {
    /// File the declaration was found in, as discovered by the scanner.
    pub source_file: Utf8PathBuf,
    /// Text between the delimiters, taken verbatim.
    pub test_name: String,
    /// Position in the global discovery sequence, starting at zero.
    pub discovery_order: usize,
}

/// A source file that contributed at least one declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceFileEntry {
    /// Path under which the file was discovered.
    pub path: Utf8PathBuf,
    /// Registration position among files, starting at zero.
    pub first_seen_order: usize,
    /// Number of declarations attributed to this file.
    pub test_count: usize,
}

impl SourceFileEntry {
    /// Whether any declaration has been attributed to this file.
    #[must_use]
    pub const fn has_tests(&self) -> bool {
        self.test_count > 0
    }
}

/// Discovered files and tests in traversal order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Registry {
    files: IndexMap<Utf8PathBuf, SourceFileEntry>,
    tests: Vec<TestDeclaration>,
}

impl Registry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a declaration, registering `source_file` first if unseen.
    ///
    /// Returns `true` when this call registered the file.
    pub fn push_test(&mut self, source_file: &Utf8Path, test_name: impl Into<String>) -> bool {
        let registered = !self.files.contains_key(source_file);
        let fresh = SourceFileEntry {
            path: source_file.to_owned(),
            first_seen_order: self.files.len(),
            test_count: 0,
        };
        let file = self.files.entry(source_file.to_owned()).or_insert(fresh);
        file.test_count += 1;
        self.tests.push(TestDeclaration {
            source_file: source_file.to_owned(),
            test_name: test_name.into(),
            discovery_order: self.tests.len(),
        });
        registered
    }

    /// Registered files in first-seen order.
    pub fn files(&self) -> impl ExactSizeIterator<Item = &SourceFileEntry> {
        self.files.values()
    }

    /// All declarations in discovery order.
    #[must_use]
    pub fn tests(&self) -> &[TestDeclaration] {
        &self.tests
    }

    /// Declarations attributed to `path`, in discovery order.
    pub fn tests_in<'a>(
        &'a self,
        path: &'a Utf8Path,
    ) -> impl Iterator<Item = &'a TestDeclaration> + 'a {
        self.tests.iter().filter(move |t| t.source_file == path)
    }

    /// Number of registered files.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Number of declarations.
    #[must_use]
    pub fn test_count(&self) -> usize {
        self.tests.len()
    }

    /// Whether no declaration was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }

    /// Test names that occur more than once, in order of first occurrence.
    ///
    /// Duplicates are kept in the registry; the generated unit will most
    /// likely fail to compile because of the clashing function names.
    #[must_use]
    pub fn duplicate_names(&self) -> Vec<&str> {
        self.tests
            .iter()
            .map(|t| t.test_name.as_str())
            .duplicates()
            .collect()
    }
}
