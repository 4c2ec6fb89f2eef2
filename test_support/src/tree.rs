//! Temporary C source trees.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A source tree rooted in a temporary directory.
pub struct SourceTree {
    dir: TempDir,
}

impl SourceTree {
    /// Create an empty tree.
    pub fn new() -> Result<Self> {
        Ok(Self {
            dir: TempDir::new().context("source tree: create temp dir")?,
        })
    }

    /// Write `contents` to `relative`, creating parent directories.
    pub fn file(self, relative: &str, contents: &str) -> Result<Self> {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("source tree: create {}", parent.display()))?;
        }
        fs::write(&path, contents)
            .with_context(|| format!("source tree: write {}", path.display()))?;
        Ok(self)
    }

    /// Root of the tree.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Absolute path of `relative` inside the tree, canonicalised.
    pub fn resolve(&self, relative: &str) -> Result<PathBuf> {
        let root = self
            .dir
            .path()
            .canonicalize()
            .context("source tree: canonicalise root")?;
        Ok(root.join(relative))
    }
}
