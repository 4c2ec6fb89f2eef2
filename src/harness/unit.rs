//! Ordered-section buffer for the generated compilation unit.
//!
//! Lines may be appended to any section at any time; rendering always emits
//! the sections in [`Section::ALL`] order.

use std::fmt::{self, Display, Formatter};

/// Named regions of the generated unit, in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    /// Do-not-edit banner.
    Disclaimer,
    /// Colour macros and the standard includes.
    Prelude,
    /// One `#include` per registered source file.
    Includes,
    /// Opening of `main` and the counter declarations.
    EntryOpen,
    /// Per-file banners and per-test wrapper blocks.
    Body,
    /// Summary output and the return statement.
    Epilogue,
}

impl Section {
    /// Every section in rendering order.
    pub const ALL: [Self; 6] = [
        Self::Disclaimer,
        Self::Prelude,
        Self::Includes,
        Self::EntryOpen,
        Self::Body,
        Self::Epilogue,
    ];
}

/// The synthesised harness source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratedUnit {
    disclaimer: Vec<String>,
    prelude: Vec<String>,
    includes: Vec<String>,
    entry_open: Vec<String>,
    body: Vec<String>,
    epilogue: Vec<String>,
}

impl GeneratedUnit {
    /// Create an empty unit.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one line to `section`.
    pub fn push_line(&mut self, section: Section, line: impl Into<String>) {
        self.lines_mut(section).push(line.into());
    }

    /// Append every line of a rendered fragment to `section`.
    pub fn push_block(&mut self, section: Section, block: &impl Display) {
        let rendered = block.to_string();
        let lines = self.lines_mut(section);
        lines.extend(rendered.lines().map(str::to_owned));
    }

    /// Lines currently held by `section`.
    #[must_use]
    pub fn lines(&self, section: Section) -> &[String] {
        match section {
            Section::Disclaimer => &self.disclaimer,
            Section::Prelude => &self.prelude,
            Section::Includes => &self.includes,
            Section::EntryOpen => &self.entry_open,
            Section::Body => &self.body,
            Section::Epilogue => &self.epilogue,
        }
    }

    fn lines_mut(&mut self, section: Section) -> &mut Vec<String> {
        match section {
            Section::Disclaimer => &mut self.disclaimer,
            Section::Prelude => &mut self.prelude,
            Section::Includes => &mut self.includes,
            Section::EntryOpen => &mut self.entry_open,
            Section::Body => &mut self.body,
            Section::Epilogue => &mut self.epilogue,
        }
    }

    /// Render the unit as newline-terminated text.
    #[must_use]
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl Display for GeneratedUnit {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for section in Section::ALL {
            for line in self.lines(section) {
                writeln!(f, "{line}")?;
            }
        }
        Ok(())
    }
}
