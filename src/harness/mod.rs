//! Harness generator.
//!
//! This module converts a [`Registry`] into the text of one C compilation
//! unit that includes every registered source file and calls each test in
//! discovery order from `main`. Output is a pure function of the registry,
//! so identical registries produce byte-identical units.

mod support;
mod unit;

pub use support::{SUPPORT_HEADER, support_header};
pub use unit::{GeneratedUnit, Section};

use crate::registry::{Registry, TestDeclaration};
use camino::Utf8Path;
use std::fmt::{self, Display, Formatter};

/// Filename under which the support header is written and included.
pub const SUPPORT_HEADER_NAME: &str = "ctest.h";

const DISCLAIMER: &str = "// DO NOT EDIT (THIS CODE IS AUTOMATICALLY GENERATED)";

const PRELUDE: [&str; 6] = [
    "#define CTEST_GREEN \"\\033[32m\"",
    "#define CTEST_RED \"\\033[31m\"",
    "#define CTEST_RESET \"\\033[0m\"",
    "",
    "#include <stdio.h>",
    "#include \"ctest.h\"",
];

const ENTRY_OPEN: [&str; 6] = [
    "",
    "int main() {",
    "",
    "int ctest_exec_count = 0;",
    "int ctest_fail_count = 0;",
    "",
];

const EPILOGUE: [&str; 13] = [
    "if (ctest_fail_count == 0)",
    "  printf(CTEST_GREEN);",
    "else",
    "  printf(CTEST_RED);",
    "printf(\"executed %d tests with %d failures\\n\", ctest_exec_count, ctest_fail_count);",
    "if (ctest_fail_count == 0)",
    "  printf(\"all tests passed\\n\");",
    "else",
    "  printf(\"tests failed\\n\");",
    "printf(CTEST_RESET);",
    "",
    "return ctest_fail_count == 0 ? 0 : 1;",
    "}",
];

/// Build the generated unit for `registry`.
#[must_use]
pub fn generate(registry: &Registry) -> GeneratedUnit {
    let mut unit = GeneratedUnit::new();
    unit.push_line(Section::Disclaimer, DISCLAIMER);
    unit.push_line(Section::Disclaimer, "");
    for line in PRELUDE {
        unit.push_line(Section::Prelude, line);
    }
    for file in registry.files() {
        unit.push_line(Section::Includes, format!("#include \"{}\"", file.path));
    }
    for line in ENTRY_OPEN {
        unit.push_line(Section::EntryOpen, line);
    }

    // One banner per file; a file's tests follow it in discovery order.
    for file in registry.files() {
        unit.push_block(Section::Body, &FileBanner { path: &file.path });
        for test in registry.tests_in(&file.path) {
            unit.push_block(Section::Body, &TestBlock { test });
        }
    }

    for line in EPILOGUE {
        unit.push_line(Section::Epilogue, line);
    }
    unit
}

/// Escape `text` for use inside a C string literal passed to `printf` as the
/// format argument.
#[must_use]
pub fn escape_printf_literal(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('%', "%%")
}

/// Marker comment and status line introducing the tests of one file.
struct FileBanner<'a> {
    path: &'a Utf8Path,
}

impl Display for FileBanner<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "// TESTS FROM: {}", self.path)?;
        writeln!(f)?;
        writeln!(
            f,
            "printf(CTEST_RESET \"{}:\\n\");",
            escape_printf_literal(self.path.as_str())
        )
    }
}

/// Scoped block that runs one test and records its outcome.
struct TestBlock<'a> {
    test: &'a TestDeclaration,
}

impl Display for TestBlock<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = &self.test.test_name;
        let shown = escape_printf_literal(name);
        writeln!(f, "{{")?;
        writeln!(f, "  printf(CTEST_RESET \"{shown}\");")?;
        writeln!(f, "  int ctest_exec_result = 0; {name}(&ctest_exec_result);")?;
        writeln!(f, "  ctest_exec_count += 1;")?;
        writeln!(f, "  if (ctest_exec_result < 0) {{")?;
        writeln!(f, "    ctest_fail_count += 1;")?;
        writeln!(f, "    printf(\"\\r\" CTEST_RED \"fail: {shown}\\n\");")?;
        writeln!(f, "  }} else {{")?;
        writeln!(f, "    printf(\"\\r\" CTEST_GREEN \"pass: {shown}\\n\");")?;
        writeln!(f, "  }}")?;
        writeln!(f, "}}")?;
        writeln!(f)
    }
}
