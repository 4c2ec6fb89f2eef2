//! Test utilities for process management.
//!
//! This crate provides fake compiler executables, throwaway source trees and
//! a lookup for a real C compiler used by behavioural tests.

pub mod fake_cc;
pub mod tree;

pub use fake_cc::FakeCompiler;
pub use tree::SourceTree;

use std::process::{Command, Stdio};

/// Return a C compiler usable for end-to-end tests, if one is installed.
///
/// Honours `CTEST_CC` first, then tries `cc` and `clang`.
pub fn real_compiler() -> Option<String> {
    let preferred = std::env::var(ctest_env::COMPILER_ENV).ok();
    preferred
        .into_iter()
        .chain(["cc".to_owned(), ctest_env::DEFAULT_COMPILER.to_owned()])
        .find(|candidate| {
            Command::new(candidate)
                .arg("--version")
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status()
                .is_ok_and(|status| status.success())
        })
}
