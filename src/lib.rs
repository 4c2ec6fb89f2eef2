//! ctest core library.
//!
//! Discovers `CTEST_DEF(name)` test functions in a C source tree, generates a
//! single harness translation unit that calls each of them, then compiles and
//! runs it. The pipeline is strictly sequential:
//! [`scanner`] → [`registry`] → [`harness`] → [`runner`].

pub mod cli;
pub mod config;
pub mod diagnostics;
pub mod harness;
pub mod registry;
pub mod runner;
pub mod scanner;
pub mod status;
