//! Diagnostics utilities.
//!
//! Turns a fatal [`anyhow::Error`] into the text printed before the process
//! exits: the full context chain, plus the `miette` help of the first typed
//! error in the chain that provides one.

use crate::runner::RunnerError;
use crate::scanner::ScanError;
use miette::Diagnostic;

/// Help text attached to the typed error inside `err`, if any.
#[must_use]
pub fn help_for(err: &anyhow::Error) -> Option<String> {
    let help = if let Some(scan) = err.downcast_ref::<ScanError>() {
        scan.help()
    } else if let Some(runner) = err.downcast_ref::<RunnerError>() {
        runner.help()
    } else {
        None
    };
    help.map(|h| h.to_string())
}

/// Diagnostic code attached to the typed error inside `err`, if any.
#[must_use]
pub fn code_for(err: &anyhow::Error) -> Option<String> {
    let code = if let Some(scan) = err.downcast_ref::<ScanError>() {
        scan.code()
    } else if let Some(runner) = err.downcast_ref::<RunnerError>() {
        runner.code()
    } else {
        None
    };
    code.map(|c| c.to_string())
}

/// Render `err` for the terminal.
///
/// # Examples
/// ```
/// let err = anyhow::anyhow!("boom").context("compile test driver");
/// let text = ctest::diagnostics::render(&err);
/// assert_eq!(text, "error: compile test driver: boom");
/// ```
#[must_use]
pub fn render(err: &anyhow::Error) -> String {
    let mut text = format!("error: {err:#}");
    if let Some(code) = code_for(err) {
        text.push_str(&format!("\n  code: {code}"));
    }
    if let Some(help) = help_for(err) {
        text.push_str(&format!("\n  help: {help}"));
    }
    text
}
