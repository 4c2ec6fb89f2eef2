//! End-to-end runs against a real C compiler.
//!
//! Each test skips itself when no compiler can be found on the host.

use anyhow::{Context, Result, ensure};
use assert_cmd::cargo::cargo_bin_cmd;
use std::process::Output;
use test_support::{SourceTree, real_compiler};

const PASSING_A: &str = concat!(
    "#include \"ctest.h\"\n",
    "\n",
    "CTEST_DEF(adds_numbers) {\n",
    "    CTEST_EXPECT_EQUAL(1 + 1, 2);\n",
    "}\n",
);

const PASSING_B: &str = concat!(
    "#include \"ctest.h\"\n",
    "\n",
    "CTEST_DEF(zero_is_false) {\n",
    "    CTEST_EXPECT_FALSE(0);\n",
    "}\n",
    "\n",
    "CTEST_DEF(one_is_nonzero) {\n",
    "    CTEST_EXPECT_NONZERO(1);\n",
    "}\n",
);

const FAILING: &str = concat!(
    "#include \"ctest.h\"\n",
    "\n",
    "CTEST_DEF(always_fails) {\n",
    "    CTEST_FAIL;\n",
    "    CTEST_ABORT;\n",
    "}\n",
);

fn run_with(compiler: &str, tree: &SourceTree, extra: &[&str]) -> Result<(Output, String)> {
    let output = cargo_bin_cmd!("ctest")
        .arg("-C")
        .arg(tree.path())
        .args(["--compiler", compiler])
        .args(extra)
        .output()
        .context("run ctest")?;
    let plain = strip_ansi_escapes::strip(&output.stdout);
    let stdout = String::from_utf8(plain).context("stdout utf8")?;
    Ok((output, stdout))
}

macro_rules! compiler_or_skip {
    () => {
        match real_compiler() {
            Some(cc) => cc,
            None => {
                eprintln!("skipping: no C compiler available");
                return Ok(());
            }
        }
    };
}

#[test]
fn passing_suite_reports_every_test() -> Result<()> {
    let cc = compiler_or_skip!();
    let tree = SourceTree::new()?
        .file("a.c", PASSING_A)?
        .file("nested/b.c", PASSING_B)?;

    let (output, stdout) = run_with(&cc, &tree, &[])?;
    ensure!(output.status.success(), "run failed:\n{stdout}");
    ensure!(
        stdout.contains("executed 3 tests with 0 failures"),
        "unexpected transcript:\n{stdout}"
    );
    ensure!(stdout.contains("all tests passed"), "missing pass line");
    for name in ["adds_numbers", "zero_is_false", "one_is_nonzero"] {
        ensure!(
            stdout.contains(&format!("pass: {name}")),
            "missing result for {name}:\n{stdout}"
        );
    }
    Ok(())
}

#[test]
fn failing_test_is_counted() -> Result<()> {
    let cc = compiler_or_skip!();
    let tree = SourceTree::new()?
        .file("a.c", PASSING_A)?
        .file("fail.c", FAILING)?;

    let (output, stdout) = run_with(&cc, &tree, &[])?;
    ensure!(
        output.status.success(),
        "without propagation a finished run succeeds"
    );
    ensure!(
        stdout.contains("executed 2 tests with 1 failures"),
        "unexpected transcript:\n{stdout}"
    );
    ensure!(stdout.contains("fail: always_fails"), "missing failure line");
    ensure!(stdout.contains("tests failed"), "missing summary line");

    let (propagated, _) = run_with(&cc, &tree, &["run", "--propagate-exit-code"])?;
    ensure!(
        propagated.status.code() == Some(1),
        "harness status should be adopted, got {:?}",
        propagated.status
    );
    Ok(())
}

#[test]
fn empty_tree_runs_zero_tests() -> Result<()> {
    let cc = compiler_or_skip!();
    let tree = SourceTree::new()?.file("notes.txt", "CTEST_DEF(ignored)\n")?;

    let (output, stdout) = run_with(&cc, &tree, &["run", "--propagate-exit-code"])?;
    ensure!(output.status.success(), "empty run failed:\n{stdout}");
    ensure!(
        stdout.contains("executed 0 tests with 0 failures"),
        "unexpected transcript:\n{stdout}"
    );
    Ok(())
}
