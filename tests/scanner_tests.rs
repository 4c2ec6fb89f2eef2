//! Integration tests for source tree scanning.
//!
//! These tests build real directory trees and check traversal order,
//! eligibility and the fatal handling of malformed declarations.

use anyhow::{Context, Result, ensure};
use camino::{Utf8Path, Utf8PathBuf};
use ctest::scanner::{ScanError, scan, scan_with_observer};
use test_support::SourceTree;

fn root_of(tree: &SourceTree) -> Result<Utf8PathBuf> {
    let root = tree.path().canonicalize().context("canonicalise tree root")?;
    Utf8PathBuf::from_path_buf(root).map_err(|raw| anyhow::anyhow!("non UTF-8 temp dir {raw:?}"))
}

fn names(registry: &ctest::registry::Registry) -> Vec<&str> {
    registry
        .tests()
        .iter()
        .map(|t| t.test_name.as_str())
        .collect()
}

#[test]
fn files_are_scanned_before_subdirectories() -> Result<()> {
    let tree = SourceTree::new()?
        .file("sub/deeper/x.c", "CTEST_DEF(deepest) {}\n")?
        .file("sub/a.c", "CTEST_DEF(nested) {}\n")?
        .file("z.c", "CTEST_DEF(top) {}\n")?;
    let root = root_of(&tree)?;

    let registry = scan(&root, "cmainc.c")?;

    ensure!(
        names(&registry) == ["top", "nested", "deepest"],
        "unexpected order {:?}",
        names(&registry)
    );
    let files: Vec<_> = registry.files().map(|f| f.path.clone()).collect();
    let expected = ["z.c", "sub/a.c", "sub/deeper/x.c"].map(|rel| root.join(rel));
    ensure!(files == expected, "unexpected files {files:?}");
    Ok(())
}

#[test]
fn declarations_of_a_file_stay_contiguous() -> Result<()> {
    let tree = SourceTree::new()?
        .file("a.c", "CTEST_DEF(alpha) {}\n")?
        .file("b.c", "CTEST_DEF(beta) {}\nint x;\nCTEST_DEF(gamma) {}\n")?;
    let root = root_of(&tree)?;

    let registry = scan(&root, "cmainc.c")?;

    ensure!(registry.file_count() == 2, "expected two files");
    ensure!(registry.test_count() == 3, "expected three tests");
    let b = root.join("b.c");
    let positions: Vec<_> = registry
        .tests()
        .iter()
        .filter(|t| t.source_file == b)
        .map(|t| t.discovery_order)
        .collect();
    ensure!(
        matches!(positions.as_slice(), [first, second] if *second == first + 1),
        "b.c declarations not contiguous: {positions:?}"
    );
    let b_names: Vec<_> = registry
        .tests_in(&b)
        .map(|t| t.test_name.as_str())
        .collect();
    ensure!(
        b_names == ["beta", "gamma"],
        "unexpected order {b_names:?}"
    );
    Ok(())
}

#[test]
fn ineligible_files_are_ignored() -> Result<()> {
    let tree = SourceTree::new()?
        .file("cmainc.c", "CTEST_DEF broken\n")?
        .file("ctest_temp/cmainc.c", "CTEST_DEF broken\n")?
        .file("helpers.h", "CTEST_DEF broken\n")?
        .file("notes.txt", "CTEST_DEF(nope)\n")?
        .file("plain.c", "int main(void) { return 0; }\n")?;
    let root = root_of(&tree)?;

    let registry = scan(&root, "cmainc.c")?;

    ensure!(registry.is_empty(), "expected no tests: {registry:?}");
    ensure!(
        registry.file_count() == 0,
        "files without tests must not register"
    );
    Ok(())
}

#[test]
fn custom_generated_main_name_is_excluded() -> Result<()> {
    let tree = SourceTree::new()?
        .file("harness.c", "CTEST_DEF(self_reference)\n")?
        .file("cmainc.c", "CTEST_DEF(counted) {}\n")?;
    let root = root_of(&tree)?;

    let registry = scan(&root, "harness.c")?;

    let found = names(&registry);
    ensure!(found == ["counted"], "got {found:?}");
    Ok(())
}

#[test]
fn malformed_declaration_aborts_the_scan() -> Result<()> {
    let tree = SourceTree::new()?
        .file("good.c", "CTEST_DEF(fine) {}\n")?
        .file("sub/bad.c", "int a;\nCTEST_DEF)oops( {}\n")?;
    let root = root_of(&tree)?;

    let err = scan(&root, "cmainc.c").err().context("scan should fail")?;

    match err {
        ScanError::DeclarationSyntax {
            path,
            line_number,
            line,
        } => {
            ensure!(path == root.join("sub/bad.c"), "wrong path {path}");
            ensure!(line_number == 2, "wrong line {line_number}");
            ensure!(line == "CTEST_DEF)oops( {}", "wrong text {line}");
        }
        other => anyhow::bail!("unexpected error {other}"),
    }
    Ok(())
}

#[test]
fn observer_sees_each_registered_file_once() -> Result<()> {
    let tree = SourceTree::new()?
        .file("a.c", "CTEST_DEF(one) {}\nCTEST_DEF(two) {}\n")?
        .file("empty.c", "\n")?;
    let root = root_of(&tree)?;

    let mut seen = Vec::new();
    let mut record = |path: &Utf8Path| seen.push(path.to_owned());
    let registry = scan_with_observer(&root, "cmainc.c", &mut record)?;

    ensure!(seen == [root.join("a.c")], "observer saw {seen:?}");
    ensure!(registry.test_count() == 2, "expected two tests");
    Ok(())
}

#[test]
fn non_utf8_content_is_tolerated() -> Result<()> {
    let tree = SourceTree::new()?;
    std::fs::write(
        tree.path().join("latin1.c"),
        b"/* caf\xe9 */\nCTEST_DEF(still_found) {}\n",
    )
    .context("write latin-1 source")?;
    let root = root_of(&tree)?;

    let registry = scan(&root, "cmainc.c")?;

    let found = names(&registry);
    ensure!(found == ["still_found"], "got {found:?}");
    Ok(())
}

#[test]
fn scanning_an_empty_tree_yields_an_empty_registry() -> Result<()> {
    let tree = SourceTree::new()?;
    let root = root_of(&tree)?;
    let registry = scan(&root, "cmainc.c")?;
    ensure!(
        registry.is_empty() && registry.file_count() == 0,
        "expected empty"
    );
    Ok(())
}

#[cfg(unix)]
#[test]
fn unreadable_subdirectory_is_skipped() -> Result<()> {
    use std::fs::{self, Permissions};
    use std::os::unix::fs::PermissionsExt;

    let tree = SourceTree::new()?
        .file("a.c", "CTEST_DEF(alpha) {}\n")?
        .file("locked/hidden.c", "CTEST_DEF(hidden) {}\n")?;
    let root = root_of(&tree)?;
    let locked = root.join("locked");
    let set_mode = |mode| fs::set_permissions(&locked, Permissions::from_mode(mode));

    set_mode(0o000).context("lock directory")?;
    if fs::read_dir(&locked).is_ok() {
        // Running as root: permission bits are not enforced.
        set_mode(0o755).context("unlock directory")?;
        return Ok(());
    }
    let scanned = scan(&root, "cmainc.c");
    set_mode(0o755).context("unlock directory")?;

    let registry = scanned?;
    let found = names(&registry);
    ensure!(found == ["alpha"], "got {found:?}");
    Ok(())
}

#[cfg(unix)]
#[test]
fn symlinked_source_files_are_scanned() -> Result<()> {
    use std::os::unix::fs::symlink;

    let outside = SourceTree::new()?.file("target.c", "CTEST_DEF(linked) {}\n")?;
    let tree = SourceTree::new()?
        .file("a.c", "CTEST_DEF(alpha) {}\n")?
        .file("nested/b.c", "CTEST_DEF(nested) {}\n")?;
    symlink(outside.path().join("target.c"), tree.path().join("linked.c"))
        .context("link source file")?;
    symlink(tree.path().join("missing.c"), tree.path().join("dangling.c"))
        .context("link missing file")?;
    symlink(outside.path(), tree.path().join("dir_link")).context("link directory")?;
    let root = root_of(&tree)?;

    let registry = scan(&root, "cmainc.c")?;

    let mut found = names(&registry);
    found.sort_unstable();
    // The directory link would contribute `linked` a second time.
    ensure!(found == ["alpha", "linked", "nested"], "got {found:?}");
    let linked = root.join("linked.c");
    ensure!(
        registry.files().any(|f| f.path == linked),
        "link path should be registered as discovered"
    );
    Ok(())
}
