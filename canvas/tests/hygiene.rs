//! Source hygiene for canvas-core.
//!
//! Expected conditions in the editing core (a dangling binding, a zero-size
//! target, a click on nothing) return unchanged values instead of failing, so
//! production code under `src/` has no business panicking or silently
//! discarding a `Result`. Hosts own stdout; diagnostics go through `tracing`.
//! Unit tests live in sibling `*_test.rs` files and must be attached to the
//! module they cover, or they never run.

use std::fs;
use std::path::{Path, PathBuf};

struct SourceFile {
    path: PathBuf,
    content: String,
}

impl SourceFile {
    fn is_unit_test(&self) -> bool {
        self.path.to_string_lossy().ends_with("_test.rs")
    }

    /// Lines containing any of `patterns`.
    fn hits(&self, patterns: &[&str]) -> usize {
        self.content.lines().filter(|line| patterns.iter().any(|p| line.contains(p))).count()
    }
}

/// Every `.rs` file under `src/`, sibling test files included.
fn source_tree() -> Vec<SourceFile> {
    let mut files = Vec::new();
    walk(Path::new("src"), &mut files);
    files
}

fn walk(dir: &Path, out: &mut Vec<SourceFile>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            walk(&path, out);
        } else if path.extension().is_some_and(|e| e == "rs")
            && let Ok(content) = fs::read_to_string(&path)
        {
            out.push(SourceFile { path, content });
        }
    }
}

/// Fail with a per-file report if any production file matches `patterns`.
fn forbid(what: &str, patterns: &[&str]) {
    let report: Vec<String> = source_tree()
        .iter()
        .filter(|f| !f.is_unit_test())
        .filter_map(|f| match f.hits(patterns) {
            0 => None,
            n => Some(format!("  {}: {n}", f.path.display())),
        })
        .collect();
    assert!(report.is_empty(), "{what} in production code:\n{}", report.join("\n"));
}

// =============================================================================
// FORBIDDEN PATTERNS
// =============================================================================

#[test]
fn no_panicking_calls() {
    forbid(
        "panicking call",
        &[".unwrap()", ".expect(", "panic!(", "unreachable!(", "todo!(", "unimplemented!("],
    );
}

#[test]
fn no_discarded_results() {
    forbid("discarded result", &["let _ =", ".ok()"]);
}

#[test]
fn no_stray_output() {
    forbid("direct output (use tracing)", &["println!(", "eprintln!(", "dbg!("]);
}

#[test]
fn no_dead_code_allowances() {
    forbid("dead code allowance", &["#[allow(dead_code)]"]);
}

// =============================================================================
// TEST LAYOUT
// =============================================================================

#[test]
fn every_sibling_test_file_is_attached() {
    let files = source_tree();
    let mut orphans = Vec::new();
    for test in files.iter().filter(|f| f.is_unit_test()) {
        let Some(name) = test.path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
            continue;
        };
        let owner = test.path.with_file_name(name.replace("_test.rs", ".rs"));
        let attach = format!("#[path = \"{name}\"]");
        let attached = files.iter().any(|f| f.path == owner && f.content.contains(&attach));
        if !attached {
            orphans.push(format!("  {} (expected in {})", test.path.display(), owner.display()));
        }
    }
    assert!(orphans.is_empty(), "unattached test files:\n{}", orphans.join("\n"));
}

#[test]
fn source_tree_is_found() {
    // Every check passes vacuously on an empty walk.
    let files = source_tree();
    assert!(files.iter().any(|f| f.path.ends_with("lib.rs")));
    assert!(files.iter().any(SourceFile::is_unit_test));
}
