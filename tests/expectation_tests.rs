//! Expectation-based integration tests.
//!
//! This test runner discovers all `.rs` files in test-fixtures/ that the
//! analyzer should be run over and verifies their `//~` expectations.
//!
//! # Test Organization
//!
//! - Each `.rs` fixture is a test suite for one rule or behavior
//! - `//~ rule: token` comments define the expected diagnostics, where
//!   `token` is the exact source text the diagnostic span must cover
//! - A fixture with no expectations asserts that nothing is emitted

use ecs_lint::testing::{format_results, verify_file, VerificationError};
use std::path::PathBuf;

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test-fixtures")
}

/// Discover all `.rs` files in the fixtures directory.
fn discover_fixture_files() -> Vec<PathBuf> {
    let mut files = Vec::new();

    if let Ok(entries) = std::fs::read_dir(fixtures_dir()) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().map(|e| e == "rs").unwrap_or(false) {
                files.push(path);
            }
        }
    }

    files.sort();
    files
}

#[test]
fn run_expectation_tests() {
    let files = discover_fixture_files();
    assert!(!files.is_empty(), "no fixtures found in {:?}", fixtures_dir());

    let mut failed = 0;
    let mut all_output = String::new();

    for path in &files {
        match verify_file(path) {
            Ok(result) => {
                all_output.push_str(&format_results(&result));
            }
            Err(VerificationError::TestFailures(result)) => {
                failed += 1;
                all_output.push_str(&format_results(&result));
            }
            Err(e) => {
                failed += 1;
                all_output.push_str(&format!("{}: {}\n", path.display(), e));
            }
        }
    }

    println!("\n{}", all_output);

    if failed > 0 {
        panic!("{} fixture(s) failed", failed);
    }
}

/// Filter argument checks.
#[test]
fn test_filter_args_fixture() {
    run_fixture("filter_args");
}

/// Messager argument checks.
#[test]
fn test_messager_args_fixture() {
    run_fixture("messager_args");
}

/// Unique retrieval checks.
#[test]
fn test_unique_usage_fixture() {
    run_fixture("unique_usage");
}

/// Missing framework prelude disables every check.
#[test]
fn test_fail_open_fixture() {
    run_fixture("fail_open");
}

/// Filter and messager diagnostics stay independent.
#[test]
fn test_combined_fixture() {
    run_fixture("combined");
}

/// Malformed and unusual shapes degrade to silence.
#[test]
fn test_edge_cases_fixture() {
    run_fixture("edge_cases");
}

fn run_fixture(name: &str) {
    let path = fixtures_dir().join(format!("{}.rs", name));
    assert!(path.exists(), "{}.rs not found", name);

    match verify_file(&path) {
        Ok(result) => {
            println!("{}", format_results(&result));
        }
        Err(VerificationError::TestFailures(result)) => {
            println!("{}", format_results(&result));
            panic!("{} fixture failed", name);
        }
        Err(e) => {
            panic!("error running {} fixture: {}", name, e);
        }
    }
}
