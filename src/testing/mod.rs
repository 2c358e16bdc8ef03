//! Test infrastructure for diagnostic expectation tests.
//!
//! This module provides a framework for writing analyzer tests where the
//! expected diagnostics are embedded directly in the fixture source using
//! `//~` comments:
//!
//! ```rust,ignore
//! #[filter(read, Hit, Position)] //~ non_component: Hit
//! pub struct DamageSystem;
//! ```
//!
//! An expectation names a rule and the exact source text the diagnostic's
//! span must cover, so the span invariant is checked on every fixture.
//! Matching is bidirectional: diagnostics nobody expected fail the
//! fixture too.
//!
//! # Usage
//!
//! ```rust,ignore
//! use ecs_lint::testing::verify_file;
//!
//! let result = verify_file(&path)?;
//! assert!(result.passed());
//! ```

pub mod error;
pub mod expectation;
pub mod matcher;

pub use error::{ExpectationFailure, FileTestResult, VerificationError};
pub use expectation::{Expectation, ExpectationSet, ParseError};
pub use matcher::{ActualDiagnostic, MatchResult};

use std::path::Path;

use crate::analysis::AnalysisEngine;
use matcher::match_diagnostics;

/// Verify expectations in a fixture file on disk.
pub fn verify_file(path: &Path) -> Result<FileTestResult, VerificationError> {
    let source = std::fs::read_to_string(path)?;
    verify_source(path, &source)
}

/// Verify expectations in fixture source.
///
/// This is the main entry point for testing. It:
/// 1. Parses `//~` expectations out of the source
/// 2. Runs the default rule set over the source
/// 3. Matches diagnostics against expectations, both ways
/// 4. Returns a per-file result with any failures
pub fn verify_source(path: &Path, source: &str) -> Result<FileTestResult, VerificationError> {
    let (expectations, parse_errors) = ExpectationSet::parse(source);
    if !parse_errors.is_empty() {
        return Err(VerificationError::ParseErrors(parse_errors));
    }

    let engine = AnalysisEngine::with_default_rules();
    let diagnostics = engine.analyze(source);
    let actuals: Vec<ActualDiagnostic> = diagnostics
        .iter()
        .map(|d| ActualDiagnostic::project(source, d))
        .collect();

    let lines: Vec<&str> = source.lines().collect();
    let failures: Vec<ExpectationFailure> = match_diagnostics(&expectations.by_line, &actuals)
        .into_iter()
        .map(|(line, result)| ExpectationFailure {
            line,
            result,
            source_line: lines.get(line as usize).copied().unwrap_or_default().to_string(),
        })
        .collect();

    let result = FileTestResult {
        path: path.to_path_buf(),
        expectations: expectations.len(),
        diagnostics: diagnostics.len(),
        failures,
    };

    if result.passed() {
        Ok(result)
    } else {
        Err(VerificationError::TestFailures(result))
    }
}

/// Format verification results for display.
pub fn format_results(result: &FileTestResult) -> String {
    result.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_verify_source_passes_on_exact_match() {
        let source = r#"
pub trait Component {}
pub trait Message {}
pub trait System {}

pub struct Position;
impl Component for Position {}
pub struct Plain;

#[filter(read, Position, Plain)] //~ non_component: Plain
pub struct Sys;
impl System for Sys {}
"#;
        let result = verify_source(&PathBuf::from("inline.rs"), source).unwrap();
        assert!(result.passed());
        assert_eq!(result.expectations, 1);
        assert_eq!(result.diagnostics, 1);
    }

    #[test]
    fn test_verify_source_fails_on_unexpected_diagnostic() {
        let source = r#"
pub trait Component {}
pub struct Plain;

#[filter(read, Plain)]
pub struct Sys;
"#;
        let err = verify_source(&PathBuf::from("inline.rs"), source).unwrap_err();
        match err {
            VerificationError::TestFailures(result) => {
                assert_eq!(result.failures.len(), 1);
            }
            other => panic!("expected test failures, got {:?}", other),
        }
    }

    #[test]
    fn test_verify_source_rejects_bad_expectations() {
        let source = "//~ bogus_rule: Foo\npub struct S;\n";
        let err = verify_source(&PathBuf::from("inline.rs"), source).unwrap_err();
        assert!(matches!(err, VerificationError::ParseErrors(_)));
    }
}
