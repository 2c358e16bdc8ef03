//! Error types for expectation verification.

use std::path::PathBuf;

use thiserror::Error;

use super::expectation::ParseError;
use super::matcher::MatchResult;

/// A single expectation failure.
#[derive(Debug, Clone)]
pub struct ExpectationFailure {
    /// Line number (0-indexed; displayed 1-indexed).
    pub line: u32,
    /// The match result describing the failure.
    pub result: MatchResult,
    /// The source line content.
    pub source_line: String,
}

impl std::fmt::Display for ExpectationFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: ", self.line + 1)?;
        match &self.result {
            MatchResult::Match => write!(f, "ok"),
            MatchResult::Missing { rule, token } => {
                write!(f, "expected {} diagnostic covering `{}`, none emitted", rule, token)
            }
            MatchResult::Unexpected {
                rule,
                covered,
                message,
            } => {
                write!(
                    f,
                    "unexpected {} diagnostic covering `{}` ({})",
                    rule, covered, message
                )
            }
        }
    }
}

/// Result of verifying one fixture file.
#[derive(Debug)]
pub struct FileTestResult {
    /// Path to the fixture file.
    pub path: PathBuf,
    /// Number of expectations checked.
    pub expectations: usize,
    /// Number of diagnostics emitted.
    pub diagnostics: usize,
    /// List of failures (empty if passed).
    pub failures: Vec<ExpectationFailure>,
}

impl FileTestResult {
    /// Returns true if the fixture passed (no failures).
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }
}

impl std::fmt::Display for FileTestResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.path.display())?;
        if self.passed() {
            writeln!(
                f,
                "  \u{2713} {} expectation(s), {} diagnostic(s)",
                self.expectations, self.diagnostics
            )?;
        } else {
            for failure in &self.failures {
                writeln!(f, "  \u{2717} {}", failure)?;
                if !failure.source_line.is_empty() {
                    writeln!(f, "      {}", failure.source_line.trim_end())?;
                }
            }
        }
        Ok(())
    }
}

/// Error during verification.
#[derive(Debug, Error)]
pub enum VerificationError {
    #[error("failed to read fixture: {0}")]
    Io(#[from] std::io::Error),

    #[error("expectation parse errors:\n{}", format_parse_errors(.0))]
    ParseErrors(Vec<ParseError>),

    #[error("{0}")]
    TestFailures(FileTestResult),
}

fn format_parse_errors(errors: &[ParseError]) -> String {
    errors
        .iter()
        .map(|e| format!("  {}", e))
        .collect::<Vec<_>>()
        .join("\n")
}
