//! JSON report for editors and CI.

use serde::{Deserialize, Serialize};

use crate::diagnostics::{Diagnostic, Severity};
use crate::util::offset_to_line_col;

/// A diagnostic span with both byte offsets and 1-indexed positions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonSpan {
    pub start: u32,
    pub end: u32,
    pub start_line: u32,
    pub start_col: u32,
    pub end_line: u32,
    pub end_col: u32,
}

/// One diagnostic as serialized into the report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonDiagnostic {
    pub rule: String,
    pub severity: Severity,
    pub message: String,
    pub file: String,
    pub span: JsonSpan,
}

impl JsonDiagnostic {
    fn from_diagnostic(file_name: &str, source: &str, diagnostic: &Diagnostic) -> Self {
        let start = offset_to_line_col(source, diagnostic.span.start as usize);
        let end = offset_to_line_col(source, diagnostic.span.end as usize);
        Self {
            rule: diagnostic.rule.to_string(),
            severity: diagnostic.severity,
            message: diagnostic.message.clone(),
            file: file_name.to_string(),
            span: JsonSpan {
                start: diagnostic.span.start,
                end: diagnostic.span.end,
                start_line: start.line + 1,
                start_col: start.col + 1,
                end_line: end.line + 1,
                end_col: end.col + 1,
            },
        }
    }
}

/// Serialize diagnostics as a pretty-printed JSON array.
pub fn render_json(
    file_name: &str,
    source: &str,
    diagnostics: &[Diagnostic],
) -> serde_json::Result<String> {
    let report: Vec<JsonDiagnostic> = diagnostics
        .iter()
        .map(|d| JsonDiagnostic::from_diagnostic(file_name, source, d))
        .collect();
    serde_json::to_string_pretty(&report)
}
