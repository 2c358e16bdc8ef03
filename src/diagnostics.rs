//! Diagnostic value types shared by the rules, the renderers, and the
//! test matcher.
//!
//! A [`Diagnostic`] is an immutable record of one rule violation. Its span
//! must bound exactly the source expression that caused it — the offending
//! attribute argument or call site, never the whole attribute or the whole
//! declaration — so downstream tooling can underline only the offending
//! token.

use ra_ap_syntax::TextRange;
use serde::{Deserialize, Serialize};

/// Half-open byte range into the analyzed source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl From<TextRange> for Span {
    fn from(range: TextRange) -> Self {
        Self {
            start: range.start().into(),
            end: range.end().into(),
        }
    }
}

/// Diagnostic severity. Every shipped rule reports `Warning`; diagnostics
/// are advisory and never block a build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

/// One reported rule violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Stable rule identifier, e.g. `ECS0001`.
    pub rule: &'static str,
    pub severity: Severity,
    /// Human-readable message naming the offending type and the expected
    /// capability.
    pub message: String,
    pub span: Span,
}

impl Diagnostic {
    pub fn warning(rule: &'static str, message: impl Into<String>, span: Span) -> Self {
        Self {
            rule,
            severity: Severity::Warning,
            message: message.into(),
            span,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_from_text_range() {
        let range = TextRange::new(3.into(), 10.into());
        let span = Span::from(range);
        assert_eq!(span, Span::new(3, 10));
        assert_eq!(span.len(), 7);
    }

    #[test]
    fn test_severity_label() {
        assert_eq!(Severity::Warning.label(), "warning");
    }
}
