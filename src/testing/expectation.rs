//! Expectation parsing for diagnostic tests.
//!
//! This module provides types and parsing for `//~` comments that express
//! expected diagnostics in test fixtures.
//!
//! Uses rust-analyzer's parser to extract comments, ensuring accurate line
//! numbers and proper handling of edge cases.
//!
//! # Syntax
//!
//! ```text
//! //~ rule: token              // One diagnostic of `rule` whose span
//!                              // covers exactly `token` on this line
//! //~ rule: a, rule: b         // Multiple diagnostics on one line
//! //~^ rule: token             // Applies to the line above
//! ```
//!
//! `rule` is a rule short name (`non_component`, `non_message`,
//! `unmarked_unique`); `token` is the exact source text the diagnostic
//! span must bound.

use std::collections::HashMap;

use ra_ap_syntax::{SourceFile, SyntaxKind, SyntaxToken};

/// A single expectation parsed from a `//~` comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expectation {
    /// Rule short name.
    pub rule: String,
    /// Exact source text the diagnostic span must cover.
    pub token: String,
    /// Line number the diagnostic must start on (0-indexed).
    pub line: u32,
    /// Original comment text for error messages.
    pub raw: String,
}

/// Error during expectation parsing.
#[derive(Debug, Clone)]
pub enum ParseError {
    /// Unknown rule short name
    UnknownRule { line: u32, rule: String },
    /// Malformed expectation syntax
    MalformedExpectation { line: u32, text: String },
    /// Missing token after colon
    MissingToken { line: u32, rule: String },
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::UnknownRule { line, rule } => {
                write!(f, "line {}: unknown rule: '{}'", line + 1, rule)
            }
            ParseError::MalformedExpectation { line, text } => {
                write!(f, "line {}: malformed expectation: '{}'", line + 1, text)
            }
            ParseError::MissingToken { line, rule } => {
                write!(f, "line {}: missing token for rule '{}'", line + 1, rule)
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// All expectations for a fixture file, grouped by line.
#[derive(Debug, Default)]
pub struct ExpectationSet {
    /// Expectations grouped by 0-indexed line number.
    pub by_line: HashMap<u32, Vec<Expectation>>,
}

impl ExpectationSet {
    pub fn new() -> Self {
        Self {
            by_line: HashMap::new(),
        }
    }

    /// Parse all `//~` expectations from source code.
    ///
    /// Comments are found through the parser rather than by scanning
    /// lines, so markers inside string literals are never misread.
    ///
    /// Returns the expectation set and any parse errors encountered.
    pub fn parse(source: &str) -> (Self, Vec<ParseError>) {
        let mut set = ExpectationSet::new();
        let mut errors = Vec::new();

        let parse = SourceFile::parse(source, ra_ap_syntax::Edition::Edition2021);
        let syntax = parse.syntax_node();

        for token in syntax
            .descendants_with_tokens()
            .filter_map(|it| it.into_token())
        {
            if !is_expectation_comment(&token) {
                continue;
            }

            let text = token.text();
            let range = token.text_range();
            let line_num = byte_offset_to_line(source, range.start().into());

            let after_marker = &text[3..]; // Skip "//~"
            let (target_line, expectation_text) = parse_line_offset(after_marker, line_num);

            match parse_expectation_content(expectation_text.trim(), target_line) {
                Ok(expectations) => {
                    set.by_line
                        .entry(target_line)
                        .or_default()
                        .extend(expectations);
                }
                Err(e) => errors.push(e),
            }
        }

        (set, errors)
    }

    pub fn get(&self, line: u32) -> Option<&Vec<Expectation>> {
        self.by_line.get(&line)
    }

    pub fn is_empty(&self) -> bool {
        self.by_line.is_empty()
    }

    pub fn len(&self) -> usize {
        self.by_line.values().map(|v| v.len()).sum()
    }
}

/// Check if a token is a `//~` expectation comment.
fn is_expectation_comment(token: &SyntaxToken) -> bool {
    token.kind() == SyntaxKind::COMMENT && token.text().starts_with("//~")
}

/// Convert byte offset to 0-indexed line number.
fn byte_offset_to_line(source: &str, offset: usize) -> u32 {
    source[..offset.min(source.len())]
        .chars()
        .filter(|&c| c == '\n')
        .count() as u32
}

/// Parse line offset markers (^) and return (target_line, remaining_text).
fn parse_line_offset(text: &str, current_line: u32) -> (u32, &str) {
    let trimmed = text.trim_start();

    if trimmed.starts_with('^') {
        let caret_count = trimmed.chars().take_while(|&c| c == '^').count();
        let target = current_line.saturating_sub(caret_count as u32);
        (target, &trimmed[caret_count..])
    } else {
        (current_line, trimmed)
    }
}

/// Parse the content of an expectation comment.
///
/// Format: `rule: token` or `rule: token, rule: token`.
fn parse_expectation_content(text: &str, line: u32) -> Result<Vec<Expectation>, ParseError> {
    if text.is_empty() {
        return Ok(Vec::new());
    }

    let mut expectations = Vec::new();
    for part in text.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        expectations.push(parse_single_expectation(part, line)?);
    }

    Ok(expectations)
}

/// Parse a single expectation like `non_component: Plain`.
fn parse_single_expectation(text: &str, line: u32) -> Result<Expectation, ParseError> {
    let text = text.trim();

    let Some((rule, token)) = text.split_once(':') else {
        return Err(ParseError::MalformedExpectation {
            line,
            text: text.to_string(),
        });
    };

    let rule = rule.trim();
    if crate::analysis::rules::descriptor_for_name(rule).is_none() {
        return Err(ParseError::UnknownRule {
            line,
            rule: rule.to_string(),
        });
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(ParseError::MissingToken {
            line,
            rule: rule.to_string(),
        });
    }

    Ok(Expectation {
        rule: rule.to_string(),
        token: token.to_string(),
        line,
        raw: text.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_expectation() {
        let exp = parse_single_expectation("non_component: Plain", 4).unwrap();
        assert_eq!(exp.rule, "non_component");
        assert_eq!(exp.token, "Plain");
        assert_eq!(exp.line, 4);
    }

    #[test]
    fn test_parse_unknown_rule() {
        assert!(matches!(
            parse_single_expectation("bogus_rule: Plain", 0),
            Err(ParseError::UnknownRule { .. })
        ));
    }

    #[test]
    fn test_parse_missing_token() {
        assert!(matches!(
            parse_single_expectation("non_component:", 0),
            Err(ParseError::MissingToken { .. })
        ));
    }

    #[test]
    fn test_parse_expectation_set() {
        let source = r#"
#[filter(read, Hit, Plain)] //~ non_component: Hit, non_component: Plain
pub struct Sys;
"#;
        let (set, errors) = ExpectationSet::parse(source);
        assert!(errors.is_empty(), "errors: {:?}", errors);
        assert_eq!(set.len(), 2);

        let line1 = set.get(1).unwrap();
        assert_eq!(line1.len(), 2);
        assert_eq!(line1[0].token, "Hit");
        assert_eq!(line1[1].token, "Plain");
    }

    #[test]
    fn test_parse_line_above() {
        let source = r#"
#[filter(read, Plain)]
//~^ non_component: Plain
pub struct Sys;
"#;
        let (set, errors) = ExpectationSet::parse(source);
        assert!(errors.is_empty());

        // The expectation on line 2 (0-indexed) applies to line 1.
        let line1 = set.get(1).unwrap();
        assert_eq!(line1.len(), 1);
        assert_eq!(line1[0].token, "Plain");
    }
}
