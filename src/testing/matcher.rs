//! Matching logic for comparing emitted diagnostics with expectations.
//!
//! Matching is bidirectional: an expectation with no matching diagnostic
//! fails, and a diagnostic with no matching expectation fails. A match
//! requires the rule short name and the exact source text covered by the
//! diagnostic's span — a diagnostic underlining more (or less) than the
//! expected token does not count.

use std::collections::HashMap;

use crate::analysis::rules::descriptor_for_id;
use crate::diagnostics::Diagnostic;
use crate::testing::expectation::Expectation;
use crate::util::offset_to_line_col;

/// One diagnostic projected into the terms expectations are written in.
#[derive(Debug, Clone)]
pub struct ActualDiagnostic {
    /// Rule short name, e.g. `non_component`.
    pub rule: String,
    /// The source text covered by the diagnostic's span.
    pub covered: String,
    /// 0-indexed line the span starts on.
    pub line: u32,
    pub message: String,
}

impl ActualDiagnostic {
    pub fn project(source: &str, diagnostic: &Diagnostic) -> Self {
        let rule = descriptor_for_id(diagnostic.rule)
            .map(|d| d.name.to_string())
            .unwrap_or_else(|| diagnostic.rule.to_string());
        let covered = source
            .get(diagnostic.span.start as usize..diagnostic.span.end as usize)
            .unwrap_or_default()
            .to_string();
        let line = offset_to_line_col(source, diagnostic.span.start as usize).line;
        Self {
            rule,
            covered,
            line,
            message: diagnostic.message.clone(),
        }
    }
}

/// Result of matching one line's expectations against its diagnostics.
#[derive(Debug, Clone)]
pub enum MatchResult {
    /// Expectation matched a diagnostic
    Match,
    /// Expectation had no matching diagnostic
    Missing { rule: String, token: String },
    /// Diagnostic had no matching expectation
    Unexpected {
        rule: String,
        covered: String,
        message: String,
    },
}

impl MatchResult {
    pub fn is_match(&self) -> bool {
        matches!(self, MatchResult::Match)
    }
}

/// Match all expectations against all diagnostics, grouped per line.
///
/// Returns one non-match [`MatchResult`] per failure, tagged with its
/// 0-indexed line.
pub fn match_diagnostics(
    expectations: &HashMap<u32, Vec<Expectation>>,
    actuals: &[ActualDiagnostic],
) -> Vec<(u32, MatchResult)> {
    let mut failures = Vec::new();

    let mut actuals_by_line: HashMap<u32, Vec<(&ActualDiagnostic, bool)>> = HashMap::new();
    for actual in actuals {
        actuals_by_line
            .entry(actual.line)
            .or_default()
            .push((actual, false));
    }

    let mut lines: Vec<u32> = expectations
        .keys()
        .chain(actuals_by_line.keys())
        .copied()
        .collect();
    lines.sort_unstable();
    lines.dedup();

    for line in lines {
        let expected = expectations.get(&line).map(Vec::as_slice).unwrap_or(&[]);
        let mut empty = Vec::new();
        let actual = actuals_by_line.get_mut(&line).unwrap_or(&mut empty);

        for exp in expected {
            let found = actual
                .iter_mut()
                .find(|(a, used)| !*used && a.rule == exp.rule && a.covered == exp.token);
            match found {
                Some(slot) => slot.1 = true,
                None => failures.push((
                    line,
                    MatchResult::Missing {
                        rule: exp.rule.clone(),
                        token: exp.token.clone(),
                    },
                )),
            }
        }

        for (a, used) in actual.iter() {
            if !*used {
                failures.push((
                    line,
                    MatchResult::Unexpected {
                        rule: a.rule.clone(),
                        covered: a.covered.clone(),
                        message: a.message.clone(),
                    },
                ));
            }
        }
    }

    failures
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exp(rule: &str, token: &str, line: u32) -> Expectation {
        Expectation {
            rule: rule.to_string(),
            token: token.to_string(),
            line,
            raw: format!("{}: {}", rule, token),
        }
    }

    fn actual(rule: &str, covered: &str, line: u32) -> ActualDiagnostic {
        ActualDiagnostic {
            rule: rule.to_string(),
            covered: covered.to_string(),
            line,
            message: String::new(),
        }
    }

    #[test]
    fn test_exact_match() {
        let mut expectations = HashMap::new();
        expectations.insert(3, vec![exp("non_component", "Plain", 3)]);
        let actuals = vec![actual("non_component", "Plain", 3)];

        assert!(match_diagnostics(&expectations, &actuals).is_empty());
    }

    #[test]
    fn test_missing_diagnostic() {
        let mut expectations = HashMap::new();
        expectations.insert(3, vec![exp("non_component", "Plain", 3)]);

        let failures = match_diagnostics(&expectations, &[]);
        assert_eq!(failures.len(), 1);
        assert!(matches!(failures[0].1, MatchResult::Missing { .. }));
    }

    #[test]
    fn test_unexpected_diagnostic() {
        let actuals = vec![actual("non_component", "Plain", 3)];

        let failures = match_diagnostics(&HashMap::new(), &actuals);
        assert_eq!(failures.len(), 1);
        assert!(matches!(failures[0].1, MatchResult::Unexpected { .. }));
    }

    #[test]
    fn test_wrong_span_fails_both_ways() {
        // The diagnostic covers more than the expected token: that is a
        // span bug, and it must surface as missing + unexpected.
        let mut expectations = HashMap::new();
        expectations.insert(3, vec![exp("non_component", "Plain", 3)]);
        let actuals = vec![actual("non_component", "read, Plain", 3)];

        let failures = match_diagnostics(&expectations, &actuals);
        assert_eq!(failures.len(), 2);
    }

    #[test]
    fn test_duplicate_expectations_need_duplicate_diagnostics() {
        let mut expectations = HashMap::new();
        expectations.insert(
            3,
            vec![exp("non_component", "Plain", 3), exp("non_component", "Plain", 3)],
        );
        let actuals = vec![actual("non_component", "Plain", 3)];

        let failures = match_diagnostics(&expectations, &actuals);
        assert_eq!(failures.len(), 1);
        assert!(matches!(failures[0].1, MatchResult::Missing { .. }));
    }
}
