//! Report rendering for diagnostics.
//!
//! Two formats share one invariant: positions are derived from the
//! diagnostic's span against the analyzed source, so what gets underlined
//! (or serialized) is exactly the offending argument or call site.
//!
//! | Format | Description |
//! |--------|-------------|
//! | `text` | Rustc-style blocks with line numbers and underlines (default) |
//! | `json` | Machine-readable report for editors and CI |

mod json;
mod text;

pub use json::{render_json, JsonDiagnostic, JsonSpan};
pub use text::render_text;

use std::str::FromStr;

/// Output format selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    #[default]
    Text,
    Json,
}

impl Format {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "term" => Some(Self::Text),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Format::parse(s).ok_or_else(|| format!("unknown format '{}'; expected: text, json", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parse() {
        assert_eq!(Format::parse("text"), Some(Format::Text));
        assert_eq!(Format::parse("JSON"), Some(Format::Json));
        assert_eq!(Format::parse("html"), None);
    }
}
