//! Text renderer - rustc-style blocks with line numbers and underlines.

use crate::diagnostics::Diagnostic;
use crate::util::offset_to_line_col;

/// Render diagnostics as rustc-style blocks.
///
/// Each block shows the source line with a `─` underline bounding the
/// diagnostic's span. Positions in the header are 1-indexed.
pub fn render_text(file_name: &str, source: &str, diagnostics: &[Diagnostic]) -> String {
    let mut output = String::new();
    let lines: Vec<&str> = source.lines().collect();
    let line_num_width = lines.len().to_string().len().max(2);

    for diagnostic in diagnostics {
        let start = offset_to_line_col(source, diagnostic.span.start as usize);
        let end = offset_to_line_col(source, diagnostic.span.end as usize);

        output.push_str(&format!(
            "{}[{}]: {}\n",
            diagnostic.severity.label(),
            diagnostic.rule,
            diagnostic.message
        ));
        output.push_str(&format!(
            "{:>width$} ╭─ {}:{}:{}\n",
            "",
            file_name,
            start.line + 1,
            start.col + 1,
            width = line_num_width
        ));
        output.push_str(&format!("{:>width$} │\n", "", width = line_num_width));

        let line = lines.get(start.line as usize).copied().unwrap_or_default();
        output.push_str(&format!(
            "{:>width$} │ {}\n",
            start.line + 1,
            line,
            width = line_num_width
        ));

        // Underline from the start column to the end column (or to the end
        // of the line when the span continues past it).
        let underline_end = if end.line == start.line {
            end.col
        } else {
            line.chars().count() as u32
        };
        let pad: String = " ".repeat(start.col as usize);
        let underline: String = "─".repeat(underline_end.saturating_sub(start.col).max(1) as usize);
        output.push_str(&format!(
            "{:>width$} │ {}{}\n",
            "",
            pad,
            underline,
            width = line_num_width
        ));
        output.push_str(&format!("{:>width$} ╰─\n", "", width = line_num_width));
        output.push('\n');
    }

    if !diagnostics.is_empty() {
        output.push_str(&format!(
            "warning: {} warning{} emitted\n",
            diagnostics.len(),
            if diagnostics.len() == 1 { "" } else { "s" }
        ));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{Diagnostic, Span};

    #[test]
    fn test_underline_bounds_span() {
        let source = "#[filter(read, Plain)]\npub struct Sys;\n";
        let start = source.find("Plain").unwrap() as u32;
        let diagnostic = Diagnostic::warning(
            "ECS0001",
            "type `Plain` in `#[filter]` does not implement `Component`",
            Span::new(start, start + 5),
        );

        let rendered = render_text("demo.rs", source, &[diagnostic]);
        assert!(rendered.contains("warning[ECS0001]"));
        assert!(rendered.contains("demo.rs:1:16"));
        assert!(rendered.contains("─────"));
        assert!(rendered.contains("1 warning emitted"));
    }

    #[test]
    fn test_no_diagnostics_renders_empty() {
        assert!(render_text("demo.rs", "pub struct S;\n", &[]).is_empty());
    }
}
