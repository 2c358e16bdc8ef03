//! Text position utilities for converting between byte offsets and
//! line/column positions.

/// A 0-indexed line/column pair, counted in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineCol {
    pub line: u32,
    pub col: u32,
}

/// Convert a byte offset to a line/column position.
///
/// Handles UTF-8 correctly by counting characters, not bytes.
pub fn offset_to_line_col(text: &str, offset: usize) -> LineCol {
    let mut line = 0;
    let mut col = 0;
    let mut current_offset = 0;

    for ch in text.chars() {
        if current_offset >= offset {
            break;
        }
        if ch == '\n' {
            line += 1;
            col = 0;
        } else {
            col += 1;
        }
        current_offset += ch.len_utf8();
    }

    LineCol { line, col }
}

/// Convert a line/column position to a byte offset.
pub fn line_col_to_offset(text: &str, position: LineCol) -> usize {
    let mut offset = 0;
    let mut current_line = 0;
    let mut current_col = 0;

    for ch in text.chars() {
        if current_line == position.line && current_col == position.col {
            break;
        }
        if current_line > position.line {
            break;
        }
        if ch == '\n' {
            current_line += 1;
            current_col = 0;
        } else {
            current_col += 1;
        }
        offset += ch.len_utf8();
    }

    offset
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_to_line_col_simple() {
        let text = "hello\nworld";
        assert_eq!(offset_to_line_col(text, 0), LineCol { line: 0, col: 0 });
        assert_eq!(offset_to_line_col(text, 5), LineCol { line: 0, col: 5 });
        assert_eq!(offset_to_line_col(text, 6), LineCol { line: 1, col: 0 });
        assert_eq!(offset_to_line_col(text, 11), LineCol { line: 1, col: 5 });
    }

    #[test]
    fn test_line_col_to_offset_simple() {
        let text = "hello\nworld";
        assert_eq!(line_col_to_offset(text, LineCol { line: 0, col: 0 }), 0);
        assert_eq!(line_col_to_offset(text, LineCol { line: 0, col: 5 }), 5);
        assert_eq!(line_col_to_offset(text, LineCol { line: 1, col: 0 }), 6);
        assert_eq!(line_col_to_offset(text, LineCol { line: 1, col: 5 }), 11);
    }

    #[test]
    fn test_roundtrip() {
        let text = "fn main() {\n    let x = 42;\n}";
        for offset in 0..text.len() {
            let pos = offset_to_line_col(text, offset);
            let back = line_col_to_offset(text, pos);
            assert_eq!(back, offset, "roundtrip failed for offset {}", offset);
        }
    }
}
