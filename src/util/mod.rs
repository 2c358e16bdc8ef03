//! Shared utilities for ecs-lint.

mod position;

pub use position::{line_col_to_offset, offset_to_line_col, LineCol};
