//! Position tracking for diagnostics and edits
//!
//! Stores line/column locations in the coordinate system editors speak:
//! 0-indexed lines, 0-indexed UTF-16 columns.

use super::{LineIndex, TextSize};

/// A position in source code (0-indexed)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LineCol {
    pub line: u32,
    pub col: u32,
}

/// A span representing a range in source code (0-indexed for LSP compatibility)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: LineCol,
    pub end: LineCol,
}

impl LineCol {
    pub fn new(line: u32, col: u32) -> Self {
        Self { line, col }
    }
}

impl Span {
    pub fn new(start: LineCol, end: LineCol) -> Self {
        Self { start, end }
    }

    /// Create a span from line/column coordinates
    pub fn from_coords(start_line: u32, start_col: u32, end_line: u32, end_col: u32) -> Self {
        Self {
            start: LineCol::new(start_line, start_col),
            end: LineCol::new(end_line, end_col),
        }
    }

    /// Check if a position falls within this span
    pub fn contains(&self, position: LineCol) -> bool {
        self.start <= position && position <= self.end
    }
}

/// An editor edit: replace `range` with `text`, or the whole buffer when
/// `range` is `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChange {
    pub range: Option<(LineCol, LineCol)>,
    pub text: String,
}

impl TextChange {
    pub fn full(text: impl Into<String>) -> Self {
        Self {
            range: None,
            text: text.into(),
        }
    }

    pub fn replace(start: LineCol, end: LineCol, text: impl Into<String>) -> Self {
        Self {
            range: Some((start, end)),
            text: text.into(),
        }
    }
}

/// Apply `changes` in order to `text`.
///
/// Positions past the end of the buffer clamp to the end.
pub fn apply_changes(text: &str, changes: &[TextChange]) -> String {
    let mut current = text.to_string();
    for change in changes {
        let Some((start, end)) = change.range else {
            current = change.text.clone();
            continue;
        };
        let index = LineIndex::new(&current);
        let len = TextSize::of(current.as_str());
        let start = index.offset(&current, start).unwrap_or(len);
        let end = index.offset(&current, end).unwrap_or(len).max(start);
        current.replace_range(usize::from(start)..usize::from(end), &change.text);
    }
    current
}
