//! Byte-offset ranges and line/column conversion.

pub use text_size::{TextRange, TextSize};

use super::LineCol;

/// Line-start table for a text buffer.
///
/// Columns are measured in UTF-16 code units, which is what editor
/// protocols send for positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    /// Byte offset of the first character of each line.
    line_starts: Vec<TextSize>,
    /// Total length of the indexed text.
    len: TextSize,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![TextSize::new(0)];
        for (offset, byte) in text.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push(TextSize::new(offset as u32 + 1));
            }
        }
        Self {
            line_starts,
            len: TextSize::of(text),
        }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Convert a byte offset into a line/column position.
    ///
    /// Offsets past the end clamp to the end of the text.
    pub fn line_col(&self, text: &str, offset: TextSize) -> LineCol {
        let offset = offset.min(self.len);
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        let start = self.line_starts[line];
        let prefix = &text[usize::from(start)..usize::from(offset)];
        let col: usize = prefix.chars().map(char::len_utf16).sum();
        LineCol::new(line as u32, col as u32)
    }

    /// Convert a line/column position into a byte offset.
    ///
    /// A column past the end of its line clamps to the line end; a line past
    /// the end of the text returns `None`.
    pub fn offset(&self, text: &str, pos: LineCol) -> Option<TextSize> {
        let line = pos.line as usize;
        let start = *self.line_starts.get(line)?;
        let end = self
            .line_starts
            .get(line + 1)
            .copied()
            .unwrap_or(self.len);

        let line_text = &text[usize::from(start)..usize::from(end)];
        let mut utf16 = 0u32;
        for (byte_offset, ch) in line_text.char_indices() {
            if utf16 >= pos.col || ch == '\n' || ch == '\r' {
                return Some(start + TextSize::new(byte_offset as u32));
            }
            utf16 += ch.len_utf16() as u32;
        }
        Some(end)
    }
}
