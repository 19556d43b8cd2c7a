//! Source text positions and ranges.

use std::fmt;
use std::sync::Arc;

// Re-export from text-size for compatibility
pub use text_size::TextRange;
pub use text_size::TextSize;

/// A line and column position in template source.
///
/// Both line and column are 0-indexed internally, but displayed as 1-indexed.
/// Columns count characters, matching the scanner's bookkeeping.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LineCol {
    /// 0-indexed line number
    pub line: u32,
    /// 0-indexed column (in characters)
    pub col: u32,
}

impl LineCol {
    /// Create a new LineCol position.
    #[inline]
    pub const fn new(line: u32, col: u32) -> Self {
        Self { line, col }
    }

    /// Create from 1-indexed line and column (as displayed to users).
    #[inline]
    pub const fn from_one_indexed(line: u32, col: u32) -> Self {
        Self {
            line: line.saturating_sub(1),
            col: col.saturating_sub(1),
        }
    }

    /// Get 1-indexed line number (for display).
    #[inline]
    pub const fn line_one_indexed(self) -> u32 {
        self.line + 1
    }

    /// Get 1-indexed column number (for display).
    #[inline]
    pub const fn col_one_indexed(self) -> u32 {
        self.col + 1
    }
}

impl fmt::Debug for LineCol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line_one_indexed(), self.col_one_indexed())
    }
}

impl fmt::Display for LineCol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line_one_indexed(), self.col_one_indexed())
    }
}

/// Index for converting between byte offsets and line/column positions.
///
/// Raw tags and diagnostics carry byte offsets; editors want line/column.
#[derive(Clone, Debug)]
pub struct LineIndex {
    text: Arc<str>,
    /// Byte offset of the start of each line
    line_starts: Vec<TextSize>,
}

impl LineIndex {
    /// Build a line index from source text.
    pub fn new(text: impl Into<Arc<str>>) -> Self {
        let text = text.into();
        let mut line_starts = vec![TextSize::from(0)];

        for (offset, c) in text.char_indices() {
            if c == '\n' {
                line_starts.push(TextSize::from((offset + 1) as u32));
            }
        }

        Self { text, line_starts }
    }

    /// Convert a byte offset to a line/column position.
    ///
    /// Offsets past the end of the text clamp to the end.
    pub fn line_col(&self, offset: TextSize) -> LineCol {
        let offset = offset.min(TextSize::of(&*self.text));
        let line = self
            .line_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1);

        let line_start = usize::from(self.line_starts[line]);
        let col = self
            .text
            .get(line_start..usize::from(offset))
            .map_or(0, |s| s.chars().count());

        LineCol {
            line: line as u32,
            col: col as u32,
        }
    }

    /// Convert both ends of a range.
    pub fn line_col_range(&self, range: TextRange) -> (LineCol, LineCol) {
        (self.line_col(range.start()), self.line_col(range.end()))
    }

    /// Convert a line/column position to a byte offset.
    pub fn offset(&self, line_col: LineCol) -> Option<TextSize> {
        let line_start = usize::from(*self.line_starts.get(line_col.line as usize)?);
        let line_end = self
            .line_starts
            .get(line_col.line as usize + 1)
            .map_or(self.text.len(), |&s| usize::from(s));
        let line = &self.text[line_start..line_end];

        let mut chars = line.char_indices();
        let byte_col = match chars.nth(line_col.col as usize) {
            Some((idx, _)) => idx,
            None if line.chars().count() == line_col.col as usize => line.len(),
            None => return None,
        };
        Some(TextSize::from((line_start + byte_col) as u32))
    }

    /// The indexed text.
    pub fn text(&self) -> &Arc<str> {
        &self.text
    }

    /// Length of the indexed text in bytes.
    pub fn text_len(&self) -> TextSize {
        TextSize::of(&*self.text)
    }

    /// Get the number of lines.
    pub fn len(&self) -> usize {
        self.line_starts.len()
    }

    /// Check if there are no lines (never true; an empty text has one line).
    pub fn is_empty(&self) -> bool {
        self.line_starts.is_empty()
    }
}
