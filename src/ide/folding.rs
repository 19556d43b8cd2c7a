//! Folding ranges: paired template tags spanning several lines.
//!
//! `{name ...}` pairs with the next unmatched `{/name}`. Tags that are never
//! closed (`{var}`, `{include}`, prints) simply do not fold.

use text_size::{TextRange, TextSize};

use super::analysis::DocumentAnalysis;
use crate::base::LineCol;
use crate::syntax::RawTag;

/// A foldable region from an opening tag to its closing tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoldingRange {
    /// Opening tag start to closing tag end.
    pub range: TextRange,
    pub start: LineCol,
    pub end: LineCol,
    /// Tag name, e.g. `foreach`.
    pub name: String,
}

/// Get folding ranges for a document, sorted by start.
pub fn folding_ranges(analysis: &DocumentAnalysis) -> Vec<FoldingRange> {
    let mut open: Vec<&RawTag> = Vec::new();
    let mut ranges = Vec::new();

    for tag in analysis.raw_tags().iter().filter(|t| !t.is_attribute()) {
        let Some(closing) = tag.name.strip_prefix('/') else {
            open.push(tag);
            continue;
        };
        let Some(pos) = open.iter().rposition(|o| o.name == closing) else {
            continue;
        };
        let opening = open[pos];
        open.truncate(pos);

        // Tag ranges end on the `}`; fold through it.
        let end = tag.tag_range.end() + TextSize::from(1);
        let range = TextRange::new(opening.tag_range.start(), end);
        let (start, end) = analysis.line_index().line_col_range(range);
        // Only multiline regions
        if end.line > start.line {
            ranges.push(FoldingRange {
                range,
                start,
                end,
                name: closing.to_string(),
            });
        }
    }

    ranges.sort_by_key(|r| r.range.start());
    ranges
}
