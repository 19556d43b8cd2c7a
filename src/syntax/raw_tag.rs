//! Raw tags emitted by the scanner.

use smol_str::SmolStr;
use text_size::{TextRange, TextSize};

use super::region::Region;

/// How a raw tag was written in the document.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RawTagKind {
    /// `{name args}`
    Delimited,
    /// `n:name="args"` on a markup tag.
    Attribute,
}

/// An unvalidated tag occurrence.
///
/// Names keep their sigils (`$foo`, `=$a`, `/if`); interpreting them is up
/// to the tag builders in [`hir`](crate::hir).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawTag {
    pub name: SmolStr,
    pub name_offset: TextSize,
    pub args: String,
    pub args_offset: TextSize,
    /// From the opening delimiter to the closing delimiter, both included:
    /// `end()` is the offset of the closing `}` (or closing quote).
    pub tag_range: TextRange,
    /// Region enclosing the tag when it was recognised.
    pub region: Region,
    pub kind: RawTagKind,
}

impl RawTag {
    pub fn name_range(&self) -> TextRange {
        TextRange::at(self.name_offset, TextSize::of(self.name.as_str()))
    }

    pub fn args_range(&self) -> TextRange {
        TextRange::at(self.args_offset, TextSize::of(self.args.as_str()))
    }

    /// Whether `offset` falls inside the tag, delimiters included.
    pub fn contains(&self, offset: TextSize) -> bool {
        self.tag_range.contains_inclusive(offset)
    }

    pub fn is_attribute(&self) -> bool {
        self.kind == RawTagKind::Attribute
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranges() {
        let tag = RawTag {
            name: SmolStr::new("var"),
            name_offset: TextSize::from(1),
            args: "$prvni".to_string(),
            args_offset: TextSize::from(5),
            tag_range: TextRange::new(TextSize::from(0), TextSize::from(11)),
            region: Region::Markup,
            kind: RawTagKind::Delimited,
        };

        assert_eq!(tag.name_range(), TextRange::new(1.into(), 4.into()));
        assert_eq!(tag.args_range(), TextRange::new(5.into(), 11.into()));
        assert!(tag.contains(TextSize::from(11)));
        assert!(!tag.contains(TextSize::from(12)));
        assert!(!tag.is_attribute());
    }
}
