//! Scanner regions and the region stack.

use std::fmt;

/// The kind of syntax span the scanner believes it is inside.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Region {
    /// Plain document body.
    Markup,
    /// Inside `<...>`.
    MarkupTag,
    /// Inside `{...}`.
    TemplateTag,
    /// Inside `'...'`.
    SingleQuoted,
    /// Inside `"..."`.
    DoubleQuoted,
}

impl Region {
    pub const fn name(self) -> &'static str {
        match self {
            Region::Markup => "Markup",
            Region::MarkupTag => "MarkupTag",
            Region::TemplateTag => "TemplateTag",
            Region::SingleQuoted => "SingleQuoted",
            Region::DoubleQuoted => "DoubleQuoted",
        }
    }

    /// Whether this region is a quoted string literal.
    pub const fn is_quoted(self) -> bool {
        matches!(self, Region::SingleQuoted | Region::DoubleQuoted)
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// LIFO stack of open regions, innermost on top.
///
/// The stack itself never fails; detecting underflow is the scanner's job.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegionStack {
    regions: Vec<Region>,
}

impl RegionStack {
    /// Create an empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a stack holding a single `Markup` region.
    pub fn seeded() -> Self {
        Self {
            regions: vec![Region::Markup],
        }
    }

    pub fn push(&mut self, region: Region) {
        self.regions.push(region);
    }

    pub fn pop(&mut self) -> Option<Region> {
        self.regions.pop()
    }

    /// Region `depth` entries below the top (`0` is the top itself).
    pub fn top(&self, depth: usize) -> Option<Region> {
        self.regions
            .len()
            .checked_sub(depth + 1)
            .map(|idx| self.regions[idx])
    }

    pub fn size(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn clear(&mut self) {
        self.regions.clear();
    }

    /// Whether the top entries equal `pattern`, read top-of-stack first.
    pub fn matches_from_top(&self, pattern: &[Region]) -> bool {
        pattern
            .iter()
            .enumerate()
            .all(|(depth, &region)| self.top(depth) == Some(region))
    }

    /// Regions from bottom to top.
    pub fn as_slice(&self) -> &[Region] {
        &self.regions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_pop_top() {
        let mut stack = RegionStack::seeded();
        stack.push(Region::MarkupTag);
        stack.push(Region::DoubleQuoted);

        assert_eq!(stack.size(), 3);
        assert_eq!(stack.top(0), Some(Region::DoubleQuoted));
        assert_eq!(stack.top(1), Some(Region::MarkupTag));
        assert_eq!(stack.top(2), Some(Region::Markup));
        assert_eq!(stack.top(3), None);

        assert_eq!(stack.pop(), Some(Region::DoubleQuoted));
        assert_eq!(stack.top(0), Some(Region::MarkupTag));
    }

    #[test]
    fn test_pop_empty_is_none() {
        let mut stack = RegionStack::new();
        assert_eq!(stack.pop(), None);
        assert_eq!(stack.top(0), None);
        assert!(stack.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut stack = RegionStack::seeded();
        stack.push(Region::TemplateTag);
        stack.clear();
        assert_eq!(stack.size(), 0);
    }

    #[test]
    fn test_matches_from_top() {
        let mut stack = RegionStack::seeded();
        stack.push(Region::MarkupTag);
        stack.push(Region::SingleQuoted);

        assert!(stack.matches_from_top(&[Region::SingleQuoted]));
        assert!(stack.matches_from_top(&[Region::SingleQuoted, Region::MarkupTag]));
        assert!(!stack.matches_from_top(&[Region::MarkupTag]));
        assert!(!stack.matches_from_top(&[
            Region::SingleQuoted,
            Region::MarkupTag,
            Region::Markup,
            Region::Markup,
        ]));
    }
}
