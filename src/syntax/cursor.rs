//! Scan cursor: position bookkeeping and bounded sub-matches.
//!
//! The byte offset is the authoritative cursor. Line and column follow it
//! and are recomputed from the consumed text, never tracked independently.

use regex::Regex;

/// A position inside the scanned document.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct ScanPosition {
    /// Byte offset from the start of the document.
    pub offset: usize,
    /// 0-indexed line.
    pub line: u32,
    /// 0-indexed column, in characters.
    pub column: u32,
}

/// The text a sub-match captured, with its absolute byte offset.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SubMatch<'a> {
    pub text: &'a str,
    pub offset: usize,
}

#[derive(Clone, Debug)]
pub(crate) struct Cursor<'a> {
    source: &'a str,
    pos: ScanPosition,
    window: usize,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(source: &'a str, window: usize) -> Self {
        Self {
            source,
            pos: ScanPosition::default(),
            window: window.max(1),
        }
    }

    pub(crate) fn position(&self) -> ScanPosition {
        self.pos
    }

    /// Take a checkpoint to return to if a speculative match fails.
    pub(crate) fn snapshot(&self) -> ScanPosition {
        self.pos
    }

    pub(crate) fn restore(&mut self, checkpoint: ScanPosition) {
        self.pos = checkpoint;
    }

    pub(crate) fn reset(&mut self) {
        self.pos = ScanPosition::default();
    }

    pub(crate) fn current(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// The character right after the current one.
    pub(crate) fn peek_next(&self) -> Option<char> {
        let mut chars = self.rest().chars();
        chars.next()?;
        chars.next()
    }

    /// The character right before the current one.
    pub(crate) fn peek_prev(&self) -> Option<char> {
        self.source.get(..self.pos.offset)?.chars().next_back()
    }

    /// Advance past the current character.
    pub(crate) fn bump(&mut self) {
        if let Some(c) = self.current() {
            self.pos.offset += c.len_utf8();
            if c == '\n' {
                self.pos.line += 1;
                self.pos.column = 0;
            } else {
                self.pos.column += 1;
            }
        }
    }

    /// Match `literal` at the cursor and consume it.
    pub(crate) fn match_literal(&mut self, literal: &str) -> bool {
        if self.rest().starts_with(literal) {
            self.advance_over(literal);
            true
        } else {
            false
        }
    }

    /// Run an anchored regex over the lookahead window at the cursor.
    ///
    /// On success the whole match is consumed and the first participating
    /// group among `groups` (in priority order) is returned. A match in which
    /// none of the requested groups took part counts as a failure and
    /// consumes nothing.
    pub(crate) fn match_regex(&mut self, regex: &Regex, groups: &[&str]) -> Option<SubMatch<'a>> {
        let start = self.pos.offset;
        let window = self.lookahead();
        let caps = regex.captures(window)?;
        let whole = caps.get(0)?;
        if whole.start() != 0 {
            return None;
        }

        let group = groups.iter().find_map(|name| caps.name(name))?;
        let captured = SubMatch {
            text: group.as_str(),
            offset: start + group.start(),
        };
        self.advance_over(whole.as_str());
        Some(captured)
    }

    fn rest(&self) -> &'a str {
        &self.source[self.pos.offset..]
    }

    fn lookahead(&self) -> &'a str {
        let mut end = (self.pos.offset + self.window).min(self.source.len());
        while !self.source.is_char_boundary(end) {
            end -= 1;
        }
        &self.source[self.pos.offset..end]
    }

    fn advance_over(&mut self, consumed: &str) {
        self.pos.offset += consumed.len();
        match consumed.rfind('\n') {
            Some(last_newline) => {
                self.pos.line += consumed.matches('\n').count() as u32;
                self.pos.column = consumed[last_newline + 1..].chars().count() as u32;
            }
            None => self.pos.column += consumed.chars().count() as u32,
        }
    }
}
