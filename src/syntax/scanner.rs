//! Region-aware scanner for Latte templates.
//!
//! A single pass over the document, one character per step, dispatching on
//! the handful of characters that can change the region: `{ } < > " '`,
//! plus the `n:` prefix of attribute-style tags inside markup tags.
//! Everything else is inert.
//!
//! Known limitations: escaped quotes inside quoted regions and doubled
//! delimiter escapes are not recognised.

use once_cell::sync::Lazy;
use regex::Regex;
use smol_str::SmolStr;
use text_size::{TextRange, TextSize};
use tracing::{debug, debug_span, trace};

use super::cursor::{Cursor, ScanPosition};
use super::error::ScanError;
use super::policy::{self, Transfer};
use super::raw_tag::{RawTag, RawTagKind};
use super::region::{Region, RegionStack};
use crate::config::ScannerConfig;

/// `name`, separating whitespace, `args`.
static TAG_CONTENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\A(\S+)(\s*)(.*)\z").unwrap());

/// Attribute name after the prefix letter and colon (already checked).
static ATTRIBUTE_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^.:(?P<name>[\w.-]+)").unwrap());

static QUOTED_VALUE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^(?:"(?P<dq>[^"]*)"|'(?P<sq>[^']*)')"#).unwrap());

/// Scan `source` with the default configuration.
pub fn scan(source: &str) -> Result<Vec<RawTag>, ScanError> {
    Scanner::new(source).scan()
}

/// Scans one document into [`RawTag`]s.
///
/// A scanner is tied to its document; scan another document with another
/// scanner.
pub struct Scanner<'a> {
    source: &'a str,
    config: ScannerConfig,
    cursor: Cursor<'a>,
    regions: RegionStack,
    /// Offset of the pending `{` and the region enclosing it.
    pending_open: Option<(usize, Region)>,
    tags: Vec<RawTag>,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Self::with_config(source, ScannerConfig::default())
    }

    pub fn with_config(source: &'a str, config: ScannerConfig) -> Self {
        Self {
            source,
            cursor: Cursor::new(source, config.lookahead_window),
            config,
            regions: RegionStack::seeded(),
            pending_open: None,
            tags: Vec::new(),
        }
    }

    /// Regions open at the point where scanning stopped.
    pub fn region_stack(&self) -> &RegionStack {
        &self.regions
    }

    pub fn position(&self) -> ScanPosition {
        self.cursor.position()
    }

    /// Run the scan and return the tags in document order.
    pub fn scan(&mut self) -> Result<Vec<RawTag>, ScanError> {
        let _span = debug_span!("scan", len = self.source.len()).entered();
        self.reset();

        while let Some(c) = self.cursor.current() {
            if self.at_attribute_tag(c) && self.try_attribute_tag() {
                continue;
            }

            match c {
                '{' => self.open_template_tag()?,
                '}' => self.close_template_tag()?,
                '<' => self.open_markup_tag()?,
                '>' => self.close_markup_tag()?,
                '"' => self.toggle(Region::DoubleQuoted)?,
                '\'' => self.toggle(Region::SingleQuoted)?,
                _ => {}
            }
            self.cursor.bump();
        }

        self.finish()?;
        debug!(tags = self.tags.len(), "scan finished");
        Ok(std::mem::take(&mut self.tags))
    }

    fn reset(&mut self) {
        self.cursor.reset();
        self.regions = RegionStack::seeded();
        self.pending_open = None;
        self.tags.clear();
    }

    fn finish(&self) -> Result<(), ScanError> {
        if self.regions.size() > 1 {
            if let Some(region) = self.regions.top(0) {
                return Err(ScanError::Unterminated {
                    offset: self.offset(),
                    region,
                });
            }
        }
        Ok(())
    }

    fn offset(&self) -> TextSize {
        TextSize::from(self.cursor.position().offset as u32)
    }

    fn top(&self) -> Region {
        self.regions.top(0).unwrap_or(Region::Markup)
    }

    /// Request entry into `region`. Returns whether it was pushed.
    fn enter(&mut self, region: Region) -> Result<bool, ScanError> {
        match policy::enter(&self.regions, region) {
            Transfer::Proceed => {
                trace!(offset = self.cursor.position().offset, %region, "enter");
                self.regions.push(region);
                Ok(true)
            }
            Transfer::Ignore => Ok(false),
            Transfer::Deny => Err(ScanError::DisallowedTransfer {
                offset: self.offset(),
                top: self.top(),
                attempted: region,
            }),
        }
    }

    /// Request exit from `region`. Returns whether it was popped.
    fn exit(&mut self, region: Region) -> Result<bool, ScanError> {
        match policy::exit(&self.regions, region) {
            Transfer::Proceed => {
                trace!(offset = self.cursor.position().offset, %region, "exit");
                self.regions.pop();
                Ok(true)
            }
            Transfer::Ignore => Ok(false),
            Transfer::Deny if self.regions.is_empty() => Err(ScanError::EmptyStack {
                offset: self.offset(),
                exiting: region,
            }),
            Transfer::Deny => Err(ScanError::UnexpectedExit {
                offset: self.offset(),
                top: self.top(),
                exiting: region,
            }),
        }
    }

    fn open_markup_tag(&mut self) -> Result<(), ScanError> {
        // `<` inside an open markup tag does not nest.
        if self.regions.top(0) != Some(Region::MarkupTag) {
            self.enter(Region::MarkupTag)?;
        }
        Ok(())
    }

    fn close_markup_tag(&mut self) -> Result<(), ScanError> {
        self.exit(Region::MarkupTag)?;
        Ok(())
    }

    fn toggle(&mut self, quote: Region) -> Result<(), ScanError> {
        if self.regions.top(0) == Some(quote) {
            self.exit(quote)?;
        } else {
            self.enter(quote)?;
        }
        Ok(())
    }

    fn open_template_tag(&mut self) -> Result<(), ScanError> {
        let enclosing = self.top();
        if self.enter(Region::TemplateTag)? {
            self.pending_open = Some((self.cursor.position().offset, enclosing));
        }
        Ok(())
    }

    fn close_template_tag(&mut self) -> Result<(), ScanError> {
        let close = self.cursor.position().offset;
        let pending = self.pending_open;
        if self.exit(Region::TemplateTag)? {
            self.pending_open = None;
            if let Some((open, enclosing)) = pending {
                self.emit_delimited(open, close, enclosing);
            }
        }
        Ok(())
    }

    fn emit_delimited(&mut self, open: usize, close: usize, enclosing: Region) {
        let source = self.source;
        let content_start = open + 1;
        let content = &source[content_start..close];
        let Some(caps) = TAG_CONTENT.captures(content) else {
            trace!(offset = open, "template tag without a name");
            return;
        };
        let (Some(name), Some(sep), Some(args)) = (caps.get(1), caps.get(2), caps.get(3)) else {
            return;
        };

        let name_offset = content_start + name.start();
        let args_offset = name_offset + name.len() + sep.len();
        debug_assert_eq!(content_start + args.start(), args_offset);

        self.push_tag(RawTag {
            name: SmolStr::new(name.as_str()),
            name_offset: TextSize::from(name_offset as u32),
            args: args.as_str().to_string(),
            args_offset: TextSize::from(args_offset as u32),
            tag_range: TextRange::new(TextSize::from(open as u32), TextSize::from(close as u32)),
            region: enclosing,
            kind: RawTagKind::Delimited,
        });
    }

    fn at_attribute_tag(&self, c: char) -> bool {
        c == self.config.attribute_prefix
            && self.cursor.peek_next() == Some(':')
            && self
                .cursor
                .peek_prev()
                .is_some_and(|prev| prev.is_whitespace() || prev == '<')
            && self.regions.top(0) == Some(Region::MarkupTag)
    }

    /// Speculatively match `n:name="value"`.
    ///
    /// Either the whole attribute is consumed and a tag emitted, or the
    /// cursor is restored to where it started.
    fn try_attribute_tag(&mut self) -> bool {
        let checkpoint = self.cursor.snapshot();

        let Some(name) = self.cursor.match_regex(&ATTRIBUTE_NAME, &["name"]) else {
            self.cursor.restore(checkpoint);
            return false;
        };
        if !self.cursor.match_literal("=") {
            self.cursor.restore(checkpoint);
            return false;
        }
        let Some(value) = self.cursor.match_regex(&QUOTED_VALUE, &["dq", "sq"]) else {
            self.cursor.restore(checkpoint);
            return false;
        };

        let closing_quote = self.cursor.position().offset - 1;
        self.push_tag(RawTag {
            name: SmolStr::new(name.text),
            name_offset: TextSize::from(name.offset as u32),
            args: value.text.to_string(),
            args_offset: TextSize::from(value.offset as u32),
            tag_range: TextRange::new(
                TextSize::from(checkpoint.offset as u32),
                TextSize::from(closing_quote as u32),
            ),
            region: Region::MarkupTag,
            kind: RawTagKind::Attribute,
        });
        true
    }

    fn push_tag(&mut self, tag: RawTag) {
        trace!(name = %tag.name, range = ?tag.tag_range, "raw tag");
        self.tags.push(tag);
    }
}
