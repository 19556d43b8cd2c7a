//! Completion inside template tags: variables after `$`, tag names after `{`.

use once_cell::sync::Lazy;
use regex::Regex;
use text_size::{TextRange, TextSize};

use super::analysis::DocumentAnalysis;
use crate::hir::known_tag_names;

static VARIABLE_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$(?P<prefix>\w*)\z").unwrap());
static TAG_NAME_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\A\{(?P<prefix>\w*)\z").unwrap());

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CompletionKind {
    Variable,
    Keyword,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompletionItem {
    pub label: String,
    pub kind: CompletionKind,
    /// The variable's type, when known.
    pub detail: Option<String>,
    /// Text the completion replaces (the typed prefix, sigil included).
    pub replace: TextRange,
}

/// Completions at `offset`, sorted by label.
pub fn completions(analysis: &DocumentAnalysis, offset: TextSize) -> Vec<CompletionItem> {
    let Some(tag) = analysis.raw_tag_at(offset) else {
        return Vec::new();
    };
    let start = tag.tag_range.start();
    let Some(before) = analysis.text().get(usize::from(start)..usize::from(offset)) else {
        return Vec::new();
    };

    let mut items = if let Some(caps) = VARIABLE_PREFIX.captures(before) {
        let typed = caps.get(0).map_or(0, |m| m.len());
        let replace = TextRange::new(offset - TextSize::from(typed as u32), offset);
        variable_items(analysis, offset, &caps["prefix"], replace)
    } else if let Some(caps) = TAG_NAME_PREFIX.captures(before) {
        let prefix = &caps["prefix"];
        let replace = TextRange::new(offset - TextSize::of(prefix), offset);
        keyword_items(prefix, replace)
    } else {
        Vec::new()
    };

    items.sort_by(|a, b| a.label.cmp(&b.label));
    items
}

fn variable_items(
    analysis: &DocumentAnalysis,
    offset: TextSize,
    prefix: &str,
    replace: TextRange,
) -> Vec<CompletionItem> {
    analysis
        .variables()
        .visible_at(offset)
        .into_iter()
        // A declaration being typed is not a completion of itself.
        .filter(|decl| decl.name_range.end() != offset)
        .filter(|decl| decl.name.starts_with(prefix))
        .map(|decl| CompletionItem {
            label: format!("${}", decl.name),
            kind: CompletionKind::Variable,
            detail: decl.ty.as_ref().map(|t| t.to_string()),
            replace,
        })
        .collect()
}

fn keyword_items(prefix: &str, replace: TextRange) -> Vec<CompletionItem> {
    known_tag_names()
        .into_iter()
        .filter(|name| name.starts_with(prefix))
        .map(|name| CompletionItem {
            label: name.to_string(),
            kind: CompletionKind::Keyword,
            detail: None,
            replace,
        })
        .collect()
}
