//! Inlay hints: inferred types of template variables.
//!
//! Variables with a written type annotation get no hint; the type is
//! already on screen.

use text_size::TextRange;

use super::analysis::DocumentAnalysis;
use crate::base::LineCol;
use crate::hir::Tag;

/// Kind of inlay hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InlayHintKind {
    /// Type annotation hint (e.g., `: int`)
    Type,
}

/// An inlay hint to display in the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlayHint {
    /// Where the hint is drawn: right after the variable name.
    pub position: LineCol,
    pub label: String,
    pub kind: InlayHintKind,
    pub padding_left: bool,
    pub padding_right: bool,
}

/// Type hints for `{var}`, `{default}` and `{foreach}` variables whose type
/// was inferred. `range` limits the result to declarations inside it.
pub fn inlay_hints(analysis: &DocumentAnalysis, range: Option<TextRange>) -> Vec<InlayHint> {
    let annotated: Vec<TextRange> = analysis
        .tags()
        .iter()
        .filter_map(|tag| match tag {
            Tag::Var(var) if var.annotation.is_some() => Some(var.variable.range),
            Tag::VarType(var_type) => Some(var_type.variable.range),
            _ => None,
        })
        .collect();

    analysis
        .variables()
        .declarations()
        .iter()
        .filter(|decl| !annotated.contains(&decl.name_range))
        .filter(|decl| range.is_none_or(|r| r.contains_range(decl.name_range)))
        .filter_map(|decl| {
            let ty = decl.ty.as_ref()?;
            Some(InlayHint {
                position: analysis.line_col(decl.name_range.end()),
                label: format!(": {ty}"),
                kind: InlayHintKind::Type,
                padding_left: false,
                padding_right: true,
            })
        })
        .collect()
}
