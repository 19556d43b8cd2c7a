//! Hover: the type of the template variable under the cursor.

use std::sync::Arc;

use smol_str::SmolStr;
use text_size::{TextRange, TextSize};

use super::analysis::DocumentAnalysis;
use crate::base::LineCol;
use crate::hir::VariableDecl;
use crate::types::PhpType;

/// Hover information for a variable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HoverResult {
    /// The `$name` token hovered.
    pub range: TextRange,
    pub start: LineCol,
    pub end: LineCol,
    pub variable: SmolStr,
    pub ty: Option<Arc<PhpType>>,
    /// The declaration in effect at the cursor.
    pub declaration: VariableDecl,
    /// Markdown shown to the user.
    pub contents: String,
}

/// Hover for the variable at `offset`, if it is declared by then.
pub fn hover(analysis: &DocumentAnalysis, offset: TextSize) -> Option<HoverResult> {
    let (variable, range) = analysis.variable_at(offset)?;
    let declaration = analysis.variables().lookup(&variable, offset)?.clone();
    let ty = declaration.ty.clone();

    let signature = match &ty {
        Some(ty) => format!("{ty} ${variable}"),
        None => format!("${variable}"),
    };
    let declared_line = analysis.line_col(declaration.tag_range.start()).line_one_indexed();
    let contents = format!(
        "```php\n{signature}\n```\n\n{} on line {declared_line}",
        declaration.kind.display()
    );

    let (start, end) = analysis.line_index().line_col_range(range);
    Some(HoverResult {
        range,
        start,
        end,
        variable,
        ty,
        declaration,
        contents,
    })
}
