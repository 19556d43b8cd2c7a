//! Go-to-definition for template variables.

use text_size::{TextRange, TextSize};

use super::analysis::DocumentAnalysis;
use crate::base::{FileId, LineCol};
use crate::hir::DeclarationKind;

/// Where a variable is declared.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GotoTarget {
    pub file: FileId,
    /// The declaring `$name` token.
    pub range: TextRange,
    pub start: LineCol,
    pub end: LineCol,
    /// The whole declaring tag.
    pub tag_range: TextRange,
    pub kind: DeclarationKind,
}

/// Jump from the variable at `offset` to its first declaration visible there.
pub fn goto_definition(analysis: &DocumentAnalysis, offset: TextSize) -> Option<GotoTarget> {
    let (variable, _) = analysis.variable_at(offset)?;
    let decl = analysis.variables().first_declaration(&variable, offset)?;
    let (start, end) = analysis.line_index().line_col_range(decl.name_range);

    Some(GotoTarget {
        file: analysis.file(),
        range: decl.name_range,
        start,
        end,
        tag_range: decl.tag_range,
        kind: decl.kind,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScannerConfig;
    use crate::hir::Inference;
    use crate::types::{ImportContext, TypeParser};

    fn make_analysis(text: &str) -> DocumentAnalysis {
        let parser = TypeParser::new();
        let imports = ImportContext::new();
        let inference = Inference::new(&parser, &imports);
        DocumentAnalysis::analyze(FileId::new(2), text, &ScannerConfig::default(), &inference)
    }

    #[test]
    fn test_goto_first_declaration() {
        let text = "{default $page = 1}\n{var $page = 2}\n{$page}";
        let analysis = make_analysis(text);
        let offset = TextSize::from(text.rfind("$page").unwrap() as u32);

        let target = goto_definition(&analysis, offset).unwrap();
        assert_eq!(target.file, FileId::new(2));
        assert_eq!(&text[target.range], "$page");
        assert_eq!(target.start, LineCol::new(0, 9));
        assert_eq!(target.kind, DeclarationKind::Default);
        assert_eq!(target.tag_range.start(), TextSize::from(0));
    }

    #[test]
    fn test_goto_foreach_value() {
        let text = "<ul n:foreach=\"$items as $item\"><li>{$item}</li></ul>";
        let analysis = make_analysis(text);
        let offset = TextSize::from(text.rfind("$item").unwrap() as u32 + 2);

        let target = goto_definition(&analysis, offset).unwrap();
        assert_eq!(target.kind, DeclarationKind::ForeachValue);
        assert_eq!(usize::from(target.range.start()), text.find("$item\"").unwrap());
    }

    #[test]
    fn test_goto_undeclared() {
        let analysis = make_analysis("{$nothing}");
        assert!(goto_definition(&analysis, TextSize::from(3)).is_none());
    }
}
