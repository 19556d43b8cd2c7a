//! Document links: clickable template references in `{include}`-style tags.

use std::path::{Component, Path, PathBuf};

use smol_str::SmolStr;
use text_size::TextRange;

use super::analysis::DocumentAnalysis;
use crate::base::{FileId, LineCol};
use crate::hir::Tag;

/// A link from a file reference to another template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentLink {
    /// The target text, quotes excluded.
    pub range: TextRange,
    pub start: LineCol,
    pub end: LineCol,
    /// Tag keyword, e.g. `include`.
    pub keyword: SmolStr,
    pub target: String,
    /// `target` resolved against the including template's directory.
    pub target_path: Option<PathBuf>,
    /// The target, when it is open in the same host.
    pub target_file: Option<FileId>,
    pub tooltip: String,
}

/// Get document links for a template.
///
/// Block references (`{include #menu}`) and dynamic targets (`{include $file}`)
/// are not files and produce no link.
pub fn document_links(analysis: &DocumentAnalysis, base_dir: Option<&Path>) -> Vec<DocumentLink> {
    analysis
        .tags()
        .iter()
        .filter_map(|tag| match tag {
            Tag::FileReference(reference) => Some(reference),
            _ => None,
        })
        .filter(|reference| !reference.target.starts_with(['#', '$']))
        .map(|reference| {
            let target_path = base_dir.map(|dir| normalize_path(&dir.join(&reference.target)));
            let (start, end) = analysis.line_index().line_col_range(reference.target_range);
            DocumentLink {
                range: reference.target_range,
                start,
                end,
                keyword: reference.keyword.clone(),
                target: reference.target.clone(),
                tooltip: format!("Open {}", reference.target),
                target_path,
                target_file: None,
            }
        })
        .collect()
}

/// Resolve `.` and `..` lexically, without touching the filesystem.
fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(normalized.components().next_back(), Some(Component::Normal(_))) {
                    normalized.pop();
                } else if !matches!(
                    normalized.components().next_back(),
                    Some(Component::RootDir | Component::Prefix(_))
                ) {
                    normalized.push("..");
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
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
        DocumentAnalysis::analyze(FileId::new(0), text, &ScannerConfig::default(), &inference)
    }

    #[test]
    fn test_links_for_file_references() {
        let text = "{layout '@layout.latte'}\n{include #menu}\n{include $dynamic}\n{embed \"box.latte\"}";
        let links = document_links(&make_analysis(text), Some(Path::new("/app/templates")));

        let targets: Vec<_> = links.iter().map(|l| l.target.as_str()).collect();
        assert_eq!(targets, ["@layout.latte", "box.latte"]);
        assert_eq!(&text[links[0].range], "@layout.latte");
        assert_eq!(links[0].keyword, "layout");
        assert_eq!(
            links[1].target_path.as_deref(),
            Some(Path::new("/app/templates/box.latte"))
        );
        assert_eq!(links[1].start.line, 3);
    }

    #[test]
    fn test_parent_directory_targets_are_normalized() {
        let text = "{layout '../@layout.latte'}{include './parts/./menu.latte'}";
        let links = document_links(&make_analysis(text), Some(Path::new("/app/templates/Home")));

        assert_eq!(
            links[0].target_path.as_deref(),
            Some(Path::new("/app/templates/@layout.latte"))
        );
        assert_eq!(
            links[1].target_path.as_deref(),
            Some(Path::new("/app/templates/Home/parts/menu.latte"))
        );
    }

    #[test]
    fn test_normalize_keeps_leading_parents_of_relative_paths() {
        assert_eq!(normalize_path(Path::new("../a/../b")), PathBuf::from("../b"));
        assert_eq!(normalize_path(Path::new("/../a")), PathBuf::from("/a"));
    }

    #[test]
    fn test_no_base_dir() {
        let links = document_links(&make_analysis("{include 'a.latte'}"), None);
        assert_eq!(links.len(), 1);
        assert!(links[0].target_path.is_none());
    }
}
