//! Per-document analysis and the host that caches it.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use regex::Regex;
use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use text_size::{TextRange, TextSize};
use tracing::debug;

use crate::base::{FileId, LineCol, LineIndex};
use crate::config::{AnalysisConfig, ScannerConfig};
use crate::hir::{
    Diagnostic, FileSet, Inference, MemberTypes, NoMembers, Tag, VariableTable, build_tags,
    check_tags,
};
use crate::syntax::{RawTag, ScanError, Scanner};
use crate::types::{ImportContext, TypeParser};

use super::completion::{CompletionItem, completions};
use super::document_links::{DocumentLink, document_links};
use super::folding::{FoldingRange, folding_ranges};
use super::goto::{GotoTarget, goto_definition};
use super::hover::{HoverResult, hover};
use super::inlay_hints::{InlayHint, inlay_hints};

static VARIABLE_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$(?P<name>\w+)").unwrap());

// ============================================================================
// DOCUMENT ANALYSIS
// ============================================================================

/// Everything known about one template at one revision.
///
/// A document that fails to scan has no tags and no variables, only the
/// scan error as a diagnostic.
#[derive(Debug)]
pub struct DocumentAnalysis {
    file: FileId,
    line_index: LineIndex,
    raw_tags: Vec<RawTag>,
    tags: Vec<Tag>,
    variables: VariableTable,
    template_class: Option<String>,
    scan_error: Option<ScanError>,
    diagnostics: Vec<Diagnostic>,
}

impl DocumentAnalysis {
    pub fn analyze(
        file: FileId,
        text: impl Into<Arc<str>>,
        scanner: &ScannerConfig,
        inference: &Inference<'_>,
    ) -> Self {
        let line_index = LineIndex::new(text);
        let text = line_index.text().clone();

        let scanned = Scanner::with_config(&text, scanner.clone()).scan();
        let (raw_tags, scan_error) = match scanned {
            Ok(raw_tags) => (raw_tags, None),
            Err(error) => {
                debug!(%file, %error, "scan failed");
                (Vec::new(), Some(error))
            }
        };

        let tags = build_tags(&raw_tags, &inference.build_context());
        let variables = VariableTable::from_tags(&tags, inference);
        let template_class = tags.iter().find_map(|tag| match tag {
            Tag::TemplateType(t) => Some(t.class_name.clone()),
            _ => None,
        });

        let mut diagnostics = Vec::new();
        if let Some(error) = &scan_error {
            diagnostics.push(Diagnostic::from_scan_error(file, &line_index, error));
        }
        diagnostics.extend(check_tags(file, &line_index, &tags));

        Self {
            file,
            line_index,
            raw_tags,
            tags,
            variables,
            template_class,
            scan_error,
            diagnostics,
        }
    }

    pub fn file(&self) -> FileId {
        self.file
    }

    pub fn text(&self) -> &str {
        self.line_index.text()
    }

    pub fn line_index(&self) -> &LineIndex {
        &self.line_index
    }

    pub fn line_col(&self, offset: TextSize) -> LineCol {
        self.line_index.line_col(offset)
    }

    pub fn raw_tags(&self) -> &[RawTag] {
        &self.raw_tags
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn variables(&self) -> &VariableTable {
        &self.variables
    }

    /// Class named by `{templateType}`, resolved.
    pub fn template_class(&self) -> Option<&str> {
        self.template_class.as_deref()
    }

    pub fn scan_error(&self) -> Option<&ScanError> {
        self.scan_error.as_ref()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// The raw tag whose delimiters enclose `offset`.
    pub fn raw_tag_at(&self, offset: TextSize) -> Option<&RawTag> {
        self.raw_tags.iter().find(|tag| tag.contains(offset))
    }

    /// The `$variable` token under `offset` inside a tag. An offset just
    /// past the last character still counts.
    pub fn variable_at(&self, offset: TextSize) -> Option<(SmolStr, TextRange)> {
        let tag = self.raw_tag_at(offset)?;
        let start = tag.tag_range.start();
        let end = (tag.tag_range.end() + TextSize::from(1)).min(self.line_index.text_len());
        let slice = self.text().get(usize::from(start)..usize::from(end))?;

        VARIABLE_TOKEN.captures_iter(slice).find_map(|caps| {
            let whole = caps.get(0)?;
            let range = TextRange::new(
                start + TextSize::from(whole.start() as u32),
                start + TextSize::from(whole.end() as u32),
            );
            range
                .contains_inclusive(offset)
                .then(|| (SmolStr::new(&caps["name"]), range))
        })
    }
}

// ============================================================================
// ANALYSIS HOST
// ============================================================================

struct CachedAnalysis {
    revision: u64,
    imports_generation: u64,
    analysis: Arc<DocumentAnalysis>,
}

/// A file's import context. The generation changes on every `set_imports`;
/// files without one are at generation 0.
struct FileImports {
    generation: u64,
    context: Arc<ImportContext>,
}

/// Open templates plus their cached analyses.
///
/// Analyses are computed on first request and reused until the file's
/// text or import context changes.
///
/// ```ignore
/// let host = AnalysisHost::new();
/// let file = host.set_file_content("app/templates/page.latte", "{var $n = 1}{$n}");
/// let hover = host.hover(file, 14.into()).unwrap();
/// assert_eq!(hover.ty.unwrap().repr(), "int");
/// ```
pub struct AnalysisHost {
    config: AnalysisConfig,
    files: FileSet,
    parser: TypeParser,
    members: Arc<dyn MemberTypes + Send + Sync>,
    imports: RwLock<FxHashMap<FileId, FileImports>>,
    next_generation: AtomicU64,
    cache: RwLock<FxHashMap<FileId, CachedAnalysis>>,
}

impl AnalysisHost {
    pub fn new() -> Self {
        Self::with_config(AnalysisConfig::default())
    }

    pub fn with_config(config: AnalysisConfig) -> Self {
        Self {
            parser: TypeParser::with_config(&config.types),
            config,
            files: FileSet::new(),
            members: Arc::new(NoMembers),
            imports: RwLock::new(FxHashMap::default()),
            next_generation: AtomicU64::new(1),
            cache: RwLock::new(FxHashMap::default()),
        }
    }

    /// Use `members` to type member accesses and `{templateType}` classes.
    pub fn with_members(mut self, members: Arc<dyn MemberTypes + Send + Sync>) -> Self {
        self.members = members;
        self
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn files(&self) -> &FileSet {
        &self.files
    }

    pub fn type_parser(&self) -> &TypeParser {
        &self.parser
    }

    /// Set the text of the template at `path`, returning its id.
    pub fn set_file_content(&self, path: impl AsRef<Path>, text: impl Into<Arc<str>>) -> FileId {
        let file = self.files.file_id(path.as_ref());
        self.files.set_contents(file, text);
        file
    }

    /// Set the namespace and imports type annotations in `file` resolve in.
    pub fn set_imports(&self, file: FileId, imports: ImportContext) {
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        self.imports.write().insert(
            file,
            FileImports {
                generation,
                context: Arc::new(imports),
            },
        );
        self.cache.write().remove(&file);
    }

    fn imports_generation(&self, file: FileId) -> u64 {
        self.imports.read().get(&file).map_or(0, |i| i.generation)
    }

    pub fn remove_file(&self, file: FileId) {
        self.files.remove(file);
        self.imports.write().remove(&file);
        self.cache.write().remove(&file);
    }

    /// The analysis of `file`'s current text; `None` for unknown files.
    pub fn analysis(&self, file: FileId) -> Option<Arc<DocumentAnalysis>> {
        let source = self.files.source(file)?;

        // Fast path: read lock
        {
            let generation = self.imports_generation(file);
            let cache = self.cache.read();
            if let Some(cached) = cache.get(&file) {
                if cached.revision == source.revision && cached.imports_generation == generation {
                    return Some(cached.analysis.clone());
                }
            }
        }

        let (generation, imports) = match self.imports.read().get(&file) {
            Some(entry) => (entry.generation, entry.context.clone()),
            None => (0, Arc::default()),
        };
        let inference = Inference::new(&self.parser, &imports).with_members(&*self.members);
        let analysis = Arc::new(DocumentAnalysis::analyze(
            file,
            source.text,
            &self.config.scanner,
            &inference,
        ));
        debug!(%file, revision = source.revision, tags = analysis.tags().len(), "analyzed");

        self.store(file, source.revision, generation, analysis.clone());
        Some(analysis)
    }

    /// Cache `analysis` unless `file`'s imports changed since it started.
    fn store(
        &self,
        file: FileId,
        revision: u64,
        imports_generation: u64,
        analysis: Arc<DocumentAnalysis>,
    ) -> bool {
        let mut cache = self.cache.write();
        if self.imports_generation(file) != imports_generation {
            debug!(%file, "imports changed during analysis, not caching");
            return false;
        }
        cache.insert(
            file,
            CachedAnalysis {
                revision,
                imports_generation,
                analysis,
            },
        );
        true
    }

    pub fn diagnostics(&self, file: FileId) -> Vec<Diagnostic> {
        self.analysis(file)
            .map(|a| a.diagnostics().to_vec())
            .unwrap_or_default()
    }

    pub fn hover(&self, file: FileId, offset: TextSize) -> Option<HoverResult> {
        hover(&*self.analysis(file)?, offset)
    }

    pub fn goto_definition(&self, file: FileId, offset: TextSize) -> Option<GotoTarget> {
        goto_definition(&*self.analysis(file)?, offset)
    }

    pub fn completions(&self, file: FileId, offset: TextSize) -> Vec<CompletionItem> {
        self.analysis(file)
            .map(|a| completions(&a, offset))
            .unwrap_or_default()
    }

    pub fn inlay_hints(&self, file: FileId, range: Option<TextRange>) -> Vec<InlayHint> {
        self.analysis(file)
            .map(|a| inlay_hints(&a, range))
            .unwrap_or_default()
    }

    pub fn folding_ranges(&self, file: FileId) -> Vec<FoldingRange> {
        self.analysis(file)
            .map(|a| folding_ranges(&a))
            .unwrap_or_default()
    }

    /// Links for `{include}`-style tags. Relative targets resolve against
    /// the including template's directory.
    pub fn document_links(&self, file: FileId) -> Vec<DocumentLink> {
        let Some(analysis) = self.analysis(file) else {
            return Vec::new();
        };
        let base_dir: Option<PathBuf> = self
            .files
            .path(file)
            .and_then(|p| p.parent().map(Path::to_path_buf));

        let mut links = document_links(&analysis, base_dir.as_deref());
        for link in &mut links {
            link.target_file = link.target_path.as_deref().and_then(|p| self.files.lookup(p));
        }
        links
    }
}

impl Default for AnalysisHost {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for AnalysisHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisHost")
            .field("config", &self.config)
            .field("files", &self.files.len())
            .field("cached", &self.cache.read().len())
            .finish()
    }
}
