//! Diagnostics: problems found in a template, positioned for an editor.
//!
//! Scan failures become a single error; the other checks are warnings on
//! tags that scanned fine but carry something unusable.

use std::sync::Arc;

use text_size::TextRange;

use super::tags::Tag;
use crate::base::{FileId, LineCol, LineIndex};
use crate::syntax::ScanError;

// ============================================================================
// DIAGNOSTIC TYPES
// ============================================================================

/// Severity level of a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Severity {
    Error,
    Warning,
    Info,
    Hint,
}

impl Severity {
    /// Convert to LSP severity number.
    pub fn to_lsp(&self) -> u32 {
        match self {
            Severity::Error => 1,
            Severity::Warning => 2,
            Severity::Info => 3,
            Severity::Hint => 4,
        }
    }
}

/// A diagnostic message with location.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    /// The file containing this diagnostic.
    pub file: FileId,
    pub range: TextRange,
    pub start: LineCol,
    pub end: LineCol,
    pub severity: Severity,
    /// Error/warning code (e.g., "E0001").
    pub code: Option<Arc<str>>,
    pub message: Arc<str>,
}

impl Diagnostic {
    fn new(
        file: FileId,
        index: &LineIndex,
        range: TextRange,
        severity: Severity,
        message: impl Into<Arc<str>>,
    ) -> Self {
        let (start, end) = index.line_col_range(range);
        Self {
            file,
            range,
            start,
            end,
            severity,
            code: None,
            message: message.into(),
        }
    }

    /// Create a new error diagnostic.
    pub fn error(
        file: FileId,
        index: &LineIndex,
        range: TextRange,
        message: impl Into<Arc<str>>,
    ) -> Self {
        Self::new(file, index, range, Severity::Error, message)
    }

    /// Create a new warning diagnostic.
    pub fn warning(
        file: FileId,
        index: &LineIndex,
        range: TextRange,
        message: impl Into<Arc<str>>,
    ) -> Self {
        Self::new(file, index, range, Severity::Warning, message)
    }

    /// Set the error code.
    pub fn with_code(mut self, code: impl Into<Arc<str>>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// An error for a failed scan, pointing at the failing offset.
    pub fn from_scan_error(file: FileId, index: &LineIndex, error: &ScanError) -> Self {
        let offset = error.offset().min(index.text_len());
        let code = match error {
            ScanError::DisallowedTransfer { .. } => codes::DISALLOWED_TRANSFER,
            ScanError::UnexpectedExit { .. } | ScanError::EmptyStack { .. } => {
                codes::UNEXPECTED_EXIT
            }
            ScanError::Unterminated { .. } => codes::UNTERMINATED_REGION,
        };
        Self::error(file, index, TextRange::empty(offset), error.to_string()).with_code(code)
    }
}

// ============================================================================
// DIAGNOSTIC CODES
// ============================================================================

/// Standard diagnostic codes.
pub mod codes {
    /// A region was opened where it may not be.
    pub const DISALLOWED_TRANSFER: &str = "E0001";
    /// A region was closed that is not the innermost one.
    pub const UNEXPECTED_EXIT: &str = "E0002";
    /// The document ended inside a region.
    pub const UNTERMINATED_REGION: &str = "E0003";

    /// A type annotation that does not parse.
    pub const INVALID_TYPE: &str = "W0001";
}

// ============================================================================
// TAG CHECKS
// ============================================================================

/// Warnings for tags whose type annotations failed to parse.
pub fn check_tags(file: FileId, index: &LineIndex, tags: &[Tag]) -> Vec<Diagnostic> {
    let annotations = tags.iter().filter_map(|tag| match tag {
        Tag::Var(var) => var.annotation.as_ref(),
        Tag::VarType(var_type) => Some(&var_type.annotation),
        _ => None,
    });

    annotations
        .filter(|annotation| annotation.ty.is_none())
        .map(|annotation| {
            Diagnostic::warning(
                file,
                index,
                annotation.range,
                format!("invalid type annotation: '{}'", annotation.text),
            )
            .with_code(codes::INVALID_TYPE)
        })
        .collect()
}
