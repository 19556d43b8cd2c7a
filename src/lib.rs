//! # latte-base
//!
//! Core library for Latte template analysis: a region-tracking scanner that
//! cuts template tags out of HTML, a PHP type annotation parser, and the
//! editor features built on both.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! ide     → IDE features (hover, goto-def, completion, hints)
//!   ↓
//! hir     → Tag objects, variable table, diagnostics
//!   ↓
//! types   → PHP type annotations (pest grammar + memoizing parser)
//!   ↓
//! syntax  → Region stack, transfer policy, raw tag scanner
//!   ↓
//! base    → Primitives (FileId, TextRange, LineIndex)
//! ```
//!
//! `config` holds the knobs for `syntax`, `types` and `ide`.

/// Foundation types: FileId, text ranges, line index
pub mod base;

/// Scanner, type parser and analysis settings
pub mod config;

/// Raw tag scanning over markup, tags and quoted strings
pub mod syntax;

/// PHP type annotations
pub mod types;

/// Template semantics: typed tags, variables, diagnostics
pub mod hir;

/// IDE features: hover, goto-definition, completion
pub mod ide;

pub use base::{FileId, LineCol, LineIndex, TextRange, TextSize};
pub use config::{AnalysisConfig, ScannerConfig, TypeParserConfig};
pub use syntax::{RawTag, Region, ScanError, Scanner, scan};
pub use types::{ImportContext, PhpType, TypeParser, parse_type};
