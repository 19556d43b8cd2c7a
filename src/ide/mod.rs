//! IDE features: high-level APIs for editor integrations.
//!
//! Each function takes a [`DocumentAnalysis`] and answers one editor
//! request. Positions come back as byte ranges plus [`LineCol`]s; converting
//! to a protocol's own types happens at the protocol boundary.
//!
//! The usual entry point is [`AnalysisHost`]:
//!
//! ```ignore
//! use latte::ide::AnalysisHost;
//!
//! let host = AnalysisHost::new();
//! let file = host.set_file_content("templates/page.latte", "{var $n = 1}\n{$n}");
//!
//! let hover = host.hover(file, 15.into());
//! let diagnostics = host.diagnostics(file);
//! ```
//!
//! [`LineCol`]: crate::base::LineCol

mod analysis;
mod completion;
mod document_links;
mod folding;
mod goto;
mod hover;
mod inlay_hints;

pub use analysis::{AnalysisHost, DocumentAnalysis};
pub use completion::{CompletionItem, CompletionKind, completions};
pub use document_links::{DocumentLink, document_links};
pub use folding::{FoldingRange, folding_ranges};
pub use goto::{GotoTarget, goto_definition};
pub use hover::{HoverResult, hover};
pub use inlay_hints::{InlayHint, InlayHintKind, inlay_hints};
