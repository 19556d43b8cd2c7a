//! Template semantics built on top of the raw tag scan.
//!
//! ```text
//! RawTag ──build_tags──▶ Tag ──VariableTable::from_tags──▶ VariableDecl
//!                         │
//!                         └─check_tags──▶ Diagnostic
//! ```
//!
//! Nothing here fails: tags that do not fit their builder are dropped,
//! unknown types stay `None`.

mod diagnostics;
mod infer;
mod source;
mod tags;
mod variables;

pub use diagnostics::{Diagnostic, Severity, check_tags, codes};
pub use infer::{Inference, MemberTypes, NoMembers};
pub use source::{FileSet, SourceText};
pub use tags::{
    BlockTag, BuildContext, Expression, FileReferenceTag, ForeachTag, PrintExpressionTag,
    PrintVariableTag, Tag, TemplateTypeTag, TypeAnnotation, VarTag, VarTypeTag, VariableName,
    build_tag, build_tags, known_tag_names,
};
pub use variables::{DeclarationKind, VariableDecl, VariableTable};
