//! Template variables declared in one document.

use std::sync::Arc;

use rustc_hash::FxHashSet;
use smol_str::SmolStr;
use text_size::{TextRange, TextSize};
use tracing::trace;

use super::infer::Inference;
use super::tags::{Tag, VariableName};
use crate::types::PhpType;

/// How a variable came into scope.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DeclarationKind {
    Var,
    Default,
    VarType,
    ForeachKey,
    ForeachValue,
    /// A property of the `{templateType}` class.
    TemplateProperty,
}

impl DeclarationKind {
    pub fn display(&self) -> &'static str {
        match self {
            DeclarationKind::Var => "var",
            DeclarationKind::Default => "default",
            DeclarationKind::VarType => "varType",
            DeclarationKind::ForeachKey => "foreach key",
            DeclarationKind::ForeachValue => "foreach value",
            DeclarationKind::TemplateProperty => "template property",
        }
    }
}

/// One declaration of a template variable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VariableDecl {
    /// Name without `$`.
    pub name: SmolStr,
    pub kind: DeclarationKind,
    /// `None` when neither annotated nor inferable.
    pub ty: Option<Arc<PhpType>>,
    /// The `$name` token; the class name for template properties.
    pub name_range: TextRange,
    /// The declaring tag.
    pub tag_range: TextRange,
}

impl VariableDecl {
    /// Whether this declaration is in effect at `offset`.
    ///
    /// A declaration becomes visible at the start of its own tag, so a
    /// cursor on `$x` in `{var $x = 1}` sees it.
    pub fn visible_at(&self, offset: TextSize) -> bool {
        self.tag_range.start() <= offset
    }
}

/// Declarations in document order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VariableTable {
    decls: Vec<VariableDecl>,
}

impl VariableTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect declarations from `tags`, inferring types as it goes so
    /// later declarations can use earlier ones.
    pub fn from_tags(tags: &[Tag], inference: &Inference<'_>) -> Self {
        let mut table = Self::new();
        for tag in tags {
            table.declare_from(tag, inference);
        }
        table
    }

    fn declare_from(&mut self, tag: &Tag, inference: &Inference<'_>) {
        let at = tag.range().start();
        match tag {
            Tag::Var(var) => {
                let ty = match &var.annotation {
                    Some(annotation) => annotation.ty.clone(),
                    None => var
                        .value
                        .as_ref()
                        .and_then(|value| self.infer(inference, &value.text, at)),
                };
                let kind = if var.is_default {
                    DeclarationKind::Default
                } else {
                    DeclarationKind::Var
                };
                self.push(&var.variable, kind, ty, var.range);
            }
            Tag::VarType(var_type) => {
                let ty = var_type.annotation.ty.clone();
                self.push(&var_type.variable, DeclarationKind::VarType, ty, var_type.range);
            }
            Tag::Foreach(foreach) => {
                let iterable = self.infer(inference, &foreach.iterable.text, at);
                let spec = iterable.as_deref().and_then(PhpType::iterates_as);
                if let Some(key) = &foreach.key {
                    let ty = spec.and_then(|s| s.key.clone()).map(Arc::new);
                    self.push(key, DeclarationKind::ForeachKey, ty, foreach.range);
                }
                let ty = spec.map(|s| Arc::new(s.value.clone()));
                self.push(&foreach.value, DeclarationKind::ForeachValue, ty, foreach.range);
            }
            Tag::TemplateType(template) => {
                for (name, ty) in inference.members().class_properties(&template.class_name) {
                    self.decls.push(VariableDecl {
                        name,
                        kind: DeclarationKind::TemplateProperty,
                        ty,
                        name_range: template.class_range,
                        tag_range: template.range,
                    });
                }
            }
            _ => {}
        }
    }

    fn infer(&self, inference: &Inference<'_>, expr: &str, at: TextSize) -> Option<Arc<PhpType>> {
        let lookup = |name: &str| self.type_of(name, at);
        inference.infer(expr, &lookup)
    }

    fn push(
        &mut self,
        variable: &VariableName,
        kind: DeclarationKind,
        ty: Option<Arc<PhpType>>,
        tag_range: TextRange,
    ) {
        trace!(name = %variable.name, ?kind, ty = ?ty.as_deref().map(PhpType::repr), "declare");
        self.decls.push(VariableDecl {
            name: variable.name.clone(),
            kind,
            ty,
            name_range: variable.range,
            tag_range,
        });
    }

    pub fn declarations(&self) -> &[VariableDecl] {
        &self.decls
    }

    pub fn len(&self) -> usize {
        self.decls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }

    /// The declaration of `name` in effect at `offset`: the latest visible
    /// one. A later untyped redeclaration does not hide an earlier type.
    pub fn lookup(&self, name: &str, offset: TextSize) -> Option<&VariableDecl> {
        let mut visible = self
            .decls
            .iter()
            .rev()
            .filter(|d| d.name == name && d.visible_at(offset));
        let latest = visible.next()?;
        if latest.ty.is_some() {
            return Some(latest);
        }
        visible.find(|d| d.ty.is_some()).or(Some(latest))
    }

    /// Known type of `name` at `offset`.
    pub fn type_of(&self, name: &str, offset: TextSize) -> Option<Arc<PhpType>> {
        self.lookup(name, offset).and_then(|d| d.ty.clone())
    }

    /// The first declaration of `name` visible at `offset`.
    pub fn first_declaration(&self, name: &str, offset: TextSize) -> Option<&VariableDecl> {
        self.decls
            .iter()
            .find(|d| d.name == name && d.visible_at(offset))
    }

    /// One entry per name visible at `offset`, as [`lookup`](Self::lookup)
    /// would return it, in first-declaration order.
    pub fn visible_at(&self, offset: TextSize) -> Vec<&VariableDecl> {
        let mut seen: FxHashSet<&str> = FxHashSet::default();
        let mut result = Vec::new();
        for decl in self.decls.iter().filter(|d| d.visible_at(offset)) {
            if !seen.insert(decl.name.as_str()) {
                continue;
            }
            if let Some(current) = self.lookup(&decl.name, offset) {
                result.push(current);
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hir::infer::MemberTypes;
    use crate::hir::tags::{BuildContext, build_tags};
    use crate::syntax::scan;
    use crate::types::{ImportContext, TypeParser};

    fn make_table(source: &str) -> VariableTable {
        make_table_with(source, &crate::hir::infer::NoMembers)
    }

    fn make_table_with(source: &str, members: &dyn MemberTypes) -> VariableTable {
        let parser = TypeParser::new();
        let imports = ImportContext::new();
        let cx = BuildContext {
            parser: &parser,
            imports: &imports,
        };
        let tags = build_tags(&scan(source).unwrap(), &cx);
        let inference = Inference::new(&parser, &imports).with_members(members);
        VariableTable::from_tags(&tags, &inference)
    }

    fn type_at(table: &VariableTable, name: &str, offset: u32) -> Option<String> {
        table
            .type_of(name, TextSize::from(offset))
            .map(|t| t.to_string())
    }

    #[test]
    fn test_declarations_in_document_order() {
        let table = make_table("{var $a = 1}{default $b = 'x'}{varType ?int $c}");
        let names: Vec<_> = table.declarations().iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["a", "b", "c"]);
        assert_eq!(table.declarations()[1].kind, DeclarationKind::Default);
        assert_eq!(type_at(&table, "c", 100).as_deref(), Some("?int"));
    }

    #[test]
    fn test_not_visible_before_declaration() {
        let table = make_table("{$a} {var $a = 1}");
        assert!(table.lookup("a", TextSize::from(1)).is_none());
        assert_eq!(type_at(&table, "a", 6).as_deref(), Some("int"));
    }

    #[test]
    fn test_inference_uses_earlier_variables() {
        let table = make_table("{varType App\\User $u}{var $same = $u}");
        assert_eq!(type_at(&table, "same", 100).as_deref(), Some("App\\User"));
    }

    #[test]
    fn test_foreach_takes_element_types() {
        let source = "{varType array<string, App\\Item> $items}\
                      {foreach $items as $code => $item}{/foreach}";
        let table = make_table(source);
        assert_eq!(type_at(&table, "code", 200).as_deref(), Some("string"));
        assert_eq!(type_at(&table, "item", 200).as_deref(), Some("App\\Item"));
    }

    #[test]
    fn test_foreach_over_unknown_iterable() {
        let table = make_table("{foreach $rows as $row}{/foreach}");
        let decl = table.lookup("row", TextSize::from(50)).unwrap();
        assert_eq!(decl.kind, DeclarationKind::ForeachValue);
        assert!(decl.ty.is_none());
    }

    #[test]
    fn test_untyped_redeclaration_keeps_type() {
        let table = make_table("{varType int $n}{var $n = $n + 1}");
        let decl = table.lookup("n", TextSize::from(100)).unwrap();
        assert_eq!(decl.kind, DeclarationKind::VarType);
        assert_eq!(table.first_declaration("n", TextSize::from(100)).unwrap().kind, DeclarationKind::VarType);
    }

    #[test]
    fn test_visible_at_is_one_per_name() {
        let table = make_table("{var $a = 1}{var $b = 2}{var $a = 'x'}");
        let visible = table.visible_at(TextSize::from(100));
        let rendered: Vec<_> = visible
            .iter()
            .map(|d| format!("{}:{}", d.name, d.ty.as_ref().unwrap()))
            .collect();
        assert_eq!(rendered, ["a:string", "b:int"]);
    }

    #[test]
    fn test_template_type_properties() {
        struct Params(TypeParser);
        impl MemberTypes for Params {
            fn method_return_type(&self, _: &str, _: &str) -> Option<Arc<PhpType>> {
                None
            }
            fn property_type(&self, _: &str, _: &str) -> Option<Arc<PhpType>> {
                None
            }
            fn class_properties(&self, class: &str) -> Vec<(SmolStr, Option<Arc<PhpType>>)> {
                assert_eq!(class, "App\\Params");
                vec![(SmolStr::new("title"), self.0.parse("string"))]
            }
        }

        let table = make_table_with("{templateType App\\Params}", &Params(TypeParser::new()));
        let decl = table.lookup("title", TextSize::from(5)).unwrap();
        assert_eq!(decl.kind, DeclarationKind::TemplateProperty);
        assert_eq!(decl.ty.as_ref().unwrap().repr(), "string");
    }

    #[test]
    fn test_visible_at_one_entry_per_name_with_many_redeclarations() {
        let source: String = (0..500)
            .map(|i| format!("{{var $v{} = {i}}}{{var $total = {i}}}", i % 50))
            .collect();
        let table = make_table(&source);
        let end = TextSize::from(source.len() as u32);

        let visible = table.visible_at(end);
        assert_eq!(visible.len(), 51);
        assert_eq!(visible[0].name, "v0");
        assert_eq!(visible[1].name, "total");
        let last_total = source.rfind("{var $total").unwrap() as u32;
        assert_eq!(visible[1].tag_range.start(), TextSize::from(last_total));
    }
}
