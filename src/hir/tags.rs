//! Typed tag objects built from raw scanner tags.
//!
//! Builders are looked up by tag name in a static registry. A builder
//! that cannot make sense of its arguments returns `None`; the tag is then
//! simply absent from the analysis.

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::{Captures, Match, Regex};
use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use text_size::{TextRange, TextSize};
use tracing::debug;

use crate::syntax::RawTag;
use crate::types::{ImportContext, PhpType, TypeParser};

// ============================================================================
// TAG TYPES
// ============================================================================

/// A `$variable` occurrence; `name` has no `$`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VariableName {
    pub name: SmolStr,
    /// Range of the name including the `$`.
    pub range: TextRange,
}

/// A slice of PHP expression text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Expression {
    pub text: String,
    pub range: TextRange,
}

/// A type annotation as written, with its parse result.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeAnnotation {
    pub text: String,
    pub range: TextRange,
    /// `None` when the annotation does not parse.
    pub ty: Option<Arc<PhpType>>,
}

/// `{var [Type] $name [= expr]}` or `{default ...}`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VarTag {
    pub is_default: bool,
    pub variable: VariableName,
    pub annotation: Option<TypeAnnotation>,
    pub value: Option<Expression>,
    pub range: TextRange,
}

/// `{varType Type $name}`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VarTypeTag {
    pub variable: VariableName,
    pub annotation: TypeAnnotation,
    pub range: TextRange,
}

/// `{templateType ClassName}`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TemplateTypeTag {
    /// Resolved, without a leading `\`.
    pub class_name: String,
    pub class_range: TextRange,
    pub range: TextRange,
}

/// `{foreach expr as [$key =>] $value}` or `n:foreach`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ForeachTag {
    pub iterable: Expression,
    pub key: Option<VariableName>,
    pub value: VariableName,
    pub range: TextRange,
}

/// `{include 'file.latte'}`, `{extends ...}`, `{layout ...}` and friends.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileReferenceTag {
    pub keyword: SmolStr,
    /// Target with quotes removed.
    pub target: String,
    pub target_range: TextRange,
    pub range: TextRange,
}

/// `{block name}` or `{define name}`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockTag {
    pub keyword: SmolStr,
    pub name: SmolStr,
    pub range: TextRange,
}

/// `{$name ...}`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrintVariableTag {
    pub variable: VariableName,
    pub range: TextRange,
}

/// `{=expr}`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrintExpressionTag {
    pub expression: Expression,
    pub range: TextRange,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Tag {
    Var(VarTag),
    VarType(VarTypeTag),
    TemplateType(TemplateTypeTag),
    Foreach(ForeachTag),
    FileReference(FileReferenceTag),
    Block(BlockTag),
    PrintVariable(PrintVariableTag),
    PrintExpression(PrintExpressionTag),
}

impl Tag {
    /// The whole tag, delimiters included.
    pub fn range(&self) -> TextRange {
        match self {
            Tag::Var(t) => t.range,
            Tag::VarType(t) => t.range,
            Tag::TemplateType(t) => t.range,
            Tag::Foreach(t) => t.range,
            Tag::FileReference(t) => t.range,
            Tag::Block(t) => t.range,
            Tag::PrintVariable(t) => t.range,
            Tag::PrintExpression(t) => t.range,
        }
    }

    /// Variables this tag declares, in source order.
    pub fn declared_variables(&self) -> Vec<&VariableName> {
        match self {
            Tag::Var(t) => vec![&t.variable],
            Tag::VarType(t) => vec![&t.variable],
            Tag::Foreach(t) => t.key.iter().chain(std::iter::once(&t.value)).collect(),
            _ => Vec::new(),
        }
    }
}

// ============================================================================
// REGISTRY
// ============================================================================

/// What a builder needs besides the raw tag.
#[derive(Clone, Copy)]
pub struct BuildContext<'a> {
    pub parser: &'a TypeParser,
    pub imports: &'a ImportContext,
}

type TagBuilder = fn(&RawTag, &BuildContext<'_>) -> Option<Tag>;

static REGISTRY: Lazy<FxHashMap<&'static str, TagBuilder>> = Lazy::new(|| {
    let mut map: FxHashMap<&'static str, TagBuilder> = FxHashMap::default();
    map.insert("var", build_var);
    map.insert("default", build_var);
    map.insert("varType", build_var_type);
    map.insert("templateType", build_template_type);
    map.insert("foreach", build_foreach);
    for keyword in ["include", "extends", "layout", "import", "embed", "sandbox"] {
        map.insert(keyword, build_file_reference);
    }
    map.insert("block", build_block);
    map.insert("define", build_block);
    map
});

/// Names with a registered builder, sorted.
pub fn known_tag_names() -> Vec<&'static str> {
    let mut names: Vec<_> = REGISTRY.keys().copied().collect();
    names.sort_unstable();
    names
}

/// Build the typed tag for `raw`, if its name is known and its arguments fit.
pub fn build_tag(raw: &RawTag, cx: &BuildContext<'_>) -> Option<Tag> {
    let name = raw.name.as_str();
    let tag = if name.starts_with('$') {
        build_print_variable(raw)
    } else if name.starts_with('=') {
        build_print_expression(raw)
    } else {
        let key = if raw.is_attribute() {
            name.trim_start_matches("inner-").trim_start_matches("tag-")
        } else {
            name
        };
        let builder = REGISTRY.get(key)?;
        builder(raw, cx)
    };

    if tag.is_none() {
        debug!(name, range = ?raw.tag_range, "dropping malformed tag");
    }
    tag
}

/// Build every recognised tag, keeping document order.
pub fn build_tags(raws: &[RawTag], cx: &BuildContext<'_>) -> Vec<Tag> {
    raws.iter().filter_map(|raw| build_tag(raw, cx)).collect()
}

// ============================================================================
// BUILDERS
// ============================================================================

static VAR_ARGS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\A(?:(?P<type>[^$\s=][^$=]*?)\s+)?\$(?P<name>\w+)(?:\s*=\s*(?P<value>.*?))?\s*\z")
        .unwrap()
});

static VAR_TYPE_ARGS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\A(?P<type>[^$\s].*?)\s+\$(?P<name>\w+)\s*\z").unwrap());

static TEMPLATE_TYPE_ARGS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\A(?P<class>\\?[\w\\]+)\s*\z").unwrap());

static FOREACH_ARGS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\A(?P<expr>.+?)\s+as\s+(?:\$(?P<key>\w+)\s*=>\s*)?\$(?P<value>\w+)\s*\z")
        .unwrap()
});

static FILE_ARGS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\A(?:"(?P<dq>[^"]*)"|'(?P<sq>[^']*)'|(?P<bare>[^\s,]+))"#).unwrap()
});

static BLOCK_ARGS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\A#?(?P<name>[\w.-]+)").unwrap());

static VARIABLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\A\$(?P<name>\w+)").unwrap());

fn at(base: TextSize, m: &Match<'_>) -> TextRange {
    TextRange::new(
        base + TextSize::from(m.start() as u32),
        base + TextSize::from(m.end() as u32),
    )
}

/// `$name` from a `name` capture preceded by the dollar sign.
fn variable(raw: &RawTag, caps: &Captures<'_>) -> Option<VariableName> {
    let m = caps.name("name")?;
    let range = at(raw.args_offset, &m);
    Some(VariableName {
        name: SmolStr::new(m.as_str()),
        range: TextRange::new(range.start() - TextSize::from(1), range.end()),
    })
}

fn annotation(raw: &RawTag, m: Match<'_>, cx: &BuildContext<'_>) -> TypeAnnotation {
    TypeAnnotation {
        text: m.as_str().to_string(),
        range: at(raw.args_offset, &m),
        ty: cx.parser.parse_in(m.as_str(), cx.imports),
    }
}

fn build_var(raw: &RawTag, cx: &BuildContext<'_>) -> Option<Tag> {
    let caps = VAR_ARGS.captures(&raw.args)?;
    Some(Tag::Var(VarTag {
        is_default: raw.name == "default",
        variable: variable(raw, &caps)?,
        annotation: caps.name("type").map(|m| annotation(raw, m, cx)),
        value: caps
            .name("value")
            .filter(|m| !m.as_str().is_empty())
            .map(|m| Expression {
                text: m.as_str().to_string(),
                range: at(raw.args_offset, &m),
            }),
        range: raw.tag_range,
    }))
}

fn build_var_type(raw: &RawTag, cx: &BuildContext<'_>) -> Option<Tag> {
    let caps = VAR_TYPE_ARGS.captures(&raw.args)?;
    Some(Tag::VarType(VarTypeTag {
        variable: variable(raw, &caps)?,
        annotation: annotation(raw, caps.name("type")?, cx),
        range: raw.tag_range,
    }))
}

fn build_template_type(raw: &RawTag, cx: &BuildContext<'_>) -> Option<Tag> {
    let caps = TEMPLATE_TYPE_ARGS.captures(&raw.args)?;
    let class = caps.name("class")?;
    Some(Tag::TemplateType(TemplateTypeTag {
        class_name: cx.imports.resolve(class.as_str()),
        class_range: at(raw.args_offset, &class),
        range: raw.tag_range,
    }))
}

fn build_foreach(raw: &RawTag, _cx: &BuildContext<'_>) -> Option<Tag> {
    let caps = FOREACH_ARGS.captures(&raw.args)?;
    let expr = caps.name("expr")?;
    let var = |group: &str| {
        caps.name(group).map(|m| {
            let range = at(raw.args_offset, &m);
            VariableName {
                name: SmolStr::new(m.as_str()),
                range: TextRange::new(range.start() - TextSize::from(1), range.end()),
            }
        })
    };

    Some(Tag::Foreach(ForeachTag {
        iterable: Expression {
            text: expr.as_str().to_string(),
            range: at(raw.args_offset, &expr),
        },
        key: var("key"),
        value: var("value")?,
        range: raw.tag_range,
    }))
}

fn build_file_reference(raw: &RawTag, _cx: &BuildContext<'_>) -> Option<Tag> {
    let caps = FILE_ARGS.captures(&raw.args)?;
    let target = caps
        .name("dq")
        .or_else(|| caps.name("sq"))
        .or_else(|| caps.name("bare"))?;
    Some(Tag::FileReference(FileReferenceTag {
        keyword: raw.name.clone(),
        target: target.as_str().to_string(),
        target_range: at(raw.args_offset, &target),
        range: raw.tag_range,
    }))
}

fn build_block(raw: &RawTag, _cx: &BuildContext<'_>) -> Option<Tag> {
    let caps = BLOCK_ARGS.captures(&raw.args)?;
    Some(Tag::Block(BlockTag {
        keyword: raw.name.clone(),
        name: SmolStr::new(caps.name("name")?.as_str()),
        range: raw.tag_range,
    }))
}

fn build_print_variable(raw: &RawTag) -> Option<Tag> {
    let caps = VARIABLE.captures(&raw.name)?;
    let m = caps.name("name")?;
    let start = raw.name_offset;
    Some(Tag::PrintVariable(PrintVariableTag {
        variable: VariableName {
            name: SmolStr::new(m.as_str()),
            range: TextRange::new(start, start + TextSize::from(m.end() as u32)),
        },
        range: raw.tag_range,
    }))
}

/// `{=expr}`: the expression starts inside the name (`=$a`) and continues
/// into the arguments. The whitespace between them is kept as spaces so
/// that offsets into `text` still line up with the document.
fn build_print_expression(raw: &RawTag) -> Option<Tag> {
    let head = raw.name.strip_prefix('=')?;
    let start = raw.name_offset + TextSize::from(1);
    let gap = usize::from(raw.args_offset - raw.name_range().end());

    let text = if raw.args.is_empty() {
        head.to_string()
    } else {
        format!("{head}{}{}", " ".repeat(gap), raw.args)
    };
    if text.trim().is_empty() {
        return None;
    }
    let range = TextRange::at(start, TextSize::of(text.as_str()));

    Some(Tag::PrintExpression(PrintExpressionTag {
        expression: Expression { text, range },
        range: raw.tag_range,
    }))
}
