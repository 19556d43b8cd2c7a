//! Type inference for the simple PHP expressions found in template tags.
//!
//! This is deliberately shallow: literals, `new`, casts, variables and a
//! single member access. Anything else is unknown.

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use smol_str::SmolStr;

use super::tags::BuildContext;
use crate::types::{ImportContext, PhpType, TypeParser};

/// Member types of PHP classes, supplied by whatever indexes the project's
/// PHP code.
pub trait MemberTypes {
    /// Return type of `class::method()`.
    fn method_return_type(&self, class: &str, method: &str) -> Option<Arc<PhpType>>;

    /// Declared type of `class::$property`.
    fn property_type(&self, class: &str, property: &str) -> Option<Arc<PhpType>>;

    /// Public properties of `class`, used for `{templateType}`.
    fn class_properties(&self, _class: &str) -> Vec<(SmolStr, Option<Arc<PhpType>>)> {
        Vec::new()
    }
}

/// Knows no classes.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoMembers;

impl MemberTypes for NoMembers {
    fn method_return_type(&self, _class: &str, _method: &str) -> Option<Arc<PhpType>> {
        None
    }

    fn property_type(&self, _class: &str, _property: &str) -> Option<Arc<PhpType>> {
        None
    }
}

static INT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\A-?(?:0[xX][0-9a-fA-F_]+|0[bB][01_]+|\d[\d_]*)\z").unwrap()
});
static FLOAT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\A-?(?:\d[\d_]*\.\d*|\.\d+|\d[\d_]*)(?:[eE][+-]?\d+)?\z").unwrap());
static STRING: Lazy<Regex> = Lazy::new(|| Regex::new(r#"(?s)\A(?:'.*'|".*")\z"#).unwrap());
static ARRAY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?si)\A(?:\[.*\]|array\s*\(.*\))\z").unwrap());
static NEW: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\Anew\s+(?P<class>\\?[\w\\]+)\s*(?:\(.*\))?\z").unwrap());
static CAST: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\A\(\s*(?P<to>int|integer|float|double|string|bool|boolean|array|object)\s*\)").unwrap()
});
static VARIABLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\A\$(?P<var>\w+)\z").unwrap());
static MEMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\A\$(?P<var>\w+)(?:->|\?->)(?P<member>\w+)\s*(?P<call>\(.*\))?\z").unwrap()
});

/// Expression inference in one document's context.
pub struct Inference<'a> {
    parser: &'a TypeParser,
    imports: &'a ImportContext,
    members: &'a dyn MemberTypes,
}

impl<'a> Inference<'a> {
    pub fn new(parser: &'a TypeParser, imports: &'a ImportContext) -> Self {
        Self {
            parser,
            imports,
            members: &NoMembers,
        }
    }

    pub fn with_members(mut self, members: &'a dyn MemberTypes) -> Self {
        self.members = members;
        self
    }

    pub fn members(&self) -> &'a dyn MemberTypes {
        self.members
    }

    /// The parser and imports, for building tags in the same context.
    pub fn build_context(&self) -> BuildContext<'a> {
        BuildContext {
            parser: self.parser,
            imports: self.imports,
        }
    }

    fn builtin(&self, name: &str) -> Option<Arc<PhpType>> {
        self.parser.parse(name)
    }

    /// Infer the type of `expr`. `lookup` gives the known type of a
    /// variable by name (without `$`).
    pub fn infer(
        &self,
        expr: &str,
        lookup: &dyn Fn(&str) -> Option<Arc<PhpType>>,
    ) -> Option<Arc<PhpType>> {
        let expr = expr.trim();
        if expr.is_empty() {
            return None;
        }

        if INT.is_match(expr) {
            return self.builtin("int");
        }
        if FLOAT.is_match(expr) {
            return self.builtin("float");
        }
        if STRING.is_match(expr) {
            return self.builtin("string");
        }
        match expr.to_ascii_lowercase().as_str() {
            "true" | "false" => return self.builtin("bool"),
            "null" => return self.builtin("null"),
            _ => {}
        }
        if ARRAY.is_match(expr) {
            return self.builtin("array");
        }
        if let Some(caps) = CAST.captures(expr) {
            let to = match caps["to"].to_ascii_lowercase().as_str() {
                "integer" => "int",
                "double" => "float",
                "boolean" => "bool",
                other => return self.builtin(other),
            };
            return self.builtin(to);
        }
        if let Some(caps) = NEW.captures(expr) {
            return self.parser.parse_in(&caps["class"], self.imports);
        }
        if let Some(caps) = VARIABLE.captures(expr) {
            return lookup(&caps["var"]);
        }
        if let Some(caps) = MEMBER.captures(expr) {
            let owner = lookup(&caps["var"])?;
            let class = owner.class_names().next()?.to_string();
            let member = &caps["member"];
            return if caps.name("call").is_some() {
                self.members.method_return_type(&class, member)
            } else {
                self.members.property_type(&class, member)
            };
        }
        None
    }
}
