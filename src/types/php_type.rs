//! Normalized PHP type values.

use std::fmt;

use smol_str::SmolStr;

/// Keyword types. Never subject to import or namespace resolution.
pub const BUILTIN_TYPES: &[&str] = &[
    "int", "integer", "float", "double", "string", "bool", "boolean", "void", "never", "null",
    "false", "true", "array", "callable", "iterable", "resource", "mixed", "object", "self",
    "static", "parent", "list", "scalar", "numeric",
];

/// Base names whose template arguments describe what iteration yields.
pub const BASIC_ITERABLES: &[&str] = &[
    "array",
    "iterable",
    "list",
    "Iterator",
    "\\Iterator",
    "IteratorAggregate",
    "\\IteratorAggregate",
    "Traversable",
    "\\Traversable",
    "Generator",
    "\\Generator",
];

pub fn is_builtin(name: &str) -> bool {
    BUILTIN_TYPES.iter().any(|b| b.eq_ignore_ascii_case(name))
}

pub fn is_basic_iterable(name: &str) -> bool {
    BASIC_ITERABLES.iter().any(|b| b.eq_ignore_ascii_case(name))
}

/// A parsed, normalized type annotation.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PhpType {
    Single(SingleType),
    Union(UnionType),
}

/// One named type, possibly templated.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SingleType {
    /// Resolved base name, without a leading `\`.
    pub name: SmolStr,
    /// Canonical text, e.g. `array<int, App\User>`. Never starts with `?`.
    pub repr: String,
    pub iterates_as: Option<Box<IterationSpec>>,
    /// Written with a leading `?`.
    pub nullable: bool,
}

/// Two or more alternatives joined by `|`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnionType {
    pub types: Vec<SingleType>,
    pub repr: String,
    /// Iteration of the single non-`null` member, if there is exactly one.
    pub iterates_as: Option<Box<IterationSpec>>,
    /// One of the members is `null`.
    pub nullable: bool,
}

/// What iterating a value of some type yields.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IterationSpec {
    pub key: Option<PhpType>,
    pub value: PhpType,
}

impl PhpType {
    pub fn repr(&self) -> &str {
        match self {
            PhpType::Single(t) => &t.repr,
            PhpType::Union(u) => &u.repr,
        }
    }

    pub fn nullable(&self) -> bool {
        match self {
            PhpType::Single(t) => t.nullable,
            PhpType::Union(u) => u.nullable,
        }
    }

    pub fn iterates_as(&self) -> Option<&IterationSpec> {
        match self {
            PhpType::Single(t) => t.iterates_as.as_deref(),
            PhpType::Union(u) => u.iterates_as.as_deref(),
        }
    }

    /// Base name of a single type; `None` for unions.
    pub fn name(&self) -> Option<&str> {
        match self {
            PhpType::Single(t) => Some(&t.name),
            PhpType::Union(_) => None,
        }
    }

    /// The alternatives: one for a single type, all members for a union.
    pub fn members(&self) -> &[SingleType] {
        match self {
            PhpType::Single(t) => std::slice::from_ref(t),
            PhpType::Union(u) => &u.types,
        }
    }

    /// Names that could refer to classes (built-in keywords excluded).
    pub fn class_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.members()
            .iter()
            .map(|t| t.name.as_str())
            .filter(|name| !is_builtin(name))
    }

    /// Same type with the top-level nullable flag cleared.
    pub fn without_nullable(&self) -> PhpType {
        match self {
            PhpType::Single(t) => PhpType::Single(SingleType {
                nullable: false,
                ..t.clone()
            }),
            PhpType::Union(_) => self.clone(),
        }
    }
}

/// Canonical text with the nullable sigil put back, for display.
impl fmt::Display for PhpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhpType::Single(t) if t.nullable => write!(f, "?{}", t.repr),
            _ => f.write_str(self.repr()),
        }
    }
}

impl From<SingleType> for PhpType {
    fn from(t: SingleType) -> Self {
        PhpType::Single(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simple(name: &str, nullable: bool) -> SingleType {
        SingleType {
            name: SmolStr::new(name),
            repr: name.to_string(),
            iterates_as: None,
            nullable,
        }
    }

    #[test]
    fn test_builtins_case_insensitive() {
        assert!(is_builtin("int"));
        assert!(is_builtin("Bool"));
        assert!(!is_builtin("Foo"));
        assert!(is_basic_iterable("\\Traversable"));
        assert!(is_basic_iterable("Array"));
        assert!(!is_basic_iterable("ArrayObject"));
    }

    #[test]
    fn test_display_adds_sigil() {
        let ty = PhpType::from(simple("Foo", true));
        assert_eq!(ty.repr(), "Foo");
        assert_eq!(ty.to_string(), "?Foo");
        assert_eq!(ty.without_nullable().to_string(), "Foo");
    }

    #[test]
    fn test_class_names_skip_builtins() {
        let ty = PhpType::Union(UnionType {
            types: vec![simple("App\\User", false), simple("null", false)],
            repr: "App\\User|null".to_string(),
            iterates_as: None,
            nullable: true,
        });
        assert_eq!(ty.class_names().collect::<Vec<_>>(), ["App\\User"]);
        assert_eq!(ty.members().len(), 2);
        assert_eq!(ty.name(), None);
    }
}
