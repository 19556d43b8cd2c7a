//! Turning raw type syntax into [`PhpType`] values.

use smol_str::SmolStr;

use super::grammar::{SingleNode, TypeNode};
use super::import::ImportContext;
use super::php_type::{IterationSpec, PhpType, SingleType, UnionType, is_basic_iterable};

pub(crate) fn normalize(node: &TypeNode, ctx: &ImportContext) -> Option<PhpType> {
    match node {
        TypeNode::Single(single) => normalize_single(single, ctx).map(PhpType::Single),
        TypeNode::Union(members) => normalize_union(members, ctx).map(PhpType::Union),
    }
}

fn normalize_union(members: &[SingleNode], ctx: &ImportContext) -> Option<UnionType> {
    // `?A|B` is ambiguous; the whole annotation is rejected.
    if members.len() < 2 || members.iter().any(|m| m.nullable) {
        return None;
    }

    let types = members
        .iter()
        .map(|m| normalize_single(m, ctx))
        .collect::<Option<Vec<_>>>()?;
    let repr = types
        .iter()
        .map(|t| t.repr.as_str())
        .collect::<Vec<_>>()
        .join("|");
    let nullable = types.iter().any(|t| t.name.eq_ignore_ascii_case("null"));

    let mut non_null = types.iter().filter(|t| !t.name.eq_ignore_ascii_case("null"));
    let iterates_as = match (non_null.next(), non_null.next()) {
        (Some(only), None) => only.iterates_as.clone(),
        _ => None,
    };

    Some(UnionType {
        types,
        repr,
        iterates_as,
        nullable,
    })
}

fn normalize_single(node: &SingleNode, ctx: &ImportContext) -> Option<SingleType> {
    if node.list {
        return normalize_single(&desugar_list(node), ctx);
    }

    let name = ctx.resolve(&node.name);
    let args = node
        .args
        .iter()
        .map(|arg| normalize(arg, ctx))
        .collect::<Option<Vec<_>>>()?;

    let iterates_as = if is_basic_iterable(&name) {
        iteration_spec(&args)
    } else {
        None
    };

    let repr = if args.is_empty() {
        name.clone()
    } else {
        let rendered: Vec<String> = args.iter().map(render_argument).collect();
        format!("{}<{}>", name, rendered.join(", "))
    };

    Some(SingleType {
        name: SmolStr::new(name),
        repr,
        iterates_as,
        nullable: node.nullable,
    })
}

/// `T[]` is `array<T>`; a leading `?` stays on the array.
fn desugar_list(node: &SingleNode) -> SingleNode {
    let element = SingleNode {
        nullable: false,
        name: node.name.clone(),
        args: node.args.clone(),
        list: false,
    };
    SingleNode {
        nullable: node.nullable,
        name: "array".to_string(),
        args: vec![TypeNode::Single(element)],
        list: false,
    }
}

fn iteration_spec(args: &[PhpType]) -> Option<Box<IterationSpec>> {
    match args {
        [value] => Some(Box::new(IterationSpec {
            key: None,
            value: value.clone(),
        })),
        [key, value] => Some(Box::new(IterationSpec {
            key: Some(key.clone()),
            value: value.clone(),
        })),
        _ => None,
    }
}

/// Nested arguments keep their `?` so the repr parses back to the same type.
fn render_argument(arg: &PhpType) -> String {
    match arg {
        PhpType::Single(t) if t.nullable => format!("?{}", t.repr),
        _ => arg.repr().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::grammar::parse_node;

    fn norm(input: &str) -> Option<PhpType> {
        normalize(&parse_node(input)?, &ImportContext::new())
    }

    #[test]
    fn test_leading_separator_is_stripped() {
        let ty = norm("\\Foo\\Bar").unwrap();
        assert_eq!(ty.name(), Some("Foo\\Bar"));
        assert_eq!(ty.repr(), "Foo\\Bar");
    }

    #[test]
    fn test_non_iterable_generics_only_in_repr() {
        let ty = norm("Collection<int, User>").unwrap();
        assert_eq!(ty.repr(), "Collection<int, User>");
        assert!(ty.iterates_as().is_none());
    }

    #[test]
    fn test_three_arguments_do_not_iterate() {
        let ty = norm("Generator<int, string, bool>").unwrap();
        assert!(ty.iterates_as().is_none());
        assert_eq!(ty.repr(), "Generator<int, string, bool>");
    }

    #[test]
    fn test_nested_nullable_argument_keeps_sigil() {
        let ty = norm("array<?int>").unwrap();
        assert_eq!(ty.repr(), "array<?int>");
        assert!(ty.iterates_as().unwrap().value.nullable());
    }

    #[test]
    fn test_union_iterates_as_its_non_null_member() {
        let ty = norm("array<string>|null").unwrap();
        assert!(ty.nullable());
        assert_eq!(ty.iterates_as().unwrap().value.repr(), "string");

        let ty = norm("array<string>|iterable<int>").unwrap();
        assert!(ty.iterates_as().is_none());
    }

    #[test]
    fn test_nullable_list_sugar() {
        let ty = norm("?Foo[]").unwrap();
        assert!(ty.nullable());
        assert_eq!(ty.repr(), "array<Foo>");
        assert!(!ty.iterates_as().unwrap().value.nullable());
    }

    #[test]
    fn test_nullable_union_member_rejected_in_argument() {
        assert_eq!(norm("array<?A|B>"), None);
    }
}
