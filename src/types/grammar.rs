//! Pest grammar for type annotations and the raw syntax tree built from it.

use pest::Parser;
use pest::iterators::Pair;
use pest_derive::Parser;

#[derive(Parser)]
#[grammar = "types/php_type.pest"]
struct TypeExprParser;

/// An annotation as written, before name resolution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum TypeNode {
    Single(SingleNode),
    Union(Vec<SingleNode>),
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct SingleNode {
    pub nullable: bool,
    pub name: String,
    pub args: Vec<TypeNode>,
    /// Written with a trailing `[]`.
    pub list: bool,
}

/// Parse `input`; `None` on any grammar violation.
pub(crate) fn parse_node(input: &str) -> Option<TypeNode> {
    let mut pairs = TypeExprParser::parse(Rule::type_expr, input).ok()?;
    let root = pairs.next()?;
    let node = root.into_inner().next()?;
    build(node)
}

fn build(pair: Pair<'_, Rule>) -> Option<TypeNode> {
    if pair.as_rule() != Rule::any_type {
        return None;
    }
    let mut members = pair
        .into_inner()
        .map(build_single)
        .collect::<Option<Vec<_>>>()?;
    match members.len() {
        0 => None,
        1 => members.pop().map(TypeNode::Single),
        _ => Some(TypeNode::Union(members)),
    }
}

fn build_single(pair: Pair<'_, Rule>) -> Option<SingleNode> {
    if pair.as_rule() != Rule::single_type {
        return None;
    }
    let mut node = SingleNode::default();
    for part in pair.into_inner() {
        match part.as_rule() {
            Rule::nullable => node.nullable = true,
            Rule::type_name => node.name = part.as_str().to_string(),
            Rule::generic_args => {
                node.args = part.into_inner().map(build).collect::<Option<Vec<_>>>()?;
            }
            Rule::list_suffix => node.list = true,
            _ => {}
        }
    }
    Some(node)
}
