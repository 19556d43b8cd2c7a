//! Property-based tests for the scanner and the type parser.
//!
//! - Documents without template or markup delimiters yield no tags and
//!   leave only the seed region open.
//! - A tag spliced into plain text is found with offsets that point back
//!   at its own text.
//! - Type reprs parse back to the same type, up to top-level nullability.
//! - A union with a `?` member never parses.
#![cfg(feature = "proptest")]

use latte::syntax::{Region, Scanner, scan};
use latte::types::parse_type;
use proptest::prelude::*;

// ============================================================================
// PROPTEST STRATEGIES
// ============================================================================

/// Text with none of the characters the scanner reacts to.
fn arb_plain_text() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 .,;:!?\\-\n\t]{0,200}"
}

fn arb_tag_name() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("var".to_string()),
        Just("foreach".to_string()),
        Just("include".to_string()),
        "\\$[a-z][a-zA-Z0-9_]{0,8}",
        "[a-z][a-zA-Z]{0,10}",
    ]
}

fn arb_tag_args() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9$_ ,=]{0,30}"
}

fn arb_class_name() -> impl Strategy<Value = String> {
    "\\\\?[A-Z][a-zA-Z0-9_]{0,8}(\\\\[A-Z][a-zA-Z0-9_]{0,8}){0,2}"
}

/// Annotation text built from classes, builtins, generics, lists and unions.
fn arb_type_text() -> impl Strategy<Value = String> {
    let leaf = prop_oneof![
        arb_class_name(),
        Just("int".to_string()),
        Just("string".to_string()),
        Just("null".to_string()),
        Just("non-empty-string".to_string()),
    ];
    let single = leaf.prop_recursive(3, 12, 3, |inner| {
        prop_oneof![
            (
                prop_oneof![Just("array"), Just("iterable"), Just("Collection")],
                prop::collection::vec(inner.clone(), 1..=3),
            )
                .prop_map(|(base, args)| format!("{base}<{}>", args.join(", "))),
            inner.clone().prop_map(|t| format!("?{t}")),
        ]
    });
    prop_oneof![
        3 => single,
        1 => arb_class_name().prop_map(|c| format!("{c}[]")),
        1 => (arb_class_name(), arb_class_name()).prop_map(|(a, b)| format!("{a}|{b}|null")),
    ]
}

// ============================================================================
// SCANNER PROPERTIES
// ============================================================================

proptest! {
    #[test]
    fn plain_markup_has_no_tags(text in arb_plain_text()) {
        let mut scanner = Scanner::new(&text);
        let tags = scanner.scan().unwrap();
        prop_assert!(tags.is_empty());
        prop_assert_eq!(scanner.region_stack().as_slice(), &[Region::Markup]);
    }

    #[test]
    fn spliced_tag_is_found(
        before in arb_plain_text(),
        after in arb_plain_text(),
        name in arb_tag_name(),
        args in arb_tag_args(),
    ) {
        let args = args.trim().to_string();
        let body = if args.is_empty() { name.clone() } else { format!("{name} {args}") };
        let source = format!("{before}{{{body}}}{after}");

        let tags = scan(&source).unwrap();
        prop_assert_eq!(tags.len(), 1);
        let tag = &tags[0];

        prop_assert_eq!(tag.name.as_str(), name.as_str());
        prop_assert_eq!(tag.args.as_str(), args.as_str());
        prop_assert_eq!(&source[tag.name_range()], name.as_str());
        prop_assert_eq!(&source[tag.args_range()], args.as_str());
        prop_assert_eq!(usize::from(tag.tag_range.start()), before.len());
        prop_assert_eq!(usize::from(tag.tag_range.end()), before.len() + body.len() + 1);
        prop_assert_eq!(tag.region, Region::Markup);
    }
}

// ============================================================================
// TYPE PROPERTIES
// ============================================================================

proptest! {
    #[test]
    fn repr_round_trips(text in arb_type_text()) {
        // Some generated texts do not parse (`??X`).
        if let Some(ty) = parse_type(&text, None) {
            let again = parse_type(ty.repr(), None);
            prop_assert_eq!(again, Some(ty.without_nullable()));
        }
    }

    #[test]
    fn nullable_union_member_is_rejected(
        a in arb_class_name(),
        b in arb_class_name(),
        position in 0usize..2,
    ) {
        let text = if position == 0 { format!("?{a}|{b}") } else { format!("{a}|?{b}") };
        prop_assert_eq!(parse_type(&text, None), None);
    }
}
