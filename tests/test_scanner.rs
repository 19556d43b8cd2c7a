//! Scanner behaviour on whole documents: which tags come out, where, and
//! which nesting errors stop the scan.

use latte::syntax::{RawTagKind, Region, ScanError, Scanner, scan};
use latte::{ScannerConfig, TextRange, TextSize};
use rstest::rstest;

fn names(source: &str) -> Vec<String> {
    scan(source)
        .unwrap()
        .iter()
        .map(|t| t.name.to_string())
        .collect()
}

#[test]
fn test_layout_document() {
    let source = r#"{layout '@layout.latte'}
{block content}
<ul n:if="$items">
    <li n:foreach="$items as $item" class="{$item->class}">{$item->title}</li>
</ul>
{/block}
"#;
    let tags = scan(source).unwrap();
    let found: Vec<_> = tags.iter().map(|t| (t.name.as_str(), t.kind)).collect();
    assert_eq!(
        found,
        [
            ("layout", RawTagKind::Delimited),
            ("block", RawTagKind::Delimited),
            ("if", RawTagKind::Attribute),
            ("foreach", RawTagKind::Attribute),
            ("$item->class", RawTagKind::Delimited),
            ("$item->title", RawTagKind::Delimited),
            ("/block", RawTagKind::Delimited),
        ]
    );

    // Every tag's range starts and ends on its delimiters.
    for tag in &tags {
        let start = usize::from(tag.tag_range.start());
        let end = usize::from(tag.tag_range.end());
        let (open, close) = match tag.kind {
            RawTagKind::Delimited => ("{", "}"),
            RawTagKind::Attribute => ("n", "\""),
        };
        assert_eq!(&source[start..start + 1], open, "{tag:?}");
        assert_eq!(&source[end..end + 1], close, "{tag:?}");
    }

    let class_tag = &tags[4];
    assert_eq!(class_tag.region, Region::DoubleQuoted);
    let title_tag = &tags[5];
    assert_eq!(title_tag.region, Region::Markup);
}

#[rstest]
#[case::example_from_docs("{var $prvni}", "var", 1, "$prvni", 5, 0, 11)]
#[case::print_sigil("{$foo}", "$foo", 1, "", 5, 0, 5)]
#[case::print_expression("{=$a + 1}", "=$a", 1, "+ 1", 5, 0, 8)]
#[case::closing("x{/foreach}", "/foreach", 2, "", 10, 1, 10)]
#[case::multiline_args("{var $a =\n  1}", "var", 1, "$a =\n  1", 5, 0, 13)]
fn test_delimited_tag_parts(
    #[case] source: &str,
    #[case] name: &str,
    #[case] name_offset: u32,
    #[case] args: &str,
    #[case] args_offset: u32,
    #[case] start: u32,
    #[case] end: u32,
) {
    let tags = scan(source).unwrap();
    assert_eq!(tags.len(), 1);
    let tag = &tags[0];
    assert_eq!(tag.name, name);
    assert_eq!(tag.name_offset, TextSize::from(name_offset));
    assert_eq!(tag.args, args);
    assert_eq!(tag.args_offset, TextSize::from(args_offset));
    assert_eq!(tag.tag_range, TextRange::new(start.into(), end.into()));
}

#[rstest]
#[case::empty("{}")]
#[case::leading_space("{ foo}")]
#[case::javascript_object("<script>var o = { a: 1 };</script>")]
fn test_no_name_no_tag(#[case] source: &str) {
    assert!(scan(source).unwrap().is_empty());
}

#[rstest]
#[case::apostrophe_in_text("It's {$name}'s page", &["$name"])]
#[case::comparison_in_tag("{if $a < $b}ok{/if}", &["if", "/if"])]
#[case::closing_angle_in_tag_string(r#"{var $s = "a>b"}"#, &["var"])]
#[case::single_quoted_attribute("<a title='{$t}'>", &["$t"])]
#[case::nested_quotes_in_attribute(r#"<a onclick="f('{$x}')">"#, &["$x"])]
fn test_quotes_and_brackets(#[case] source: &str, #[case] expected: &[&str]) {
    assert_eq!(names(source), expected);
}

#[rstest]
#[case::unterminated_tag("<p>{foo", 7, Region::TemplateTag)]
#[case::unterminated_markup_tag("<p class=\"x\"", 12, Region::MarkupTag)]
#[case::unterminated_quote("<p class=\"x>", 12, Region::DoubleQuoted)]
fn test_unterminated(#[case] source: &str, #[case] offset: u32, #[case] region: Region) {
    let err = scan(source).unwrap_err();
    assert_eq!(
        err,
        ScanError::Unterminated {
            offset: TextSize::from(offset),
            region
        }
    );
    assert!(err.to_string().starts_with(&format!("missing end of `{region}` region")));
}

#[test]
fn test_stray_closing_brace() {
    let err = scan("a } b").unwrap_err();
    assert_eq!(err.offset(), TextSize::from(2));
    assert!(matches!(
        err,
        ScanError::UnexpectedExit {
            top: Region::Markup,
            exiting: Region::TemplateTag,
            ..
        }
    ));
}

#[test]
fn test_custom_attribute_prefix() {
    let config = ScannerConfig::default().with_attribute_prefix('x');
    let tags = Scanner::with_config(r#"<p x:if="$a" n:if="$b">"#, config)
        .scan()
        .unwrap();
    assert_eq!(tags.len(), 1);
    assert_eq!(tags[0].args, "$a");
}

#[test]
fn test_scanner_reports_position_after_scan() {
    let mut scanner = Scanner::new("{var $a}\n\n<b>x</b>");
    scanner.scan().unwrap();
    let position = scanner.position();
    assert_eq!(position.line, 2);
    assert_eq!(position.offset, 18);
}
