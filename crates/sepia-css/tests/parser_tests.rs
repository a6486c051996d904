//! Integration tests for the style tree: parsing, errors and round-trips.

use pretty_assertions::assert_eq;
use quickcheck::{Arbitrary, Gen};
use quickcheck_macros::quickcheck;
use sepia_css::{
    AtRuleBlock, Declaration, ParseError, Rule, Stylesheet, Value, generate, parse_stylesheet,
};

fn parse(css: &str) -> Stylesheet {
    parse_stylesheet(css).expect("valid css")
}

fn first_declarations(sheet: &Stylesheet) -> &[Declaration] {
    match &sheet.rules[0] {
        Rule::Style(rule) => &rule.declarations,
        Rule::At(_) => panic!("expected a style rule"),
    }
}

#[test]
fn test_selector_list_is_split_and_collapsed() {
    let sheet = parse("h1,\n  div   >  p , a[title=\"x, y\"] { }");
    let Rule::Style(rule) = &sheet.rules[0] else {
        panic!("expected a style rule");
    };
    let texts: Vec<&str> = rule.selectors.iter().map(|s| s.text.as_str()).collect();
    assert_eq!(texts, vec!["h1", "div > p", "a[title=\"x, y\"]"]);
}

#[test]
fn test_value_kinds() {
    let sheet = parse("a{border:1px solid #F00;background:rgb(0, 0, 255) url(x.png)}");
    let declarations = first_declarations(&sheet);
    assert_eq!(
        declarations[0].value,
        vec![
            Value::Other("1px ".to_string()),
            Value::Identifier("solid".to_string()),
            Value::Other(" ".to_string()),
            Value::HexColor("F00".to_string()),
        ]
    );
    assert_eq!(
        declarations[1].value,
        vec![
            Value::FunctionCall {
                name: "rgb".to_string(),
                args: vec![Value::Other("0, 0, 255".to_string())],
            },
            Value::Other(" url(x.png)".to_string()),
        ]
    );
}

#[test]
fn test_hash_that_is_not_a_color_is_other() {
    let sheet = parse("a{grid-area:#abcde}");
    assert_eq!(
        first_declarations(&sheet)[0].value,
        vec![Value::Other("#abcde".to_string())]
    );
}

#[test]
fn test_important_and_custom_properties() {
    let sheet = parse("a{color: red !important; --Accent:  red  }");
    let declarations = first_declarations(&sheet);
    assert!(declarations[0].important);
    assert_eq!(
        declarations[0].value,
        vec![Value::Identifier("red".to_string())]
    );
    assert!(declarations[1].is_custom_property());
    assert_eq!(declarations[1].name, "--Accent");
    assert_eq!(declarations[1].value, vec![Value::Other("red".to_string())]);
}

#[test]
fn test_at_rule_blocks() {
    let sheet = parse(
        "@import url(a.css);\
         @media screen{a{color:red}}\
         @font-face{font-family:x}\
         @keyframes spin{from{color:red}to{color:blue}}\
         @page{@top-left{content:'x'}}",
    );
    let blocks: Vec<Option<&AtRuleBlock>> = sheet
        .rules
        .iter()
        .map(|rule| match rule {
            Rule::At(at) => at.block.as_ref(),
            Rule::Style(_) => panic!("expected at-rules only"),
        })
        .collect();
    assert!(blocks[0].is_none());
    assert!(matches!(blocks[1], Some(AtRuleBlock::Rules(rules)) if rules.len() == 1));
    assert!(matches!(blocks[2], Some(AtRuleBlock::Declarations(d)) if d.len() == 1));
    assert!(matches!(blocks[3], Some(AtRuleBlock::Keyframes(k)) if k.len() == 2));
    assert!(matches!(blocks[4], Some(AtRuleBlock::Raw(text)) if text == "@top-left{content:'x'}"));
    assert_eq!(sheet.style_rule_count(), 1);
}

#[test]
fn test_errors() {
    assert!(matches!(
        parse_stylesheet("a{color:red}}"),
        Err(ParseError::UnexpectedCloseBrace { offset: 12 })
    ));
    assert!(matches!(
        parse_stylesheet("a{color:red"),
        Err(ParseError::UnclosedBlock { offset: 1 })
    ));
    assert!(matches!(
        parse_stylesheet("a, {x:y}"),
        Err(ParseError::EmptySelector { .. })
    ));
    assert!(matches!(
        parse_stylesheet("{x:y}"),
        Err(ParseError::EmptySelector { .. })
    ));
    assert!(matches!(
        parse_stylesheet("a b c"),
        Err(ParseError::MissingBlock { offset: 0 })
    ));
    assert!(matches!(
        parse_stylesheet("a{color red}"),
        Err(ParseError::InvalidDeclaration { .. })
    ));
    assert!(matches!(
        parse_stylesheet("a{1px:red}"),
        Err(ParseError::InvalidDeclaration { .. })
    ));
    assert!(matches!(
        parse_stylesheet("a{color:rgb(1,2}"),
        Err(ParseError::UnclosedGroup { .. })
    ));
    assert!(matches!(
        parse_stylesheet("a{width:1px)}"),
        Err(ParseError::UnbalancedGroup { found: ')', .. })
    ));
    assert!(matches!(
        parse_stylesheet("a{content:\"x\n}"),
        Err(ParseError::BadString { .. })
    ));
    assert!(matches!(
        parse_stylesheet("@media print{a{x:y}"),
        Err(ParseError::UnclosedBlock { .. })
    ));
}

#[test]
fn test_empty_input() {
    assert_eq!(parse("").rules.len(), 0);
    assert_eq!(parse("  /* only a comment */ ").rules.len(), 0);
}

#[test]
fn test_generate_roundtrip_example() {
    let css = "@media (max-width: 600px) {\n  .a, .b > i { color : RED ; }\n}\np { margin: 0 auto !important }";
    let generated = generate(&parse(css));
    assert_eq!(
        generated,
        "@media (max-width: 600px){.a,.b > i{color:RED}}p{margin:0 auto!important}"
    );
    assert_eq!(parse(&generated), parse(css));
}

#[test]
fn test_comment_between_tokens_keeps_them_apart() {
    for (css, expected) in [
        ("a{font:12px/*x*/Arial}", "a{font:12px Arial}"),
        ("a{border:solid/**/red}", "a{border:solid red}"),
        ("a{margin:1px/**/2px}", "a{margin:1px 2px}"),
        ("a{margin:1px/**/-2px}", "a{margin:1px -2px}"),
    ] {
        let sheet = parse(css);
        let generated = generate(&sheet);
        assert_eq!(generated, expected);
        assert_eq!(parse(&generated), sheet);
    }
}

#[test]
fn test_comment_next_to_punctuation_leaves_nothing() {
    assert_eq!(
        generate(&parse("a/**/.x,b{color:/* c */red/**/;x:y}")),
        "a.x,b{color:red;x:y}"
    );
}

/// Stylesheet text assembled from well-formed pieces, with random spacing.
#[derive(Debug, Clone)]
struct CssSource(String);

const SELECTORS: &[&str] = &["p", "div > a", ".x", "#main", "ul li + li", "a[href^=\"http\"]", "*"];
const PROPERTIES: &[&str] = &["color", "background", "border", "margin", "--brand", "display"];
const VALUES: &[&str] = &[
    "red",
    "#abc",
    "#A0B1C2",
    "rgb(1, 2, 3)",
    "hsl(120deg 50% 50%)",
    "1px solid blue",
    "none",
    "calc(100% - 2px)",
    "url(a.png) no-repeat",
    "0 auto",
    "var(--brand, #fff)",
    "12px/*x*/Arial",
    "solid/**/red",
    "1px/**/2px",
];
const SPACES: &[&str] = &["", " ", "\n  ", "\t", "/* c */", " /**/ "];

fn pick(g: &mut Gen, list: &[&'static str]) -> &'static str {
    g.choose(list).copied().unwrap_or_default()
}

impl Arbitrary for CssSource {
    fn arbitrary(g: &mut Gen) -> Self {
        let rule_count = usize::arbitrary(g) % 5;
        let mut out = String::new();
        for _ in 0..rule_count {
            let rule = {
                let mut rule = String::new();
                let selector_count = 1 + usize::arbitrary(g) % 3;
                for i in 0..selector_count {
                    if i > 0 {
                        rule.push(',');
                        rule.push_str(pick(g, SPACES));
                    }
                    rule.push_str(pick(g, SELECTORS));
                }
                rule.push_str(pick(g, SPACES));
                rule.push('{');
                let declaration_count = usize::arbitrary(g) % 4;
                for _ in 0..declaration_count {
                    rule.push_str(pick(g, SPACES));
                    rule.push_str(pick(g, PROPERTIES));
                    rule.push(':');
                    rule.push_str(pick(g, SPACES));
                    rule.push_str(pick(g, VALUES));
                    if bool::arbitrary(g) {
                        rule.push_str(" !important");
                    }
                    rule.push(';');
                }
                rule.push('}');
                rule
            };
            if bool::arbitrary(g) {
                out.push_str("@media screen{");
                out.push_str(&rule);
                out.push('}');
            } else {
                out.push_str(&rule);
            }
            out.push_str(pick(g, SPACES));
        }
        Self(out)
    }
}

#[quickcheck]
fn prop_generate_then_parse_is_structurally_equal(source: CssSource) -> bool {
    let sheet = parse(&source.0);
    parse(&generate(&sheet)) == sheet
}

#[quickcheck]
fn prop_generate_is_a_fixed_point_after_one_pass(source: CssSource) -> bool {
    let once = generate(&parse(&source.0));
    generate(&parse(&once)) == once
}
