//! Property tests over generated documents and stylesheets.

use quickcheck::{Arbitrary, Gen};
use quickcheck_macros::quickcheck;
use sepia_css::{Stylesheet, generate, parse_stylesheet};
use sepia_dom::DomTree;
use sepia_html::parse_document;
use sepia_transform::{DeadCodeEliminationPass, RecolorPass, RewriteReport, StylePass};

const TAGS: &[&str] = &["p", "div", "span", "a", "b", "ul", "li"];
const CLASSES: &[&str] = &["", " class=x", " class=\"x y\"", " class=y"];
const SELECTORS: &[&str] = &[
    "p", "div", "span", "a", "b", "li", ".x", ".y", "div > p", "ul li", "p + p", "a:hover",
    "b::before", "em", ".z", "*", "li:first-child",
];
const COLORS: &[&str] = &[
    "red", "Navy", "#abc", "#A0B1C2", "#11223344", "rgb(10, 20, 30)", "rgba(0 0 0 / 50%)",
    "hsl(200 50% 40%)", "hsla(1turn, 10%, 90%, .3)", "transparent", "currentColor",
    "var(--c)", "1px solid gray", "linear-gradient(red, blue)",
];

fn pick(g: &mut Gen, list: &[&'static str]) -> &'static str {
    g.choose(list).copied().unwrap_or_default()
}

/// A small document and a stylesheet that targets it.
#[derive(Debug, Clone)]
struct Page {
    html: String,
    css: String,
}

impl Arbitrary for Page {
    fn arbitrary(g: &mut Gen) -> Self {
        let mut html = String::new();
        for _ in 0..usize::arbitrary(g) % 8 {
            let tag = pick(g, TAGS);
            html.push_str(&format!("<{tag}{}>", pick(g, CLASSES)));
            if bool::arbitrary(g) {
                let inner = pick(g, TAGS);
                html.push_str(&format!("<{inner}></{inner}>"));
            }
            html.push_str(&format!("</{tag}>"));
        }

        let mut css = String::new();
        for _ in 0..usize::arbitrary(g) % 6 {
            let selector_count = 1 + usize::arbitrary(g) % 3;
            let selectors: Vec<&str> = (0..selector_count).map(|_| pick(g, SELECTORS)).collect();
            css.push_str(&selectors.join(", "));
            css.push_str(&format!(" {{ color: {}; }}", pick(g, COLORS)));
            if bool::arbitrary(g) {
                css = format!("@media screen {{ {css} }}");
            }
        }
        Self { html, css }
    }
}

fn apply(pass: &mut dyn StylePass, sheet: &mut Stylesheet, tree: &mut DomTree) -> RewriteReport {
    let mut report = RewriteReport::default();
    pass.rewrite(sheet, tree, &mut report);
    report
}

#[quickcheck]
fn prop_dead_code_never_adds_rules(page: Page) -> bool {
    let mut tree = parse_document(&page.html);
    let mut sheet = parse_stylesheet(&page.css).expect("generated css parses");
    let before = sheet.style_rule_count();
    let report = apply(&mut DeadCodeEliminationPass, &mut sheet, &mut tree);
    let after = sheet.style_rule_count();
    after <= before && before - after == report.rules_removed
}

#[quickcheck]
fn prop_dead_code_is_idempotent(page: Page) -> bool {
    let mut tree = parse_document(&page.html);
    let mut sheet = parse_stylesheet(&page.css).expect("generated css parses");
    let _ = apply(&mut DeadCodeEliminationPass, &mut sheet, &mut tree);
    let once = generate(&sheet);
    let report = apply(&mut DeadCodeEliminationPass, &mut sheet, &mut tree);
    report.rules_removed == 0 && generate(&sheet) == once
}

#[quickcheck]
fn prop_recolor_is_idempotent(page: Page) -> bool {
    let mut tree = DomTree::new();
    let mut sheet = parse_stylesheet(&page.css).expect("generated css parses");
    let _ = apply(&mut RecolorPass, &mut sheet, &mut tree);
    let once = generate(&sheet);
    let report = apply(&mut RecolorPass, &mut sheet, &mut tree);
    report.colors_rewritten == 0 && generate(&sheet) == once
}

#[quickcheck]
fn prop_recolor_is_deterministic(page: Page) -> bool {
    let run = || {
        let mut sheet = parse_stylesheet(&page.css).expect("generated css parses");
        let _ = apply(&mut RecolorPass, &mut sheet, &mut DomTree::new());
        generate(&sheet)
    };
    run() == run()
}
