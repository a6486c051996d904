//! End-to-end tests: parse a document, run passes, check the serialized result.

use pretty_assertions::assert_eq;
use sepia_common::warning::{has_warned, warn_once};
use sepia_css::selector::match_first;
use sepia_dom::DomTree;
use sepia_html::parse_document;
use sepia_transform::{
    DeadCodeEliminationPass, HiddenTarget, PassKind, Pipeline, RecolorPass, RewriteReport,
    StylesheetRewriter, SynchronizedRemovalPass,
};

fn style_text(tree: &DomTree, index: usize) -> String {
    let ids = sepia_transform::rewriter::style_elements(tree);
    tree.text_content(ids[index])
}

fn run_pass(html: &str, kind: PassKind) -> (DomTree, RewriteReport) {
    let mut tree = parse_document(html);
    let report = StylesheetRewriter::new(&mut tree).run_pipeline(&Pipeline::new([kind]));
    (tree, report)
}

#[test]
fn test_hidden_rule_and_element_removed_together() {
    let (tree, report) = run_pass(
        "<style>p{display:none}</style><body><p>A</p><span>B</span></body>",
        PassKind::RemoveHidden,
    );
    assert_eq!(tree.to_html(), "<style></style><body><span>B</span></body>");
    assert_eq!(report.rules_removed, 1);
    assert_eq!(report.elements_removed, 1);
    assert_eq!(report.sources_rewritten, 1);
}

#[test]
fn test_only_first_match_per_selector_is_removed() {
    let (tree, _) = run_pass(
        "<style>.ad{display:none}</style><div class=ad>1</div><div class=ad>2</div>",
        PassKind::RemoveHidden,
    );
    assert_eq!(tree.to_html(), "<style></style><div class=\"ad\">2</div>");
}

#[test]
fn test_inline_hidden_elements_removed() {
    let (tree, report) = run_pass(
        "<div style=\"DISPLAY : none\"><p>x</p></div><p style=\"display:block\">y</p>",
        PassKind::RemoveHidden,
    );
    assert_eq!(tree.to_html(), "<p style=\"display:block\">y</p>");
    assert_eq!(report.elements_removed, 1);
    // Inline styles are not rewritten by this pass.
    assert_eq!(report.sources_rewritten, 0);
}

#[test]
fn test_custom_hidden_target() {
    let mut tree = parse_document(
        "<style>.x{visibility:hidden}.y{display:none}</style><i class=x></i><i class=y></i>",
    );
    let mut pass = SynchronizedRemovalPass::new(HiddenTarget::new("visibility", "hidden"));
    let _ = StylesheetRewriter::new(&mut tree).run(&mut pass);
    assert_eq!(style_text(&tree, 0), ".y{display:none}");
    assert!(match_first(&tree, ".x").is_none());
    assert!(match_first(&tree, ".y").is_some());
}

#[test]
fn test_later_sources_see_earlier_removals() {
    let (tree, report) = run_pass(
        "<style>.a{display:none}</style><div class=a><style>b{display:none}</style></div><b>x</b>",
        PassKind::RemoveHidden,
    );
    assert_eq!(tree.to_html(), "<style></style><b>x</b>");
    assert_eq!(report.sources_rewritten, 1);
}

#[test]
fn test_dead_code_scenario() {
    let (tree, report) = run_pass(
        "<style>p{color:#000}b{color:#000}</style><body><p>Hi</p></body>",
        PassKind::DeadCode,
    );
    assert_eq!(style_text(&tree, 0), "p{color:#000}");
    assert_eq!(report.rules_removed, 1);
}

#[test]
fn test_dead_code_keeps_dynamic_selectors_and_inline_styles() {
    let (tree, _) = run_pass(
        "<style>a:hover,q{color:red}</style><p style=\"color: red\">x</p>",
        PassKind::DeadCode,
    );
    assert_eq!(style_text(&tree, 0), "a:hover{color:red}");
    assert!(tree.to_html().contains("style=\"color: red\""));
}

#[test]
fn test_recolor_scenario() {
    let (tree, report) = run_pass("<style>a { color: red; }</style>", PassKind::Grayscale);
    assert_eq!(style_text(&tree, 0), "a{color:#4c4c4c}");
    assert_eq!(report.colors_rewritten, 1);
}

#[test]
fn test_inline_recolor() {
    let (tree, report) = run_pass("<p style=\"color:red\">x</p>", PassKind::Grayscale);
    assert_eq!(tree.to_html(), "<p style=\"color:#4c4c4c\">x</p>");
    assert_eq!(report.sources_rewritten, 1);
}

#[test]
fn test_unparsable_sources_are_left_alone() {
    let (tree, report) = run_pass(
        "<style>a{color:red</style><p style=\"color: red; }\">x</p><i style=\"color: blue\"></i>",
        PassKind::Grayscale,
    );
    assert_eq!(
        tree.to_html(),
        "<style>a{color:red</style><p style=\"color: red; }\">x</p><i style=\"color:#1d1d1d\"></i>"
    );
    assert_eq!(report.sources_skipped, 2);
    assert_eq!(report.sources_rewritten, 1);
}

#[test]
fn test_pipeline_runs_passes_in_order() {
    let mut tree = parse_document(
        "<style>.gone{display:none}.gone,p{color:red}i{color:blue}</style><p class=gone>a</p><p>b</p>",
    );
    let pipeline = Pipeline::new([PassKind::RemoveHidden, PassKind::DeadCode, PassKind::Grayscale]);
    let report = StylesheetRewriter::new(&mut tree).run_pipeline(&pipeline);
    assert_eq!(style_text(&tree, 0), "p{color:#4c4c4c}");
    assert_eq!(report.rules_removed, 2);
    assert_eq!(report.elements_removed, 1);
    assert_eq!(report.sources_rewritten, 3);
}

#[test]
fn test_passes_can_be_driven_directly() {
    let mut tree = parse_document("<style>b{color:red}</style><b>x</b>");
    let mut rewriter = StylesheetRewriter::new(&mut tree);
    let first = rewriter.run(&mut DeadCodeEliminationPass);
    let second = rewriter.run(&mut RecolorPass);
    assert_eq!(first.rules_removed, 0);
    assert_eq!(second.colors_rewritten, 1);
}

#[test]
fn test_group_emptied_by_removal_is_dropped() {
    let (tree, report) = run_pass(
        "<style>@media print{p{display:none}}</style><p>A</p>",
        PassKind::RemoveHidden,
    );
    assert_eq!(tree.to_html(), "<style></style>");
    assert_eq!(report.rules_removed, 1);
}

#[test]
fn test_pipeline_forgets_warnings_from_earlier_documents() {
    warn_once("Selector", "left over from an earlier document");
    assert!(has_warned("Selector", "left over from an earlier document"));

    let _ = run_pass("<style>p{color:red}</style><p>x</p>", PassKind::DeadCode);

    assert!(!has_warned("Selector", "left over from an earlier document"));
}
