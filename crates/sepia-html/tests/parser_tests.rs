//! Integration tests for the tree builder.

use pretty_assertions::assert_eq;
use sepia_dom::{DomTree, NodeId, NodeType};
use sepia_html::{parse_document, parse_document_with_issues};

/// Helper to get element by tag name (first match, depth-first)
fn find_element(tree: &DomTree, tag: &str) -> Option<NodeId> {
    tree.descendants(NodeId::ROOT)
        .find(|&id| tree.tag_name(id) == Some(tag))
}

/// Helper to list the tag names of an element's element children
fn child_tags(tree: &DomTree, id: NodeId) -> Vec<String> {
    tree.children(id)
        .iter()
        .filter_map(|&c| tree.tag_name(c).map(str::to_string))
        .collect()
}

#[test]
fn test_document_structure_is_kept_as_written() {
    let html = "<!DOCTYPE html><html><head><style>p{color:red}</style></head><body><p>x</p></body></html>";
    let tree = parse_document(html);

    let root_children = tree.children(NodeId::ROOT);
    assert_eq!(root_children.len(), 2);
    assert!(matches!(
        tree.get(root_children[0]).map(|n| &n.node_type),
        Some(NodeType::Doctype(name)) if name == "html"
    ));
    assert_eq!(tree.to_html(), html);
}

#[test]
fn test_no_implied_wrappers() {
    let tree = parse_document("<p>hi</p>");
    assert_eq!(child_tags(&tree, NodeId::ROOT), vec!["p"]);
    assert!(find_element(&tree, "body").is_none());
}

#[test]
fn test_text_is_coalesced() {
    let tree = parse_document("<div>Hello World</div>");
    let div = find_element(&tree, "div").expect("div");
    assert_eq!(tree.children(div).len(), 1);
    assert_eq!(tree.text_content(div), "Hello World");
}

#[test]
fn test_void_elements_do_not_nest() {
    let tree = parse_document("<div><img src=a.png><span>t</span></div>");
    let div = find_element(&tree, "div").expect("div");
    assert_eq!(child_tags(&tree, div), vec!["img", "span"]);
}

#[test]
fn test_paragraph_closed_by_block() {
    let tree = parse_document("<p>one<div>two</div>");
    assert_eq!(child_tags(&tree, NodeId::ROOT), vec!["p", "div"]);
}

#[test]
fn test_list_items_close_each_other() {
    let tree = parse_document("<ul><li>a<li>b<li>c</ul>");
    let ul = find_element(&tree, "ul").expect("ul");
    assert_eq!(child_tags(&tree, ul), vec!["li", "li", "li"]);
}

#[test]
fn test_nested_list_items_stay_nested() {
    let tree = parse_document("<ul><li>a<ul><li>b</ul></ul>");
    let ul = find_element(&tree, "ul").expect("ul");
    assert_eq!(child_tags(&tree, ul), vec!["li"]);
}

#[test]
fn test_table_cells_close_each_other() {
    let tree = parse_document("<table><tr><td>1<td>2<tr><td>3</table>");
    let table = find_element(&tree, "table").expect("table");
    assert_eq!(child_tags(&tree, table), vec!["tr", "tr"]);
    let first_row = tree.children(table)[0];
    assert_eq!(child_tags(&tree, first_row), vec!["td", "td"]);
}

#[test]
fn test_self_closing_in_svg() {
    let tree = parse_document("<svg><circle r=1 /><rect/></svg><p>after</p>");
    let svg = find_element(&tree, "svg").expect("svg");
    assert_eq!(child_tags(&tree, svg), vec!["circle", "rect"]);
    assert_eq!(child_tags(&tree, NodeId::ROOT), vec!["svg", "p"]);
}

#[test]
fn test_self_closing_div_is_ignored() {
    let (tree, issues) = parse_document_with_issues("<div/><span></span>");
    let div = find_element(&tree, "div").expect("div");
    assert_eq!(child_tags(&tree, div), vec!["span"]);
    assert_eq!(issues.len(), 1);
}

#[test]
fn test_stray_end_tag_is_reported() {
    let (tree, issues) = parse_document_with_issues("<div>a</span>b</div>");
    let div = find_element(&tree, "div").expect("div");
    assert_eq!(tree.text_content(div), "ab");
    assert_eq!(issues.len(), 1);
    assert!(issues[0].message.contains("</span>"));
}

#[test]
fn test_end_tag_closes_unclosed_children() {
    let tree = parse_document("<div><span>a</div><p>b</p>");
    assert_eq!(child_tags(&tree, NodeId::ROOT), vec!["div", "p"]);
}

#[test]
fn test_style_attribute_is_preserved() {
    let tree = parse_document(r#"<p style="display: none">x</p>"#);
    let p = find_element(&tree, "p").expect("p");
    assert_eq!(tree.get_attribute(p, "style"), Some("display: none"));
}

#[test]
fn test_comments_are_kept() {
    let tree = parse_document("<div><!--note--></div>");
    assert_eq!(tree.to_html(), "<div><!--note--></div>");
}
