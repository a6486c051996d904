//! Tests for DOM tree mutation methods used by the stylesheet passes.

use sepia_dom::{DomTree, ElementData, NodeId, NodeType};

/// Helper to create an element node and return its NodeId.
fn alloc_element(tree: &mut DomTree, tag: &str) -> NodeId {
    tree.alloc(NodeType::Element(ElementData::new(tag)))
}

/// Builds `<div><a></a><b></b><c></c></div>` under the document.
fn three_children() -> (DomTree, NodeId, [NodeId; 3]) {
    let mut tree = DomTree::new();
    let parent = alloc_element(&mut tree, "div");
    tree.append_child(NodeId::ROOT, parent);

    let a = alloc_element(&mut tree, "a");
    let b = alloc_element(&mut tree, "b");
    let c = alloc_element(&mut tree, "c");
    tree.append_child(parent, a);
    tree.append_child(parent, b);
    tree.append_child(parent, c);
    (tree, parent, [a, b, c])
}

// ========== remove_child ==========

#[test]
fn test_remove_child_single_child() {
    let mut tree = DomTree::new();
    let parent = alloc_element(&mut tree, "div");
    tree.append_child(NodeId::ROOT, parent);

    let child = alloc_element(&mut tree, "p");
    tree.append_child(parent, child);

    tree.remove_child(parent, child);

    assert!(tree.children(parent).is_empty());
    assert_eq!(tree.parent(child), None);
    assert_eq!(tree.prev_sibling(child), None);
    assert_eq!(tree.next_sibling(child), None);
}

#[test]
fn test_remove_child_first_of_three() {
    let (mut tree, parent, [a, b, c]) = three_children();

    tree.remove_child(parent, a);

    assert_eq!(tree.children(parent), &[b, c]);
    assert_eq!(tree.prev_sibling(b), None);
    assert_eq!(tree.next_sibling(b), Some(c));
    assert_eq!(tree.prev_sibling(c), Some(b));
}

#[test]
fn test_remove_child_middle_of_three() {
    let (mut tree, parent, [a, b, c]) = three_children();

    tree.remove_child(parent, b);

    assert_eq!(tree.children(parent), &[a, c]);
    assert_eq!(tree.next_sibling(a), Some(c));
    assert_eq!(tree.prev_sibling(c), Some(a));
}

#[test]
fn test_remove_child_of_wrong_parent_is_noop() {
    let (mut tree, parent, [a, b, _]) = three_children();

    tree.remove_child(a, b);

    assert_eq!(tree.parent(b), Some(parent));
    assert_eq!(tree.children(parent).len(), 3);
}

// ========== detach ==========

#[test]
fn test_detach_disconnects_subtree() {
    let (mut tree, parent, [a, b, c]) = three_children();
    let inner = alloc_element(&mut tree, "span");
    tree.append_child(b, inner);

    tree.detach(b);

    assert!(!tree.is_connected(b));
    assert!(!tree.is_connected(inner));
    assert!(tree.is_connected(a));
    let order: Vec<NodeId> = tree.descendants(NodeId::ROOT).collect();
    assert_eq!(order, vec![parent, a, c]);
}

#[test]
fn test_detach_root_is_noop() {
    let mut tree = DomTree::new();
    tree.detach(NodeId::ROOT);
    assert!(tree.is_connected(NodeId::ROOT));
}

#[test]
fn test_append_child_moves_attached_node() {
    let (mut tree, parent, [a, b, c]) = three_children();

    tree.append_child(a, c);

    assert_eq!(tree.children(parent), &[a, b]);
    assert_eq!(tree.children(a), &[c]);
    assert_eq!(tree.parent(c), Some(a));
}

// ========== traversal ==========

#[test]
fn test_descendants_are_in_tree_order() {
    let (mut tree, parent, [a, b, c]) = three_children();
    let a_child = alloc_element(&mut tree, "i");
    tree.append_child(a, a_child);

    let order: Vec<NodeId> = tree.descendants(NodeId::ROOT).collect();
    assert_eq!(order, vec![parent, a, a_child, b, c]);
}

#[test]
fn test_preceding_siblings_nearest_first() {
    let (tree, _, [a, b, c]) = three_children();
    let preceding: Vec<NodeId> = tree.preceding_siblings(c).collect();
    assert_eq!(preceding, vec![b, a]);
}

// ========== attributes ==========

#[test]
fn test_set_attribute_keeps_position() {
    let mut tree = DomTree::new();
    let el = tree.alloc(NodeType::Element(
        ElementData::new("p")
            .with_attr("id", "x")
            .with_attr("style", "color:red"),
    ));
    tree.append_child(NodeId::ROOT, el);

    tree.set_attribute(el, "id", "y");
    tree.set_attribute(el, "title", "t");

    let names: Vec<&str> = tree
        .as_element(el)
        .map(|e| e.attrs.keys().map(String::as_str).collect())
        .unwrap_or_default();
    assert_eq!(names, vec!["id", "style", "title"]);
    assert_eq!(tree.get_attribute(el, "id"), Some("y"));
}

#[test]
fn test_remove_attribute() {
    let mut tree = DomTree::new();
    let el = tree.alloc(NodeType::Element(
        ElementData::new("p").with_attr("style", "display:none"),
    ));
    tree.remove_attribute(el, "style");
    assert_eq!(tree.get_attribute(el, "style"), None);
    // Removing a missing attribute is harmless.
    tree.remove_attribute(el, "style");
}

#[test]
fn test_attribute_ops_on_text_node_are_ignored() {
    let mut tree = DomTree::new();
    let text = tree.alloc(NodeType::Text("hi".to_string()));
    tree.set_attribute(text, "style", "color:red");
    assert_eq!(tree.get_attribute(text, "style"), None);
    assert_eq!(tree.tag_name(text), None);
}

// ========== text content ==========

#[test]
fn test_set_text_content_replaces_children() {
    let (mut tree, parent, _) = three_children();

    tree.set_text_content(parent, "p{}");

    assert_eq!(tree.children(parent).len(), 1);
    assert_eq!(tree.text_content(parent), "p{}");
}

#[test]
fn test_set_text_content_empty_leaves_no_children() {
    let (mut tree, parent, _) = three_children();
    tree.set_text_content(parent, "");
    assert!(tree.children(parent).is_empty());
}
