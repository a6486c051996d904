use sepia_css::selector::match_first;
use sepia_css::{NodeKind, Rule, Stylesheet, walk_rules};
use sepia_dom::{DomTree, NodeId};
use tracing::debug;

use super::{StylePass, prune_empty_groups};
use crate::config::{HiddenTarget, PassKind};
use crate::report::RewriteReport;

/// Removes content hidden by a `(property, value)` declaration, keeping the
/// document and its stylesheets in step.
///
/// 1. Elements whose `style` attribute sets the target are removed.
/// 2. Style rules setting the target are removed from the stylesheet, and for
///    each of their selectors the first matching element is removed as well.
///    Conditional group rules left empty are dropped.
#[derive(Debug, Clone, Default)]
pub struct SynchronizedRemovalPass {
    target: HiddenTarget,
}

impl SynchronizedRemovalPass {
    /// A pass removing what `target` hides.
    #[must_use]
    pub const fn new(target: HiddenTarget) -> Self {
        Self { target }
    }

    /// The declaration this pass looks for.
    #[must_use]
    pub const fn target(&self) -> &HiddenTarget {
        &self.target
    }
}

impl StylePass for SynchronizedRemovalPass {
    fn kind(&self) -> PassKind {
        PassKind::RemoveHidden
    }

    fn prepare(&mut self, tree: &mut DomTree, report: &mut RewriteReport) {
        let hidden: Vec<NodeId> = tree
            .elements()
            .filter(|&id| {
                tree.get_attribute(id, "style")
                    .is_some_and(|style| self.target.matches_inline(style))
            })
            .collect();

        for id in hidden {
            // Already gone with a hidden ancestor.
            if !tree.is_connected(id) {
                continue;
            }
            debug!(element = ?id, "removing element hidden by its style attribute");
            tree.detach(id);
            report.elements_removed += 1;
        }
    }

    fn rewrite(&mut self, sheet: &mut Stylesheet, tree: &mut DomTree, report: &mut RewriteReport) {
        let mut removed_selectors = Vec::new();
        walk_rules(sheet, &[NodeKind::Rule], |rule, cursor| {
            let Rule::Style(style) = rule else {
                return;
            };
            if style
                .declarations
                .iter()
                .any(|declaration| self.target.matches_declaration(declaration))
            {
                removed_selectors.extend(style.selectors.iter().map(|s| s.text.clone()));
                cursor.remove();
                report.rules_removed += 1;
            }
        });
        prune_empty_groups(&mut sheet.rules);

        for selector in removed_selectors {
            if let Some(id) = match_first(tree, &selector) {
                debug!(element = ?id, %selector, "removing element hidden by a rule");
                tree.detach(id);
                report.elements_removed += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sepia_css::{generate, parse_stylesheet};
    use sepia_dom::ElementData;
    use sepia_dom::NodeType;

    fn element(tree: &mut DomTree, parent: NodeId, data: ElementData) -> NodeId {
        let id = tree.alloc(NodeType::Element(data));
        tree.append_child(parent, id);
        id
    }

    #[test]
    fn test_rule_and_first_match_are_removed() {
        let mut tree = DomTree::new();
        let body = element(&mut tree, NodeId::ROOT, ElementData::new("body"));
        let first = element(&mut tree, body, ElementData::new("p"));
        let second = element(&mut tree, body, ElementData::new("p"));
        let mut sheet = parse_stylesheet("p{display:none}b{color:red}").expect("valid css");
        let mut report = RewriteReport::default();

        SynchronizedRemovalPass::default().rewrite(&mut sheet, &mut tree, &mut report);

        assert_eq!(generate(&sheet), "b{color:red}");
        assert!(!tree.is_connected(first));
        assert!(tree.is_connected(second));
        assert_eq!(report.rules_removed, 1);
        assert_eq!(report.elements_removed, 1);
    }

    #[test]
    fn test_prepare_skips_descendants_of_removed_elements() {
        let mut tree = DomTree::new();
        let outer = element(
            &mut tree,
            NodeId::ROOT,
            ElementData::new("div").with_attr("style", "display: none"),
        );
        let inner = element(
            &mut tree,
            outer,
            ElementData::new("div").with_attr("style", "DISPLAY:NONE"),
        );
        let mut report = RewriteReport::default();

        SynchronizedRemovalPass::default().prepare(&mut tree, &mut report);

        assert!(!tree.is_connected(outer));
        assert!(!tree.is_connected(inner));
        assert_eq!(report.elements_removed, 1);
    }

    #[test]
    fn test_group_emptied_by_removal_is_dropped() {
        let mut tree = DomTree::new();
        let p = element(&mut tree, NodeId::ROOT, ElementData::new("p"));
        let css = "@media print{p{display:none}}@media screen{a{display:none}b{x:y}}";
        let mut sheet = parse_stylesheet(css).expect("valid css");
        let mut report = RewriteReport::default();

        SynchronizedRemovalPass::default().rewrite(&mut sheet, &mut tree, &mut report);

        assert_eq!(generate(&sheet), "@media screen{b{x:y}}");
        assert!(!tree.is_connected(p));
        assert_eq!(report.rules_removed, 2);
    }

    #[test]
    fn test_value_must_be_the_keyword() {
        let mut sheet = parse_stylesheet("a{display:none-ish}b{Display: NONE !important}")
            .expect("valid css");
        let mut report = RewriteReport::default();
        SynchronizedRemovalPass::default().rewrite(&mut sheet, &mut DomTree::new(), &mut report);
        assert_eq!(generate(&sheet), "a{display:none-ish}");
    }
}
