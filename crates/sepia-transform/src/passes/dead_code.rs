use sepia_css::selector::try_matches_any;
use sepia_css::{NodeKind, Rule, Stylesheet, walk_rules};
use sepia_dom::DomTree;
use tracing::debug;

use super::{StylePass, prune_empty_groups};
use crate::config::PassKind;
use crate::report::RewriteReport;

/// Drops selectors that match nothing in the document, and rules left with
/// no selectors.
///
/// A selector that cannot be evaluated (`:hover`, `::before`, ...) is kept.
/// Declarations are never touched. Conditional group rules emptied this way
/// are dropped too; other at-rules are kept as they are.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeadCodeEliminationPass;

impl StylePass for DeadCodeEliminationPass {
    fn kind(&self) -> PassKind {
        PassKind::DeadCode
    }

    fn rewrite(&mut self, sheet: &mut Stylesheet, tree: &mut DomTree, report: &mut RewriteReport) {
        let tree = &*tree;
        walk_rules(sheet, &[NodeKind::Rule], |rule, cursor| {
            let Rule::Style(style) = rule else {
                return;
            };
            style.selectors.retain(|selector| {
                match try_matches_any(tree, &selector.text) {
                    Ok(matched) => matched,
                    Err(err) => {
                        debug!(selector = %selector.text, %err, "keeping selector that cannot be evaluated");
                        true
                    }
                }
            });
            if style.selectors.is_empty() {
                cursor.remove();
                report.rules_removed += 1;
            }
        });
        prune_empty_groups(&mut sheet.rules);
    }
}
