//! The rewriting passes.
//!
//! Each pass works on one parsed stylesheet at a time; the
//! [`StylesheetRewriter`](crate::rewriter::StylesheetRewriter) feeds it every
//! style source of a document in turn.

mod dead_code;
mod hidden;
mod recolor;

pub use dead_code::DeadCodeEliminationPass;
pub use hidden::SynchronizedRemovalPass;
pub use recolor::RecolorPass;

use sepia_css::{AtRuleBlock, Rule, Stylesheet};
use sepia_dom::DomTree;

use crate::config::{HiddenTarget, PassKind};
use crate::report::RewriteReport;

/// A transformation of stylesheets, possibly reaching into the document.
pub trait StylePass {
    /// Which pass this is.
    fn kind(&self) -> PassKind;

    /// Whether `style` attributes are rewritten too. Their declarations are
    /// handed to [`StylePass::rewrite`] wrapped in a single placeholder rule.
    fn rewrites_inline_styles(&self) -> bool {
        false
    }

    /// Runs once per document, before any stylesheet.
    fn prepare(&mut self, _tree: &mut DomTree, _report: &mut RewriteReport) {}

    /// Rewrite one stylesheet in place.
    fn rewrite(&mut self, sheet: &mut Stylesheet, tree: &mut DomTree, report: &mut RewriteReport);
}

/// Build the pass for `kind`.
#[must_use]
pub fn pass_for(kind: PassKind, hidden: &HiddenTarget) -> Box<dyn StylePass> {
    match kind {
        PassKind::Grayscale => Box::new(RecolorPass),
        PassKind::RemoveHidden => Box::new(SynchronizedRemovalPass::new(hidden.clone())),
        PassKind::DeadCode => Box::new(DeadCodeEliminationPass),
    }
}

/// Remove conditional group rules with no rules left, innermost first.
fn prune_empty_groups(rules: &mut Vec<Rule>) {
    rules.retain_mut(|rule| match rule {
        Rule::At(at) if at.is_conditional_group() => match &mut at.block {
            Some(AtRuleBlock::Rules(nested)) => {
                prune_empty_groups(nested);
                !nested.is_empty()
            }
            _ => true,
        },
        _ => true,
    });
}
