//! Drives a pass over every style source of a document.
//!
//! Style sources are `<style>` elements, then elements carrying a `style`
//! attribute, each in document order. Every source is parsed, rewritten and
//! written back where it came from. A source that fails to parse is left
//! exactly as it was.

use sepia_common::warning::clear_warnings;
use sepia_css::{
    ParseError, Rule, Stylesheet, generate, generate_declarations, parse_stylesheet,
};
use sepia_dom::{DomTree, NodeId};
use tracing::{debug, warn};

use crate::config::Pipeline;
use crate::passes::{StylePass, pass_for};
use crate::report::RewriteReport;

/// Runs passes against one document.
pub struct StylesheetRewriter<'t> {
    tree: &'t mut DomTree,
}

impl<'t> StylesheetRewriter<'t> {
    /// Rewrite the style sources of `tree`.
    #[must_use]
    pub const fn new(tree: &'t mut DomTree) -> Self {
        Self { tree }
    }

    /// Run a single pass over every style source.
    ///
    /// Sources removed from the document by an earlier source are skipped.
    pub fn run(&mut self, pass: &mut dyn StylePass) -> RewriteReport {
        let mut report = RewriteReport::default();
        pass.prepare(self.tree, &mut report);

        for id in style_elements(self.tree) {
            if self.tree.is_connected(id) {
                self.rewrite_style_element(id, pass, &mut report);
            }
        }

        if pass.rewrites_inline_styles() {
            for id in inline_style_elements(self.tree) {
                self.rewrite_style_attribute(id, pass, &mut report);
            }
        }

        debug!(pass = %pass.kind(), %report, "pass finished");
        report
    }

    /// Run every pass of `pipeline` in order, each seeing the document as
    /// the previous one left it.
    ///
    /// Warnings deduplicated while rewriting an earlier document are
    /// forgotten first, so each document reports its own.
    pub fn run_pipeline(&mut self, pipeline: &Pipeline) -> RewriteReport {
        clear_warnings();
        let mut report = RewriteReport::default();
        for &kind in &pipeline.passes {
            let mut pass = pass_for(kind, &pipeline.hidden);
            report += self.run(pass.as_mut());
        }
        report
    }

    fn rewrite_style_element(
        &mut self,
        id: NodeId,
        pass: &mut dyn StylePass,
        report: &mut RewriteReport,
    ) {
        let text = self.tree.text_content(id);
        let mut sheet = match parse_stylesheet(&text) {
            Ok(sheet) => sheet,
            Err(err) => {
                warn!(element = ?id, %err, "leaving unparsable <style> unchanged");
                report.sources_skipped += 1;
                return;
            }
        };
        pass.rewrite(&mut sheet, self.tree, report);
        self.tree.set_text_content(id, generate(&sheet));
        report.sources_rewritten += 1;
        debug!(element = ?id, pass = %pass.kind(), "rewrote <style>");
    }

    fn rewrite_style_attribute(
        &mut self,
        id: NodeId,
        pass: &mut dyn StylePass,
        report: &mut RewriteReport,
    ) {
        let Some(style) = self.tree.get_attribute(id, "style") else {
            return;
        };
        let mut sheet = match parse_inline_style(style) {
            Ok(sheet) => sheet,
            Err(err) => {
                warn!(element = ?id, %err, "leaving unparsable style attribute unchanged");
                report.sources_skipped += 1;
                return;
            }
        };
        pass.rewrite(&mut sheet, self.tree, report);
        let declarations = match sheet.rules.first() {
            Some(Rule::Style(rule)) => generate_declarations(&rule.declarations),
            _ => String::new(),
        };
        self.tree.set_attribute(id, "style", declarations);
        report.sources_rewritten += 1;
        debug!(element = ?id, pass = %pass.kind(), "rewrote style attribute");
    }
}

/// Parse a `style` attribute as the body of a placeholder rule.
///
/// # Errors
///
/// Fails if the attribute is not a valid declaration list, including text
/// that would close the placeholder rule early.
pub fn parse_inline_style(style: &str) -> Result<Stylesheet, ParseError> {
    let sheet = parse_stylesheet(&format!("x {{ {style} }} "))?;
    if sheet.rules.len() == 1 && matches!(sheet.rules[0], Rule::Style(_)) {
        Ok(sheet)
    } else {
        Err(ParseError::InvalidDeclaration {
            offset: 0,
            reason: "style attribute is not a single declaration list".to_string(),
        })
    }
}

/// Connected `<style>` elements in document order.
#[must_use]
pub fn style_elements(tree: &DomTree) -> Vec<NodeId> {
    tree.elements()
        .filter(|&id| {
            tree.tag_name(id) == Some("style")
                && tree
                    .get_attribute(id, "type")
                    .is_none_or(|t| t.is_empty() || t.eq_ignore_ascii_case("text/css"))
        })
        .collect()
}

/// Connected elements with a `style` attribute, in document order.
#[must_use]
pub fn inline_style_elements(tree: &DomTree) -> Vec<NodeId> {
    tree.elements()
        .filter(|&id| tree.get_attribute(id, "style").is_some())
        .collect()
}
