//! Stylesheet rewriting passes for the Sepia engine.
//!
//! Three passes operate on the stylesheets of a parsed document:
//!
//! - **Grayscale** ([`RecolorPass`]): every recognized color becomes a gray
//!   `#rrggbb`, in `<style>` elements and `style` attributes alike.
//! - **Remove hidden** ([`SynchronizedRemovalPass`]): rules that hide content
//!   are deleted together with the elements they hide.
//! - **Dead code** ([`DeadCodeEliminationPass`]): selectors matching nothing
//!   in the document are dropped.
//!
//! The [`StylesheetRewriter`] feeds a pass every style source of the document
//! and writes the results back. Passes are independent; a [`Pipeline`] runs
//! several in order against the same document.
//!
//! ```
//! use sepia_dom::{DomTree, ElementData, NodeId, NodeType};
//! use sepia_transform::{PassKind, Pipeline, StylesheetRewriter};
//!
//! let mut tree = DomTree::new();
//! let style = tree.alloc(NodeType::Element(ElementData::new("style")));
//! tree.append_child(NodeId::ROOT, style);
//! tree.set_text_content(style, "a { color: red; }");
//!
//! let report = StylesheetRewriter::new(&mut tree).run_pipeline(&Pipeline::new([PassKind::Grayscale]));
//! assert_eq!(tree.text_content(style), "a{color:#4c4c4c}");
//! assert_eq!(report.colors_rewritten, 1);
//! ```

/// Pass selection and parameters.
pub mod config;
/// The rewriting passes.
pub mod passes;
/// Rewrite counters.
pub mod report;
/// Style source discovery and write-back.
pub mod rewriter;

pub use config::{HiddenTarget, PassKind, Pipeline};
pub use passes::{
    DeadCodeEliminationPass, RecolorPass, StylePass, SynchronizedRemovalPass, pass_for,
};
pub use report::RewriteReport;
pub use rewriter::StylesheetRewriter;
