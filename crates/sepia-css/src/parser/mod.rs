//! CSS parser module.

/// Style tree node types.
pub mod ast;
/// CSS parser implementation per [§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing).
pub mod css_parser;
/// Parse errors.
pub mod error;

pub use ast::{
    AtRule, AtRuleBlock, Declaration, KeyframeBlock, NodeKind, Rule, Selector, StyleRule,
    Stylesheet, Value,
};
pub use css_parser::{CSSParser, parse_stylesheet};
pub use error::ParseError;
