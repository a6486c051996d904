//! HTML parser module for tree construction.

/// Tree builder turning a token stream into a `DomTree`.
pub mod tree_builder;

pub use tree_builder::{HTMLParser, ParseIssue};
