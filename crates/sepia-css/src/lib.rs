//! CSS tokenizer, style tree, color model and selector matching for the Sepia engine.
//!
//! # Scope
//!
//! This crate implements:
//! - **CSS Tokenizer** ([§ 4 Tokenization](https://www.w3.org/TR/css-syntax-3/#tokenization))
//!   - All token types, with byte spans into the source
//!   - Comment handling and escape sequences
//!
//! - **Style tree** ([§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing))
//!   - Strict parsing: malformed input is a [`ParseError`], not a recovery
//!   - Style rules, conditional group at-rules, keyframes, declaration at-rules
//!   - Values split into identifiers, hex colors, function calls and verbatim text
//!   - Pre-order walks with in-place removal and replacement ([`walk`])
//!   - Compact serialization ([`generate`])
//!
//! - **Colors** ([CSS Color Level 4](https://www.w3.org/TR/css-color-4/))
//!   - Named colors, hex colors, `rgb()`/`rgba()`/`hsl()`/`hsla()`
//!   - Grayscale projection
//!
//! - **Selectors** ([Selectors Level 4](https://www.w3.org/TR/selectors-4/))
//!   - Type, class, ID, universal and attribute selectors
//!   - Structural pseudo-classes and `:not()`
//!   - All four combinators
//!
//! # Not Implemented
//!
//! - Cascade, computed values and layout
//! - Comment preservation in generated output

/// Color resolution and the grayscale projection.
pub mod color;
/// Serialization of the style tree back to CSS text.
pub mod generate;
/// Stylesheet parsing and the style tree.
pub mod parser;
/// Selector parsing and matching against a document.
pub mod selector;
/// CSS tokenizer.
pub mod tokenizer;
/// Mutable traversal of the style tree.
pub mod walk;

pub use color::{Rgb, grayscale_hex, to_rgb};
pub use generate::{ToCss, generate, generate_declarations};
pub use parser::{
    AtRule, AtRuleBlock, Declaration, KeyframeBlock, NodeKind, ParseError, Rule, Selector,
    StyleRule, Stylesheet, Value, parse_stylesheet,
};
pub use selector::SelectorError;
pub use walk::{Cursor, walk_declarations, walk_rules, walk_values};
