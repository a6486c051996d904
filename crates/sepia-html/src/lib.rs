//! HTML tokenizer and tree builder for the Sepia stylesheet engine.
//!
//! # Scope
//!
//! This crate implements:
//! - **HTML Tokenizer** ([WHATWG § 13.2.5](https://html.spec.whatwg.org/multipage/parsing.html#tokenization))
//!   - Data, RCDATA, RAWTEXT, and tag states
//!   - DOCTYPE, comment, and character reference handling
//!   - Attribute parsing, first duplicate wins
//!
//! - **Tree builder**
//!   - Follows the markup as written: no implied `html`, `head` or `body`
//!   - Void elements, implied end tags for `p`, `li`, `dt`/`dd`, `option`
//!     and table rows and cells
//!   - Self-closing tags honored inside `svg` and `math`
//!
//! # Not Implemented
//!
//! - Insertion modes, foster parenting and the adoption agency algorithm
//! - Script data states

/// HTML parser and tree construction.
pub mod parser;
/// HTML tokenizer for converting input into tokens.
pub mod tokenizer;

pub use parser::{HTMLParser, ParseIssue};
pub use tokenizer::{Attribute, HTMLTokenizer, Token};

use sepia_dom::DomTree;

/// Tokenize and build a tree in one step.
#[must_use]
pub fn parse_document(html: &str) -> DomTree {
    parse_document_with_issues(html).0
}

/// Like [`parse_document`], also returning the recoverable issues found.
#[must_use]
pub fn parse_document_with_issues(html: &str) -> (DomTree, Vec<ParseIssue>) {
    let mut tokenizer = HTMLTokenizer::new(html);
    tokenizer.run();
    HTMLParser::new(tokenizer.into_tokens()).run_with_issues()
}
