//! HTML tokenizer module.

/// Named character reference table.
pub mod character_reference;
/// HTML token types.
pub mod token;
/// HTML tokenizer state machine.
pub mod tokenizer;

pub use token::{Attribute, Token};
pub use tokenizer::{HTMLTokenizer, TokenizerState};
