use thiserror::Error;

/// Malformed stylesheet text.
///
/// Offsets are byte offsets into the text handed to the parser.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A `}` with no block to close.
    #[error("unexpected `}}` at offset {offset}")]
    UnexpectedCloseBrace {
        /// Offset of the brace.
        offset: usize,
    },

    /// A `{` whose block runs to the end of the input.
    #[error("block opened at offset {offset} is never closed")]
    UnclosedBlock {
        /// Offset of the opening brace.
        offset: usize,
    },

    /// A function, `(` or `[` that is not closed before its block ends.
    #[error("group opened at offset {offset} is never closed")]
    UnclosedGroup {
        /// Offset of the opening token.
        offset: usize,
    },

    /// A `)` or `]` with nothing to close.
    #[error("unbalanced `{found}` at offset {offset}")]
    UnbalancedGroup {
        /// The stray closing character.
        found: char,
        /// Offset of the stray token.
        offset: usize,
    },

    /// A rule whose selector list is empty or has an empty entry.
    #[error("empty selector at offset {offset}")]
    EmptySelector {
        /// Offset of the rule prelude.
        offset: usize,
    },

    /// A rule prelude that reaches the end of the input without a block.
    #[error("rule at offset {offset} has no block")]
    MissingBlock {
        /// Offset of the rule prelude.
        offset: usize,
    },

    /// Something other than `name: value` inside a declaration block.
    #[error("invalid declaration at offset {offset}: {reason}")]
    InvalidDeclaration {
        /// Offset of the offending token.
        offset: usize,
        /// What was wrong.
        reason: String,
    },

    /// "`<bad-string-token>`": a string broken by a newline.
    #[error("unterminated string at offset {offset}")]
    BadString {
        /// Offset of the string.
        offset: usize,
    },

    /// "`<bad-url-token>`"
    #[error("malformed url() at offset {offset}")]
    BadUrl {
        /// Offset of the url.
        offset: usize,
    },
}

impl ParseError {
    /// Byte offset the error refers to.
    #[must_use]
    pub const fn offset(&self) -> usize {
        match self {
            Self::UnexpectedCloseBrace { offset }
            | Self::UnclosedBlock { offset }
            | Self::UnclosedGroup { offset }
            | Self::UnbalancedGroup { offset, .. }
            | Self::EmptySelector { offset }
            | Self::MissingBlock { offset }
            | Self::InvalidDeclaration { offset, .. }
            | Self::BadString { offset }
            | Self::BadUrl { offset } => *offset,
        }
    }
}
