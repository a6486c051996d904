//! CSS Parser per [§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing).
//!
//! "The input to the parsing stage is a stream of tokens from the tokenization stage."
//!
//! Unlike the error-recovering algorithm of CSS Syntax Level 3, this parser is
//! strict: anything it cannot place in the style tree is reported as a
//! [`ParseError`], so callers can leave such text untouched instead of
//! rewriting a partial reading of it.

use super::ast::{
    AtRule, AtRuleBlock, Declaration, KeyframeBlock, Rule, Selector, StyleRule, Stylesheet,
    Value, is_conditional_group_name, is_declaration_block_name, is_keyframes_name,
};
use super::error::ParseError;
use crate::tokenizer::{CSSToken, CSSTokenizer, SpannedToken};

/// Tokenize and parse a stylesheet.
///
/// # Errors
///
/// Returns a [`ParseError`] for unbalanced braces or groups, rules without a
/// selector or a block, malformed declarations and bad strings or urls.
pub fn parse_stylesheet(source: &str) -> Result<Stylesheet, ParseError> {
    let mut tokenizer = CSSTokenizer::new(source);
    tokenizer.run();
    CSSParser::new(source, tokenizer.into_tokens()).parse_stylesheet()
}

/// CSS parser over a spanned token stream.
pub struct CSSParser<'a> {
    source: &'a str,
    tokens: Vec<SpannedToken>,
    position: usize,
}

impl<'a> CSSParser<'a> {
    /// Create a new parser from the source text and its tokens.
    #[must_use]
    pub const fn new(source: &'a str, tokens: Vec<SpannedToken>) -> Self {
        Self {
            source,
            tokens,
            position: 0,
        }
    }

    /// [§ 5.3.3 Parse a stylesheet](https://www.w3.org/TR/css-syntax-3/#parse-stylesheet)
    ///
    /// # Errors
    ///
    /// See [`parse_stylesheet`].
    pub fn parse_stylesheet(&mut self) -> Result<Stylesheet, ParseError> {
        self.reject_bad_tokens()?;
        // "Consume a list of rules from input, with the top-level flag set."
        let rules = self.consume_list_of_rules(true)?;
        Ok(Stylesheet { rules })
    }

    fn reject_bad_tokens(&self) -> Result<(), ParseError> {
        for spanned in &self.tokens {
            let offset = spanned.span.start;
            match spanned.token {
                CSSToken::BadString => return Err(ParseError::BadString { offset }),
                CSSToken::BadUrl => return Err(ParseError::BadUrl { offset }),
                _ => {}
            }
        }
        Ok(())
    }

    /// [§ 5.4.1 Consume a list of rules](https://www.w3.org/TR/css-syntax-3/#consume-list-of-rules)
    ///
    /// At the top level a `}` is an error. Inside a block, the closing `}` is
    /// consumed and ends the list; running out of input is an error.
    fn consume_list_of_rules(&mut self, top_level: bool) -> Result<Vec<Rule>, ParseError> {
        let block_start = self.previous_offset();
        let mut rules = Vec::new();

        loop {
            match self.peek() {
                // "<whitespace-token>": "Do nothing."
                CSSToken::Whitespace => self.advance(),

                CSSToken::EOF => {
                    if top_level {
                        return Ok(rules);
                    }
                    return Err(ParseError::UnclosedBlock {
                        offset: block_start,
                    });
                }

                CSSToken::RightBrace => {
                    if top_level {
                        return Err(ParseError::UnexpectedCloseBrace {
                            offset: self.offset(),
                        });
                    }
                    self.advance();
                    return Ok(rules);
                }

                // "<CDO-token>" or "<CDC-token>": at the top level, "Do nothing."
                CSSToken::CDO | CSSToken::CDC if top_level => self.advance(),

                // "<at-keyword-token>": "Consume an at-rule"
                CSSToken::AtKeyword(_) => rules.push(Rule::At(self.consume_at_rule()?)),

                // "anything else": "Consume a qualified rule."
                _ => rules.push(Rule::Style(self.consume_qualified_rule()?)),
            }
        }
    }

    /// [§ 5.4.2 Consume an at-rule](https://www.w3.org/TR/css-syntax-3/#consume-at-rule)
    fn consume_at_rule(&mut self) -> Result<AtRule, ParseError> {
        let name = self
            .raw(self.position)
            .trim_start_matches('@')
            .to_string();
        self.advance();

        let prelude_start = self.position;
        self.skip_group_contents(&[CSSToken::Semicolon, CSSToken::LeftBrace, CSSToken::RightBrace])?;
        let prelude = self.collapsed_text(prelude_start, self.position);

        match self.peek() {
            // "<semicolon-token>": "Return the at-rule."
            CSSToken::Semicolon => {
                self.advance();
                Ok(AtRule {
                    name,
                    prelude,
                    block: None,
                })
            }
            // "<{-token>": "Consume a simple block and assign it to the at-rule's block."
            CSSToken::LeftBrace => {
                self.advance();
                let block = self.consume_at_rule_block(&name)?;
                Ok(AtRule {
                    name,
                    prelude,
                    block: Some(block),
                })
            }
            // "<EOF-token>" or the end of the enclosing block: a statement
            // at-rule missing its semicolon.
            _ => Ok(AtRule {
                name,
                prelude,
                block: None,
            }),
        }
    }

    /// Called with the `{` already consumed. Consumes through the matching `}`.
    fn consume_at_rule_block(&mut self, name: &str) -> Result<AtRuleBlock, ParseError> {
        if is_conditional_group_name(name) {
            return Ok(AtRuleBlock::Rules(self.consume_list_of_rules(false)?));
        }
        if is_keyframes_name(name) {
            return Ok(AtRuleBlock::Keyframes(self.consume_keyframe_blocks()?));
        }
        if is_declaration_block_name(name) {
            let start = self.position;
            match self.consume_declaration_block() {
                Ok(declarations) => return Ok(AtRuleBlock::Declarations(declarations)),
                // Nested at-rules such as `@page { @top-left { ... } }` are
                // kept as text.
                Err(_) => self.position = start,
            }
        }
        self.consume_raw_block()
    }

    /// [CSS Animations § 3](https://www.w3.org/TR/css-animations-1/#keyframes)
    fn consume_keyframe_blocks(&mut self) -> Result<Vec<KeyframeBlock>, ParseError> {
        let block_start = self.previous_offset();
        let mut blocks = Vec::new();
        loop {
            match self.peek() {
                CSSToken::Whitespace => self.advance(),
                CSSToken::RightBrace => {
                    self.advance();
                    return Ok(blocks);
                }
                CSSToken::EOF => {
                    return Err(ParseError::UnclosedBlock {
                        offset: block_start,
                    });
                }
                _ => {
                    let start = self.position;
                    let offset = self.offset();
                    self.skip_group_contents(&[CSSToken::LeftBrace, CSSToken::RightBrace])?;
                    if self.peek() != &CSSToken::LeftBrace {
                        return Err(ParseError::MissingBlock { offset });
                    }
                    let selector = self.collapsed_text(start, self.position);
                    self.advance();
                    let declarations = self.consume_declaration_block()?;
                    blocks.push(KeyframeBlock {
                        selector,
                        declarations,
                    });
                }
            }
        }
    }

    /// Called with the `{` already consumed. Keeps the block's contents as
    /// text and consumes through the matching `}`.
    fn consume_raw_block(&mut self) -> Result<AtRuleBlock, ParseError> {
        let block_start = self.previous_offset();
        let start = self.position;
        let mut depth = 0_usize;
        loop {
            match self.peek() {
                CSSToken::LeftBrace => depth += 1,
                CSSToken::RightBrace if depth == 0 => break,
                CSSToken::RightBrace => depth -= 1,
                CSSToken::EOF => {
                    return Err(ParseError::UnclosedBlock {
                        offset: block_start,
                    });
                }
                _ => {}
            }
            self.advance();
        }
        let text = self.joined_text(start, self.position).trim().to_string();
        self.advance();
        Ok(AtRuleBlock::Raw(text))
    }

    /// [§ 5.4.3 Consume a qualified rule](https://www.w3.org/TR/css-syntax-3/#consume-qualified-rule)
    fn consume_qualified_rule(&mut self) -> Result<StyleRule, ParseError> {
        let start = self.position;
        let offset = self.offset();
        self.skip_group_contents(&[CSSToken::LeftBrace, CSSToken::RightBrace])?;

        match self.peek() {
            CSSToken::LeftBrace => {}
            // "<EOF-token>": "This is a parse error. Return nothing."
            CSSToken::EOF => return Err(ParseError::MissingBlock { offset }),
            _ => {
                return Err(ParseError::UnexpectedCloseBrace {
                    offset: self.offset(),
                });
            }
        }

        // [§ 5.1 Selector Lists](https://www.w3.org/TR/selectors-4/#selector-list)
        // "A selector list is a comma-separated list of selectors"
        let selectors = self
            .split_selector_list(start, self.position)
            .ok_or(ParseError::EmptySelector { offset })?;
        self.advance();
        let declarations = self.consume_declaration_block()?;

        Ok(StyleRule {
            selectors,
            declarations,
        })
    }

    /// [§ 5.4.5 Consume a list of declarations](https://www.w3.org/TR/css-syntax-3/#consume-list-of-declarations)
    ///
    /// Called with the `{` already consumed. Consumes through the matching `}`.
    fn consume_declaration_block(&mut self) -> Result<Vec<Declaration>, ParseError> {
        let block_start = self.previous_offset();
        let mut declarations = Vec::new();

        loop {
            match self.peek() {
                // "<whitespace-token>" or "<semicolon-token>": "Do nothing."
                CSSToken::Whitespace | CSSToken::Semicolon => self.advance(),

                CSSToken::RightBrace => {
                    self.advance();
                    return Ok(declarations);
                }

                CSSToken::EOF => {
                    return Err(ParseError::UnclosedBlock {
                        offset: block_start,
                    });
                }

                // "<ident-token>": "Consume a declaration."
                CSSToken::Ident(_) => declarations.push(self.consume_declaration()?),

                // "anything else": "This is a parse error."
                _ => {
                    return Err(ParseError::InvalidDeclaration {
                        offset: self.offset(),
                        reason: format!("expected a property name, found `{}`", self.raw(self.position)),
                    });
                }
            }
        }
    }

    /// [§ 5.4.6 Consume a declaration](https://www.w3.org/TR/css-syntax-3/#consume-declaration)
    ///
    /// Leaves a terminating `}` for the caller.
    fn consume_declaration(&mut self) -> Result<Declaration, ParseError> {
        let name = self.raw(self.position).to_string();
        self.advance();

        // "While the next input token is a <whitespace-token>, consume the next input token."
        self.skip_whitespace();

        // "If the next input token is anything other than a <colon-token>, this is a parse error."
        if self.peek() != &CSSToken::Colon {
            return Err(ParseError::InvalidDeclaration {
                offset: self.offset(),
                reason: format!("expected `:` after `{name}`"),
            });
        }
        self.advance();

        let value_start = self.position;
        self.skip_group_contents(&[CSSToken::Semicolon, CSSToken::RightBrace])?;
        let value_end = self.position;
        if self.peek() == &CSSToken::Semicolon {
            self.advance();
        }

        let (value_start, mut value_end) = self.trim_whitespace(value_start, value_end);
        let important = self.strip_important(value_start, &mut value_end);
        let value_end = self.trim_whitespace(value_start, value_end).1;

        let value = if name.starts_with("--") {
            let text = self.joined_text(value_start, value_end);
            if text.is_empty() {
                Vec::new()
            } else {
                vec![Value::Other(text)]
            }
        } else {
            self.build_values(value_start, value_end)
        };

        Ok(Declaration {
            name,
            value,
            important,
        })
    }

    /// [§ 6.4.2 Important declarations](https://www.w3.org/TR/css-cascade-4/#importance)
    ///
    /// "if the last two (non-whitespace, non-comment) tokens in its value are
    /// a <delim-token> with the value "!" followed by an <ident-token> with
    /// a value that is an ASCII case-insensitive match for "important"."
    fn strip_important(&self, start: usize, end: &mut usize) -> bool {
        if *end <= start {
            return false;
        }
        let is_important = matches!(
            &self.tokens[*end - 1].token,
            CSSToken::Ident(s) if s.eq_ignore_ascii_case("important")
        );
        if !is_important {
            return false;
        }
        let (_, before) = self.trim_whitespace(start, *end - 1);
        if before > start && self.tokens[before - 1].token == CSSToken::Delim('!') {
            *end = before - 1;
            return true;
        }
        false
    }

    /// Turn the tokens in `start..end` into values. Groups are known to be
    /// balanced here.
    fn build_values(&self, start: usize, end: usize) -> Vec<Value> {
        let mut values = Vec::new();
        let mut index = start;
        while index < end {
            let spanned = &self.tokens[index];
            let raw = spanned.raw(self.source);
            match &spanned.token {
                CSSToken::Ident(_) => values.push(Value::Identifier(raw.to_string())),

                // [CSS Color 4 § 5.2](https://www.w3.org/TR/css-color-4/#hex-notation)
                // "a <hash-token> token whose value consists of 3, 4, 6, or 8
                // hexadecimal digits"
                CSSToken::Hash { .. } => match raw.strip_prefix('#') {
                    Some(digits) if is_hex_color_digits(digits) => {
                        values.push(Value::HexColor(digits.to_string()));
                    }
                    _ => push_other(&mut values, raw),
                },

                CSSToken::Function(_) => {
                    let close = self.matching_close(index, end);
                    let name = raw.strip_suffix('(').unwrap_or(raw).to_string();
                    let args = self.build_values(index + 1, close);
                    values.push(Value::FunctionCall { name, args });
                    index = close;
                }

                _ => push_other(&mut values, raw),
            }
            index += 1;
        }
        values
    }

    /// Index of the `)` closing the function token at `open`, or `end` if
    /// there is none before it.
    fn matching_close(&self, open: usize, end: usize) -> usize {
        let mut depth = 0_usize;
        for index in open + 1..end {
            match self.tokens[index].token {
                CSSToken::Function(_) | CSSToken::LeftParen => depth += 1,
                CSSToken::RightParen if depth == 0 => return index,
                CSSToken::RightParen => depth -= 1,
                _ => {}
            }
        }
        end
    }

    /// Advance to the first of `stops` (or EOF) that is not nested in a
    /// function, `(` or `[` group. Group balance is checked along the way.
    fn skip_group_contents(&mut self, stops: &[CSSToken]) -> Result<(), ParseError> {
        let mut open: Vec<(CSSToken, usize)> = Vec::new();
        loop {
            let token = self.peek();
            if open.is_empty() && (token.is_eof() || stops.contains(token)) {
                return Ok(());
            }
            match token {
                CSSToken::Function(_) | CSSToken::LeftParen => {
                    open.push((CSSToken::RightParen, self.offset()));
                }
                CSSToken::LeftBracket => open.push((CSSToken::RightBracket, self.offset())),
                CSSToken::RightParen | CSSToken::RightBracket => match open.last() {
                    Some((expected, _)) if expected == token => {
                        let _ = open.pop();
                    }
                    Some(&(_, offset)) => return Err(ParseError::UnclosedGroup { offset }),
                    None => {
                        let found = if token == &CSSToken::RightParen { ')' } else { ']' };
                        return Err(ParseError::UnbalancedGroup {
                            found,
                            offset: self.offset(),
                        });
                    }
                },
                CSSToken::LeftBrace | CSSToken::RightBrace | CSSToken::EOF => {
                    if let Some(&(_, offset)) = open.last() {
                        return Err(ParseError::UnclosedGroup { offset });
                    }
                    // Only a `{` inside a declaration value gets here.
                    return Err(ParseError::InvalidDeclaration {
                        offset: self.offset(),
                        reason: "unexpected `{` in value".to_string(),
                    });
                }
                _ => {}
            }
            self.advance();
        }
    }

    /// Split the prelude tokens in `start..end` on top-level commas. Returns
    /// `None` if any entry is empty.
    fn split_selector_list(&self, start: usize, end: usize) -> Option<Vec<Selector>> {
        let mut selectors = Vec::new();
        let mut depth = 0_usize;
        let mut entry_start = start;
        for index in start..=end {
            let at_end = index == end;
            if !at_end {
                match self.tokens[index].token {
                    CSSToken::Function(_) | CSSToken::LeftParen | CSSToken::LeftBracket => {
                        depth += 1;
                    }
                    CSSToken::RightParen | CSSToken::RightBracket => {
                        depth = depth.saturating_sub(1);
                    }
                    _ => {}
                }
            }
            let is_separator =
                !at_end && depth == 0 && self.tokens[index].token == CSSToken::Comma;
            if at_end || is_separator {
                let text = self.collapsed_text(entry_start, index);
                if text.is_empty() {
                    return None;
                }
                selectors.push(Selector { text });
                entry_start = index + 1;
            }
        }
        Some(selectors)
    }

    /// Concatenated source text of `start..end` with whitespace runs
    /// collapsed to a single space, trimmed.
    fn collapsed_text(&self, start: usize, end: usize) -> String {
        let mut text = String::new();
        for spanned in &self.tokens[start..end] {
            if spanned.token.is_whitespace() {
                text.push(' ');
            } else {
                text.push_str(spanned.raw(self.source));
            }
        }
        text.trim().to_string()
    }

    /// Concatenated source text of `start..end`, comments dropped.
    fn joined_text(&self, start: usize, end: usize) -> String {
        self.tokens[start..end]
            .iter()
            .map(|spanned| spanned.raw(self.source))
            .collect()
    }

    fn trim_whitespace(&self, mut start: usize, mut end: usize) -> (usize, usize) {
        while start < end && self.tokens[start].token.is_whitespace() {
            start += 1;
        }
        while end > start && self.tokens[end - 1].token.is_whitespace() {
            end -= 1;
        }
        (start, end)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_whitespace() {
            self.advance();
        }
    }

    /// The current token. The stream always ends with EOF, which is never
    /// consumed.
    fn peek(&self) -> &CSSToken {
        self.tokens
            .get(self.position)
            .map_or(&CSSToken::EOF, |spanned| &spanned.token)
    }

    fn advance(&mut self) {
        if self.position < self.tokens.len() && !self.peek().is_eof() {
            self.position += 1;
        }
    }

    /// Offset of the token just consumed, the `{` when called at the start
    /// of a block.
    fn previous_offset(&self) -> usize {
        self.position
            .checked_sub(1)
            .and_then(|index| self.tokens.get(index))
            .map_or(0, |spanned| spanned.span.start)
    }

    fn offset(&self) -> usize {
        self.tokens
            .get(self.position)
            .map_or(self.source.len(), |spanned| spanned.span.start)
    }

    fn raw(&self, index: usize) -> &'a str {
        self.tokens
            .get(index)
            .map_or("", |spanned| spanned.raw(self.source))
    }
}

fn push_other(values: &mut Vec<Value>, raw: &str) {
    if let Some(Value::Other(text)) = values.last_mut() {
        text.push_str(raw);
    } else {
        values.push(Value::Other(raw.to_string()));
    }
}

/// 3, 4, 6 or 8 ASCII hex digits.
#[must_use]
pub fn is_hex_color_digits(digits: &str) -> bool {
    matches!(digits.len(), 3 | 4 | 6 | 8) && digits.bytes().all(|b| b.is_ascii_hexdigit())
}
