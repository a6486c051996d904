use strum_macros::Display;

use super::token::{Attribute, Token};

/// Elements whose content is tokenized as raw text up to the matching end tag.
///
/// [§ 13.2.6.4.4 The "in head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhead):
/// "A start tag whose tag name is one of: "noframes", "style"
/// Follow the generic raw text element parsing algorithm."
const RAW_TEXT_TAGS: &[&str] = &["style", "script", "xmp", "iframe", "noembed", "noframes"];

/// Elements whose content is raw text in which character references are decoded.
const ESCAPABLE_RAW_TEXT_TAGS: &[&str] = &["title", "textarea"];

/// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
///
/// The subset of tokenizer states this tokenizer needs. Comment, DOCTYPE and
/// raw text content are scanned in one step rather than per character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum TokenizerState {
    /// [§ 13.2.5.1 Data state](https://html.spec.whatwg.org/multipage/parsing.html#data-state)
    Data,
    /// [§ 13.2.5.2 RCDATA state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-state)
    RcData,
    /// [§ 13.2.5.3 RAWTEXT state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-state)
    RawText,
    /// [§ 13.2.5.6 Tag open state](https://html.spec.whatwg.org/multipage/parsing.html#tag-open-state)
    TagOpen,
    /// [§ 13.2.5.7 End tag open state](https://html.spec.whatwg.org/multipage/parsing.html#end-tag-open-state)
    EndTagOpen,
    /// [§ 13.2.5.8 Tag name state](https://html.spec.whatwg.org/multipage/parsing.html#tag-name-state)
    TagName,
    /// [§ 13.2.5.32 Before attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-name-state)
    BeforeAttributeName,
    /// [§ 13.2.5.33 Attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-name-state)
    AttributeName,
    /// [§ 13.2.5.34 After attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#after-attribute-name-state)
    AfterAttributeName,
    /// [§ 13.2.5.35 Before attribute value state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-value-state)
    BeforeAttributeValue,
    /// [§ 13.2.5.36 Attribute value (double-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(double-quoted)-state)
    AttributeValueDoubleQuoted,
    /// [§ 13.2.5.37 Attribute value (single-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(single-quoted)-state)
    AttributeValueSingleQuoted,
    /// [§ 13.2.5.38 Attribute value (unquoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(unquoted)-state)
    AttributeValueUnquoted,
    /// [§ 13.2.5.39 After attribute value (quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#after-attribute-value-(quoted)-state)
    AfterAttributeValueQuoted,
    /// [§ 13.2.5.40 Self-closing start tag state](https://html.spec.whatwg.org/multipage/parsing.html#self-closing-start-tag-state)
    SelfClosingStartTag,
}

/// Tag under construction.
#[derive(Debug)]
struct TagBuilder {
    name: String,
    is_end: bool,
    self_closing: bool,
    attributes: Vec<Attribute>,
    current_attribute: Option<Attribute>,
}

impl TagBuilder {
    const fn new(is_end: bool) -> Self {
        Self {
            name: String::new(),
            is_end,
            self_closing: false,
            attributes: Vec::new(),
            current_attribute: None,
        }
    }

    /// [§ 13.2.5.33 Attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-name-state)
    ///
    /// "if there is already an attribute on the token with the exact same
    /// name, then this is a duplicate-attribute parse error and the new
    /// attribute must be removed from the token."
    fn finish_attribute(&mut self) {
        if let Some(attr) = self.current_attribute.take()
            && !self.attributes.iter().any(|a| a.name == attr.name)
        {
            self.attributes.push(attr);
        }
    }

    fn start_attribute(&mut self) {
        self.finish_attribute();
        self.current_attribute = Some(Attribute::new(String::new(), String::new()));
    }

    fn push_attribute_name(&mut self, c: char) {
        if let Some(attr) = self.current_attribute.as_mut() {
            attr.name.push(c.to_ascii_lowercase());
        }
    }

    fn push_attribute_value(&mut self, text: &str) {
        if let Some(attr) = self.current_attribute.as_mut() {
            attr.value.push_str(text);
        }
    }

    fn into_token(mut self) -> Token {
        self.finish_attribute();
        if self.is_end {
            Token::EndTag { name: self.name }
        } else {
            Token::StartTag {
                name: self.name,
                self_closing: self.self_closing,
                attributes: self.attributes,
            }
        }
    }
}

/// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
///
/// "Implementations must act as if they used the following state machine to tokenize HTML."
pub struct HTMLTokenizer {
    state: TokenizerState,
    input: Vec<char>,
    position: usize,
    current_tag: Option<TagBuilder>,
    /// "The last start tag token emitted" decides where RAWTEXT/RCDATA content ends.
    last_start_tag_name: Option<String>,
    token_stream: Vec<Token>,
}

impl HTMLTokenizer {
    /// Create a new tokenizer for the given input.
    ///
    /// "The initial state is the data state."
    #[must_use]
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            state: TokenizerState::Data,
            input: input.into().chars().collect(),
            position: 0,
            current_tag: None,
            last_start_tag_name: None,
            token_stream: Vec::new(),
        }
    }

    /// Consume the tokenizer and return the token stream.
    /// Call this after `run()` to get the tokens for the parser.
    #[must_use]
    pub fn into_tokens(self) -> Vec<Token> {
        self.token_stream
    }

    /// Run the tokenizer to completion.
    pub fn run(&mut self) {
        loop {
            match self.state {
                TokenizerState::RawText => self.consume_raw_text(false),
                TokenizerState::RcData => self.consume_raw_text(true),
                _ => {
                    let Some(c) = self.consume() else { break };
                    self.step(c);
                }
            }
        }
        self.finish();
    }

    fn step(&mut self, c: char) {
        match self.state {
            TokenizerState::Data => match c {
                '&' => {
                    let text = self.consume_character_reference(false);
                    self.emit_text(&text);
                }
                '<' => self.switch_to(TokenizerState::TagOpen),
                c => self.emit_character(c),
            },

            // Handled in `run`.
            TokenizerState::RawText | TokenizerState::RcData => self.emit_character(c),

            // [§ 13.2.5.6 Tag open state]
            TokenizerState::TagOpen => match c {
                // "U+0021 EXCLAMATION MARK (!) - Switch to the markup declaration open state."
                '!' => self.consume_markup_declaration(),
                '/' => self.switch_to(TokenizerState::EndTagOpen),
                c if c.is_ascii_alphabetic() => {
                    self.current_tag = Some(TagBuilder::new(false));
                    self.reconsume_in(TokenizerState::TagName);
                }
                // "U+003F QUESTION MARK (?) - This is an
                // unexpected-question-mark-instead-of-tag-name parse error.
                // Create a comment token whose data is the empty string.
                // Reconsume in the bogus comment state."
                '?' => {
                    self.reconsume();
                    self.consume_bogus_comment();
                }
                // "Anything else - Emit a U+003C LESS-THAN SIGN character token.
                // Reconsume in the data state."
                _ => {
                    self.emit_character('<');
                    self.reconsume_in(TokenizerState::Data);
                }
            },

            // [§ 13.2.5.7 End tag open state]
            TokenizerState::EndTagOpen => match c {
                c if c.is_ascii_alphabetic() => {
                    self.current_tag = Some(TagBuilder::new(true));
                    self.reconsume_in(TokenizerState::TagName);
                }
                // "This is a missing-end-tag-name parse error. Switch to the data state."
                '>' => self.switch_to(TokenizerState::Data),
                _ => {
                    self.reconsume();
                    self.consume_bogus_comment();
                }
            },

            // [§ 13.2.5.8 Tag name state]
            TokenizerState::TagName => match c {
                c if is_whitespace(c) => self.switch_to(TokenizerState::BeforeAttributeName),
                '/' => self.switch_to(TokenizerState::SelfClosingStartTag),
                '>' => self.emit_current_tag(),
                c => {
                    if let Some(tag) = self.current_tag.as_mut() {
                        tag.name.push(c.to_ascii_lowercase());
                    }
                }
            },

            // [§ 13.2.5.32 Before attribute name state]
            TokenizerState::BeforeAttributeName => match c {
                c if is_whitespace(c) => {}
                '/' | '>' => self.reconsume_in(TokenizerState::AfterAttributeName),
                _ => {
                    if let Some(tag) = self.current_tag.as_mut() {
                        tag.start_attribute();
                    }
                    self.reconsume_in(TokenizerState::AttributeName);
                }
            },

            // [§ 13.2.5.33 Attribute name state]
            TokenizerState::AttributeName => match c {
                c if is_whitespace(c) => self.switch_to(TokenizerState::AfterAttributeName),
                '/' | '>' => self.reconsume_in(TokenizerState::AfterAttributeName),
                '=' => self.switch_to(TokenizerState::BeforeAttributeValue),
                c => {
                    if let Some(tag) = self.current_tag.as_mut() {
                        tag.push_attribute_name(c);
                    }
                }
            },

            // [§ 13.2.5.34 After attribute name state]
            TokenizerState::AfterAttributeName => match c {
                c if is_whitespace(c) => {}
                '/' => self.switch_to(TokenizerState::SelfClosingStartTag),
                '=' => self.switch_to(TokenizerState::BeforeAttributeValue),
                '>' => self.emit_current_tag(),
                _ => {
                    if let Some(tag) = self.current_tag.as_mut() {
                        tag.start_attribute();
                    }
                    self.reconsume_in(TokenizerState::AttributeName);
                }
            },

            // [§ 13.2.5.35 Before attribute value state]
            TokenizerState::BeforeAttributeValue => match c {
                c if is_whitespace(c) => {}
                '"' => self.switch_to(TokenizerState::AttributeValueDoubleQuoted),
                '\'' => self.switch_to(TokenizerState::AttributeValueSingleQuoted),
                // "This is a missing-attribute-value parse error. Switch to the
                // data state. Emit the current tag token."
                '>' => self.emit_current_tag(),
                _ => self.reconsume_in(TokenizerState::AttributeValueUnquoted),
            },

            TokenizerState::AttributeValueDoubleQuoted => {
                self.attribute_value_quoted(c, '"');
            }
            TokenizerState::AttributeValueSingleQuoted => {
                self.attribute_value_quoted(c, '\'');
            }

            // [§ 13.2.5.38 Attribute value (unquoted) state]
            TokenizerState::AttributeValueUnquoted => match c {
                c if is_whitespace(c) => self.switch_to(TokenizerState::BeforeAttributeName),
                '&' => {
                    let text = self.consume_character_reference(true);
                    self.push_attribute_value(&text);
                }
                '>' => self.emit_current_tag(),
                c => self.push_attribute_value(c.encode_utf8(&mut [0; 4])),
            },

            // [§ 13.2.5.39 After attribute value (quoted) state]
            TokenizerState::AfterAttributeValueQuoted => match c {
                c if is_whitespace(c) => self.switch_to(TokenizerState::BeforeAttributeName),
                '/' => self.switch_to(TokenizerState::SelfClosingStartTag),
                '>' => self.emit_current_tag(),
                // "This is a missing-whitespace-between-attributes parse error.
                // Reconsume in the before attribute name state."
                _ => self.reconsume_in(TokenizerState::BeforeAttributeName),
            },

            // [§ 13.2.5.40 Self-closing start tag state]
            TokenizerState::SelfClosingStartTag => match c {
                // "Set the self-closing flag of the current tag token. Switch to
                // the data state. Emit the current tag token."
                '>' => {
                    if let Some(tag) = self.current_tag.as_mut() {
                        tag.self_closing = true;
                    }
                    self.emit_current_tag();
                }
                _ => self.reconsume_in(TokenizerState::BeforeAttributeName),
            },
        }
    }

    /// [§ 13.2.5.36 Attribute value (double-quoted) state] and
    /// [§ 13.2.5.37 Attribute value (single-quoted) state]
    fn attribute_value_quoted(&mut self, c: char, quote: char) {
        match c {
            c if c == quote => self.switch_to(TokenizerState::AfterAttributeValueQuoted),
            '&' => {
                let text = self.consume_character_reference(true);
                self.push_attribute_value(&text);
            }
            c => self.push_attribute_value(c.encode_utf8(&mut [0; 4])),
        }
    }

    /// [§ 13.2.5.2 RCDATA state] / [§ 13.2.5.3 RAWTEXT state]
    ///
    /// Consume everything up to "an appropriate end tag token" for the last
    /// start tag, then hand the end tag back to the data state.
    fn consume_raw_text(&mut self, decode_references: bool) {
        let end_tag: Vec<char> = self
            .last_start_tag_name
            .as_deref()
            .unwrap_or_default()
            .chars()
            .collect();

        while self.position < self.input.len() {
            if self.at_appropriate_end_tag(&end_tag) {
                break;
            }
            let Some(c) = self.consume() else { break };
            if decode_references && c == '&' {
                let text = self.consume_character_reference(false);
                self.emit_text(&text);
            } else {
                self.emit_character(c);
            }
        }
        self.switch_to(TokenizerState::Data);
    }

    /// [§ 13.2.5.11 RCDATA end tag name state]
    ///
    /// "If the current end tag token is an appropriate end tag token" and is
    /// followed by whitespace, `/` or `>`.
    fn at_appropriate_end_tag(&self, name: &[char]) -> bool {
        if self.peek() != Some('<') || self.peek_at(1) != Some('/') {
            return false;
        }
        let matches_name = name
            .iter()
            .enumerate()
            .all(|(i, &n)| self.peek_at(2 + i).is_some_and(|c| c.eq_ignore_ascii_case(&n)));
        matches_name
            && self
                .peek_at(2 + name.len())
                .is_none_or(|c| is_whitespace(c) || c == '/' || c == '>')
    }

    /// [§ 13.2.5.42 Markup declaration open state](https://html.spec.whatwg.org/multipage/parsing.html#markup-declaration-open-state)
    fn consume_markup_declaration(&mut self) {
        // "If the next two characters are both U+002D HYPHEN-MINUS characters (-),
        // consume those two characters, create a comment token whose data is the
        // empty string, and switch to the comment start state."
        if self.peek() == Some('-') && self.peek_at(1) == Some('-') {
            self.advance(2);
            self.consume_comment();
            return;
        }

        // "Otherwise, if the next seven characters are an ASCII case-insensitive
        // match for the word "DOCTYPE", consume those characters and switch to
        // the DOCTYPE state."
        let doctype: String = self.remaining().take(7).collect();
        if doctype.eq_ignore_ascii_case("doctype") {
            self.advance(7);
            self.consume_doctype();
            return;
        }

        // "Otherwise, this is an incorrectly-opened-comment parse error."
        self.consume_bogus_comment();
    }

    /// [§ 13.2.5.45 Comment state](https://html.spec.whatwg.org/multipage/parsing.html#comment-state)
    fn consume_comment(&mut self) {
        let mut data = String::new();
        loop {
            if self.peek() == Some('-') && self.peek_at(1) == Some('-') && self.peek_at(2) == Some('>')
            {
                self.advance(3);
                break;
            }
            match self.consume() {
                Some(c) => data.push(c),
                // "eof-in-comment parse error. Emit the comment token."
                None => break,
            }
        }
        self.emit(Token::Comment { data });
        self.switch_to(TokenizerState::Data);
    }

    /// [§ 13.2.5.41 Bogus comment state](https://html.spec.whatwg.org/multipage/parsing.html#bogus-comment-state)
    fn consume_bogus_comment(&mut self) {
        let mut data = String::new();
        while let Some(c) = self.consume() {
            if c == '>' {
                break;
            }
            data.push(c);
        }
        self.emit(Token::Comment { data });
        self.switch_to(TokenizerState::Data);
    }

    /// [§ 13.2.5.53 DOCTYPE state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-state)
    ///
    /// Only the name is kept; public and system identifiers are skipped.
    fn consume_doctype(&mut self) {
        let mut body = String::new();
        while let Some(c) = self.consume() {
            if c == '>' {
                break;
            }
            body.push(c);
        }
        let name = body.split_whitespace().next().map(str::to_string);
        self.emit(Token::Doctype { name });
        self.switch_to(TokenizerState::Data);
    }

    fn emit_current_tag(&mut self) {
        self.switch_to(TokenizerState::Data);
        let Some(tag) = self.current_tag.take() else {
            return;
        };
        let token = tag.into_token();
        if let Token::StartTag { name, .. } = &token {
            if RAW_TEXT_TAGS.contains(&name.as_str()) {
                self.switch_to(TokenizerState::RawText);
            } else if ESCAPABLE_RAW_TEXT_TAGS.contains(&name.as_str()) {
                self.switch_to(TokenizerState::RcData);
            }
            self.last_start_tag_name = Some(name.clone());
        }
        self.emit(token);
    }

    /// Flush any pending state and emit the end-of-file token.
    fn finish(&mut self) {
        // "eof-in-tag parse error. Emit an end-of-file token." The unfinished
        // tag itself is dropped.
        self.current_tag = None;
        if self.state == TokenizerState::TagOpen {
            self.emit_character('<');
        } else if self.state == TokenizerState::EndTagOpen {
            self.emit_text("</");
        }
        self.emit(Token::EndOfFile);
    }

    fn push_attribute_value(&mut self, text: &str) {
        if let Some(tag) = self.current_tag.as_mut() {
            tag.push_attribute_value(text);
        }
    }

    fn emit(&mut self, token: Token) {
        self.token_stream.push(token);
    }

    fn emit_character(&mut self, data: char) {
        self.emit(Token::Character { data });
    }

    fn emit_text(&mut self, text: &str) {
        for data in text.chars() {
            self.emit_character(data);
        }
    }

    const fn switch_to(&mut self, state: TokenizerState) {
        self.state = state;
    }

    /// "Reconsume in the X state": step back one character and switch.
    const fn reconsume_in(&mut self, state: TokenizerState) {
        self.reconsume();
        self.state = state;
    }

    const fn reconsume(&mut self) {
        self.position = self.position.saturating_sub(1);
    }

    /// Consume and return the next character.
    fn consume(&mut self) -> Option<char> {
        let c = self.input.get(self.position).copied()?;
        self.position += 1;
        Some(c)
    }

    pub(super) fn advance(&mut self, count: usize) {
        self.position = (self.position + count).min(self.input.len());
    }

    pub(super) fn peek(&self) -> Option<char> {
        self.peek_at(0)
    }

    pub(super) fn peek_at(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    pub(super) fn remaining(&self) -> impl Iterator<Item = char> + '_ {
        self.input[self.position..].iter().copied()
    }
}

/// "ASCII whitespace is U+0009 TAB, U+000A LF, U+000C FF, U+000D CR, or U+0020 SPACE."
const fn is_whitespace(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\x0C' | '\r' | ' ')
}
