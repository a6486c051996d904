use super::token::{CSSToken, HashType, NumericType, SpannedToken};

/// [§ 4.3 Tokenizer Algorithms](https://www.w3.org/TR/css-syntax-3/#tokenizer-algorithms)
///
/// CSS tokenizer following the CSS Syntax Module Level 3 specification.
pub struct CSSTokenizer {
    /// The input string being tokenized
    input: Vec<char>,
    /// Byte offset of each input code point, plus one entry for the end.
    offsets: Vec<usize>,
    /// Current position in the input, in code points
    position: usize,
    /// Collected tokens
    tokens: Vec<SpannedToken>,
}

impl CSSTokenizer {
    /// Create a new CSS tokenizer with the given input.
    #[must_use]
    pub fn new(input: impl AsRef<str>) -> Self {
        let input = input.as_ref();
        let mut offsets: Vec<usize> = input.char_indices().map(|(i, _)| i).collect();
        offsets.push(input.len());
        Self {
            input: input.chars().collect(),
            offsets,
            position: 0,
            tokens: Vec::new(),
        }
    }

    /// [§ 4.3.1 Consume a token](https://www.w3.org/TR/css-syntax-3/#consume-token)
    ///
    /// "This section describes how to consume a token from a stream of code points.
    /// It will return a single token of any type."
    pub fn run(&mut self) {
        loop {
            // "Consume comments."
            if self.consume_comments() && self.comment_separates() {
                let at = self.byte_offset();
                self.tokens.push(SpannedToken {
                    token: CSSToken::Whitespace,
                    span: at..at,
                });
            }
            let start = self.byte_offset();
            let token = self.consume_token();
            let span = start..self.byte_offset();
            let is_eof = token.is_eof();
            self.tokens.push(SpannedToken { token, span });
            if is_eof {
                break;
            }
        }
    }

    /// Return the collected tokens.
    #[must_use]
    pub fn into_tokens(self) -> Vec<SpannedToken> {
        self.tokens
    }

    /// Return a reference to the collected tokens.
    #[must_use]
    pub fn tokens(&self) -> &[SpannedToken] {
        &self.tokens
    }

    /// [§ 4.3.1 Consume a token](https://www.w3.org/TR/css-syntax-3/#consume-token)
    fn consume_token(&mut self) -> CSSToken {
        // "Consume the next input code point."
        let Some(c) = self.consume() else {
            return CSSToken::EOF;
        };

        match c {
            // "whitespace"
            // "Consume as much whitespace as possible. Return a <whitespace-token>."
            c if is_whitespace(c) => {
                self.consume_whitespace();
                CSSToken::Whitespace
            }

            // "U+0022 QUOTATION MARK (")"
            // "Consume a string token and return it."
            '"' => self.consume_string_token('"'),

            // "U+0023 NUMBER SIGN (#)"
            '#' => {
                // "If the next input code point is an ident code point or the next
                // two input code points are a valid escape..."
                if self.peek().is_some_and(is_ident_code_point)
                    || is_valid_escape(self.peek(), self.peek_at(1))
                {
                    // "If the next 3 input code points would start an ident sequence,
                    // set the <hash-token>'s type flag to 'id'."
                    let hash_type = if self.would_start_ident_sequence() {
                        HashType::Id
                    } else {
                        HashType::Unrestricted
                    };
                    let value = self.consume_ident_sequence();
                    CSSToken::Hash { value, hash_type }
                } else {
                    CSSToken::Delim('#')
                }
            }

            // "U+0027 APOSTROPHE (')"
            '\'' => self.consume_string_token('\''),

            '(' => CSSToken::LeftParen,
            ')' => CSSToken::RightParen,

            // "U+002B PLUS SIGN (+)"
            '+' => {
                if self.would_start_number_with(Some('+')) {
                    self.reconsume();
                    self.consume_numeric_token()
                } else {
                    CSSToken::Delim('+')
                }
            }

            ',' => CSSToken::Comma,

            // "U+002D HYPHEN-MINUS (-)"
            '-' => {
                if self.would_start_number_with(Some('-')) {
                    self.reconsume();
                    self.consume_numeric_token()
                }
                // "Otherwise, if the next 2 input code points are U+002D U+003E (->)..."
                else if self.peek() == Some('-') && self.peek_at(1) == Some('>') {
                    self.advance(2);
                    CSSToken::CDC
                }
                // "Otherwise, if the input stream starts with an ident sequence..."
                else if self.would_start_ident_sequence_after_hyphen() {
                    self.reconsume();
                    self.consume_ident_like_token()
                } else {
                    CSSToken::Delim('-')
                }
            }

            // "U+002E FULL STOP (.)"
            '.' => {
                if self.would_start_number_with(Some('.')) {
                    self.reconsume();
                    self.consume_numeric_token()
                } else {
                    CSSToken::Delim('.')
                }
            }

            ':' => CSSToken::Colon,
            ';' => CSSToken::Semicolon,

            // "U+003C LESS-THAN SIGN (<)"
            '<' => {
                // "If the next 3 input code points are U+0021 U+002D U+002D (!--)..."
                if self.peek() == Some('!')
                    && self.peek_at(1) == Some('-')
                    && self.peek_at(2) == Some('-')
                {
                    self.advance(3);
                    CSSToken::CDO
                } else {
                    CSSToken::Delim('<')
                }
            }

            // "U+0040 COMMERCIAL AT (@)"
            '@' => {
                if self.would_start_ident_sequence() {
                    let value = self.consume_ident_sequence();
                    CSSToken::AtKeyword(value)
                } else {
                    CSSToken::Delim('@')
                }
            }

            '[' => CSSToken::LeftBracket,

            // "U+005C REVERSE SOLIDUS (\)"
            '\\' => {
                if is_valid_escape(Some('\\'), self.peek()) {
                    self.reconsume();
                    self.consume_ident_like_token()
                } else {
                    // "This is a parse error."
                    CSSToken::Delim('\\')
                }
            }

            ']' => CSSToken::RightBracket,
            '{' => CSSToken::LeftBrace,
            '}' => CSSToken::RightBrace,

            // "digit"
            c if c.is_ascii_digit() => {
                self.reconsume();
                self.consume_numeric_token()
            }

            // "ident-start code point"
            c if is_ident_start_code_point(c) => {
                self.reconsume();
                self.consume_ident_like_token()
            }

            // "anything else"
            c => CSSToken::Delim(c),
        }
    }

    /// [§ 4.3.2 Consume comments](https://www.w3.org/TR/css-syntax-3/#consume-comment)
    ///
    /// "If the next two input code points are U+002F SOLIDUS (/) followed by
    /// U+002A ASTERISK (*), consume them and all following code points up to
    /// and including the first U+002A ASTERISK (*) followed by U+002F SOLIDUS (/),
    /// or up to an EOF code point."
    ///
    /// Returns whether any comment was consumed.
    fn consume_comments(&mut self) -> bool {
        let mut consumed = false;
        while self.peek() == Some('/') && self.peek_at(1) == Some('*') {
            consumed = true;
            self.advance(2);
            loop {
                match self.consume() {
                    Some('*') if self.peek() == Some('/') => {
                        self.advance(1);
                        break;
                    }
                    Some(_) => {}
                    None => break,
                }
            }
        }
        consumed
    }

    /// Whether the comment just consumed keeps the previous token apart from
    /// the next one: written side by side they would read as a single token,
    /// as in `12px/**/Arial` or `1px/**/2px`.
    fn comment_separates(&self) -> bool {
        let word_before = self.tokens.last().is_some_and(|last| {
            matches!(
                last.token,
                CSSToken::Ident(_)
                    | CSSToken::AtKeyword(_)
                    | CSSToken::Hash { .. }
                    | CSSToken::Number { .. }
                    | CSSToken::Percentage { .. }
                    | CSSToken::Dimension { .. }
            )
        });
        let is_digit = |c: Option<char>| c.is_some_and(|c| c.is_ascii_digit());
        word_before
            && match self.peek() {
                Some('.' | '+') => {
                    is_digit(self.peek_at(1))
                        || (self.peek_at(1) == Some('.') && is_digit(self.peek_at(2)))
                }
                Some(c) => is_ident_code_point(c) || matches!(c, '\\' | '(' | '%'),
                None => false,
            }
    }

    fn consume_whitespace(&mut self) {
        while self.peek().is_some_and(is_whitespace) {
            self.advance(1);
        }
    }

    /// [§ 4.3.4 Consume a string token](https://www.w3.org/TR/css-syntax-3/#consume-string-token)
    fn consume_string_token(&mut self, ending_code_point: char) -> CSSToken {
        let mut value = String::new();

        loop {
            match self.consume() {
                // "ending code point" / "EOF"
                Some(c) if c == ending_code_point => return CSSToken::String(value),
                None => return CSSToken::String(value),

                // "newline"
                // "This is a parse error. Reconsume the current input code point,
                // create a <bad-string-token>, and return it."
                Some('\n') => {
                    self.reconsume();
                    return CSSToken::BadString;
                }

                // "U+005C REVERSE SOLIDUS (\)"
                Some('\\') => match self.peek() {
                    None => {}
                    Some('\n') => self.advance(1),
                    Some(_) => value.push(self.consume_escaped_code_point()),
                },

                Some(c) => value.push(c),
            }
        }
    }

    /// [§ 4.3.5 Consume a numeric token](https://www.w3.org/TR/css-syntax-3/#consume-numeric-token)
    fn consume_numeric_token(&mut self) -> CSSToken {
        let (value, numeric_type) = self.consume_number();

        if self.would_start_ident_sequence() {
            let unit = self.consume_ident_sequence();
            CSSToken::Dimension { value, unit }
        } else if self.peek() == Some('%') {
            self.advance(1);
            CSSToken::Percentage { value }
        } else {
            CSSToken::Number {
                value,
                numeric_type,
            }
        }
    }

    /// [§ 4.3.6 Consume an ident-like token](https://www.w3.org/TR/css-syntax-3/#consume-ident-like-token)
    fn consume_ident_like_token(&mut self) -> CSSToken {
        let string = self.consume_ident_sequence();

        // "If string's value is an ASCII case-insensitive match for 'url',
        // and the next input code point is U+0028 LEFT PARENTHESIS (()"
        if string.eq_ignore_ascii_case("url") && self.peek() == Some('(') {
            self.advance(1);
            // "While the next two input code points are whitespace, consume the
            // next input code point."
            let mut lookahead = 0;
            while self.peek_at(lookahead).is_some_and(is_whitespace) {
                lookahead += 1;
            }
            if matches!(self.peek_at(lookahead), Some('"' | '\'')) {
                // "return a <function-token> with its value set to string"
                CSSToken::Function(string)
            } else {
                self.consume_url_token()
            }
        } else if self.peek() == Some('(') {
            self.advance(1);
            CSSToken::Function(string)
        } else {
            CSSToken::Ident(string)
        }
    }

    /// [§ 4.3.7 Consume a url token](https://www.w3.org/TR/css-syntax-3/#consume-url-token)
    fn consume_url_token(&mut self) -> CSSToken {
        let mut value = String::new();
        self.consume_whitespace();

        loop {
            match self.consume() {
                Some(')') | None => return CSSToken::Url(value),

                Some(c) if is_whitespace(c) => {
                    self.consume_whitespace();
                    return match self.peek() {
                        Some(')') => {
                            self.advance(1);
                            CSSToken::Url(value)
                        }
                        None => CSSToken::Url(value),
                        _ => {
                            self.consume_bad_url_remnants();
                            CSSToken::BadUrl
                        }
                    };
                }

                // "U+0022 QUOTATION MARK ("), U+0027 APOSTROPHE ('), U+0028 LEFT PARENTHESIS (()"
                // "This is a parse error. Consume the remnants of a bad url, create a
                // <bad-url-token>, and return it."
                Some('"' | '\'' | '(') => {
                    self.consume_bad_url_remnants();
                    return CSSToken::BadUrl;
                }

                Some('\\') => {
                    if is_valid_escape(Some('\\'), self.peek()) {
                        value.push(self.consume_escaped_code_point());
                    } else {
                        self.consume_bad_url_remnants();
                        return CSSToken::BadUrl;
                    }
                }

                Some(c) => value.push(c),
            }
        }
    }

    /// [§ 4.3.14 Consume the remnants of a bad url](https://www.w3.org/TR/css-syntax-3/#consume-remnants-of-bad-url)
    fn consume_bad_url_remnants(&mut self) {
        loop {
            match self.consume() {
                Some(')') | None => return,
                Some('\\') if is_valid_escape(Some('\\'), self.peek()) => {
                    let _ = self.consume_escaped_code_point();
                }
                Some(_) => {}
            }
        }
    }

    /// [§ 4.3.11 Consume an ident sequence](https://www.w3.org/TR/css-syntax-3/#consume-name)
    fn consume_ident_sequence(&mut self) -> String {
        let mut result = String::new();

        loop {
            match self.consume() {
                Some(c) if is_ident_code_point(c) => result.push(c),
                Some('\\') if is_valid_escape(Some('\\'), self.peek()) => {
                    result.push(self.consume_escaped_code_point());
                }
                Some(_) => {
                    self.reconsume();
                    return result;
                }
                None => return result,
            }
        }
    }

    /// [§ 4.3.12 Consume a number](https://www.w3.org/TR/css-syntax-3/#consume-number)
    fn consume_number(&mut self) -> (f64, NumericType) {
        // "Initially set type to 'integer'. Let repr be the empty string."
        let mut numeric_type = NumericType::Integer;
        let mut repr = String::new();

        if matches!(self.peek(), Some('+' | '-')) {
            self.consume_into(&mut repr);
        }
        self.consume_digits_into(&mut repr);

        // "If the next 2 input code points are U+002E FULL STOP (.) followed by a digit..."
        if self.peek() == Some('.') && self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) {
            self.consume_into(&mut repr);
            numeric_type = NumericType::Number;
            self.consume_digits_into(&mut repr);
        }

        // "If the next 2 or 3 input code points are U+0045 (E) or U+0065 (e),
        // optionally followed by U+002D (-) or U+002B (+), followed by a digit..."
        if matches!(self.peek(), Some('e' | 'E')) {
            let has_sign = matches!(self.peek_at(1), Some('+' | '-'));
            let digit_pos = if has_sign { 2 } else { 1 };
            if self.peek_at(digit_pos).is_some_and(|c| c.is_ascii_digit()) {
                self.consume_into(&mut repr);
                if has_sign {
                    self.consume_into(&mut repr);
                }
                numeric_type = NumericType::Number;
                self.consume_digits_into(&mut repr);
            }
        }

        // "Convert repr to a number, and set the value to the returned value."
        (repr.parse().unwrap_or(0.0), numeric_type)
    }

    fn consume_into(&mut self, repr: &mut String) {
        if let Some(c) = self.consume() {
            repr.push(c);
        }
    }

    fn consume_digits_into(&mut self, repr: &mut String) {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.consume_into(repr);
        }
    }

    /// [§ 4.3.13 Consume an escaped code point](https://www.w3.org/TR/css-syntax-3/#consume-escaped-code-point)
    fn consume_escaped_code_point(&mut self) -> char {
        match self.consume() {
            Some(c) if c.is_ascii_hexdigit() => {
                let mut hex = c.to_string();
                // "Consume as many hex digits as possible, but no more than 5."
                while hex.len() < 6 && self.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
                    self.consume_into(&mut hex);
                }
                // "If the next input code point is whitespace, consume it."
                if self.peek().is_some_and(is_whitespace) {
                    self.advance(1);
                }
                // "If this number is zero, or is for a surrogate, or is greater than the
                // maximum allowed code point, return U+FFFD REPLACEMENT CHARACTER."
                u32::from_str_radix(&hex, 16)
                    .ok()
                    .filter(|&code| code != 0)
                    .and_then(char::from_u32)
                    .unwrap_or('\u{FFFD}')
            }
            // "EOF": "This is a parse error. Return U+FFFD REPLACEMENT CHARACTER."
            None => '\u{FFFD}',
            Some(c) => c,
        }
    }

    /// [§ 4.3.9 Check if three code points would start an ident sequence](https://www.w3.org/TR/css-syntax-3/#would-start-an-identifier)
    fn would_start_ident_sequence(&self) -> bool {
        match self.peek() {
            // "U+002D HYPHEN-MINUS"
            Some('-') => {
                let second = self.peek_at(1);
                second.is_some_and(|c| is_ident_start_code_point(c) || c == '-')
                    || is_valid_escape(second, self.peek_at(2))
            }
            Some(c) if is_ident_start_code_point(c) => true,
            Some('\\') => is_valid_escape(Some('\\'), self.peek_at(1)),
            _ => false,
        }
    }

    /// Same check as [`Self::would_start_ident_sequence`] when the leading
    /// `-` has already been consumed.
    fn would_start_ident_sequence_after_hyphen(&self) -> bool {
        let second = self.peek();
        second.is_some_and(|c| is_ident_start_code_point(c) || c == '-')
            || is_valid_escape(second, self.peek_at(1))
    }

    /// [§ 4.3.10 Check if three code points would start a number](https://www.w3.org/TR/css-syntax-3/#starts-with-a-number)
    ///
    /// `first` is the code point that was just consumed.
    fn would_start_number_with(&self, first: Option<char>) -> bool {
        let second = self.peek();
        let is_digit = |c: Option<char>| c.is_some_and(|c| c.is_ascii_digit());
        match first {
            Some('+' | '-') => {
                is_digit(second) || (second == Some('.') && is_digit(self.peek_at(1)))
            }
            Some('.') => is_digit(second),
            Some(c) => c.is_ascii_digit(),
            None => false,
        }
    }

    fn byte_offset(&self) -> usize {
        self.offsets.get(self.position).copied().unwrap_or_default()
    }

    /// Consume and return the next character.
    fn consume(&mut self) -> Option<char> {
        let c = self.input.get(self.position).copied()?;
        self.position += 1;
        Some(c)
    }

    fn advance(&mut self, count: usize) {
        self.position = (self.position + count).min(self.input.len());
    }

    /// Put back the last consumed character.
    const fn reconsume(&mut self) {
        self.position = self.position.saturating_sub(1);
    }

    fn peek(&self) -> Option<char> {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }
}

/// [§ 4.3.8 Check if two code points are a valid escape](https://www.w3.org/TR/css-syntax-3/#starts-with-a-valid-escape)
fn is_valid_escape(first: Option<char>, second: Option<char>) -> bool {
    first == Some('\\') && second != Some('\n')
}

/// [§ 4.2 Definitions - whitespace](https://www.w3.org/TR/css-syntax-3/#whitespace)
const fn is_whitespace(c: char) -> bool {
    matches!(c, '\n' | '\t' | ' ' | '\r' | '\x0C')
}

/// [§ 4.2 Definitions - ident-start code point](https://www.w3.org/TR/css-syntax-3/#ident-start-code-point)
///
/// "A letter, a non-ASCII code point, or U+005F LOW LINE (_)."
const fn is_ident_start_code_point(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

/// [§ 4.2 Definitions - ident code point](https://www.w3.org/TR/css-syntax-3/#ident-code-point)
///
/// "An ident-start code point, a digit, or U+002D HYPHEN-MINUS (-)."
const fn is_ident_code_point(c: char) -> bool {
    is_ident_start_code_point(c) || c.is_ascii_digit() || c == '-'
}
