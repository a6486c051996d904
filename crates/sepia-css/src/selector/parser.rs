//! [§ 4 Selector syntax](https://www.w3.org/TR/selectors-4/#syntax)
//!
//! A hand-written recursive descent parser over the selector text. Unlike
//! the stylesheet parser it works on characters, since selector text has
//! already been isolated and whitespace-collapsed.

use std::iter::Peekable;
use std::str::CharIndices;

use super::{
    AttributeOperator, AttributeSelector, Combinator, ComplexSelector, CompoundSelector,
    PseudoClass, SelectorError, SimpleSelector,
};

/// Pseudo-classes that depend on user interaction or navigation state.
/// They cannot be evaluated against a static document.
const DYNAMIC_PSEUDO_CLASSES: &[&str] = &[
    "active",
    "focus",
    "focus-visible",
    "focus-within",
    "hover",
    "target",
    "visited",
];

/// CSS 2 pseudo-elements that may be written with a single colon.
const LEGACY_PSEUDO_ELEMENTS: &[&str] = &["after", "before", "first-letter", "first-line"];

/// [§ 4.1 Selector lists](https://www.w3.org/TR/selectors-4/#grouping)
///
/// Split on top-level commas and parse each complex selector.
pub(super) fn parse_selector_list(text: &str) -> Result<Vec<ComplexSelector>, SelectorError> {
    split_top_level_commas(text)
        .into_iter()
        .map(|part| SelectorParser::new(part).parse_complex_selector())
        .collect()
}

fn split_top_level_commas(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0_usize;
    let mut quote: Option<char> = None;
    let mut start = 0;
    let mut escaped = false;
    for (i, c) in text.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match (c, quote) {
            ('\\', _) => escaped = true,
            (q, Some(open)) if q == open => quote = None,
            (_, Some(_)) => {}
            ('"' | '\'', None) => quote = Some(c),
            ('(' | '[', None) => depth += 1,
            (')' | ']', None) => depth = depth.saturating_sub(1),
            (',', None) if depth == 0 => {
                parts.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}

struct SelectorParser<'a> {
    source: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> SelectorParser<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    fn offset(&mut self) -> usize {
        self.chars.peek().map_or(self.source.len(), |&(i, _)| i)
    }

    fn skip_whitespace(&mut self) -> bool {
        let mut skipped = false;
        while self.peek().is_some_and(|c| c.is_ascii_whitespace()) {
            let _ = self.chars.next();
            skipped = true;
        }
        skipped
    }

    fn unexpected(&mut self) -> SelectorError {
        let offset = self.offset();
        match self.chars.peek() {
            Some(&(_, found)) => SelectorError::UnexpectedChar { found, offset },
            None => SelectorError::UnexpectedEnd,
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), SelectorError> {
        if self.peek() == Some(expected) {
            let _ = self.chars.next();
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    /// [§ 4.3 Complex selectors](https://www.w3.org/TR/selectors-4/#complex)
    ///
    /// Compounds are read left to right and stored right to left, so the
    /// subject comes first when matching.
    fn parse_complex_selector(mut self) -> Result<ComplexSelector, SelectorError> {
        let _ = self.skip_whitespace();
        if self.peek().is_none() {
            return Err(SelectorError::Empty);
        }

        let mut compounds = vec![self.parse_compound_selector()?];
        let mut combinators = Vec::new();

        loop {
            let had_whitespace = self.skip_whitespace();
            let combinator = match self.peek() {
                None => break,
                Some('>') => Combinator::Child,
                Some('+') => Combinator::NextSibling,
                Some('~') => Combinator::SubsequentSibling,
                Some(_) if had_whitespace => Combinator::Descendant,
                Some(_) => return Err(self.unexpected()),
            };
            if combinator != Combinator::Descendant {
                let _ = self.chars.next();
                let _ = self.skip_whitespace();
            }
            if self.peek().is_none() {
                return Err(SelectorError::DanglingCombinator);
            }
            combinators.push(combinator);
            compounds.push(self.parse_compound_selector()?);
        }

        let mut compounds = compounds.into_iter().rev();
        let subject = compounds.next().ok_or(SelectorError::Empty)?;
        Ok(ComplexSelector {
            subject,
            combinators: combinators.into_iter().rev().zip(compounds).collect(),
        })
    }

    /// [§ 4.2 Compound selectors](https://www.w3.org/TR/selectors-4/#compound)
    ///
    /// "If it contains a type selector or universal selector, that selector
    /// must come first in the sequence."
    fn parse_compound_selector(&mut self) -> Result<CompoundSelector, SelectorError> {
        let mut simple_selectors = Vec::new();

        match self.peek() {
            Some('*') => {
                let _ = self.chars.next();
                simple_selectors.push(SimpleSelector::Universal);
            }
            Some(c) if is_ident_start(c) || c == '\\' || c == '-' => {
                let name = self.parse_ident()?;
                simple_selectors.push(SimpleSelector::Type(name.to_ascii_lowercase()));
            }
            _ => {}
        }

        loop {
            match self.peek() {
                Some('.') => {
                    let _ = self.chars.next();
                    simple_selectors.push(SimpleSelector::Class(self.parse_ident()?));
                }
                Some('#') => {
                    let _ = self.chars.next();
                    simple_selectors.push(SimpleSelector::Id(self.parse_name()?));
                }
                Some('[') => {
                    let _ = self.chars.next();
                    simple_selectors.push(SimpleSelector::Attribute(self.parse_attribute()?));
                }
                Some(':') => {
                    let _ = self.chars.next();
                    simple_selectors.push(SimpleSelector::PseudoClass(self.parse_pseudo()?));
                }
                _ => break,
            }
        }

        if simple_selectors.is_empty() {
            return Err(self.unexpected());
        }
        Ok(CompoundSelector { simple_selectors })
    }

    /// [§ 6 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
    ///
    /// Called after the `[`.
    fn parse_attribute(&mut self) -> Result<AttributeSelector, SelectorError> {
        let _ = self.skip_whitespace();
        let name = self.parse_ident()?.to_ascii_lowercase();
        let _ = self.skip_whitespace();

        let operator = match self.peek() {
            Some(']') => {
                let _ = self.chars.next();
                return Ok(AttributeSelector {
                    name,
                    operator: AttributeOperator::Exists,
                    value: String::new(),
                    case_insensitive: false,
                });
            }
            Some('=') => AttributeOperator::Equals,
            Some('~') => AttributeOperator::Includes,
            Some('|') => AttributeOperator::DashMatch,
            Some('^') => AttributeOperator::Prefix,
            Some('$') => AttributeOperator::Suffix,
            Some('*') => AttributeOperator::Substring,
            _ => return Err(self.unexpected()),
        };
        let _ = self.chars.next();
        if operator != AttributeOperator::Equals {
            self.expect('=')?;
        }
        let _ = self.skip_whitespace();

        let value = match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                let _ = self.chars.next();
                self.parse_string(quote)?
            }
            _ => self.parse_ident()?,
        };
        let _ = self.skip_whitespace();

        // [§ 6.3 Case-sensitivity](https://www.w3.org/TR/selectors-4/#attribute-case)
        let mut case_insensitive = false;
        if let Some(flag) = self.peek()
            && flag != ']'
        {
            match flag {
                'i' | 'I' => case_insensitive = true,
                's' | 'S' => {}
                _ => return Err(self.unexpected()),
            }
            let _ = self.chars.next();
            let _ = self.skip_whitespace();
        }
        self.expect(']')?;

        Ok(AttributeSelector {
            name,
            operator,
            value,
            case_insensitive,
        })
    }

    /// [§ 3.5 Pseudo-classes](https://www.w3.org/TR/selectors-4/#pseudo-classes)
    ///
    /// Called after the first `:`.
    fn parse_pseudo(&mut self) -> Result<PseudoClass, SelectorError> {
        if self.peek() == Some(':') {
            let _ = self.chars.next();
            let name = self.parse_ident()?;
            return Err(SelectorError::PseudoElement(name));
        }

        let name = self.parse_ident()?.to_ascii_lowercase();

        if self.peek() == Some('(') {
            let _ = self.chars.next();
            if name != "not" {
                return Err(SelectorError::UnsupportedPseudoClass(format!("{name}()")));
            }
            return self.parse_negation();
        }

        if LEGACY_PSEUDO_ELEMENTS.contains(&name.as_str()) {
            return Err(SelectorError::PseudoElement(name));
        }
        if DYNAMIC_PSEUDO_CLASSES.contains(&name.as_str()) {
            return Err(SelectorError::DynamicPseudoClass(name));
        }

        let pseudo = match name.as_str() {
            "root" => PseudoClass::Root,
            "first-child" => PseudoClass::FirstChild,
            "last-child" => PseudoClass::LastChild,
            "first-of-type" => PseudoClass::FirstOfType,
            "last-of-type" => PseudoClass::LastOfType,
            "only-child" => PseudoClass::OnlyChild,
            "empty" => PseudoClass::Empty,
            "link" | "any-link" => PseudoClass::Link,
            "enabled" => PseudoClass::Enabled,
            "disabled" => PseudoClass::Disabled,
            "checked" => PseudoClass::Checked,
            _ => return Err(SelectorError::UnsupportedPseudoClass(name)),
        };
        Ok(pseudo)
    }

    /// [§ 4.3 The Negation Pseudo-class](https://www.w3.org/TR/selectors-4/#negation)
    ///
    /// Only compound selectors are accepted inside `:not()`.
    fn parse_negation(&mut self) -> Result<PseudoClass, SelectorError> {
        let mut compounds = Vec::new();
        loop {
            let _ = self.skip_whitespace();
            compounds.push(self.parse_compound_selector()?);
            let _ = self.skip_whitespace();
            match self.peek() {
                Some(',') => {
                    let _ = self.chars.next();
                }
                Some(')') => {
                    let _ = self.chars.next();
                    return Ok(PseudoClass::Not(compounds));
                }
                _ => return Err(self.unexpected()),
            }
        }
    }

    /// [§ 4.3.11 Consume an ident sequence](https://www.w3.org/TR/css-syntax-3/#consume-name)
    fn parse_ident(&mut self) -> Result<String, SelectorError> {
        match self.peek() {
            Some(c) if is_ident_start(c) || c == '\\' => {}
            Some('-') => {}
            _ => return Err(self.unexpected()),
        }
        let name = self.parse_name()?;
        // "-" alone and "-5" are not identifiers.
        let after_dash = name.strip_prefix('-');
        if after_dash.is_some_and(|rest| rest.is_empty() || rest.starts_with(|c: char| c.is_ascii_digit())) {
            return Err(SelectorError::InvalidIdentifier(name));
        }
        Ok(name)
    }

    /// A run of ident code points, with `\` escapes taken literally.
    fn parse_name(&mut self) -> Result<String, SelectorError> {
        let mut name = String::new();
        while let Some(c) = self.peek() {
            if c == '\\' {
                let _ = self.chars.next();
                let (_, escaped) = self.chars.next().ok_or(SelectorError::UnexpectedEnd)?;
                name.push(escaped);
            } else if is_ident_char(c) {
                name.push(c);
                let _ = self.chars.next();
            } else {
                break;
            }
        }
        if name.is_empty() {
            return Err(self.unexpected());
        }
        Ok(name)
    }

    /// Called after the opening quote.
    fn parse_string(&mut self, quote: char) -> Result<String, SelectorError> {
        let mut value = String::new();
        while let Some((_, c)) = self.chars.next() {
            match c {
                '\\' => {
                    let (_, escaped) = self.chars.next().ok_or(SelectorError::UnexpectedEnd)?;
                    value.push(escaped);
                }
                c if c == quote => return Ok(value),
                c => value.push(c),
            }
        }
        Err(SelectorError::UnexpectedEnd)
    }
}

/// [§ 4.3.10 ident-start code point](https://www.w3.org/TR/css-syntax-3/#ident-start-code-point)
const fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

/// [§ 4.3.9 ident code point](https://www.w3.org/TR/css-syntax-3/#ident-code-point)
const fn is_ident_char(c: char) -> bool {
    is_ident_start(c) || c.is_ascii_digit() || c == '-'
}
