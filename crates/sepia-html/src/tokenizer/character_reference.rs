//! Character references for the HTML tokenizer.
//!
//! [§ 13.2.5.72 Character reference state](https://html.spec.whatwg.org/multipage/parsing.html#character-reference-state)
//!
//! The full table defines 2,231 entities; the common subset is resolved here
//! and anything else is passed through as literal text.

use std::collections::HashMap;
use std::sync::LazyLock;

use super::tokenizer::HTMLTokenizer;

/// Entity names (without `&` and `;`) mapped to their replacement text.
static NAMED_ENTITIES: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("amp", "&"),
        ("lt", "<"),
        ("gt", ">"),
        ("quot", "\""),
        ("apos", "'"),
        ("nbsp", "\u{00A0}"),
        ("copy", "\u{00A9}"),
        ("reg", "\u{00AE}"),
        ("trade", "\u{2122}"),
        ("mdash", "\u{2014}"),
        ("ndash", "\u{2013}"),
        ("hellip", "\u{2026}"),
        ("bull", "\u{2022}"),
        ("middot", "\u{00B7}"),
        ("lsquo", "\u{2018}"),
        ("rsquo", "\u{2019}"),
        ("ldquo", "\u{201C}"),
        ("rdquo", "\u{201D}"),
        ("laquo", "\u{00AB}"),
        ("raquo", "\u{00BB}"),
        ("times", "\u{00D7}"),
        ("divide", "\u{00F7}"),
        ("deg", "\u{00B0}"),
        ("euro", "\u{20AC}"),
        ("pound", "\u{00A3}"),
        ("yen", "\u{00A5}"),
        ("sect", "\u{00A7}"),
        ("para", "\u{00B6}"),
        ("shy", "\u{00AD}"),
    ])
});

/// Entities that legacy content writes without the trailing semicolon.
const LEGACY_ENTITIES: &[&str] = &["amp", "lt", "gt", "quot", "nbsp", "copy", "reg"];

/// Look up a named reference by name (no `&`, no `;`).
#[must_use]
pub fn lookup_named(name: &str) -> Option<&'static str> {
    NAMED_ENTITIES.get(name).copied()
}

impl HTMLTokenizer {
    /// [§ 13.2.5.72 Character reference state](https://html.spec.whatwg.org/multipage/parsing.html#character-reference-state)
    ///
    /// Called with the `&` already consumed. Returns the replacement text and
    /// advances past the reference, or returns `"&"` and consumes nothing
    /// further when the input is not a recognized reference.
    pub(super) fn consume_character_reference(&mut self, in_attribute: bool) -> String {
        if self.peek() == Some('#') {
            return self.consume_numeric_character_reference();
        }

        let name: String = self
            .remaining()
            .take_while(char::is_ascii_alphanumeric)
            .take(32)
            .collect();
        if name.is_empty() {
            return "&".to_string();
        }
        let terminated = self.peek_at(name.len()) == Some(';');
        let Some(replacement) = lookup_named(&name) else {
            return "&".to_string();
        };

        // "If the character reference was consumed as part of an attribute,
        // and the last character matched is not a U+003B SEMICOLON character (;)
        // ... flush code points consumed as a character reference."
        if !terminated && (in_attribute || !LEGACY_ENTITIES.contains(&name.as_str())) {
            return "&".to_string();
        }

        self.advance(name.len() + usize::from(terminated));
        replacement.to_string()
    }

    /// [§ 13.2.5.75 Numeric character reference state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-state)
    fn consume_numeric_character_reference(&mut self) -> String {
        let hex = matches!(self.peek_at(1), Some('x' | 'X'));
        let prefix_len = if hex { 2 } else { 1 };
        let radix = if hex { 16 } else { 10 };

        let digits: String = self
            .remaining()
            .skip(prefix_len)
            .take_while(|c| c.is_digit(radix))
            .collect();
        if digits.is_empty() {
            return "&".to_string();
        }
        let terminated = self.peek_at(prefix_len + digits.len()) == Some(';');
        self.advance(prefix_len + digits.len() + usize::from(terminated));

        // [§ 13.2.5.80 Numeric character reference end state]
        // "If the number is 0x00 ... or greater than 0x10FFFF ... or a surrogate,
        // set the character reference code to 0xFFFD."
        let c = u32::from_str_radix(&digits, radix)
            .ok()
            .filter(|&code| code != 0)
            .and_then(char::from_u32)
            .unwrap_or('\u{FFFD}');
        c.to_string()
    }
}
