//! Pass selection and parameters.

use serde::{Deserialize, Serialize};
use sepia_css::{Declaration, Value};
use strum_macros::{Display, EnumIter, EnumString};

/// The rewriting passes, in their command-line spelling.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
#[serde(rename_all = "kebab-case")]
pub enum PassKind {
    /// Replace every recognized color with its gray projection.
    Grayscale,
    /// Remove rules hiding content together with the elements they hide.
    RemoveHidden,
    /// Drop selectors that match nothing in the document.
    DeadCode,
}

/// The `(property, value)` pair that marks content as hidden.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HiddenTarget {
    /// Property name, compared ASCII case-insensitively.
    pub property: String,
    /// Keyword value, compared ASCII case-insensitively.
    pub value: String,
}

impl Default for HiddenTarget {
    fn default() -> Self {
        Self::new("display", "none")
    }
}

impl HiddenTarget {
    /// Target an arbitrary property and keyword.
    #[must_use]
    pub fn new(property: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            value: value.into(),
        }
    }

    /// Whether a parsed declaration sets the target property to the target
    /// keyword.
    #[must_use]
    pub fn matches_declaration(&self, declaration: &Declaration) -> bool {
        declaration.is_property(&self.property)
            && declaration.value.iter().any(|value| {
                matches!(value, Value::Identifier(ident) if ident.eq_ignore_ascii_case(&self.value))
            })
    }

    /// Whether raw `style` attribute text contains `property\s*:\s*value`,
    /// ASCII case-insensitively, with the value ending at a word boundary.
    ///
    /// The attribute is not parsed, so malformed inline styles still match.
    #[must_use]
    pub fn matches_inline(&self, style: &str) -> bool {
        let haystack = style.to_ascii_lowercase();
        let property = self.property.to_ascii_lowercase();
        let value = self.value.to_ascii_lowercase();
        if property.is_empty() || value.is_empty() {
            return false;
        }

        haystack
            .match_indices(property.as_str())
            .any(|(start, _)| {
                let rest = haystack[start + property.len()..].trim_start_matches(is_space);
                let Some(rest) = rest.strip_prefix(':') else {
                    return false;
                };
                let rest = rest.trim_start_matches(is_space);
                rest.strip_prefix(value.as_str())
                    .is_some_and(|after| ends_at_word_boundary(&value, after))
            })
    }
}

/// `\s`
const fn is_space(c: char) -> bool {
    c.is_ascii_whitespace() || c == '\u{0B}'
}

/// `\w`
const fn is_word(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// `\b` between the end of `matched` and the start of `after`.
fn ends_at_word_boundary(matched: &str, after: &str) -> bool {
    let last = matched.chars().next_back().is_some_and(is_word);
    let next = after.chars().next().is_some_and(is_word);
    last != next
}

/// An ordered list of passes and their parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pipeline {
    /// Passes, run in order against the same document.
    pub passes: Vec<PassKind>,
    /// Parameter of [`PassKind::RemoveHidden`].
    #[serde(default)]
    pub hidden: HiddenTarget,
}

impl Pipeline {
    /// A pipeline running `passes` with the default hidden target.
    #[must_use]
    pub fn new(passes: impl IntoIterator<Item = PassKind>) -> Self {
        Self {
            passes: passes.into_iter().collect(),
            hidden: HiddenTarget::default(),
        }
    }

    /// Replace the hidden target.
    #[must_use]
    pub fn with_hidden_target(mut self, hidden: HiddenTarget) -> Self {
        self.hidden = hidden;
        self
    }
}
