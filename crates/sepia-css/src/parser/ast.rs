//! The style tree.
//!
//! Only the shapes the passes care about are modelled. Selector and prelude
//! text is kept as text, and every value token that is not a color candidate
//! is kept verbatim in [`Value::Other`].

use strum_macros::Display;

/// Names of conditional group at-rules, whose blocks hold nested rules.
///
/// [CSS Conditional 3 § 2](https://www.w3.org/TR/css-conditional-3/#processing):
/// "conditional group rules ... contain a group of nested rules"
pub const CONDITIONAL_GROUP_RULES: &[&str] = &[
    "-moz-document",
    "container",
    "document",
    "layer",
    "media",
    "scope",
    "starting-style",
    "supports",
];

/// At-rules whose blocks are a list of declarations.
pub const DECLARATION_BLOCK_RULES: &[&str] = &[
    "-ms-viewport",
    "counter-style",
    "font-face",
    "font-palette-values",
    "page",
    "property",
    "viewport",
];

/// The kind of a style tree node, used to filter walks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum NodeKind {
    /// A style rule.
    Rule,
    /// An at-rule.
    AtRule,
    /// A declaration.
    Declaration,
    /// [`Value::Identifier`]
    Identifier,
    /// [`Value::HexColor`]
    HexColor,
    /// [`Value::FunctionCall`]
    FunctionCall,
    /// [`Value::Other`]
    Other,
}

/// [§ 5.3.2 Parse a stylesheet](https://www.w3.org/TR/css-syntax-3/#parse-stylesheet)
///
/// A parsed CSS stylesheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stylesheet {
    /// The list of rules in the stylesheet.
    pub rules: Vec<Rule>,
}

impl Stylesheet {
    /// Number of style rules, counting those nested in at-rules.
    #[must_use]
    pub fn style_rule_count(&self) -> usize {
        count_style_rules(&self.rules)
    }
}

fn count_style_rules(rules: &[Rule]) -> usize {
    rules
        .iter()
        .map(|rule| match rule {
            Rule::Style(_) => 1,
            Rule::At(AtRule {
                block: Some(AtRuleBlock::Rules(nested)),
                ..
            }) => count_style_rules(nested),
            Rule::At(_) => 0,
        })
        .sum()
}

/// [§ 5.3.3 Consume a list of rules](https://www.w3.org/TR/css-syntax-3/#consume-list-of-rules)
///
/// A CSS rule (either a style rule or an at-rule).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    /// A style rule (qualified rule).
    Style(StyleRule),
    /// An at-rule.
    At(AtRule),
}

impl Rule {
    /// The node kind of this rule.
    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        match self {
            Self::Style(_) => NodeKind::Rule,
            Self::At(_) => NodeKind::AtRule,
        }
    }

    /// The style rule, if this is one.
    #[must_use]
    pub const fn as_style(&self) -> Option<&StyleRule> {
        match self {
            Self::Style(rule) => Some(rule),
            Self::At(_) => None,
        }
    }
}

/// [§ 5.4.3 Consume a qualified rule](https://www.w3.org/TR/css-syntax-3/#consume-qualified-rule)
///
/// A CSS style rule (selector + declarations).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleRule {
    /// The list of selectors for this rule, never empty.
    pub selectors: Vec<Selector>,
    /// The declarations in this rule block.
    pub declarations: Vec<Declaration>,
}

/// A single selector from a selector list.
///
/// The structure is derived on demand by [`crate::selector::parse_selector_list`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    /// Selector text with whitespace runs collapsed to one space.
    pub text: String,
}

impl Selector {
    /// Wrap selector text.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// [§ 5.4.2 Consume an at-rule](https://www.w3.org/TR/css-syntax-3/#consume-an-at-rule)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtRule {
    /// The at-keyword name (without the `@`), as written.
    pub name: String,
    /// The prelude text, trimmed.
    pub prelude: String,
    /// The block, or `None` for statement at-rules such as `@import`.
    pub block: Option<AtRuleBlock>,
}

impl AtRule {
    /// Whether this at-rule's block holds nested rules.
    #[must_use]
    pub fn is_conditional_group(&self) -> bool {
        is_conditional_group_name(&self.name)
    }
}

/// Whether an at-rule name introduces nested rules.
#[must_use]
pub fn is_conditional_group_name(name: &str) -> bool {
    let name = name.to_ascii_lowercase();
    CONDITIONAL_GROUP_RULES.binary_search(&name.as_str()).is_ok()
}

/// Whether an at-rule name introduces a declaration list.
#[must_use]
pub fn is_declaration_block_name(name: &str) -> bool {
    let name = name.to_ascii_lowercase();
    DECLARATION_BLOCK_RULES.binary_search(&name.as_str()).is_ok()
}

/// Whether an at-rule name is `@keyframes` or a vendor-prefixed variant.
#[must_use]
pub fn is_keyframes_name(name: &str) -> bool {
    let name = name.to_ascii_lowercase();
    name == "keyframes" || (name.starts_with('-') && name.ends_with("-keyframes"))
}

/// The contents of an at-rule block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AtRuleBlock {
    /// Nested rules of a conditional group rule.
    Rules(Vec<Rule>),
    /// Declarations, as in `@font-face`.
    Declarations(Vec<Declaration>),
    /// `@keyframes` blocks.
    Keyframes(Vec<KeyframeBlock>),
    /// Anything else, kept as text without comments.
    Raw(String),
}

/// [CSS Animations § 3](https://www.w3.org/TR/css-animations-1/#keyframes):
/// "a keyframe selector ... followed by a block of property declarations"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyframeBlock {
    /// Keyframe selector text such as `from` or `0%,50%`.
    pub selector: String,
    /// The declarations of this keyframe.
    pub declarations: Vec<Declaration>,
}

/// [§ 5.4.6 Consume a declaration](https://www.w3.org/TR/css-syntax-3/#consume-declaration)
///
/// A CSS declaration (e.g., `color: red`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// The property name, as written.
    pub name: String,
    /// The value, with surrounding whitespace and `!important` removed.
    pub value: Vec<Value>,
    /// Whether the declaration has `!important`.
    pub important: bool,
}

impl Declaration {
    /// ASCII case-insensitive property name comparison.
    #[must_use]
    pub fn is_property(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    /// Whether this declares a custom property (`--name`).
    #[must_use]
    pub fn is_custom_property(&self) -> bool {
        self.name.starts_with("--")
    }
}

/// A piece of a declaration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// An identifier such as `red` or `none`.
    Identifier(String),
    /// A hex color: 3, 4, 6 or 8 hex digits without the leading `#`.
    HexColor(String),
    /// A function and its arguments, e.g. `rgb(0, 0, 0)`.
    FunctionCall {
        /// The function name, as written.
        name: String,
        /// The argument values, separators included as [`Value::Other`].
        args: Vec<Self>,
    },
    /// Any other source text, verbatim.
    Other(String),
}

impl Value {
    /// The node kind of this value.
    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        match self {
            Self::Identifier(_) => NodeKind::Identifier,
            Self::HexColor(_) => NodeKind::HexColor,
            Self::FunctionCall { .. } => NodeKind::FunctionCall,
            Self::Other(_) => NodeKind::Other,
        }
    }
}
