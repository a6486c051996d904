//! Compact CSS serialization of the style tree.
//!
//! Rules come out as `sel1,sel2{prop:value;prop:value}` with no whitespace
//! between tokens of different nodes. Value text is written exactly as it
//! was parsed.

use crate::parser::{
    AtRule, AtRuleBlock, Declaration, KeyframeBlock, Rule, Selector, StyleRule, Stylesheet, Value,
};

/// Serialize a style tree node.
pub trait ToCss {
    /// Append this node's CSS to `out`.
    fn write_css(&self, out: &mut String);

    /// This node's CSS as a new string.
    fn to_css(&self) -> String {
        let mut out = String::new();
        self.write_css(&mut out);
        out
    }
}

/// Serialize any style tree node.
#[must_use]
pub fn generate(node: &impl ToCss) -> String {
    node.to_css()
}

/// Serialize a declaration list without braces, as used in `style`
/// attributes.
#[must_use]
pub fn generate_declarations(declarations: &[Declaration]) -> String {
    let mut out = String::new();
    write_declarations(declarations, &mut out);
    out
}

impl ToCss for Stylesheet {
    fn write_css(&self, out: &mut String) {
        write_rules(&self.rules, out);
    }
}

impl ToCss for Rule {
    fn write_css(&self, out: &mut String) {
        match self {
            Self::Style(rule) => rule.write_css(out),
            Self::At(rule) => rule.write_css(out),
        }
    }
}

impl ToCss for StyleRule {
    fn write_css(&self, out: &mut String) {
        write_selectors(&self.selectors, out);
        out.push('{');
        write_declarations(&self.declarations, out);
        out.push('}');
    }
}

impl ToCss for Selector {
    fn write_css(&self, out: &mut String) {
        out.push_str(&self.text);
    }
}

impl ToCss for AtRule {
    fn write_css(&self, out: &mut String) {
        out.push('@');
        out.push_str(&self.name);
        if !self.prelude.is_empty() {
            out.push(' ');
            out.push_str(&self.prelude);
        }
        let Some(block) = &self.block else {
            out.push(';');
            return;
        };
        out.push('{');
        match block {
            AtRuleBlock::Rules(rules) => write_rules(rules, out),
            AtRuleBlock::Declarations(declarations) => write_declarations(declarations, out),
            AtRuleBlock::Keyframes(blocks) => {
                for block in blocks {
                    block.write_css(out);
                }
            }
            AtRuleBlock::Raw(text) => out.push_str(text),
        }
        out.push('}');
    }
}

impl ToCss for KeyframeBlock {
    fn write_css(&self, out: &mut String) {
        out.push_str(&self.selector);
        out.push('{');
        write_declarations(&self.declarations, out);
        out.push('}');
    }
}

impl ToCss for Declaration {
    fn write_css(&self, out: &mut String) {
        out.push_str(&self.name);
        out.push(':');
        for value in &self.value {
            value.write_css(out);
        }
        if self.important {
            out.push_str("!important");
        }
    }
}

impl ToCss for Value {
    fn write_css(&self, out: &mut String) {
        match self {
            Self::Identifier(text) | Self::Other(text) => out.push_str(text),
            Self::HexColor(digits) => {
                out.push('#');
                out.push_str(digits);
            }
            Self::FunctionCall { name, args } => {
                out.push_str(name);
                out.push('(');
                for arg in args {
                    arg.write_css(out);
                }
                out.push(')');
            }
        }
    }
}

/// Serialize a value list as it appears after the `:` of a declaration.
#[must_use]
pub fn generate_values(values: &[Value]) -> String {
    let mut out = String::new();
    for value in values {
        value.write_css(&mut out);
    }
    out
}

fn write_rules(rules: &[Rule], out: &mut String) {
    for rule in rules {
        rule.write_css(out);
    }
}

fn write_selectors(selectors: &[Selector], out: &mut String) {
    for (i, selector) in selectors.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        selector.write_css(out);
    }
}

fn write_declarations(declarations: &[Declaration], out: &mut String) {
    for (i, declaration) in declarations.iter().enumerate() {
        if i > 0 {
            out.push(';');
        }
        declaration.write_css(out);
    }
}
