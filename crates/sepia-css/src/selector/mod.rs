//! CSS Selector parsing and matching
//!
//! This module implements the static subset of
//! [Selectors Level 4](https://www.w3.org/TR/selectors-4/) that can be
//! evaluated against a document without layout or user interaction.
//!
//! Selectors that cannot be evaluated (dynamic pseudo-classes,
//! pseudo-elements, unknown syntax) fail with a [`SelectorError`]. The
//! `try_*` functions return that error; the others treat it as "no match".

mod parser;

use sepia_common::warning::warn_once;
use sepia_dom::{DomTree, ElementData, NodeId, NodeType};
use thiserror::Error;

/// Why a selector could not be evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    /// The selector text (or one entry of a list) is empty.
    #[error("empty selector")]
    Empty,
    /// A character that cannot appear at this point.
    #[error("unexpected '{found}' at offset {offset}")]
    UnexpectedChar {
        /// The offending character.
        found: char,
        /// Byte offset in the selector text.
        offset: usize,
    },
    /// The selector text ended early.
    #[error("unexpected end of selector")]
    UnexpectedEnd,
    /// A combinator with nothing on its right.
    #[error("combinator without a right-hand selector")]
    DanglingCombinator,
    /// Not a valid CSS identifier.
    #[error("invalid identifier '{0}'")]
    InvalidIdentifier(String),
    /// Pseudo-elements never match elements.
    #[error("pseudo-element '::{0}' cannot be matched")]
    PseudoElement(String),
    /// Interaction-dependent pseudo-classes such as `:hover`.
    #[error("dynamic pseudo-class ':{0}' cannot be matched statically")]
    DynamicPseudoClass(String),
    /// Any other pseudo-class.
    #[error("unsupported pseudo-class ':{0}'")]
    UnsupportedPseudoClass(String),
}

/// [§ 5 Elemental selectors](https://www.w3.org/TR/selectors-4/#elemental-selectors)
///
/// A simple selector is a single condition on an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimpleSelector {
    /// [§ 5.1 Type selector](https://www.w3.org/TR/selectors-4/#type-selectors)
    ///
    /// Stored lowercased. Example: `div`
    Type(String),

    /// [§ 6.6 Class selector](https://www.w3.org/TR/selectors-4/#class-html)
    ///
    /// Example: `.nav-item`
    Class(String),

    /// [§ 6.7 ID selector](https://www.w3.org/TR/selectors-4/#id-selectors)
    ///
    /// Example: `#main`
    Id(String),

    /// [§ 5.2 Universal selector](https://www.w3.org/TR/selectors-4/#universal-selector)
    Universal,

    /// [§ 6 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
    Attribute(AttributeSelector),

    /// [§ 3.5 Pseudo-classes](https://www.w3.org/TR/selectors-4/#pseudo-classes)
    PseudoClass(PseudoClass),
}

/// Pseudo-classes that can be answered from the document alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PseudoClass {
    /// [§ 14.1 :root](https://www.w3.org/TR/selectors-4/#the-root-pseudo)
    /// "The :root pseudo-class represents an element that is the root of the document."
    Root,
    /// [§ 14.4.1 :first-child](https://www.w3.org/TR/selectors-4/#the-first-child-pseudo)
    FirstChild,
    /// [§ 14.4.2 :last-child](https://www.w3.org/TR/selectors-4/#the-last-child-pseudo)
    LastChild,
    /// [§ 14.5.1 :first-of-type](https://www.w3.org/TR/selectors-4/#the-first-of-type-pseudo)
    FirstOfType,
    /// [§ 14.5.2 :last-of-type](https://www.w3.org/TR/selectors-4/#the-last-of-type-pseudo)
    LastOfType,
    /// [§ 14.4.3 :only-child](https://www.w3.org/TR/selectors-4/#the-only-child-pseudo)
    OnlyChild,
    /// [§ 14.2 :empty](https://www.w3.org/TR/selectors-4/#the-empty-pseudo)
    Empty,
    /// [§ 8.2 :link](https://www.w3.org/TR/selectors-4/#link)
    ///
    /// Every link is treated as unvisited.
    Link,
    /// [§ 13.1 :enabled](https://www.w3.org/TR/selectors-4/#enableddisabled)
    Enabled,
    /// [§ 13.1 :disabled](https://www.w3.org/TR/selectors-4/#enableddisabled)
    Disabled,
    /// [§ 13.3.1 :checked](https://www.w3.org/TR/selectors-4/#checked)
    Checked,
    /// [§ 4.3 :not()](https://www.w3.org/TR/selectors-4/#negation)
    ///
    /// Matches if none of the compound selectors match.
    Not(Vec<CompoundSelector>),
}

/// The comparison in an attribute selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeOperator {
    /// `[attr]`
    Exists,
    /// `[attr=val]`
    Equals,
    /// `[attr~=val]`, whitespace-separated word
    Includes,
    /// `[attr|=val]`, exact or followed by `-`
    DashMatch,
    /// `[attr^=val]`
    Prefix,
    /// `[attr$=val]`
    Suffix,
    /// `[attr*=val]`
    Substring,
}

/// [§ 6.1 Attribute presence and value selectors](https://www.w3.org/TR/selectors-4/#attribute-representation)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeSelector {
    /// Lowercased attribute name.
    pub name: String,
    /// How the value is compared.
    pub operator: AttributeOperator,
    /// The value to compare with; empty for [`AttributeOperator::Exists`].
    pub value: String,
    /// The `i` flag.
    pub case_insensitive: bool,
}

impl AttributeSelector {
    fn matches(&self, element: &ElementData) -> bool {
        let Some(actual) = element.attrs.get(&self.name) else {
            return false;
        };
        let (actual, expected) = if self.case_insensitive {
            (actual.to_ascii_lowercase(), self.value.to_ascii_lowercase())
        } else {
            (actual.clone(), self.value.clone())
        };
        match self.operator {
            AttributeOperator::Exists => true,
            AttributeOperator::Equals => actual == expected,
            AttributeOperator::Includes => {
                !expected.is_empty() && actual.split_ascii_whitespace().any(|w| w == expected)
            }
            AttributeOperator::DashMatch => {
                actual == expected
                    || actual
                        .strip_prefix(expected.as_str())
                        .is_some_and(|rest| rest.starts_with('-'))
            }
            // "If 'val' is the empty string then the selector does not represent anything."
            AttributeOperator::Prefix => !expected.is_empty() && actual.starts_with(&expected),
            AttributeOperator::Suffix => !expected.is_empty() && actual.ends_with(&expected),
            AttributeOperator::Substring => !expected.is_empty() && actual.contains(&expected),
        }
    }
}

/// [§ 4.2 Compound selectors](https://www.w3.org/TR/selectors-4/#compound)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompoundSelector {
    /// The conditions, all of which must hold on one element.
    pub simple_selectors: Vec<SimpleSelector>,
}

/// [§ 16 Combinators](https://www.w3.org/TR/selectors-4/#combinators)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// `A B`
    Descendant,
    /// `A > B`
    Child,
    /// `A + B`
    NextSibling,
    /// `A ~ B`
    SubsequentSibling,
}

/// [§ 4.3 Complex selectors](https://www.w3.org/TR/selectors-4/#complex)
///
/// For `A > B C`:
/// - subject: `C`
/// - combinators: `[(Descendant, B), (Child, A)]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplexSelector {
    /// The rightmost compound selector.
    pub subject: CompoundSelector,
    /// `(combinator, compound)` pairs going left from the subject.
    pub combinators: Vec<(Combinator, CompoundSelector)>,
}

impl ComplexSelector {
    /// Whether `node` is matched by this selector.
    #[must_use]
    pub fn matches(&self, tree: &DomTree, node: NodeId) -> bool {
        compound_matches(&self.subject, tree, node)
            && chain_matches(&self.combinators, tree, node)
    }
}

/// Parse a selector list such as `h1, .title > a`.
///
/// # Errors
///
/// Returns the first [`SelectorError`] of any entry.
pub fn parse_selector_list(text: &str) -> Result<Vec<ComplexSelector>, SelectorError> {
    parser::parse_selector_list(text)
}

/// Whether any connected element matches `selector`.
///
/// # Errors
///
/// Fails if the selector cannot be parsed or evaluated.
pub fn try_matches_any(tree: &DomTree, selector: &str) -> Result<bool, SelectorError> {
    Ok(try_match_first(tree, selector)?.is_some())
}

/// The first connected element in document order matching `selector`.
///
/// # Errors
///
/// Fails if the selector cannot be parsed or evaluated.
pub fn try_match_first(tree: &DomTree, selector: &str) -> Result<Option<NodeId>, SelectorError> {
    let selectors = parse_selector_list(selector)?;
    Ok(tree
        .elements()
        .find(|&node| selectors.iter().any(|s| s.matches(tree, node))))
}

/// Every connected element matching `selector`, in document order.
///
/// # Errors
///
/// Fails if the selector cannot be parsed or evaluated.
pub fn try_match_all(tree: &DomTree, selector: &str) -> Result<Vec<NodeId>, SelectorError> {
    let selectors = parse_selector_list(selector)?;
    Ok(tree
        .elements()
        .filter(|&node| selectors.iter().any(|s| s.matches(tree, node)))
        .collect())
}

/// Like [`try_matches_any`], with failures reported as no match.
#[must_use]
pub fn matches_any(tree: &DomTree, selector: &str) -> bool {
    downgrade(selector, try_matches_any(tree, selector)).unwrap_or(false)
}

/// Like [`try_match_first`], with failures reported as no match.
#[must_use]
pub fn match_first(tree: &DomTree, selector: &str) -> Option<NodeId> {
    downgrade(selector, try_match_first(tree, selector)).flatten()
}

/// Like [`try_match_all`], with failures reported as no match.
#[must_use]
pub fn match_all(tree: &DomTree, selector: &str) -> Vec<NodeId> {
    downgrade(selector, try_match_all(tree, selector)).unwrap_or_default()
}

fn downgrade<T>(selector: &str, result: Result<T, SelectorError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            warn_once("Selector", &format!("'{selector}': {err}"));
            None
        }
    }
}

/// Walk the combinator chain outward from `node`, backtracking so that
/// `a b c` finds an `a` above any `b` above the subject, not only the nearest.
fn chain_matches(chain: &[(Combinator, CompoundSelector)], tree: &DomTree, node: NodeId) -> bool {
    let Some(((combinator, compound), rest)) = chain.split_first() else {
        return true;
    };
    let candidate = |id: NodeId| compound_matches(compound, tree, id) && chain_matches(rest, tree, id);
    match combinator {
        Combinator::Descendant => tree.ancestors(node).any(candidate),
        Combinator::Child => tree.parent(node).is_some_and(candidate),
        Combinator::NextSibling => previous_element_sibling(tree, node).is_some_and(candidate),
        Combinator::SubsequentSibling => preceding_element_siblings(tree, node).any(candidate),
    }
}

fn compound_matches(compound: &CompoundSelector, tree: &DomTree, node: NodeId) -> bool {
    let Some(element) = tree.as_element(node) else {
        return false;
    };
    compound
        .simple_selectors
        .iter()
        .all(|simple| simple_matches(simple, tree, node, element))
}

fn simple_matches(
    simple: &SimpleSelector,
    tree: &DomTree,
    node: NodeId,
    element: &ElementData,
) -> bool {
    match simple {
        SimpleSelector::Type(name) => element.tag_name.eq_ignore_ascii_case(name),
        SimpleSelector::Class(class_name) => element.has_class(class_name),
        SimpleSelector::Id(id) => element.id() == Some(id.as_str()),
        SimpleSelector::Universal => true,
        SimpleSelector::Attribute(attribute) => attribute.matches(element),
        SimpleSelector::PseudoClass(pseudo) => pseudo_class_matches(pseudo, tree, node, element),
    }
}

/// Elements that can be disabled.
///
/// [HTML § 4.16.2](https://html.spec.whatwg.org/multipage/semantics-other.html#concept-element-disabled)
const FORM_CONTROLS: &[&str] = &[
    "button", "fieldset", "input", "optgroup", "option", "select", "textarea",
];

fn pseudo_class_matches(
    pseudo: &PseudoClass,
    tree: &DomTree,
    node: NodeId,
    element: &ElementData,
) -> bool {
    match pseudo {
        PseudoClass::Root => tree.document_element() == Some(node),
        PseudoClass::FirstChild => previous_element_sibling(tree, node).is_none(),
        PseudoClass::LastChild => next_element_sibling(tree, node).is_none(),
        PseudoClass::OnlyChild => {
            previous_element_sibling(tree, node).is_none()
                && next_element_sibling(tree, node).is_none()
        }
        PseudoClass::FirstOfType => !preceding_element_siblings(tree, node)
            .any(|id| same_type(tree, id, element)),
        PseudoClass::LastOfType => !following_element_siblings(tree, node)
            .any(|id| same_type(tree, id, element)),
        // [§ 14.2](https://www.w3.org/TR/selectors-4/#the-empty-pseudo)
        // "Elements that have no children except for whitespace"
        PseudoClass::Empty => tree
            .children(node)
            .iter()
            .all(|&child| match tree.get(child).map(|n| &n.node_type) {
                Some(NodeType::Text(text)) => text.trim_ascii().is_empty(),
                Some(NodeType::Comment(_)) => true,
                _ => false,
            }),
        PseudoClass::Link => {
            matches!(element.tag_name.as_str(), "a" | "area")
                && element.attrs.contains_key("href")
        }
        PseudoClass::Enabled => {
            FORM_CONTROLS.contains(&element.tag_name.as_str())
                && !element.attrs.contains_key("disabled")
        }
        PseudoClass::Disabled => {
            FORM_CONTROLS.contains(&element.tag_name.as_str())
                && element.attrs.contains_key("disabled")
        }
        PseudoClass::Checked => match element.tag_name.as_str() {
            "input" => {
                element.attrs.contains_key("checked")
                    && element.attrs.get("type").is_some_and(|t| {
                        t.eq_ignore_ascii_case("checkbox") || t.eq_ignore_ascii_case("radio")
                    })
            }
            "option" => element.attrs.contains_key("selected"),
            _ => false,
        },
        PseudoClass::Not(compounds) => !compounds
            .iter()
            .any(|compound| compound_matches(compound, tree, node)),
    }
}

fn same_type(tree: &DomTree, id: NodeId, element: &ElementData) -> bool {
    tree.tag_name(id)
        .is_some_and(|tag| tag.eq_ignore_ascii_case(&element.tag_name))
}

fn preceding_element_siblings(tree: &DomTree, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
    tree.preceding_siblings(node)
        .filter(|&id| tree.as_element(id).is_some())
}

fn following_element_siblings(tree: &DomTree, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
    std::iter::successors(tree.next_sibling(node), |&id| tree.next_sibling(id))
        .filter(|&id| tree.as_element(id).is_some())
}

fn previous_element_sibling(tree: &DomTree, node: NodeId) -> Option<NodeId> {
    preceding_element_siblings(tree, node).next()
}

fn next_element_sibling(tree: &DomTree, node: NodeId) -> Option<NodeId> {
    following_element_siblings(tree, node).next()
}
