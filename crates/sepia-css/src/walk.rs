//! Depth-first, pre-order walks over a [`Stylesheet`] with in-place mutation.
//!
//! The visitor gets the current node and a [`Cursor`]. Calling
//! [`Cursor::remove`] drops the node from its parent's list and the walk
//! resumes with the node that slid into its slot. Calling [`Cursor::replace`]
//! puts a new node in the same slot; the replacement is not visited again,
//! but its children are.

use crate::parser::{AtRule, AtRuleBlock, Declaration, NodeKind, Rule, Stylesheet, Value};

/// Mutation handle for the node currently being visited.
#[derive(Debug)]
pub struct Cursor<T> {
    action: Option<Action<T>>,
}

#[derive(Debug)]
enum Action<T> {
    Remove,
    Replace(T),
}

impl<T> Cursor<T> {
    const fn new() -> Self {
        Self { action: None }
    }

    /// Remove the current node from its parent's list.
    pub fn remove(&mut self) {
        self.action = Some(Action::Remove);
    }

    /// Replace the current node with `node`.
    pub fn replace(&mut self, node: T) {
        self.action = Some(Action::Replace(node));
    }
}

/// A node that can be walked: it has a kind and may own a list of children
/// of its own type.
trait TreeNode: Sized {
    fn kind(&self) -> NodeKind;
    fn children_mut(&mut self) -> Option<&mut Vec<Self>>;
}

impl TreeNode for Rule {
    fn kind(&self) -> NodeKind {
        Self::kind(self)
    }

    fn children_mut(&mut self) -> Option<&mut Vec<Self>> {
        match self {
            Self::At(AtRule {
                block: Some(AtRuleBlock::Rules(rules)),
                ..
            }) => Some(rules),
            _ => None,
        }
    }
}

impl TreeNode for Declaration {
    fn kind(&self) -> NodeKind {
        NodeKind::Declaration
    }

    fn children_mut(&mut self) -> Option<&mut Vec<Self>> {
        None
    }
}

impl TreeNode for Value {
    fn kind(&self) -> NodeKind {
        Self::kind(self)
    }

    fn children_mut(&mut self) -> Option<&mut Vec<Self>> {
        match self {
            Self::FunctionCall { args, .. } => Some(args),
            _ => None,
        }
    }
}

fn walk_list<T, F>(list: &mut Vec<T>, filter: &[NodeKind], visit: &mut F)
where
    T: TreeNode,
    F: FnMut(&mut T, &mut Cursor<T>),
{
    let mut index = 0;
    while index < list.len() {
        if filter.contains(&list[index].kind()) {
            let mut cursor = Cursor::new();
            visit(&mut list[index], &mut cursor);
            match cursor.action {
                Some(Action::Remove) => {
                    let _ = list.remove(index);
                    continue;
                }
                Some(Action::Replace(node)) => list[index] = node,
                None => {}
            }
        }
        if let Some(children) = list[index].children_mut() {
            walk_list(children, filter, visit);
        }
        index += 1;
    }
}

/// Walk every rule, descending into conditional group at-rules.
///
/// `filter` selects which kinds are visited: [`NodeKind::Rule`] for style
/// rules, [`NodeKind::AtRule`] for at-rules. Nested rules are walked even
/// when their at-rule is not visited.
pub fn walk_rules<F>(sheet: &mut Stylesheet, filter: &[NodeKind], mut visit: F)
where
    F: FnMut(&mut Rule, &mut Cursor<Rule>),
{
    walk_list(&mut sheet.rules, filter, &mut visit);
}

/// Walk every declaration list in the stylesheet: style rules, declaration
/// at-rules and keyframes.
pub fn walk_declarations<F>(sheet: &mut Stylesheet, mut visit: F)
where
    F: FnMut(&mut Declaration, &mut Cursor<Declaration>),
{
    for_each_declaration_list(&mut sheet.rules, &mut |declarations| {
        walk_list(declarations, &[NodeKind::Declaration], &mut visit);
    });
}

/// Walk every value of every declaration, descending into function
/// arguments.
pub fn walk_values<F>(sheet: &mut Stylesheet, filter: &[NodeKind], mut visit: F)
where
    F: FnMut(&mut Value, &mut Cursor<Value>),
{
    for_each_declaration_list(&mut sheet.rules, &mut |declarations| {
        for declaration in declarations.iter_mut() {
            walk_list(&mut declaration.value, filter, &mut visit);
        }
    });
}

fn for_each_declaration_list(rules: &mut [Rule], f: &mut dyn FnMut(&mut Vec<Declaration>)) {
    for rule in rules {
        match rule {
            Rule::Style(style) => f(&mut style.declarations),
            Rule::At(at) => match &mut at.block {
                Some(AtRuleBlock::Rules(nested)) => for_each_declaration_list(nested, f),
                Some(AtRuleBlock::Declarations(declarations)) => f(declarations),
                Some(AtRuleBlock::Keyframes(blocks)) => {
                    for block in blocks {
                        f(&mut block.declarations);
                    }
                }
                Some(AtRuleBlock::Raw(_)) | None => {}
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_stylesheet;

    fn sheet(css: &str) -> Stylesheet {
        parse_stylesheet(css).expect("valid css")
    }

    #[test]
    fn test_remove_does_not_skip_next_sibling() {
        let mut s = sheet("a{}b{}c{}");
        let mut seen = Vec::new();
        walk_rules(&mut s, &[NodeKind::Rule], |rule, cursor| {
            if let Rule::Style(style) = rule {
                seen.push(style.selectors[0].text.clone());
                if style.selectors[0].text == "a" {
                    cursor.remove();
                }
            }
        });
        assert_eq!(seen, vec!["a", "b", "c"]);
        assert_eq!(s.rules.len(), 2);
    }

    #[test]
    fn test_replacement_is_not_revisited_but_children_are() {
        let mut s = sheet("a{color:rgb(1,2,3)}");
        let mut visits = 0;
        walk_values(
            &mut s,
            &[NodeKind::FunctionCall, NodeKind::Identifier],
            |value, cursor| {
                visits += 1;
                if let Value::FunctionCall { name, .. } = value
                    && *name == "rgb"
                {
                    cursor.replace(Value::FunctionCall {
                        name: "calc".to_string(),
                        args: vec![Value::Identifier("x".to_string())],
                    });
                }
            },
        );
        // rgb(), then the identifier inside the replacement.
        assert_eq!(visits, 2);
    }

    #[test]
    fn test_filter_limits_visits() {
        let mut s = sheet("a{color:red;margin:0 auto}");
        let mut idents = Vec::new();
        walk_values(&mut s, &[NodeKind::Identifier], |value, _| {
            if let Value::Identifier(text) = value {
                idents.push(text.clone());
            }
        });
        assert_eq!(idents, vec!["red", "auto"]);
    }

    #[test]
    fn test_walk_rules_descends_into_media() {
        let mut s = sheet("@media print{a{}b{}}c{}");
        let mut count = 0;
        walk_rules(&mut s, &[NodeKind::Rule], |_, _| count += 1);
        assert_eq!(count, 3);
    }

    #[test]
    fn test_walk_declarations_remove_all() {
        let mut s = sheet("a{color:red;display:none}@font-face{font-family:x}");
        walk_declarations(&mut s, |decl, cursor| {
            if decl.is_property("display") || decl.is_property("font-family") {
                cursor.remove();
            }
        });
        let Rule::Style(style) = &s.rules[0] else {
            panic!("expected style rule");
        };
        assert_eq!(style.declarations.len(), 1);
        assert!(matches!(
            &s.rules[1],
            Rule::At(AtRule { block: Some(AtRuleBlock::Declarations(d)), .. }) if d.is_empty()
        ));
    }
}
