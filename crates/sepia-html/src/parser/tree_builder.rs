//! A tolerant tree builder.
//!
//! This is deliberately smaller than [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction):
//! there are no insertion modes, no implied `html`/`head`/`body` elements
//! and no adoption agency. The tree mirrors the markup as written, which is
//! what the stylesheet rewriter needs to serialize documents back out with
//! their structure intact.

use sepia_common::warning::warn_once;
use sepia_dom::serialize::is_void_element;
use sepia_dom::{AttributesMap, DomTree, ElementData, NodeId, NodeType};

use crate::tokenizer::{Attribute, Token};

/// Elements inside which a self-closing flag on a non-void tag is honored.
///
/// [§ 13.2.6.5 The rules for parsing tokens in foreign content](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inforeign):
/// "If the token has its self-closing flag set, then ... pop the current
/// node off the stack of open elements and acknowledge the token's
/// self-closing flag."
const FOREIGN_ROOTS: &[&str] = &["svg", "math"];

/// Start tags that imply `</p>` when a paragraph is open.
///
/// [§ 13.2.6.4.7](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody):
/// "If the stack of open elements has a p element in button scope, then
/// close a p element."
const CLOSES_P: &[&str] = &[
    "address",
    "article",
    "aside",
    "blockquote",
    "details",
    "dialog",
    "div",
    "dl",
    "fieldset",
    "figcaption",
    "figure",
    "footer",
    "form",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "header",
    "hgroup",
    "hr",
    "main",
    "menu",
    "nav",
    "ol",
    "p",
    "pre",
    "section",
    "summary",
    "table",
    "ul",
];

/// Elements that stop the search for an implied end tag.
const SCOPE_BOUNDARIES: &[&str] = &[
    "html", "body", "table", "td", "th", "caption", "template", "button", "svg", "math",
];

/// [§ 13.2.2 Parse errors](https://html.spec.whatwg.org/multipage/parsing.html#parse-errors)
///
/// A recoverable problem noticed while building the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIssue {
    /// Human-readable description.
    pub message: String,
    /// Index into the token stream where the issue was encountered.
    pub token_index: usize,
}

/// Builds a `DomTree` from a stream of tokens.
pub struct HTMLParser {
    /// Open elements, innermost last. Stores `NodeId`s into the arena.
    stack_of_open_elements: Vec<NodeId>,

    /// Character tokens not yet flushed into a text node.
    pending_text: String,

    /// DOM tree with parent/sibling pointers.
    /// `NodeId::ROOT` (index 0) is the Document node.
    tree: DomTree,

    /// Input tokens from the tokenizer.
    tokens: Vec<Token>,

    /// Current position in token stream.
    token_index: usize,

    /// Parse issues encountered during parsing.
    issues: Vec<ParseIssue>,
}

impl HTMLParser {
    /// Create a new parser from a token stream.
    #[must_use]
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            stack_of_open_elements: Vec::new(),
            pending_text: String::new(),
            tree: DomTree::new(),
            tokens,
            token_index: 0,
            issues: Vec::new(),
        }
    }

    /// Get all parse issues encountered so far.
    #[must_use]
    pub fn get_issues(&self) -> &[ParseIssue] {
        &self.issues
    }

    /// Run the parser and return the DOM tree.
    #[must_use]
    pub fn run(self) -> DomTree {
        self.run_with_issues().0
    }

    /// Run the parser and return both the `DomTree` and any parse issues.
    #[must_use]
    pub fn run_with_issues(mut self) -> (DomTree, Vec<ParseIssue>) {
        let tokens = std::mem::take(&mut self.tokens);
        for (index, token) in tokens.into_iter().enumerate() {
            self.token_index = index;
            if self.process_token(token) {
                break;
            }
        }
        self.flush_text();
        (self.tree, self.issues)
    }

    /// Process one token. Returns true at end of file.
    fn process_token(&mut self, token: Token) -> bool {
        if let Token::Character { data } = token {
            self.pending_text.push(data);
            return false;
        }
        self.flush_text();

        match token {
            Token::Character { .. } => {}
            Token::Doctype { name } => {
                if self.stack_of_open_elements.is_empty() {
                    let node = self
                        .tree
                        .alloc(NodeType::Doctype(name.unwrap_or_default()));
                    self.tree.append_child(NodeId::ROOT, node);
                } else {
                    self.parse_error("DOCTYPE inside an element, ignored");
                }
            }
            Token::Comment { data } => {
                let node = self.tree.alloc(NodeType::Comment(data));
                self.insert(node);
            }
            Token::StartTag {
                name,
                self_closing,
                attributes,
            } => self.handle_start_tag(name, self_closing, attributes),
            Token::EndTag { name } => self.handle_end_tag(&name),
            Token::EndOfFile => return true,
        }
        false
    }

    fn handle_start_tag(&mut self, name: String, self_closing: bool, attributes: Vec<Attribute>) {
        self.close_implied_elements(&name);

        let in_foreign_content = FOREIGN_ROOTS.contains(&name.as_str())
            || self
                .stack_of_open_elements
                .iter()
                .any(|&id| self.tree.tag_name(id).is_some_and(|t| FOREIGN_ROOTS.contains(&t)));
        let void = is_void_element(&name);

        let mut attrs = AttributesMap::new();
        for attr in attributes {
            let _ = attrs.entry(attr.name).or_insert(attr.value);
        }
        let node = self.tree.alloc(NodeType::Element(ElementData {
            tag_name: name,
            attrs,
        }));
        self.insert(node);

        if void {
            return;
        }
        if self_closing {
            if in_foreign_content {
                return;
            }
            // "non-void-html-element-start-tag-with-trailing-solidus parse error"
            self.parse_error("self-closing flag on a non-void element ignored");
        }
        self.stack_of_open_elements.push(node);
    }

    /// "Any other end tag": walk the stack from the top looking for a
    /// matching element. If one is found, pop everything up to and including
    /// it; otherwise ignore the token.
    fn handle_end_tag(&mut self, name: &str) {
        let position = self
            .stack_of_open_elements
            .iter()
            .rposition(|&id| self.tree.tag_name(id) == Some(name));
        match position {
            Some(index) => {
                if index + 1 != self.stack_of_open_elements.len() {
                    self.parse_error(&format!("end tag </{name}> closes unclosed elements"));
                }
                self.stack_of_open_elements.truncate(index);
            }
            None if is_void_element(name) => {
                self.parse_error(&format!("end tag </{name}> for a void element ignored"));
            }
            None => self.parse_error(&format!("stray end tag </{name}> ignored")),
        }
    }

    /// Close elements whose end tag is implied by the start tag `name`.
    fn close_implied_elements(&mut self, name: &str) {
        if CLOSES_P.contains(&name) {
            self.close_in_scope(&["p"], &[]);
        }
        match name {
            // "Loop: If node is an li element, then ... pop elements from the
            // stack of open elements until an li element has been popped"
            "li" => self.close_in_scope(&["li"], &["ul", "ol"]),
            "dt" | "dd" => self.close_in_scope(&["dt", "dd"], &["dl"]),
            "option" => {
                if self.current_tag_name() == Some("option") {
                    let _ = self.stack_of_open_elements.pop();
                }
            }
            "tr" => {
                self.close_in_scope(&["td", "th"], &["tr"]);
                self.close_in_scope(&["tr"], &["tbody", "thead", "tfoot"]);
            }
            "td" | "th" => self.close_in_scope(&["td", "th"], &["tr"]),
            _ => {}
        }
    }

    /// Pop up to and including the innermost element named in `targets`,
    /// unless a scope boundary or one of `stop_at` is reached first.
    fn close_in_scope(&mut self, targets: &[&str], stop_at: &[&str]) {
        for index in (0..self.stack_of_open_elements.len()).rev() {
            let Some(tag) = self.tree.tag_name(self.stack_of_open_elements[index]) else {
                continue;
            };
            if targets.contains(&tag) {
                self.stack_of_open_elements.truncate(index);
                return;
            }
            if stop_at.contains(&tag) || SCOPE_BOUNDARIES.contains(&tag) {
                return;
            }
        }
    }

    fn current_node(&self) -> NodeId {
        self.stack_of_open_elements
            .last()
            .copied()
            .unwrap_or(NodeId::ROOT)
    }

    fn current_tag_name(&self) -> Option<&str> {
        self.tree.tag_name(self.current_node())
    }

    fn insert(&mut self, node: NodeId) {
        let parent = self.current_node();
        self.tree.append_child(parent, node);
    }

    /// Consecutive character tokens become a single text node.
    fn flush_text(&mut self) {
        if self.pending_text.is_empty() {
            return;
        }
        let text = std::mem::take(&mut self.pending_text);
        let node = self.tree.alloc(NodeType::Text(text));
        self.insert(node);
    }

    /// Record a parse error. Logs once per distinct message.
    fn parse_error(&mut self, message: &str) {
        warn_once("HTML Parser", message);
        self.issues.push(ParseIssue {
            message: message.to_string(),
            token_index: self.token_index,
        });
    }
}
