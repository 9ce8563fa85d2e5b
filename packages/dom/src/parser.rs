//! # Tree Builder
//!
//! Turns the token stream into a Live Document Tree. Parsing is lenient and
//! never fails: unmatched end tags are dropped and missing `<html>`/`<body>`
//! wrappers are synthesized so every document has a root container.

use crate::document::Document;
use crate::error::DomResult;
use crate::node::{Node, NodeData, NodeRef};
use crate::tokenizer::{tokenize, Token};
use std::rc::Rc;

/// Elements that never have children or an end tag
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Start tags that implicitly close an open `<p>`
const CLOSES_PARAGRAPH: &[&str] = &[
    "address", "article", "aside", "blockquote", "details", "div", "dl", "fieldset", "figure",
    "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "main", "nav", "ol",
    "p", "pre", "section", "table", "ul",
];

const HEAD_ELEMENTS: &[&str] = &["base", "link", "meta", "script", "style", "title", "noscript"];

pub fn is_void_element(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

/// Whether `child` can sit directly under `parent` and come back in the
/// same place when the markup is parsed again
pub fn can_contain(parent: &NodeRef, child: &NodeRef) -> bool {
    if parent.is_tag("p") && child.tag_name().is_some_and(|t| CLOSES_PARAGRAPH.contains(&t)) {
        return false;
    }
    !(has_exposed_item(child) && inside_list_item(parent))
}

/// An `li` that is not wrapped in its own list
fn has_exposed_item(node: &NodeRef) -> bool {
    if node.is_tag("li") {
        return true;
    }
    if node.is_tag("ul") || node.is_tag("ol") {
        return false;
    }
    node.children().iter().any(has_exposed_item)
}

fn inside_list_item(node: &NodeRef) -> bool {
    let mut current = Some(node.clone());
    while let Some(node) = current {
        if node.is_tag("li") {
            return true;
        }
        if node.is_tag("ul") || node.is_tag("ol") {
            return false;
        }
        current = node.parent();
    }
    false
}

/// Parse markup into a document
pub fn parse(source: &str) -> Document {
    let mut builder = TreeBuilder::new();
    for token in tokenize(source) {
        builder.process(token);
    }
    builder.finish()
}

/// Parse a markup fragment into detached nodes (for inserting new content)
pub fn parse_fragment(source: &str) -> Vec<NodeRef> {
    let holder = Node::new_element("template");
    let mut builder = TreeBuilder::with_root(holder.clone());
    for token in tokenize(source) {
        builder.process(token);
    }
    let nodes = holder.children();
    holder.remove_children();
    nodes
}

struct TreeBuilder {
    root: NodeRef,
    open: Vec<NodeRef>,
}

impl TreeBuilder {
    fn new() -> Self {
        Self::with_root(Node::new_document())
    }

    fn with_root(root: NodeRef) -> Self {
        Self {
            root,
            open: Vec::new(),
        }
    }

    fn current(&self) -> NodeRef {
        self.open.last().cloned().unwrap_or_else(|| self.root.clone())
    }

    fn process(&mut self, token: Token) {
        match token {
            Token::Doctype(name) => {
                let has_content = self.root.children().iter().any(|n| n.is_element());
                if self.open.is_empty() && !has_content && matches!(self.root.data(), NodeData::Document) {
                    self.attach(&self.root.clone(), Node::new_doctype(name));
                }
            }
            Token::StartTag {
                name,
                attributes,
                self_closing,
            } => {
                self.close_implied(&name);
                let element = Node::new_element_with_attributes(&name, attributes);
                let parent = self.current();
                self.attach(&parent, element.clone());
                if !self_closing && !is_void_element(&name) {
                    self.open.push(element);
                }
            }
            Token::EndTag(name) => {
                if let Some(pos) = self.open.iter().rposition(|n| n.is_tag(&name)) {
                    self.open.truncate(pos);
                } else {
                    tracing::trace!(tag = %name, "dropping unmatched end tag");
                }
            }
            Token::Text(text) | Token::RawText(text) => {
                let parent = self.current();
                if let Err(e) = parent.append_text(&text) {
                    tracing::debug!(error = %e, "dropping text");
                }
            }
            Token::Comment(text) => {
                let parent = self.current();
                self.attach(&parent, Node::new_comment(text));
            }
        }
    }

    fn close_implied(&mut self, tag: &str) {
        if CLOSES_PARAGRAPH.contains(&tag) && self.current().is_tag("p") {
            self.open.pop();
        }
        if tag == "li" {
            let boundary = self
                .open
                .iter()
                .rposition(|n| n.is_tag("ul") || n.is_tag("ol"))
                .map(|i| i + 1)
                .unwrap_or(0);
            if let Some(pos) = self.open[boundary..].iter().rposition(|n| n.is_tag("li")) {
                self.open.truncate(boundary + pos);
            }
        }
    }

    fn attach(&self, parent: &NodeRef, child: NodeRef) {
        logged(parent.append_child(child));
    }

    fn finish(self) -> Document {
        if matches!(self.root.data(), NodeData::Document) {
            ensure_structure(&self.root);
        }
        Document::from_root(self.root)
    }
}

/// Guarantee `#document > html > (head?, body)`.
fn ensure_structure(root: &NodeRef) {
    // whitespace between top-level nodes carries no meaning
    for node in root.children() {
        if node.is_text() && node.text_content().trim().is_empty() {
            node.detach();
        }
    }

    let html = match root.children().into_iter().find(|n| n.is_tag("html")) {
        Some(html) => html,
        None => {
            let html = Node::new_element("html");
            let stray: Vec<NodeRef> = root
                .children()
                .into_iter()
                .filter(|n| matches!(n.data(), NodeData::Element(_) | NodeData::Text(_)))
                .collect();
            match stray.first() {
                Some(first) => {
                    logged(first.insert_before(html.clone()));
                }
                None => {
                    logged(root.append_child(html.clone()));
                }
            }
            for node in stray {
                logged(html.append_child(node));
            }
            html
        }
    };

    let body = match html.children().into_iter().find(|n| n.is_tag("body")) {
        Some(body) => body,
        None => synthesize_body(&html),
    };

    // content after </html> belongs in the body
    for node in root.children() {
        let is_content = matches!(node.data(), NodeData::Element(_) | NodeData::Text(_));
        if is_content && !Rc::ptr_eq(&node, &html) {
            logged(body.append_child(node));
        }
    }
}

fn logged(result: DomResult<()>) {
    if let Err(e) = result {
        tracing::debug!(error = %e, "dropping node");
    }
}

fn synthesize_body(html: &NodeRef) -> NodeRef {
    let body = Node::new_element("body");
    let has_head = html.children().iter().any(|n| n.is_tag("head"));
    let mut head_seen = false;

    for node in html.children() {
        if node.is_tag("head") {
            head_seen = true;
            continue;
        }
        let belongs_in_head = !has_head
            && !head_seen
            && body.child_count() == 0
            && node.tag_name().map(|t| HEAD_ELEMENTS.contains(&t)).unwrap_or(false);
        if belongs_in_head {
            continue;
        }
        if node.is_text() && node.text_content().trim().is_empty() && body.child_count() == 0 {
            node.detach();
            continue;
        }
        logged(body.append_child(node));
    }
    logged(html.append_child(body.clone()));
    body
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_document() {
        let doc = parse("<!DOCTYPE html><html><head><title>T</title></head><body><p>Hi</p></body></html>");
        assert_eq!(doc.doctype().as_deref(), Some("html"));
        let body = doc.body().unwrap();
        let p = body.first_child().unwrap();
        assert!(p.is_tag("p"));
        assert_eq!(p.text_content(), "Hi");
        assert_eq!(doc.head().unwrap().text_content(), "T");
    }

    #[test]
    fn test_fragment_gets_wrapped() {
        let doc = parse("<p>One</p><p>Two</p>");
        let body = doc.body().unwrap();
        assert_eq!(body.element_children().len(), 2);
        assert!(doc.document_element().is_some());
    }

    #[test]
    fn test_html_without_body() {
        let doc = parse("<html><head><meta charset=\"utf-8\"></head><div>x</div></html>");
        let body = doc.body().unwrap();
        assert!(body.first_child().unwrap().is_tag("div"));
        assert_eq!(doc.head().unwrap().element_children().len(), 1);
    }

    #[test]
    fn test_void_elements_have_no_children() {
        let doc = parse("<body><img src=\"a.png\"><p>after</p></body>");
        let body = doc.body().unwrap();
        let children = body.element_children();
        assert!(children[0].is_tag("img"));
        assert_eq!(children[0].child_count(), 0);
        assert!(children[1].is_tag("p"));
    }

    #[test]
    fn test_paragraph_implicitly_closed() {
        let doc = parse("<body><p>one<div>two</div></body>");
        let body = doc.body().unwrap();
        assert_eq!(body.element_children().len(), 2);
    }

    #[test]
    fn test_list_items_close_each_other() {
        let doc = parse("<ul><li>a<li>b</ul>");
        let ul = doc.elements_by_tag("ul").pop().unwrap();
        assert_eq!(ul.element_children().len(), 2);
    }

    #[test]
    fn test_unmatched_end_tag_ignored() {
        let doc = parse("<body><div>x</span></div></body>");
        let div = doc.elements_by_tag("div").pop().unwrap();
        assert_eq!(div.text_content(), "x");
    }

    #[test]
    fn test_can_contain_follows_implied_closes() {
        let doc = parse("<body><p>Hi <span>x</span></p><ul><li>a</li></ul></body>");
        let p = doc.elements_by_tag("p").pop().unwrap();
        let span = doc.elements_by_tag("span").pop().unwrap();
        let li = doc.elements_by_tag("li").pop().unwrap();
        let body = doc.body().unwrap();

        assert!(!can_contain(&p, &Node::new_element("div")));
        assert!(can_contain(&span, &Node::new_element("div")));
        assert!(can_contain(&p, &Node::new_element("em")));
        assert!(can_contain(&body, &Node::new_element("div")));

        let wrapper = Node::new_element("div");
        wrapper.append_child(Node::new_element("li")).unwrap();
        assert!(!can_contain(&li, &wrapper));
        assert!(can_contain(&li, &Node::new_element("ul")));
        assert!(can_contain(&body, &wrapper));
    }

    #[test]
    fn test_parse_fragment() {
        let nodes = parse_fragment("<b>x</b> tail");
        assert_eq!(nodes.len(), 2);
        assert!(nodes[0].parent().is_none());
    }
}
