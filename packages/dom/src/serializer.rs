//! Markup serializer
//!
//! Emits the markup of a tree exactly as it stands: attributes in stored
//! order, text re-escaped, raw-text elements verbatim. Editor overlays are
//! never emitted. Output is deterministic, so serializing an unchanged tree
//! twice yields identical strings.

use crate::document::Document;
use crate::node::{Node, NodeData, NodeRef};
use crate::parser::is_void_element;
use crate::tokenizer::RAW_TEXT_ELEMENTS;

type SkipFn<'a> = Box<dyn Fn(&Node) -> bool + 'a>;

pub struct Serializer<'a> {
    skip: Option<SkipFn<'a>>,
}

impl<'a> Serializer<'a> {
    pub fn new() -> Self {
        Self { skip: None }
    }

    /// Omit every node (and its subtree) matching `predicate`
    pub fn skip_when(mut self, predicate: impl Fn(&Node) -> bool + 'a) -> Self {
        self.skip = Some(Box::new(predicate));
        self
    }

    /// Serialize a whole document, doctype first
    pub fn serialize_document(&self, document: &Document) -> String {
        let mut out = String::new();
        for child in document.root().children() {
            if self.skipped(&child) {
                continue;
            }
            self.write_node(&child, &mut out);
            if matches!(child.data(), NodeData::Doctype(_)) {
                out.push('\n');
            }
        }
        out
    }

    /// Serialize a node including its own tags (`outerHTML`)
    pub fn serialize_node(&self, node: &NodeRef) -> String {
        let mut out = String::new();
        if !self.skipped(node) {
            self.write_node(node, &mut out);
        }
        out
    }

    /// Serialize only the children of a node (`innerHTML`)
    pub fn serialize_children(&self, node: &NodeRef) -> String {
        let mut out = String::new();
        self.write_children(node, &mut out);
        out
    }

    fn skipped(&self, node: &Node) -> bool {
        self.skip.as_ref().map(|f| f(node)).unwrap_or(false)
    }

    fn write_children(&self, node: &Node, out: &mut String) {
        for child in node.children() {
            if !self.skipped(&child) {
                self.write_node(&child, out);
            }
        }
    }

    fn write_node(&self, node: &Node, out: &mut String) {
        match node.data() {
            NodeData::Document => self.write_children(node, out),
            NodeData::Doctype(name) => {
                out.push_str("<!DOCTYPE ");
                out.push_str(name);
                out.push('>');
            }
            NodeData::Comment(text) => {
                out.push_str("<!--");
                out.push_str(text);
                out.push_str("-->");
            }
            NodeData::Text(_) => {
                let raw_parent = node
                    .parent()
                    .and_then(|p| p.tag_name().map(|t| RAW_TEXT_ELEMENTS.contains(&t)))
                    .unwrap_or(false);
                let text = node.text_content();
                if raw_parent {
                    out.push_str(&text);
                } else {
                    escape_text(&text, out);
                }
            }
            NodeData::Element(el) => {
                out.push('<');
                out.push_str(el.tag());
                for attr in node.attributes() {
                    out.push(' ');
                    out.push_str(&attr.name);
                    out.push_str("=\"");
                    escape_attribute(&attr.value, out);
                    out.push('"');
                }
                out.push('>');

                if is_void_element(el.tag()) {
                    return;
                }

                self.write_children(node, out);
                out.push_str("</");
                out.push_str(el.tag());
                out.push('>');
            }
        }
    }
}

impl Default for Serializer<'_> {
    fn default() -> Self {
        Self::new()
    }
}

/// Serialize a document with no filtering
pub fn serialize(document: &Document) -> String {
    Serializer::new().serialize_document(document)
}

fn escape_text(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(ch),
        }
    }
}

fn escape_attribute(value: &str, out: &mut String) {
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(ch),
        }
    }
}
