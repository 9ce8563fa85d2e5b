//! Document handle: the root of a Live Document Tree

use crate::node::{Node, NodeData, NodeId, NodeRef};

/// A parsed document. The root node owns the whole tree.
#[derive(Debug)]
pub struct Document {
    root: NodeRef,
}

impl Document {
    /// Empty document with no children
    pub fn new() -> Self {
        Self {
            root: Node::new_document(),
        }
    }

    pub(crate) fn from_root(root: NodeRef) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &NodeRef {
        &self.root
    }

    pub fn doctype(&self) -> Option<String> {
        self.root.children().into_iter().find_map(|n| match n.data() {
            NodeData::Doctype(name) => Some(name.clone()),
            _ => None,
        })
    }

    /// The `<html>` element
    pub fn document_element(&self) -> Option<NodeRef> {
        self.root
            .children()
            .into_iter()
            .find(|n| n.is_tag("html"))
    }

    pub fn head(&self) -> Option<NodeRef> {
        self.document_element()?
            .children()
            .into_iter()
            .find(|n| n.is_tag("head"))
    }

    /// The root container every editable element lives in
    pub fn body(&self) -> Option<NodeRef> {
        self.document_element()?
            .children()
            .into_iter()
            .find(|n| n.is_tag("body"))
    }

    pub fn find(&self, id: NodeId) -> Option<NodeRef> {
        self.root.find_descendant(id)
    }

    /// All element nodes in document order
    pub fn elements(&self) -> Vec<NodeRef> {
        self.root
            .descendants()
            .into_iter()
            .filter(|n| n.is_element())
            .collect()
    }

    pub fn elements_by_tag(&self, tag: &str) -> Vec<NodeRef> {
        self.elements().into_iter().filter(|n| n.is_tag(tag)).collect()
    }

    /// True when `node` is the document, `<html>` or `<body>`
    pub fn is_root_container(&self, node: &NodeRef) -> bool {
        matches!(node.data(), NodeData::Document) || node.is_tag("html") || node.is_tag("body")
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
