//! # Live Document Tree
//!
//! Parents own their children (`Vec<Rc<Node>>`); children point back at their
//! parent through a `Weak` reference that is only used for traversal. Dropping
//! a detached subtree frees it.
//!
//! Every element also carries an editor [`Overlay`]: presentation state that
//! is rendered while editing but is never part of the markup.

use crate::error::{DomError, DomResult};
use crate::style::StyleDeclarations;
use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

pub type NodeRef = Rc<Node>;

static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique node identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    fn next() -> Self {
        NodeId(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Editor-only presentation state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overlay {
    /// Styles layered over the element's own inline style
    pub styles: StyleDeclarations,
    /// Element accepts direct text editing
    pub editable: bool,
    /// Element ignores pointer hit-testing
    pub inert: bool,
}

impl Overlay {
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty() && !self.editable && !self.inert
    }

    pub fn clear(&mut self) {
        *self = Overlay::default();
    }
}

#[derive(Debug)]
pub struct ElementData {
    tag: String,
    attributes: RefCell<Vec<Attribute>>,
    overlay: RefCell<Overlay>,
}

impl ElementData {
    pub fn tag(&self) -> &str {
        &self.tag
    }
}

#[derive(Debug)]
pub enum NodeData {
    Document,
    Doctype(String),
    Element(ElementData),
    Text(RefCell<String>),
    Comment(String),
}

#[derive(Debug)]
pub struct Node {
    id: NodeId,
    parent: RefCell<Weak<Node>>,
    children: RefCell<Vec<NodeRef>>,
    data: NodeData,
}

impl Node {
    fn with_data(data: NodeData) -> NodeRef {
        Rc::new(Node {
            id: NodeId::next(),
            parent: RefCell::new(Weak::new()),
            children: RefCell::new(Vec::new()),
            data,
        })
    }

    pub fn new_document() -> NodeRef {
        Self::with_data(NodeData::Document)
    }

    pub fn new_doctype(name: impl Into<String>) -> NodeRef {
        Self::with_data(NodeData::Doctype(name.into()))
    }

    /// Create an element. Tag names are stored lower-case.
    pub fn new_element(tag: &str) -> NodeRef {
        Self::with_data(NodeData::Element(ElementData {
            tag: tag.to_ascii_lowercase(),
            attributes: RefCell::new(Vec::new()),
            overlay: RefCell::new(Overlay::default()),
        }))
    }

    pub fn new_element_with_attributes(tag: &str, attributes: Vec<Attribute>) -> NodeRef {
        let node = Self::new_element(tag);
        for attr in attributes {
            node.set_attribute(&attr.name, &attr.value);
        }
        node
    }

    pub fn new_text(content: impl Into<String>) -> NodeRef {
        Self::with_data(NodeData::Text(RefCell::new(content.into())))
    }

    pub fn new_comment(content: impl Into<String>) -> NodeRef {
        Self::with_data(NodeData::Comment(content.into()))
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn data(&self) -> &NodeData {
        &self.data
    }

    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(el) => Some(el),
            _ => None,
        }
    }

    pub fn is_element(&self) -> bool {
        self.as_element().is_some()
    }

    pub fn is_text(&self) -> bool {
        matches!(self.data, NodeData::Text(_))
    }

    /// Lower-case tag name for elements
    pub fn tag_name(&self) -> Option<&str> {
        self.as_element().map(|el| el.tag())
    }

    pub fn is_tag(&self, tag: &str) -> bool {
        self.tag_name().map(|t| t.eq_ignore_ascii_case(tag)).unwrap_or(false)
    }

    fn can_have_children(&self) -> bool {
        matches!(self.data, NodeData::Document | NodeData::Element(_))
    }

    // ── Traversal ───────────────────────────────────────────────────────

    pub fn parent(&self) -> Option<NodeRef> {
        self.parent.borrow().upgrade()
    }

    pub fn children(&self) -> Vec<NodeRef> {
        self.children.borrow().clone()
    }

    pub fn child_count(&self) -> usize {
        self.children.borrow().len()
    }

    pub fn element_children(&self) -> Vec<NodeRef> {
        self.children
            .borrow()
            .iter()
            .filter(|c| c.is_element())
            .cloned()
            .collect()
    }

    pub fn first_child(&self) -> Option<NodeRef> {
        self.children.borrow().first().cloned()
    }

    pub fn last_child(&self) -> Option<NodeRef> {
        self.children.borrow().last().cloned()
    }

    pub fn index_in_parent(&self) -> Option<usize> {
        let parent = self.parent()?;
        let siblings = parent.children.borrow();
        siblings.iter().position(|c| std::ptr::eq(c.as_ref(), self))
    }

    /// Ancestors from the parent up to the document root
    pub fn ancestors(&self) -> Vec<NodeRef> {
        let mut out = Vec::new();
        let mut current = self.parent();
        while let Some(node) = current {
            current = node.parent();
            out.push(node);
        }
        out
    }

    /// True when `self` is `other` or one of its ancestors
    pub fn is_inclusive_ancestor_of(&self, other: &Node) -> bool {
        if std::ptr::eq(self, other) {
            return true;
        }
        other.ancestors().iter().any(|a| std::ptr::eq(a.as_ref(), self))
    }

    /// Depth-first pre-order traversal, excluding `self`
    pub fn descendants(&self) -> Vec<NodeRef> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeRef> = self.children().into_iter().rev().collect();
        while let Some(node) = stack.pop() {
            stack.extend(node.children().into_iter().rev());
            out.push(node);
        }
        out
    }

    pub fn find_descendant(&self, id: NodeId) -> Option<NodeRef> {
        self.descendants().into_iter().find(|n| n.id == id)
    }

    // ── Mutation ────────────────────────────────────────────────────────

    /// Append `child` as the last child of `self`, moving it if attached elsewhere.
    pub fn append_child(self: &Rc<Self>, child: NodeRef) -> DomResult<()> {
        self.check_insertion(&child)?;
        child.detach();
        *child.parent.borrow_mut() = Rc::downgrade(self);
        self.children.borrow_mut().push(child);
        Ok(())
    }

    /// Insert `new` immediately before `self` in its parent.
    pub fn insert_before(self: &Rc<Self>, new: NodeRef) -> DomResult<()> {
        self.insert_sibling(new, 0)
    }

    /// Insert `new` immediately after `self` in its parent.
    pub fn insert_after(self: &Rc<Self>, new: NodeRef) -> DomResult<()> {
        self.insert_sibling(new, 1)
    }

    fn insert_sibling(self: &Rc<Self>, new: NodeRef, offset: usize) -> DomResult<()> {
        if Rc::ptr_eq(self, &new) {
            return Err(DomError::HierarchyRequest(
                "cannot insert a node next to itself".to_string(),
            ));
        }
        let parent = self.parent().ok_or(DomError::Detached)?;
        parent.check_insertion(&new)?;

        new.detach();
        let index = self.index_in_parent().ok_or(DomError::Detached)? + offset;
        *new.parent.borrow_mut() = Rc::downgrade(&parent);
        parent.children.borrow_mut().insert(index, new);
        Ok(())
    }

    fn check_insertion(&self, child: &Node) -> DomResult<()> {
        if !self.can_have_children() {
            return Err(DomError::NotAContainer(format!("{}", self.id)));
        }
        if matches!(child.data, NodeData::Document) {
            return Err(DomError::HierarchyRequest(
                "a document cannot be inserted".to_string(),
            ));
        }
        if child.is_inclusive_ancestor_of(self) {
            return Err(DomError::HierarchyRequest(format!(
                "{} is an ancestor of {}",
                child.id, self.id
            )));
        }
        Ok(())
    }

    /// Remove `self` from its parent. No-op when already detached.
    pub fn detach(&self) {
        let Some(parent) = self.parent() else {
            return;
        };
        parent
            .children
            .borrow_mut()
            .retain(|c| !std::ptr::eq(c.as_ref(), self));
        *self.parent.borrow_mut() = Weak::new();
    }

    pub fn remove_children(&self) {
        let children = std::mem::take(&mut *self.children.borrow_mut());
        for child in children {
            *child.parent.borrow_mut() = Weak::new();
        }
    }

    // ── Text ────────────────────────────────────────────────────────────

    /// Concatenated text of all descendant text nodes
    pub fn text_content(&self) -> String {
        match &self.data {
            NodeData::Text(text) => text.borrow().clone(),
            NodeData::Comment(_) | NodeData::Doctype(_) => String::new(),
            _ => {
                let mut out = String::new();
                for node in self.descendants() {
                    if let NodeData::Text(text) = &node.data {
                        out.push_str(&text.borrow());
                    }
                }
                out
            }
        }
    }

    /// Replace all children with a single text node (or the text itself for text nodes)
    pub fn set_text_content(self: &Rc<Self>, content: &str) {
        match &self.data {
            NodeData::Text(text) => *text.borrow_mut() = content.to_string(),
            NodeData::Element(_) | NodeData::Document => {
                self.remove_children();
                if !content.is_empty() {
                    let text = Node::new_text(content);
                    *text.parent.borrow_mut() = Rc::downgrade(self);
                    self.children.borrow_mut().push(text);
                }
            }
            _ => {}
        }
    }

    /// Append text, merging with a trailing text node when present.
    pub fn append_text(self: &Rc<Self>, content: &str) -> DomResult<()> {
        if let Some(last) = self.last_child() {
            if let NodeData::Text(text) = &last.data {
                text.borrow_mut().push_str(content);
                return Ok(());
            }
        }
        self.append_child(Node::new_text(content))
    }

    // ── Attributes ──────────────────────────────────────────────────────

    pub fn attributes(&self) -> Vec<Attribute> {
        self.as_element()
            .map(|el| el.attributes.borrow().clone())
            .unwrap_or_default()
    }

    pub fn get_attribute(&self, name: &str) -> Option<String> {
        let el = self.as_element()?;
        let attrs = el.attributes.borrow();
        attrs
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
            .map(|a| a.value.clone())
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.get_attribute(name).is_some()
    }

    /// Set an attribute, keeping its original position when it already exists.
    pub fn set_attribute(&self, name: &str, value: &str) {
        let Some(el) = self.as_element() else {
            return;
        };
        let name = name.to_ascii_lowercase();
        let mut attrs = el.attributes.borrow_mut();
        match attrs.iter_mut().find(|a| a.name == name) {
            Some(existing) => existing.value = value.to_string(),
            None => attrs.push(Attribute::new(name, value)),
        }
    }

    pub fn remove_attribute(&self, name: &str) -> Option<String> {
        let el = self.as_element()?;
        let mut attrs = el.attributes.borrow_mut();
        let pos = attrs.iter().position(|a| a.name.eq_ignore_ascii_case(name))?;
        Some(attrs.remove(pos).value)
    }

    pub fn classes(&self) -> Vec<String> {
        self.get_attribute("class")
            .map(|c| c.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes().iter().any(|c| c == class)
    }

    // ── Inline style ────────────────────────────────────────────────────

    pub fn style(&self) -> StyleDeclarations {
        self.get_attribute("style")
            .map(|s| StyleDeclarations::parse(&s))
            .unwrap_or_default()
    }

    /// Set one inline style property, rewriting the `style` attribute.
    pub fn set_style_property(&self, property: &str, value: &str) {
        if !self.is_element() {
            return;
        }
        let mut style = self.style();
        style.set(property, value);
        if style.is_empty() {
            self.remove_attribute("style");
        } else {
            self.set_attribute("style", &style.to_string());
        }
    }

    // ── Editor overlay ──────────────────────────────────────────────────

    pub fn overlay(&self) -> Option<Ref<'_, Overlay>> {
        self.as_element().map(|el| el.overlay.borrow())
    }

    pub fn overlay_mut(&self) -> Option<RefMut<'_, Overlay>> {
        self.as_element().map(|el| el.overlay.borrow_mut())
    }

    /// Inline style with the overlay applied on top
    pub fn rendered_style(&self) -> StyleDeclarations {
        let base = self.style();
        match self.overlay() {
            Some(overlay) if !overlay.styles.is_empty() => base.merged_with(&overlay.styles),
            _ => base,
        }
    }

    pub fn is_inert(&self) -> bool {
        self.overlay().map(|o| o.inert).unwrap_or(false)
            || self.style().get("pointer-events") == Some("none")
    }
}
