//! Geometry seam
//!
//! The runtime asks two questions of the rendering surface: where is an
//! element, and which element is under a point. [`Geometry`] answers them.
//! [`BlockLayout`] is the built-in answer: every rendered element is a
//! full-width block stacked below its previous sibling.

use livepage_dom::{is_void_element, Document, Node, NodeData, NodeId, NodeRef};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x < self.x + self.width
            && point.y >= self.y
            && point.y < self.y + self.height
    }

    pub fn mid_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

pub trait Geometry {
    /// Recompute boxes after the tree changed
    fn reflow(&mut self, document: &Document);

    /// Bounding box of a rendered element
    fn bounds(&self, node: &Node) -> Option<Rect>;

    /// Topmost element under `point`, ignoring inert subtrees
    fn hit_test(&self, document: &Document, point: Point) -> Option<NodeRef>;
}

/// Elements that never produce a box
const NON_RENDERED: &[&str] = &[
    "head", "script", "style", "template", "title", "meta", "link", "base", "noscript",
];

pub const LINE_HEIGHT: f64 = 24.0;
pub const CHAR_WIDTH: f64 = 8.0;
const DEFAULT_IMAGE_HEIGHT: f64 = 150.0;

#[derive(Debug, Clone)]
pub struct BlockLayout {
    viewport_width: f64,
    boxes: HashMap<NodeId, Rect>,
}

impl BlockLayout {
    pub fn new(viewport_width: f64) -> Self {
        Self {
            viewport_width,
            boxes: HashMap::new(),
        }
    }

    pub fn viewport_width(&self) -> f64 {
        self.viewport_width
    }

    fn is_rendered(node: &Node) -> bool {
        match node.tag_name() {
            Some(tag) if NON_RENDERED.contains(&tag) => false,
            Some(_) => node.style().get("display") != Some("none"),
            None => true,
        }
    }

    /// Lay out `node` with its top-left at (x, y); returns the height used
    fn layout_node(&mut self, node: &NodeRef, x: f64, y: f64, width: f64) -> f64 {
        match node.data() {
            NodeData::Text(_) => Self::text_height(&node.text_content(), width),
            NodeData::Element(_) => {
                if !Self::is_rendered(node) {
                    return 0.0;
                }
                let height = match node.tag_name() {
                    Some(tag) if is_void_element(tag) => Self::void_height(node, tag),
                    _ => {
                        let mut cursor = y;
                        for child in node.children() {
                            cursor += self.layout_node(&child, x, cursor, width);
                        }
                        cursor - y
                    }
                };
                self.boxes.insert(node.id(), Rect::new(x, y, width, height));
                height
            }
            NodeData::Document => {
                let mut cursor = y;
                for child in node.children() {
                    cursor += self.layout_node(&child, x, cursor, width);
                }
                cursor - y
            }
            NodeData::Doctype(_) | NodeData::Comment(_) => 0.0,
        }
    }

    fn text_height(text: &str, width: f64) -> f64 {
        let chars = text.split_whitespace().map(|w| w.chars().count() + 1).sum::<usize>();
        if chars == 0 {
            return 0.0;
        }
        let per_line = (width / CHAR_WIDTH).floor().max(1.0);
        ((chars - 1) as f64 / per_line).ceil().max(1.0) * LINE_HEIGHT
    }

    fn void_height(node: &Node, tag: &str) -> f64 {
        match tag {
            "img" => node
                .get_attribute("height")
                .and_then(|h| h.trim_end_matches("px").parse::<f64>().ok())
                .unwrap_or(DEFAULT_IMAGE_HEIGHT),
            "wbr" => 0.0,
            _ => LINE_HEIGHT,
        }
    }

    fn hit(&self, node: &NodeRef, point: Point) -> Option<NodeRef> {
        if node.is_inert() {
            return None;
        }
        let rect = self.boxes.get(&node.id())?;
        if !rect.contains(point) {
            return None;
        }
        node.element_children()
            .iter()
            .rev()
            .find_map(|child| self.hit(child, point))
            .or_else(|| Some(node.clone()))
    }
}

impl Default for BlockLayout {
    fn default() -> Self {
        Self::new(1024.0)
    }
}

impl Geometry for BlockLayout {
    fn reflow(&mut self, document: &Document) {
        self.boxes.clear();
        let root = document.root().clone();
        let width = self.viewport_width;
        self.layout_node(&root, 0.0, 0.0, width);
        tracing::trace!(boxes = self.boxes.len(), "reflow");
    }

    fn bounds(&self, node: &Node) -> Option<Rect> {
        self.boxes.get(&node.id()).copied()
    }

    fn hit_test(&self, document: &Document, point: Point) -> Option<NodeRef> {
        let html = document.document_element()?;
        self.hit(&html, point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use livepage_dom::{parse, select_first};

    fn page() -> Document {
        parse("<html><head><title>x</title></head><body><h1>Title</h1><p>one</p><p style=\"display: none\">gone</p><div><span>a</span><span>b</span></div></body></html>")
    }

    #[test]
    fn test_blocks_stack() {
        let doc = page();
        let mut layout = BlockLayout::new(800.0);
        layout.reflow(&doc);

        let h1 = select_first(doc.root(), "h1").unwrap().unwrap();
        let p = select_first(doc.root(), "p").unwrap().unwrap();
        let hidden = select_first(doc.root(), "p[1]").unwrap().unwrap();
        let div = select_first(doc.root(), "div").unwrap().unwrap();

        assert_eq!(layout.bounds(&h1), Some(Rect::new(0.0, 0.0, 800.0, LINE_HEIGHT)));
        assert_eq!(layout.bounds(&p), Some(Rect::new(0.0, LINE_HEIGHT, 800.0, LINE_HEIGHT)));
        assert_eq!(layout.bounds(&hidden), None);
        assert_eq!(layout.bounds(&div).map(|r| r.height), Some(2.0 * LINE_HEIGHT));
        assert_eq!(layout.bounds(&doc.head().unwrap()), None);
    }

    #[test]
    fn test_text_wraps() {
        assert_eq!(BlockLayout::text_height("   \n ", 100.0), 0.0);
        assert_eq!(BlockLayout::text_height("hello", 100.0), LINE_HEIGHT);
        // 12 chars per line at width 100
        assert_eq!(BlockLayout::text_height("aaaaa bbbbb ccccc", 100.0), 2.0 * LINE_HEIGHT);
    }

    #[test]
    fn test_hit_test_deepest() {
        let doc = page();
        let mut layout = BlockLayout::new(800.0);
        layout.reflow(&doc);

        let hit = layout.hit_test(&doc, Point::new(10.0, 3.5 * LINE_HEIGHT)).unwrap();
        assert!(hit.is_tag("span"));
        assert_eq!(hit.text_content(), "b");

        let below = layout.hit_test(&doc, Point::new(10.0, 100.0 * LINE_HEIGHT));
        assert!(below.is_none());
    }

    #[test]
    fn test_hit_test_skips_inert() {
        let doc = page();
        let mut layout = BlockLayout::new(800.0);
        layout.reflow(&doc);

        let div = select_first(doc.root(), "div").unwrap().unwrap();
        div.overlay_mut().unwrap().inert = true;
        let hit = layout.hit_test(&doc, Point::new(10.0, 3.5 * LINE_HEIGHT)).unwrap();
        assert!(hit.is_tag("body"));
    }
}
