//! Editor affordances
//!
//! Every visual hint the runtime adds is written to the element's overlay,
//! never to its attributes, so the serialized markup cannot carry them.

use livepage_dom::Node;

pub const HOVER_OUTLINE: &str = "2px dashed #3b82f6";
pub const SELECTION_OUTLINE: &str = "2px solid #3b82f6";
pub const OUTLINE_OFFSET: &str = "2px";
pub const DRAG_OPACITY: &str = "0.5";

pub fn show_hover(node: &Node) {
    if let Some(mut overlay) = node.overlay_mut() {
        overlay.styles.set("outline", HOVER_OUTLINE);
        overlay.styles.set("outline-offset", OUTLINE_OFFSET);
    }
}

pub fn clear_hover(node: &Node) {
    if let Some(mut overlay) = node.overlay_mut() {
        overlay.styles.remove("outline");
        overlay.styles.remove("outline-offset");
    }
}

pub fn show_selection(node: &Node) {
    if let Some(mut overlay) = node.overlay_mut() {
        overlay.styles.set("outline", SELECTION_OUTLINE);
        overlay.styles.set("outline-offset", OUTLINE_OFFSET);
        overlay.editable = true;
    }
}

pub fn clear_selection(node: &Node) {
    if let Some(mut overlay) = node.overlay_mut() {
        overlay.styles.remove("outline");
        overlay.styles.remove("outline-offset");
        overlay.editable = false;
    }
}

pub fn show_dragging(node: &Node) {
    if let Some(mut overlay) = node.overlay_mut() {
        overlay.styles.set("opacity", DRAG_OPACITY);
        overlay.inert = true;
    }
}

pub fn clear_dragging(node: &Node) {
    if let Some(mut overlay) = node.overlay_mut() {
        overlay.styles.remove("opacity");
        overlay.inert = false;
    }
}
