//! Interaction state

use crate::layout::Point;
use livepage_dom::NodeRef;
use std::rc::Rc;
use std::time::Instant;

/// A press that may become a drag
#[derive(Debug, Clone)]
pub struct DragSession {
    pub origin: NodeRef,
    pub start: Point,
    /// Set once the pointer travels past the threshold
    pub dragging: bool,
}

impl DragSession {
    pub fn new(origin: NodeRef, start: Point) -> Self {
        Self {
            origin,
            start,
            dragging: false,
        }
    }

    pub fn exceeds(&self, point: Point, threshold: f64) -> bool {
        self.start.distance_to(point) > threshold
    }
}

/// Observable phase of the pointer state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Edit mode off
    Disabled,
    Idle,
    Hovering,
    Pressed,
    Dragging,
}

/// Text edits waiting to be synchronized
#[derive(Debug, Clone, Default)]
pub(crate) struct TextSyncState {
    pub pending: bool,
    pub last_emit: Option<Instant>,
}

#[derive(Debug, Default)]
pub(crate) struct InteractionState {
    pub hover: Option<NodeRef>,
    pub selection: Option<NodeRef>,
    pub drag: Option<DragSession>,
    pub text: TextSyncState,
}

impl InteractionState {
    pub fn is_selected(&self, node: &NodeRef) -> bool {
        self.selection.as_ref().is_some_and(|s| Rc::ptr_eq(s, node))
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.as_ref().is_some_and(|d| d.dragging)
    }

    pub fn phase(&self, edit_mode: bool) -> Phase {
        if !edit_mode {
            return Phase::Disabled;
        }
        match (&self.drag, &self.hover) {
            (Some(drag), _) if drag.dragging => Phase::Dragging,
            (Some(_), _) => Phase::Pressed,
            (None, Some(_)) => Phase::Hovering,
            (None, None) => Phase::Idle,
        }
    }
}
