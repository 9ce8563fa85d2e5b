//! Platform input events delivered to the runtime

use crate::layout::Point;
use livepage_dom::NodeRef;

#[derive(Debug, Clone)]
pub enum InputEvent {
    /// Pointer entered an element
    PointerOver { target: NodeRef },
    /// Pointer left an element
    PointerOut { target: NodeRef },
    PointerDown { target: NodeRef, point: Point },
    PointerMove { point: Point },
    PointerUp { point: Point },
    /// Content of the selected element changed through direct editing
    Input,
}

impl InputEvent {
    pub fn name(&self) -> &'static str {
        match self {
            InputEvent::PointerOver { .. } => "pointerover",
            InputEvent::PointerOut { .. } => "pointerout",
            InputEvent::PointerDown { .. } => "pointerdown",
            InputEvent::PointerMove { .. } => "pointermove",
            InputEvent::PointerUp { .. } => "pointerup",
            InputEvent::Input => "input",
        }
    }
}
