//! # Document Runtime
//!
//! Lives inside the sandbox next to the rendered page. It turns pointer and
//! text input into structural edits, applies controller commands, and sends
//! a clean snapshot of the page back after every change.
//!
//! ```text
//!            pointer-down            move > threshold
//!   Idle ──────────────────▶ Pressed ─────────────────▶ Dragging
//!    ▲                          │                          │
//!    │        pointer-up        │        pointer-up        │
//!    └──── (select element) ◀───┘   (drop before/after) ◀──┘
//! ```
//!
//! Edit mode gates everything pointer-driven. Turning it off clears every
//! affordance and the selection.

use crate::affordance::{
    clear_dragging, clear_hover, clear_selection, show_dragging, show_hover, show_selection,
};
use crate::cleanup::serialize_clean;
use crate::colors::resolve_colors;
use crate::config::{RuntimeConfig, TextSync};
use crate::event::InputEvent;
use crate::inject::is_runtime_node;
use crate::layout::{BlockLayout, Geometry, Point, Rect};
use crate::state::{DragSession, InteractionState, Phase};
use livepage_dom::{can_contain, is_void_element, parse, Document, Node, NodeRef};
use livepage_protocol::{
    ControllerMessage, NewElement, RuntimeMessage, SandboxPort, SelectionInfo, StyleUpdate,
};
use std::rc::Rc;
use std::time::Instant;

pub struct DocumentRuntime {
    document: Document,
    port: SandboxPort,
    config: RuntimeConfig,
    geometry: Box<dyn Geometry>,
    layout_dirty: bool,
    edit_mode: bool,
    state: InteractionState,
}

impl DocumentRuntime {
    /// Build the live tree from rendered markup using the block layout
    pub fn boot(markup: &str, port: SandboxPort, config: RuntimeConfig) -> Self {
        let geometry = Box::new(BlockLayout::new(config.viewport_width));
        Self::with_geometry(markup, port, config, geometry)
    }

    pub fn with_geometry(
        markup: &str,
        port: SandboxPort,
        config: RuntimeConfig,
        geometry: Box<dyn Geometry>,
    ) -> Self {
        let document = parse(markup);
        tracing::debug!(elements = document.elements().len(), "runtime booted");
        Self {
            document,
            port,
            config,
            geometry,
            layout_dirty: true,
            edit_mode: false,
            state: InteractionState::default(),
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn edit_mode(&self) -> bool {
        self.edit_mode
    }

    pub fn phase(&self) -> Phase {
        self.state.phase(self.edit_mode)
    }

    pub fn hovered(&self) -> Option<&NodeRef> {
        self.state.hover.as_ref()
    }

    pub fn selected(&self) -> Option<&NodeRef> {
        self.state.selection.as_ref()
    }

    pub fn drag_session(&self) -> Option<&DragSession> {
        self.state.drag.as_ref()
    }

    /// True once the controller side of the channel is gone
    pub fn is_orphaned(&self) -> bool {
        self.port.is_closed()
    }

    /// Current canonical markup of the page
    pub fn snapshot(&self) -> String {
        serialize_clean(&self.document)
    }

    pub fn query_selection(&self) -> Option<SelectionInfo> {
        self.state.selection.as_ref().map(selection_info)
    }

    pub fn bounds(&mut self, node: &Node) -> Option<Rect> {
        self.ensure_layout();
        self.geometry.bounds(node)
    }

    pub fn element_at(&mut self, point: Point) -> Option<NodeRef> {
        self.ensure_layout();
        self.geometry.hit_test(&self.document, point)
    }

    // ── Inbound commands ────────────────────────────────────────────────

    /// Apply every queued controller message in arrival order
    pub fn pump(&mut self) -> usize {
        let messages = self.port.drain();
        let count = messages.len();
        for message in messages {
            self.handle(message);
        }
        count
    }

    pub fn handle(&mut self, message: ControllerMessage) {
        tracing::debug!(kind = message.kind(), "controller message");
        match message {
            ControllerMessage::SetEditMode(enabled) => self.set_edit_mode(enabled),
            ControllerMessage::AddElement(element) => self.apply_add_element(&element),
            ControllerMessage::UpdateStyle(update) => self.apply_style_update(&update),
            ControllerMessage::DeleteElement => self.apply_delete(),
        }
    }

    pub fn set_edit_mode(&mut self, enabled: bool) {
        if self.edit_mode == enabled {
            return;
        }
        if !enabled {
            self.flush_text();
            if let Some(drag) = self.state.drag.take() {
                clear_dragging(&drag.origin);
            }
            if let Some(hover) = self.state.hover.take() {
                clear_hover(&hover);
            }
            if let Some(selected) = self.state.selection.take() {
                clear_selection(&selected);
            }
        }
        self.edit_mode = enabled;
        tracing::debug!(enabled, "edit mode");
    }

    /// Insert a new element after the selection, or at the end of the body
    pub fn apply_add_element(&mut self, spec: &NewElement) {
        let tag = spec.tag.trim().to_ascii_lowercase();
        if !is_valid_tag(&tag) {
            tracing::warn!(tag = %spec.tag, "ignoring element with invalid tag name");
            return;
        }

        let element = Node::new_element(&tag);
        let classes = spec.classes.split_whitespace().collect::<Vec<_>>().join(" ");
        if !classes.is_empty() {
            element.set_attribute("class", &classes);
        }
        if !spec.text.is_empty() && !is_void_element(&tag) {
            element.set_text_content(&spec.text);
        }

        let anchor = self
            .state
            .selection
            .clone()
            .and_then(|selected| self.placement_anchor(selected, &element));
        let result = match (anchor, self.document.body()) {
            (Some(selected), _) => selected.insert_after(element),
            (None, Some(body)) => body.append_child(element),
            (None, None) => {
                tracing::warn!("document has no body to add elements to");
                return;
            }
        };

        match result {
            Ok(()) => {
                tracing::debug!(tag = %tag, "element added");
                self.tree_changed();
            }
            Err(e) => tracing::warn!(error = %e, "failed to add element"),
        }
    }

    pub fn apply_style_update(&mut self, update: &StyleUpdate) {
        let Some(selected) = self.state.selection.clone() else {
            tracing::trace!("style update without selection");
            return;
        };
        let property = css_property_name(&update.property);
        if property.is_empty() {
            return;
        }
        selected.set_style_property(&property, &update.value);
        tracing::debug!(property = %property, value = %update.value, "style updated");
        self.tree_changed();
    }

    pub fn apply_delete(&mut self) {
        let Some(selected) = self.state.selection.take() else {
            tracing::trace!("delete without selection");
            return;
        };
        clear_selection(&selected);

        if let Some(hover) = self.state.hover.take() {
            if selected.is_inclusive_ancestor_of(&hover) {
                clear_hover(&hover);
            } else {
                self.state.hover = Some(hover);
            }
        }
        if let Some(drag) = self.state.drag.take() {
            if selected.is_inclusive_ancestor_of(&drag.origin) {
                clear_dragging(&drag.origin);
            } else {
                self.state.drag = Some(drag);
            }
        }

        selected.detach();
        tracing::debug!(node = %selected.id(), "element deleted");
        self.tree_changed();
    }

    // ── Pointer input ───────────────────────────────────────────────────

    pub fn dispatch(&mut self, event: InputEvent) {
        tracing::trace!(event = event.name(), "input");
        match event {
            InputEvent::PointerOver { target } => self.on_hover(&target),
            InputEvent::PointerOut { target } => self.on_hover_leave(&target),
            InputEvent::PointerDown { target, point } => self.on_pointer_down(&target, point),
            InputEvent::PointerMove { point } => self.on_pointer_move(point),
            InputEvent::PointerUp { point } => self.on_pointer_up(point),
            InputEvent::Input => self.on_text_edited(),
        }
    }

    pub fn on_hover(&mut self, target: &NodeRef) {
        if !self.edit_mode || self.state.is_dragging() || !self.is_candidate(target) {
            return;
        }
        if let Some(previous) = self.state.hover.take() {
            if !self.state.is_selected(&previous) {
                clear_hover(&previous);
            }
        }
        if self.state.is_selected(target) {
            return;
        }
        show_hover(target);
        self.state.hover = Some(target.clone());
    }

    pub fn on_hover_leave(&mut self, target: &NodeRef) {
        let hovered = self
            .state
            .hover
            .as_ref()
            .is_some_and(|h| Rc::ptr_eq(h, target));
        if !hovered {
            return;
        }
        self.state.hover = None;
        if !self.state.is_selected(target) {
            clear_hover(target);
        }
    }

    pub fn on_pointer_down(&mut self, target: &NodeRef, point: Point) {
        if !self.edit_mode || !self.is_candidate(target) {
            return;
        }
        self.state.drag = Some(DragSession::new(target.clone(), point));
    }

    pub fn on_pointer_move(&mut self, point: Point) {
        let threshold = self.config.drag_threshold;
        let Some(drag) = self.state.drag.as_mut() else {
            return;
        };
        if drag.dragging || !drag.exceeds(point, threshold) {
            return;
        }
        drag.dragging = true;
        let origin = drag.origin.clone();

        show_dragging(&origin);
        if let Some(hover) = self.state.hover.take() {
            if !self.state.is_selected(&hover) {
                clear_hover(&hover);
            }
        }
        tracing::debug!(node = %origin.id(), "drag started");
    }

    pub fn on_pointer_up(&mut self, point: Point) {
        self.flush_text();
        let Some(drag) = self.state.drag.take() else {
            return;
        };
        if drag.dragging {
            self.drop_at(&drag.origin, point);
        } else {
            self.select(&drag.origin);
        }
    }

    // ── Text editing ────────────────────────────────────────────────────

    /// The selected element's content changed through direct editing
    pub fn on_text_edited(&mut self) {
        self.on_text_edited_at(Instant::now());
    }

    pub fn on_text_edited_at(&mut self, now: Instant) {
        let editable = self
            .state
            .selection
            .as_ref()
            .and_then(|s| s.overlay().map(|o| o.editable))
            .unwrap_or(false);
        if !self.edit_mode || !editable {
            return;
        }
        self.layout_dirty = true;

        match self.config.text_sync() {
            TextSync::Immediate => self.emit_snapshot_at(now),
            TextSync::Coalesce(interval) => {
                let due = self
                    .state
                    .text
                    .last_emit
                    .map_or(true, |last| now.saturating_duration_since(last) >= interval);
                if due {
                    self.emit_snapshot_at(now);
                } else {
                    self.state.text.pending = true;
                }
            }
        }
    }

    /// Replace the selected element's text and report it as an edit
    pub fn edit_selected_text(&mut self, text: &str) {
        let Some(selected) = self.state.selection.clone() else {
            return;
        };
        if !self.edit_mode {
            return;
        }
        selected.set_text_content(text);
        self.on_text_edited();
    }

    /// Emit a coalesced text edit once its interval has passed
    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    pub fn tick_at(&mut self, now: Instant) {
        if !self.state.text.pending {
            return;
        }
        if let TextSync::Coalesce(interval) = self.config.text_sync() {
            let due = self
                .state
                .text
                .last_emit
                .map_or(true, |last| now.saturating_duration_since(last) >= interval);
            if !due {
                return;
            }
        }
        self.emit_snapshot_at(now);
    }

    pub fn has_pending_text(&self) -> bool {
        self.state.text.pending
    }

    fn flush_text(&mut self) {
        if self.state.text.pending {
            tracing::trace!("flushing pending text edit");
            self.emit_snapshot();
        }
    }

    // ── Internals ───────────────────────────────────────────────────────

    fn select(&mut self, node: &NodeRef) {
        if let Some(previous) = self.state.selection.take() {
            clear_selection(&previous);
        }
        if self
            .state
            .hover
            .as_ref()
            .is_some_and(|h| Rc::ptr_eq(h, node))
        {
            self.state.hover = None;
        }
        show_selection(node);
        self.state.selection = Some(node.clone());

        let info = selection_info(node);
        tracing::debug!(tag = %info.tag, "element selected");
        self.post(RuntimeMessage::ElementSelected(info));
    }

    /// Move `origin` next to the element under `point`
    fn drop_at(&mut self, origin: &NodeRef, point: Point) {
        self.ensure_layout();
        let target = self.geometry.hit_test(&self.document, point);
        clear_dragging(origin);

        let Some(target) = target else {
            tracing::debug!("drop outside any element");
            return;
        };
        if Rc::ptr_eq(&target, origin)
            || !self.is_candidate(&target)
            || origin.is_inclusive_ancestor_of(&target)
        {
            tracing::debug!(target = %target.id(), "drop target rejected");
            return;
        }
        let Some(rect) = self.geometry.bounds(&target) else {
            return;
        };
        let Some(anchor) = self.placement_anchor(target.clone(), origin) else {
            tracing::debug!(target = %target.id(), "no valid position near drop target");
            return;
        };

        let result = if point.y < rect.mid_y() {
            anchor.insert_before(origin.clone())
        } else {
            anchor.insert_after(origin.clone())
        };
        match result {
            Ok(()) => {
                tracing::debug!(node = %origin.id(), target = %target.id(), "element moved");
                self.tree_changed();
            }
            Err(e) => tracing::warn!(error = %e, "drop failed"),
        }
    }

    /// `anchor` or its nearest ancestor whose parent can hold `node` as a
    /// sibling without the markup reparsing differently
    fn placement_anchor(&self, anchor: NodeRef, node: &NodeRef) -> Option<NodeRef> {
        let mut anchor = anchor;
        loop {
            let parent = anchor.parent()?;
            if can_contain(&parent, node) {
                return Some(anchor);
            }
            if self.document.is_root_container(&parent) {
                return None;
            }
            anchor = parent;
        }
    }

    /// Elements inside the body that the user may act on
    fn is_candidate(&self, node: &NodeRef) -> bool {
        node.is_element()
            && !self.document.is_root_container(node)
            && !is_runtime_node(node)
            && self
                .document
                .body()
                .is_some_and(|body| body.is_inclusive_ancestor_of(node))
    }

    fn ensure_layout(&mut self) {
        if self.layout_dirty {
            self.geometry.reflow(&self.document);
            self.layout_dirty = false;
        }
    }

    fn tree_changed(&mut self) {
        self.layout_dirty = true;
        self.emit_snapshot();
    }

    fn emit_snapshot(&mut self) {
        self.emit_snapshot_at(Instant::now());
    }

    fn emit_snapshot_at(&mut self, now: Instant) {
        self.state.text.pending = false;
        self.state.text.last_emit = Some(now);
        let snapshot = self.snapshot();
        self.post(RuntimeMessage::SyncSnapshot(snapshot));
    }

    fn post(&self, message: RuntimeMessage) {
        if let Err(e) = self.port.post(&message) {
            tracing::warn!(kind = message.kind(), error = %e, "controller unreachable");
        }
    }
}

fn selection_info(node: &NodeRef) -> SelectionInfo {
    SelectionInfo {
        tag: node.tag_name().unwrap_or_default().to_ascii_uppercase(),
        text: node.text_content(),
        colors: resolve_colors(node),
    }
}

fn is_valid_tag(tag: &str) -> bool {
    let mut chars = tag.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '-')
}

/// `backgroundColor` → `background-color`; kebab-case passes through
fn css_property_name(property: &str) -> String {
    let mut out = String::with_capacity(property.len() + 4);
    for c in property.trim().chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}
