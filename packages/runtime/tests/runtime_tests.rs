//! End-to-end runtime behaviour over a live channel

use livepage_dom::{select_first, Document, Node, NodeRef};
use livepage_protocol::{
    channel, ControllerMessage, HostPort, NewElement, RuntimeMessage, StyleUpdate,
};
use livepage_runtime::layout::LINE_HEIGHT;
use livepage_runtime::{
    canonicalize, inject_runtime, DocumentRuntime, Geometry, InputEvent, Phase, Point, Rect, RuntimeConfig,
};

fn boot(markup: &str) -> (DocumentRuntime, HostPort) {
    let (host, sandbox) = channel();
    let runtime = DocumentRuntime::boot(&inject_runtime(markup), sandbox, RuntimeConfig::default());
    (runtime, host)
}

fn el(runtime: &DocumentRuntime, selector: &str) -> NodeRef {
    select_first(runtime.document().root(), selector)
        .unwrap()
        .unwrap_or_else(|| panic!("no element for {}", selector))
}

fn snapshot(messages: &[RuntimeMessage]) -> &str {
    match messages.last() {
        Some(RuntimeMessage::SyncSnapshot(markup)) => markup,
        other => panic!("expected snapshot, got {:?}", other),
    }
}

/// Row `n` of the block layout, vertically centred
fn row(n: f64) -> Point {
    Point::new(20.0, (n + 0.5) * LINE_HEIGHT)
}

#[test]
fn test_select_then_delete_paragraph() {
    let (mut runtime, mut host) = boot("<html><body><p>Hi</p></body></html>");
    host.post(&ControllerMessage::SetEditMode(true)).unwrap();
    assert_eq!(runtime.pump(), 1);

    let p = el(&runtime, "p");
    runtime.dispatch(InputEvent::PointerDown { target: p.clone(), point: row(0.0) });
    runtime.dispatch(InputEvent::PointerUp { point: row(0.0) });

    match host.drain().as_slice() {
        [RuntimeMessage::ElementSelected(info)] => {
            assert_eq!(info.tag, "P");
            assert_eq!(info.text, "Hi");
            assert_eq!(info.colors.background, "rgba(0, 0, 0, 0)");
            assert_eq!(info.colors.text, "rgb(0, 0, 0)");
        }
        other => panic!("unexpected messages: {:?}", other),
    }

    host.post(&ControllerMessage::DeleteElement).unwrap();
    runtime.pump();
    let messages = host.drain();
    let markup = snapshot(&messages);
    assert_eq!(markup, "<html><body></body></html>");
    assert!(runtime.query_selection().is_none());
}

#[test]
fn test_drag_drops_relative_to_target_midpoint() {
    let page = "<html><body><h1>A</h1><p>B</p><h2>C</h2></body></html>";

    // Upper half of the target: insert before it
    let (mut runtime, mut host) = boot(page);
    runtime.set_edit_mode(true);
    let h2 = el(&runtime, "h2");
    let h1 = el(&runtime, "h1");
    let h1_rect = runtime.bounds(&h1).unwrap();
    runtime.on_pointer_down(&h2, row(2.0));
    runtime.on_pointer_move(row(0.0));
    assert_eq!(runtime.phase(), Phase::Dragging);
    runtime.on_pointer_up(Point::new(20.0, h1_rect.y + 2.0));
    assert_eq!(
        snapshot(&host.drain()),
        "<html><body><h2>C</h2><h1>A</h1><p>B</p></body></html>"
    );

    // Lower half: insert after it
    let (mut runtime, mut host) = boot(page);
    runtime.set_edit_mode(true);
    let h2 = el(&runtime, "h2");
    runtime.on_pointer_down(&h2, row(2.0));
    runtime.on_pointer_move(row(0.0));
    runtime.on_pointer_up(Point::new(20.0, LINE_HEIGHT - 2.0));
    assert_eq!(
        snapshot(&host.drain()),
        "<html><body><h1>A</h1><h2>C</h2><p>B</p></body></html>"
    );
    assert!(h2.overlay().unwrap().is_empty());
}

#[test]
fn test_drop_on_own_position_is_rejected() {
    let (mut runtime, mut host) =
        boot("<html><body><div><p>inner</p></div><h1>x</h1></body></html>");
    runtime.set_edit_mode(true);
    let div = el(&runtime, "div");
    let before = runtime.snapshot();

    runtime.on_pointer_down(&div, row(0.0));
    runtime.on_pointer_move(row(1.0));
    // The dragged div is inert, so this lands on the body: rejected as well
    runtime.on_pointer_up(row(0.0));

    assert!(host.drain().is_empty());
    assert_eq!(runtime.snapshot(), before);
    assert!(!div.is_inert());
    assert_eq!(runtime.phase(), Phase::Idle);
}

#[test]
fn test_drop_outside_document_is_ignored() {
    let (mut runtime, mut host) = boot("<html><body><h1>A</h1><p>B</p></body></html>");
    runtime.set_edit_mode(true);
    let p = el(&runtime, "p");
    runtime.on_pointer_down(&p, row(1.0));
    runtime.on_pointer_move(row(40.0));
    runtime.on_pointer_up(row(40.0));
    assert!(host.drain().is_empty());
}

#[test]
fn test_mode_off_clears_affordances_and_selection() {
    let (mut runtime, mut host) = boot("<html><body><h1>A</h1><p>B</p></body></html>");
    host.post(&ControllerMessage::SetEditMode(true)).unwrap();
    runtime.pump();

    let h1 = el(&runtime, "h1");
    let p = el(&runtime, "p");
    runtime.dispatch(InputEvent::PointerDown { target: h1.clone(), point: row(0.0) });
    runtime.dispatch(InputEvent::PointerUp { point: row(0.0) });
    runtime.dispatch(InputEvent::PointerOver { target: p.clone() });
    assert!(runtime.query_selection().is_some());

    host.post(&ControllerMessage::SetEditMode(false)).unwrap();
    runtime.pump();

    assert!(runtime.query_selection().is_none());
    assert!(runtime.hovered().is_none());
    assert!(h1.overlay().unwrap().is_empty());
    assert!(p.overlay().unwrap().is_empty());

    // Style updates now have nothing to act on
    host.post(&ControllerMessage::UpdateStyle(StyleUpdate::new("color", "red"))).unwrap();
    host.drain();
    runtime.pump();
    assert!(host.drain().is_empty());
}

#[test]
fn test_snapshots_never_carry_editor_state() {
    let (mut runtime, mut host) =
        boot("<html><body><p style=\"color: red;\">Hi</p><script>let n = 1;</script></body></html>");
    runtime.set_edit_mode(true);
    let p = el(&runtime, "p");
    runtime.on_hover(&p);
    runtime.on_pointer_down(&p, row(0.0));
    runtime.on_pointer_up(row(0.0));
    runtime.edit_selected_text("Hello");

    let messages = host.drain();
    let markup = snapshot(&messages);
    assert_eq!(
        markup,
        "<html><body><p style=\"color: red;\">Hello</p><script>let n = 1;</script></body></html>"
    );
    assert!(!markup.contains("outline"));
    assert!(!markup.contains("data-livepage-runtime"));
}

#[test]
fn test_commands_apply_in_order() {
    let (mut runtime, mut host) = boot("<html><body><p>Hi</p></body></html>");
    runtime.set_edit_mode(true);
    let p = el(&runtime, "p");
    runtime.on_pointer_down(&p, row(0.0));
    runtime.on_pointer_up(row(0.0));
    host.drain();

    host.post(&ControllerMessage::UpdateStyle(StyleUpdate::new("color", "#00f"))).unwrap();
    host.post(&ControllerMessage::DeleteElement).unwrap();
    host.post(&ControllerMessage::UpdateStyle(StyleUpdate::new("color", "red"))).unwrap();
    assert_eq!(runtime.pump(), 3);

    let messages = host.drain();
    assert_eq!(messages.len(), 2);
    assert!(matches!(&messages[0], RuntimeMessage::SyncSnapshot(m) if m.contains("color: #00f;")));
    assert_eq!(snapshot(&messages), "<html><body></body></html>");
}

#[test]
fn test_block_added_inside_paragraph_lands_after_it() {
    let (mut runtime, mut host) = boot("<html><body><p>Hi <span>x</span></p></body></html>");
    runtime.set_edit_mode(true);
    let span = el(&runtime, "span");
    runtime.on_pointer_down(&span, row(0.0));
    runtime.on_pointer_up(row(0.0));
    host.drain();

    host.post(&ControllerMessage::AddElement(NewElement::new("div", "box", ""))).unwrap();
    host.post(&ControllerMessage::AddElement(NewElement::new("em", "!", ""))).unwrap();
    runtime.pump();

    let messages = host.drain();
    let markup = snapshot(&messages);
    assert_eq!(
        markup,
        "<html><body><p>Hi <span>x</span><em>!</em></p><div>box</div></body></html>"
    );
    assert_eq!(canonicalize(markup), markup);
}

/// Hit-tests whatever the selector names, inert or not
struct Pinned(&'static str);

impl Geometry for Pinned {
    fn reflow(&mut self, _document: &Document) {}

    fn bounds(&self, _node: &Node) -> Option<Rect> {
        Some(Rect::new(0.0, 0.0, 100.0, 100.0))
    }

    fn hit_test(&self, document: &Document, _point: Point) -> Option<NodeRef> {
        select_first(document.root(), self.0).ok().flatten()
    }
}

#[test]
fn test_drop_into_own_descendant_is_rejected() {
    let (mut host, sandbox) = channel();
    let mut runtime = DocumentRuntime::with_geometry(
        "<html><body><div><p>inner</p></div></body></html>",
        sandbox,
        RuntimeConfig::default(),
        Box::new(Pinned("p")),
    );
    runtime.set_edit_mode(true);
    let div = el(&runtime, "div");
    let before = runtime.snapshot();

    runtime.on_pointer_down(&div, Point::new(0.0, 0.0));
    runtime.on_pointer_move(Point::new(0.0, 50.0));
    runtime.on_pointer_up(Point::new(0.0, 80.0));

    assert!(host.drain().is_empty());
    assert_eq!(runtime.snapshot(), before);
}

#[test]
fn test_custom_geometry_drives_drop() {
    let (mut host, sandbox) = channel();
    let mut runtime = DocumentRuntime::with_geometry(
        "<html><body><h1>A</h1><p>B</p></body></html>",
        sandbox,
        RuntimeConfig::default(),
        Box::new(Pinned("h1")),
    );
    runtime.set_edit_mode(true);
    let p = el(&runtime, "p");
    runtime.on_pointer_down(&p, Point::new(0.0, 90.0));
    runtime.on_pointer_move(Point::new(0.0, 10.0));
    runtime.on_pointer_up(Point::new(0.0, 10.0));

    assert_eq!(snapshot(&host.drain()), "<html><body><p>B</p><h1>A</h1></body></html>");
}

#[test]
fn test_block_dropped_beside_inline_leaves_paragraph() {
    let (mut host, sandbox) = channel();
    let mut runtime = DocumentRuntime::with_geometry(
        "<html><body><p>Hi <span>x</span></p><div>box</div></body></html>",
        sandbox,
        RuntimeConfig::default(),
        Box::new(Pinned("span")),
    );
    runtime.set_edit_mode(true);
    let div = el(&runtime, "div");
    runtime.on_pointer_down(&div, Point::new(0.0, 90.0));
    runtime.on_pointer_move(Point::new(0.0, 10.0));
    runtime.on_pointer_up(Point::new(0.0, 10.0));

    let messages = host.drain();
    let markup = snapshot(&messages);
    assert_eq!(markup, "<html><body><div>box</div><p>Hi <span>x</span></p></body></html>");
    assert_eq!(canonicalize(markup), markup);
}
