use crate::*;

use alloc::vec;
use alloc::vec::Vec;
use vtree::{MarkUpdate, NodeId, RowSlot, Tree, TreeOptions, TreeWindower, Viewport, Zone};

#[derive(Debug, Default)]
struct Surface {
    offset: u64,
    shown: Vec<RowSlot>,
    discards: usize,
}

impl Viewport for Surface {
    type Row = RowSlot;

    fn extent(&self) -> u32 {
        300
    }

    fn scroll_offset(&self) -> u64 {
        self.offset
    }

    fn scroll_to(&mut self, offset: u64) {
        self.offset = offset;
    }

    fn set_content_extent(&mut self, _extent: u64) {}

    fn create_row(&mut self, slot: RowSlot) -> RowSlot {
        slot
    }

    fn present(&mut self, rows: Vec<RowSlot>) {
        self.shown = rows;
    }

    fn discard_stale(&mut self) {
        self.discards += 1;
    }
}

// 100 root children; the first one has 5 collapsed children of its own.
fn long_tree() -> (Tree<usize>, Vec<NodeId>) {
    let mut tree = Tree::new();
    let root = tree.root();
    let mut top = Vec::new();
    for i in 0..100 {
        let node = tree.create(i);
        tree.append_child(root, node).unwrap();
        top.push(node);
    }
    for i in 0..5 {
        let child = tree.create(1000 + i);
        tree.append_child(top[0], child).unwrap();
    }
    (tree, top)
}

fn controller() -> (Controller<usize, Surface>, Vec<NodeId>) {
    let (tree, top) = long_tree();
    let mut c = Controller::with_tree(tree, Surface::default(), TreeOptions::new());
    c.view_mut().set_renderer(|_, _| Ok(())).unwrap();
    (c, top)
}

#[test]
fn anchor_survives_expanding_rows_above_the_viewport() {
    let (tree, top) = long_tree();
    let mut view = TreeWindower::with_tree(tree, Surface::default(), TreeOptions::new());
    view.set_renderer(|_, _| Ok(())).unwrap();
    view.scroll_to(610).unwrap();

    let anchor = capture_first_visible_anchor(&view).unwrap();
    assert_eq!(anchor.node, top[20]);
    assert_eq!(anchor.offset_in_row, 10);

    view.set_expanded(top[0], true).unwrap();
    assert!(apply_anchor(&mut view, &anchor).unwrap());
    assert_eq!(view.viewport().offset, 25 * 30 + 10);

    // A node hidden under a collapsed ancestor cannot be anchored to.
    let hidden = view.tree().first_child(top[0]).unwrap();
    view.set_expanded(top[0], false).unwrap();
    let lost = RowAnchor {
        node: hidden,
        offset_in_row: 0,
    };
    assert!(!apply_anchor(&mut view, &lost).unwrap());
}

#[test]
fn no_anchor_past_the_last_row() {
    let (mut c, _) = controller();
    c.view_mut().scroll_to(100 * 30).unwrap();
    assert_eq!(c.capture_first_visible_anchor(), None);
}

#[test]
fn affordance_clicks_toggle_by_row() {
    let (mut c, top) = controller();
    assert_eq!(c.on_affordance_click(0).unwrap(), Some(5));
    assert!(c.tree().is_expanded(top[0]));
    assert_eq!(c.view().row_count(), 105);
    assert_eq!(c.on_affordance_click(0).unwrap(), Some(-5));

    // Rows outside the rendered window carry no node.
    assert_eq!(c.on_affordance_click(500).unwrap(), None);
}

#[test]
fn free_zone_row_is_a_drop_target_but_not_draggable() {
    let mut tree = Tree::new();
    let root = tree.root();
    let a = tree.create(1usize);
    let b = tree.create(2usize);
    tree.append_child(root, a).unwrap();
    tree.append_child(root, b).unwrap();
    let mut c = Controller::with_tree(tree, Surface::default(), TreeOptions::new());
    c.view_mut().set_renderer(|_, _| Ok(())).unwrap();

    assert_eq!(c.view().row_target(2), Some(root));
    assert_eq!(c.on_drag_start(2), None);
    assert_eq!(c.on_affordance_click(2).unwrap(), None);

    assert_eq!(c.on_drag_start(0), Some(a));
    assert_eq!(
        c.on_drag_enter(2, 3),
        Some((root, MarkUpdate::Show(Zone::Inside)))
    );
    let placement = c.on_drop(2, 3).unwrap().unwrap();
    assert_eq!(placement.parent, root);
    assert_eq!(placement.reference, None);
    assert_eq!(c.tree().children(root).collect::<Vec<_>>(), vec![b, a]);
    assert!(!c.reorder().is_dragging());
}

#[test]
fn drop_keeps_the_top_row_in_place() {
    let (mut c, top) = controller();
    c.view_mut().scroll_to(600).unwrap();
    assert_eq!(c.view().window().start_index, 10);

    assert_eq!(c.on_drag_start(12), Some(top[12]));
    assert_eq!(
        c.on_drag_over(35, 29),
        Some((top[35], MarkUpdate::Show(Zone::After)))
    );
    let placement = c.on_drop(35, 29).unwrap().unwrap();
    assert_eq!(placement.reference, Some(top[36]));

    assert_eq!(c.tree().next_sibling(top[35]), Some(top[12]));
    assert_eq!(c.view().viewport().offset, 19 * 30);
    assert_eq!(c.capture_first_visible_anchor().map(|a| a.node), Some(top[20]));
}

#[test]
fn rejected_drop_leaves_the_drag_running() {
    let (mut c, top) = controller();
    c.on_drag_start(1);
    // Row 0 is already followed by the dragged node.
    assert_eq!(c.on_drop(0, 29).unwrap(), None);
    assert!(c.reorder().is_dragging());
    assert_eq!(c.tree().next_sibling(top[0]), Some(top[1]));

    assert_eq!(c.on_drag_enter(0, 15), Some((top[0], MarkUpdate::Show(Zone::Inside))));
    assert_eq!(c.on_drag_leave(0), Some((top[0], MarkUpdate::Clear)));
    assert!(c.on_drag_end().is_empty());
    assert!(!c.reorder().is_dragging());
}

#[test]
fn cleanup_runs_through_the_controller_clock() {
    let (mut c, _) = controller();
    c.view_mut().viewport_mut().offset = 900;
    c.on_scroll(0).unwrap();
    assert!(!c.tick(299));
    assert!(c.tick(300));
    assert_eq!(c.view().viewport().discards, 1);
    c.on_resize().unwrap();
    assert_eq!(c.view().state().visible_rows, 10);
}

#[test]
fn rejected_drop_leaves_the_mark_for_the_adapter_to_erase() {
    let (mut c, top) = controller();
    c.on_drag_start(1);
    assert_eq!(
        c.on_drag_over(0, 15),
        Some((top[0], MarkUpdate::Show(Zone::Inside)))
    );
    assert_eq!(c.on_drop(0, 29).unwrap(), None);
    assert_eq!(c.reorder().mark(top[0]), Some(Zone::Inside));
    assert_eq!(c.on_drag_end(), vec![top[0]]);
}
