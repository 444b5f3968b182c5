use alloc::vec::Vec;

use vtree::{
    MarkUpdate, NodeId, Placement, ReorderController, Result, Tree, TreeOptions, TreeWindower,
    Viewport,
};

use crate::{RowAnchor, apply_anchor, capture_first_visible_anchor};

/// A framework-neutral controller that wraps a `vtree::TreeWindower` and a
/// `vtree::ReorderController`, and accepts UI events addressed by row index.
///
/// This type does not hold any UI objects. Adapters drive it by calling:
/// - `on_scroll` / `on_resize` when the viewport changes
/// - `tick(now_ms)` from a timer (for the debounced cleanup of stale rows)
/// - `on_affordance_click` and the `on_drag_*` family from pointer handlers
///
/// Row indexes are resolved against the last render pass, so an event on the free zone after
/// the last row targets the root.
pub struct Controller<T, V: Viewport> {
    view: TreeWindower<T, V>,
    reorder: ReorderController<T>,
}

impl<T, V: Viewport> Controller<T, V> {
    pub fn new(viewport: V, options: TreeOptions) -> Self {
        Self::with_tree(Tree::new(), viewport, options)
    }

    pub fn with_tree(tree: Tree<T>, viewport: V, options: TreeOptions) -> Self {
        let reorder = ReorderController::from_options(&options);
        Self {
            view: TreeWindower::with_tree(tree, viewport, options),
            reorder,
        }
    }

    pub fn from_parts(view: TreeWindower<T, V>, reorder: ReorderController<T>) -> Self {
        Self { view, reorder }
    }

    pub fn view(&self) -> &TreeWindower<T, V> {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut TreeWindower<T, V> {
        &mut self.view
    }

    pub fn reorder(&self) -> &ReorderController<T> {
        &self.reorder
    }

    pub fn reorder_mut(&mut self) -> &mut ReorderController<T> {
        &mut self.reorder
    }

    pub fn into_parts(self) -> (TreeWindower<T, V>, ReorderController<T>) {
        (self.view, self.reorder)
    }

    pub fn tree(&self) -> &Tree<T> {
        self.view.tree()
    }

    /// Call this when the viewport reports a scroll.
    pub fn on_scroll(&mut self, now_ms: u64) -> Result<()> {
        self.view.on_scroll(now_ms)
    }

    /// Runs the debounced cleanup if it is due. Returns `true` when stale rows were dropped.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        self.view.tick(now_ms)
    }

    /// Call this when the viewport extent changed.
    pub fn on_resize(&mut self) -> Result<()> {
        self.view.refresh()
    }

    /// Toggles the node drawn at `row`. Returns the change in row count, or `None` if the row
    /// does not hold a node.
    pub fn on_affordance_click(&mut self, row: usize) -> Result<Option<isize>> {
        let Some(node) = self.node_at_row(row) else {
            return Ok(None);
        };
        self.view.toggle_expanded(node).map(Some)
    }

    /// Starts dragging the node drawn at `row`.
    pub fn on_drag_start(&mut self, row: usize) -> Option<NodeId> {
        let node = self.node_at_row(row)?;
        self.reorder.drag_start(node);
        Some(node)
    }

    pub fn on_drag_enter(&mut self, row: usize, y: u32) -> Option<(NodeId, MarkUpdate)> {
        let target = self.view.row_target(row)?;
        let update = self
            .reorder
            .drag_enter(self.view.tree(), target, y, self.view.row_height());
        Some((target, update))
    }

    pub fn on_drag_over(&mut self, row: usize, y: u32) -> Option<(NodeId, MarkUpdate)> {
        let target = self.view.row_target(row)?;
        let update = self
            .reorder
            .drag_over(self.view.tree(), target, y, self.view.row_height());
        Some((target, update))
    }

    pub fn on_drag_leave(&mut self, row: usize) -> Option<(NodeId, MarkUpdate)> {
        let target = self.view.row_target(row)?;
        let update = self.reorder.drag_leave(self.view.tree(), target);
        Some((target, update))
    }

    /// Drops the dragged node at `y` inside `row`.
    ///
    /// The node at the top of the viewport stays in place (unless it is the one being moved),
    /// and the whole move is rendered once.
    pub fn on_drop(&mut self, row: usize, y: u32) -> Result<Option<Placement>> {
        let Some(target) = self.view.row_target(row) else {
            return Ok(None);
        };
        let dragged = self.reorder.dragged();
        let anchor =
            capture_first_visible_anchor(&self.view).filter(|a| Some(a.node) != dragged);

        self.view.begin_update();
        let dropped = self.reorder.drop(&mut self.view, target, y);
        let anchored = match (&dropped, anchor) {
            (Ok(Some(_)), Some(anchor)) => self.restore(&anchor),
            _ => Ok(()),
        };
        let closed = self.view.end_update();

        let placement = dropped?;
        anchored?;
        closed?;
        Ok(placement)
    }

    /// Cancels the drag. Returns the nodes whose hover indication must be erased.
    pub fn on_drag_end(&mut self) -> Vec<NodeId> {
        self.reorder.drag_end()
    }

    pub fn capture_first_visible_anchor(&self) -> Option<RowAnchor> {
        capture_first_visible_anchor(&self.view)
    }

    pub fn apply_anchor(&mut self, anchor: &RowAnchor) -> Result<bool> {
        apply_anchor(&mut self.view, anchor)
    }

    fn restore(&mut self, anchor: &RowAnchor) -> Result<()> {
        apply_anchor(&mut self.view, anchor).map(|_| ())
    }

    // The free zone maps to the root, which cannot be toggled or dragged.
    fn node_at_row(&self, row: usize) -> Option<NodeId> {
        self.view
            .row_target(row)
            .filter(|&node| node != self.view.tree().root())
    }
}
