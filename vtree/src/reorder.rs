use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use crate::rows::Viewport;
use crate::{Error, NodeId, Placement, Result, Tree, TreeOptions, TreeWindower, Zone};

/// Vetoes an otherwise valid placement.
pub type DropAllowed<T> = Box<dyn Fn(&Tree<T>, Placement) -> bool>;

/// Told about a move after the dragged node is detached and before it is reinserted.
pub type DropNotifier<T> = Box<dyn FnMut(&Tree<T>, Placement)>;

/// Classifies a pointer offset inside a row into a drop zone, by geometry alone.
///
/// `y <= free_zone` is [`Zone::Before`], `y >= row_height - free_zone` is [`Zone::After`],
/// anything in between is [`Zone::Inside`].
pub fn classify(y: u32, row_height: u32, free_zone: u32) -> Zone {
    if y <= free_zone {
        Zone::Before
    } else if y >= row_height.saturating_sub(free_zone) {
        Zone::After
    } else {
        Zone::Inside
    }
}

/// How the hover indication of a row changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MarkUpdate {
    Unchanged,
    /// Draw the indication for this zone, replacing any previous one on the row.
    Show(Zone),
    Clear,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct HoverMark {
    zone: Option<Zone>,
    // Nested enter/leave pairs while hovering the inside zone.
    depth: u32,
}

/// Drag-and-drop reordering of tree nodes.
///
/// The controller holds the dragged node and the hover marks, decides which zone of a target
/// row the pointer is in and whether dropping there is legal, and performs the move as one
/// batched edit on a [`TreeWindower`].
pub struct ReorderController<T> {
    dragged: Option<NodeId>,
    free_zone: u32,
    marks: BTreeMap<NodeId, HoverMark>,
    drop_allowed: Option<DropAllowed<T>>,
    on_drop: Option<DropNotifier<T>>,
}

impl<T> core::fmt::Debug for ReorderController<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ReorderController")
            .field("dragged", &self.dragged)
            .field("free_zone", &self.free_zone)
            .field("marks", &self.marks)
            .finish_non_exhaustive()
    }
}

impl<T> ReorderController<T> {
    pub fn new(free_zone: u32) -> Self {
        Self {
            dragged: None,
            free_zone,
            marks: BTreeMap::new(),
            drop_allowed: None,
            on_drop: None,
        }
    }

    pub fn from_options(options: &TreeOptions) -> Self {
        Self::new(options.free_zone)
    }

    pub fn with_drop_allowed<F>(mut self, f: F) -> Self
    where
        F: Fn(&Tree<T>, Placement) -> bool + 'static,
    {
        self.set_drop_allowed(f);
        self
    }

    pub fn with_drop_notifier<F>(mut self, f: F) -> Self
    where
        F: FnMut(&Tree<T>, Placement) + 'static,
    {
        self.set_drop_notifier(f);
        self
    }

    pub fn set_drop_allowed<F>(&mut self, f: F)
    where
        F: Fn(&Tree<T>, Placement) -> bool + 'static,
    {
        self.drop_allowed = Some(Box::new(f));
    }

    pub fn set_drop_notifier<F>(&mut self, f: F)
    where
        F: FnMut(&Tree<T>, Placement) + 'static,
    {
        self.on_drop = Some(Box::new(f));
    }

    pub fn clear_drop_allowed(&mut self) {
        self.drop_allowed = None;
    }

    pub fn clear_drop_notifier(&mut self) {
        self.on_drop = None;
    }

    pub fn free_zone(&self) -> u32 {
        self.free_zone
    }

    pub fn dragged(&self) -> Option<NodeId> {
        self.dragged
    }

    pub fn is_dragging(&self) -> bool {
        self.dragged.is_some()
    }

    /// The zone currently indicated on `target`'s row.
    pub fn mark(&self, target: NodeId) -> Option<Zone> {
        self.marks.get(&target).and_then(|m| m.zone)
    }

    pub fn drag_start(&mut self, node: NodeId) {
        vtrace!(?node, "ReorderController::drag_start");
        self.dragged = Some(node);
        self.marks.clear();
    }

    /// Cancels the drag and returns the targets whose indication must be erased.
    pub fn drag_end(&mut self) -> Vec<NodeId> {
        self.dragged = None;
        let marked = self
            .marks
            .iter()
            .filter(|(_, m)| m.zone.is_some())
            .map(|(&id, _)| id)
            .collect();
        self.marks.clear();
        marked
    }

    /// Shared precondition of every zone: a live node is being dragged, and `target` is
    /// neither that node nor one of its descendants.
    pub fn can_drop_on(&self, tree: &Tree<T>, target: NodeId) -> bool {
        let Some(node) = self.dragged else {
            return false;
        };
        tree.contains(target)
            && tree.parent(node).is_some()
            && node != target
            && !tree.is_ancestor(node, target)
    }

    /// The zone a drop at `y` inside `target`'s row would use, if that drop is legal.
    ///
    /// The root stands for the free zone after the last row and only accepts
    /// [`Zone::Inside`] (append as its last child).
    pub fn zone_for(&self, tree: &Tree<T>, target: NodeId, y: u32, row_height: u32) -> Option<Zone> {
        let zone = if target == tree.root() {
            Zone::Inside
        } else {
            classify(y, row_height, self.free_zone)
        };
        self.placement(tree, target, zone).map(|_| zone)
    }

    /// Where the dragged node would go when dropped in `zone` of `target`, or `None` if that
    /// drop is illegal or vetoed.
    pub fn placement(&self, tree: &Tree<T>, target: NodeId, zone: Zone) -> Option<Placement> {
        if !self.can_drop_on(tree, target) {
            return None;
        }
        let node = self.dragged?;
        let root = tree.root();
        let placement = match zone {
            Zone::Before => {
                if target == root || tree.next_sibling(node) == Some(target) {
                    return None;
                }
                Placement {
                    parent: tree.parent(target)?,
                    reference: Some(target),
                    node,
                }
            }
            Zone::After => {
                if target == root
                    || tree.is_expanded(target)
                    || tree.next_sibling(target) == Some(node)
                {
                    return None;
                }
                Placement {
                    parent: tree.parent(target)?,
                    reference: tree.next_sibling(target),
                    node,
                }
            }
            Zone::Inside => {
                if tree.parent(node) == Some(target) && tree.last_child(target) == Some(node) {
                    return None;
                }
                Placement {
                    parent: target,
                    reference: None,
                    node,
                }
            }
        };

        if let Some(allowed) = &self.drop_allowed {
            if !allowed(tree, placement) {
                return None;
            }
        }
        Some(placement)
    }

    /// Pointer entered `target`'s row.
    pub fn drag_enter(&mut self, tree: &Tree<T>, target: NodeId, y: u32, row_height: u32) -> MarkUpdate {
        self.update_mark(tree, target, y, row_height, true)
    }

    /// Pointer moved within `target`'s row.
    pub fn drag_over(&mut self, tree: &Tree<T>, target: NodeId, y: u32, row_height: u32) -> MarkUpdate {
        self.update_mark(tree, target, y, row_height, false)
    }

    /// Pointer left `target`'s row. The mark survives until every nested enter was matched by
    /// a leave.
    pub fn drag_leave(&mut self, tree: &Tree<T>, target: NodeId) -> MarkUpdate {
        if !self.can_drop_on(tree, target) {
            return MarkUpdate::Unchanged;
        }
        let Some(mark) = self.marks.get_mut(&target) else {
            return MarkUpdate::Unchanged;
        };
        if mark.depth > 1 {
            mark.depth -= 1;
            return MarkUpdate::Unchanged;
        }
        let had_zone = mark.zone.is_some();
        self.marks.remove(&target);
        if had_zone {
            MarkUpdate::Clear
        } else {
            MarkUpdate::Unchanged
        }
    }

    /// Drops the dragged node at `y` inside `target`'s row.
    ///
    /// Returns `Ok(None)` when no legal zone is under the pointer. The drag and its hover
    /// marks are then left as they were.
    pub fn drop<V: Viewport>(
        &mut self,
        view: &mut TreeWindower<T, V>,
        target: NodeId,
        y: u32,
    ) -> Result<Option<Placement>> {
        let Some(zone) = self.zone_for(view.tree(), target, y, view.row_height()) else {
            vtrace!(?target, y, "ReorderController::drop: no legal zone");
            return Ok(None);
        };
        self.apply(view, target, zone).map(Some)
    }

    /// Moves the dragged node into `zone` of `target` as a single batch.
    ///
    /// Fails with [`Error::InvalidDrop`] unless [`ReorderController::placement`] accepts the
    /// move.
    pub fn apply<V: Viewport>(
        &mut self,
        view: &mut TreeWindower<T, V>,
        target: NodeId,
        zone: Zone,
    ) -> Result<Placement> {
        let (Some(node), Some(_)) = (self.dragged, self.placement(view.tree(), target, zone)) else {
            vwarn!(dragged = ?self.dragged, ?target, ?zone, "rejected drop");
            return Err(Error::InvalidDrop {
                node: self.dragged,
                target,
            });
        };

        view.begin_update();
        let moved = self.splice(view, node, target, zone);
        let closed = view.end_update();
        let placement = moved?;

        // The move stands even if the closing render fails.
        self.dragged = None;
        self.marks.clear();
        vdebug!(
            ?node,
            parent = ?placement.parent,
            reference = ?placement.reference,
            "ReorderController: moved"
        );
        closed?;
        Ok(placement)
    }

    fn splice<V: Viewport>(
        &mut self,
        view: &mut TreeWindower<T, V>,
        node: NodeId,
        target: NodeId,
        zone: Zone,
    ) -> Result<Placement> {
        view.remove(node)?;

        let tree = view.tree();
        let placement = match zone {
            Zone::Before | Zone::After => {
                let parent = tree.parent(target).ok_or(Error::NotAttached(target))?;
                let reference = match zone {
                    Zone::Before => Some(target),
                    _ => tree.next_sibling(target),
                };
                Placement {
                    parent,
                    reference,
                    node,
                }
            }
            Zone::Inside => Placement {
                parent: target,
                reference: None,
                node,
            },
        };
        if let Some(notify) = self.on_drop.as_mut() {
            notify(tree, placement);
        }

        match zone {
            Zone::Before => view.insert_before(target, node)?,
            Zone::After => view.insert_after(target, node)?,
            Zone::Inside => view.append_child(target, node)?,
        }
        Ok(placement)
    }

    fn update_mark(
        &mut self,
        tree: &Tree<T>,
        target: NodeId,
        y: u32,
        row_height: u32,
        entering: bool,
    ) -> MarkUpdate {
        if !self.can_drop_on(tree, target) {
            return MarkUpdate::Unchanged;
        }
        let zone = self.zone_for(tree, target, y, row_height);
        let mark = self.marks.entry(target).or_default();
        match zone {
            Some(Zone::Inside) => {
                if entering {
                    mark.depth = mark.depth.saturating_add(1);
                }
                if mark.zone == Some(Zone::Inside) {
                    MarkUpdate::Unchanged
                } else {
                    mark.zone = Some(Zone::Inside);
                    MarkUpdate::Show(Zone::Inside)
                }
            }
            Some(edge) => {
                if mark.zone == Some(edge) {
                    MarkUpdate::Unchanged
                } else {
                    mark.zone = Some(edge);
                    mark.depth = 0;
                    MarkUpdate::Show(edge)
                }
            }
            None => {
                if mark.zone.take().is_some() {
                    MarkUpdate::Clear
                } else {
                    MarkUpdate::Unchanged
                }
            }
        }
    }
}
