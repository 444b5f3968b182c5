slotmap::new_key_type! {
    /// A stable handle to a node held by a [`crate::Tree`] arena.
    ///
    /// Handles are versioned: once a node is discarded (or the tree is cleared) its handle
    /// becomes stale and every operation reports [`crate::Error::UnknownNode`] for it.
    pub struct NodeId;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VirtualRange {
    pub start_index: usize,
    pub end_index: usize, // exclusive
}

impl VirtualRange {
    pub fn is_empty(&self) -> bool {
        self.start_index >= self.end_index
    }

    pub fn len(&self) -> usize {
        self.end_index.saturating_sub(self.start_index)
    }

    pub fn contains(&self, index: usize) -> bool {
        index >= self.start_index && index < self.end_index
    }
}

/// What a materialized row slot stands for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SlotKind {
    /// A regular data row.
    Row,
    /// The drop margin after the last tree row ("append as last child of root").
    FreeZone,
}

/// Geometry of a row the viewport is asked to create during a render pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RowSlot {
    /// 0-based row index. The free zone uses `row_count`.
    pub index: usize,
    /// Start offset in the scroll axis.
    pub top: u64,
    pub height: u32,
    /// Leading indent in the cross axis (tree rows only).
    pub indent: u32,
    pub kind: SlotKind,
}

impl RowSlot {
    pub fn end(&self) -> u64 {
        self.top.saturating_add(self.height as u64)
    }
}

/// The expand/collapse control drawn on tree rows that have (or had) children.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Affordance {
    /// The node is collapsed and has children.
    Expand,
    /// The node is expanded.
    Collapse,
}

/// Where a dragged node lands relative to the row it is dropped on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Zone {
    Before,
    After,
    Inside,
}

/// Visitor verdict for a single node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Control {
    Continue,
    Stop,
}

/// Outcome of a traversal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Walk {
    /// Every reachable node was visited and no visitor stopped.
    Completed,
    /// A visitor stopped an [`WalkMode::All`] traversal.
    Stopped,
    /// At least one visitor stopped inside an [`WalkMode::Any`] traversal.
    Matched,
}

impl Walk {
    pub fn is_stopped(self) -> bool {
        matches!(self, Self::Stopped)
    }

    pub fn is_matched(self) -> bool {
        matches!(self, Self::Matched)
    }
}

/// How visitor `Stop` signals combine across siblings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WalkMode {
    /// AND: the first `Stop` aborts the whole traversal.
    #[default]
    All,
    /// OR: a `Stop` prunes that node's subtree, siblings are still walked, and the result is
    /// [`Walk::Matched`] if any visitor stopped.
    Any,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WalkOptions {
    /// Only descend into children of expanded nodes.
    pub visible_only: bool,
    /// Walk children last-to-first.
    pub reverse: bool,
    pub mode: WalkMode,
}

impl WalkOptions {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn visible() -> Self {
        Self {
            visible_only: true,
            ..Self::default()
        }
    }

    pub fn with_visible_only(mut self, visible_only: bool) -> Self {
        self.visible_only = visible_only;
        self
    }

    pub fn with_reverse(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }

    pub fn with_mode(mut self, mode: WalkMode) -> Self {
        self.mode = mode;
        self
    }
}

/// A resolved drop position: `node` goes under `parent`, before `reference` (or last when
/// `reference` is `None`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Placement {
    pub parent: NodeId,
    pub reference: Option<NodeId>,
    pub node: NodeId,
}
