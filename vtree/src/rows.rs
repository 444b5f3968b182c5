use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::error::RenderError;
use crate::{Affordance, Glyphs, NodeId, Result, RowSlot, SlotKind, Tree, TreeOptions, VirtualRange};

/// The display surface a windower renders into.
///
/// The windower never looks inside `Row`: it asks the viewport for a fresh row per slot,
/// hands it to a renderer, and then presents the whole batch.
pub trait Viewport {
    type Row;

    /// Visible size in the scroll axis.
    fn extent(&self) -> u32;

    fn scroll_offset(&self) -> u64;

    fn scroll_to(&mut self, offset: u64);

    /// Total scrollable size (e.g. the height of a scroller element).
    fn set_content_extent(&mut self, extent: u64);

    fn create_row(&mut self, slot: RowSlot) -> Self::Row;

    /// Attaches the built-in expand/collapse control to a tree row.
    fn attach_affordance(&mut self, row: &mut Self::Row, affordance: Affordance, glyph: &str) {
        let _ = (row, affordance, glyph);
    }

    /// Shows `rows`. Rows presented by earlier passes are hidden and become stale.
    fn present(&mut self, rows: Vec<Self::Row>);

    /// Drops every stale row.
    fn discard_stale(&mut self);
}

/// Something a [`crate::Windower`] can materialize rows from.
pub trait RowSource<V: Viewport> {
    fn row_count(&self) -> usize;

    /// Extra scrollable space after the last row.
    fn trailing_extent(&self) -> u32 {
        0
    }

    /// Whether a render pass would produce anything (a renderer is installed).
    fn is_ready(&self) -> bool {
        true
    }

    /// Creates, fills and pushes the rows of `window` into `batch`.
    fn materialize(
        &mut self,
        window: VirtualRange,
        row_height: u32,
        viewport: &mut V,
        batch: &mut Vec<V::Row>,
    ) -> Result<()>;
}

pub type FlatRenderer<R> = Box<dyn FnMut(usize, &mut R) -> Result<(), RenderError>>;

/// Rows addressed by index only.
pub struct FlatRows<R> {
    count: usize,
    renderer: Option<FlatRenderer<R>>,
}

impl<R> FlatRows<R> {
    pub fn new(count: usize) -> Self {
        Self {
            count,
            renderer: None,
        }
    }

    pub fn with_renderer(
        mut self,
        renderer: impl FnMut(usize, &mut R) -> Result<(), RenderError> + 'static,
    ) -> Self {
        self.renderer = Some(Box::new(renderer));
        self
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub(crate) fn set_count(&mut self, count: usize) {
        self.count = count;
    }

    pub(crate) fn set_renderer(&mut self, renderer: FlatRenderer<R>) {
        self.renderer = Some(renderer);
    }
}

impl<R> core::fmt::Debug for FlatRows<R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FlatRows")
            .field("count", &self.count)
            .field("renderer", &self.renderer.is_some())
            .finish()
    }
}

impl<V: Viewport> RowSource<V> for FlatRows<V::Row> {
    fn row_count(&self) -> usize {
        self.count
    }

    fn is_ready(&self) -> bool {
        self.renderer.is_some()
    }

    fn materialize(
        &mut self,
        window: VirtualRange,
        row_height: u32,
        viewport: &mut V,
        batch: &mut Vec<V::Row>,
    ) -> Result<()> {
        let Some(renderer) = self.renderer.as_mut() else {
            return Ok(());
        };
        for index in window.start_index..window.end_index {
            let mut row = viewport.create_row(RowSlot {
                index,
                top: index as u64 * row_height as u64,
                height: row_height,
                indent: 0,
                kind: SlotKind::Row,
            });
            renderer(index, &mut row)?;
            batch.push(row);
        }
        Ok(())
    }
}

/// What a tree row renderer gets to see about the node it fills.
#[derive(Debug)]
pub struct TreeRow<'a, T> {
    pub id: NodeId,
    pub payload: &'a T,
    /// 0-based row index.
    pub index: usize,
    /// 1 for children of the root.
    pub nest_level: usize,
    pub expanded: bool,
    pub has_children: bool,
}

pub type TreeRenderer<T, R> = Box<dyn FnMut(TreeRow<'_, T>, &mut R) -> Result<(), RenderError>>;

pub type AffordanceRenderer<R> = Box<dyn FnMut(Affordance, &mut R)>;

/// Rows taken from the visible nodes of a [`Tree`], in document order.
pub struct TreeRows<T, R> {
    tree: Tree<T>,
    indent: u32,
    free_zone: u32,
    glyphs: Glyphs,
    renderer: Option<TreeRenderer<T, R>>,
    affordance_renderer: Option<AffordanceRenderer<R>>,
    rendered: Vec<NodeId>,
    rendered_start: usize,
    free_zone_index: Option<usize>,
}

impl<T, R> TreeRows<T, R> {
    pub fn new(tree: Tree<T>, options: &TreeOptions) -> Self {
        Self {
            tree,
            indent: options.indent,
            free_zone: options.free_zone,
            glyphs: options.glyphs.clone(),
            renderer: None,
            affordance_renderer: None,
            rendered: Vec::new(),
            rendered_start: 0,
            free_zone_index: None,
        }
    }

    pub fn tree(&self) -> &Tree<T> {
        &self.tree
    }

    pub(crate) fn tree_mut(&mut self) -> &mut Tree<T> {
        &mut self.tree
    }

    pub fn indent(&self) -> u32 {
        self.indent
    }

    pub fn free_zone(&self) -> u32 {
        self.free_zone
    }

    pub(crate) fn set_renderer(&mut self, renderer: TreeRenderer<T, R>) {
        self.renderer = Some(renderer);
    }

    pub(crate) fn set_affordance_renderer(&mut self, renderer: Option<AffordanceRenderer<R>>) {
        self.affordance_renderer = renderer;
    }

    /// The node drawn at row `index` by the last render pass. The free zone maps to the root.
    pub fn row_target(&self, index: usize) -> Option<NodeId> {
        if self.free_zone_index == Some(index) {
            return Some(self.tree.root());
        }
        index
            .checked_sub(self.rendered_start)
            .and_then(|i| self.rendered.get(i).copied())
            .filter(|&id| self.tree.contains(id))
    }

    /// Indent of `node`'s row in the cross axis.
    pub fn indent_of(&self, node: NodeId) -> u32 {
        let level = self.tree.nest_level(node).saturating_sub(1);
        self.indent.saturating_mul(level as u32)
    }
}

fn affordance(expanded: bool, has_children: bool) -> Option<Affordance> {
    if expanded {
        Some(Affordance::Collapse)
    } else if has_children {
        Some(Affordance::Expand)
    } else {
        None
    }
}

impl<T, V: Viewport> RowSource<V> for TreeRows<T, V::Row> {
    fn row_count(&self) -> usize {
        self.tree.row_count()
    }

    fn trailing_extent(&self) -> u32 {
        self.free_zone
    }

    fn is_ready(&self) -> bool {
        self.renderer.is_some()
    }

    fn materialize(
        &mut self,
        window: VirtualRange,
        row_height: u32,
        viewport: &mut V,
        batch: &mut Vec<V::Row>,
    ) -> Result<()> {
        let Some(renderer) = self.renderer.as_mut() else {
            return Ok(());
        };
        let tree = &self.tree;
        let mut drawn = Vec::with_capacity(window.len());

        let cursor = tree.cursor(window.start_index + 1, window.end_index, true);
        for (offset, id) in cursor.enumerate() {
            let index = window.start_index + offset;
            let Some(payload) = tree.get(id) else {
                continue;
            };
            let nest_level = tree.nest_level(id);
            let expanded = tree.is_expanded(id);
            let has_children = tree.has_children(id);

            let mut row = viewport.create_row(RowSlot {
                index,
                top: index as u64 * row_height as u64,
                height: row_height,
                indent: self
                    .indent
                    .saturating_mul(nest_level.saturating_sub(1) as u32),
                kind: SlotKind::Row,
            });
            if let Some(affordance) = affordance(expanded, has_children) {
                match self.affordance_renderer.as_mut() {
                    Some(f) => f(affordance, &mut row),
                    None => viewport.attach_affordance(
                        &mut row,
                        affordance,
                        self.glyphs.glyph(affordance),
                    ),
                }
            }
            renderer(
                TreeRow {
                    id,
                    payload,
                    index,
                    nest_level,
                    expanded,
                    has_children,
                },
                &mut row,
            )?;
            batch.push(row);
            drawn.push(id);
        }

        let row_count = tree.row_count();
        let mut free_zone_index = None;
        if window.end_index == row_count {
            batch.push(viewport.create_row(RowSlot {
                index: row_count,
                top: row_count as u64 * row_height as u64,
                height: self.free_zone,
                indent: 0,
                kind: SlotKind::FreeZone,
            }));
            free_zone_index = Some(row_count);
        }

        self.rendered = drawn;
        self.rendered_start = window.start_index;
        self.free_zone_index = free_zone_index;
        Ok(())
    }
}
