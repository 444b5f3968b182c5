use alloc::boxed::Box;

use crate::error::RenderError;
use crate::rows::{TreeRow, TreeRows, Viewport};
use crate::{
    Affordance, NodeId, Result, Tree, TreeOptions, VirtualRange, WindowState, Windower,
};

/// A [`Windower`] over the visible rows of a [`Tree`].
///
/// Structural edits go through this type so that every change to the connected tree is
/// followed by an invalidation (or folded into the surrounding batch). Read access to the
/// tree is always available through [`TreeWindower::tree`].
pub struct TreeWindower<T, V: Viewport> {
    windower: Windower<TreeRows<T, V::Row>, V>,
}

impl<T, V: Viewport> TreeWindower<T, V> {
    pub fn new(viewport: V, options: TreeOptions) -> Self {
        Self::with_tree(Tree::new(), viewport, options)
    }

    pub fn with_tree(tree: Tree<T>, viewport: V, options: TreeOptions) -> Self {
        let rows = TreeRows::new(tree, &options);
        Self {
            windower: Windower::new(rows, viewport, options.window),
        }
    }

    pub fn windower(&self) -> &Windower<TreeRows<T, V::Row>, V> {
        &self.windower
    }

    pub fn tree(&self) -> &Tree<T> {
        self.windower.source().tree()
    }

    pub fn viewport(&self) -> &V {
        self.windower.viewport()
    }

    pub fn viewport_mut(&mut self) -> &mut V {
        self.windower.viewport_mut()
    }

    pub fn row_height(&self) -> u32 {
        self.windower.row_height()
    }

    pub fn free_zone(&self) -> u32 {
        self.windower.source().free_zone()
    }

    pub fn row_count(&self) -> usize {
        self.tree().row_count()
    }

    pub fn node_count(&self) -> usize {
        self.tree().node_count()
    }

    pub fn window(&self) -> VirtualRange {
        self.windower.window()
    }

    pub fn state(&self) -> WindowState {
        self.windower.state()
    }

    /// The node drawn at row `index` by the last render pass; the free zone maps to the root.
    pub fn row_target(&self, index: usize) -> Option<NodeId> {
        self.windower.source().row_target(index)
    }

    pub fn set_renderer(
        &mut self,
        renderer: impl FnMut(TreeRow<'_, T>, &mut V::Row) -> Result<(), RenderError> + 'static,
    ) -> Result<()> {
        self.windower.source_mut().set_renderer(Box::new(renderer));
        self.windower.render()
    }

    /// Replaces the built-in glyph attachment for expand/collapse controls.
    pub fn set_affordance_renderer(
        &mut self,
        renderer: impl FnMut(Affordance, &mut V::Row) + 'static,
    ) -> Result<()> {
        self.windower
            .source_mut()
            .set_affordance_renderer(Some(Box::new(renderer)));
        self.windower.render()
    }

    /// Goes back to the configured glyphs.
    pub fn clear_affordance_renderer(&mut self) -> Result<()> {
        self.windower.source_mut().set_affordance_renderer(None);
        self.windower.render()
    }

    pub fn set_row_height(&mut self, row_height: u32) -> Result<()> {
        self.windower.set_row_height(row_height)
    }

    pub fn refresh(&mut self) -> Result<()> {
        self.windower.refresh()
    }

    pub fn render(&mut self) -> Result<()> {
        self.windower.render()
    }

    pub fn begin_update(&mut self) {
        self.windower.begin_update();
    }

    pub fn end_update(&mut self) -> Result<()> {
        self.windower.end_update()
    }

    pub fn batch_update<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> Result<R> {
        self.begin_update();
        let out = f(self);
        self.end_update()?;
        Ok(out)
    }

    /// Runs `f` against the tree and invalidates if the connected structure changed.
    pub fn edit<R>(&mut self, f: impl FnOnce(&mut Tree<T>) -> R) -> Result<R> {
        let tree = self.windower.source_mut().tree_mut();
        let out = f(tree);
        if tree.take_invalidation() {
            self.windower.request_invalidation()?;
        }
        Ok(out)
    }

    fn apply<R>(&mut self, f: impl FnOnce(&mut Tree<T>) -> Result<R>) -> Result<R> {
        self.edit(f)?
    }

    /// Allocates a detached node.
    pub fn create(&mut self, payload: T) -> NodeId {
        self.windower.source_mut().tree_mut().create(payload)
    }

    pub fn discard(&mut self, node: NodeId) -> Result<T> {
        self.apply(|t| t.discard(node))
    }

    pub fn append_child(&mut self, parent: NodeId, node: NodeId) -> Result<()> {
        self.apply(|t| t.append_child(parent, node))
    }

    pub fn prepend_child(&mut self, parent: NodeId, node: NodeId) -> Result<()> {
        self.apply(|t| t.prepend_child(parent, node))
    }

    pub fn insert_before(&mut self, reference: NodeId, node: NodeId) -> Result<()> {
        self.apply(|t| t.insert_before(reference, node))
    }

    pub fn insert_after(&mut self, reference: NodeId, node: NodeId) -> Result<()> {
        self.apply(|t| t.insert_after(reference, node))
    }

    pub fn remove(&mut self, node: NodeId) -> Result<()> {
        self.apply(|t| t.remove(node))
    }

    pub fn set_expanded(&mut self, node: NodeId, expanded: bool) -> Result<isize> {
        self.apply(|t| t.set_expanded(node, expanded))
    }

    pub fn toggle_expanded(&mut self, node: NodeId) -> Result<isize> {
        self.apply(|t| t.toggle_expanded(node))
    }

    pub fn clear(&mut self) -> Result<()> {
        self.edit(|t| t.clear())
    }

    pub fn on_scroll(&mut self, now_ms: u64) -> Result<()> {
        self.windower.on_scroll(now_ms)
    }

    pub fn tick(&mut self, now_ms: u64) -> bool {
        self.windower.tick(now_ms)
    }

    pub fn scroll_to(&mut self, offset: u64) -> Result<()> {
        self.windower.scroll_to(offset)
    }

    pub fn scroll_to_row(&mut self, index: usize) -> Result<u64> {
        self.windower.scroll_to_row(index)
    }
}
