use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::error::RenderError;
use crate::rows::{FlatRows, RowSource, Viewport};
use crate::{Result, VirtualRange, WindowState, WindowerOptions};

/// A pending cleanup of stale rows, due at `due_ms`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct CleanupTask {
    due_ms: u64,
}

/// Renders the slice of an item source that surrounds the current scroll offset.
///
/// A render pass materializes `cached_rows = 3 * visible_rows` rows starting one viewport
/// above the visible area. Scrolling only re-renders once the offset has moved by more than
/// one viewport since the last pass. Rows left behind by earlier passes are discarded by a
/// debounced cleanup that the adapter drives through [`Windower::tick`].
///
/// This type does not hold a clock: time-dependent entry points take `now_ms`.
#[derive(Debug)]
pub struct Windower<S, V> {
    options: WindowerOptions,
    source: S,
    viewport: V,

    visible_rows: usize,
    cached_rows: usize,
    scroll_cache_size: u64,

    last_rendered_offset: Option<u64>,
    last_scroll_ms: Option<u64>,
    clock_ms: u64,
    update_depth: usize,
    cleanup: Option<CleanupTask>,
}

impl<S, V> Windower<S, V>
where
    V: Viewport,
    S: RowSource<V>,
{
    /// Creates a windower. Nothing is rendered until the first [`Windower::refresh`] or
    /// change.
    pub fn new(source: S, viewport: V, options: WindowerOptions) -> Self {
        let mut w = Self {
            options,
            source,
            viewport,
            visible_rows: 0,
            cached_rows: 0,
            scroll_cache_size: 0,
            last_rendered_offset: None,
            last_scroll_ms: None,
            clock_ms: 0,
            update_depth: 0,
            cleanup: None,
        };
        w.update_visible_rows();
        w
    }

    pub fn options(&self) -> &WindowerOptions {
        &self.options
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn viewport(&self) -> &V {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut V {
        &mut self.viewport
    }

    pub fn into_parts(self) -> (S, V) {
        (self.source, self.viewport)
    }

    pub fn row_height(&self) -> u32 {
        self.options.row_height
    }

    pub fn row_count(&self) -> usize {
        self.source.row_count()
    }

    pub fn visible_rows(&self) -> usize {
        self.visible_rows
    }

    pub fn cached_rows(&self) -> usize {
        self.cached_rows
    }

    pub fn scroll_cache_size(&self) -> u64 {
        self.scroll_cache_size
    }

    pub fn last_rendered_offset(&self) -> Option<u64> {
        self.last_rendered_offset
    }

    pub fn is_updating(&self) -> bool {
        self.update_depth > 0
    }

    pub fn cleanup_due_ms(&self) -> Option<u64> {
        self.cleanup.map(|t| t.due_ms)
    }

    pub fn set_options(&mut self, options: WindowerOptions) -> Result<()> {
        self.options = options;
        self.refresh()
    }

    pub fn set_row_height(&mut self, row_height: u32) -> Result<()> {
        vtrace!(row_height, "Windower::set_row_height");
        self.options.row_height = row_height;
        self.refresh()
    }

    /// Re-reads the viewport extent, updates derived sizes and renders.
    pub fn refresh(&mut self) -> Result<()> {
        self.update_visible_rows();
        self.update_content_extent();
        self.render()
    }

    pub fn begin_update(&mut self) {
        self.update_depth = self.update_depth.saturating_add(1);
    }

    /// Closes a batch; closing the outermost one invalidates.
    pub fn end_update(&mut self) -> Result<()> {
        debug_assert!(self.update_depth > 0, "end_update without begin_update");
        if self.update_depth == 0 {
            vwarn!("Windower::end_update without begin_update");
            return Ok(());
        }
        self.update_depth -= 1;
        if self.update_depth == 0 {
            return self.invalidate();
        }
        Ok(())
    }

    /// Runs `f` inside a batch.
    pub fn batch_update<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> Result<R> {
        self.begin_update();
        let out = f(self);
        self.end_update()?;
        Ok(out)
    }

    /// Invalidates now, or leaves it to the end of the current batch.
    pub fn request_invalidation(&mut self) -> Result<()> {
        if self.update_depth == 0 {
            return self.invalidate();
        }
        Ok(())
    }

    /// Publishes the content extent, schedules a cleanup and renders.
    pub fn invalidate(&mut self) -> Result<()> {
        vdebug!(rows = self.source.row_count(), "Windower::invalidate");
        self.update_content_extent();
        self.schedule_cleanup();
        self.render()
    }

    /// Materializes the current window and presents it. A no-op inside a batch.
    pub fn render(&mut self) -> Result<()> {
        if self.update_depth > 0 {
            return Ok(());
        }
        let row_height = self.options.row_height;
        if row_height == 0 || !self.source.is_ready() {
            return Ok(());
        }

        let offset = self.viewport.scroll_offset();
        let window = self.window_for(offset);
        vtrace!(
            offset,
            start = window.start_index,
            end = window.end_index,
            "Windower::render"
        );

        let mut batch = Vec::with_capacity(window.len() + 1);
        self.source
            .materialize(window, row_height, &mut self.viewport, &mut batch)?;
        self.viewport.present(batch);
        self.last_rendered_offset = Some(offset);
        Ok(())
    }

    /// The index range a render pass at `offset` would materialize.
    pub fn window_for(&self, offset: u64) -> VirtualRange {
        let row_height = self.options.row_height;
        if row_height == 0 {
            return VirtualRange::default();
        }
        let count = self.source.row_count();
        let first = usize::try_from(offset / row_height as u64)
            .unwrap_or(usize::MAX)
            .saturating_sub(self.visible_rows);
        let end = count.min(first.saturating_add(self.cached_rows));
        VirtualRange {
            start_index: first.min(end),
            end_index: end,
        }
    }

    pub fn window(&self) -> VirtualRange {
        self.window_for(self.viewport.scroll_offset())
    }

    /// Call this when the viewport reports a scroll.
    ///
    /// Schedules a cleanup if none is pending, and re-renders once the offset has drifted
    /// more than one viewport from the last rendered offset.
    pub fn on_scroll(&mut self, now_ms: u64) -> Result<()> {
        self.observe(now_ms);
        self.schedule_cleanup();

        let offset = self.viewport.scroll_offset();
        let drifted = match self.last_rendered_offset {
            None => true,
            Some(last) => offset.abs_diff(last) > self.scroll_cache_size,
        };
        let out = if drifted { self.render() } else { Ok(()) };
        self.last_scroll_ms = Some(now_ms);
        out
    }

    /// Runs the pending cleanup if it is due. Returns `true` when stale rows were discarded.
    ///
    /// A due cleanup is consumed either way; it only discards if no scroll happened within
    /// `scroll_quiet_ms` and it is not rescheduled otherwise.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        self.observe(now_ms);
        let Some(task) = self.cleanup else {
            return false;
        };
        if now_ms < task.due_ms {
            return false;
        }
        self.cleanup = None;

        let quiet = self
            .last_scroll_ms
            .is_none_or(|t| now_ms.saturating_sub(t) > self.options.scroll_quiet_ms);
        if quiet {
            vtrace!(now_ms, "Windower::tick: discarding stale rows");
            self.viewport.discard_stale();
        } else {
            vtrace!(now_ms, "Windower::tick: scrolled recently, skipping cleanup");
        }
        quiet
    }

    pub fn scroll_to(&mut self, offset: u64) -> Result<()> {
        self.viewport.scroll_to(offset);
        self.render()
    }

    /// Scrolls so that row `index` is at the top of the viewport. Returns the offset.
    pub fn scroll_to_row(&mut self, index: usize) -> Result<u64> {
        let offset = (index as u64).saturating_mul(self.options.row_height as u64);
        self.scroll_to(offset)?;
        Ok(offset)
    }

    pub fn state(&self) -> WindowState {
        WindowState {
            row_height: self.options.row_height,
            row_count: self.source.row_count(),
            visible_rows: self.visible_rows,
            cached_rows: self.cached_rows,
            scroll_cache_size: self.scroll_cache_size,
            window: self.window(),
            last_rendered_offset: self.last_rendered_offset,
            update_depth: self.update_depth,
            cleanup_due_ms: self.cleanup_due_ms(),
        }
    }

    fn observe(&mut self, now_ms: u64) {
        self.clock_ms = self.clock_ms.max(now_ms);
    }

    fn schedule_cleanup(&mut self) {
        if self.cleanup.is_none() {
            self.cleanup = Some(CleanupTask {
                due_ms: self.clock_ms.saturating_add(self.options.cleanup_delay_ms),
            });
        }
    }

    fn update_visible_rows(&mut self) {
        let row_height = self.options.row_height;
        if row_height == 0 {
            self.visible_rows = 0;
            self.cached_rows = 0;
            self.scroll_cache_size = 0;
            return;
        }
        self.visible_rows = self.viewport.extent().div_ceil(row_height) as usize;
        self.cached_rows = self.visible_rows.saturating_mul(3);
        self.scroll_cache_size = self.visible_rows as u64 * row_height as u64;
    }

    fn update_content_extent(&mut self) {
        let rows = self.source.row_count() as u64;
        let extent = rows
            .saturating_mul(self.options.row_height as u64)
            .saturating_add(self.source.trailing_extent() as u64);
        self.viewport.set_content_extent(extent);
    }
}

impl<V: Viewport> Windower<FlatRows<V::Row>, V> {
    /// A windower over `count` rows addressed by index.
    pub fn flat(viewport: V, count: usize, options: WindowerOptions) -> Self {
        Self::new(FlatRows::new(count), viewport, options)
    }

    pub fn set_row_count(&mut self, count: usize) -> Result<()> {
        vtrace!(count, "Windower::set_row_count");
        self.source.set_count(count);
        self.refresh()
    }

    pub fn set_renderer(
        &mut self,
        renderer: impl FnMut(usize, &mut V::Row) -> Result<(), RenderError> + 'static,
    ) -> Result<()> {
        self.source.set_renderer(Box::new(renderer));
        self.render()
    }
}
