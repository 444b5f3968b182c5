use crate::VirtualRange;

/// A lightweight snapshot of a windower's derived sizes and scheduling state.
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WindowState {
    pub row_height: u32,
    pub row_count: usize,
    /// `ceil(viewport extent / row_height)`.
    pub visible_rows: usize,
    /// Rows materialized per render pass (three viewports).
    pub cached_rows: usize,
    /// Scroll distance that triggers a re-render.
    pub scroll_cache_size: u64,
    /// The window a render pass would produce at the current offset.
    pub window: VirtualRange,
    pub last_rendered_offset: Option<u64>,
    pub update_depth: usize,
    pub cleanup_due_ms: Option<u64>,
}
