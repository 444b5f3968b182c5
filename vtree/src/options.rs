use alloc::string::String;

use crate::Affordance;

/// Configuration for [`crate::Windower`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WindowerOptions {
    /// Fixed row size in the scroll axis.
    pub row_height: u32,
    /// Delay between a scroll (or invalidation) and the cleanup of stale rows.
    pub cleanup_delay_ms: u64,
    /// A pending cleanup only discards stale rows if no scroll event happened within this
    /// window before it fires.
    pub scroll_quiet_ms: u64,
}

impl Default for WindowerOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl WindowerOptions {
    pub const DEFAULT_ROW_HEIGHT: u32 = 30;
    pub const DEFAULT_CLEANUP_DELAY_MS: u64 = 300;
    pub const DEFAULT_SCROLL_QUIET_MS: u64 = 100;

    pub fn new() -> Self {
        Self {
            row_height: Self::DEFAULT_ROW_HEIGHT,
            cleanup_delay_ms: Self::DEFAULT_CLEANUP_DELAY_MS,
            scroll_quiet_ms: Self::DEFAULT_SCROLL_QUIET_MS,
        }
    }

    pub fn with_row_height(mut self, row_height: u32) -> Self {
        self.row_height = row_height;
        self
    }

    pub fn with_cleanup_delay_ms(mut self, delay_ms: u64) -> Self {
        self.cleanup_delay_ms = delay_ms;
        self
    }

    pub fn with_scroll_quiet_ms(mut self, quiet_ms: u64) -> Self {
        self.scroll_quiet_ms = quiet_ms;
        self
    }
}

/// Built-in glyphs for the expand/collapse affordance.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Glyphs {
    pub expand: String,
    pub collapse: String,
}

impl Default for Glyphs {
    fn default() -> Self {
        Self {
            expand: String::from("\u{25BA}"),
            collapse: String::from("\u{25BC}"),
        }
    }
}

impl Glyphs {
    pub fn glyph(&self, affordance: Affordance) -> &str {
        match affordance {
            Affordance::Expand => &self.expand,
            Affordance::Collapse => &self.collapse,
        }
    }
}

/// Configuration for [`crate::TreeWindower`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TreeOptions {
    pub window: WindowerOptions,
    /// Indent per nest level, in the cross axis.
    pub indent: u32,
    /// Thickness of the before/after drop margins at a row's edges, and of the trailing free
    /// zone after the last row.
    pub free_zone: u32,
    pub glyphs: Glyphs,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeOptions {
    pub const DEFAULT_INDENT: u32 = 50;
    pub const DEFAULT_FREE_ZONE: u32 = 7;

    pub fn new() -> Self {
        Self {
            window: WindowerOptions::new(),
            indent: Self::DEFAULT_INDENT,
            free_zone: Self::DEFAULT_FREE_ZONE,
            glyphs: Glyphs::default(),
        }
    }

    pub fn with_window(mut self, window: WindowerOptions) -> Self {
        self.window = window;
        self
    }

    pub fn with_row_height(mut self, row_height: u32) -> Self {
        self.window.row_height = row_height;
        self
    }

    pub fn with_indent(mut self, indent: u32) -> Self {
        self.indent = indent;
        self
    }

    pub fn with_free_zone(mut self, free_zone: u32) -> Self {
        self.free_zone = free_zone;
        self
    }

    pub fn with_glyphs(mut self, glyphs: Glyphs) -> Self {
        self.glyphs = glyphs;
        self
    }
}
