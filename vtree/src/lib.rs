//! A headless virtual tree.
//!
//! For adapter-level utilities (event routing, scroll anchoring), see the `vtree-adapter`
//! crate.
//!
//! This crate renders lists and trees with a fixed row height by only materializing the rows
//! around the current scroll offset:
//!
//! - [`Windower`]: the windowing state machine (hysteresis, debounced cleanup, batching)
//! - [`Tree`]: an arena-backed n-ary tree whose node and row counts stay current on every
//!   edit, with document-order traversal and index cursors
//! - [`TreeWindower`]: a windower over the visible rows of a tree
//! - [`ReorderController`]: drag-and-drop reordering with before/after/inside drop zones
//!
//! It is UI-agnostic. A TUI/GUI layer is expected to provide a [`Viewport`]:
//! - viewport extent and scroll offset
//! - row creation and presentation
//! - a clock, passed in as `now_ms` to the time-dependent calls
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod error;
mod options;
mod reorder;
mod rows;
mod state;
mod tree;
mod tree_windower;
mod types;
mod walk;
mod windower;


pub use error::{Error, RenderError, Result};
pub use options::{Glyphs, TreeOptions, WindowerOptions};
pub use reorder::{DropAllowed, DropNotifier, MarkUpdate, ReorderController, classify};
pub use rows::{
    AffordanceRenderer, FlatRenderer, FlatRows, RowSource, TreeRenderer, TreeRow, TreeRows,
    Viewport,
};
pub use state::WindowState;
pub use tree::{Children, Tree};
pub use tree_windower::TreeWindower;
pub use types::{
    Affordance, Control, NodeId, Placement, RowSlot, SlotKind, VirtualRange, Walk, WalkMode,
    WalkOptions, Zone,
};
pub use walk::IndexCursor;
pub use windower::Windower;
