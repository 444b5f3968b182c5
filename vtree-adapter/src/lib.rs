//! Adapter utilities for the `vtree` crate.
//!
//! The `vtree` crate works in node handles and knows nothing about pointers. UI layers usually
//! only know which row index an event landed on. This crate bridges the two:
//!
//! - [`Controller`]: routes scroll, resize, affordance and drag events by row index
//! - Scroll anchoring (keep the first visible node in place across structural edits)
//!
//! This crate is framework-agnostic (no toolkit bindings).
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

mod anchor;
mod controller;

#[cfg(test)]
mod tests;

pub use anchor::{RowAnchor, apply_anchor, capture_first_visible_anchor};
pub use controller::Controller;
