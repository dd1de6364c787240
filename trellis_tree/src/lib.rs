// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hierarchical layout cache for tree-like widgets.
//!
//! Given structure from an external [`TreeModel`], row sizes from a
//! [`RowMeasure`], and per-path expansion flags, [`TreeLayout`] maintains the
//! mapping between visible rows and tree paths: row counts, bounds, indent
//! geometry, expand-control hit zones, and closest-row hit testing. Two
//! cache [`Variant`]s back the same query surface: an eager per-row-measured
//! cache, and a count-based large-model cache for uniform row heights.
//!
//! Expansion toggles and model change events (`nodes_inserted`,
//! `nodes_removed`, `nodes_changed`, `structure_changed`) patch the cache in
//! place, touching only the affected subtree, and return [`Damage`] — the
//! regions a caller should repaint. Rows above a toggled node keep their
//! bounds; only the suffix shifts.
//!
//! ```
//! use kurbo::Size;
//! use trellis_tree::{TreeLayout, TreePath, Variant};
//!
//! // Root with one child; that child has two children of its own.
//! let model = |path: &TreePath| match path.as_slice() {
//!     [] => 1,
//!     [0] => 2,
//!     _ => 0,
//! };
//! let measure = |_: &TreePath| Size::new(80.0, 20.0);
//! let mut tree = TreeLayout::new(model, measure, Variant::VariableHeight);
//!
//! tree.set_expanded(&TreePath::root(), true);
//! assert_eq!(tree.visible_row_count(), 2); // root and its child
//!
//! let damage = tree.set_expanded(&TreePath::from([0]), true);
//! assert_eq!(tree.visible_row_count(), 4);
//! assert!(damage.union_rect().is_some());
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod damage;
mod engine;
mod fixed;
mod model;
mod path;
mod shared;
mod types;
mod variable;

pub use damage::Damage;
pub use engine::TreeLayout;
pub use model::{RowMeasure, TreeModel};
pub use path::TreePath;
pub use types::{Direction, Invalidation, Variant};
