// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis List: the linear/grid layout engine for list-like widgets.
//!
//! This crate computes, from a model size and per-item sizes supplied by an
//! external measurer, a stable 2D placement for list cells:
//!
//! - [`WrapMode::None`]: a single vertical column with fixed or individually
//!   measured row heights.
//! - [`WrapMode::WrapByRow`]: cells flow left-to-right, wrapping to the next
//!   row (row-major index order).
//! - [`WrapMode::WrapByColumn`]: cells flow top-to-bottom, wrapping to the
//!   next column (column-major index order).
//!
//! The engine is a cache with an invalidation bitmask: mutations
//! ([`ListLayout::set_wrap_mode`], [`ListLayout::set_viewport`], model
//! changes, ...) only OR bits into the mask; every query revalidates lazily
//! through a single internal gate before answering. Queries return
//! `Option`/sentinel values for out-of-range input and never panic.
//!
//! Right-to-left layouts are produced by mirroring the left-to-right result
//! as a final transform (`x' = W - x - w`), never computed natively, so the
//! partitioning math stays orientation-agnostic.
//!
//! ## Example
//!
//! ```rust
//! use kurbo::Size;
//! use trellis_list::{ListLayout, WrapMode};
//!
//! // 10 items, each 40×20, wrapped into columns of at most 8 visible rows.
//! let mut layout = ListLayout::new(|_: usize| Size::new(40.0, 20.0));
//! layout.set_model_len(10);
//! layout.set_wrap_mode(WrapMode::WrapByColumn);
//! layout.set_visible_row_count(8);
//!
//! // 10 items over 8 visible rows → 2 balanced columns of 5 rows.
//! assert_eq!(layout.column_count(), 2);
//! let r = layout.bounds_of(5).unwrap();
//! assert_eq!((r.x0, r.y0), (40.0, 0.0));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod layout;
mod types;

pub use layout::{ListGeometry, ListLayout};
pub use types::{Direction, Invalidation, ItemMeasure, WrapMode, mirror_x};
