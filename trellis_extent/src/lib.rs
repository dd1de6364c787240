// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Extent: 1D per-axis extent caching for widget layout.
//!
//! Layout engines for lists, tabs, and trees all need the same 1D primitive:
//! given items indexed `0..len`, each with an extent along one axis, answer
//! "where does item `i` start?", "how big is the whole strip?", and "which
//! item contains offset `y`?" — repeatedly, cheaply, and after partial
//! invalidation.
//!
//! The core concepts are:
//!
//! - [`Scalar`]: a small abstraction over `f32`/`f64` used for extents and
//!   offsets.
//! - [`Extents`]: a trait describing a dense strip of per-item extents with
//!   prefix-sum-style queries.
//! - [`FixedExtents`]: every item shares one configured extent (a fixed cell
//!   height/width override). Queries are O(1) arithmetic.
//! - [`MeasuredExtents`]: per-item extents fed in from an external measurer,
//!   backed by a lazily maintained prefix-sum cache. Updating one item only
//!   invalidates the suffix of the cache from that index on, so repeated
//!   queries stay O(log n) instead of degrading to O(n²) across a session.
//!
//! This crate deliberately does **not** know about rectangles, widgets, or
//! orientation. Host engines pick an axis, feed measured extents in, and
//! combine two strips (or a strip and a fixed cross extent) into rectangles.
//!
//! ## Example
//!
//! ```rust
//! use trellis_extent::{Extents, MeasuredExtents};
//!
//! let mut heights = MeasuredExtents::<f64>::new();
//! heights.refill(3, |i| 10.0 * (i + 1) as f64);
//!
//! assert_eq!(heights.total(), 60.0);
//! assert_eq!(heights.start(2), 30.0);
//! // Offset 35.0 falls inside item 2 (spanning 30.0..60.0).
//! assert_eq!(heights.find(35.0), 2);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod fixed;
mod measured;
mod scalar;
mod traits;

pub use fixed::FixedExtents;
pub use measured::MeasuredExtents;
pub use scalar::Scalar;
pub use traits::Extents;
