// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The core extent-strip trait.

use crate::Scalar;

/// A dense 1D strip of per-item extents with prefix-sum-style queries.
///
/// All extents and offsets live in one caller-chosen axis (typically logical
/// pixels along a layout's primary axis) and are expected to be finite and
/// non-negative.
///
/// Query methods take `&mut self` so implementations are free to maintain
/// internal caches (lazily rebuilt prefix sums) without exposing interior
/// mutability at the call site.
pub trait Extents {
    /// Scalar type used for extents and offsets.
    type Scalar: Scalar;

    /// Number of items in the strip.
    fn len(&self) -> usize;

    /// Returns `true` if the strip has no items.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Extent of the item at `index`.
    ///
    /// Out-of-range indices report zero; callers that need hard failure check
    /// `index < len()` themselves.
    fn extent(&mut self, index: usize) -> Self::Scalar;

    /// Offset of the start of the item at `index` from the start of the strip.
    ///
    /// Implementations must guarantee that `start(0) == 0` when the strip is
    /// non-empty, and that `start(i + 1) == start(i) + extent(i)` for all
    /// valid `i`.
    fn start(&mut self, index: usize) -> Self::Scalar;

    /// Total extent of the entire strip.
    fn total(&mut self) -> Self::Scalar;

    /// Index of the item whose span contains `offset`.
    ///
    /// Offsets before the strip resolve to `0`; offsets at or past the end
    /// resolve to the last item. An empty strip resolves to `0`. Callers that
    /// must distinguish "outside the strip" compare `offset` against
    /// [`Extents::total`] first.
    fn find(&mut self, offset: Self::Scalar) -> usize;
}
