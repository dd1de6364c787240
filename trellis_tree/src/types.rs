// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public configuration types for the tree layout cache.

/// Horizontal reading direction; mirrors row and expand-control x offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Rows indent rightward from the left edge.
    #[default]
    LeftToRight,
    /// The left-to-right result is mirrored about the viewport width.
    RightToLeft,
}

/// Which row cache backs a [`crate::TreeLayout`] instance.
///
/// The choice trades memory and structural-update cost against lookup cost:
///
/// - [`VariableHeight`](Self::VariableHeight) materializes every visible row
///   eagerly, measures each one, and keeps prefix sums of row heights. Row
///   and bounds lookups are O(log n); memory is O(visible rows).
/// - [`FixedHeight`](Self::FixedHeight) is the large-model mode: all rows
///   share the configured fixed row height, only expanded nodes are cached
///   (child and visible-descendant counts), and widths are measured lazily
///   for queried rows only. Memory is O(expanded nodes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Variant {
    /// Eager, per-row-measured cache.
    #[default]
    VariableHeight,
    /// Lazy, count-based cache for large models with a uniform row height.
    FixedHeight,
}

bitflags::bitflags! {
    /// Pending invalidation classes for the tree layout cache.
    ///
    /// Mutations OR bits in; the mask is cleared only after revalidation.
    /// Structural events and expansion toggles patch the valid cache in
    /// place instead of setting bits.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct Invalidation: u8 {
        /// Visible-row structure must be rebuilt (model swap, root
        /// visibility).
        const MODEL = 1 << 0;
        /// Row sizes must be re-measured (font, renderer, row height).
        const MEASURE = 1 << 1;
        /// The reading direction changed.
        const ORIENTATION = 1 << 2;
        /// The viewport size changed.
        const VIEWPORT = 1 << 3;
    }
}
