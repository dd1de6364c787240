// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the tab engine: placement, style, runs, invalidation,
//! and the tab-measurer boundary.

use kurbo::Size;

/// Which edge of the widget the tab area occupies.
///
/// `Top`/`Bottom` lay runs out horizontally (primary axis is x);
/// `Left`/`Right` lay runs out vertically (primary axis is y).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Placement {
    /// Tab area above the content.
    #[default]
    Top,
    /// Tab area below the content.
    Bottom,
    /// Tab area left of the content.
    Left,
    /// Tab area right of the content.
    Right,
}

impl Placement {
    /// Returns `true` for placements whose runs lay out along the x axis.
    #[must_use]
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Self::Top | Self::Bottom)
    }
}

/// How the engine handles tabs that do not fit the primary extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutStyle {
    /// Wrap into multiple runs, normalized and padded.
    #[default]
    Wrap,
    /// Keep a single run and scroll it by whole tabs (a leading index).
    Scroll,
}

/// Horizontal reading direction; mirrors horizontal-placement layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Tabs grow rightward from the left edge.
    #[default]
    LeftToRight,
    /// The left-to-right result is mirrored about the layout width.
    RightToLeft,
}

/// A contiguous span of tab indices `[start, end)` assigned to one line.
///
/// Runs partition the full tab sequence without gaps or overlaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run {
    /// First tab in the run (inclusive).
    pub start: usize,
    /// One past the last tab in the run (exclusive).
    pub end: usize,
}

impl Run {
    /// Number of tabs in this run.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns `true` if the run holds no tabs.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns `true` if `index` belongs to this run.
    #[must_use]
    pub const fn contains(&self, index: usize) -> bool {
        self.start <= index && index < self.end
    }
}

bitflags::bitflags! {
    /// Pending invalidation classes for the tab layout cache.
    ///
    /// Mutations OR bits in; the mask is cleared only after a full recompute.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct Invalidation: u8 {
        /// The number of tabs changed.
        const MODEL = 1 << 0;
        /// Tab sizes must be re-measured (font, renderer, titles).
        const MEASURE = 1 << 1;
        /// The selection moved (affects rotation and padding).
        const SELECTION = 1 << 2;
        /// Placement, style, or reading direction changed.
        const ORIENTATION = 1 << 3;
        /// The viewport size changed.
        const VIEWPORT = 1 << 4;
    }
}

/// The tab-measurer boundary: intrinsic size of the tab at `index`.
///
/// Invoked once per tab per invalidation cycle and memoized. The engine reads
/// the primary-axis component (width for horizontal placements, height for
/// vertical ones) per tab and takes the maximum of the cross-axis component
/// over all tabs. Closures `FnMut(usize) -> Size` implement it directly.
pub trait TabMeasure {
    /// Returns the preferred size of the tab at `index`.
    fn measure(&mut self, index: usize) -> Size;
}

impl<F: FnMut(usize) -> Size> TabMeasure for F {
    fn measure(&mut self, index: usize) -> Size {
        self(index)
    }
}
