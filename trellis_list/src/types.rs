// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types shared by the list engine: wrap mode, direction, invalidation
//! classes, and the item-measurer boundary.

use kurbo::{Rect, Size};

/// How cells flow when the model does not fit the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WrapMode {
    /// A single vertical column; rows may have individual heights.
    #[default]
    None,
    /// Cells flow left-to-right and wrap to the next row (row-major order).
    WrapByRow,
    /// Cells flow top-to-bottom and wrap to the next column (column-major order).
    WrapByColumn,
}

/// Horizontal reading direction of the layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Columns grow rightward from the left edge.
    #[default]
    LeftToRight,
    /// The left-to-right result is mirrored about the layout width.
    RightToLeft,
}

bitflags::bitflags! {
    /// Pending invalidation classes for a layout cache.
    ///
    /// Mutations OR bits in; the mask is cleared only after a full recompute.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct Invalidation: u8 {
        /// The model's item count or content changed.
        const MODEL = 1 << 0;
        /// A size-affecting property changed (font, renderer, prototype).
        const MEASURE = 1 << 1;
        /// The fixed cell width override changed.
        const FIXED_WIDTH = 1 << 2;
        /// The fixed cell height override changed.
        const FIXED_HEIGHT = 1 << 3;
        /// Wrap mode or reading direction changed.
        const ORIENTATION = 1 << 4;
        /// The viewport size changed.
        const VIEWPORT = 1 << 5;
    }
}

/// The item-measurer boundary: intrinsic size of the item at `index`.
///
/// This is the engine's only view of the renderer. It is invoked once per
/// item per invalidation cycle and memoized; implementations should be cheap
/// and pure from the engine's perspective. Closures `FnMut(usize) -> Size`
/// implement it directly.
///
/// A measurer standing in for "no renderer configured" should return
/// [`Size::ZERO`]; the engine degrades to zero-extent cells rather than
/// failing.
pub trait ItemMeasure {
    /// Returns the preferred size of the item at `index`.
    fn measure(&mut self, index: usize) -> Size;
}

impl<F: FnMut(usize) -> Size> ItemMeasure for F {
    fn measure(&mut self, index: usize) -> Size {
        self(index)
    }
}

/// Mirrors a rectangle about a layout of total width `width`.
///
/// This is the final right-to-left transform: `x' = width - x - w`. Applying
/// it twice returns the original rectangle.
#[must_use]
pub fn mirror_x(rect: Rect, width: f64) -> Rect {
    Rect::new(width - rect.x1, rect.y0, width - rect.x0, rect.y1)
}

#[cfg(test)]
mod tests {
    use kurbo::Rect;

    use super::mirror_x;

    #[test]
    fn mirror_is_an_involution() {
        let r = Rect::new(10.0, 5.0, 30.0, 25.0);
        let m = mirror_x(r, 100.0);
        assert_eq!(m, Rect::new(70.0, 5.0, 90.0, 25.0));
        assert_eq!(mirror_x(m, 100.0), r);
    }
}
