// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The list layout engine: cached geometry, lazy revalidation, queries.

use alloc::vec::Vec;

use kurbo::{Insets, Point, Rect, Size};
use trellis_extent::{Extents, MeasuredExtents, Scalar};

use crate::{Direction, Invalidation, ItemMeasure, WrapMode, mirror_x};

/// Per-row heights for the non-wrapped mode.
#[derive(Clone, Debug)]
enum RowHeights {
    /// Every row shares one height (fixed override, or wrapped layout).
    Uniform(f64),
    /// Individually measured heights over a lazy prefix-sum cache.
    Measured(MeasuredExtents<f64>),
}

/// The immutable result of one layout computation.
///
/// A geometry is produced by a single computation pass over the model and
/// answers all placement queries against that snapshot. Query methods take
/// `&mut self` only so the internal prefix-sum cache can be consulted
/// lazily; they never change what the geometry describes.
#[derive(Clone, Debug)]
pub struct ListGeometry {
    len: usize,
    wrap: WrapMode,
    direction: Direction,
    insets: Insets,
    cell_width: f64,
    cell_height: f64,
    heights: RowHeights,
    column_count: usize,
    rows_per_column: usize,
    content: Size,
    mirror_width: f64,
}

impl ListGeometry {
    fn empty() -> Self {
        Self {
            len: 0,
            wrap: WrapMode::None,
            direction: Direction::LeftToRight,
            insets: Insets::ZERO,
            cell_width: 0.0,
            cell_height: 0.0,
            heights: RowHeights::Uniform(0.0),
            column_count: 0,
            rows_per_column: 0,
            content: Size::ZERO,
            mirror_width: 0.0,
        }
    }

    /// Number of items covered by this geometry.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the geometry covers no items.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of columns, zero for an empty model.
    #[must_use]
    pub const fn column_count(&self) -> usize {
        self.column_count
    }

    /// Rows per full column; the last column may hold fewer (the remainder).
    #[must_use]
    pub const fn rows_per_column(&self) -> usize {
        self.rows_per_column
    }

    /// Total content size, insets included.
    #[must_use]
    pub const fn content_size(&self) -> Size {
        self.content
    }

    /// Height of `row`, or `None` if the row is out of range.
    pub fn row_height(&mut self, row: usize) -> Option<f64> {
        if row >= self.row_count() {
            return None;
        }
        Some(match &mut self.heights {
            RowHeights::Uniform(h) => *h,
            RowHeights::Measured(heights) => heights.extent(row),
        })
    }

    /// Y coordinate of the top of `row`, or `None` if the row is out of range.
    pub fn y_of_row(&mut self, row: usize) -> Option<f64> {
        if row >= self.row_count() {
            return None;
        }
        Some(match &mut self.heights {
            RowHeights::Uniform(h) => self.insets.y0 + *h * row as f64,
            RowHeights::Measured(heights) => self.insets.y0 + heights.start(row),
        })
    }

    /// The row containing `y`, or `None` when `y` falls outside all rows.
    pub fn row_at_y(&mut self, y: f64) -> Option<usize> {
        let rows = self.row_count();
        if rows == 0 {
            return None;
        }
        let ly = y - self.insets.y0;
        if ly < 0.0 || ly >= self.rows_extent() {
            return None;
        }
        let row = match &mut self.heights {
            RowHeights::Uniform(h) => {
                if *h <= 0.0 {
                    0
                } else {
                    clamp_index((ly / *h).floor_to_isize(), rows)
                }
            }
            RowHeights::Measured(heights) => heights.find(ly),
        };
        (row < rows).then_some(row)
    }

    /// Bounds of the item at `index`, or `None` if `index` is out of range.
    pub fn bounds_of(&mut self, index: usize) -> Option<Rect> {
        if index >= self.len {
            return None;
        }
        let (col, row) = self.cell_of(index);
        let x0 = self.insets.x0 + col as f64 * self.cell_width;
        let (y0, h) = match &mut self.heights {
            RowHeights::Uniform(h) => (self.insets.y0 + *h * row as f64, *h),
            RowHeights::Measured(heights) => {
                (self.insets.y0 + heights.start(row), heights.extent(row))
            }
        };
        let rect = Rect::new(x0, y0, x0 + self.cell_width, y0 + h);
        Some(self.oriented(rect))
    }

    /// The item exactly containing `point`, or `None`.
    pub fn index_at(&mut self, point: Point) -> Option<usize> {
        if self.len == 0 {
            return None;
        }
        let x = self.unmirrored_x(point.x);
        let lx = x - self.insets.x0;
        if lx < 0.0 || lx >= self.columns_extent() {
            return None;
        }
        let row = self.row_at_y(point.y)?;
        let col = if self.cell_width <= 0.0 {
            0
        } else {
            clamp_index((lx / self.cell_width).floor_to_isize(), self.column_count)
        };
        let index = self.index_of_cell(col, row);
        (index < self.len).then_some(index)
    }

    /// The item nearest `point`, clamping the point into the content area.
    ///
    /// Returns `None` only for an empty model.
    pub fn closest_index_at(&mut self, point: Point) -> Option<usize> {
        if self.len == 0 {
            return None;
        }
        let x = self.unmirrored_x(point.x);
        let lx = (x - self.insets.x0).clamp(0.0, (self.columns_extent() - 1.0).max(0.0));
        let ly = (point.y - self.insets.y0).clamp(0.0, (self.rows_extent() - 1.0).max(0.0));

        let rows = self.row_count();
        let row = match &mut self.heights {
            RowHeights::Uniform(h) => {
                if *h <= 0.0 {
                    0
                } else {
                    clamp_index((ly / *h).floor_to_isize(), rows)
                }
            }
            RowHeights::Measured(heights) => heights.find(ly),
        };
        let col = if self.cell_width <= 0.0 {
            0
        } else {
            clamp_index((lx / self.cell_width).floor_to_isize(), self.column_count)
        };
        Some(self.index_of_cell(col, row).min(self.len - 1))
    }

    /// Indices of all items whose bounds intersect `clip`, in index order.
    pub fn indices_in(&mut self, clip: Rect) -> Vec<usize> {
        let mut out = Vec::new();
        if self.len == 0 || clip.width() <= 0.0 || clip.height() <= 0.0 {
            return out;
        }

        let x0 = self.unmirrored_x(clip.x1).min(self.unmirrored_x(clip.x0));
        let x1 = self.unmirrored_x(clip.x1).max(self.unmirrored_x(clip.x0));
        let first_col = if self.cell_width <= 0.0 {
            0
        } else {
            clamp_index(
                ((x0 - self.insets.x0) / self.cell_width).floor_to_isize(),
                self.column_count,
            )
        };
        let last_col = if self.cell_width <= 0.0 {
            self.column_count - 1
        } else {
            clamp_index(
                ((x1 - self.insets.x0) / self.cell_width).floor_to_isize(),
                self.column_count,
            )
        };

        let rows = self.row_count();
        let (first_row, last_row) = {
            let ly0 = clip.y0 - self.insets.y0;
            let ly1 = clip.y1 - self.insets.y0;
            match &mut self.heights {
                RowHeights::Uniform(h) => {
                    if *h <= 0.0 {
                        (0, rows - 1)
                    } else {
                        (
                            clamp_index((ly0 / *h).floor_to_isize(), rows),
                            clamp_index((ly1 / *h).floor_to_isize(), rows),
                        )
                    }
                }
                RowHeights::Measured(heights) => (heights.find(ly0), heights.find(ly1)),
            }
        };

        for row in first_row..=last_row {
            for col in first_col..=last_col {
                let index = self.index_of_cell(col, row);
                if index < self.len {
                    out.push(index);
                }
            }
        }
        out.sort_unstable();
        out
    }

    /// Number of rows in the tallest column.
    const fn row_count(&self) -> usize {
        match self.wrap {
            WrapMode::None => self.len,
            _ => self.rows_per_column,
        }
    }

    fn rows_extent(&mut self) -> f64 {
        match &mut self.heights {
            RowHeights::Uniform(h) => *h * self.row_count() as f64,
            RowHeights::Measured(heights) => heights.total(),
        }
    }

    fn columns_extent(&self) -> f64 {
        self.cell_width * self.column_count as f64
    }

    /// Splits an index into (column, row) according to the wrap order.
    const fn cell_of(&self, index: usize) -> (usize, usize) {
        match self.wrap {
            WrapMode::None => (0, index),
            WrapMode::WrapByRow => (index % self.column_count, index / self.column_count),
            WrapMode::WrapByColumn => (index / self.rows_per_column, index % self.rows_per_column),
        }
    }

    /// Joins (column, row) into an index; may exceed `len` in the remainder cell.
    const fn index_of_cell(&self, col: usize, row: usize) -> usize {
        match self.wrap {
            WrapMode::None => row,
            WrapMode::WrapByRow => row * self.column_count + col,
            WrapMode::WrapByColumn => col * self.rows_per_column + row,
        }
    }

    fn oriented(&self, rect: Rect) -> Rect {
        match self.direction {
            Direction::LeftToRight => rect,
            Direction::RightToLeft => mirror_x(rect, self.mirror_width),
        }
    }

    fn unmirrored_x(&self, x: f64) -> f64 {
        match self.direction {
            Direction::LeftToRight => x,
            Direction::RightToLeft => self.mirror_width - x,
        }
    }
}

#[allow(
    clippy::cast_sign_loss,
    reason = "Index is clamped non-negative before the cast"
)]
fn clamp_index(i: isize, count: usize) -> usize {
    if count == 0 {
        return 0;
    }
    i.clamp(0, count as isize - 1) as usize
}

/// The linear/grid layout engine for list-like widgets.
///
/// Owns an [`ItemMeasure`], the layout configuration, an invalidation
/// bitmask, and the most recently computed [`ListGeometry`]. Every mutation
/// ORs invalidation bits; every query revalidates lazily before answering.
#[derive(Debug)]
pub struct ListLayout<M: ItemMeasure> {
    measure: M,
    len: usize,
    wrap: WrapMode,
    direction: Direction,
    visible_row_count: usize,
    fixed_cell_width: Option<f64>,
    fixed_cell_height: Option<f64>,
    viewport: Size,
    insets: Insets,
    invalid: Invalidation,
    geometry: ListGeometry,
}

impl<M: ItemMeasure> ListLayout<M> {
    /// Creates an engine over `measure` with an empty model.
    #[must_use]
    pub fn new(measure: M) -> Self {
        Self {
            measure,
            len: 0,
            wrap: WrapMode::None,
            direction: Direction::LeftToRight,
            visible_row_count: 0,
            fixed_cell_width: None,
            fixed_cell_height: None,
            viewport: Size::ZERO,
            insets: Insets::ZERO,
            invalid: Invalidation::all(),
            geometry: ListGeometry::empty(),
        }
    }

    /// Sets the number of items in the model.
    pub fn set_model_len(&mut self, len: usize) {
        if len != self.len {
            self.len = len;
            self.invalid |= Invalidation::MODEL;
        }
    }

    /// Marks the model contents changed (item sizes must be re-measured).
    pub fn model_changed(&mut self) {
        self.invalid |= Invalidation::MODEL;
    }

    /// Marks a size-affecting property changed (font, renderer, prototype).
    pub fn measure_changed(&mut self) {
        self.invalid |= Invalidation::MEASURE;
    }

    /// Sets or clears the fixed cell width override.
    pub fn set_fixed_cell_width(&mut self, width: Option<f64>) {
        if width != self.fixed_cell_width {
            self.fixed_cell_width = width;
            self.invalid |= Invalidation::FIXED_WIDTH;
        }
    }

    /// Sets or clears the fixed cell height override.
    pub fn set_fixed_cell_height(&mut self, height: Option<f64>) {
        if height != self.fixed_cell_height {
            self.fixed_cell_height = height;
            self.invalid |= Invalidation::FIXED_HEIGHT;
        }
    }

    /// Sets the wrap mode.
    pub fn set_wrap_mode(&mut self, wrap: WrapMode) {
        if wrap != self.wrap {
            self.wrap = wrap;
            self.invalid |= Invalidation::ORIENTATION;
        }
    }

    /// Sets the reading direction.
    pub fn set_direction(&mut self, direction: Direction) {
        if direction != self.direction {
            self.direction = direction;
            self.invalid |= Invalidation::ORIENTATION;
        }
    }

    /// Sets the preferred visible row count used to derive wrapped columns.
    ///
    /// Zero means "derive from the viewport size instead".
    pub fn set_visible_row_count(&mut self, rows: usize) {
        if rows != self.visible_row_count {
            self.visible_row_count = rows;
            self.invalid |= Invalidation::VIEWPORT;
        }
    }

    /// Sets the viewport size.
    pub fn set_viewport(&mut self, viewport: Size) {
        if viewport != self.viewport {
            self.viewport = viewport;
            self.invalid |= Invalidation::VIEWPORT;
        }
    }

    /// Sets the insets reserved around the content.
    pub fn set_insets(&mut self, insets: Insets) {
        if insets.x0 != self.insets.x0
            || insets.y0 != self.insets.y0
            || insets.x1 != self.insets.x1
            || insets.y1 != self.insets.y1
        {
            self.insets = insets;
            self.invalid |= Invalidation::VIEWPORT;
        }
    }

    /// Re-measures a contiguous span of items in place.
    ///
    /// When the current geometry is a valid non-wrapped variable-height
    /// layout this patches the height cache directly (suffix invalidation
    /// only); otherwise it falls back to marking the measure class dirty.
    pub fn items_resized(&mut self, start: usize, end: usize) {
        if self.invalid.is_empty()
            && self.wrap == WrapMode::None
            && matches!(self.geometry.heights, RowHeights::Measured(_))
        {
            let end = end.min(self.len);
            if let RowHeights::Measured(heights) = &mut self.geometry.heights {
                for i in start..end {
                    heights.set_extent(i, self.measure.measure(i).height.max(0.0));
                }
            }
            self.geometry.content.height =
                self.insets.y0 + self.geometry.rows_extent() + self.insets.y1;
        } else {
            self.invalid |= Invalidation::MEASURE;
        }
    }

    /// Pending invalidation classes; empty when the cached geometry is valid.
    #[must_use]
    pub const fn pending_invalidation(&self) -> Invalidation {
        self.invalid
    }

    /// Revalidates if needed and returns the current geometry.
    pub fn geometry(&mut self) -> &ListGeometry {
        self.ensure_valid();
        &self.geometry
    }

    /// Bounds of the item at `index`, or `None` if out of range.
    pub fn bounds_of(&mut self, index: usize) -> Option<Rect> {
        self.ensure_valid();
        self.geometry.bounds_of(index)
    }

    /// The item exactly containing `point`, or `None`.
    pub fn index_at(&mut self, point: Point) -> Option<usize> {
        self.ensure_valid();
        self.geometry.index_at(point)
    }

    /// The item nearest `point`; `None` only for an empty model.
    pub fn closest_index_at(&mut self, point: Point) -> Option<usize> {
        self.ensure_valid();
        self.geometry.closest_index_at(point)
    }

    /// Indices of items intersecting `clip`, in index order.
    pub fn indices_in(&mut self, clip: Rect) -> Vec<usize> {
        self.ensure_valid();
        self.geometry.indices_in(clip)
    }

    /// Total content size (the widget's preferred size), insets included.
    pub fn preferred_size(&mut self) -> Size {
        self.ensure_valid();
        self.geometry.content_size()
    }

    /// Number of columns in the current geometry.
    pub fn column_count(&mut self) -> usize {
        self.ensure_valid();
        self.geometry.column_count()
    }

    /// Rows per full column in the current geometry.
    pub fn rows_per_column(&mut self) -> usize {
        self.ensure_valid();
        self.geometry.rows_per_column()
    }

    /// Height of `row`, or `None` if out of range.
    pub fn row_height(&mut self, row: usize) -> Option<f64> {
        self.ensure_valid();
        self.geometry.row_height(row)
    }

    /// Y coordinate of the top of `row`, or `None` if out of range.
    pub fn y_of_row(&mut self, row: usize) -> Option<f64> {
        self.ensure_valid();
        self.geometry.y_of_row(row)
    }

    /// The row containing `y`, or `None` when `y` is outside all rows.
    pub fn row_at_y(&mut self, y: f64) -> Option<usize> {
        self.ensure_valid();
        self.geometry.row_at_y(y)
    }

    /// Recomputes the geometry if any invalidation class is pending.
    ///
    /// The bitmask is cleared only here, after a full recompute.
    fn ensure_valid(&mut self) {
        if self.invalid.is_empty() {
            return;
        }
        self.geometry = self.compute();
        self.invalid = Invalidation::empty();
    }

    fn compute(&mut self) -> ListGeometry {
        let ins_x = self.insets.x0 + self.insets.x1;
        let ins_y = self.insets.y0 + self.insets.y1;

        if self.len == 0 {
            let mut g = ListGeometry::empty();
            g.wrap = self.wrap;
            g.direction = self.direction;
            g.insets = self.insets;
            g.content = Size::new(ins_x, ins_y);
            g.mirror_width = if self.viewport.width > 0.0 {
                self.viewport.width
            } else {
                g.content.width
            };
            return g;
        }

        // Measure pass: one call per item per invalidation cycle. Fixed
        // overrides skip the measurer entirely on that axis.
        let mut max_width = self.fixed_cell_width.unwrap_or(0.0);
        let mut max_height = self.fixed_cell_height.unwrap_or(0.0);
        let mut measured_heights = MeasuredExtents::new();
        let needs_measure = self.fixed_cell_width.is_none() || self.fixed_cell_height.is_none();
        if needs_measure {
            measured_heights.set_len(self.len);
            for i in 0..self.len {
                let size = self.measure.measure(i);
                if self.fixed_cell_width.is_none() {
                    max_width = max_width.max(size.width.max(0.0));
                }
                if self.fixed_cell_height.is_none() {
                    let h = size.height.max(0.0);
                    max_height = max_height.max(h);
                    measured_heights.set_extent(i, h);
                }
            }
        }

        let cell_width = max_width;
        let cell_height = max_height;
        let heights = match (self.wrap, self.fixed_cell_height) {
            // Only the single-column mode honors per-item heights; wrapped
            // grids use the uniform maximum like the fixed override does.
            (WrapMode::None, None) => RowHeights::Measured(measured_heights),
            _ => RowHeights::Uniform(cell_height),
        };

        let (column_count, rows_per_column) = match self.wrap {
            WrapMode::None => (1, self.len),
            WrapMode::WrapByRow | WrapMode::WrapByColumn => {
                if self.visible_row_count > 0 {
                    // Balanced columns: the remainder lands in the last one.
                    let columns = self.len.div_ceil(self.visible_row_count).max(1);
                    (columns, self.len.div_ceil(columns))
                } else if self.wrap == WrapMode::WrapByRow {
                    let avail = (self.viewport.width - ins_x).max(0.0);
                    let columns = fit_count(avail, cell_width);
                    (columns, self.len.div_ceil(columns))
                } else {
                    let avail = (self.viewport.height - ins_y).max(0.0);
                    let rows = fit_count(avail, cell_height);
                    (self.len.div_ceil(rows), rows)
                }
            }
        };

        let mut geometry = ListGeometry {
            len: self.len,
            wrap: self.wrap,
            direction: self.direction,
            insets: self.insets,
            cell_width,
            cell_height,
            heights,
            column_count,
            rows_per_column,
            content: Size::ZERO,
            mirror_width: 0.0,
        };
        geometry.content = Size::new(
            ins_x + geometry.columns_extent().max(cell_width),
            ins_y + geometry.rows_extent(),
        );
        geometry.mirror_width = if self.viewport.width > 0.0 {
            self.viewport.width
        } else {
            geometry.content.width
        };
        geometry
    }
}

/// How many items of `extent` fit in `avail`, never fewer than one.
fn fit_count(avail: f64, extent: f64) -> usize {
    if extent <= 0.0 {
        return 1;
    }
    let count = (avail / extent).floor_to_isize();
    count.max(1).unsigned_abs()
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use kurbo::{Insets, Point, Rect, Size};

    use super::ListLayout;
    use crate::{Direction, WrapMode};

    fn uniform(size: Size) -> impl FnMut(usize) -> Size {
        move |_| size
    }

    #[test]
    fn empty_model_is_degenerate() {
        let mut layout = ListLayout::new(uniform(Size::new(10.0, 10.0)));
        assert_eq!(layout.column_count(), 0);
        assert_eq!(layout.bounds_of(0), None);
        assert_eq!(layout.index_at(Point::new(1.0, 1.0)), None);
        assert_eq!(layout.closest_index_at(Point::new(1.0, 1.0)), None);
        assert_eq!(layout.preferred_size(), Size::ZERO);
    }

    #[test]
    fn ten_items_over_eight_visible_rows_balance_into_two_columns() {
        let mut layout = ListLayout::new(uniform(Size::new(40.0, 20.0)));
        layout.set_model_len(10);
        layout.set_wrap_mode(WrapMode::WrapByColumn);
        layout.set_visible_row_count(8);

        assert_eq!(layout.column_count(), 2);
        assert_eq!(layout.rows_per_column(), 5);
        // Column-major: item 5 opens the second column.
        assert_eq!(
            layout.bounds_of(5),
            Some(Rect::new(40.0, 0.0, 80.0, 20.0))
        );
        assert_eq!(
            layout.bounds_of(4),
            Some(Rect::new(0.0, 80.0, 40.0, 100.0))
        );
    }

    #[test]
    fn remainder_lands_in_the_last_column() {
        // 7 items over 3 visible rows → 3 columns of 3, last column holds 1.
        let mut layout = ListLayout::new(uniform(Size::new(10.0, 10.0)));
        layout.set_model_len(7);
        layout.set_wrap_mode(WrapMode::WrapByColumn);
        layout.set_visible_row_count(3);

        assert_eq!(layout.column_count(), 3);
        assert_eq!(layout.rows_per_column(), 3);
        assert_eq!(layout.bounds_of(6).map(|r| (r.x0, r.y0)), Some((20.0, 0.0)));
        // The empty remainder cells do not hit-test to any item.
        assert_eq!(layout.index_at(Point::new(25.0, 15.0)), None);
        assert_eq!(layout.closest_index_at(Point::new(25.0, 15.0)), Some(6));
    }

    #[test]
    fn wrap_by_row_uses_row_major_order() {
        let mut layout = ListLayout::new(uniform(Size::new(10.0, 10.0)));
        layout.set_model_len(6);
        layout.set_wrap_mode(WrapMode::WrapByRow);
        layout.set_viewport(Size::new(30.0, 100.0));

        assert_eq!(layout.column_count(), 3);
        // Item 4 sits in row 1, column 1.
        assert_eq!(
            layout.bounds_of(4),
            Some(Rect::new(10.0, 10.0, 20.0, 20.0))
        );
        assert_eq!(layout.index_at(Point::new(15.0, 15.0)), Some(4));
    }

    #[test]
    fn variable_heights_accumulate_and_hit_test() {
        let heights = vec![10.0, 25.0, 15.0];
        let mut layout = ListLayout::new(move |i: usize| Size::new(50.0, heights[i]));
        layout.set_model_len(3);

        assert_eq!(layout.y_of_row(0), Some(0.0));
        assert_eq!(layout.y_of_row(1), Some(10.0));
        assert_eq!(layout.y_of_row(2), Some(35.0));
        assert_eq!(layout.row_height(1), Some(25.0));
        assert_eq!(layout.row_height(3), None);

        assert_eq!(layout.row_at_y(9.9), Some(0));
        assert_eq!(layout.row_at_y(10.0), Some(1));
        assert_eq!(layout.row_at_y(49.9), Some(2));
        assert_eq!(layout.row_at_y(50.0), None);
        assert_eq!(layout.row_at_y(-1.0), None);

        assert_eq!(layout.preferred_size(), Size::new(50.0, 50.0));
    }

    #[test]
    fn fixed_cell_height_skips_measured_heights() {
        let mut layout = ListLayout::new(uniform(Size::new(30.0, 99.0)));
        layout.set_model_len(4);
        layout.set_fixed_cell_height(Some(12.0));

        assert_eq!(layout.row_height(2), Some(12.0));
        assert_eq!(layout.y_of_row(3), Some(36.0));
        assert_eq!(layout.preferred_size(), Size::new(30.0, 48.0));
    }

    #[test]
    fn zero_measurer_degrades_to_zero_extents() {
        let mut layout = ListLayout::new(|_: usize| Size::ZERO);
        layout.set_model_len(5);
        assert_eq!(layout.preferred_size(), Size::ZERO);
        assert_eq!(layout.bounds_of(2), Some(Rect::ZERO));
        assert_eq!(layout.index_at(Point::new(0.0, 0.0)), None);
    }

    #[test]
    fn rtl_mirrors_as_a_final_transform() {
        let mut layout = ListLayout::new(uniform(Size::new(10.0, 10.0)));
        layout.set_model_len(6);
        layout.set_wrap_mode(WrapMode::WrapByRow);
        layout.set_viewport(Size::new(30.0, 100.0));

        let ltr = layout.bounds_of(0).unwrap();
        layout.set_direction(Direction::RightToLeft);
        let rtl = layout.bounds_of(0).unwrap();
        // x' = W - x - w with W = viewport width 30.
        assert_eq!(rtl, Rect::new(20.0, 0.0, 30.0, 10.0));
        assert_eq!(crate::mirror_x(rtl, 30.0), ltr);

        // Hit-testing agrees with the mirrored bounds.
        assert_eq!(layout.index_at(Point::new(25.0, 5.0)), Some(0));
        assert_eq!(layout.index_at(Point::new(5.0, 5.0)), Some(2));
    }

    #[test]
    fn insets_offset_the_content_origin() {
        let mut layout = ListLayout::new(uniform(Size::new(20.0, 10.0)));
        layout.set_model_len(2);
        layout.set_insets(Insets::new(3.0, 5.0, 3.0, 5.0));

        assert_eq!(layout.bounds_of(0), Some(Rect::new(3.0, 5.0, 23.0, 15.0)));
        assert_eq!(layout.row_at_y(4.0), None);
        assert_eq!(layout.row_at_y(5.0), Some(0));
        assert_eq!(layout.preferred_size(), Size::new(26.0, 30.0));
    }

    #[test]
    fn items_resized_patches_heights_in_place() {
        let heights = alloc::rc::Rc::new(core::cell::Cell::new(10.0));
        let h = heights.clone();
        let mut layout = ListLayout::new(move |_: usize| Size::new(20.0, h.get()));
        layout.set_model_len(3);
        assert_eq!(layout.preferred_size().height, 30.0);

        heights.set(20.0);
        layout.items_resized(1, 2);
        assert_eq!(layout.y_of_row(2), Some(30.0));
        assert_eq!(layout.preferred_size().height, 40.0);
        // Row 0 is untouched.
        assert_eq!(layout.y_of_row(1), Some(10.0));
    }

    #[test]
    fn indices_in_clip_cover_intersecting_cells() {
        let mut layout = ListLayout::new(uniform(Size::new(10.0, 10.0)));
        layout.set_model_len(9);
        layout.set_wrap_mode(WrapMode::WrapByRow);
        layout.set_viewport(Size::new(30.0, 100.0));

        // Clip covering rows 0-1, columns 1-2.
        let hit = layout.indices_in(Rect::new(12.0, 2.0, 28.0, 18.0));
        assert_eq!(hit, vec![1, 2, 4, 5]);
    }
}
