// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The tab layout engine: cached geometry, lazy revalidation, queries,
//! and whole-tab scrolling for the windowed style.

use alloc::vec;
use alloc::vec::Vec;

use kurbo::{Insets, Point, Rect, Size};

use crate::runs::{normalize_runs, pad_run, partition_into_runs, rotated_order};
use crate::{Direction, Invalidation, LayoutStyle, Placement, Run, TabMeasure};

/// The immutable result of one tab layout computation.
///
/// For the [`LayoutStyle::Wrap`] style, rectangles are final widget
/// coordinates (right-to-left mirroring already applied). For
/// [`LayoutStyle::Scroll`], rectangles are strip coordinates: a single
/// left-to-right (or top-to-bottom) run independent of the leading index,
/// so scrolling never recomputes the geometry.
#[derive(Clone, Debug)]
pub struct TabGeometry {
    placement: Placement,
    direction: Direction,
    style: LayoutStyle,
    rects: Vec<Rect>,
    runs: Vec<Run>,
    display_order: Vec<usize>,
    selected: Option<usize>,
    cross_max: f64,
    avail: f64,
    base_primary: f64,
    mirror_width: f64,
    tab_area: Rect,
}

impl TabGeometry {
    fn empty() -> Self {
        Self {
            placement: Placement::Top,
            direction: Direction::LeftToRight,
            style: LayoutStyle::Wrap,
            rects: Vec::new(),
            runs: Vec::new(),
            display_order: Vec::new(),
            selected: None,
            cross_max: 0.0,
            avail: 0.0,
            base_primary: 0.0,
            mirror_width: 0.0,
            tab_area: Rect::ZERO,
        }
    }

    /// Number of tabs covered by this geometry.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rects.len()
    }

    /// Returns `true` if the geometry covers no tabs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    /// The runs in packed (index-contiguous) order.
    #[must_use]
    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    /// Run indices in display order; the selected run comes first and is
    /// placed innermost (adjacent to the content).
    #[must_use]
    pub fn display_order(&self) -> &[usize] {
        &self.display_order
    }

    /// The packed run index containing `tab`, or `None` if out of range.
    #[must_use]
    pub fn run_for_tab(&self, tab: usize) -> Option<usize> {
        self.runs.iter().position(|r| r.contains(tab))
    }

    /// The tab area rectangle (all runs, full primary extent).
    #[must_use]
    pub const fn tab_area(&self) -> Rect {
        self.tab_area
    }

    /// Primary-axis span of a rectangle under this geometry's placement.
    fn primary_span(&self, rect: Rect) -> (f64, f64) {
        if self.placement.is_horizontal() {
            (rect.x0, rect.x1)
        } else {
            (rect.y0, rect.y1)
        }
    }
}

/// The run-packing layout engine for tab-like widgets.
///
/// Owns a [`TabMeasure`], the layout configuration, an invalidation bitmask,
/// and the most recently computed [`TabGeometry`]. Mutations OR invalidation
/// bits; queries revalidate lazily before answering and return `Option` for
/// out-of-range input.
#[derive(Debug)]
pub struct TabLayout<M: TabMeasure> {
    measure: M,
    count: usize,
    placement: Placement,
    direction: Direction,
    style: LayoutStyle,
    selected: Option<usize>,
    viewport: Size,
    insets: Insets,
    tab_area_insets: Insets,
    selected_pad: Insets,
    run_overlay: f64,
    run_indent: f64,
    pad_runs: bool,
    rotate_runs: bool,
    leading: usize,
    invalid: Invalidation,
    geometry: TabGeometry,
}

impl<M: TabMeasure> TabLayout<M> {
    /// Creates an engine over `measure` with no tabs and the wrap style.
    #[must_use]
    pub fn new(measure: M) -> Self {
        Self {
            measure,
            count: 0,
            placement: Placement::Top,
            direction: Direction::LeftToRight,
            style: LayoutStyle::Wrap,
            selected: None,
            viewport: Size::ZERO,
            insets: Insets::ZERO,
            tab_area_insets: Insets::ZERO,
            selected_pad: Insets::ZERO,
            run_overlay: 0.0,
            run_indent: 0.0,
            pad_runs: true,
            rotate_runs: true,
            leading: 0,
            invalid: Invalidation::all(),
            geometry: TabGeometry::empty(),
        }
    }

    /// Sets the number of tabs.
    pub fn set_tab_count(&mut self, count: usize) {
        if count != self.count {
            self.count = count;
            self.invalid |= Invalidation::MODEL;
        }
    }

    /// Marks tab sizes stale (titles, font, or renderer changed).
    pub fn measure_changed(&mut self) {
        self.invalid |= Invalidation::MEASURE;
    }

    /// Sets the selected tab; drives run rotation and selected-tab padding.
    pub fn set_selected(&mut self, selected: Option<usize>) {
        if selected != self.selected {
            self.selected = selected;
            self.invalid |= Invalidation::SELECTION;
        }
    }

    /// Sets which edge the tab area occupies.
    pub fn set_placement(&mut self, placement: Placement) {
        if placement != self.placement {
            self.placement = placement;
            self.invalid |= Invalidation::ORIENTATION;
        }
    }

    /// Sets the wrap-vs-scroll layout style.
    pub fn set_style(&mut self, style: LayoutStyle) {
        if style != self.style {
            self.style = style;
            self.invalid |= Invalidation::ORIENTATION;
        }
    }

    /// Sets the reading direction (horizontal placements only).
    pub fn set_direction(&mut self, direction: Direction) {
        if direction != self.direction {
            self.direction = direction;
            self.invalid |= Invalidation::ORIENTATION;
        }
    }

    /// Sets the viewport size.
    pub fn set_viewport(&mut self, viewport: Size) {
        if viewport != self.viewport {
            self.viewport = viewport;
            self.invalid |= Invalidation::VIEWPORT;
        }
    }

    /// Sets the widget insets.
    pub fn set_insets(&mut self, insets: Insets) {
        self.insets = insets;
        self.invalid |= Invalidation::VIEWPORT;
    }

    /// Sets the extra insets reserved around the tab area.
    pub fn set_tab_area_insets(&mut self, insets: Insets) {
        self.tab_area_insets = insets;
        self.invalid |= Invalidation::VIEWPORT;
    }

    /// Sets the insets by which the selected tab grows to draw in front.
    pub fn set_selected_pad(&mut self, pad: Insets) {
        self.selected_pad = pad;
        self.invalid |= Invalidation::SELECTION;
    }

    /// Sets the cross-axis overlap between adjacent runs.
    pub fn set_run_overlay(&mut self, overlay: f64) {
        if overlay != self.run_overlay {
            self.run_overlay = overlay;
            self.invalid |= Invalidation::ORIENTATION;
        }
    }

    /// Sets the stair-step primary indent applied per display run.
    pub fn set_run_indent(&mut self, indent: f64) {
        if indent != self.run_indent {
            self.run_indent = indent;
            self.invalid |= Invalidation::ORIENTATION;
        }
    }

    /// Enables or disables padding runs out to the full primary extent.
    pub fn set_pad_runs(&mut self, pad: bool) {
        if pad != self.pad_runs {
            self.pad_runs = pad;
            self.invalid |= Invalidation::ORIENTATION;
        }
    }

    /// Enables or disables rotating the selected run to the front.
    pub fn set_rotate_runs(&mut self, rotate: bool) {
        if rotate != self.rotate_runs {
            self.rotate_runs = rotate;
            self.invalid |= Invalidation::ORIENTATION;
        }
    }

    /// Pending invalidation classes; empty when the cached geometry is valid.
    #[must_use]
    pub const fn pending_invalidation(&self) -> Invalidation {
        self.invalid
    }

    /// Revalidates if needed and returns the current geometry.
    pub fn geometry(&mut self) -> &TabGeometry {
        self.ensure_valid();
        &self.geometry
    }

    /// Number of runs in the current layout.
    pub fn run_count(&mut self) -> usize {
        self.ensure_valid();
        self.geometry.runs.len()
    }

    /// The packed run index containing `tab`, or `None` if out of range.
    pub fn run_for_tab(&mut self, tab: usize) -> Option<usize> {
        self.ensure_valid();
        self.geometry.run_for_tab(tab)
    }

    /// Bounds of `tab` in widget coordinates, or `None` if out of range.
    ///
    /// In the scroll style the strip rectangle is translated by the current
    /// viewport offset; tabs scrolled out of view still report bounds, which
    /// callers clip against [`TabLayout::tab_area`].
    pub fn bounds_of(&mut self, tab: usize) -> Option<Rect> {
        self.ensure_valid();
        if tab >= self.geometry.rects.len() {
            return None;
        }
        Some(match self.style {
            LayoutStyle::Wrap => self.geometry.rects[tab],
            LayoutStyle::Scroll => self.viewport_rect(tab),
        })
    }

    /// The tab area rectangle.
    pub fn tab_area(&mut self) -> Rect {
        self.ensure_valid();
        self.geometry.tab_area
    }

    /// The tab containing `point`, or `None`.
    ///
    /// The selected tab is tested first: its padding can overlap neighbors,
    /// and it is drawn on top of them.
    pub fn tab_at(&mut self, point: Point) -> Option<usize> {
        self.ensure_valid();
        let count = self.geometry.rects.len();
        if count == 0 {
            return None;
        }
        match self.style {
            LayoutStyle::Wrap => {
                if let Some(s) = self.geometry.selected
                    && s < count
                    && self.geometry.rects[s].contains(point)
                {
                    return Some(s);
                }
                (0..count).find(|&i| self.geometry.rects[i].contains(point))
            }
            LayoutStyle::Scroll => {
                if !self.geometry.tab_area.contains(point) {
                    return None;
                }
                (0..count).find(|&i| self.viewport_rect(i).contains(point))
            }
        }
    }

    /// The current leading (first shown) tab index in the scroll style.
    #[must_use]
    pub fn leading_index(&self) -> usize {
        self.leading.min(self.count.saturating_sub(1))
    }

    /// Strip offset of the viewport: always aligned on a tab boundary.
    pub fn viewport_offset(&mut self) -> f64 {
        self.ensure_valid();
        let leading = self.leading_index();
        match self.geometry.rects.get(leading) {
            Some(&rect) => {
                let (start, _) = self.geometry.primary_span(rect);
                start - self.geometry.base_primary
            }
            None => 0.0,
        }
    }

    /// Returns `true` if `tab` is fully inside the scroll viewport.
    pub fn is_tab_visible(&mut self, tab: usize) -> bool {
        self.ensure_valid();
        if tab >= self.geometry.rects.len() {
            return false;
        }
        if self.style == LayoutStyle::Wrap {
            return true;
        }
        let offset = self.viewport_offset();
        let (start, end) = self.geometry.primary_span(self.geometry.rects[tab]);
        let base = self.geometry.base_primary;
        start - offset >= base && end - offset <= base + self.geometry.avail
    }

    /// Scrolls forward by one whole tab.
    ///
    /// A no-op returning `false` when the last tab is already fully visible
    /// (or the style is not [`LayoutStyle::Scroll`]).
    pub fn scroll_forward(&mut self) -> bool {
        self.ensure_valid();
        let count = self.geometry.rects.len();
        if self.style != LayoutStyle::Scroll || count == 0 {
            return false;
        }
        if self.is_tab_visible(count - 1) {
            return false;
        }
        let leading = self.leading_index();
        if leading + 1 >= count {
            return false;
        }
        self.leading = leading + 1;
        true
    }

    /// Scrolls backward by one whole tab; a no-op at leading index zero.
    pub fn scroll_backward(&mut self) -> bool {
        self.ensure_valid();
        if self.style != LayoutStyle::Scroll {
            return false;
        }
        let leading = self.leading_index();
        if leading == 0 {
            return false;
        }
        self.leading = leading - 1;
        true
    }

    /// Scrolls the minimum number of whole tabs to make `tab` fully visible.
    pub fn ensure_visible(&mut self, tab: usize) {
        self.ensure_valid();
        let count = self.geometry.rects.len();
        if self.style != LayoutStyle::Scroll || tab >= count {
            return;
        }
        if tab <= self.leading_index() {
            self.leading = tab;
            return;
        }
        while !self.is_tab_visible(tab) && self.leading_index() < tab {
            self.leading = self.leading_index() + 1;
        }
    }

    fn ensure_valid(&mut self) {
        if self.invalid.is_empty() {
            return;
        }
        self.geometry = self.compute();
        self.invalid = Invalidation::empty();
    }

    /// Translates a strip rectangle into viewport coordinates (scroll style).
    fn viewport_rect(&self, tab: usize) -> Rect {
        let offset = {
            let leading = self.leading_index();
            match self.geometry.rects.get(leading) {
                Some(&rect) => self.geometry.primary_span(rect).0 - self.geometry.base_primary,
                None => 0.0,
            }
        };
        let rect = self.geometry.rects[tab];
        let translated = if self.geometry.placement.is_horizontal() {
            Rect::new(rect.x0 - offset, rect.y0, rect.x1 - offset, rect.y1)
        } else {
            Rect::new(rect.x0, rect.y0 - offset, rect.x1, rect.y1 - offset)
        };
        if self.geometry.placement.is_horizontal()
            && self.geometry.direction == Direction::RightToLeft
        {
            mirror_x(translated, self.geometry.mirror_width)
        } else {
            translated
        }
    }

    fn compute(&mut self) -> TabGeometry {
        let horizontal = self.placement.is_horizontal();

        // The frame the runs must fit in: a base and an end along the primary
        // axis, plus the cross-axis origin (distance grows inward from the
        // outer edge of the tab area).
        let (base_primary, end_primary) = if horizontal {
            (
                self.insets.x0 + self.tab_area_insets.x0,
                self.viewport.width - self.insets.x1 - self.tab_area_insets.x1,
            )
        } else {
            (
                self.insets.y0 + self.tab_area_insets.y0,
                self.viewport.height - self.insets.y1 - self.tab_area_insets.y1,
            )
        };
        let avail = (end_primary - base_primary).max(0.0);
        let (cross_origin, outer_edge) = match self.placement {
            Placement::Top => (self.insets.y0 + self.tab_area_insets.y0, 0.0),
            Placement::Bottom => (
                0.0,
                self.viewport.height - self.insets.y1 - self.tab_area_insets.y1,
            ),
            Placement::Left => (self.insets.x0 + self.tab_area_insets.x0, 0.0),
            Placement::Right => (
                0.0,
                self.viewport.width - self.insets.x1 - self.tab_area_insets.x1,
            ),
        };

        let mut geometry = TabGeometry {
            placement: self.placement,
            direction: self.direction,
            style: self.style,
            selected: self.selected,
            avail,
            base_primary,
            mirror_width: self.viewport.width,
            ..TabGeometry::empty()
        };
        if self.count == 0 {
            return geometry;
        }

        // Measure pass: primary extent per tab, maximum cross extent overall.
        let mut primary = Vec::with_capacity(self.count);
        let mut cross_max = 0.0_f64;
        let mut max_item = 0.0_f64;
        for i in 0..self.count {
            let size = self.measure.measure(i);
            let (p, c) = if horizontal {
                (size.width, size.height)
            } else {
                (size.height, size.width)
            };
            let p = p.max(0.0);
            primary.push(p);
            max_item = max_item.max(p);
            cross_max = cross_max.max(c.max(0.0));
        }
        geometry.cross_max = cross_max;

        let (runs, display_order) = match self.style {
            LayoutStyle::Wrap => {
                let mut runs = partition_into_runs(&primary, avail);
                if runs.len() > 1 {
                    normalize_runs(&mut runs, &primary, avail, max_item);
                }
                let selected_run = self
                    .selected
                    .and_then(|s| runs.iter().position(|r| r.contains(s)))
                    .unwrap_or(0);
                let order = if self.rotate_runs && runs.len() > 1 {
                    rotated_order(runs.len(), selected_run)
                } else {
                    (0..runs.len()).collect()
                };
                (runs, order)
            }
            LayoutStyle::Scroll => (
                vec![Run {
                    start: 0,
                    end: self.count,
                }],
                vec![0],
            ),
        };

        let step = (cross_max - self.run_overlay).max(0.0);
        let run_count = runs.len();
        let mut widths = primary;
        let mut rects = vec![Rect::ZERO; self.count];

        for (d, &r) in display_order.iter().enumerate() {
            let run = runs[r];
            let dist = (run_count - 1 - d) as f64 * step;
            let indent = self.run_indent * d as f64;
            if self.style == LayoutStyle::Wrap && self.pad_runs && run_count > 1 {
                pad_run(&mut widths[run.start..run.end], (avail - indent).max(0.0));
            }

            let mut p = base_primary + indent;
            for i in run.start..run.end {
                let w = widths[i];
                rects[i] = match self.placement {
                    Placement::Top => {
                        let y = cross_origin + dist;
                        Rect::new(p, y, p + w, y + cross_max)
                    }
                    Placement::Bottom => {
                        let y = outer_edge - dist - cross_max;
                        Rect::new(p, y, p + w, y + cross_max)
                    }
                    Placement::Left => {
                        let x = cross_origin + dist;
                        Rect::new(x, p, x + cross_max, p + w)
                    }
                    Placement::Right => {
                        let x = outer_edge - dist - cross_max;
                        Rect::new(x, p, x + cross_max, p + w)
                    }
                };
                p += w;
            }
        }

        // The selected tab grows by the configured insets so it renders in
        // front of its neighbors; other tabs keep their positions.
        if self.style == LayoutStyle::Wrap
            && let Some(s) = self.selected
            && s < rects.len()
        {
            let r = rects[s];
            let pad = self.selected_pad;
            rects[s] = Rect::new(r.x0 - pad.x0, r.y0 - pad.y0, r.x1 + pad.x1, r.y1 + pad.y1);
        }

        // Right-to-left: mirror the finished horizontal layout.
        if self.style == LayoutStyle::Wrap
            && horizontal
            && self.direction == Direction::RightToLeft
        {
            for rect in &mut rects {
                *rect = mirror_x(*rect, geometry.mirror_width);
            }
        }

        let area_cross = (run_count as f64 * cross_max - (run_count - 1) as f64 * self.run_overlay)
            .max(cross_max);
        let mut tab_area = match self.placement {
            Placement::Top => Rect::new(
                base_primary,
                cross_origin,
                base_primary + avail,
                cross_origin + area_cross,
            ),
            Placement::Bottom => Rect::new(
                base_primary,
                outer_edge - area_cross,
                base_primary + avail,
                outer_edge,
            ),
            Placement::Left => Rect::new(
                cross_origin,
                base_primary,
                cross_origin + area_cross,
                base_primary + avail,
            ),
            Placement::Right => Rect::new(
                outer_edge - area_cross,
                base_primary,
                outer_edge,
                base_primary + avail,
            ),
        };
        if horizontal && self.direction == Direction::RightToLeft {
            tab_area = mirror_x(tab_area, geometry.mirror_width);
        }

        geometry.rects = rects;
        geometry.runs = runs;
        geometry.display_order = display_order;
        geometry.tab_area = tab_area;
        geometry
    }
}

/// The final right-to-left transform: `x' = width - x - w`.
fn mirror_x(rect: Rect, width: f64) -> Rect {
    Rect::new(width - rect.x1, rect.y0, width - rect.x0, rect.y1)
}
