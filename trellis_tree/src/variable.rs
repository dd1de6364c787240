// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The eager row cache: every visible row materialized in depth-first order,
//! per-row measured sizes, and prefix sums of row heights.

use alloc::vec::Vec;
use core::ops::Range;

use kurbo::Rect;
use trellis_extent::{Extents, MeasuredExtents};

use crate::shared::{Config, Shared, drop_set_keys_at_and_under, drop_set_keys_under, shift_set_keys};
use crate::{Damage, RowMeasure, TreeModel, TreePath};

/// Materialized visible rows with measured sizes.
///
/// `rows` is sorted (depth-first pre-order is path order), so path-to-row
/// lookups are binary searches and a node's visible subtree is a contiguous
/// span. `heights` keeps lazily-summed row offsets with suffix invalidation:
/// editing row `i` never recomputes offsets before `i`.
#[derive(Debug, Default)]
pub(crate) struct VariableCache {
    rows: Vec<TreePath>,
    widths: Vec<f64>,
    heights: MeasuredExtents<f64>,
}

impl VariableCache {
    pub(crate) fn rebuild<T: TreeModel, M: RowMeasure>(&mut self, shared: &mut Shared<T, M>) {
        self.rows.clear();
        let root = TreePath::root();
        if shared.config.root_visible {
            self.rows.push(root.clone());
        }
        if shared.expanded.contains(&root) {
            let mut block = Vec::new();
            collect_children(shared, &root, &mut block);
            self.rows.append(&mut block);
        }
        self.remeasure(shared);
    }

    /// Re-measures every materialized row without touching the structure.
    pub(crate) fn remeasure<T: TreeModel, M: RowMeasure>(&mut self, shared: &mut Shared<T, M>) {
        let mut hs = Vec::with_capacity(self.rows.len());
        self.widths.clear();
        self.widths.reserve(self.rows.len());
        for path in &self.rows {
            let (w, h) = shared.measure_row(path);
            self.widths.push(w);
            hs.push(h);
        }
        self.heights.refill(hs.len(), |i| hs[i]);
    }

    pub(crate) fn len(&self) -> usize {
        self.rows.len()
    }

    pub(crate) fn row_for_path(&self, path: &TreePath) -> Option<usize> {
        self.rows.binary_search(path).ok()
    }

    pub(crate) fn path_for_row(&self, row: usize) -> Option<&TreePath> {
        self.rows.get(row)
    }

    pub(crate) fn y_of_row(&mut self, row: usize) -> f64 {
        self.heights.start(row)
    }

    pub(crate) fn height_of_row(&mut self, row: usize) -> f64 {
        self.heights.extent(row)
    }

    pub(crate) fn width_of_row(&self, row: usize) -> f64 {
        self.widths.get(row).copied().unwrap_or(0.0)
    }

    pub(crate) fn total_height(&mut self) -> f64 {
        self.heights.total()
    }

    /// Widest row extent including its indent; scans cached widths only.
    pub(crate) fn content_width(&self, config: &Config) -> f64 {
        self.rows
            .iter()
            .zip(&self.widths)
            .map(|(path, w)| config.row_x(path.depth()) + w)
            .fold(0.0, f64::max)
    }

    pub(crate) fn row_at_y(&mut self, y: f64) -> Option<usize> {
        if self.rows.is_empty() || y < 0.0 || y >= self.total_height() {
            return None;
        }
        Some(self.heights.find(y))
    }

    pub(crate) fn closest_row(&mut self, y: f64) -> Option<usize> {
        if self.rows.is_empty() {
            return None;
        }
        Some(self.heights.find(y))
    }

    pub(crate) fn set_expanded<T: TreeModel, M: RowMeasure>(
        &mut self,
        shared: &mut Shared<T, M>,
        path: &TreePath,
        expand: bool,
    ) -> Damage {
        if expand {
            shared.expanded.insert(path.clone());
            if !shared.ancestors_expanded(path) {
                // Hidden behind a collapsed ancestor: remember the flag only.
                return Damage::none();
            }
            let at = match self.anchor(shared, path) {
                Some(at) => at,
                None => return Damage::none(),
            };
            let y = self.anchor_y(at);
            let old_bottom = self.total_height();
            let mut block = Vec::new();
            collect_children(shared, path, &mut block);
            let (ws, hs) = self.measure_block(shared, &block);
            self.splice(at, 0, block, ws, hs);
            self.damage_below(&shared.config, y, old_bottom)
        } else {
            shared.expanded.remove(path);
            if !shared.ancestors_expanded(path) {
                return Damage::none();
            }
            let range = self.subtree_range(path);
            if range.is_empty() {
                return Damage::none();
            }
            let y = self.anchor_y(range.start);
            let old_bottom = self.total_height();
            self.splice(range.start, range.len(), Vec::new(), Vec::new(), Vec::new());
            self.damage_below(&shared.config, y, old_bottom)
        }
    }

    pub(crate) fn nodes_inserted<T: TreeModel, M: RowMeasure>(
        &mut self,
        shared: &mut Shared<T, M>,
        parent: &TreePath,
        indices: &[usize],
    ) -> Damage {
        let mut idxs = indices.to_vec();
        idxs.sort_unstable();
        idxs.dedup();

        let patch_rows = shared.ancestors_expanded(parent) && shared.expanded.contains(parent);
        let old_bottom = self.total_height();
        let mut min_y = f64::INFINITY;
        let level = parent.depth();

        for &i in &idxs {
            shift_set_keys(&mut shared.expanded, parent, i, 1);
            if !patch_rows {
                continue;
            }
            let range = self.subtree_range(parent);
            for p in &mut self.rows[range.start..range.end] {
                if let Some(x) = p.index_at(level)
                    && x >= i
                {
                    p.set_index(level, x + 1);
                }
            }
            let child = parent.child(i);
            let mut block = Vec::new();
            collect_node(shared, &child, &mut block);
            let (ws, hs) = self.measure_block(shared, &block);
            let at = self.rows.partition_point(|p| p < &child);
            self.splice(at, 0, block, ws, hs);
            min_y = min_y.min(self.y_of_row(at));
        }

        if !patch_rows || !min_y.is_finite() {
            return Damage::none();
        }
        self.damage_below(&shared.config, min_y, old_bottom)
    }

    pub(crate) fn nodes_removed<T: TreeModel, M: RowMeasure>(
        &mut self,
        shared: &mut Shared<T, M>,
        parent: &TreePath,
        indices: &[usize],
    ) -> Damage {
        let mut idxs = indices.to_vec();
        idxs.sort_unstable();
        idxs.dedup();

        let patch_rows = shared.ancestors_expanded(parent) && shared.expanded.contains(parent);
        let old_bottom = self.total_height();
        let mut min_y = f64::INFINITY;
        let level = parent.depth();

        for &i in idxs.iter().rev() {
            let child = parent.child(i);
            if patch_rows {
                let at = self.rows.partition_point(|p| p < &child);
                if self.rows.get(at) == Some(&child) {
                    let end =
                        at + 1 + self.rows[at + 1..].partition_point(|p| p.starts_with(&child));
                    min_y = min_y.min(self.y_of_row(at));
                    self.splice(at, end - at, Vec::new(), Vec::new(), Vec::new());
                } else {
                    debug_assert!(false, "removed child was not in the row cache");
                }
                let range = self.subtree_range(parent);
                for p in &mut self.rows[range.start..range.end] {
                    if let Some(x) = p.index_at(level)
                        && x > i
                    {
                        p.set_index(level, x - 1);
                    }
                }
            }
            drop_set_keys_at_and_under(&mut shared.expanded, &child);
            shift_set_keys(&mut shared.expanded, parent, i + 1, -1);
        }

        if !patch_rows || !min_y.is_finite() {
            return Damage::none();
        }
        self.damage_below(&shared.config, min_y, old_bottom)
    }

    pub(crate) fn nodes_changed<T: TreeModel, M: RowMeasure>(
        &mut self,
        shared: &mut Shared<T, M>,
        parent: &TreePath,
        indices: &[usize],
    ) -> Damage {
        if !(shared.ancestors_expanded(parent) && shared.expanded.contains(parent)) {
            return Damage::none();
        }
        let old_bottom = self.total_height();
        let mut damage = Damage::none();
        let mut suffix_y = f64::INFINITY;

        for &i in indices {
            let child = parent.child(i);
            let Some(row) = self.row_for_path(&child) else {
                debug_assert!(false, "changed child was not in the row cache");
                continue;
            };
            let (w, h) = shared.measure_row(&child);
            let old_h = self.height_of_row(row);
            let y = self.y_of_row(row);
            self.widths[row] = w;
            if h == old_h {
                let width = self.damage_width(&shared.config);
                damage.dirty_rects.push(Rect::new(0.0, y, width, y + h));
            } else {
                self.heights.set_extent(row, h);
                suffix_y = suffix_y.min(y);
            }
        }

        if suffix_y.is_finite() {
            let below = self.damage_below(&shared.config, suffix_y, old_bottom);
            damage.dirty_rects.extend(below.dirty_rects);
        }
        damage
    }

    pub(crate) fn structure_changed<T: TreeModel, M: RowMeasure>(
        &mut self,
        shared: &mut Shared<T, M>,
        path: &TreePath,
    ) -> Damage {
        // The node keeps its own expansion flag; descendants reset.
        drop_set_keys_under(&mut shared.expanded, path);
        if !shared.ancestors_expanded(path) {
            return Damage::none();
        }
        let own_row = self.row_for_path(path);
        if !path.is_root() && own_row.is_none() {
            debug_assert!(false, "changed structure below a path with no row");
            return Damage::none();
        }

        let y = own_row.map_or(0.0, |_| self.anchor_y(self.subtree_range(path).start));
        let old_bottom = self.total_height();
        let range = self.subtree_range(path);
        let mut block = Vec::new();
        if shared.expanded.contains(path) {
            collect_children(shared, path, &mut block);
        }
        let (ws, hs) = self.measure_block(shared, &block);
        self.splice(range.start, range.len(), block, ws, hs);
        if let Some(row) = self.row_for_path(path) {
            let (w, h) = shared.measure_row(path);
            self.widths[row] = w;
            self.heights.set_extent(row, h);
        }
        self.damage_below(&shared.config, y, old_bottom)
    }

    /// Row index right after `path`'s own row, where its children begin.
    fn anchor<T: TreeModel, M: RowMeasure>(
        &self,
        shared: &Shared<T, M>,
        path: &TreePath,
    ) -> Option<usize> {
        if path.is_root() && !shared.config.root_visible {
            return Some(0);
        }
        let row = self.row_for_path(path);
        debug_assert!(row.is_some(), "expanded a displayed path with no row");
        row.map(|r| r + 1)
    }

    /// Repaint anchor: the toggled node's own row, so its control repaints.
    fn anchor_y(&mut self, children_start: usize) -> f64 {
        if children_start == 0 {
            0.0
        } else {
            self.y_of_row(children_start - 1)
        }
    }

    /// The contiguous span of rows strictly below `path`.
    fn subtree_range(&self, path: &TreePath) -> Range<usize> {
        let start = self.rows.partition_point(|p| p <= path);
        let end = start + self.rows[start..].partition_point(|p| p.starts_with(path));
        start..end
    }

    fn measure_block<T: TreeModel, M: RowMeasure>(
        &self,
        shared: &mut Shared<T, M>,
        block: &[TreePath],
    ) -> (Vec<f64>, Vec<f64>) {
        let mut ws = Vec::with_capacity(block.len());
        let mut hs = Vec::with_capacity(block.len());
        for path in block {
            let (w, h) = shared.measure_row(path);
            ws.push(w);
            hs.push(h);
        }
        (ws, hs)
    }

    fn splice(
        &mut self,
        at: usize,
        remove: usize,
        block: Vec<TreePath>,
        ws: Vec<f64>,
        hs: Vec<f64>,
    ) {
        let end = (at + remove).min(self.rows.len());
        self.rows.splice(at..end, block);
        self.widths.splice(at..end, ws);
        self.heights.splice(at, remove, hs);
    }

    fn damage_width(&self, config: &Config) -> f64 {
        config.viewport.width.max(self.content_width(config))
    }

    fn damage_below(&mut self, config: &Config, y: f64, old_bottom: f64) -> Damage {
        let bottom = self.total_height().max(old_bottom).max(y);
        let width = self.damage_width(config);
        Damage {
            dirty_rects: alloc::vec![Rect::new(0.0, y, width, bottom)],
        }
    }
}

fn collect_node<T: TreeModel, M: RowMeasure>(
    shared: &Shared<T, M>,
    path: &TreePath,
    out: &mut Vec<TreePath>,
) {
    out.push(path.clone());
    if shared.expanded.contains(path) {
        collect_children(shared, path, out);
    }
}

fn collect_children<T: TreeModel, M: RowMeasure>(
    shared: &Shared<T, M>,
    parent: &TreePath,
    out: &mut Vec<TreePath>,
) {
    let count = shared.model.child_count(parent);
    for i in 0..count {
        collect_node(shared, &parent.child(i), out);
    }
}
