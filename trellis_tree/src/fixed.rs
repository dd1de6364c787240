// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The large-model row cache: a uniform row height, counts cached per
//! expanded node only, and row widths measured lazily for queried rows.

use alloc::vec::Vec;

use hashbrown::HashMap;
use kurbo::Rect;

use crate::shared::{
    Config, Shared, drop_map_keys_at_and_under, drop_set_keys_at_and_under, drop_set_keys_under,
    shift_map_keys, shift_set_keys,
};
use crate::{Damage, RowMeasure, TreeModel, TreePath};

/// Count-based cache: no rows are materialized.
///
/// For every expanded node on a fully-expanded ancestor chain the cache
/// stores its child count and the number of visible rows its subtree
/// contributes (excluding the node itself). Row lookups walk the path,
/// summing sibling subtrees; y-coordinates are `row × row_height`. Memory and
/// rebuild cost scale with the number of expanded nodes, not the model size.
#[derive(Debug, Default)]
pub(crate) struct FixedCache {
    children: HashMap<TreePath, usize>,
    visible: HashMap<TreePath, usize>,
    width_memo: HashMap<TreePath, f64>,
    total: usize,
}

impl FixedCache {
    pub(crate) fn rebuild<T: TreeModel, M: RowMeasure>(&mut self, shared: &mut Shared<T, M>) {
        self.children.clear();
        self.visible.clear();
        self.width_memo.clear();
        let root = TreePath::root();
        let below = if shared.expanded.contains(&root) {
            self.walk(shared, &root)
        } else {
            0
        };
        self.total = usize::from(shared.config.root_visible) + below;
    }

    pub(crate) fn clear_width_memo(&mut self) {
        self.width_memo.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.total
    }

    fn row_height(config: &Config) -> f64 {
        config.row_height.max(0.0)
    }

    fn visible_under(&self, path: &TreePath) -> usize {
        self.visible.get(path).copied().unwrap_or(0)
    }

    /// Caches counts for the expanded subtree at `path` and returns the
    /// number of visible rows it contributes.
    fn walk<T: TreeModel, M: RowMeasure>(
        &mut self,
        shared: &mut Shared<T, M>,
        path: &TreePath,
    ) -> usize {
        let count = shared.model.child_count(path);
        self.children.insert(path.clone(), count);
        let mut below = 0;
        for i in 0..count {
            let child = path.child(i);
            below += 1;
            if shared.expanded.contains(&child) {
                below += self.walk(shared, &child);
            }
        }
        self.visible.insert(path.clone(), below);
        below
    }

    pub(crate) fn row_for_path<T: TreeModel, M: RowMeasure>(
        &self,
        shared: &Shared<T, M>,
        path: &TreePath,
    ) -> Option<usize> {
        let mut row = 0;
        if shared.config.root_visible {
            if path.is_root() {
                return Some(0);
            }
            row += 1;
        } else if path.is_root() {
            return None;
        }

        let mut prefix = TreePath::root();
        let last = path.depth() - 1;
        for (level, &index) in path.as_slice().iter().enumerate() {
            if !shared.expanded.contains(&prefix) {
                return None;
            }
            let count = self.children.get(&prefix).copied()?;
            if index >= count {
                return None;
            }
            for sibling in 0..index {
                row += 1 + self.visible_under(&prefix.child(sibling));
            }
            if level == last {
                return Some(row);
            }
            row += 1;
            prefix = prefix.child(index);
        }
        None
    }

    pub(crate) fn path_for_row<T: TreeModel, M: RowMeasure>(
        &self,
        shared: &Shared<T, M>,
        row: usize,
    ) -> Option<TreePath> {
        if row >= self.total {
            return None;
        }
        let mut remaining = row;
        if shared.config.root_visible {
            if remaining == 0 {
                return Some(TreePath::root());
            }
            remaining -= 1;
        }

        let mut prefix = TreePath::root();
        'descend: loop {
            let count = self.children.get(&prefix).copied()?;
            for i in 0..count {
                let child = prefix.child(i);
                if remaining == 0 {
                    return Some(child);
                }
                remaining -= 1;
                let below = self.visible_under(&child);
                if remaining < below {
                    prefix = child;
                    continue 'descend;
                }
                remaining -= below;
            }
            debug_assert!(false, "row count disagrees with cached subtree counts");
            return None;
        }
    }

    pub(crate) fn y_of_row(config: &Config, row: usize) -> f64 {
        #[allow(
            clippy::cast_precision_loss,
            reason = "Row indices are far below the mantissa limit"
        )]
        {
            row as f64 * Self::row_height(config)
        }
    }

    pub(crate) fn row_at_y(&self, config: &Config, y: f64) -> Option<usize> {
        let rh = Self::row_height(config);
        if self.total == 0 || rh <= 0.0 || y < 0.0 {
            return None;
        }
        #[allow(
            clippy::cast_possible_truncation,
            reason = "non-negative and bounded by the row count check below"
        )]
        let row = (y / rh) as usize;
        (row < self.total).then_some(row)
    }

    pub(crate) fn closest_row(&self, config: &Config, y: f64) -> Option<usize> {
        if self.total == 0 {
            return None;
        }
        let rh = Self::row_height(config);
        if rh <= 0.0 || y <= 0.0 {
            return Some(0);
        }
        #[allow(
            clippy::cast_possible_truncation,
            reason = "non-negative and clamped to the last row"
        )]
        let row = (y / rh) as usize;
        Some(row.min(self.total - 1))
    }

    pub(crate) fn total_height(&self, config: &Config) -> f64 {
        Self::y_of_row(config, self.total)
    }

    /// Measures (memoized) the width of the row at `path`.
    pub(crate) fn width_of<T: TreeModel, M: RowMeasure>(
        &mut self,
        shared: &mut Shared<T, M>,
        path: &TreePath,
    ) -> f64 {
        if let Some(&w) = self.width_memo.get(path) {
            return w;
        }
        let (w, _) = shared.measure_row(path);
        self.width_memo.insert(path.clone(), w);
        w
    }

    pub(crate) fn set_expanded<T: TreeModel, M: RowMeasure>(
        &mut self,
        shared: &mut Shared<T, M>,
        path: &TreePath,
        expand: bool,
    ) -> Damage {
        let old_total = self.total;
        if expand {
            shared.expanded.insert(path.clone());
            if !shared.ancestors_expanded(path) {
                return Damage::none();
            }
            let added = self.walk(shared, path);
            self.bubble(path, added as isize);
            self.damage_from_path(shared, path, old_total)
        } else {
            shared.expanded.remove(path);
            if !shared.ancestors_expanded(path) {
                return Damage::none();
            }
            let removed = self.visible_under(path);
            drop_map_keys_at_and_under(&mut self.children, path);
            drop_map_keys_at_and_under(&mut self.visible, path);
            self.bubble(path, -(removed as isize));
            self.damage_from_path(shared, path, old_total)
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

        self.width_memo.clear();
        let old_total = self.total;
        let mut any = false;

        for &i in &idxs {
            shift_set_keys(&mut shared.expanded, parent, i, 1);
            shift_map_keys(&mut self.children, parent, i, 1);
            shift_map_keys(&mut self.visible, parent, i, 1);
            if let Some(count) = self.children.get(parent).copied() {
                debug_assert!(i <= count, "insert index beyond cached child count");
                self.children.insert(parent.clone(), count + 1);
                let child = parent.child(i);
                let added = 1 + if shared.expanded.contains(&child) {
                    self.walk(shared, &child)
                } else {
                    0
                };
                self.bump(parent, added as isize);
                self.bubble(parent, added as isize);
                any = true;
            }
        }

        if !any {
            return Damage::none();
        }
        self.damage_from_path(shared, parent, old_total)
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

        self.width_memo.clear();
        let old_total = self.total;
        let mut any = false;

        for &i in idxs.iter().rev() {
            let child = parent.child(i);
            if let Some(count) = self.children.get(parent).copied() {
                if i < count {
                    self.children.insert(parent.clone(), count - 1);
                    let removed = 1 + self.visible_under(&child);
                    drop_map_keys_at_and_under(&mut self.children, &child);
                    drop_map_keys_at_and_under(&mut self.visible, &child);
                    self.bump(parent, -(removed as isize));
                    self.bubble(parent, -(removed as isize));
                    any = true;
                } else {
                    debug_assert!(false, "remove index beyond cached child count");
                }
            }
            drop_set_keys_at_and_under(&mut shared.expanded, &child);
            shift_set_keys(&mut shared.expanded, parent, i + 1, -1);
            shift_map_keys(&mut self.children, parent, i + 1, -1);
            shift_map_keys(&mut self.visible, parent, i + 1, -1);
        }

        if !any {
            return Damage::none();
        }
        self.damage_from_path(shared, parent, old_total)
    }

    pub(crate) fn nodes_changed<T: TreeModel, M: RowMeasure>(
        &mut self,
        shared: &mut Shared<T, M>,
        parent: &TreePath,
        indices: &[usize],
    ) -> Damage {
        let mut damage = Damage::none();
        let rh = Self::row_height(&shared.config);
        let width = shared.config.viewport.width.max(0.0);
        for &i in indices {
            let child = parent.child(i);
            self.width_memo.remove(&child);
            if let Some(row) = self.row_for_path(shared, &child) {
                let y = Self::y_of_row(&shared.config, row);
                damage.dirty_rects.push(Rect::new(0.0, y, width, y + rh));
            }
        }
        damage
    }

    pub(crate) fn structure_changed<T: TreeModel, M: RowMeasure>(
        &mut self,
        shared: &mut Shared<T, M>,
        path: &TreePath,
    ) -> Damage {
        drop_set_keys_under(&mut shared.expanded, path);
        self.width_memo.clear();
        if !shared.ancestors_expanded(path) {
            return Damage::none();
        }
        let old_total = self.total;
        let old = self.visible_under(path);
        drop_map_keys_at_and_under(&mut self.children, path);
        drop_map_keys_at_and_under(&mut self.visible, path);
        let new = if shared.expanded.contains(path) {
            self.walk(shared, path)
        } else {
            0
        };
        self.bubble(path, new as isize - old as isize);
        self.damage_from_path(shared, path, old_total)
    }

    /// Adjusts the visible count stored for `path` itself.
    fn bump(&mut self, path: &TreePath, delta: isize) {
        if let Some(v) = self.visible.get_mut(path) {
            *v = v.saturating_add_signed(delta);
        }
    }

    /// Propagates a visible-count change to all proper ancestors and the
    /// total.
    fn bubble(&mut self, path: &TreePath, delta: isize) {
        let mut prefix = path.clone();
        while let Some(parent) = prefix.parent() {
            if let Some(v) = self.visible.get_mut(&parent) {
                *v = v.saturating_add_signed(delta);
            }
            prefix = parent;
        }
        self.total = self.total.saturating_add_signed(delta);
    }

    fn damage_from_path<T: TreeModel, M: RowMeasure>(
        &self,
        shared: &Shared<T, M>,
        path: &TreePath,
        old_total: usize,
    ) -> Damage {
        let config = &shared.config;
        let y = self
            .row_for_path(shared, path)
            .map_or(0.0, |row| Self::y_of_row(config, row));
        let bottom = Self::y_of_row(config, self.total.max(old_total)).max(y);
        let width = config.viewport.width.max(0.0);
        Damage {
            dirty_rects: Vec::from([Rect::new(0.0, y, width, bottom)]),
        }
    }
}
