// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! State shared between the engine facade and the row-cache variants:
//! configuration, the expansion set, and path-renumbering helpers.

use alloc::vec::Vec;

use hashbrown::{HashMap, HashSet};
use kurbo::Size;

use crate::{Direction, RowMeasure, TreeModel, TreePath};

/// Layout configuration; plain fields, mutated through engine setters.
#[derive(Clone, Debug)]
pub(crate) struct Config {
    pub(crate) root_visible: bool,
    pub(crate) shows_root_handles: bool,
    pub(crate) left_indent: f64,
    pub(crate) right_indent: f64,
    /// Fixed row height when positive; otherwise rows use measured heights.
    pub(crate) row_height: f64,
    pub(crate) expand_control_width: f64,
    pub(crate) direction: Direction,
    pub(crate) viewport: Size,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root_visible: true,
            shows_root_handles: false,
            left_indent: 7.0,
            right_indent: 13.0,
            row_height: 0.0,
            expand_control_width: 9.0,
            direction: Direction::LeftToRight,
            viewport: Size::ZERO,
        }
    }
}

impl Config {
    pub(crate) fn total_indent(&self) -> f64 {
        self.left_indent + self.right_indent
    }

    /// How many indent levels the root visibility configuration shifts every
    /// row by.
    pub(crate) const fn depth_offset(&self) -> isize {
        match (self.root_visible, self.shows_root_handles) {
            (true, true) => 1,
            (true, false) | (false, true) => 0,
            (false, false) => -1,
        }
    }

    /// Left edge of the row content for a node at `depth`.
    pub(crate) fn row_x(&self, depth: usize) -> f64 {
        #[allow(
            clippy::cast_precision_loss,
            reason = "Tree depths are far below the mantissa limit"
        )]
        let levels = depth as f64 + self.depth_offset() as f64;
        (levels * self.total_indent()).max(0.0)
    }
}

/// Model, measurer, expansion flags, and configuration, bundled so cache
/// variants can borrow them independently of the cache itself.
#[derive(Debug)]
pub(crate) struct Shared<T, M> {
    pub(crate) model: T,
    pub(crate) measure: M,
    pub(crate) expanded: HashSet<TreePath>,
    pub(crate) config: Config,
}

impl<T: TreeModel, M: RowMeasure> Shared<T, M> {
    /// Returns `true` if every proper ancestor of `path` is expanded.
    pub(crate) fn ancestors_expanded(&self, path: &TreePath) -> bool {
        let mut prefix = TreePath::root();
        for &index in path.as_slice() {
            if !self.expanded.contains(&prefix) {
                return false;
            }
            prefix = prefix.child(index);
        }
        true
    }

    /// Returns `true` if `path` occupies a row: ancestors expanded, and the
    /// root only when configured visible.
    pub(crate) fn is_displayed(&self, path: &TreePath) -> bool {
        if path.is_root() {
            return self.config.root_visible;
        }
        self.ancestors_expanded(path)
    }

    /// Measures one row, applying the fixed-row-height override and clamping
    /// degenerate sizes to zero.
    pub(crate) fn measure_row(&mut self, path: &TreePath) -> (f64, f64) {
        let size = self.measure.measure(path);
        debug_assert!(
            size.width.is_finite() && size.height.is_finite(),
            "row measure must be finite"
        );
        let width = if size.width.is_finite() {
            size.width.max(0.0)
        } else {
            0.0
        };
        let height = if self.config.row_height > 0.0 {
            self.config.row_height
        } else if size.height.is_finite() {
            size.height.max(0.0)
        } else {
            0.0
        };
        (width, height)
    }
}

/// Renumbers set keys under `parent` whose child index at the parent's level
/// is `>= from`, shifting by `delta`.
pub(crate) fn shift_set_keys(
    set: &mut HashSet<TreePath>,
    parent: &TreePath,
    from: usize,
    delta: isize,
) {
    let level = parent.depth();
    let affected: Vec<TreePath> = set
        .iter()
        .filter(|p| affected_key(p, parent, level, from))
        .cloned()
        .collect();
    for key in &affected {
        set.remove(key);
    }
    for mut key in affected {
        renumber(&mut key, level, delta);
        set.insert(key);
    }
}

/// Removes set keys equal to `prefix` or below it.
pub(crate) fn drop_set_keys_at_and_under(set: &mut HashSet<TreePath>, prefix: &TreePath) {
    set.retain(|p| !p.starts_with(prefix));
}

/// Removes set keys strictly below `prefix`.
pub(crate) fn drop_set_keys_under(set: &mut HashSet<TreePath>, prefix: &TreePath) {
    set.retain(|p| p == prefix || !p.starts_with(prefix));
}

/// Renumbers map keys under `parent` whose child index at the parent's level
/// is `>= from`, shifting by `delta`.
pub(crate) fn shift_map_keys<V>(
    map: &mut HashMap<TreePath, V>,
    parent: &TreePath,
    from: usize,
    delta: isize,
) {
    let level = parent.depth();
    let keys: Vec<TreePath> = map
        .keys()
        .filter(|p| affected_key(p, parent, level, from))
        .cloned()
        .collect();
    let mut moved = Vec::with_capacity(keys.len());
    for key in keys {
        if let Some(value) = map.remove(&key) {
            let mut key = key;
            renumber(&mut key, level, delta);
            moved.push((key, value));
        }
    }
    for (key, value) in moved {
        map.insert(key, value);
    }
}

/// Removes map keys equal to `prefix` or below it.
pub(crate) fn drop_map_keys_at_and_under<V>(map: &mut HashMap<TreePath, V>, prefix: &TreePath) {
    map.retain(|p, _| !p.starts_with(prefix));
}

fn affected_key(key: &TreePath, parent: &TreePath, level: usize, from: usize) -> bool {
    key.depth() > level
        && key.starts_with(parent)
        && key.index_at(level).is_some_and(|i| i >= from)
}

fn renumber(key: &mut TreePath, level: usize, delta: isize) {
    if let Some(index) = key.index_at(level)
        && let Some(shifted) = index.checked_add_signed(delta)
    {
        key.set_index(level, shifted);
    }
}

#[cfg(test)]
mod tests {
    use hashbrown::HashSet;

    use super::{drop_set_keys_at_and_under, shift_set_keys};
    use crate::TreePath;

    #[test]
    fn shift_renumbers_only_trailing_siblings() {
        let mut set: HashSet<TreePath> = [
            TreePath::from([0]),
            TreePath::from([1]),
            TreePath::from([1, 2]),
            TreePath::from([2, 0]),
        ]
        .into_iter()
        .collect();
        // Insert a sibling at index 1 under the root.
        shift_set_keys(&mut set, &TreePath::root(), 1, 1);
        assert!(set.contains(&TreePath::from([0])));
        assert!(set.contains(&TreePath::from([2])));
        assert!(set.contains(&TreePath::from([2, 2])));
        assert!(set.contains(&TreePath::from([3, 0])));
        assert_eq!(set.len(), 4);
    }

    #[test]
    fn drop_at_and_under_removes_the_subtree() {
        let mut set: HashSet<TreePath> = [
            TreePath::from([1]),
            TreePath::from([1, 0]),
            TreePath::from([1, 0, 3]),
            TreePath::from([2]),
        ]
        .into_iter()
        .collect();
        drop_set_keys_at_and_under(&mut set, &TreePath::from([1]));
        assert_eq!(set.len(), 1);
        assert!(set.contains(&TreePath::from([2])));
    }
}
