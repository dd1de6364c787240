// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The tree layout engine: configuration, lazy revalidation, queries, and
//! incremental structural updates over a selectable row-cache variant.

use hashbrown::HashSet;
use kurbo::{Point, Rect, Size};

use crate::fixed::FixedCache;
use crate::shared::{Config, Shared};
use crate::variable::VariableCache;
use crate::{Damage, Direction, Invalidation, RowMeasure, TreeModel, TreePath, Variant};

#[derive(Debug)]
enum Cache {
    Variable(VariableCache),
    Fixed(FixedCache),
}

/// The hierarchical layout cache for tree-like widgets.
///
/// Owns the expansion flags and the layout configuration, borrows structure
/// from a [`TreeModel`] and row sizes from a [`RowMeasure`], and keeps a row
/// cache in the [`Variant`] chosen at construction. Configuration setters OR
/// invalidation bits and queries revalidate lazily; expansion toggles and
/// structural events instead patch the valid cache in place, touching only
/// the affected subtree, and return the [`Damage`] to repaint.
///
/// Queries return `Option` for paths that are out of range or hidden behind
/// a collapsed ancestor; they never panic.
#[derive(Debug)]
pub struct TreeLayout<T: TreeModel, M: RowMeasure> {
    shared: Shared<T, M>,
    cache: Cache,
    invalid: Invalidation,
}

impl<T: TreeModel, M: RowMeasure> TreeLayout<T, M> {
    /// Creates an engine over `model` and `measure` with every node
    /// collapsed.
    #[must_use]
    pub fn new(model: T, measure: M, variant: Variant) -> Self {
        Self {
            shared: Shared {
                model,
                measure,
                expanded: HashSet::new(),
                config: Config::default(),
            },
            cache: match variant {
                Variant::VariableHeight => Cache::Variable(VariableCache::default()),
                Variant::FixedHeight => Cache::Fixed(FixedCache::default()),
            },
            invalid: Invalidation::all(),
        }
    }

    /// Read access to the external model.
    pub fn model(&self) -> &T {
        &self.shared.model
    }

    /// Sets whether the root node occupies a row.
    pub fn set_root_visible(&mut self, visible: bool) {
        if visible != self.shared.config.root_visible {
            self.shared.config.root_visible = visible;
            self.invalid |= Invalidation::MODEL;
        }
    }

    /// Sets whether the root level shows expand handles; shifts every row's
    /// indent.
    pub fn set_shows_root_handles(&mut self, shows: bool) {
        if shows != self.shared.config.shows_root_handles {
            self.shared.config.shows_root_handles = shows;
            self.invalid |= Invalidation::ORIENTATION;
        }
    }

    /// Sets the per-level indents (left: control column, right: content
    /// inset).
    pub fn set_indents(&mut self, left: f64, right: f64) {
        self.shared.config.left_indent = left.max(0.0);
        self.shared.config.right_indent = right.max(0.0);
        self.invalid |= Invalidation::ORIENTATION;
    }

    /// Sets a uniform row height; a value `> 0` overrides measured heights.
    ///
    /// Required for the [`Variant::FixedHeight`] cache to produce non-empty
    /// geometry.
    pub fn set_row_height(&mut self, height: f64) {
        if height != self.shared.config.row_height {
            self.shared.config.row_height = height;
            self.invalid |= Invalidation::MEASURE;
        }
    }

    /// Sets the width of the expand-control hot zone.
    pub fn set_expand_control_width(&mut self, width: f64) {
        self.shared.config.expand_control_width = width.max(0.0);
        self.invalid |= Invalidation::ORIENTATION;
    }

    /// Sets the reading direction.
    pub fn set_direction(&mut self, direction: Direction) {
        if direction != self.shared.config.direction {
            self.shared.config.direction = direction;
            self.invalid |= Invalidation::ORIENTATION;
        }
    }

    /// Sets the viewport size; bounds damage widths and the mirror axis.
    pub fn set_viewport(&mut self, viewport: Size) {
        if viewport != self.shared.config.viewport {
            self.shared.config.viewport = viewport;
            self.invalid |= Invalidation::VIEWPORT;
        }
    }

    /// Marks all row sizes stale (font or renderer changed).
    pub fn invalidate_sizes(&mut self) {
        self.invalid |= Invalidation::MEASURE;
    }

    /// Pending invalidation classes; empty when the cache is valid.
    #[must_use]
    pub const fn pending_invalidation(&self) -> Invalidation {
        self.invalid
    }

    /// Indent levels added to every row by the root visibility settings.
    #[must_use]
    pub const fn depth_offset(&self) -> isize {
        self.shared.config.depth_offset()
    }

    /// Returns `true` if the node at `path` is expanded.
    #[must_use]
    pub fn is_expanded(&self, path: &TreePath) -> bool {
        self.shared.expanded.contains(path)
    }

    /// Returns `true` if `path` occupies a row: every ancestor expanded, and
    /// the root only when configured visible.
    #[must_use]
    pub fn is_visible(&self, path: &TreePath) -> bool {
        self.shared.is_displayed(path)
    }

    /// Total rows over the whole visible tree.
    pub fn visible_row_count(&mut self) -> usize {
        self.ensure_valid();
        match &self.cache {
            Cache::Variable(c) => c.len(),
            Cache::Fixed(c) => c.len(),
        }
    }

    /// The row occupied by `path`, or `None` if it is not visible.
    pub fn row_for_path(&mut self, path: &TreePath) -> Option<usize> {
        self.ensure_valid();
        self.row_of(path)
    }

    /// The path occupying `row`, or `None` if out of range.
    pub fn path_for_row(&mut self, row: usize) -> Option<TreePath> {
        self.ensure_valid();
        match &self.cache {
            Cache::Variable(c) => c.path_for_row(row).cloned(),
            Cache::Fixed(c) => c.path_for_row(&self.shared, row),
        }
    }

    /// Bounds of the row at `path` in widget coordinates, or `None` if the
    /// path is not visible.
    pub fn bounds_of(&mut self, path: &TreePath) -> Option<Rect> {
        self.ensure_valid();
        let row = self.row_of(path)?;
        let (y, h) = self.metrics_of_row(row);
        let w = match &mut self.cache {
            Cache::Variable(c) => c.width_of_row(row),
            Cache::Fixed(c) => c.width_of(&mut self.shared, path),
        };
        let x = self.shared.config.row_x(path.depth());
        Some(self.mirror(Rect::new(x, y, x + w, y + h)))
    }

    /// Bounds of `row`, or `None` if out of range.
    pub fn bounds_of_row(&mut self, row: usize) -> Option<Rect> {
        let path = self.path_for_row(row)?;
        self.bounds_of(&path)
    }

    /// Total content size.
    ///
    /// The fixed-height variant reports the width of rows inside the current
    /// viewport window only; it never measures the whole model.
    pub fn content_size(&mut self) -> Size {
        self.ensure_valid();
        match &mut self.cache {
            Cache::Variable(c) => {
                Size::new(c.content_width(&self.shared.config), c.total_height())
            }
            Cache::Fixed(c) => {
                let config = &self.shared.config;
                let height = c.total_height(config);
                let window = config.viewport.height.max(0.0);
                let mut width = 0.0_f64;
                if let (Some(first), Some(last)) =
                    (c.closest_row(config, 0.0), c.closest_row(config, window))
                {
                    for row in first..=last {
                        if let Some(path) = c.path_for_row(&self.shared, row) {
                            let x = self.shared.config.row_x(path.depth());
                            width = width.max(x + c.width_of(&mut self.shared, &path));
                        }
                    }
                }
                Size::new(width, height)
            }
        }
    }

    /// The row containing `y`, or `None` when `y` is outside the content.
    pub fn row_at_y(&mut self, y: f64) -> Option<usize> {
        self.ensure_valid();
        match &mut self.cache {
            Cache::Variable(c) => c.row_at_y(y),
            Cache::Fixed(c) => c.row_at_y(&self.shared.config, y),
        }
    }

    /// The row nearest to `y`; `None` only when there are no rows.
    pub fn closest_row_at_y(&mut self, y: f64) -> Option<usize> {
        self.ensure_valid();
        match &mut self.cache {
            Cache::Variable(c) => c.closest_row(y),
            Cache::Fixed(c) => c.closest_row(&self.shared.config, y),
        }
    }

    /// Rows whose vertical span intersects `clip`; bounds traversal to the
    /// visible window.
    pub fn rows_in(&mut self, clip: Rect) -> core::ops::Range<usize> {
        self.ensure_valid();
        let count = match &self.cache {
            Cache::Variable(c) => c.len(),
            Cache::Fixed(c) => c.len(),
        };
        if count == 0 {
            return 0..0;
        }
        let (Some(start), Some(end)) = (
            self.closest_row_at_y(clip.y0),
            self.closest_row_at_y(clip.y1),
        ) else {
            return 0..0;
        };
        start..(end + 1).min(count)
    }

    /// The path whose row is nearest to `point`'s y-coordinate.
    ///
    /// Defined even when no row contains the point; `None` only for an empty
    /// layout.
    pub fn closest_path_at(&mut self, point: Point) -> Option<TreePath> {
        let row = self.closest_row_at_y(point.y)?;
        self.path_for_row(row)
    }

    /// The path whose row bounds contain `point`, or `None`.
    pub fn path_at(&mut self, point: Point) -> Option<TreePath> {
        let row = self.row_at_y(point.y)?;
        let path = self.path_for_row(row)?;
        let bounds = self.bounds_of(&path)?;
        bounds.contains(point).then_some(path)
    }

    /// Returns `true` if `point` falls in the expand-control hot zone of the
    /// row at `path`.
    ///
    /// The zone has a fixed width centered one indent level left of the row
    /// content, independent of the row's content width; leaves have no
    /// control.
    pub fn is_location_in_expand_control(&mut self, path: &TreePath, point: Point) -> bool {
        self.ensure_valid();
        let Some(row) = self.row_of(path) else {
            return false;
        };
        let (y, h) = self.metrics_of_row(row);
        if point.y < y || point.y >= y + h {
            return false;
        }
        if self.shared.model.child_count(path) == 0 {
            return false;
        }
        let config = &self.shared.config;
        #[allow(
            clippy::cast_precision_loss,
            reason = "Tree depths are far below the mantissa limit"
        )]
        let levels = path.depth() as f64 - 1.0 + config.depth_offset() as f64;
        let mut center = levels * config.total_indent() + config.left_indent;
        if config.direction == Direction::RightToLeft && config.viewport.width > 0.0 {
            center = config.viewport.width - center;
        }
        let half = config.expand_control_width / 2.0;
        point.x >= center - half && point.x < center + half
    }

    /// Expands or collapses the node at `path`.
    ///
    /// Patches the row cache incrementally: bounds of rows before the
    /// toggled row are untouched, rows after it shift. Toggling a node
    /// hidden behind a collapsed ancestor records the flag and changes no
    /// geometry.
    pub fn set_expanded(&mut self, path: &TreePath, expanded: bool) -> Damage {
        self.ensure_valid();
        if self.shared.expanded.contains(path) == expanded {
            return Damage::none();
        }
        match &mut self.cache {
            Cache::Variable(c) => c.set_expanded(&mut self.shared, path, expanded),
            Cache::Fixed(c) => c.set_expanded(&mut self.shared, path, expanded),
        }
    }

    /// Applies a model "children inserted" event: `indices` are the new
    /// children's positions under `parent` after the insert.
    pub fn nodes_inserted(&mut self, parent: &TreePath, indices: &[usize]) -> Damage {
        self.ensure_valid();
        match &mut self.cache {
            Cache::Variable(c) => c.nodes_inserted(&mut self.shared, parent, indices),
            Cache::Fixed(c) => c.nodes_inserted(&mut self.shared, parent, indices),
        }
    }

    /// Applies a model "children removed" event: `indices` are the removed
    /// children's positions under `parent` before the removal.
    pub fn nodes_removed(&mut self, parent: &TreePath, indices: &[usize]) -> Damage {
        self.ensure_valid();
        match &mut self.cache {
            Cache::Variable(c) => c.nodes_removed(&mut self.shared, parent, indices),
            Cache::Fixed(c) => c.nodes_removed(&mut self.shared, parent, indices),
        }
    }

    /// Applies a model "children changed" event: the nodes kept their
    /// positions but their rendered content (and so their size) may differ.
    pub fn nodes_changed(&mut self, parent: &TreePath, indices: &[usize]) -> Damage {
        self.ensure_valid();
        match &mut self.cache {
            Cache::Variable(c) => c.nodes_changed(&mut self.shared, parent, indices),
            Cache::Fixed(c) => c.nodes_changed(&mut self.shared, parent, indices),
        }
    }

    /// Applies a model "structure changed" event: the subtree at `path` must
    /// be re-read from the model. The node keeps its own expansion flag;
    /// descendants reset to collapsed.
    pub fn structure_changed(&mut self, path: &TreePath) -> Damage {
        self.ensure_valid();
        match &mut self.cache {
            Cache::Variable(c) => c.structure_changed(&mut self.shared, path),
            Cache::Fixed(c) => c.structure_changed(&mut self.shared, path),
        }
    }

    fn ensure_valid(&mut self) {
        if self.invalid.is_empty() {
            return;
        }
        if self.invalid.contains(Invalidation::MODEL) {
            match &mut self.cache {
                Cache::Variable(c) => c.rebuild(&mut self.shared),
                Cache::Fixed(c) => c.rebuild(&mut self.shared),
            }
        } else if self.invalid.contains(Invalidation::MEASURE) {
            match &mut self.cache {
                Cache::Variable(c) => c.remeasure(&mut self.shared),
                Cache::Fixed(c) => c.clear_width_memo(),
            }
        }
        // Orientation and viewport changes only affect per-query transforms.
        self.invalid = Invalidation::empty();
    }

    fn row_of(&self, path: &TreePath) -> Option<usize> {
        match &self.cache {
            Cache::Variable(c) => c.row_for_path(path),
            Cache::Fixed(c) => c.row_for_path(&self.shared, path),
        }
    }

    fn metrics_of_row(&mut self, row: usize) -> (f64, f64) {
        match &mut self.cache {
            Cache::Variable(c) => (c.y_of_row(row), c.height_of_row(row)),
            Cache::Fixed(_) => {
                let config = &self.shared.config;
                (
                    FixedCache::y_of_row(config, row),
                    config.row_height.max(0.0),
                )
            }
        }
    }

    fn mirror(&self, rect: Rect) -> Rect {
        let width = self.shared.config.viewport.width;
        if self.shared.config.direction == Direction::RightToLeft && width > 0.0 {
            Rect::new(width - rect.x1, rect.y0, width - rect.x0, rect.y1)
        } else {
            rect
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    use kurbo::{Point, Rect, Size};

    use crate::{Direction, TreeLayout, TreeModel, TreePath, Variant};

    #[derive(Default, Debug)]
    struct Node {
        children: Vec<Node>,
    }

    impl Node {
        fn with(children: Vec<Node>) -> Self {
            Self { children }
        }

        fn leaf() -> Self {
            Self::default()
        }

        fn at_mut(&mut self, path: &TreePath) -> Option<&mut Node> {
            let mut node = self;
            for &i in path.as_slice() {
                node = node.children.get_mut(i)?;
            }
            Some(node)
        }
    }

    /// A mutable in-memory tree shared between the test and the engine.
    #[derive(Clone, Default, Debug)]
    struct TestTree(Rc<RefCell<Node>>);

    impl TestTree {
        fn new(root: Node) -> Self {
            Self(Rc::new(RefCell::new(root)))
        }

        fn insert(&self, parent: &TreePath, index: usize, node: Node) {
            let mut tree = self.0.borrow_mut();
            if let Some(p) = tree.at_mut(parent) {
                p.children.insert(index, node);
            }
        }

        fn remove(&self, parent: &TreePath, index: usize) {
            let mut tree = self.0.borrow_mut();
            if let Some(p) = tree.at_mut(parent) {
                p.children.remove(index);
            }
        }
    }

    impl TreeModel for TestTree {
        fn child_count(&self, path: &TreePath) -> usize {
            let tree = self.0.borrow();
            let mut node = &*tree;
            for &i in path.as_slice() {
                match node.children.get(i) {
                    Some(child) => node = child,
                    None => return 0,
                }
            }
            node.children.len()
        }
    }

    fn measure(_: &TreePath) -> Size {
        Size::new(80.0, 20.0)
    }

    /// root → A → {B, C}; the golden expansion scenario.
    fn small_tree() -> TestTree {
        TestTree::new(Node::with(vec![Node::with(vec![
            Node::leaf(),
            Node::leaf(),
        ])]))
    }

    /// root → {a: {x, y}, b, c: {z}}.
    fn wide_tree() -> TestTree {
        TestTree::new(Node::with(vec![
            Node::with(vec![Node::leaf(), Node::leaf()]),
            Node::leaf(),
            Node::with(vec![Node::leaf()]),
        ]))
    }

    fn variable(tree: &TestTree) -> TreeLayout<TestTree, fn(&TreePath) -> Size> {
        TreeLayout::new(tree.clone(), measure, Variant::VariableHeight)
    }

    fn fixed(tree: &TestTree) -> TreeLayout<TestTree, fn(&TreePath) -> Size> {
        let mut layout: TreeLayout<TestTree, fn(&TreePath) -> Size> =
            TreeLayout::new(tree.clone(), measure, Variant::FixedHeight);
        layout.set_row_height(20.0);
        layout
    }

    #[test]
    fn expansion_scenario_counts_rows() {
        let mut layout = variable(&small_tree());
        layout.set_expanded(&TreePath::root(), true);
        assert_eq!(layout.visible_row_count(), 2);

        let root_before = layout.bounds_of(&TreePath::root()).unwrap();
        let damage = layout.set_expanded(&TreePath::from([0]), true);
        assert_eq!(layout.visible_row_count(), 4);
        // The toggled row is at y 20; rows before it keep their bounds.
        assert_eq!(layout.bounds_of(&TreePath::root()), Some(root_before));
        assert!(!damage.is_empty());
        assert_eq!(damage.union_rect().map(|r| r.y0), Some(20.0));
    }

    #[test]
    fn collapse_hides_descendants_and_remembers_flags() {
        let mut layout = variable(&wide_tree());
        layout.set_expanded(&TreePath::root(), true);
        layout.set_expanded(&TreePath::from([0]), true);
        assert_eq!(layout.visible_row_count(), 6);

        layout.set_expanded(&TreePath::root(), false);
        assert_eq!(layout.visible_row_count(), 1);
        assert_eq!(layout.bounds_of(&TreePath::from([0])), None);
        assert!(layout.is_expanded(&TreePath::from([0])));

        // Re-expanding the root restores the remembered shape.
        layout.set_expanded(&TreePath::root(), true);
        assert_eq!(layout.visible_row_count(), 6);
        assert!(layout.bounds_of(&TreePath::from([0, 1])).is_some());
    }

    #[test]
    fn row_path_mappings_invert() {
        for mut layout in [variable(&wide_tree()), fixed(&wide_tree())] {
            layout.set_expanded(&TreePath::root(), true);
            layout.set_expanded(&TreePath::from([0]), true);
            layout.set_expanded(&TreePath::from([2]), true);
            let count = layout.visible_row_count();
            assert_eq!(count, 7);
            for row in 0..count {
                let path = layout.path_for_row(row).unwrap();
                assert_eq!(layout.row_for_path(&path), Some(row));
            }
            assert_eq!(layout.path_for_row(count), None);
        }
    }

    #[test]
    fn hidden_paths_have_no_bounds() {
        for mut layout in [variable(&small_tree()), fixed(&small_tree())] {
            layout.set_expanded(&TreePath::root(), true);
            assert!(layout.bounds_of(&TreePath::from([0])).is_some());
            // B is behind the collapsed A.
            assert_eq!(layout.bounds_of(&TreePath::from([0, 0])), None);
            assert_eq!(layout.row_for_path(&TreePath::from([0, 0])), None);
            // Out of model range.
            assert_eq!(layout.bounds_of(&TreePath::from([9])), None);
        }
    }

    #[test]
    fn indent_follows_depth_and_root_mode() {
        let mut layout = variable(&small_tree());
        layout.set_expanded(&TreePath::root(), true);
        layout.set_expanded(&TreePath::from([0]), true);
        layout.set_indents(8.0, 12.0);

        // Root visible without handles: offset 0.
        assert_eq!(layout.depth_offset(), 0);
        assert_eq!(layout.bounds_of(&TreePath::root()).unwrap().x0, 0.0);
        assert_eq!(layout.bounds_of(&TreePath::from([0])).unwrap().x0, 20.0);
        assert_eq!(layout.bounds_of(&TreePath::from([0, 0])).unwrap().x0, 40.0);

        layout.set_shows_root_handles(true);
        assert_eq!(layout.depth_offset(), 1);
        assert_eq!(layout.bounds_of(&TreePath::root()).unwrap().x0, 20.0);

        // Hidden root without handles: children sit flush left.
        layout.set_root_visible(false);
        layout.set_shows_root_handles(false);
        assert_eq!(layout.depth_offset(), -1);
        assert_eq!(layout.bounds_of(&TreePath::root()), None);
        assert_eq!(layout.visible_row_count(), 3);
        let child = layout.bounds_of(&TreePath::from([0])).unwrap();
        assert_eq!((child.x0, child.y0), (0.0, 0.0));
    }

    #[test]
    fn fixed_variant_matches_variable_structure() {
        let mut var = variable(&wide_tree());
        let mut fix = fixed(&wide_tree());
        for layout in [&mut var, &mut fix] {
            layout.set_expanded(&TreePath::root(), true);
            layout.set_expanded(&TreePath::from([2]), true);
        }
        assert_eq!(var.visible_row_count(), fix.visible_row_count());
        for row in 0..var.visible_row_count() {
            assert_eq!(var.path_for_row(row), fix.path_for_row(row));
            assert_eq!(var.bounds_of_row(row), fix.bounds_of_row(row));
        }
    }

    #[test]
    fn insertion_patches_rows_and_renumbers_flags() {
        let tree = wide_tree();
        for mut layout in [variable(&tree), fixed(&tree)] {
            layout.set_expanded(&TreePath::root(), true);
            layout.set_expanded(&TreePath::from([0]), true);
            assert_eq!(layout.visible_row_count(), 6);

            // The model grows first; then the event arrives.
            tree.insert(&TreePath::root(), 0, Node::leaf());
            let damage = layout.nodes_inserted(&TreePath::root(), &[0]);
            assert!(!damage.is_empty());
            assert_eq!(layout.visible_row_count(), 7);

            // The expanded flag followed its node from index 0 to 1.
            assert!(layout.is_expanded(&TreePath::from([1])));
            assert_eq!(
                layout.path_for_row(2),
                Some(TreePath::from([1])),
                "old first child moved down one row"
            );
            assert_eq!(layout.path_for_row(3), Some(TreePath::from([1, 0])));

            tree.remove(&TreePath::root(), 0);
            layout.nodes_removed(&TreePath::root(), &[0]);
            assert_eq!(layout.visible_row_count(), 6);
            assert!(layout.is_expanded(&TreePath::from([0])));
        }
    }

    #[test]
    fn removal_drops_subtree_rows_and_flags() {
        let tree = wide_tree();
        for mut layout in [variable(&tree), fixed(&tree)] {
            layout.set_expanded(&TreePath::root(), true);
            layout.set_expanded(&TreePath::from([0]), true);
            layout.set_expanded(&TreePath::from([2]), true);
            assert_eq!(layout.visible_row_count(), 7);

            tree.remove(&TreePath::root(), 0);
            let damage = layout.nodes_removed(&TreePath::root(), &[0]);
            assert!(!damage.is_empty());
            assert_eq!(layout.visible_row_count(), 4);
            // "c" slid from index 2 to 1, keeping its expansion.
            assert!(layout.is_expanded(&TreePath::from([1])));
            assert_eq!(layout.path_for_row(3), Some(TreePath::from([1, 0])));
            assert!(!layout.is_expanded(&TreePath::from([2])));

            tree.insert(
                &TreePath::root(),
                0,
                Node::with(vec![Node::leaf(), Node::leaf()]),
            );
            layout.nodes_inserted(&TreePath::root(), &[0]);
        }
    }

    #[test]
    fn events_under_collapsed_parents_only_bookkeep() {
        let tree = wide_tree();
        for mut layout in [variable(&tree), fixed(&tree)] {
            layout.set_expanded(&TreePath::root(), true);
            // "a" stays collapsed; its children are invisible.
            assert_eq!(layout.visible_row_count(), 4);

            tree.insert(&TreePath::from([0]), 0, Node::leaf());
            let damage = layout.nodes_inserted(&TreePath::from([0]), &[0]);
            assert!(damage.is_empty());
            assert_eq!(layout.visible_row_count(), 4);

            // Expanding now shows the fresh model content.
            layout.set_expanded(&TreePath::from([0]), true);
            assert_eq!(layout.visible_row_count(), 7);
            tree.remove(&TreePath::from([0]), 0);
            layout.nodes_removed(&TreePath::from([0]), &[0]);
            assert_eq!(layout.visible_row_count(), 6);
        }
    }

    #[test]
    fn structure_change_rereads_subtree_and_resets_descendants() {
        type Make = fn(&TestTree) -> TreeLayout<TestTree, fn(&TreePath) -> Size>;
        for make in [variable as Make, fixed as Make] {
            let tree = wide_tree();
            let mut layout = make(&tree);
            layout.set_expanded(&TreePath::root(), true);
            layout.set_expanded(&TreePath::from([0]), true);
            layout.set_expanded(&TreePath::from([2]), true);
            assert_eq!(layout.visible_row_count(), 7);

            // Replace "a"'s children wholesale behind the engine's back.
            if let Some(a) = tree.0.borrow_mut().at_mut(&TreePath::from([0])) {
                a.children = vec![Node::leaf(), Node::leaf(), Node::leaf()];
            }
            let damage = layout.structure_changed(&TreePath::from([0]));
            assert!(!damage.is_empty());
            // "a" keeps its own expansion, so its three new children show.
            assert_eq!(layout.visible_row_count(), 8);
            assert!(layout.is_expanded(&TreePath::from([0])));
            // Unrelated expansion is untouched.
            assert!(layout.is_expanded(&TreePath::from([2])));
            assert_eq!(layout.row_for_path(&TreePath::from([2, 0])), Some(7));
        }
    }

    #[test]
    fn variable_heights_accumulate_and_hit_test() {
        let taller = |path: &TreePath| {
            // Deeper rows are taller.
            #[allow(clippy::cast_precision_loss, reason = "test depths are tiny")]
            let h = 20.0 + 10.0 * path.depth() as f64;
            Size::new(60.0, h)
        };
        let mut layout = TreeLayout::new(small_tree(), taller, Variant::VariableHeight);
        layout.set_expanded(&TreePath::root(), true);
        layout.set_expanded(&TreePath::from([0]), true);

        // Heights: root 20, A 30, B 40, C 40.
        assert_eq!(layout.content_size().height, 130.0);
        let a = layout.bounds_of(&TreePath::from([0])).unwrap();
        assert_eq!((a.y0, a.y1), (20.0, 50.0));
        assert_eq!(layout.row_at_y(49.0), Some(1));
        assert_eq!(layout.row_at_y(50.0), Some(2));
        assert_eq!(layout.row_at_y(130.0), None);
        assert_eq!(layout.closest_row_at_y(500.0), Some(3));
        assert_eq!(layout.closest_row_at_y(-5.0), Some(0));
        assert_eq!(
            layout.closest_path_at(Point::new(999.0, 500.0)),
            Some(TreePath::from([0, 1]))
        );
        assert_eq!(layout.rows_in(Rect::new(0.0, 25.0, 100.0, 60.0)), 1..3);
    }

    #[test]
    fn changed_nodes_resize_and_shift_the_suffix() {
        let sizes = Rc::new(RefCell::new(20.0_f64));
        let sizes_ref = Rc::clone(&sizes);
        let measure = move |path: &TreePath| {
            if path.as_slice() == [0] {
                Size::new(80.0, *sizes_ref.borrow())
            } else {
                Size::new(80.0, 20.0)
            }
        };
        let mut layout = TreeLayout::new(wide_tree(), measure, Variant::VariableHeight);
        layout.set_expanded(&TreePath::root(), true);
        let before = layout.bounds_of(&TreePath::from([1])).unwrap();
        assert_eq!(before.y0, 40.0);

        *sizes.borrow_mut() = 35.0;
        let damage = layout.nodes_changed(&TreePath::root(), &[0]);
        assert!(!damage.is_empty());
        // The changed row grew; everything after it shifted down.
        assert_eq!(layout.bounds_of(&TreePath::from([0])).unwrap().height(), 35.0);
        assert_eq!(layout.bounds_of(&TreePath::from([1])).unwrap().y0, 55.0);
        // The root row above is untouched.
        assert_eq!(layout.bounds_of(&TreePath::root()).unwrap().y0, 0.0);
    }

    #[test]
    fn expand_control_zone_is_fixed_width() {
        let mut layout = variable(&small_tree());
        layout.set_expanded(&TreePath::root(), true);
        layout.set_indents(8.0, 12.0);
        layout.set_expand_control_width(10.0);

        // A is at depth 1, offset 0: content at x 20, control centered at 8.
        let a = TreePath::from([0]);
        assert!(layout.is_location_in_expand_control(&a, Point::new(8.0, 30.0)));
        assert!(layout.is_location_in_expand_control(&a, Point::new(3.0, 30.0)));
        assert!(!layout.is_location_in_expand_control(&a, Point::new(13.5, 30.0)));
        // Wrong row.
        assert!(!layout.is_location_in_expand_control(&a, Point::new(8.0, 10.0)));
        // Leaves draw no control.
        layout.set_expanded(&a, true);
        let b = TreePath::from([0, 0]);
        assert!(!layout.is_location_in_expand_control(&b, Point::new(28.0, 50.0)));
    }

    #[test]
    fn rtl_mirrors_bounds_and_control() {
        let mut layout = variable(&small_tree());
        layout.set_expanded(&TreePath::root(), true);
        layout.set_viewport(Size::new(200.0, 100.0));
        layout.set_indents(8.0, 12.0);
        layout.set_expand_control_width(10.0);

        let a = TreePath::from([0]);
        let ltr = layout.bounds_of(&a).unwrap();
        layout.set_direction(Direction::RightToLeft);
        let rtl = layout.bounds_of(&a).unwrap();
        assert_eq!(rtl.x1, 200.0 - ltr.x0);
        assert_eq!(rtl.x0, 200.0 - ltr.x1);
        // Control mirrored to x 192.
        assert!(layout.is_location_in_expand_control(&a, Point::new(192.0, 30.0)));
        assert!(!layout.is_location_in_expand_control(&a, Point::new(8.0, 30.0)));
    }

    #[test]
    fn empty_model_degenerates() {
        let tree = TestTree::new(Node::leaf());
        let mut layout = variable(&tree);
        // Root hidden and collapsed: no rows at all.
        layout.set_root_visible(false);
        assert_eq!(layout.visible_row_count(), 0);
        assert_eq!(layout.closest_row_at_y(10.0), None);
        assert_eq!(layout.closest_path_at(Point::new(0.0, 0.0)), None);
        assert_eq!(layout.content_size(), Size::ZERO);
        assert_eq!(layout.rows_in(Rect::new(0.0, 0.0, 10.0, 10.0)), 0..0);
    }

    #[test]
    fn fixed_variant_row_math_is_uniform() {
        let mut layout = fixed(&wide_tree());
        layout.set_viewport(Size::new(300.0, 200.0));
        layout.set_expanded(&TreePath::root(), true);
        assert_eq!(layout.visible_row_count(), 4);
        assert_eq!(layout.content_size().height, 80.0);
        assert_eq!(layout.row_at_y(59.9), Some(2));
        assert_eq!(layout.row_at_y(80.0), None);
        assert_eq!(layout.closest_row_at_y(500.0), Some(3));
        let damage = layout.set_expanded(&TreePath::from([0]), true);
        assert_eq!(layout.visible_row_count(), 6);
        // Damage extends from the toggled row to the new bottom.
        let union = damage.union_rect().unwrap();
        assert_eq!(union.y0, 20.0);
        assert_eq!(union.y1, 120.0);
    }
}
