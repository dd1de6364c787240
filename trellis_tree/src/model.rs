// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The external-model boundary: structure access and per-row measurement.

use kurbo::Size;

use crate::TreePath;

/// Read-only structural access to the external tree model.
///
/// The engine queries child counts during traversal and never mutates the
/// model; structural changes arrive as explicit events
/// ([`crate::TreeLayout::nodes_inserted`] and friends). A node with zero
/// children is a leaf and draws no expand control.
///
/// Closures `Fn(&TreePath) -> usize` implement it directly.
pub trait TreeModel {
    /// Number of children of the node at `path`.
    fn child_count(&self, path: &TreePath) -> usize;
}

impl<F: Fn(&TreePath) -> usize> TreeModel for F {
    fn child_count(&self, path: &TreePath) -> usize {
        self(path)
    }
}

/// The row-measurer boundary: preferred size of a row's rendered content.
///
/// Invoked at most once per visible row per invalidation cycle and memoized;
/// when a fixed row height is configured only the width component is used.
/// Closures `FnMut(&TreePath) -> Size` implement it directly.
pub trait RowMeasure {
    /// Returns the preferred size of the row for the node at `path`.
    fn measure(&mut self, path: &TreePath) -> Size;
}

impl<F: FnMut(&TreePath) -> Size> RowMeasure for F {
    fn measure(&mut self, path: &TreePath) -> Size {
        self(path)
    }
}
