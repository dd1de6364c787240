// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree paths: sequences of child indices addressing nodes in an external
//! model.

use smallvec::SmallVec;

/// A path from the (implicit) root to a node: the child index taken at each
/// level.
///
/// The empty path addresses the root. Paths order lexicographically, which is
/// exactly depth-first pre-order: an ancestor sorts before every node in its
/// subtree, and earlier siblings (with their subtrees) sort before later
/// ones. Row caches rely on this to binary-search materialized rows.
///
/// Most trees are shallow; up to eight levels are stored inline.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TreePath(SmallVec<[usize; 8]>);

impl TreePath {
    /// The root path (empty).
    #[must_use]
    pub fn root() -> Self {
        Self(SmallVec::new())
    }

    /// Number of levels below the root; the root itself has depth 0.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if this is the root path.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// The path of this node's `index`-th child.
    #[must_use]
    pub fn child(&self, index: usize) -> Self {
        let mut path = self.clone();
        path.0.push(index);
        path
    }

    /// The parent path, or `None` for the root.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        if self.is_root() {
            return None;
        }
        let mut path = self.clone();
        path.0.pop();
        Some(path)
    }

    /// The child index at the deepest level, or `None` for the root.
    #[must_use]
    pub fn last(&self) -> Option<usize> {
        self.0.last().copied()
    }

    /// The child index taken at `level`, if the path is that deep.
    #[must_use]
    pub fn index_at(&self, level: usize) -> Option<usize> {
        self.0.get(level).copied()
    }

    /// Returns `true` if `self` is `prefix` or a descendant of it.
    #[must_use]
    pub fn starts_with(&self, prefix: &Self) -> bool {
        self.0.len() >= prefix.0.len() && self.0[..prefix.0.len()] == prefix.0[..]
    }

    /// The child indices from the root down.
    #[must_use]
    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    /// Rewrites the child index at `level`; used to renumber sibling paths
    /// after inserts and removals.
    pub(crate) fn set_index(&mut self, level: usize, index: usize) {
        if let Some(slot) = self.0.get_mut(level) {
            *slot = index;
        }
    }
}

impl From<&[usize]> for TreePath {
    fn from(indices: &[usize]) -> Self {
        Self(SmallVec::from_slice(indices))
    }
}

impl<const N: usize> From<[usize; N]> for TreePath {
    fn from(indices: [usize; N]) -> Self {
        Self(SmallVec::from_slice(&indices))
    }
}

impl FromIterator<usize> for TreePath {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::TreePath;

    #[test]
    fn root_is_empty_and_parentless() {
        let root = TreePath::root();
        assert!(root.is_root());
        assert_eq!(root.depth(), 0);
        assert_eq!(root.parent(), None);
        assert_eq!(root.last(), None);
    }

    #[test]
    fn child_and_parent_invert() {
        let path = TreePath::root().child(2).child(0);
        assert_eq!(path.as_slice(), &[2, 0]);
        assert_eq!(path.depth(), 2);
        assert_eq!(path.last(), Some(0));
        assert_eq!(path.parent(), Some(TreePath::from([2])));
    }

    #[test]
    fn ordering_is_depth_first_pre_order() {
        // Ancestors sort before descendants, earlier subtrees before later
        // siblings.
        let mut paths = [
            TreePath::from([1]),
            TreePath::from([0, 2]),
            TreePath::root(),
            TreePath::from([0]),
            TreePath::from([0, 2, 1]),
        ];
        paths.sort();
        let order: alloc::vec::Vec<_> = paths.iter().map(TreePath::as_slice).collect();
        assert_eq!(
            order,
            [&[][..], &[0], &[0, 2], &[0, 2, 1], &[1]],
        );
    }

    #[test]
    fn starts_with_covers_self_and_descendants() {
        let a = TreePath::from([1, 3]);
        assert!(a.starts_with(&TreePath::root()));
        assert!(a.starts_with(&TreePath::from([1])));
        assert!(a.starts_with(&a));
        assert!(!a.starts_with(&TreePath::from([1, 3, 0])));
        assert!(!TreePath::from([1, 4]).starts_with(&a));
    }
}
