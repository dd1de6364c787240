// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A strip of individually measured extents over a lazy prefix-sum cache.

use alloc::vec::Vec;

use crate::{Extents, Scalar};

/// An [`Extents`] strip backed by per-item measured extents and a lazily
/// maintained prefix-sum cache.
///
/// This is the memoization layer that keeps variable-size layouts from
/// degrading to O(n²) across repeated queries: start offsets are prefix sums,
/// rebuilt only from the lowest index whose extent changed ("suffix
/// invalidation"). Items before that index keep their cached offsets
/// byte-for-byte.
///
/// Host engines feed extents in from their item measurer, one call per item
/// per invalidation cycle, via [`MeasuredExtents::refill`],
/// [`MeasuredExtents::set_extent`], or [`MeasuredExtents::splice`].
#[derive(Clone, Default, Debug)]
pub struct MeasuredExtents<S: Scalar> {
    extents: Vec<S>,
    starts: Vec<S>,
    dirty_from: Option<usize>,
}

impl<S: Scalar> MeasuredExtents<S> {
    /// Creates an empty strip.
    #[must_use]
    pub fn new() -> Self {
        Self {
            extents: Vec::new(),
            starts: Vec::new(),
            dirty_from: Some(0),
        }
    }

    /// Discards all items and re-measures `len` of them with `measure`.
    ///
    /// Non-finite results are debug-asserted; finite negatives clamp to zero.
    pub fn refill(&mut self, len: usize, mut measure: impl FnMut(usize) -> S) {
        self.extents.clear();
        self.extents.reserve(len);
        for i in 0..len {
            self.extents.push(sanitize(measure(i)));
        }
        self.starts.resize(len, S::zero());
        self.dirty_from = Some(0);
    }

    /// Ensures storage for `len` items. Newly added items have extent zero.
    pub fn set_len(&mut self, len: usize) {
        let old = self.extents.len();
        self.extents.resize(len, S::zero());
        self.starts.resize(len, S::zero());
        self.mark_dirty(old.min(len));
    }

    /// Updates one item's extent, invalidating cached starts from `index` on.
    pub fn set_extent(&mut self, index: usize, extent: S) {
        if index >= self.extents.len() {
            self.set_len(index + 1);
        }
        self.extents[index] = sanitize(extent);
        self.mark_dirty(index);
    }

    /// Removes `remove` items at `at` and inserts `replacement` in their place.
    ///
    /// This is the structural-update primitive for row caches: inserting or
    /// removing a contiguous span of rows shifts the suffix and invalidates
    /// cached starts from `at` on, leaving everything before `at` untouched.
    /// `at` and `remove` are clamped to the current length.
    pub fn splice<I>(&mut self, at: usize, remove: usize, replacement: I)
    where
        I: IntoIterator<Item = S>,
    {
        let at = at.min(self.extents.len());
        let end = at.saturating_add(remove).min(self.extents.len());
        self.extents
            .splice(at..end, replacement.into_iter().map(sanitize));
        self.starts.resize(self.extents.len(), S::zero());
        self.mark_dirty(at);
    }

    fn mark_dirty(&mut self, from: usize) {
        self.dirty_from = Some(self.dirty_from.map_or(from, |d| d.min(from)));
    }

    fn ensure_through(&mut self, through: usize) {
        let len = self.extents.len();
        if len == 0 {
            self.dirty_from = None;
            return;
        }
        let Some(dirty) = self.dirty_from else {
            return;
        };
        if dirty > through.min(len - 1) {
            return;
        }

        let mut pos = if dirty == 0 {
            S::zero()
        } else {
            self.starts[dirty - 1] + self.extents[dirty - 1]
        };
        for i in dirty..len {
            self.starts[i] = pos;
            pos = pos + self.extents[i];
        }
        self.dirty_from = None;
    }
}

fn sanitize<S: Scalar>(extent: S) -> S {
    debug_assert!(
        extent.is_finite(),
        "MeasuredExtents extents must be finite; got {extent:?}"
    );
    if extent.is_sign_negative() {
        S::zero()
    } else {
        extent
    }
}

impl<S: Scalar> Extents for MeasuredExtents<S> {
    type Scalar = S;

    fn len(&self) -> usize {
        self.extents.len()
    }

    fn extent(&mut self, index: usize) -> S {
        self.extents.get(index).copied().unwrap_or_else(S::zero)
    }

    fn start(&mut self, index: usize) -> S {
        if index == 0 || self.extents.is_empty() {
            return S::zero();
        }
        let i = index.min(self.extents.len() - 1);
        self.ensure_through(i);
        let base = self.starts[i];
        if index > i {
            // One past the end resolves to the total.
            base + self.extents[i]
        } else {
            base
        }
    }

    fn total(&mut self) -> S {
        let len = self.extents.len();
        if len == 0 {
            return S::zero();
        }
        self.ensure_through(len - 1);
        self.starts[len - 1] + self.extents[len - 1]
    }

    fn find(&mut self, offset: S) -> usize {
        let len = self.extents.len();
        if len == 0 {
            return 0;
        }
        self.ensure_through(len - 1);

        let target = offset.max(S::zero());
        match self.starts.binary_search_by(|start| {
            start
                .partial_cmp(&target)
                .unwrap_or(core::cmp::Ordering::Equal)
        }) {
            Ok(i) => i,
            Err(i) => i.saturating_sub(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Extents, MeasuredExtents};

    #[test]
    fn starts_follow_extents() {
        let mut strip = MeasuredExtents::<f64>::new();
        strip.refill(3, |i| 10.0 * (i + 1) as f64);

        assert_eq!(strip.len(), 3);
        assert_eq!(strip.start(0), 0.0);
        assert_eq!(strip.start(1), 10.0);
        assert_eq!(strip.start(2), 30.0);
        assert_eq!(strip.total(), 60.0);
    }

    #[test]
    fn find_uses_binary_search_over_starts() {
        let mut strip = MeasuredExtents::<f32>::new();
        strip.refill(4, |_| 10.0);

        assert_eq!(strip.find(0.0), 0);
        assert_eq!(strip.find(9.0), 0);
        assert_eq!(strip.find(10.0), 1);
        assert_eq!(strip.find(35.0), 3);
        assert_eq!(strip.find(1000.0), 3);
    }

    #[test]
    fn set_extent_only_invalidates_suffix() {
        let mut strip = MeasuredExtents::<f64>::new();
        strip.refill(4, |_| 10.0);
        // Warm the cache.
        let before = strip.start(1);
        strip.set_extent(2, 25.0);
        // Starts before the change are untouched; after it they shift.
        assert_eq!(strip.start(1), before);
        assert_eq!(strip.start(3), 45.0);
        assert_eq!(strip.total(), 55.0);
    }

    #[test]
    fn splice_inserts_and_removes_spans() {
        let mut strip = MeasuredExtents::<f64>::new();
        strip.refill(4, |_| 10.0);

        // Replace item 1 with two 5.0 items: [10, 5, 5, 10, 10].
        strip.splice(1, 1, [5.0, 5.0]);
        assert_eq!(strip.len(), 5);
        assert_eq!(strip.start(3), 20.0);
        assert_eq!(strip.total(), 40.0);

        // Remove the two inserted items again.
        strip.splice(1, 2, core::iter::empty());
        assert_eq!(strip.len(), 3);
        assert_eq!(strip.total(), 30.0);
    }

    #[test]
    fn negative_extents_clamp_to_zero() {
        let mut strip = MeasuredExtents::<f32>::new();
        strip.set_extent(0, -3.0);
        assert_eq!(strip.extent(0), 0.0);
    }

    #[test]
    fn empty_strip_answers_degenerately() {
        let mut strip = MeasuredExtents::<f64>::new();
        assert_eq!(strip.total(), 0.0);
        assert_eq!(strip.start(5), 0.0);
        assert_eq!(strip.find(12.0), 0);
    }
}
