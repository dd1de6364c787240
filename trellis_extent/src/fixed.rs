// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A strip where every item shares one configured extent.

use crate::{Extents, Scalar};

/// An [`Extents`] strip with a uniform per-item extent.
///
/// This is the "fixed cell height/width" override used by list and tree
/// layouts: no measurer is consulted, and all queries are O(1) arithmetic.
#[derive(Debug, Clone, Copy)]
pub struct FixedExtents<S: Scalar> {
    len: usize,
    extent: S,
}

impl<S: Scalar> FixedExtents<S> {
    /// Creates a strip of `len` items of uniform `extent`.
    #[must_use]
    pub fn new(len: usize, extent: S) -> Self {
        Self {
            len,
            // Finite negatives clamp to zero. NaNs are preserved here;
            // `set_extent` debug-asserts and callers are expected to avoid them.
            extent: if extent.is_sign_negative() {
                S::zero()
            } else {
                extent
            },
        }
    }

    /// Sets the number of items in the strip.
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
    }

    /// Sets the uniform extent for all items.
    pub fn set_extent(&mut self, extent: S) {
        debug_assert!(
            extent.is_finite(),
            "FixedExtents extents must be finite; got {extent:?}"
        );
        self.extent = if extent.is_sign_negative() {
            S::zero()
        } else {
            extent
        };
    }

    /// Returns the uniform extent.
    #[must_use]
    pub const fn uniform_extent(&self) -> S {
        self.extent
    }
}

impl<S: Scalar> Extents for FixedExtents<S> {
    type Scalar = S;

    fn len(&self) -> usize {
        self.len
    }

    fn extent(&mut self, index: usize) -> S {
        if index < self.len { self.extent } else { S::zero() }
    }

    fn start(&mut self, index: usize) -> S {
        S::from_usize(index.min(self.len)) * self.extent
    }

    fn total(&mut self) -> S {
        S::from_usize(self.len) * self.extent
    }

    fn find(&mut self, offset: S) -> usize {
        if self.len == 0 || self.extent <= S::zero() {
            return 0;
        }
        let ratio = offset / self.extent;
        let i = ratio.floor_to_isize();
        #[allow(
            clippy::cast_sign_loss,
            reason = "Index is clamped non-negative before the cast"
        )]
        let clamped = i.clamp(0, self.len as isize - 1) as usize;
        clamped
    }
}
