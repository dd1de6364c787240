// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Damage summaries returned from mutations.

use alloc::vec::Vec;

use kurbo::Rect;

/// Regions invalidated by a mutation, in widget coordinates.
///
/// The engine never calls back into the owning widget; expand/collapse and
/// structural events instead return the rectangles that need repainting and
/// the caller decides whether and how to schedule it.
#[derive(Clone, Debug, Default)]
pub struct Damage {
    /// Rectangles that should be repainted.
    pub dirty_rects: Vec<Rect>,
}

impl Damage {
    /// Damage covering nothing.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            dirty_rects: Vec::new(),
        }
    }

    /// Returns `true` if nothing needs repainting.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dirty_rects.is_empty()
    }

    /// Returns the union of all damage rects.
    #[must_use]
    pub fn union_rect(&self) -> Option<Rect> {
        let mut it = self.dirty_rects.iter().copied();
        let first = it.next()?;
        Some(it.fold(first, |acc, r| acc.union(r)))
    }
}
