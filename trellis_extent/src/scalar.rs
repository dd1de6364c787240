// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scalar abstraction over `f32`/`f64` for extents and offsets.

use core::fmt::Debug;
use core::ops::{Add, Div, Mul, Sub};

/// Scalar type used for extents, offsets, and sizes.
///
/// Implemented for `f32` and `f64`. The operations here are the minimal set
/// the extent caches need without pulling in `std` or `libm`: flooring is
/// expressed as a cast-based truncation toward negative infinity so it works
/// in `no_std` builds.
pub trait Scalar:
    Copy
    + Debug
    + PartialOrd
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
{
    /// The additive identity.
    fn zero() -> Self;

    /// Converts a count into a scalar.
    ///
    /// Lossy for counts beyond the mantissa range, which is acceptable for
    /// layout geometry.
    fn from_usize(n: usize) -> Self;

    /// Returns `true` if this value is neither infinite nor NaN.
    fn is_finite(self) -> bool;

    /// Returns `true` if this value has a negative sign, including `-0.0`.
    fn is_sign_negative(self) -> bool;

    /// Returns the greater of two values, ignoring NaN ordering subtleties.
    fn max(self, other: Self) -> Self;

    /// Returns the lesser of two values, ignoring NaN ordering subtleties.
    fn min(self, other: Self) -> Self;

    /// Rounds toward negative infinity and converts to `isize`.
    ///
    /// Out-of-range values saturate.
    fn floor_to_isize(self) -> isize;
}

macro_rules! impl_scalar {
    ($t:ty) => {
        impl Scalar for $t {
            #[inline]
            fn zero() -> Self {
                0.0
            }

            #[allow(
                clippy::cast_precision_loss,
                reason = "Item counts are far below the mantissa limit in practice"
            )]
            #[inline]
            fn from_usize(n: usize) -> Self {
                n as $t
            }

            #[inline]
            fn is_finite(self) -> bool {
                <$t>::is_finite(self)
            }

            #[inline]
            fn is_sign_negative(self) -> bool {
                <$t>::is_sign_negative(self)
            }

            #[inline]
            fn max(self, other: Self) -> Self {
                if other > self { other } else { self }
            }

            #[inline]
            fn min(self, other: Self) -> Self {
                if other < self { other } else { self }
            }

            #[allow(
                clippy::cast_possible_truncation,
                reason = "Truncation is the point; callers clamp the result to bounds"
            )]
            #[inline]
            fn floor_to_isize(self) -> isize {
                let truncated = self as isize;
                // The cast truncates toward zero; shift negatives with a
                // fractional part down one.
                if self < 0.0 && (truncated as $t) > self {
                    truncated.saturating_sub(1)
                } else {
                    truncated
                }
            }
        }
    };
}

impl_scalar!(f32);
impl_scalar!(f64);
