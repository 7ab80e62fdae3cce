// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! # Tolerances
//!
//! The LP relaxation works in floating point while the squad model is
//! integral. `Tolerance` bundles the absolute slack used for every
//! comparison between the two worlds: integrality of a relaxed value,
//! incumbent improvement, and bound pruning.

use num_traits::Float;

/// Absolute tolerance used for integrality and objective comparisons.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tolerance<F> {
    eps: F,
}

impl<F> Tolerance<F>
where
    F: Float,
{
    /// Creates a new tolerance. Negative or non-finite values collapse to zero.
    #[inline]
    pub fn new(eps: F) -> Self {
        if eps.is_finite() && eps > F::zero() {
            Self { eps }
        } else {
            Self { eps: F::zero() }
        }
    }

    #[inline(always)]
    pub fn value(&self) -> F {
        self.eps
    }

    /// Returns the distance of `x` to the nearest integer.
    #[inline]
    pub fn fractionality(&self, x: F) -> F {
        (x - x.round()).abs()
    }

    /// Returns `true` if `x` lies within tolerance of an integer.
    #[inline]
    pub fn is_integral(&self, x: F) -> bool {
        self.fractionality(x) <= self.eps
    }

    /// Returns `true` if `a` and `b` are equal within tolerance.
    #[inline]
    pub fn approx_eq(&self, a: F, b: F) -> bool {
        (a - b).abs() <= self.eps
    }

    /// Returns `true` if `a` exceeds `b` by more than the tolerance.
    #[inline]
    pub fn strictly_greater(&self, a: F, b: F) -> bool {
        a > b + self.eps
    }

    /// Returns `true` if `a` falls short of `b` by more than the tolerance.
    #[inline]
    pub fn strictly_less(&self, a: F, b: F) -> bool {
        a < b - self.eps
    }
}

impl Default for Tolerance<f64> {
    fn default() -> Self {
        Self::new(1e-6)
    }
}
