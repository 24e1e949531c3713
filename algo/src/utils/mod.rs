/*
 * SPDX-FileCopyrightText: 2025 The webrank developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Utilities.

mod argmin;
mod stopwatch;

pub use stopwatch::Stopwatch;

/// Module containing mathematical utilities.
pub mod math {
    pub use super::argmin::*;

    /// Returns whether `a` and `b` are close within a relative tolerance.
    ///
    /// This is the classical test
    ///
    /// > |*a* − *b*| ≤ `rel_tol` · max(|*a*|, |*b*|),
    ///
    /// so two zeros are always close, but zero is close to no other value.
    #[inline(always)]
    pub fn is_close(a: f64, b: f64, rel_tol: f64) -> bool {
        a == b || (a - b).abs() <= rel_tol * a.abs().max(b.abs())
    }

    /// Returns the 𝓁_∞ distance (maximum absolute difference) between two
    /// slices of the same length.
    ///
    /// # Panics
    ///
    /// Panics if the slices have different lengths.
    pub fn l_inf_distance(a: &[f64], b: &[f64]) -> f64 {
        assert_eq!(a.len(), b.len());
        a.iter()
            .zip(b.iter())
            .map(|(x, y)| (x - y).abs())
            .fold(0.0, f64::max)
    }
}
