/*
 * SPDX-FileCopyrightText: 2025 The webrank developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Rank vectors.

use crate::utils::math::is_close;
use kahan::KahanSum;
use std::fmt::{self, Display};
use std::ops::Index;
use webrank::Page;

/// A rank for every page of a graph.
///
/// Ranks are stored densely, indexed by [`Page`]. The vectors returned by the
/// ranking algorithms are stochastic (nonnegative entries summing to one),
/// except for the Monte Carlo estimates, which are stochastic only once the
/// walk is complete.
///
/// Rank vectors are read-only for their consumers: the algorithms replace
/// their vectors as a whole at each iteration.
///
/// The [`Display`] implementation writes `page: rank` pairs separated by
/// commas, honoring the precision of the format string:
///
/// ```
/// use webrank_algo::RankVector;
///
/// let r = RankVector::from(vec![0.25, 0.25, 0.5]);
/// assert_eq!(format!("{r:.2}"), "0: 0.25, 1: 0.25, 2: 0.50");
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RankVector {
    ranks: Box<[f64]>,
}

impl RankVector {
    /// Returns the uniform vector on `n` pages.
    pub fn uniform(n: usize) -> Self {
        Self {
            ranks: vec![1.0 / n as f64; n].into_boxed_slice(),
        }
    }

    /// Returns the number of pages.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    /// Returns whether the vector has no pages.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }

    /// Returns the rank of `page`, or [`None`] if the page is not in the
    /// vector.
    #[inline(always)]
    pub fn get(&self, page: Page) -> Option<f64> {
        self.ranks.get(page).copied()
    }

    /// Returns the ranks as a slice indexed by page.
    #[inline(always)]
    pub fn as_slice(&self) -> &[f64] {
        &self.ranks
    }

    /// Returns an iterator over pairs `(page, rank)` in page order.
    pub fn iter(&self) -> impl Iterator<Item = (Page, f64)> + '_ {
        self.ranks.iter().copied().enumerate()
    }

    /// Returns the sum of the ranks, computed with Kahan summation.
    pub fn sum(&self) -> f64 {
        let mut sum = KahanSum::<f64>::new();
        for &r in self.ranks.iter() {
            sum += r;
        }
        sum.sum()
    }

    /// Returns whether every page of `truth` is present in this vector and
    /// has a rank close to that of `truth` within the relative tolerance
    /// `rel_tol`.
    ///
    /// This is the acceptance test used by the
    /// [convergence harness](crate::harness).
    pub fn is_close_to(&self, truth: &RankVector, rel_tol: f64) -> bool {
        truth.iter().all(|(page, t)| match self.get(page) {
            Some(r) => is_close(r, t, rel_tol),
            None => false,
        })
    }

    /// Returns the maximum absolute difference between the ranks of this
    /// vector and those of `truth`, over the pages of `truth`.
    ///
    /// Pages of `truth` missing from this vector have an infinite difference.
    pub fn l_inf_distance(&self, truth: &RankVector) -> f64 {
        truth
            .iter()
            .map(|(page, t)| match self.get(page) {
                Some(r) => (r - t).abs(),
                None => f64::INFINITY,
            })
            .fold(0.0, f64::max)
    }

    /// Consumes the vector, returning the underlying boxed slice.
    pub fn into_boxed_slice(self) -> Box<[f64]> {
        self.ranks
    }
}

impl From<Vec<f64>> for RankVector {
    fn from(ranks: Vec<f64>) -> Self {
        Self {
            ranks: ranks.into_boxed_slice(),
        }
    }
}

impl From<Box<[f64]>> for RankVector {
    fn from(ranks: Box<[f64]>) -> Self {
        Self { ranks }
    }
}

impl Index<Page> for RankVector {
    type Output = f64;

    #[inline(always)]
    fn index(&self, page: Page) -> &f64 {
        &self.ranks[page]
    }
}

impl Display for RankVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (page, rank) in self.iter() {
            if page != 0 {
                f.write_str(", ")?;
            }
            match f.precision() {
                Some(precision) => write!(f, "{page}: {rank:.precision$}")?,
                None => write!(f, "{page}: {rank}")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform() {
        let r = RankVector::uniform(8);
        assert_eq!(r.len(), 8);
        assert_eq!(r[3], 0.125);
        assert!((r.sum() - 1.0).abs() < 1E-15);
    }

    #[test]
    fn test_close() {
        let truth = RankVector::from(vec![0.5, 0.3, 0.2]);
        let r = RankVector::from(vec![0.504, 0.299, 0.197]);
        assert!(r.is_close_to(&truth, 0.02));
        assert!(!r.is_close_to(&truth, 0.01));
        assert!((r.l_inf_distance(&truth) - 0.004).abs() < 1E-12);
    }

    #[test]
    fn test_missing_pages() {
        let truth = RankVector::from(vec![0.5, 0.5]);
        let r = RankVector::from(vec![0.5]);
        assert!(!r.is_close_to(&truth, 1.0));
        assert_eq!(r.l_inf_distance(&truth), f64::INFINITY);
        // Extra pages of the estimate are ignored
        let r = RankVector::from(vec![0.5, 0.5, 0.0]);
        assert!(r.is_close_to(&truth, 0.0));
        assert_eq!(r.l_inf_distance(&truth), 0.0);
    }

    #[test]
    fn test_display() {
        let r = RankVector::from(vec![0.5, 0.25]);
        assert_eq!(r.to_string(), "0: 0.5, 1: 0.25");
        assert_eq!(format!("{r:.3}"), "0: 0.500, 1: 0.250");
    }
}
