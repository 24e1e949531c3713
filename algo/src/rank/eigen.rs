/*
 * SPDX-FileCopyrightText: 2025 The webrank developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Exact PageRank as the dominant eigenvector of the transition matrix.
//!
//! PageRank is the stationary distribution of the
//! [transition matrix](crate::matrix) *M*, that is, the eigenvector of
//! eigenvalue 1, normalized so that its components sum to one. The
//! eigenvalues of *M* are computed through a real Schur decomposition; since
//! *M* is not symmetric, some of them are complex, and the eigenvalue 1 is
//! identified up to a relative tolerance on the real part and an absolute
//! tolerance on the imaginary part (both configurable, as numerically
//! marginal graphs might need looser tolerances).
//!
//! The eigenvector is then the null vector of *M* − λ*I*, obtained as the
//! right singular vector associated with the smallest singular value. It is
//! real by construction.
//!
//! The result is exact up to floating-point error, and it is the ground truth
//! against which the [convergence harness](crate::harness) measures the
//! approximate methods.

use crate::RankVector;
use crate::matrix::{PageOrder, TransitionMatrix, build};
use crate::utils::math::{argmin, argmin_by_key, is_close};
use kahan::KahanSum;
use nalgebra::{Complex, DMatrix};
use thiserror::Error;
use webrank::graphs::RandomAccessGraph;

/// The transition matrix has no stationary distribution that can be
/// computed reliably.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NoStationaryDistribution {
    /// No eigenvalue is close enough to 1.
    #[error("No eigenvalue close to 1 (the closest one is {closest})")]
    NoUnitEigenvalue { closest: Complex<f64> },
    /// The eigenvector of eigenvalue 1 cannot be normalized.
    #[error("The eigenvector of eigenvalue {eigenvalue} has vanishing sum {sum}")]
    VanishingSum { eigenvalue: f64, sum: f64 },
}

/// Computes PageRank through an eigen-decomposition of the transition
/// matrix.
///
/// # Examples
///
/// ```
/// use webrank::graphs::Graph;
/// use webrank_algo::matrix::{self, PageOrder};
/// use webrank_algo::rank::EigenSolver;
///
/// let g = Graph::from_succs([vec![1, 3], vec![0], vec![0], vec![0]]);
/// let m = matrix::build(&g, PageOrder::identity(4), 0.85);
/// let rank = EigenSolver::new().rank(&m)?;
///
/// assert!((rank.sum() - 1.0).abs() < 1E-9);
/// assert!(rank[0] > rank[1]);
/// # Ok::<(), webrank_algo::rank::eigen::NoStationaryDistribution>(())
/// ```
#[derive(Debug, Clone)]
pub struct EigenSolver {
    real_tolerance: f64,
    imag_tolerance: f64,
}

impl Default for EigenSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl EigenSolver {
    /// The default relative tolerance on the real part of the eigenvalue.
    pub const DEFAULT_REAL_TOLERANCE: f64 = 1E-9;
    /// The default absolute tolerance on the imaginary part of the eigenvalue.
    pub const DEFAULT_IMAG_TOLERANCE: f64 = 1E-9;

    /// Creates a solver with the default tolerances.
    pub fn new() -> Self {
        Self {
            real_tolerance: Self::DEFAULT_REAL_TOLERANCE,
            imag_tolerance: Self::DEFAULT_IMAG_TOLERANCE,
        }
    }

    /// Sets the relative tolerance on the real part of the eigenvalue.
    ///
    /// # Panics
    ///
    /// Panics if the tolerance is negative or NaN.
    pub fn real_tolerance(&mut self, tolerance: f64) -> &mut Self {
        assert!(tolerance >= 0.0, "The tolerance must be nonnegative, got {tolerance}");
        self.real_tolerance = tolerance;
        self
    }

    /// Sets the absolute tolerance on the imaginary part of the eigenvalue.
    ///
    /// # Panics
    ///
    /// Panics if the tolerance is negative or NaN.
    pub fn imag_tolerance(&mut self, tolerance: f64) -> &mut Self {
        assert!(tolerance >= 0.0, "The tolerance must be nonnegative, got {tolerance}");
        self.imag_tolerance = tolerance;
        self
    }

    /// Returns whether an eigenvalue is accepted as 1.
    fn is_unit(&self, lambda: &Complex<f64>) -> bool {
        is_close(lambda.re, 1.0, self.real_tolerance) && lambda.im.abs() <= self.imag_tolerance
    }

    /// Returns the stationary distribution of a transition matrix.
    pub fn rank(&self, matrix: &TransitionMatrix) -> Result<RankVector, NoStationaryDistribution> {
        let m = matrix.matrix();
        let n = m.nrows();
        if n == 0 {
            return Ok(RankVector::default());
        }

        let eigenvalues = m.complex_eigenvalues();
        let eigenvalue = match eigenvalues.iter().find(|lambda| self.is_unit(lambda)) {
            Some(lambda) => lambda.re,
            None => {
                let one = Complex::new(1.0, 0.0);
                let closest = argmin_by_key(eigenvalues.iter(), |lambda| (**lambda - one).norm())
                    .map(|i| eigenvalues[i])
                    .unwrap_or_default();
                log::warn!("No eigenvalue close to 1: the closest one is {closest}");
                return Err(NoStationaryDistribution::NoUnitEigenvalue { closest });
            }
        };
        log::debug!("Eigenvalue selected: {eigenvalue}");

        let shifted = m - DMatrix::<f64>::identity(n, n) * eigenvalue;
        let svd = shifted.svd(false, true);
        // The singular values of a nonempty matrix are never all NaN, but
        // we do not want to panic on pathological input
        let (Some(v_t), Some(i)) = (svd.v_t, argmin(svd.singular_values.iter().copied())) else {
            return Err(NoStationaryDistribution::VanishingSum {
                eigenvalue,
                sum: f64::NAN,
            });
        };
        let eigenvector = v_t.row(i);

        let mut sum = KahanSum::<f64>::new();
        for &x in eigenvector.iter() {
            sum += x;
        }
        let sum = sum.sum();
        if sum.is_nan() || sum.abs() <= f64::EPSILON {
            return Err(NoStationaryDistribution::VanishingSum { eigenvalue, sum });
        }

        Ok(matrix.to_rank_vector(eigenvector.iter().map(|&x| x / sum)))
    }
}

/// Returns the PageRank of a graph with damping factor `damping`, computed
/// by an [`EigenSolver`] with default tolerances.
///
/// # Panics
///
/// Panics if `damping` is not in the interval (0 . . 1).
pub fn eigenvector_pagerank<G: RandomAccessGraph>(
    graph: &G,
    damping: f64,
) -> Result<RankVector, NoStationaryDistribution> {
    let matrix = build(graph, PageOrder::identity(graph.num_nodes()), damping);
    EigenSolver::new().rank(&matrix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use webrank::graphs::Graph;

    #[test]
    fn test_cycle() -> Result<(), NoStationaryDistribution> {
        // A directed cycle has the uniform distribution as PageRank
        let g = Graph::from_succs([vec![1], vec![2], vec![3], vec![4], vec![0]]);
        let rank = eigenvector_pagerank(&g, 0.85)?;
        for (_, r) in rank.iter() {
            assert!((r - 0.2).abs() < 1E-12, "{rank}");
        }
        Ok(())
    }

    #[test]
    fn test_single_page() -> Result<(), NoStationaryDistribution> {
        let rank = eigenvector_pagerank(&Graph::empty(1), 0.5)?;
        assert!((rank[0] - 1.0).abs() < 1E-12);
        Ok(())
    }

    #[test]
    fn test_empty() -> Result<(), NoStationaryDistribution> {
        assert!(eigenvector_pagerank(&Graph::empty(0), 0.85)?.is_empty());
        Ok(())
    }

    #[test]
    fn test_no_unit_eigenvalue() {
        // Scaling a stochastic matrix scales its spectrum
        let g = Graph::from_succs([vec![1], vec![0]]);
        let m = build(&g, PageOrder::identity(2), 0.85).scaled(0.9);
        match EigenSolver::new().rank(&m) {
            Err(NoStationaryDistribution::NoUnitEigenvalue { closest }) => {
                assert!((closest.re - 0.9).abs() < 1E-9, "{closest}");
            }
            other => panic!("Unexpected result {other:?}"),
        }
        // A looser tolerance accepts 0.9 as 1
        let mut solver = EigenSolver::new();
        solver.real_tolerance(0.2);
        let rank = solver.rank(&m).unwrap();
        assert!((rank.sum() - 1.0).abs() < 1E-12);
    }
}
