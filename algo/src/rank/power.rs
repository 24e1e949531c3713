/*
 * SPDX-FileCopyrightText: 2025 The webrank developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! PageRank by powers of the transition matrix.
//!
//! Since the [transition matrix](crate::matrix) *M* is column-stochastic and
//! primitive, *M*ᵖ converges to the matrix whose columns are all equal to the
//! stationary distribution; thus, every column of *M*ᵖ approximates PageRank
//! for large *p*. We read the first one.

use crate::RankVector;
use crate::harness::{Convergence, ConvergenceFailure, Harness, Iterative};
use crate::matrix::TransitionMatrix;
use nalgebra::{DMatrix, DVector};

/// Returns the first column of *M*ᵖ, computed by binary exponentiation.
///
/// No convergence check is performed. Note that for `p` = 0 the result is the
/// first column of the identity.
pub fn fixed_power(matrix: &TransitionMatrix, p: u32) -> RankVector {
    let m = matrix.matrix();
    let n = m.nrows();
    if n == 0 {
        return RankVector::default();
    }

    let mut result = DMatrix::<f64>::identity(n, n);
    let mut base = m.clone();
    let mut p = p;
    while p != 0 {
        if p & 1 != 0 {
            result = &result * &base;
        }
        p >>= 1;
        if p != 0 {
            base = &base * &base;
        }
    }

    matrix.column_rank(&result, 0)
}

/// An [`Iterative`] engine computing the successive powers *M*², *M*³, … of
/// a transition matrix.
///
/// Only the first column of the running power is kept, as it is the only
/// part of the product that is ever read: each step is thus a
/// matrix-vector product.
#[derive(Debug, Clone)]
pub struct PowerIteration<'a> {
    matrix: &'a TransitionMatrix,
    column: DVector<f64>,
    exponent: usize,
}

impl<'a> PowerIteration<'a> {
    /// Creates an engine whose running power is *M*.
    pub fn new(matrix: &'a TransitionMatrix) -> Self {
        let m = matrix.matrix();
        let column = if m.ncols() == 0 {
            DVector::zeros(0)
        } else {
            m.column(0).into_owned()
        };
        Self {
            matrix,
            column,
            exponent: 1,
        }
    }

    /// Returns the exponent of the running power.
    pub fn exponent(&self) -> usize {
        self.exponent
    }
}

impl Iterative for PowerIteration<'_> {
    fn step(&mut self) {
        self.column = self.matrix.matrix() * &self.column;
        self.exponent += 1;
    }

    fn estimate(&self) -> RankVector {
        self.matrix.to_rank_vector(self.column.iter().copied())
    }
}

/// Multiplies the running power by *M* until its first column is accepted by
/// a [`Harness`] with the given tolerance and maximum number of iterations.
pub fn iterate_to_convergence(
    matrix: &TransitionMatrix,
    ground_truth: &RankVector,
    tolerance: f64,
    max_iterations: usize,
) -> Result<Convergence, ConvergenceFailure> {
    Harness::new(ground_truth)
        .tolerance(tolerance)
        .max_iterations(max_iterations)
        .run(PowerIteration::new(matrix), ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::{PageOrder, build};
    use webrank::graphs::Graph;

    #[test]
    fn test_small_powers() {
        let g = Graph::from_succs([vec![1], vec![2], vec![0, 1]]);
        let m = build(&g, PageOrder::identity(3), 0.85);

        let identity = fixed_power(&m, 0);
        assert_eq!(identity.as_slice(), &[1.0, 0.0, 0.0]);

        let first = fixed_power(&m, 1);
        for i in 0..3 {
            assert_eq!(first[i], m.matrix()[(i, 0)]);
        }

        let cubed = m.matrix() * m.matrix() * m.matrix();
        let third = fixed_power(&m, 3);
        for i in 0..3 {
            assert!((third[i] - cubed[(i, 0)]).abs() < 1E-15);
        }
    }

    #[test]
    fn test_engine_matches_fixed_power() {
        let g = Graph::from_succs([vec![1, 2], vec![2], vec![]]);
        let m = build(&g, PageOrder::try_from(vec![2, 0, 1]).unwrap(), 0.85);
        let mut engine = PowerIteration::new(&m);
        assert_eq!(engine.estimate(), fixed_power(&m, 1));
        for p in 2..10 {
            engine.step();
            assert_eq!(engine.exponent(), p);
            let expected = fixed_power(&m, p as u32);
            assert!(engine.estimate().l_inf_distance(&expected) < 1E-12);
        }
    }

    #[test]
    fn test_empty() {
        let m = build(&Graph::empty(0), PageOrder::identity(0), 0.85);
        assert!(fixed_power(&m, 5).is_empty());
        let mut engine = PowerIteration::new(&m);
        engine.step();
        assert!(engine.estimate().is_empty());
    }
}
