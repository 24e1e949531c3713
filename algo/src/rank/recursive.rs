/*
 * SPDX-FileCopyrightText: 2025 The webrank developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Recursive (Jacobi) PageRank.
//!
//! PageRank is the solution of the system
//!
//! > *rₚ* = (1 − *d*) / *N* + *d* ∑_(*q* → *p*) *r_q* / outdegree(*q*)
//!
//! on the [effective graph](webrank::graphs::EffectiveGraph), where *d* is
//! the damping factor and *N* the number of pages. This implementation solves
//! the system by iterating the equation, starting from the uniform vector.
//!
//! The update is _synchronous_: every new rank is computed from the ranks of
//! the previous iteration, which are replaced as a whole only when all new
//! ranks are available. This is the Jacobi method, as opposed to
//! Gauss–Seidel updates, which use new ranks as soon as they are computed.
//!
//! The predecessors of each page and the inverses of the outdegrees are read
//! from an [`InboundIndex`] built once by the [constructor](RecursiveUpdate::new).
//!
//! # Stopping Criteria
//!
//! The [`run`](RecursiveUpdate::run) method accepts a composable
//! [`Predicate`] that is evaluated after each iteration. The predicate
//! receives the current iteration number and the _maximum increment_, that
//! is, the largest absolute difference between the new and the old rank of a
//! page.
//!
//! Alternatively, a [`RecursiveUpdate`] is an [`Iterative`] engine, and can be
//! driven by a [`Harness`] toward a ground truth.

pub mod preds {
    //! Stopping conditions for [`RecursiveUpdate::run`](super::RecursiveUpdate::run).
    //!
    //! A condition is a [`Predicate`] over [`PredParams`] that becomes true
    //! when the updates should stop. It is checked once before the first
    //! update and then after every update. Conditions compose with the `and`
    //! and `or` combinators of
    //! [`PredicateBooleanExt`](predicates::prelude::PredicateBooleanExt):
    //!
    //! ```
    //! use predicates::prelude::*;
    //! use webrank_algo::rank::recursive::preds::{MaxIncrement, MaxIter};
    //!
    //! let stop = MaxIncrement::try_from(1E-7)?.or(MaxIter::from(200));
    //! # Ok::<(), anyhow::Error>(())
    //! ```

    use anyhow::ensure;
    use predicates::{Predicate, reflection::PredicateReflection};
    use std::fmt::{self, Display};

    /// The state of the computation seen by a stopping condition.
    ///
    /// Before the first update `iteration` is zero and `max_increment` is
    /// infinite.
    #[derive(Debug, Clone, Copy)]
    pub struct PredParams {
        /// The number of updates performed.
        pub iteration: usize,
        /// The largest change of a rank in the last update.
        pub max_increment: f64,
    }

    /// True once a given number of updates has been performed.
    #[derive(Debug, Clone)]
    pub struct MaxIter {
        max_iter: usize,
    }

    impl MaxIter {
        pub const DEFAULT_MAX_ITER: usize = 200;
    }

    impl From<usize> for MaxIter {
        fn from(max_iter: usize) -> Self {
            Self { max_iter }
        }
    }

    impl Default for MaxIter {
        fn default() -> Self {
            Self::from(Self::DEFAULT_MAX_ITER)
        }
    }

    impl Display for MaxIter {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "at most {} updates", self.max_iter)
        }
    }

    impl PredicateReflection for MaxIter {}

    impl Predicate<PredParams> for MaxIter {
        fn eval(&self, params: &PredParams) -> bool {
            params.iteration >= self.max_iter
        }
    }

    /// True once no rank changed by `threshold` or more in the last update.
    #[derive(Debug, Clone)]
    pub struct MaxIncrement {
        threshold: f64,
    }

    impl MaxIncrement {
        pub const DEFAULT_THRESHOLD: f64 = 1E-7;
    }

    impl TryFrom<f64> for MaxIncrement {
        type Error = anyhow::Error;

        /// Fails unless `threshold` is positive.
        fn try_from(threshold: f64) -> anyhow::Result<Self> {
            ensure!(
                threshold > 0.0,
                "The increment threshold must be positive, got {threshold}"
            );
            Ok(Self { threshold })
        }
    }

    impl Default for MaxIncrement {
        fn default() -> Self {
            Self {
                threshold: Self::DEFAULT_THRESHOLD,
            }
        }
    }

    impl Display for MaxIncrement {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "every increment below {}", self.threshold)
        }
    }

    impl PredicateReflection for MaxIncrement {}

    impl Predicate<PredParams> for MaxIncrement {
        fn eval(&self, params: &PredParams) -> bool {
            params.max_increment < self.threshold
        }
    }
}

use crate::RankVector;
use crate::harness::{Convergence, ConvergenceFailure, Harness, Iterative};
use dsi_progress_logger::prelude::*;
use kahan::KahanSum;
use predicates::prelude::*;
use webrank::graphs::{InboundIndex, RandomAccessGraph, effective};

/// The default maximum number of iterations of [`recursive_pagerank`].
pub const DEFAULT_MAX_ITERATIONS: usize = preds::MaxIter::DEFAULT_MAX_ITER;

/// Computes PageRank by synchronous recursive updates.
///
/// The struct is configured via setters and then executed via
/// [`run`](Self::run), or driven step by step by a [`Harness`]. The rank
/// vector is available via the [`rank`](Self::rank) method.
///
/// # Examples
///
/// ```
/// use webrank::graphs::Graph;
/// use webrank_algo::rank::recursive::{RecursiveUpdate, preds};
///
/// let g = Graph::from_succs([vec![1, 3], vec![0], vec![0], vec![0]]);
///
/// let mut pr = RecursiveUpdate::new(&g);
/// pr.damping(0.5);
/// pr.run(preds::MaxIncrement::try_from(1E-9)?);
///
/// assert!((pr.rank().iter().sum::<f64>() - 1.0).abs() < 1E-9);
/// assert!(pr.rank()[0] > pr.rank()[1]);
/// # Ok::<(), anyhow::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct RecursiveUpdate {
    inbound: InboundIndex,
    damping: f64,
    max_increment: f64,

    rank: Box<[f64]>,
    next: Box<[f64]>,
    increments: Box<[f64]>,
    iteration: usize,
}

impl RecursiveUpdate {
    /// The default damping factor.
    pub const DEFAULT_DAMPING: f64 = 0.85;

    /// Creates a new computation on a graph, with the rank vector set to
    /// the uniform vector.
    ///
    /// Sinks are resolved and the [`InboundIndex`] is built here, once.
    pub fn new<G: RandomAccessGraph>(graph: &G) -> Self {
        let n = graph.num_nodes();
        Self {
            inbound: InboundIndex::new(&effective(graph)),
            damping: Self::DEFAULT_DAMPING,
            max_increment: f64::INFINITY,
            rank: RankVector::uniform(n).into_boxed_slice(),
            next: vec![0.0; n].into_boxed_slice(),
            increments: vec![0.0; n].into_boxed_slice(),
            iteration: 0,
        }
    }

    /// Sets the damping factor.
    ///
    /// # Panics
    ///
    /// Panics if `damping` is not in the interval (0 . . 1).
    pub fn damping(&mut self, damping: f64) -> &mut Self {
        assert!(
            damping > 0.0 && damping < 1.0,
            "The damping factor must be in (0 . . 1), got {damping}"
        );
        self.damping = damping;
        self
    }

    /// Returns the rank vector.
    pub fn rank(&self) -> &[f64] {
        &self.rank
    }

    /// Returns the absolute change of the rank of every page in the last
    /// iteration.
    pub fn increments(&self) -> &[f64] {
        &self.increments
    }

    /// Returns the largest increment of the last iteration, or infinity if
    /// no iteration has been performed.
    pub fn max_increment(&self) -> f64 {
        self.max_increment
    }

    /// Returns the number of iterations performed.
    pub fn iterations(&self) -> usize {
        self.iteration
    }

    /// Sets the rank vector back to the uniform vector.
    pub fn reset(&mut self) {
        self.rank.fill(1.0 / self.rank.len() as f64);
        self.increments.fill(0.0);
        self.max_increment = f64::INFINITY;
        self.iteration = 0;
    }

    /// Performs one synchronous update of all ranks.
    pub fn step(&mut self) {
        let n = self.rank.len();
        if n == 0 {
            return;
        }
        let teleport = (1.0 - self.damping) / n as f64;
        let mut max_increment = 0.0_f64;

        for page in 0..n {
            let mut sigma = KahanSum::<f64>::new();
            for &q in self.inbound.inbound(page) {
                sigma += self.rank[q] * self.inbound.inv_outdegree(q);
            }
            let new_rank = teleport + self.damping * sigma.sum();
            let increment = (new_rank - self.rank[page]).abs();
            self.increments[page] = increment;
            max_increment = max_increment.max(increment);
            self.next[page] = new_rank;
        }

        std::mem::swap(&mut self.rank, &mut self.next);
        self.max_increment = max_increment;
        self.iteration += 1;
    }

    /// Runs the computation from the uniform vector until the given predicate
    /// is satisfied.
    ///
    /// The predicate is checked before every update, the first included, so
    /// a predicate that is already true leaves the uniform vector in place.
    pub fn run(&mut self, predicate: impl Predicate<preds::PredParams>) {
        self.run_with_logging(predicate, no_logging![]);
    }

    /// Runs the computation from the uniform vector until the given predicate
    /// is satisfied, logging progress.
    ///
    /// The options of `pl` are preserved, making thus possible to customize
    /// the logs.
    pub fn run_with_logging(
        &mut self,
        predicate: impl Predicate<preds::PredParams>,
        pl: &mut impl ProgressLog,
    ) {
        let n = self.rank.len();
        if n == 0 {
            return;
        }

        log::info!("Damping: {}", self.damping);
        log::info!("Stopping criterion: {}", predicate);

        self.reset();

        pl.item_name("iteration");
        pl.expected_updates(None);
        pl.start(format!(
            "Computing recursive PageRank on {n} pages (damping={})...",
            self.damping
        ));

        while !predicate.eval(&preds::PredParams {
            iteration: self.iteration,
            max_increment: self.max_increment,
        }) {
            self.step();

            log::debug!(
                "Iteration {}: max increment = {}",
                self.iteration,
                self.max_increment
            );

            pl.update_and_display();
        }

        pl.done();
        log::info!(
            "Completed after {} iterations (max increment {})",
            self.iteration,
            self.max_increment
        );
    }
}

impl Iterative for RecursiveUpdate {
    fn step(&mut self) {
        RecursiveUpdate::step(self)
    }

    fn estimate(&self) -> RankVector {
        RankVector::from(self.rank.clone())
    }
}

/// Computes recursive PageRank with damping factor `damping`, stopping when
/// every increment is below `stop_value` or after `max_iterations`
/// iterations, whichever comes first.
///
/// Returns the last rank vector and the number of iterations performed; if
/// `max_iterations` is zero, the uniform vector and zero. Fails if
/// `stop_value` is not positive.
///
/// # Panics
///
/// Panics if `damping` is not in the interval (0 . . 1).
pub fn recursive_pagerank<G: RandomAccessGraph>(
    graph: &G,
    stop_value: f64,
    max_iterations: usize,
    damping: f64,
) -> anyhow::Result<(RankVector, usize)> {
    let predicate =
        preds::MaxIncrement::try_from(stop_value)?.or(preds::MaxIter::from(max_iterations));
    let mut pr = RecursiveUpdate::new(graph);
    pr.damping(damping);
    pr.run(predicate);
    let iterations = pr.iterations();
    Ok((RankVector::from(pr.rank), iterations))
}

/// Iterates recursive updates from the uniform vector until the rank vector
/// is accepted by a [`Harness`] with the given tolerance and maximum number of
/// iterations.
///
/// # Panics
///
/// Panics if `damping` is not in the interval (0 . . 1).
pub fn iterate_to_convergence<G: RandomAccessGraph>(
    graph: &G,
    ground_truth: &RankVector,
    damping: f64,
    tolerance: f64,
    max_iterations: usize,
) -> Result<Convergence, ConvergenceFailure> {
    let mut pr = RecursiveUpdate::new(graph);
    pr.damping(damping);
    Harness::new(ground_truth)
        .tolerance(tolerance)
        .max_iterations(max_iterations)
        .run(&mut pr, ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use webrank::graphs::Graph;

    #[test]
    fn test_preds() -> anyhow::Result<()> {
        let max_inc = preds::MaxIncrement::try_from(1E-3)?;
        assert!(max_inc.eval(&preds::PredParams {
            iteration: 0,
            max_increment: 1E-4,
        }));
        // The threshold is strict
        assert!(!max_inc.eval(&preds::PredParams {
            iteration: 0,
            max_increment: 1E-3,
        }));
        assert!(preds::MaxIncrement::try_from(0.0).is_err());
        assert!(preds::MaxIncrement::try_from(f64::NAN).is_err());

        let either = max_inc.or(preds::MaxIter::from(5));
        assert!(either.eval(&preds::PredParams {
            iteration: 5,
            max_increment: 1.0,
        }));
        assert!(!either.eval(&preds::PredParams {
            iteration: 4,
            max_increment: 1.0,
        }));
        Ok(())
    }

    #[test]
    fn test_stochastic() {
        // Page 2 is a sink
        let g = Graph::from_succs([vec![1, 2], vec![2], vec![]]);
        let mut pr = RecursiveUpdate::new(&g);
        for _ in 0..20 {
            pr.step();
            let sum: f64 = pr.rank().iter().sum();
            assert!((sum - 1.0).abs() < 1E-12, "{sum}");
        }
        assert_eq!(pr.iterations(), 20);
    }

    #[test]
    fn test_max_iter() -> anyhow::Result<()> {
        let g = Graph::from_succs([vec![1], vec![0, 2], vec![0]]);
        let (_, iterations) = recursive_pagerank(&g, 1E-300, 7, 0.85)?;
        assert_eq!(iterations, 7);
        assert!(recursive_pagerank(&g, -1.0, 7, 0.85).is_err());
        Ok(())
    }

    #[test]
    fn test_zero_iterations() -> anyhow::Result<()> {
        let g = Graph::from_succs([vec![1], vec![0, 2], vec![0]]);
        let (rank, iterations) = recursive_pagerank(&g, 1E-7, 0, 0.85)?;
        assert_eq!(iterations, 0);
        assert_eq!(rank, RankVector::uniform(3));

        let mut pr = RecursiveUpdate::new(&g);
        pr.run(preds::MaxIter::from(0));
        assert_eq!(pr.iterations(), 0);
        assert_eq!(pr.max_increment(), f64::INFINITY);
        Ok(())
    }

    #[test]
    fn test_reset() {
        let g = Graph::from_succs([vec![1], vec![0, 2], vec![0]]);
        let mut pr = RecursiveUpdate::new(&g);
        pr.run(preds::MaxIter::from(3));
        let first = pr.rank().to_vec();
        pr.run(preds::MaxIter::from(3));
        assert_eq!(pr.rank(), first.as_slice());
        assert_eq!(pr.iterations(), 3);
    }

    #[test]
    #[should_panic(expected = "damping factor")]
    fn test_bad_damping() {
        RecursiveUpdate::new(&Graph::empty(1)).damping(0.0);
    }
}
