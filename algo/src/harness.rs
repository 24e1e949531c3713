/*
 * SPDX-FileCopyrightText: 2025 The webrank developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! A harness driving approximate PageRank engines toward a ground truth.
//!
//! The [`Harness`] runs an [`Iterative`] engine one step at a time. After
//! each step it compares the current estimate with a ground-truth
//! [`RankVector`] (in this crate, always the output of the
//! [`EigenSolver`](crate::rank::EigenSolver)), hands the iteration number and
//! the 𝓁_∞ error to a [`Recorder`], and stops as soon as every page of the
//! ground truth is [close](crate::utils::math::is_close) to its estimate
//! within the relative tolerance.
//!
//! If the estimate is not accepted within the maximum number of iterations,
//! the run fails with a [`ConvergenceFailure`], which is never retried.
//!
//! # Examples
//!
//! ```
//! use webrank::graphs::Graph;
//! use webrank_algo::harness::{ConvergenceRecord, Harness, State};
//! use webrank_algo::rank::{RecursiveUpdate, eigenvector_pagerank};
//!
//! let g = Graph::from_succs([vec![1, 3], vec![0], vec![0], vec![0]]);
//! let truth = eigenvector_pagerank(&g, 0.85)?;
//!
//! let mut record = ConvergenceRecord::new();
//! let mut harness = Harness::new(&truth);
//! harness.tolerance(1E-6).max_iterations(1000);
//! let convergence = harness.run(&mut RecursiveUpdate::new(&g), &mut record)?;
//!
//! assert_eq!(harness.state(), State::Converged);
//! assert_eq!(record.len(), convergence.iterations);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::RankVector;
use crate::utils::Stopwatch;
use dsi_progress_logger::prelude::*;
use std::time::Duration;
use thiserror::Error;

/// An engine that approximates PageRank one step at a time.
pub trait Iterative {
    /// Advances the engine by one unit of work.
    fn step(&mut self);

    /// Returns the current estimate.
    fn estimate(&self) -> RankVector;
}

impl<I: Iterative + ?Sized> Iterative for &mut I {
    fn step(&mut self) {
        (**self).step()
    }

    fn estimate(&self) -> RankVector {
        (**self).estimate()
    }
}

/// A sink for the error of every iteration of a harness run.
pub trait Recorder {
    /// Records the 𝓁_∞ error of the estimate after `iteration` steps.
    fn record(&mut self, iteration: usize, error_norm: f64);
}

impl Recorder for () {
    #[inline(always)]
    fn record(&mut self, _iteration: usize, _error_norm: f64) {}
}

impl<R: Recorder> Recorder for Option<R> {
    fn record(&mut self, iteration: usize, error_norm: f64) {
        if let Some(recorder) = self {
            recorder.record(iteration, error_norm);
        }
    }
}

impl<R: Recorder + ?Sized> Recorder for &mut R {
    fn record(&mut self, iteration: usize, error_norm: f64) {
        (**self).record(iteration, error_norm)
    }
}

/// An in-memory, append-only sequence of `(iteration, error_norm)` pairs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConvergenceRecord {
    entries: Vec<(usize, f64)>,
}

impl ConvergenceRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the recorded pairs in order.
    pub fn as_slice(&self) -> &[(usize, f64)] {
        &self.entries
    }

    /// Returns the last recorded pair, if any.
    pub fn last(&self) -> Option<(usize, f64)> {
        self.entries.last().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.entries.iter().copied()
    }
}

impl Recorder for ConvergenceRecord {
    fn record(&mut self, iteration: usize, error_norm: f64) {
        self.entries.push((iteration, error_norm));
    }
}

/// The state of a [`Harness`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// No run has started yet.
    Init,
    /// A run is in progress.
    Iterating,
    /// The last run was accepted.
    Converged,
    /// The last run exhausted its iterations.
    Failed,
}

/// The outcome of an accepted harness run.
#[derive(Debug, Clone)]
pub struct Convergence {
    /// The accepted estimate.
    pub rank: RankVector,
    /// The number of engine steps performed.
    pub iterations: usize,
    /// The 𝓁_∞ error of the accepted estimate.
    pub error_norm: f64,
    /// The time spent inside engine steps.
    pub elapsed: Duration,
}

/// The estimate was not accepted within the maximum number of iterations.
#[derive(Error, Debug, Clone)]
#[error("No convergence after {iterations} iterations (error norm {error_norm})")]
pub struct ConvergenceFailure {
    /// The last estimate.
    pub rank: RankVector,
    /// The number of engine steps performed.
    pub iterations: usize,
    /// The 𝓁_∞ error of the last estimate.
    pub error_norm: f64,
}

/// Drives an [`Iterative`] engine until its estimate matches a ground truth.
///
/// The harness is configured via setters and then executed via
/// [`run`](Self::run). The same harness can run several engines in
/// sequence; [`state`](Self::state) reflects the last run.
#[derive(Debug)]
pub struct Harness<'a> {
    ground_truth: &'a RankVector,
    tolerance: f64,
    max_iterations: usize,
    state: State,
    stopwatch: Stopwatch,
}

impl<'a> Harness<'a> {
    /// The default relative tolerance of the acceptance test.
    pub const DEFAULT_TOLERANCE: f64 = 0.01;
    /// The default maximum number of iterations.
    pub const DEFAULT_MAX_ITERATIONS: usize = 1000;

    /// Creates a harness accepting estimates close to `ground_truth`.
    pub fn new(ground_truth: &'a RankVector) -> Self {
        Self {
            ground_truth,
            tolerance: Self::DEFAULT_TOLERANCE,
            max_iterations: Self::DEFAULT_MAX_ITERATIONS,
            state: State::Init,
            stopwatch: Stopwatch::new(),
        }
    }

    /// Sets the relative tolerance of the acceptance test.
    ///
    /// # Panics
    ///
    /// Panics if `tolerance` is not positive.
    pub fn tolerance(&mut self, tolerance: f64) -> &mut Self {
        assert!(
            tolerance > 0.0,
            "The tolerance must be positive, got {tolerance}"
        );
        self.tolerance = tolerance;
        self
    }

    /// Sets the maximum number of engine steps of a run.
    pub fn max_iterations(&mut self, max_iterations: usize) -> &mut Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Returns the state of the harness.
    pub fn state(&self) -> State {
        self.state
    }

    /// Returns the ground truth.
    pub fn ground_truth(&self) -> &RankVector {
        self.ground_truth
    }

    /// Runs `engine` until its estimate is accepted, recording the error of
    /// every iteration into `recorder`.
    pub fn run(
        &mut self,
        engine: impl Iterative,
        recorder: impl Recorder,
    ) -> Result<Convergence, ConvergenceFailure> {
        self.run_with_logging(engine, recorder, no_logging![])
    }

    /// Runs `engine` until its estimate is accepted, recording the error of
    /// every iteration into `recorder` and logging progress.
    ///
    /// The options of `pl` are preserved, except for the item name and the
    /// expected number of updates.
    pub fn run_with_logging(
        &mut self,
        mut engine: impl Iterative,
        mut recorder: impl Recorder,
        pl: &mut impl ProgressLog,
    ) -> Result<Convergence, ConvergenceFailure> {
        log::info!("Tolerance: {}", self.tolerance);
        log::info!("Maximum number of iterations: {}", self.max_iterations);

        self.state = State::Iterating;
        self.stopwatch.reset();

        pl.item_name("iteration");
        pl.expected_updates(Some(self.max_iterations));
        pl.start("Iterating toward the ground truth...");

        let mut iterations = 0;
        let mut last = None;
        while iterations < self.max_iterations {
            self.stopwatch.start();
            engine.step();
            self.stopwatch.stop();
            iterations += 1;

            let estimate = engine.estimate();
            let error_norm = estimate.l_inf_distance(self.ground_truth);
            recorder.record(iterations, error_norm);
            log::debug!("Iteration {iterations}: error norm = {error_norm}");
            pl.light_update();

            if estimate.is_close_to(self.ground_truth, self.tolerance) {
                pl.done();
                self.state = State::Converged;
                log::info!("Converged after {iterations} iterations (error norm {error_norm})");
                return Ok(Convergence {
                    rank: estimate,
                    iterations,
                    error_norm,
                    elapsed: self.stopwatch.elapsed(),
                });
            }
            last = Some((estimate, error_norm));
        }

        pl.done();
        self.state = State::Failed;
        let (rank, error_norm) = last.unwrap_or_else(|| {
            let estimate = engine.estimate();
            let error_norm = estimate.l_inf_distance(self.ground_truth);
            (estimate, error_norm)
        });
        log::warn!("No convergence after {iterations} iterations (error norm {error_norm})");
        Err(ConvergenceFailure {
            rank,
            iterations,
            error_norm,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Halves the distance from the target at each step.
    struct Halving {
        current: Vec<f64>,
        target: Vec<f64>,
    }

    impl Iterative for Halving {
        fn step(&mut self) {
            for (c, t) in self.current.iter_mut().zip(&self.target) {
                *c = (*c + t) / 2.0;
            }
        }

        fn estimate(&self) -> RankVector {
            RankVector::from(self.current.clone())
        }
    }

    fn halving() -> (Halving, RankVector) {
        let target = vec![0.75, 0.25];
        (
            Halving {
                current: vec![0.0, 1.0],
                target: target.clone(),
            },
            RankVector::from(target),
        )
    }

    #[test]
    fn test_converges() -> Result<(), ConvergenceFailure> {
        let (mut engine, truth) = halving();
        let mut record = ConvergenceRecord::new();
        let mut harness = Harness::new(&truth);
        assert_eq!(harness.state(), State::Init);
        harness.tolerance(1E-3);
        let convergence = harness.run(&mut engine, &mut record)?;

        assert_eq!(harness.state(), State::Converged);
        // The errors are 0.75 / 2^k, and page 1 needs 0.75 / 2^k ≤ 2.5E-4
        assert_eq!(convergence.iterations, 12);
        assert_eq!(record.len(), 12);
        for (i, (iteration, error_norm)) in record.iter().enumerate() {
            assert_eq!(iteration, i + 1);
            assert_eq!(error_norm, 0.75 / (1 << (i + 1)) as f64);
        }
        assert_eq!(record.last(), Some((12, convergence.error_norm)));
        Ok(())
    }

    #[test]
    fn test_fails() {
        let (mut engine, truth) = halving();
        let mut record = ConvergenceRecord::new();
        let mut harness = Harness::new(&truth);
        harness.tolerance(1E-3).max_iterations(11);
        let failure = harness.run(&mut engine, &mut record).unwrap_err();

        assert_eq!(harness.state(), State::Failed);
        assert_eq!(failure.iterations, 11);
        assert_eq!(record.len(), 11);
        assert_eq!(failure.error_norm, 0.75 / 2048.0);
        assert_eq!(failure.rank, engine.estimate());
    }

    #[test]
    fn test_no_iterations() {
        let (engine, truth) = halving();
        let mut harness = Harness::new(&truth);
        harness.max_iterations(0);
        let failure = harness.run(engine, ()).unwrap_err();
        assert_eq!(failure.iterations, 0);
        assert_eq!(failure.error_norm, 0.75);
    }

    #[test]
    fn test_missing_pages() {
        let truth = RankVector::from(vec![0.5, 0.5]);
        let mut engine = Halving {
            current: vec![0.5],
            target: vec![0.5],
        };
        let mut record = Some(ConvergenceRecord::new());
        let mut harness = Harness::new(&truth);
        harness.max_iterations(3);
        let failure = harness.run(&mut engine, &mut record).unwrap_err();
        assert_eq!(failure.error_norm, f64::INFINITY);
        assert_eq!(record.map(|r| r.len()), Some(3));
    }

    #[test]
    #[should_panic(expected = "tolerance")]
    fn test_bad_tolerance() {
        let truth = RankVector::uniform(2);
        Harness::new(&truth).tolerance(0.0);
    }
}
