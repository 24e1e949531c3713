/*
 * SPDX-FileCopyrightText: 2025 The webrank developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Monte Carlo PageRank by simulation of a random surfer.
//!
//! A random surfer starts from a page chosen uniformly at random and then
//! moves to the next page following the [step distribution](step_distribution)
//! of the current page. The fraction of steps spent on each page approximates
//! its PageRank.
//!
//! The random number generator is always an explicit argument.

use crate::RankVector;
use crate::harness::{Convergence, ConvergenceFailure, Harness, Iterative};
use rand::Rng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use webrank::Page;
use webrank::graphs::{InvalidGraphError, RandomAccessGraph};

/// Returns the distribution of the page visited after `page`.
///
/// If `page` is a sink, the distribution is uniform. Otherwise, it is the
/// mixture of the uniform distribution on the successors of `page`, with
/// weight `damping`, and of the uniform distribution on all pages, with
/// weight 1 − `damping`.
///
/// # Panics
///
/// Panics if `damping` is not in the interval (0 . . 1) or if `page` is not a
/// page of the graph.
pub fn step_distribution<G: RandomAccessGraph>(graph: &G, page: Page, damping: f64) -> RankVector {
    assert!(
        damping > 0.0 && damping < 1.0,
        "The damping factor must be in (0 . . 1), got {damping}"
    );
    let n = graph.num_nodes();
    assert!(page < n, "Page {page} does not exist (the graph has {n} pages)");

    let outdegree = graph.outdegree(page);
    if outdegree == 0 {
        return RankVector::uniform(n);
    }

    let mut dist = vec![(1.0 - damping) / n as f64; n];
    let link = damping / outdegree as f64;
    for succ in graph.successors(page) {
        dist[succ] += link;
    }
    RankVector::from(dist)
}

/// A random surfer with precomputed step distributions.
///
/// # Examples
///
/// ```
/// use rand::SeedableRng;
/// use rand::rngs::SmallRng;
/// use webrank::graphs::Graph;
/// use webrank_algo::rank::RandomSurfer;
///
/// let g = Graph::from_succs([vec![1, 3], vec![0], vec![0], vec![0]]);
/// let surfer = RandomSurfer::new(&g, 0.85)?;
/// let rank = surfer.walk(10_000, &mut SmallRng::seed_from_u64(0));
///
/// assert!((rank.sum() - 1.0).abs() < 1E-9);
/// assert!(rank[0] > rank[2]);
/// # Ok::<(), webrank::graphs::InvalidGraphError>(())
/// ```
#[derive(Debug, Clone)]
pub struct RandomSurfer {
    samplers: Box<[WeightedIndex<f64>]>,
    damping: f64,
}

impl RandomSurfer {
    /// Precomputes a sampler for the step distribution of every page.
    ///
    /// Fails if the graph has no pages.
    ///
    /// # Panics
    ///
    /// Panics if `damping` is not in the interval (0 . . 1).
    pub fn new<G: RandomAccessGraph>(graph: &G, damping: f64) -> Result<Self, InvalidGraphError> {
        let n = graph.num_nodes();
        if n == 0 {
            return Err(InvalidGraphError::Empty);
        }
        let samplers = (0..n)
            .map(|page| {
                WeightedIndex::new(step_distribution(graph, page, damping).as_slice())
                    .map_err(|source| InvalidGraphError::Distribution { page, source })
            })
            .collect::<Result<Box<[_]>, _>>()?;

        log::debug!("Precomputed {n} step distributions (damping {damping})");

        Ok(Self { samplers, damping })
    }

    /// Returns the number of pages.
    pub fn num_nodes(&self) -> usize {
        self.samplers.len()
    }

    /// Returns the damping factor.
    pub fn damping(&self) -> f64 {
        self.damping
    }

    /// Returns a page chosen uniformly at random.
    pub fn first_page<R: Rng + ?Sized>(&self, rng: &mut R) -> Page {
        rng.random_range(0..self.num_nodes())
    }

    /// Returns the page visited after `page`.
    #[inline]
    pub fn next_page<R: Rng + ?Sized>(&self, page: Page, rng: &mut R) -> Page {
        self.samplers[page].sample(rng)
    }

    /// Walks for `samples` steps, counting the initial page as the first one,
    /// and returns the fraction of steps spent on each page.
    ///
    /// # Panics
    ///
    /// Panics if `samples` is zero.
    pub fn walk<R: Rng + ?Sized>(&self, samples: usize, rng: &mut R) -> RankVector {
        assert!(samples > 0, "The number of samples must be positive");
        let mut counts = vec![0_usize; self.num_nodes()];
        let mut page = self.first_page(rng);
        counts[page] += 1;
        for _ in 1..samples {
            page = self.next_page(page, rng);
            counts[page] += 1;
        }
        frequencies(&counts, samples)
    }
}

fn frequencies(counts: &[usize], samples: usize) -> RankVector {
    let samples = samples as f64;
    counts
        .iter()
        .map(|&c| c as f64 / samples)
        .collect::<Vec<_>>()
        .into()
}

/// Estimates the PageRank of a graph with a random walk of `samples` steps.
///
/// See [`RandomSurfer::walk`].
///
/// # Panics
///
/// Panics if `samples` is zero or if `damping` is not in the interval
/// (0 . . 1).
pub fn random_surf<G: RandomAccessGraph, R: Rng + ?Sized>(
    graph: &G,
    samples: usize,
    damping: f64,
    rng: &mut R,
) -> Result<RankVector, InvalidGraphError> {
    Ok(RandomSurfer::new(graph, damping)?.walk(samples, rng))
}

/// An [`Iterative`] engine performing one step of a random walk at a time.
///
/// The estimate is the fraction of steps spent on each page so far; the
/// initial page counts as a step.
#[derive(Debug, Clone)]
pub struct SurferWalk<'a, R> {
    surfer: &'a RandomSurfer,
    rng: R,
    counts: Box<[usize]>,
    samples: usize,
    page: Page,
}

impl<'a, R: Rng> SurferWalk<'a, R> {
    /// Starts a walk from a page chosen uniformly at random.
    pub fn new(surfer: &'a RandomSurfer, mut rng: R) -> Self {
        let mut counts = vec![0; surfer.num_nodes()].into_boxed_slice();
        let page = surfer.first_page(&mut rng);
        counts[page] += 1;
        Self {
            surfer,
            rng,
            counts,
            samples: 1,
            page,
        }
    }

    /// Returns the number of steps taken so far, including the initial page.
    pub fn samples(&self) -> usize {
        self.samples
    }

    /// Returns the current page.
    pub fn page(&self) -> Page {
        self.page
    }
}

impl<R: Rng> Iterative for SurferWalk<'_, R> {
    fn step(&mut self) {
        self.page = self.surfer.next_page(self.page, &mut self.rng);
        self.counts[self.page] += 1;
        self.samples += 1;
    }

    fn estimate(&self) -> RankVector {
        frequencies(&self.counts, self.samples)
    }
}

/// Walks until the visit frequencies are accepted by a [`Harness`] with the
/// given tolerance and maximum number of steps.
pub fn walk_to_convergence<R: Rng>(
    surfer: &RandomSurfer,
    ground_truth: &RankVector,
    tolerance: f64,
    max_iterations: usize,
    rng: R,
) -> Result<Convergence, ConvergenceFailure> {
    Harness::new(ground_truth)
        .tolerance(tolerance)
        .max_iterations(max_iterations)
        .run(SurferWalk::new(surfer, rng), ())
}
