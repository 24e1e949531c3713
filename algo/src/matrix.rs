/*
 * SPDX-FileCopyrightText: 2025 The webrank developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Damped transition matrices.
//!
//! If we denote with *A* the row-normalized adjacency matrix of the
//! [effective graph](webrank::graphs::EffectiveGraph) (so *A*ᵢⱼ =
//! 1/outdegree(*i*) if *i* → *j*, and 0 otherwise), with *J* the all-ones
//! matrix and with *d* the damping factor, the transition matrix of a graph
//! with *N* pages is
//!
//! > *M* = *d* *A*ᵀ + (1 − *d*) / *N* · *J*.
//!
//! Since every row of *A* sums to one (sinks have been resolved), every
//! column of *M* sums to one: *M* maps stochastic column vectors to
//! stochastic column vectors, and PageRank is its stationary distribution.
//!
//! Rows and columns of *M* are indexed following a [`PageOrder`], a bijection
//! between pages and matrix indices fixed when the matrix is built. Results
//! are converted back to page-indexed [`RankVector`]s only at the boundary.

use crate::RankVector;
use anyhow::ensure;
use nalgebra::DMatrix;
use webrank::Page;
use webrank::graphs::{EffectiveGraph, RandomAccessGraph, effective};

/// A bijection between the pages of a graph and the indices of a matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageOrder {
    /// The page at each index.
    pages: Box<[Page]>,
    /// The index of each page.
    index: Box<[usize]>,
}

impl PageOrder {
    /// Returns the identity order on `n` pages.
    pub fn identity(n: usize) -> Self {
        Self {
            pages: (0..n).collect(),
            index: (0..n).collect(),
        }
    }

    /// Returns the number of pages.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Returns whether the order has no pages.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Returns the page at matrix index `index`.
    #[inline(always)]
    pub fn page(&self, index: usize) -> Page {
        self.pages[index]
    }

    /// Returns the matrix index of `page`.
    #[inline(always)]
    pub fn index(&self, page: Page) -> usize {
        self.index[page]
    }

    /// Returns the pages in matrix order.
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }
}

impl TryFrom<Vec<Page>> for PageOrder {
    type Error = anyhow::Error;

    /// Builds an order from the list of pages in matrix order, which must be a
    /// permutation of `0..n`.
    fn try_from(pages: Vec<Page>) -> anyhow::Result<Self> {
        let n = pages.len();
        let mut index = vec![usize::MAX; n].into_boxed_slice();
        for (i, &page) in pages.iter().enumerate() {
            ensure!(page < n, "Page {page} out of range (the order has {n} pages)");
            ensure!(index[page] == usize::MAX, "Page {page} appears twice");
            index[page] = i;
        }
        Ok(Self {
            pages: pages.into_boxed_slice(),
            index,
        })
    }
}

/// The damped transition matrix of a graph.
///
/// Instances are built by [`build`] and are immutable.
#[derive(Debug, Clone)]
pub struct TransitionMatrix {
    matrix: DMatrix<f64>,
    order: PageOrder,
    damping: f64,
}

impl TransitionMatrix {
    /// Returns the matrix *M*.
    #[inline(always)]
    pub fn matrix(&self) -> &DMatrix<f64> {
        &self.matrix
    }

    /// Returns the order of rows and columns.
    #[inline(always)]
    pub fn order(&self) -> &PageOrder {
        &self.order
    }

    /// Returns the damping factor used to build the matrix.
    #[inline(always)]
    pub fn damping(&self) -> f64 {
        self.damping
    }

    /// Returns the number of pages (the dimension of the matrix).
    #[inline(always)]
    pub fn num_nodes(&self) -> usize {
        self.order.len()
    }

    /// Returns column `col` of `m`, a matrix whose rows follow the order of
    /// this matrix, as a page-indexed rank vector.
    ///
    /// # Panics
    ///
    /// Panics if `m` does not have as many rows as this matrix.
    pub fn column_rank(&self, m: &DMatrix<f64>, col: usize) -> RankVector {
        let n = self.num_nodes();
        assert_eq!(m.nrows(), n, "The matrix must have {n} rows");
        self.to_rank_vector(m.column(col).iter().copied())
    }

    /// Converts values in matrix order into a page-indexed rank vector.
    ///
    /// # Panics
    ///
    /// Panics if there are more values than pages. Missing values are zero.
    pub fn to_rank_vector(&self, values: impl IntoIterator<Item = f64>) -> RankVector {
        let mut ranks = vec![0.0; self.num_nodes()];
        for (i, x) in values.into_iter().enumerate() {
            ranks[self.order.page(i)] = x;
        }
        RankVector::from(ranks)
    }

    /// Returns a copy of this matrix multiplied by `factor`, which is no
    /// longer stochastic.
    #[cfg(test)]
    pub(crate) fn scaled(&self, factor: f64) -> Self {
        Self {
            matrix: &self.matrix * factor,
            order: self.order.clone(),
            damping: self.damping,
        }
    }
}

/// Returns the row-normalized adjacency matrix *A* of an effective graph,
/// with rows and columns following `order`.
///
/// # Panics
///
/// Panics if the order and the graph have a different number of pages.
pub fn link_matrix(graph: &EffectiveGraph, order: &PageOrder) -> DMatrix<f64> {
    let n = graph.num_nodes();
    assert_eq!(
        order.len(),
        n,
        "The page order has {} pages, but the graph has {n}",
        order.len()
    );
    let mut a = DMatrix::zeros(n, n);
    for i in 0..n {
        let page = order.page(i);
        let inv_outdegree = 1.0 / graph.outdegree(page) as f64;
        for succ in graph.successors(page) {
            a[(i, order.index(succ))] = inv_outdegree;
        }
    }
    a
}

/// Builds the damped transition matrix *M* = *d* *A*ᵀ + (1 − *d*) / *N* ·
/// *J* of a graph.
///
/// Sinks are resolved by computing the [effective graph](effective) first;
/// the graph is not modified.
///
/// # Panics
///
/// Panics if `damping` is not in the interval (0 . . 1), or if the order and
/// the graph have a different number of pages.
pub fn build<G: RandomAccessGraph>(graph: &G, order: PageOrder, damping: f64) -> TransitionMatrix {
    assert!(
        damping > 0.0 && damping < 1.0,
        "The damping factor must be in (0 . . 1), got {damping}"
    );
    let n = graph.num_nodes();
    let a = link_matrix(&effective(graph), &order);
    let mut matrix = a.transpose() * damping;
    if n != 0 {
        matrix.add_scalar_mut((1.0 - damping) / n as f64);
    }

    log::debug!("Built a {n}×{n} transition matrix (damping {damping})");

    TransitionMatrix {
        matrix,
        order,
        damping,
    }
}
