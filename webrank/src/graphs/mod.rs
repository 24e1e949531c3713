/*
 * SPDX-FileCopyrightText: 2025 The webrank developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Web graphs, their sink-free effective view, and inbound indices.
//!
//! A [`Graph`] is the structure handed to the ranking algorithms. It never
//! contains self-links, but it may contain _sinks_, that is, pages without
//! out-links. All algorithms resolve sinks in the same way, by linking them to
//! every page (the sink itself included): the resulting
//! [`EffectiveGraph`] is computed by [`Graph::effective`] (or by the generic
//! [`effective`] function) and never alters the original graph.

use thiserror::Error;

mod effective;
mod inbound;
pub mod random;
mod web_graph;

pub use effective::{EffectiveGraph, effective};
pub use inbound::InboundIndex;
pub use web_graph::Graph;

/// Random access to the successors of the pages of a graph.
///
/// Both [`Graph`] and [`EffectiveGraph`] implement this trait, so that
/// functions such as [`effective`] can be applied to either.
pub trait RandomAccessGraph {
    /// The type of the iterator over the successors of a page.
    type Successors<'a>: Iterator<Item = usize>
    where
        Self: 'a;

    /// Returns the number of pages.
    fn num_nodes(&self) -> usize;

    /// Returns the number of links.
    fn num_arcs(&self) -> usize;

    /// Returns the successors of a page in increasing order.
    ///
    /// # Panics
    ///
    /// Panics if `page` is not smaller than the number of pages.
    fn successors(&self, page: usize) -> Self::Successors<'_>;

    /// Returns the number of successors of a page.
    fn outdegree(&self, page: usize) -> usize;

    /// Returns whether the page has no successors.
    #[inline(always)]
    fn is_sink(&self, page: usize) -> bool {
        self.outdegree(page) == 0
    }
}

/// Errors raised when a graph cannot be built or used.
#[derive(Error, Debug, Clone)]
pub enum InvalidGraphError {
    /// The minimum outdegree is larger than the maximum outdegree.
    #[error("The minimum outdegree ({kmin}) is larger than the maximum outdegree ({k})")]
    MinOutdegree { kmin: usize, k: usize },

    /// The maximum outdegree cannot be realized without self-links.
    #[error("The maximum outdegree ({k}) must be smaller than the number of pages ({n})")]
    MaxOutdegree { k: usize, n: usize },

    /// The graph has no pages.
    #[error("The graph has no pages")]
    Empty,

    /// The next-page distribution of a page cannot be sampled.
    #[error("The next-page distribution of page {page} cannot be sampled: {source}")]
    Distribution {
        page: usize,
        source: rand::distr::weighted::Error,
    },
}

pub mod prelude {
    pub use super::random::{generate, generate_seeded};
    pub use super::{EffectiveGraph, Graph, InboundIndex, InvalidGraphError, RandomAccessGraph};
}
