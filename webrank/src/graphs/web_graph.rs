/*
 * SPDX-FileCopyrightText: 2025 The webrank developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use super::{EffectiveGraph, RandomAccessGraph};
use std::collections::{BTreeSet, btree_set};
use std::iter::Copied;

/// A mutable web graph based on a vector of [`BTreeSet`].
///
/// Pages are the integers `0..n`; every page maps to the set of pages it
/// links to. Self-links are rejected, and so are links to pages that do not
/// exist, so that every instance satisfies the invariants required by the
/// ranking algorithms. Pages without out-links (sinks) are allowed: they are
/// resolved by [`effective`](Graph::effective).
///
/// Arcs can be added in any order; successors are always enumerated in
/// increasing order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Graph {
    /// The number of arcs in the graph.
    number_of_arcs: usize,
    /// For each page, its set of successors.
    succ: Vec<BTreeSet<usize>>,
}

impl Graph {
    /// Creates a new graph with no pages.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new graph with `n` pages and no links.
    pub fn empty(n: usize) -> Self {
        Self {
            number_of_arcs: 0,
            succ: Vec::from_iter((0..n).map(|_| BTreeSet::new())),
        }
    }

    /// Adds a link from `u` to `v` and returns whether it is a new one.
    ///
    /// # Panics
    ///
    /// Panics if one of the pages does not exist or if `u` is equal to `v`.
    pub fn add_arc(&mut self, u: usize, v: usize) -> bool {
        let max = u.max(v);
        if max >= self.succ.len() {
            panic!(
                "Page {} does not exist (the graph has {} pages)",
                max,
                self.succ.len(),
            );
        }
        assert_ne!(u, v, "Self-links are not allowed (page {u})");
        let result = self.succ[u].insert(v);
        self.number_of_arcs += result as usize;
        result
    }

    /// Adds links from an [`IntoIterator`] of pairs.
    ///
    /// # Panics
    ///
    /// See [`add_arc`](Graph::add_arc).
    pub fn add_arcs(&mut self, arcs: impl IntoIterator<Item = (usize, usize)>) {
        for (u, v) in arcs {
            self.add_arc(u, v);
        }
    }

    /// Creates a graph with `n` pages from an [`IntoIterator`] of pairs.
    pub fn from_arcs(n: usize, arcs: impl IntoIterator<Item = (usize, usize)>) -> Self {
        let mut g = Self::empty(n);
        g.add_arcs(arcs);
        g
    }

    /// Creates a graph from the successor lists of its pages.
    ///
    /// The `i`-th item of `succs` lists the pages linked by page `i`; the
    /// number of items is the number of pages. This is the most convenient way
    /// to write a graph literal:
    ///
    /// ```
    /// use webrank::graphs::Graph;
    ///
    /// // {0: {1, 2}, 1: {}, 2: {0}}
    /// let g = Graph::from_succs([vec![1, 2], vec![], vec![0]]);
    /// assert_eq!(g.num_arcs(), 3);
    /// assert!(g.is_sink(1));
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if a list contains its own page or a page that does not exist.
    pub fn from_succs<I, S>(succs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: IntoIterator<Item = usize>,
    {
        let succs = succs
            .into_iter()
            .map(|s| s.into_iter().collect::<Vec<_>>())
            .collect::<Vec<_>>();
        let mut g = Self::empty(succs.len());
        for (u, s) in succs.into_iter().enumerate() {
            for v in s {
                g.add_arc(u, v);
            }
        }
        g
    }

    /// Returns the number of pages.
    #[inline(always)]
    pub fn num_nodes(&self) -> usize {
        self.succ.len()
    }

    /// Returns the number of links.
    #[inline(always)]
    pub fn num_arcs(&self) -> usize {
        self.number_of_arcs
    }

    /// Returns the successors of `page` in increasing order.
    #[inline(always)]
    pub fn successors(&self, page: usize) -> Copied<btree_set::Iter<'_, usize>> {
        self.succ[page].iter().copied()
    }

    /// Returns whether `page` links to `target`.
    #[inline(always)]
    pub fn has_arc(&self, page: usize, target: usize) -> bool {
        self.succ[page].contains(&target)
    }

    /// Returns the number of successors of `page`.
    #[inline(always)]
    pub fn outdegree(&self, page: usize) -> usize {
        self.succ[page].len()
    }

    /// Returns whether `page` has no out-links.
    #[inline(always)]
    pub fn is_sink(&self, page: usize) -> bool {
        self.succ[page].is_empty()
    }

    /// Returns an iterator over the sinks of the graph.
    pub fn sinks(&self) -> impl Iterator<Item = usize> + '_ {
        self.succ
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_empty())
            .map(|(page, _)| page)
    }

    /// Returns the effective graph, in which every sink links to all pages.
    ///
    /// This graph is not modified.
    pub fn effective(&self) -> EffectiveGraph {
        super::effective(self)
    }
}

impl RandomAccessGraph for Graph {
    type Successors<'a> = Copied<btree_set::Iter<'a, usize>>;

    #[inline(always)]
    fn num_nodes(&self) -> usize {
        Graph::num_nodes(self)
    }

    #[inline(always)]
    fn num_arcs(&self) -> usize {
        Graph::num_arcs(self)
    }

    #[inline(always)]
    fn successors(&self, page: usize) -> Self::Successors<'_> {
        Graph::successors(self, page)
    }

    #[inline(always)]
    fn outdegree(&self, page: usize) -> usize {
        Graph::outdegree(self, page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_arcs() {
        let mut g = Graph::empty(3);
        assert!(g.add_arc(0, 1));
        assert!(!g.add_arc(0, 1));
        assert!(g.add_arc(2, 0));
        assert_eq!(g.num_arcs(), 2);
        assert_eq!(g.successors(0).collect::<Vec<_>>(), vec![1]);
        assert_eq!(g.sinks().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn test_sorted_successors() {
        let g = Graph::from_succs([vec![3, 1, 2], vec![], vec![], vec![]]);
        assert_eq!(g.successors(0).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert!(g.has_arc(0, 3));
        assert!(!g.has_arc(3, 0));
    }

    #[test]
    #[should_panic(expected = "Self-links")]
    fn test_self_link() {
        Graph::from_arcs(2, [(1, 1)]);
    }

    #[test]
    #[should_panic(expected = "does not exist")]
    fn test_missing_page() {
        Graph::from_succs([vec![1], vec![2]]);
    }
}
