/*
 * SPDX-FileCopyrightText: 2025 The webrank developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use super::RandomAccessGraph;
use std::iter::Copied;
use std::slice;

/// A graph without sinks.
///
/// It is obtained from a graph by replacing the (empty) out-link set of
/// every sink with the full page set, the sink itself included: the rank of a
/// sink is thus redistributed uniformly. Every other page keeps its
/// successors, so the only self-links of an effective graph are those of
/// former sinks.
///
/// Effective graphs are immutable and can be shared freely among the ranking
/// algorithms. Two effective graphs are equal if they have the same links,
/// independently of how many sinks were resolved to obtain them.
#[derive(Clone, Debug)]
pub struct EffectiveGraph {
    number_of_arcs: usize,
    num_sinks: usize,
    succ: Vec<Box<[usize]>>,
}

/// Returns the effective graph of a graph.
///
/// The function is pure and idempotent: applying it to an effective graph
/// returns an equal graph, as effective graphs have no sinks.
pub fn effective<G: RandomAccessGraph>(graph: &G) -> EffectiveGraph {
    let n = graph.num_nodes();
    let mut number_of_arcs = 0;
    let mut num_sinks = 0;
    let succ = (0..n)
        .map(|page| {
            let s: Box<[usize]> = if graph.is_sink(page) {
                num_sinks += 1;
                (0..n).collect()
            } else {
                graph.successors(page).collect()
            };
            number_of_arcs += s.len();
            s
        })
        .collect();

    log::debug!("Resolved {} sinks out of {} pages", num_sinks, n);

    EffectiveGraph {
        number_of_arcs,
        num_sinks,
        succ,
    }
}

impl PartialEq for EffectiveGraph {
    fn eq(&self, other: &Self) -> bool {
        self.succ == other.succ
    }
}

impl Eq for EffectiveGraph {}

impl EffectiveGraph {
    /// Returns the number of sinks of the graph this graph was derived from.
    ///
    /// Note that applying [`effective`] to an effective graph yields a graph
    /// with the same links but no resolved sinks.
    pub fn num_resolved_sinks(&self) -> usize {
        self.num_sinks
    }

    /// Returns the successors of `page` as a slice.
    #[inline(always)]
    pub fn successors_slice(&self, page: usize) -> &[usize] {
        &self.succ[page]
    }
}

impl RandomAccessGraph for EffectiveGraph {
    type Successors<'a> = Copied<slice::Iter<'a, usize>>;

    #[inline(always)]
    fn num_nodes(&self) -> usize {
        self.succ.len()
    }

    #[inline(always)]
    fn num_arcs(&self) -> usize {
        self.number_of_arcs
    }

    #[inline(always)]
    fn successors(&self, page: usize) -> Self::Successors<'_> {
        self.succ[page].iter().copied()
    }

    #[inline(always)]
    fn outdegree(&self, page: usize) -> usize {
        self.succ[page].len()
    }
}
