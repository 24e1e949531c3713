/*
 * SPDX-FileCopyrightText: 2025 The webrank developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use super::{EffectiveGraph, RandomAccessGraph};

/// The predecessors of every page of an [`EffectiveGraph`], together with the
/// inverses of the outdegrees.
///
/// Recursive PageRank formulations need to enumerate the _predecessors_ of a
/// page, and to divide the rank of each predecessor by its outdegree. The
/// index is built once per graph (it is, in fact, the transpose of the
/// effective graph) and then used read-only by every iteration.
///
/// Since it is built from an effective graph, no page has outdegree zero, and
/// all inverse outdegrees are finite.
#[derive(Clone, Debug)]
pub struct InboundIndex {
    inbound: Vec<Box<[usize]>>,
    inv_outdegrees: Box<[f64]>,
}

impl InboundIndex {
    /// Builds the inbound index of an effective graph.
    pub fn new(graph: &EffectiveGraph) -> Self {
        let n = graph.num_nodes();
        let mut inbound = vec![Vec::new(); n];
        let mut inv_outdegrees = vec![0.0; n].into_boxed_slice();

        for page in 0..n {
            // Sources are scanned in increasing order, so inbound
            // lists come out sorted.
            for succ in graph.successors(page) {
                inbound[succ].push(page);
            }
            inv_outdegrees[page] = 1.0 / graph.outdegree(page) as f64;
        }

        Self {
            inbound: inbound.into_iter().map(Vec::into_boxed_slice).collect(),
            inv_outdegrees,
        }
    }

    /// Returns the number of pages.
    #[inline(always)]
    pub fn num_nodes(&self) -> usize {
        self.inbound.len()
    }

    /// Returns the pages linking to `page`, in increasing order.
    #[inline(always)]
    pub fn inbound(&self, page: usize) -> &[usize] {
        &self.inbound[page]
    }

    /// Returns the inverse of the outdegree of `page`.
    #[inline(always)]
    pub fn inv_outdegree(&self, page: usize) -> f64 {
        self.inv_outdegrees[page]
    }

    /// Returns the inverses of the outdegrees of all pages.
    #[inline(always)]
    pub fn inv_outdegrees(&self) -> &[f64] {
        &self.inv_outdegrees
    }
}
