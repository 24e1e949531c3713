/*
 * SPDX-FileCopyrightText: 2025 The webrank developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Random web graphs with uniformly distributed outdegrees.
//!
//! Every page of a graph with `n` pages draws its outdegree uniformly from
//! [`kmin` . . `k`], and then draws that many distinct successors uniformly
//! without replacement among the other `n` − 1 pages. Graphs generated in
//! this way have no self-links; they may have sinks if `kmin` is zero.
//!
//! The random number generator is always an explicit argument, so that
//! generation is reproducible:
//!
//! ```
//! use rand::SeedableRng;
//! use rand::rngs::SmallRng;
//! use webrank::graphs::random;
//!
//! let mut rng = SmallRng::seed_from_u64(0);
//! let g = random::generate(100, 10, 1, &mut rng)?;
//! assert_eq!(g.num_nodes(), 100);
//! assert!(g.sinks().next().is_none());
//! # Ok::<(), webrank::graphs::InvalidGraphError>(())
//! ```

use super::{Graph, InvalidGraphError};
use dsi_progress_logger::prelude::*;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Generates a random graph with `n` pages whose outdegrees are uniformly
/// distributed in [`kmin` . . `k`].
///
/// Fails with [`InvalidGraphError`] if `kmin` > `k` or `k` ≥ `n`.
pub fn generate<R: Rng + ?Sized>(
    n: usize,
    k: usize,
    kmin: usize,
    rng: &mut R,
) -> Result<Graph, InvalidGraphError> {
    generate_with_logging(n, k, kmin, rng, no_logging![])
}

/// Generates a random graph using a [`SmallRng`] seeded with `seed`.
///
/// See [`generate`].
pub fn generate_seeded(
    n: usize,
    k: usize,
    kmin: usize,
    seed: u64,
) -> Result<Graph, InvalidGraphError> {
    generate(n, k, kmin, &mut SmallRng::seed_from_u64(seed))
}

/// Generates a random graph, logging progress.
///
/// See [`generate`].
pub fn generate_with_logging<R: Rng + ?Sized>(
    n: usize,
    k: usize,
    kmin: usize,
    rng: &mut R,
    pl: &mut impl ProgressLog,
) -> Result<Graph, InvalidGraphError> {
    if kmin > k {
        return Err(InvalidGraphError::MinOutdegree { kmin, k });
    }
    if k >= n {
        return Err(InvalidGraphError::MaxOutdegree { k, n });
    }

    let mut g = Graph::empty(n);

    pl.item_name("page");
    pl.expected_updates(Some(n));
    pl.start(format!(
        "Generating a random graph with {n} pages and outdegrees in [{kmin} . . {k}]..."
    ));

    for page in 0..n {
        let outdegree = rng.random_range(kmin..=k);
        // Indices in [0 . . n − 1) are mapped to pages other than `page`
        for x in rand::seq::index::sample(rng, n - 1, outdegree) {
            g.add_arc(page, if x >= page { x + 1 } else { x });
        }
        pl.light_update();
    }

    pl.done();
    log::debug!("Generated {} links", g.num_arcs());

    Ok(g)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_parameters() {
        assert!(matches!(
            generate_seeded(10, 3, 4, 0),
            Err(InvalidGraphError::MinOutdegree { kmin: 4, k: 3 })
        ));
        assert!(matches!(
            generate_seeded(10, 10, 0, 0),
            Err(InvalidGraphError::MaxOutdegree { k: 10, n: 10 })
        ));
        assert!(matches!(
            generate_seeded(0, 0, 0, 0),
            Err(InvalidGraphError::MaxOutdegree { k: 0, n: 0 })
        ));
    }

    #[test]
    fn test_reproducible() -> Result<(), InvalidGraphError> {
        let g0 = generate_seeded(50, 7, 2, 42)?;
        let g1 = generate_seeded(50, 7, 2, 42)?;
        assert_eq!(g0, g1);
        Ok(())
    }

    #[test]
    fn test_complete() -> Result<(), InvalidGraphError> {
        // kmin = k = n - 1 forces the complete graph without loops
        let g = generate_seeded(6, 5, 5, 0)?;
        assert_eq!(g.num_arcs(), 30);
        for page in 0..6 {
            assert!(!g.has_arc(page, page));
        }
        Ok(())
    }
}
