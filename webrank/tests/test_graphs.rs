/*
 * SPDX-FileCopyrightText: 2025 The webrank developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use anyhow::Result;
use dsi_progress_logger::prelude::*;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use webrank::graphs::random;
use webrank::prelude::*;

#[test]
fn test_random_outdegrees() -> Result<()> {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut rng = SmallRng::seed_from_u64(0);
    for &(n, k, kmin) in &[(1, 0, 0), (2, 1, 0), (10, 9, 0), (50, 10, 3), (200, 20, 20)] {
        for _ in 0..5 {
            let g = random::generate_with_logging(n, k, kmin, &mut rng, &mut progress_logger![])?;
            assert_eq!(g.num_nodes(), n);
            for page in 0..n {
                let d = g.outdegree(page);
                assert!(
                    (kmin..=k).contains(&d),
                    "n={n} k={k} kmin={kmin}: page {page} has outdegree {d}"
                );
                for succ in g.successors(page) {
                    assert_ne!(succ, page, "self-link at page {page}");
                    assert!(succ < n, "page {page} links to missing page {succ}");
                }
            }
        }
    }
    Ok(())
}

#[test]
fn test_random_uses_all_targets() -> Result<()> {
    // With many pages of outdegree 1 every target should eventually appear
    let g = random::generate_seeded(20, 1, 1, 7)?;
    let mut rng = SmallRng::seed_from_u64(7);
    let h = random::generate(20, 1, 1, &mut rng)?;
    assert_eq!(g, h);

    let mut hit = vec![false; 20];
    for seed in 0..100 {
        let g = random::generate_seeded(20, 1, 1, seed)?;
        for page in 0..20 {
            for succ in g.successors(page) {
                hit[succ] = true;
            }
        }
    }
    assert!(hit.iter().all(|&h| h));
    Ok(())
}

#[test]
fn test_effective_random() -> Result<()> {
    for seed in 0..10 {
        let g = random::generate_seeded(30, 4, 0, seed)?;
        let sinks = g.sinks().count();
        let e = g.effective();
        assert_eq!(e.num_resolved_sinks(), sinks);
        assert_eq!(e.num_arcs(), g.num_arcs() + sinks * 30);
        for page in 0..30 {
            assert!(!e.is_sink(page));
        }
        assert_eq!(webrank::graphs::effective(&e), e);
        // The graph still has its sinks
        assert_eq!(g.sinks().count(), sinks);
    }
    Ok(())
}

#[test]
fn test_inbound_is_transpose() -> Result<()> {
    let g = random::generate_seeded(40, 6, 0, 3)?;
    let e = g.effective();
    let index = InboundIndex::new(&e);
    let mut arcs = 0;
    for page in 0..40 {
        for &pred in index.inbound(page) {
            assert!(e.successors(pred).any(|s| s == page));
            arcs += 1;
        }
        assert_eq!(index.inv_outdegree(page), 1.0 / e.outdegree(page) as f64);
    }
    assert_eq!(arcs, e.num_arcs());
    Ok(())
}
