/*
 * SPDX-FileCopyrightText: 2025 The webrank developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use anyhow::Result;
use dsi_progress_logger::prelude::*;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use webrank::graphs::{Graph, random};
use webrank_algo::harness::{ConvergenceRecord, Harness, State};
use webrank_algo::matrix::{self, PageOrder};
use webrank_algo::rank::{
    EigenSolver, PowerIteration, RandomSurfer, RecursiveUpdate, power, recursive, surfer,
};

fn star() -> Graph {
    Graph::from_succs([vec![1, 3], vec![0], vec![0], vec![0]])
}

#[test]
fn test_recursive_fails_then_converges() -> Result<()> {
    let _ = env_logger::builder().is_test(true).try_init();
    // A periodic graph: the second eigenvalue of M is −0.85
    let g = star();
    let m = matrix::build(&g, PageOrder::identity(4), 0.85);
    let truth = EigenSolver::new().rank(&m)?;

    let mut record = ConvergenceRecord::new();
    let mut harness = Harness::new(&truth);
    harness.tolerance(1E-6).max_iterations(40);
    let failure = harness
        .run(RecursiveUpdate::new(&g), &mut record)
        .unwrap_err();
    assert_eq!(harness.state(), State::Failed);
    assert_eq!(failure.iterations, 40);
    assert_eq!(record.len(), 40);
    assert_eq!(record.last(), Some((40, failure.error_norm)));
    assert!(failure.error_norm > 0.0);

    let mut record = ConvergenceRecord::new();
    harness.max_iterations(200);
    let convergence = harness.run_with_logging(
        RecursiveUpdate::new(&g),
        &mut record,
        &mut progress_logger![],
    )?;
    assert_eq!(harness.state(), State::Converged);
    assert!(convergence.iterations > 40);
    assert_eq!(record.len(), convergence.iterations);
    for (i, (iteration, _)) in record.iter().enumerate() {
        assert_eq!(iteration, i + 1);
    }
    assert!(convergence.rank.is_close_to(&truth, 1E-6));
    Ok(())
}

#[test]
fn test_power_iteration() -> Result<()> {
    let g = random::generate_seeded(40, 5, 0, 0)?;
    let m = matrix::build(&g, PageOrder::identity(40), 0.85);
    let truth = EigenSolver::new().rank(&m)?;

    let convergence = power::iterate_to_convergence(&m, &truth, 1E-4, 500)?;
    assert!(convergence.rank.is_close_to(&truth, 1E-4));
    assert!(convergence.error_norm < 1E-4);

    // The harness stops at the same exponent as a manual run
    let mut engine = PowerIteration::new(&m);
    let mut record = ConvergenceRecord::new();
    Harness::new(&truth)
        .tolerance(1E-4)
        .run(&mut engine, &mut record)?;
    assert_eq!(engine.exponent(), convergence.iterations + 1);

    // Errors shrink geometrically
    let first = record.as_slice()[0].1;
    let (_, last) = record.last().unwrap_or_default();
    assert!(last < first);
    Ok(())
}

#[test]
fn test_recursive_iterate_to_convergence() -> Result<()> {
    let g = random::generate_seeded(40, 5, 1, 3)?;
    let truth = EigenSolver::new().rank(&matrix::build(&g, PageOrder::identity(40), 0.5))?;
    let convergence = recursive::iterate_to_convergence(&g, &truth, 0.5, 1E-8, 200)?;
    assert!(convergence.rank.l_inf_distance(&truth) < 1E-8);
    assert!(recursive::iterate_to_convergence(&g, &truth, 0.5, 1E-8, 2).is_err());
    Ok(())
}

#[test]
fn test_surfer_walk() -> Result<()> {
    let g = star();
    let truth = EigenSolver::new().rank(&matrix::build(&g, PageOrder::identity(4), 0.85))?;
    let surfer = RandomSurfer::new(&g, 0.85)?;

    let convergence =
        surfer::walk_to_convergence(&surfer, &truth, 0.05, 1_000_000, SmallRng::seed_from_u64(0))?;
    assert!(convergence.rank.is_close_to(&truth, 0.05));
    assert!((convergence.rank.sum() - 1.0).abs() < 1E-9);

    // Too few steps to see all pages
    let failure =
        surfer::walk_to_convergence(&surfer, &truth, 0.05, 2, SmallRng::seed_from_u64(0))
            .unwrap_err();
    assert_eq!(failure.iterations, 2);
    Ok(())
}
