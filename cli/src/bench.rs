/*
 * SPDX-FileCopyrightText: 2025 The webrank developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::{DampingArg, GlobalArgs, create_file, progress_logger};
use anyhow::{Context, Result, ensure};
use clap::Parser;
use dsi_progress_logger::ProgressLog;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use webrank::graphs::random;
use webrank_algo::harness::Harness;
use webrank_algo::matrix::{self, PageOrder};
use webrank_algo::rank::{EigenSolver, PowerIteration, RandomSurfer, RecursiveUpdate, SurferWalk};
use webrank_algo::utils::Stopwatch;

pub const HEADER: &str = "nodes,connections,eig_vector,random_surf,recursive,iterative_matrix";

#[derive(Parser, Debug)]
#[command(
    name = "bench",
    about = "Times the PageRank methods on random graphs of increasing size.",
    long_about = "Times the exact eigenvector computation and the time needed by the random \
surfer, the recursive updates and the powers of the transition matrix to get close to the exact \
ranking, on random graphs with an increasing number of pages. The timings, in seconds, are \
written as CSV rows."
)]
pub struct CliArgs {
    /// The CSV file where the timings will be written.
    pub output: PathBuf,

    #[arg(long, default_value_t = 10)]
    /// The number of pages of the smallest graph.
    pub min_nodes: usize,

    #[arg(long, default_value_t = 50)]
    /// The number of pages of the largest graph.
    pub max_nodes: usize,

    #[arg(short = 'k', long, default_value_t = 9)]
    /// The maximum number of links of a page (must be smaller than the
    /// number of pages of the smallest graph).
    pub max_links: usize,

    #[arg(long, default_value_t = 0)]
    /// The minimum number of links of a page.
    pub min_links: usize,

    #[arg(short, long, default_value_t = 0)]
    /// The seed of the pseudorandom number generator.
    pub seed: u64,

    #[clap(flatten)]
    pub damping: DampingArg,

    #[arg(short, long, default_value_t = 0.01)]
    /// The relative tolerance with respect to the exact ranking.
    pub tolerance: f64,

    #[arg(long, default_value_t = 10_000_000)]
    /// The maximum number of iterations of each method. The random surfer
    /// needs millions of steps to bring every page within a 1% tolerance.
    pub max_iter: usize,
}

/// The timings of the four methods on a graph.
#[derive(Debug, Clone, Copy)]
pub struct Timings {
    pub eigen: Duration,
    pub surf: Duration,
    pub recursive: Duration,
    pub matrix: Duration,
}

pub fn main(global_args: GlobalArgs, args: CliArgs) -> Result<()> {
    let damping = args.damping.check()?;
    ensure!(
        args.tolerance > 0.0,
        "The tolerance must be positive, got {}",
        args.tolerance
    );
    ensure!(
        args.min_nodes <= args.max_nodes,
        "The minimum number of pages ({}) is larger than the maximum number of pages ({})",
        args.min_nodes,
        args.max_nodes
    );
    ensure!(
        args.max_links < args.min_nodes,
        "The maximum number of links ({}) must be smaller than the minimum number of pages ({})",
        args.max_links,
        args.min_nodes
    );

    let mut out = create_file(&args.output)?;
    writeln!(out, "{HEADER}")?;

    let mut pl = progress_logger(&global_args);
    pl.item_name("graph");
    pl.expected_updates(Some(args.max_nodes - args.min_nodes + 1));
    pl.start("Timing PageRank methods...");

    let mut rng = SmallRng::seed_from_u64(args.seed);
    for n in args.min_nodes..=args.max_nodes {
        let timings = time_methods(n, &args, damping, &mut rng)?;
        log::debug!("{n} pages: {timings:?}");
        writeln!(
            out,
            "{n},{},{},{},{},{}",
            args.max_links,
            timings.eigen.as_secs_f64(),
            timings.surf.as_secs_f64(),
            timings.recursive.as_secs_f64(),
            timings.matrix.as_secs_f64()
        )?;
        pl.update();
    }
    pl.done();

    out.flush()
        .with_context(|| format!("Could not write {}", args.output.display()))?;
    Ok(())
}

/// Times the four methods on a random graph with `n` pages.
///
/// The time of an approximate method includes its setup, but not the
/// comparisons with the exact ranking.
fn time_methods(n: usize, args: &CliArgs, damping: f64, rng: &mut SmallRng) -> Result<Timings> {
    let graph = random::generate(n, args.max_links, args.min_links, rng)?;
    let mut stopwatch = Stopwatch::new();

    stopwatch.start();
    let m = matrix::build(&graph, PageOrder::identity(n), damping);
    let truth = EigenSolver::new().rank(&m)?;
    stopwatch.stop();
    let eigen = stopwatch.elapsed();

    let mut harness = Harness::new(&truth);
    harness
        .tolerance(args.tolerance)
        .max_iterations(args.max_iter);

    stopwatch.reset();
    stopwatch.start();
    let surfer = RandomSurfer::new(&graph, damping)?;
    let walk = SurferWalk::new(&surfer, rng.clone());
    stopwatch.stop();
    let surf = stopwatch.elapsed()
        + harness
            .run(walk, ())
            .with_context(|| format!("The random surfer did not converge on {n} pages"))?
            .elapsed;

    stopwatch.reset();
    stopwatch.start();
    let mut pr = RecursiveUpdate::new(&graph);
    pr.damping(damping);
    stopwatch.stop();
    let recursive = stopwatch.elapsed()
        + harness
            .run(pr, ())
            .with_context(|| format!("Recursive updates did not converge on {n} pages"))?
            .elapsed;

    // The matrix has already been built for the exact ranking
    let matrix = harness
        .run(PowerIteration::new(&m), ())
        .with_context(|| format!("Matrix powers did not converge on {n} pages"))?
        .elapsed;

    Ok(Timings {
        eigen,
        surf,
        recursive,
        matrix,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bench_csv() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let output = dir.path().join("timings").join("bench.csv");
        crate::cli_main([
            "webrank",
            "bench",
            output.to_str().unwrap(),
            "--min-nodes",
            "10",
            "--max-nodes",
            "12",
            "--tolerance",
            "0.05",
        ])?;
        let csv = std::fs::read_to_string(&output)?;
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some(HEADER));
        for (n, line) in (10..=12).zip(lines.by_ref()) {
            let fields: Vec<_> = line.split(',').collect();
            assert_eq!(fields.len(), 6);
            assert_eq!(fields[0], n.to_string());
            assert_eq!(fields[1], "9");
            for field in &fields[2..] {
                assert!(field.parse::<f64>()? >= 0.0);
            }
        }
        assert_eq!(lines.next(), None);
        Ok(())
    }
}
