/*
 * SPDX-FileCopyrightText: 2025 The webrank developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::{DampingArg, GlobalArgs, GraphArgs, progress_logger};
use anyhow::{Result, ensure};
use clap::{Parser, ValueEnum};
use predicates::prelude::*;
use webrank_algo::RankVector;
use webrank_algo::matrix::{self, PageOrder};
use webrank_algo::rank::recursive::{RecursiveUpdate, preds};
use webrank_algo::rank::{EigenSolver, RandomSurfer, fixed_power};

/// The ranking method.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// The eigenvector of eigenvalue 1 of the transition matrix.
    Eigen,
    /// The first column of a power of the transition matrix.
    Power,
    /// Synchronous recursive updates.
    Recursive,
    /// Visit frequencies of a random surfer.
    Surf,
}

#[derive(Parser, Debug)]
#[command(
    name = "rank",
    about = "Generates a random graph and prints its PageRank.",
    long_about = None
)]
pub struct CliArgs {
    #[clap(flatten)]
    pub graph: GraphArgs,

    #[clap(flatten)]
    pub damping: DampingArg,

    #[arg(short, long, value_enum, default_value_t = Method::Eigen)]
    /// The ranking method.
    pub method: Method,

    #[arg(long, default_value_t = 20)]
    /// The power of the transition matrix (power method only).
    pub power: u32,

    #[arg(long, default_value_t = 1E-7)]
    /// Stop when no rank changes by this much (recursive method only).
    pub stop_value: f64,

    #[arg(long, default_value_t = 200)]
    /// The maximum number of iterations (recursive method only).
    pub max_iter: usize,

    #[arg(long, default_value_t = 100_000)]
    /// The number of steps of the walk (surf method only).
    pub samples: usize,

    #[arg(short, long, default_value_t = 4)]
    /// Decimal digits of the printed ranks.
    pub precision: usize,
}

pub fn main(global_args: GlobalArgs, args: CliArgs) -> Result<()> {
    let damping = args.damping.check()?;
    ensure!(args.samples > 0, "The number of samples must be positive");

    let mut pl = progress_logger(&global_args);
    let mut rng = args.graph.rng();
    let graph = args.graph.generate(&mut rng, &mut pl)?;
    log::info!(
        "Ranking {} pages and {} links with method {:?}",
        graph.num_nodes(),
        graph.num_arcs(),
        args.method
    );

    let rank: RankVector = match args.method {
        Method::Eigen => {
            let m = matrix::build(&graph, PageOrder::identity(graph.num_nodes()), damping);
            EigenSolver::new().rank(&m)?
        }
        Method::Power => {
            let m = matrix::build(&graph, PageOrder::identity(graph.num_nodes()), damping);
            fixed_power(&m, args.power)
        }
        Method::Recursive => {
            let mut predicate = preds::MaxIncrement::try_from(args.stop_value)?.boxed();
            predicate = predicate.or(preds::MaxIter::from(args.max_iter)).boxed();
            let mut pr = RecursiveUpdate::new(&graph);
            pr.damping(damping);
            pr.run_with_logging(predicate, &mut pl);
            RankVector::from(pr.rank().to_vec())
        }
        Method::Surf => RandomSurfer::new(&graph, damping)?.walk(args.samples, &mut rng),
    };

    println!("{rank:.precision$}", precision = args.precision);
    Ok(())
}
