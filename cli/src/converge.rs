/*
 * SPDX-FileCopyrightText: 2025 The webrank developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::{
    ConvergenceArgs, CsvRecorder, DampingArg, GlobalArgs, GraphArgs, create_file,
    progress_logger,
};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use dsi_progress_logger::ProgressLog;
use std::path::{Path, PathBuf};
use webrank_algo::harness::{Harness, Iterative};
use webrank_algo::matrix::{self, PageOrder};
use webrank_algo::rank::{EigenSolver, PowerIteration, RandomSurfer, RecursiveUpdate, SurferWalk};

/// An approximate ranking method.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Engine {
    /// Synchronous recursive updates.
    Recursive,
    /// Powers of the transition matrix.
    Matrix,
    /// A random surfer.
    Surf,
}

impl Engine {
    /// Returns the name of the CSV file of the engine.
    pub fn file_name(&self) -> &'static str {
        match self {
            Engine::Recursive => "recursive.csv",
            Engine::Matrix => "matrix.csv",
            Engine::Surf => "surf.csv",
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "converge",
    about = "Records the error of every iteration of the approximate PageRank methods.",
    long_about = "Generates a random graph, computes its exact PageRank and then runs the \
approximate methods until they are close to it, writing for each method a CSV file with \
an `iteration,error_norm` row per iteration."
)]
pub struct CliArgs {
    /// The directory where the CSV files will be written.
    pub output_dir: PathBuf,

    #[clap(flatten)]
    pub graph: GraphArgs,

    #[clap(flatten)]
    pub damping: DampingArg,

    #[clap(flatten)]
    pub convergence: ConvergenceArgs,

    #[arg(
        short,
        long,
        value_enum,
        value_delimiter = ',',
        default_values_t = [Engine::Recursive, Engine::Matrix]
    )]
    /// The methods to run. The random surfer (`surf`) is slow to reach small
    /// tolerances and runs only on request.
    pub engines: Vec<Engine>,
}

pub fn main(global_args: GlobalArgs, args: CliArgs) -> Result<()> {
    let damping = args.damping.check()?;
    args.convergence.check()?;

    let mut pl = progress_logger(&global_args);
    let mut rng = args.graph.rng();
    let graph = args.graph.generate(&mut rng, &mut pl)?;

    let m = matrix::build(&graph, PageOrder::identity(graph.num_nodes()), damping);
    let truth = EigenSolver::new().rank(&m)?;

    let mut harness = Harness::new(&truth);
    harness
        .tolerance(args.convergence.tolerance)
        .max_iterations(args.convergence.max_iter);

    for engine in args.engines {
        let path = args.output_dir.join(engine.file_name());
        log::info!("Running {engine:?}, recording into {}", path.display());
        match engine {
            Engine::Recursive => {
                let mut pr = RecursiveUpdate::new(&graph);
                pr.damping(damping);
                record(&mut harness, pr, engine, &path, &mut pl)?;
            }
            Engine::Matrix => {
                record(&mut harness, PowerIteration::new(&m), engine, &path, &mut pl)?
            }
            Engine::Surf => {
                let surfer = RandomSurfer::new(&graph, damping)?;
                let walk = SurferWalk::new(&surfer, rng.clone());
                record(&mut harness, walk, engine, &path, &mut pl)?;
            }
        }
    }

    Ok(())
}

/// Runs an engine in the harness, writing its convergence record to `path`.
///
/// The record is written also if the engine does not converge.
fn record(
    harness: &mut Harness,
    iterative: impl Iterative,
    engine: Engine,
    path: &Path,
    pl: &mut impl ProgressLog,
) -> Result<()> {
    let mut recorder = CsvRecorder::new(create_file(path)?)?;
    let result = harness.run_with_logging(iterative, &mut recorder, pl);
    recorder.finish()?;

    let convergence = result
        .with_context(|| format!("{engine:?} did not converge; see {}", path.display()))?;
    log::info!(
        "{engine:?} converged after {} iterations (error norm {})",
        convergence.iterations,
        convergence.error_norm
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_converge_csv() -> Result<()> {
        let dir = tempfile::tempdir()?;
        crate::cli_main([
            "webrank",
            "converge",
            dir.path().to_str().unwrap(),
            "--nodes",
            "30",
            "--max-links",
            "5",
            "--engines",
            "recursive,matrix",
        ])?;
        for engine in [Engine::Recursive, Engine::Matrix] {
            let csv = std::fs::read_to_string(dir.path().join(engine.file_name()))?;
            let mut lines = csv.lines();
            assert_eq!(lines.next(), Some(CsvRecorder::<Vec<u8>>::HEADER));
            let mut count = 0;
            for (i, line) in lines.enumerate() {
                let (iteration, error_norm) = line.split_once(',').unwrap();
                assert_eq!(iteration.parse::<usize>()?, i + 1);
                assert!(error_norm.parse::<f64>()?.is_finite());
                count += 1;
            }
            assert!(count > 0);
        }
        assert!(!dir.path().join(Engine::Surf.file_name()).exists());
        Ok(())
    }

    #[test]
    fn test_record_written_on_failure() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let result = crate::cli_main([
            "webrank",
            "converge",
            dir.path().to_str().unwrap(),
            "--nodes",
            "30",
            "--max-links",
            "5",
            "--tolerance",
            "1e-9",
            "--max-iter",
            "3",
            "--engines",
            "matrix",
        ]);
        assert!(result.is_err());
        let csv = std::fs::read_to_string(dir.path().join("matrix.csv"))?;
        assert_eq!(csv.lines().count(), 4);
        Ok(())
    }
}
