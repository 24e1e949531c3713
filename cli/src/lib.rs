/*
 * SPDX-FileCopyrightText: 2025 The webrank developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

#![doc = include_str!("../README.md")]
#![deny(unstable_features)]
#![deny(trivial_casts)]
#![deny(unconditional_recursion)]
#![deny(clippy::empty_loop)]
#![deny(unreachable_code)]
#![deny(unreachable_pub)]
#![deny(unreachable_patterns)]
#![deny(unused_macro_rules)]
#![deny(unused_doc_comments)]

use anyhow::{Context, Result, anyhow, bail, ensure};
use clap::{Args, Parser, Subcommand};
use dsi_progress_logger::prelude::*;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Duration;
use std::time::SystemTime;
use webrank::graphs::{Graph, random};
use webrank_algo::harness::Recorder;

/// Arguments describing a random graph.
#[derive(Args, Debug, Clone)]
pub struct GraphArgs {
    #[arg(short, long, default_value_t = 100)]
    /// The number of pages.
    pub nodes: usize,

    #[arg(short = 'k', long, default_value_t = 10)]
    /// The maximum number of links of a page (must be smaller than the number
    /// of pages).
    pub max_links: usize,

    #[arg(long, default_value_t = 0)]
    /// The minimum number of links of a page. Pages without links are sinks.
    pub min_links: usize,

    #[arg(short, long, default_value_t = 0)]
    /// The seed of the pseudorandom number generator.
    pub seed: u64,
}

impl GraphArgs {
    /// Returns a pseudorandom number generator seeded with the seed.
    pub fn rng(&self) -> SmallRng {
        SmallRng::seed_from_u64(self.seed)
    }

    /// Generates a graph using `rng`.
    pub fn generate(&self, rng: &mut SmallRng, pl: &mut impl ProgressLog) -> Result<Graph> {
        random::generate_with_logging(self.nodes, self.max_links, self.min_links, rng, pl)
            .context("Could not generate the graph")
    }
}

/// The damping factor.
#[derive(Args, Debug, Clone)]
pub struct DampingArg {
    #[arg(short, long, default_value_t = 0.85)]
    /// The damping factor (must be in the interval (0 . . 1)).
    pub damping: f64,
}

impl DampingArg {
    /// Checks that the damping factor is in (0 . . 1).
    pub fn check(&self) -> Result<f64> {
        ensure!(
            self.damping > 0.0 && self.damping < 1.0,
            "The damping factor must be in (0 . . 1), got {}",
            self.damping
        );
        Ok(self.damping)
    }
}

/// The acceptance test of the convergence harness.
#[derive(Args, Debug, Clone)]
pub struct ConvergenceArgs {
    #[arg(short, long, default_value_t = 0.01)]
    /// The relative tolerance with respect to the exact ranking.
    pub tolerance: f64,

    #[arg(long, default_value_t = 1_000_000)]
    /// The maximum number of iterations of each method.
    pub max_iter: usize,
}

impl ConvergenceArgs {
    /// Checks that the tolerance is positive.
    pub fn check(&self) -> Result<()> {
        ensure!(
            self.tolerance > 0.0,
            "The tolerance must be positive, got {}",
            self.tolerance
        );
        Ok(())
    }
}

/// Returns a progress logger configured by the global arguments.
pub fn progress_logger(global_args: &GlobalArgs) -> ProgressLogger {
    let mut pl = progress_logger![];
    if let Some(log_interval) = global_args.log_interval {
        pl.log_interval(log_interval);
    }
    pl
}

/// Creates all parent directories of the given file path.
pub fn create_parent_dir(file_path: impl AsRef<Path>) -> Result<()> {
    // ensure that the dst directory exists
    if let Some(parent_dir) = file_path.as_ref().parent() {
        std::fs::create_dir_all(parent_dir).with_context(|| {
            format!(
                "Failed to create the directory {:?}",
                parent_dir.to_string_lossy()
            )
        })?;
    }
    Ok(())
}

/// Creates a buffered file, creating its parent directories if necessary.
pub fn create_file(path: impl AsRef<Path>) -> Result<BufWriter<File>> {
    let path = path.as_ref();
    create_parent_dir(path)?;
    Ok(BufWriter::new(File::create(path).with_context(|| {
        format!("Could not create {}", path.display())
    })?))
}

/// A [`Recorder`] writing `iteration,error_norm` CSV rows.
///
/// Since recording cannot fail, the first I/O error is kept and returned by
/// [`finish`](Self::finish); later rows are discarded.
#[derive(Debug)]
pub struct CsvRecorder<W: Write> {
    writer: W,
    error: Option<std::io::Error>,
}

impl<W: Write> CsvRecorder<W> {
    pub const HEADER: &'static str = "iteration,error_norm";

    /// Creates a recorder, writing the header.
    pub fn new(mut writer: W) -> Result<Self> {
        writeln!(writer, "{}", Self::HEADER)?;
        Ok(Self {
            writer,
            error: None,
        })
    }

    /// Flushes the writer and returns it, or returns the first error.
    pub fn finish(mut self) -> Result<W> {
        if let Some(error) = self.error.take() {
            return Err(error).context("Could not write a CSV row");
        }
        self.writer.flush()?;
        Ok(self.writer)
    }
}

impl<W: Write> Recorder for CsvRecorder<W> {
    fn record(&mut self, iteration: usize, error_norm: f64) {
        if self.error.is_none() {
            if let Err(error) = writeln!(self.writer, "{iteration},{error_norm}") {
                self.error = Some(error);
            }
        }
    }
}

/// Parses a duration from a string.
/// For compatibility with Java, if no suffix is given, it is assumed to be in milliseconds.
/// You can use suffixes, the available ones are:
/// - `s` for seconds
/// - `m` for minutes
/// - `h` for hours
/// - `d` for days
///
/// Example: `1d2h3m4s567` this is parsed as: 1 day, 2 hours, 3 minutes, 4 seconds, and 567 milliseconds.
fn parse_duration(value: &str) -> Result<Duration> {
    if value.is_empty() {
        bail!("Empty duration string, if you want every 0 milliseconds use `0`.");
    }
    let mut duration = Duration::from_secs(0);
    let mut acc = String::new();
    for c in value.chars() {
        if c.is_ascii_digit() {
            acc.push(c);
        } else if c.is_whitespace() {
            continue;
        } else {
            let dur = acc.parse::<u64>()?;
            match c {
                's' => duration += Duration::from_secs(dur),
                'm' => duration += Duration::from_secs(dur * 60),
                'h' => duration += Duration::from_secs(dur * 60 * 60),
                'd' => duration += Duration::from_secs(dur * 60 * 60 * 24),
                _ => return Err(anyhow!("Invalid duration suffix: {}", c)),
            }
            acc.clear();
        }
    }
    if !acc.is_empty() {
        let dur = acc.parse::<u64>()?;
        duration += Duration::from_millis(dur);
    }
    Ok(duration)
}

/// Initializes the `env_logger` logger with a custom format including
/// timestamps with elapsed time since initialization.
pub fn init_env_logger() -> Result<()> {
    use jiff::SpanRound;
    use jiff::fmt::friendly::{Designator, Spacing, SpanPrinter};

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));

    let start = std::time::Instant::now();
    let printer = SpanPrinter::new()
        .spacing(Spacing::None)
        .designator(Designator::Compact);
    let span_round = SpanRound::new()
        .largest(jiff::Unit::Day)
        .smallest(jiff::Unit::Millisecond)
        .days_are_24_hours();

    builder.format(move |buf, record| {
        let Ok(ts) = jiff::Timestamp::try_from(SystemTime::now()) else {
            return Err(std::io::Error::other("Failed to get timestamp"));
        };
        let style = buf.default_level_style(record.level());
        let elapsed = start.elapsed();
        let span = jiff::Span::new()
            .seconds(elapsed.as_secs() as i64)
            .milliseconds(elapsed.subsec_millis() as i64);
        let span = span.round(span_round).map_err(std::io::Error::other)?;
        writeln!(
            buf,
            "{} {} {style}{}{style:#} {} - {}",
            ts.strftime("%F %T%.3f"),
            printer.span_to_string(&span),
            record.level(),
            record.target(),
            record.args()
        )
    });
    builder.try_init()?;
    Ok(())
}

#[derive(Args, Debug)]
pub struct GlobalArgs {
    #[arg(long, value_parser = parse_duration, global=true, display_order = 1000)]
    /// How often to log progress. Default is 10s. You can use the suffixes "s"
    /// for seconds, "m" for minutes, "h" for hours, and "d" for days. If no
    /// suffix is provided it is assumed to be in milliseconds.
    /// Example: "1d2h3m4s567" is parsed as 1 day + 2 hours + 3 minutes + 4
    /// seconds + 567 milliseconds = 93784567 milliseconds.
    pub log_interval: Option<Duration>,
}

#[derive(Subcommand, Debug)]
pub enum SubCommands {
    Rank(rank::CliArgs),
    Converge(converge::CliArgs),
    Bench(bench::CliArgs),
}

#[derive(Parser, Debug)]
#[command(name = "webrank", version)]
/// Tools to rank random web graphs and to measure how PageRank algorithms
/// converge.
///
/// Noteworthy environment variables:
///
/// - RUST_LOG: configuration for env_logger
///   <https://docs.rs/env_logger/latest/env_logger/>
pub struct Cli {
    #[command(subcommand)]
    pub command: SubCommands,
    #[clap(flatten)]
    pub args: GlobalArgs,
}

pub mod bench;
pub mod converge;
pub mod rank;

/// The entry point of the command-line interface.
pub fn cli_main<I, T>(args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let start = std::time::Instant::now();
    let cli = Cli::parse_from(args);
    match cli.command {
        SubCommands::Rank(args) => {
            rank::main(cli.args, args)?;
        }
        SubCommands::Converge(args) => {
            converge::main(cli.args, args)?;
        }
        SubCommands::Bench(args) => {
            bench::main(cli.args, args)?;
        }
    }

    log::info!(
        "The command took {}",
        pretty_print_elapsed(start.elapsed().as_secs_f64())
    );

    Ok(())
}

/// Pretty-prints seconds in a human-readable format.
fn pretty_print_elapsed(elapsed: f64) -> String {
    let mut result = String::new();
    let mut elapsed_seconds = elapsed as u64;
    let days = elapsed_seconds / (60 * 60 * 24);
    elapsed_seconds %= 60 * 60 * 24;
    let hours = elapsed_seconds / (60 * 60);
    elapsed_seconds %= 60 * 60;
    let minutes = elapsed_seconds / 60;

    match days {
        0 => {}
        1 => result.push_str("1 day "),
        _ => result.push_str(&format!("{} days ", days)),
    }
    match hours {
        0 => {}
        1 => result.push_str("1 hour "),
        _ => result.push_str(&format!("{} hours ", hours)),
    }
    match minutes {
        0 => {}
        1 => result.push_str("1 minute "),
        _ => result.push_str(&format!("{} minutes ", minutes)),
    }

    result.push_str(&format!("{:.3} seconds ({}s)", elapsed % 60.0, elapsed));
    result
}
