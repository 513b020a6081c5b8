//! Command-line wave-picking optimizer.
//!
//! Reads an instance from stdin, runs the parallel multi-start search,
//! and writes the best wave to stdout. Exits 0 on any terminated run,
//! including one that found nothing; argument and instance parse errors
//! exit nonzero with a diagnostic.

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::warn;

use wavepick::construct::Heuristic;
use wavepick::io::{read_problem, write_improvement_log, write_solution};
use wavepick::multistart::{MultistartConfig, MultistartRunner};

const APP_NAME: &str = env!("CARGO_PKG_NAME");
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = APP_NAME)]
#[command(version = VERSION)]
#[command(about = "Wave-picking optimizer: maximizes picked units per visited aisle", long_about = None)]
struct Args {
    /// Constructor heuristic: 0 = order greedy, 1 = cached, 2 = sampled,
    /// 3 = aisle first
    #[arg(value_parser = clap::value_parser!(u8).range(0..=3), default_value_t = 1)]
    heuristic: u8,

    /// Optional file receiving one `elapsed_seconds score` line per
    /// accepted improvement; truncated at start
    improvement_log: Option<PathBuf>,

    /// Seconds without any improvement before the search stops
    #[arg(long, default_value_t = 3.0)]
    patience: f64,

    /// Seed for reproducible runs; worker i derives seed + i
    #[arg(long)]
    seed: Option<u64>,

    /// Worker thread count; 0 means one per core
    #[arg(long, default_value_t = 0)]
    threads: usize,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    if !(args.patience > 0.0 && args.patience.is_finite()) {
        bail!("patience must be a positive number of seconds");
    }
    let heuristic =
        Heuristic::from_index(args.heuristic).expect("selector range enforced by clap");

    let problem =
        read_problem(io::stdin().lock()).context("failed to parse instance from stdin")?;

    // Truncate the log up front so a watcher never sees a stale run.
    let log_file = args.improvement_log.as_ref().map(|path| match File::create(path) {
        Ok(file) => Some(file),
        Err(err) => {
            warn!("cannot open improvement log {}: {err}", path.display());
            None
        }
    });

    let mut config = MultistartConfig::default()
        .with_heuristic(heuristic)
        .with_patience(Duration::from_secs_f64(args.patience))
        .with_threads(args.threads);
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }

    let result = MultistartRunner::run(&problem, &config);

    write_solution(io::stdout().lock(), &result.best).context("failed to write solution")?;

    if let Some(Some(file)) = log_file {
        if let Err(err) = write_improvement_log(BufWriter::new(file), &result.improvements) {
            warn!("dropping improvement log: {err}");
        }
    }

    Ok(())
}
