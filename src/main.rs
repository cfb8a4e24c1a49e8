use anyhow::{bail, Context, Result};
use clap::Parser;
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use stn_partition::{legacy, partition, RetainPercent};

/// Turn trajectories of binary solutions into a search trajectory network edge table.
#[derive(Parser)]
#[command(name = "stn-partition")]
struct Cli {
    /// Percentage of bit positions to keep when coarsening (0 keeps whole solutions)
    #[arg(short = 'c', long, default_value = "0")]
    retain_percent: RetainPercent,

    /// File whose solutions form the reference pool (repeatable)
    #[arg(long)]
    pool: Vec<PathBuf>,

    /// Input lists one `run fitness solution` observation per line, in the old format.
    ///
    /// Unlike older tools, conversion is not automatic: without this flag, old-format lines have
    /// the wrong number of fields and are dropped.
    #[arg(long)]
    legacy: bool,

    /// Trajectory file (defaults to standard input)
    input: Option<PathBuf>,
}

fn read_lines(path: Option<&Path>) -> Result<Vec<String>> {
    let text = match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => io::read_to_string(io::stdin().lock()).context("failed to read standard input")?,
    };
    Ok(text
        .lines()
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut trajectory = read_lines(cli.input.as_deref())?;
    if cli.legacy {
        trajectory = legacy::upgrade(&trajectory);
    }
    if legacy::looks_discrete(&trajectory) == Some(false) {
        bail!("input does not contain binary solutions; only discrete problems are supported");
    }

    let mut pool = Vec::new();
    for path in &cli.pool {
        let lines = read_lines(Some(path.as_path()))?;
        if cli.legacy {
            pool.extend(legacy::upgrade(&lines));
        } else {
            pool.extend(lines);
        }
    }

    let table = partition(&trajectory, &pool, cli.retain_percent)?;

    let mut out = BufWriter::new(io::stdout().lock());
    for row in &table {
        writeln!(out, "{}", row)?;
    }
    out.flush()?;
    Ok(())
}
