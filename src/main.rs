//! Listing Pipeline CLI
//!
//! Reads a saved HTML listing page and writes `output.json`, `output.csv`,
//! `summary.txt` and `run.log` into the output directory.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- --input fixtures/page.html --outdir out/
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug` or `info` to control logging verbosity

use clap::Parser;
use listing_pipeline::{run_pipeline, Result, RunConfig};
use std::path::PathBuf;
use std::process;

/// Offline HTML data extraction pipeline with deterministic outputs.
#[derive(Debug, Parser)]
#[command(name = "listing-pipeline", version)]
struct Cli {
    /// Path to the local HTML file.
    #[arg(long)]
    input: PathBuf,

    /// Output directory.
    #[arg(long)]
    outdir: PathBuf,

    /// Use real UTC timestamps in summary and log (breaks strict determinism).
    #[arg(long)]
    realtime: bool,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = RunConfig {
        input: cli.input,
        outdir: cli.outdir,
        realtime: cli.realtime,
    };

    let summary = run_pipeline(&config)?;
    println!(
        "OK extracted={} outdir={}",
        summary.extracted,
        summary.outdir.display()
    );

    Ok(())
}
