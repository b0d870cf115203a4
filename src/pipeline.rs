//! End-to-end run over one document snapshot.
//!
//! Stages run in batch: extraction, normalization, validation, aggregation,
//! then rendering. Every artifact is rendered in memory before the output
//! directory is touched, so a run that fails early leaves nothing behind.

use crate::error::{PipelineError, Result};
use crate::export::{write_csv, write_json, Metadata};
use crate::extract::CardSelectors;
use crate::normalize::{normalize, Product};
use crate::report::{compute_stats, render_summary};
use crate::runlog::{format_timestamp, utc_now, RunLog};
use crate::validate::partition_valid;
use log::{debug, info};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

/// Structured output file name.
pub const JSON_FILE: &str = "output.json";
/// Tabular output file name.
pub const CSV_FILE: &str = "output.csv";
/// Summary file name.
pub const SUMMARY_FILE: &str = "summary.txt";
/// Audit log file name.
pub const LOG_FILE: &str = "run.log";

/// Settings for one run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// HTML snapshot to read.
    pub input: PathBuf,
    /// Directory receiving the four output files; created if absent.
    pub outdir: PathBuf,
    /// Use wall-clock timestamps instead of the fixed deterministic one.
    pub realtime: bool,
}

/// Counts and resolved output location of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub extracted: usize,
    pub valid: usize,
    pub invalid: usize,
    pub outdir: PathBuf,
}

/// Lowercase hex SHA-256 of the document text.
pub fn content_fingerprint(text: &str) -> String {
    hex::encode(Sha256::digest(text.as_bytes()))
}

/// Runs the whole pipeline and writes `output.json`, `output.csv`,
/// `summary.txt` and `run.log` into `config.outdir`.
///
/// # Errors
///
/// Fails if the input is missing or unreadable, or if any output cannot be
/// written. Record-level problems never fail the run.
pub fn run_pipeline(config: &RunConfig) -> Result<RunSummary> {
    if !config.input.exists() {
        return Err(PipelineError::InputNotFound(config.input.clone()));
    }
    let input = fs::canonicalize(&config.input).map_err(|source| PipelineError::Read {
        path: config.input.clone(),
        source,
    })?;
    let outdir = std::path::absolute(&config.outdir)?;

    let mut run_log = RunLog::new(config.realtime);
    run_log.start(&input, &outdir);

    let html = fs::read_to_string(&input).map_err(|source| PipelineError::Read {
        path: input.clone(),
        source,
    })?;
    let input_sha256 = content_fingerprint(&html);
    debug!("Read {} bytes from {} ({})", html.len(), input.display(), input_sha256);

    let raw_records = CardSelectors::new()?.extract(&html);
    let extracted = raw_records.len();
    run_log.info(&format!("extracted_cards={extracted}"));

    let products: Vec<Product> = raw_records.iter().map(normalize).collect();
    let partition = partition_valid(products);
    let valid = partition.valid.len();
    let invalid = partition.invalid.len();
    info!("Extracted {extracted} products: {valid} valid, {invalid} invalid");

    run_log.counts(extracted, valid, invalid);
    run_log.validation_errors(
        partition
            .invalid
            .iter()
            .map(|e| (e.id.as_str(), e.errors.as_slice())),
    );

    let timestamp_utc = format_timestamp(utc_now(config.realtime));

    let mut meta = Metadata::new();
    meta.insert(
        "input_path".to_string(),
        Value::from(input.display().to_string()),
    );
    meta.insert("input_sha256".to_string(), Value::from(input_sha256));
    meta.insert("timestamp_utc".to_string(), Value::from(timestamp_utc.clone()));
    meta.insert("deterministic".to_string(), Value::Bool(!config.realtime));

    let mut json_out = Vec::new();
    write_json(&mut json_out, &partition.valid, &partition.invalid, &meta)?;

    let mut csv_out = Vec::new();
    write_csv(&mut csv_out, &partition.valid)?;

    let stats = compute_stats(extracted, &partition.valid, invalid);
    let summary = render_summary(&timestamp_utc, &stats);

    run_log.end();

    fs::create_dir_all(&outdir).map_err(|source| PipelineError::Write {
        path: outdir.clone(),
        source,
    })?;
    write_file(&outdir.join(JSON_FILE), &json_out)?;
    write_file(&outdir.join(CSV_FILE), &csv_out)?;
    write_file(&outdir.join(SUMMARY_FILE), summary.as_bytes())?;
    write_file(&outdir.join(LOG_FILE), run_log.render().as_bytes())?;
    debug!("Wrote outputs to {}", outdir.display());

    Ok(RunSummary {
        extracted,
        valid,
        invalid,
        outdir,
    })
}

fn write_file(path: &Path, contents: &[u8]) -> Result<()> {
    fs::write(path, contents).map_err(|source| PipelineError::Write {
        path: path.to_path_buf(),
        source,
    })
}
