//! Batch command - extract one document type across a directory tree.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use futures_util::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use scavenger_core::{apply_split_rules, collect_files, FieldExtractor, FieldMap};

use super::{find_profile, load_config, DEFAULT_PROFILE};
use crate::output::write_csv;

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Document profile to run
    #[arg(short, long, default_value = DEFAULT_PROFILE)]
    profile: String,

    /// Directory to search (default: the profile's directory under source_root)
    #[arg(short, long)]
    root: Option<PathBuf>,

    /// Output CSV file (default: the profile's output file in output_dir)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also write a per-file status CSV next to the output
    #[arg(long)]
    summary: bool,

    /// Number of parallel workers
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Stop at the first file that fails
    #[arg(long)]
    fail_fast: bool,
}

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    fields: Option<FieldMap>,
    error: Option<String>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;
    let profile = find_profile(&config, &args.profile)?;

    let root = args
        .root
        .clone()
        .unwrap_or_else(|| profile.source_dir(&config.source_root));
    if !root.is_dir() {
        anyhow::bail!("Source directory not found: {}", root.display());
    }

    let files = collect_files(&root, &profile.scan)?;
    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    let output_path = args
        .output
        .clone()
        .unwrap_or_else(|| config.output_dir.join(&profile.output_file));
    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let progress = ProgressBar::new(files.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let extractor = Arc::new(profile.extractor()?);
    let sheets = Arc::new(profile.sheet_candidates.clone());

    let mut pending = stream::iter(files)
        .map(|path| process_single_file(path, Arc::clone(&extractor), Arc::clone(&sheets)))
        .buffered(args.jobs.max(1));

    let mut results = Vec::new();
    while let Some(mut result) = pending.next().await {
        progress.inc(1);

        match (&mut result.fields, &result.error) {
            (Some(fields), _) => apply_split_rules(fields, &profile.split_fields),
            (None, Some(message)) if args.fail_fast => {
                progress.abandon();
                error!("Failed to process {}: {}", result.path.display(), message);
                anyhow::bail!("Processing failed: {}", message);
            }
            (None, message) => {
                warn!(
                    "Failed to process {}: {}",
                    result.path.display(),
                    message.as_deref().unwrap_or("unknown error")
                );
            }
        }
        results.push(result);
    }

    progress.finish_with_message("Complete");

    let records: Vec<FieldMap> = results.iter().filter_map(|r| r.fields.clone()).collect();
    let columns = profile.output_columns();
    write_csv(fs::File::create(&output_path)?, &columns, &records)?;
    debug!("Wrote {} rows to {}", records.len(), output_path.display());

    if args.summary {
        let summary_path = output_path.with_file_name("summary.csv");
        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(records.len()).green(),
        style(failed.len()).red()
    );
    println!(
        "{} Output written to {}",
        style("✓").green(),
        output_path.display()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

/// Extract one file on the blocking pool.
async fn process_single_file(
    path: PathBuf,
    extractor: Arc<FieldExtractor>,
    sheets: Arc<Vec<String>>,
) -> ProcessResult {
    let file_start = Instant::now();
    let task_path = path.clone();

    let outcome = tokio::task::spawn_blocking(move || extractor.extract_file(&task_path, sheets.as_slice()))
        .await
        .map_err(|e| e.to_string())
        .and_then(|result| result.map_err(|e| e.to_string()));

    let processing_time_ms = file_start.elapsed().as_millis() as u64;
    match outcome {
        Ok(fields) => ProcessResult {
            path,
            fields: Some(fields),
            error: None,
            processing_time_ms,
        },
        Err(message) => ProcessResult {
            path,
            fields: None,
            error: Some(message),
            processing_time_ms,
        },
    }
}

fn write_summary(path: &Path, results: &[ProcessResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record(["path", "status", "fields", "processing_time_ms", "error"])?;

    for result in results {
        let path = result.path.display().to_string();
        let time = result.processing_time_ms.to_string();

        match &result.fields {
            Some(fields) => {
                wtr.write_record([path.as_str(), "success", &fields.len().to_string(), &time, ""])?;
            }
            None => {
                wtr.write_record([
                    path.as_str(),
                    "error",
                    "",
                    &time,
                    result.error.as_deref().unwrap_or(""),
                ])?;
            }
        }
    }

    wtr.flush()?;
    Ok(())
}
