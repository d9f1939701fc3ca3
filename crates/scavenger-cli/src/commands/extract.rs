//! Extract command - pull fields out of a single spreadsheet.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use scavenger_core::{apply_split_rules, DocumentProfile};

use super::{find_profile, load_config, DEFAULT_PROFILE};
use crate::output::{format_fields, OutputFormat};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input spreadsheet
    #[arg(required = true)]
    input: PathBuf,

    /// Document profile supplying labels, sheets, and boundary
    #[arg(short, long)]
    profile: Option<String>,

    /// Label group to look for; separate synonyms with '|' (replaces the profile's labels)
    #[arg(short, long = "label")]
    labels: Vec<String>,

    /// Preferred sheet name (repeatable)
    #[arg(short, long = "sheet")]
    sheets: Vec<String>,

    /// Column-1 marker that starts the rows to scan
    #[arg(short, long)]
    boundary: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let profile = build_profile(&args, || {
        find_profile(&config, args.profile.as_deref().unwrap_or(DEFAULT_PROFILE))
    })?;

    info!("Processing file: {}", args.input.display());

    let extractor = profile.extractor()?;
    let mut fields = extractor.extract_file(&args.input, &profile.sheet_candidates)?;
    apply_split_rules(&mut fields, &profile.split_fields);

    let output = format_fields(&fields, args.format, &profile.output_columns())?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output.trim_end());
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Start from the named profile and apply command-line overrides.
///
/// Explicit labels without a named profile build an ad-hoc profile, so the
/// default profile's sheets and boundary do not leak into it.
fn build_profile<F>(args: &ExtractArgs, named: F) -> anyhow::Result<DocumentProfile>
where
    F: FnOnce() -> anyhow::Result<DocumentProfile>,
{
    let mut profile = if !args.labels.is_empty() && args.profile.is_none() {
        DocumentProfile {
            name: "adhoc".to_string(),
            ..DocumentProfile::default()
        }
    } else {
        named()?
    };

    if !args.labels.is_empty() {
        profile.label_groups = args
            .labels
            .iter()
            .map(|group| group.split('|').map(|label| label.to_string()).collect())
            .collect();
        profile.split_fields.clear();
    }
    if !args.sheets.is_empty() {
        profile.sheet_candidates = args.sheets.clone();
    }
    if args.boundary.is_some() {
        profile.boundary_condition = args.boundary.clone();
    }

    Ok(profile)
}
