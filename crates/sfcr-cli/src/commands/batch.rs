//! Batch command - compare several SFCR reports.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, warn};

use sfcr_core::aggregate::ExportView;
use sfcr_core::models::config::SfcrConfig;
use sfcr_core::pipeline::Ingest;
use sfcr_core::{ingest, BatchReport, BundleStore, ComparisonTable};

use crate::client::ChatPdfClient;
use crate::output::{format_statistics, format_table, sheet_csv, statistics_csv, OutputFormat};

use super::load_config;

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input glob pattern (e.g. "rapports/*.pdf")
    #[arg(required = true)]
    input: String,

    /// Directory receiving one CSV per sheet, the statistics and a JSON dump
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Console output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Session file; documents already in it are not processed again
    #[arg(long)]
    session: Option<PathBuf>,

    /// Empty the session before processing
    #[arg(long)]
    reset: bool,

    /// Ask the questions without formatting guidance
    #[arg(long)]
    plain: bool,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    if args.plain {
        config.extraction.send_guidance = false;
    }

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(e) => {
                warn!("Skipping {}: {}", e.path().display(), e.error());
                None
            }
        })
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    let mut store = match &args.session {
        Some(path) if path.exists() && !args.reset => BundleStore::from_file(path)?,
        _ => BundleStore::new(),
    };
    if args.reset {
        println!("{} Session reset", style("ℹ").blue());
    }

    let client = ChatPdfClient::new(&config.service)?;

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("=>-"),
    );

    let mut report = BatchReport::default();

    for path in &files {
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        pb.set_message(filename.clone());

        let outcome = ingest(
            &mut store,
            &client,
            &filename,
            || fs::read(path),
            &config.extraction,
        )
        .await;

        match &outcome {
            Ok(Ingest::Processed) => {
                if let Some(session_path) = &args.session {
                    store.save(session_path)?;
                }
            }
            Ok(Ingest::Skipped) => debug!("{} already in session", filename),
            Err(e) => warn!("Failed to process {}: {}", filename, e),
        }

        report.record(&filename, outcome);
        pb.inc(1);
    }

    pb.finish_with_message("Complete");

    if let Some(session_path) = &args.session {
        store.save(session_path)?;
    }

    let table = ComparisonTable::build(&store, None, &config.report);
    let stats = table.statistics(&config.report.statistics_fields);

    if !table.is_empty() {
        println!();
        println!("{}", format_table(&table, args.format, &config.report)?);
        println!("{}", format_statistics(&stats, args.format)?);
    }

    if let Some(output_dir) = &args.output_dir {
        write_outputs(output_dir, &table, &config)?;
        println!(
            "{} Outputs written to {}",
            style("✓").green(),
            output_dir.display()
        );
    }

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        files.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} skipped, {} failed",
        style(report.processed.len()).green(),
        style(report.skipped.len()).blue(),
        style(report.failed.len()).red()
    );

    if report.has_failures() {
        println!();
        println!("{}", style("Failed files:").red());
        for (filename, error) in &report.failed {
            println!("  - {}: {}", filename, error);
        }
    }

    Ok(())
}

fn write_outputs(output_dir: &Path, table: &ComparisonTable, config: &SfcrConfig) -> anyhow::Result<()> {
    fs::create_dir_all(output_dir)?;

    for view in ExportView::ALL {
        let sheet = table.export(view, &config.report.unavailable_marker);
        let path = output_dir.join(format!("{}.csv", view.file_stem()));
        fs::write(&path, sheet_csv(&sheet)?)?;
        debug!("Wrote sheet {} to {}", sheet.name, path.display());
    }

    let stats = table.statistics(&config.report.statistics_fields);
    fs::write(output_dir.join("statistiques.csv"), statistics_csv(&stats)?)?;

    fs::write(
        output_dir.join("comparaison.json"),
        serde_json::to_string_pretty(table)?,
    )?;

    Ok(())
}
