//! Process command - extract indicators from a single SFCR report.

use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use sfcr_core::{process_document, BundleStore, ComparisonTable};

use crate::client::ChatPdfClient;
use crate::output::{format_table, OutputFormat};

use super::load_config;

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input PDF file
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Session file the result is added to
    #[arg(long)]
    session: Option<PathBuf>,

    /// Ask the questions without formatting guidance
    #[arg(long)]
    plain: bool,

    /// Show parse warnings
    #[arg(long)]
    show_warnings: bool,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    if args.plain {
        config.extraction.send_guidance = false;
    }

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let filename = args
        .input
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("document.pdf")
        .to_string();

    info!("Processing file: {}", args.input.display());

    let client = ChatPdfClient::new(&config.service)?;
    let bytes = fs::read(&args.input)?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap(),
    );
    pb.set_message(format!("Interrogation du service pour {}", filename));
    pb.enable_steady_tick(Duration::from_millis(120));

    let bundle = match process_document(&client, &bytes, &filename, &config.extraction).await {
        Ok(bundle) => bundle,
        Err(e) => {
            pb.abandon_with_message("Échec");
            anyhow::bail!("Failed to process {}: {}", filename, e);
        }
    };

    pb.finish_and_clear();

    if args.show_warnings && !bundle.warnings.is_empty() {
        eprintln!("{}", style("Avertissements :").yellow());
        for warning in &bundle.warnings {
            eprintln!("  - {}", warning);
        }
    }

    let table = ComparisonTable::from_records(bundle.records.clone(), &config.report);
    let output = format_table(&table, args.format, &config.report)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if let Some(session_path) = &args.session {
        let mut store = if session_path.exists() {
            BundleStore::from_file(session_path)?
        } else {
            BundleStore::new()
        };

        if store.insert(bundle) {
            store.save(session_path)?;
            println!(
                "{} Added to session {}",
                style("✓").green(),
                session_path.display()
            );
        } else {
            println!(
                "{} {} is already in the session",
                style("ℹ").blue(),
                filename
            );
        }
    }

    info!("Done in {:?}", start.elapsed());

    Ok(())
}
