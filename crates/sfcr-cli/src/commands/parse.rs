//! Parse command - parse a saved answer offline.

use std::fs;
use std::io::Read;
use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::debug;

use sfcr_core::{parse_answer, Schema};

use crate::output::{format_extraction, OutputFormat};

use super::load_config;

/// Arguments for the parse command.
#[derive(Args)]
pub struct ParseArgs {
    /// Answer schema (base, own_funds, scr_breakdown, assets)
    #[arg(short, long)]
    schema: Schema,

    /// Answer text file ("-" reads stdin)
    #[arg(required = true)]
    input: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

pub async fn run(args: ParseArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    let text = if args.input.as_os_str() == "-" {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        if !args.input.exists() {
            anyhow::bail!("Input file not found: {}", args.input.display());
        }
        fs::read_to_string(&args.input)?
    };

    let result = parse_answer(args.schema, &text);
    debug!(
        "Parsed {} answer in {}ms",
        result.schema, result.processing_time_ms
    );

    let output = format_extraction(&result, args.format, &config.report.unavailable_marker)?;
    print!("{}", output);

    if !result.warnings.is_empty() {
        eprintln!(
            "{} {} warning(s)",
            style("⚠").yellow(),
            result.warnings.len()
        );
    }

    Ok(())
}
