//! Ask command - free-form, preset or schema questions about a report.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;

use sfcr_core::service::{guidance, question};
use sfcr_core::{parse_answer, Preset, QuestionAnswering, Schema};

use crate::client::ChatPdfClient;
use crate::output::{format_extraction, OutputFormat};

use super::load_config;

/// Arguments for the ask command.
#[derive(Args)]
pub struct AskArgs {
    /// Input PDF file
    #[arg(required_unless_present = "list_presets")]
    input: Option<PathBuf>,

    /// Free-form question
    #[arg(short, long, conflicts_with_all = ["preset", "schema"])]
    question: Option<String>,

    /// Preset analysis (scr, own_funds, solvency_ratio, mcr, assets)
    #[arg(short, long, conflicts_with = "schema")]
    preset: Option<Preset>,

    /// Ask the numbered question of a schema and parse the answer
    #[arg(short, long)]
    schema: Option<Schema>,

    /// Send schema questions without formatting guidance
    #[arg(long)]
    plain: bool,

    /// List the preset analyses
    #[arg(long)]
    list_presets: bool,
}

pub async fn run(args: AskArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    if args.list_presets {
        for preset in Preset::ALL {
            println!("{:<16} {}", style(preset.key()).cyan(), preset.title());
        }
        return Ok(());
    }

    let Some(ref input) = args.input else {
        anyhow::bail!("An input PDF is required");
    };
    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }

    let config = load_config(config_path)?;
    let (question_text, guidance_text) = question_for(&args, config.extraction.send_guidance)?;

    let client = ChatPdfClient::new(&config.service)?;

    let filename = input
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("document.pdf")
        .to_string();
    let bytes = fs::read(&input)?;

    let handle = client.submit_document(&bytes, &filename).await?;
    let answer = client
        .ask(&handle, &question_text, guidance_text.as_deref())
        .await?;

    println!("{}", style("Réponse :").bold());
    println!("{}", answer);

    if let Some(schema) = args.schema {
        let result = parse_answer(schema, &answer);
        println!();
        print!(
            "{}",
            format_extraction(&result, OutputFormat::Text, &config.report.unavailable_marker)?
        );
    }

    Ok(())
}

/// Question text and optional guidance; only schema questions carry guidance.
fn question_for(args: &AskArgs, send_guidance: bool) -> anyhow::Result<(String, Option<String>)> {
    match (&args.question, args.preset, args.schema) {
        (Some(q), _, _) => Ok((q.clone(), None)),
        (None, Some(preset), _) => Ok((preset.text().to_string(), None)),
        (None, None, Some(schema)) => Ok((
            question(schema),
            (send_guidance && !args.plain).then(|| guidance(schema)),
        )),
        (None, None, None) => anyhow::bail!("Use --question, --preset or --schema"),
    }
}
