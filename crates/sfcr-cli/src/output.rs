//! Rendering of records, comparison tables and statistics.

use rust_decimal::Decimal;
use serde_json::json;

use sfcr_core::aggregate::{scr_shares, ExportSheet, FieldStatistics};
use sfcr_core::extraction::rules::format_french_amount;
use sfcr_core::models::config::ReportConfig;
use sfcr_core::models::field::UnitClass;
use sfcr_core::{CompanyRecord, ComparisonTable, ExtractionResult, Field, StatisticsTable};

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

/// Human-readable value with its unit.
pub fn display_value(field: Field, value: Decimal) -> String {
    match field.unit() {
        UnitClass::Percentage => format!("{} %", format_french_amount(value)),
        _ => format!("{} €", format_french_amount(value)),
    }
}

pub fn format_table(
    table: &ComparisonTable,
    format: OutputFormat,
    config: &ReportConfig,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(table)?),
        OutputFormat::Csv => records_csv(table.rows(), &config.unavailable_marker),
        OutputFormat::Text => Ok(table_text(table, &config.unavailable_marker)),
    }
}

/// One row per record, one column per field.
pub fn records_csv<'a>(
    records: impl IntoIterator<Item = &'a CompanyRecord>,
    unavailable: &str,
) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(Field::ALL.iter().map(|f| f.label()))?;
    for record in records {
        wtr.write_record(Field::ALL.iter().map(|f| record.cell(*f, unavailable)))?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn record_text(
    record: &CompanyRecord,
    fields: impl IntoIterator<Item = Field>,
    unavailable: &str,
    output: &mut String,
) {
    // An empty marker keeps CSV cells blank but would hide the row here.
    let unavailable = if unavailable.is_empty() { "-" } else { unavailable };

    output.push_str(&format!("{}\n", record.company));

    for field in fields {
        let shown = record
            .get(field)
            .map(|value| display_value(field, value))
            .unwrap_or_else(|| unavailable.to_string());
        output.push_str(&format!("  {:<45} {:>24}\n", field.label(), shown));
    }

    let shares = scr_shares(record);
    if !shares.is_empty() {
        output.push_str("  Répartition du SCR :\n");
        for share in shares {
            output.push_str(&format!(
                "    {:<43} {:>8} %\n",
                share.field.label(),
                format_french_amount(share.percent)
            ));
        }
    }
}

fn table_text(table: &ComparisonTable, unavailable: &str) -> String {
    let mut output = String::new();

    for record in table.rows() {
        record_text(record, Field::numeric(), unavailable, &mut output);
        output.push('\n');
    }

    output
}

pub fn format_statistics(stats: &StatisticsTable, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(stats)?),
        OutputFormat::Csv => statistics_csv(stats),
        OutputFormat::Text => Ok(statistics_text(stats)),
    }
}

const STATISTICS_HEADER: [&str; 6] = ["Métrique", "Moyenne", "Médiane", "Écart-type", "Minimum", "Maximum"];

fn statistic_values(row: &FieldStatistics) -> [Option<Decimal>; 5] {
    [row.mean, row.median, row.std_dev, row.min, row.max]
}

pub fn statistics_csv(stats: &StatisticsTable) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(STATISTICS_HEADER)?;
    for row in &stats.rows {
        let mut cells = vec![row.field.label().to_string()];
        cells.extend(
            statistic_values(row)
                .into_iter()
                .map(|v| v.map(|d| d.round_dp(2).normalize().to_string()).unwrap_or_default()),
        );
        wtr.write_record(&cells)?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn statistics_text(stats: &StatisticsTable) -> String {
    let mut output = String::new();

    for row in &stats.rows {
        output.push_str(&format!("{} ({} valeur(s))\n", row.field.label(), row.count));
        for (name, value) in STATISTICS_HEADER[1..].iter().zip(statistic_values(row)) {
            let shown = value
                .map(|v| display_value(row.field, v))
                .unwrap_or_else(|| "-".to_string());
            output.push_str(&format!("  {:<12} {:>24}\n", name, shown));
        }
    }

    output
}

/// Transposed sheet: one row per metric, one column per company.
pub fn sheet_csv(sheet: &ExportSheet) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    let mut header = vec!["Métrique".to_string()];
    header.extend(sheet.companies.iter().cloned());
    wtr.write_record(&header)?;

    for (field, cells) in &sheet.rows {
        let mut row = vec![field.label().to_string()];
        row.extend(cells.iter().cloned());
        wtr.write_record(&row)?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

/// Parse result of a single answer.
pub fn format_extraction(
    result: &ExtractionResult,
    format: OutputFormat,
    unavailable: &str,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => {
            let tiers: serde_json::Map<String, serde_json::Value> = result
                .tiers
                .iter()
                .map(|(field, tier)| (field.key().to_string(), json!(tier)))
                .collect();
            let value = json!({
                "schema": result.schema,
                "records": result.records,
                "warnings": result.warnings,
                "tiers": tiers,
            });
            Ok(serde_json::to_string_pretty(&value)?)
        }
        OutputFormat::Csv => records_csv(&result.records, unavailable),
        OutputFormat::Text => {
            let mut output = String::new();
            if result.records.is_empty() {
                output.push_str("Aucun enregistrement trouvé\n");
            }
            for record in &result.records {
                let mut named = record.clone();
                if named.is_keyless() {
                    named.company = format!("[{}]", result.schema);
                }
                let fields = result.schema.fields().filter(|f| f.unit() != UnitClass::Text);
                record_text(&named, fields, unavailable, &mut output);
            }
            for warning in &result.warnings {
                output.push_str(&format!("! {}\n", warning));
            }
            Ok(output)
        }
    }
}
