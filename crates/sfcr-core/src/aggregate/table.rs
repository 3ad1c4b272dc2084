//! Comparison table, export views and SCR composition.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use tracing::warn;

use crate::models::bundle::BundleStore;
use crate::models::config::ReportConfig;
use crate::models::field::{Field, Schema};
use crate::models::record::{CompanyRecord, FieldValues};

use super::stats::{mean, StatisticsTable};

/// Company records of selected documents plus a synthetic average row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonTable {
    records: Vec<CompanyRecord>,
    average: CompanyRecord,
}

impl ComparisonTable {
    /// Build from the store. `selection` lists filenames; `None` takes every
    /// bundle in store order. Unknown filenames are skipped.
    pub fn build(store: &BundleStore, selection: Option<&[String]>, config: &ReportConfig) -> Self {
        let records = match selection {
            Some(names) => names
                .iter()
                .filter_map(|name| {
                    let bundle = store.get(name);
                    if bundle.is_none() {
                        warn!("No processed document named {}", name);
                    }
                    bundle
                })
                .flat_map(|b| b.records.iter().cloned())
                .collect(),
            None => store.iter().flat_map(|b| b.records.iter().cloned()).collect(),
        };

        Self::from_records(records, config)
    }

    pub fn from_records(records: Vec<CompanyRecord>, config: &ReportConfig) -> Self {
        let average = average_record(&records, &config.average_label);
        Self { records, average }
    }

    /// Company rows, average excluded.
    pub fn records(&self) -> &[CompanyRecord] {
        &self.records
    }

    pub fn average(&self) -> &CompanyRecord {
        &self.average
    }

    /// Every row for display; the average is always last.
    pub fn rows(&self) -> impl Iterator<Item = &CompanyRecord> {
        self.records.iter().chain(std::iter::once(&self.average))
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Statistics over the company rows only.
    pub fn statistics(&self, fields: &[Field]) -> StatisticsTable {
        StatisticsTable::compute(&self.records, fields)
    }

    /// Transposed metric x company sheet, average excluded.
    pub fn export(&self, view: ExportView, unavailable: &str) -> ExportSheet {
        let companies = self.records.iter().map(|r| r.company.clone()).collect();
        let rows = view
            .fields()
            .into_iter()
            .map(|field| {
                let cells = self.records.iter().map(|r| r.cell(field, unavailable)).collect();
                (field, cells)
            })
            .collect();

        ExportSheet {
            name: view.sheet_name(),
            companies,
            rows,
        }
    }
}

/// Mean of every numeric field, rounded to cents (half to even).
fn average_record(records: &[CompanyRecord], label: &str) -> CompanyRecord {
    let values: FieldValues = Field::numeric()
        .filter_map(|field| {
            let available: Vec<Decimal> = records.iter().filter_map(|r| r.get(field)).collect();
            let avg = mean(&available)?;
            Some((field, avg.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven)))
        })
        .collect();

    CompanyRecord::new(label).with_values(values)
}

/// Thematic export sheets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportView {
    Data,
    OwnFunds,
    Scr,
    Assets,
}

impl ExportView {
    pub const ALL: [ExportView; 4] = [
        ExportView::Data,
        ExportView::OwnFunds,
        ExportView::Scr,
        ExportView::Assets,
    ];

    pub fn sheet_name(self) -> &'static str {
        match self {
            ExportView::Data => "Données",
            ExportView::OwnFunds => "Fonds propres",
            ExportView::Scr => "SCR",
            ExportView::Assets => "Actifs",
        }
    }

    /// File stem used when writing one file per sheet.
    pub fn file_stem(self) -> &'static str {
        match self {
            ExportView::Data => "donnees",
            ExportView::OwnFunds => "fonds_propres",
            ExportView::Scr => "scr",
            ExportView::Assets => "actifs",
        }
    }

    /// Metric rows of the sheet, in order.
    pub fn fields(self) -> Vec<Field> {
        match self {
            ExportView::Data => Field::numeric().collect(),
            ExportView::OwnFunds => Schema::OwnFunds.fields().collect(),
            ExportView::Scr => Schema::BaseMetrics
                .fields()
                .chain(Schema::ScrBreakdown.fields())
                .filter(|f| *f != Field::Company)
                .collect(),
            ExportView::Assets => Schema::Assets.fields().collect(),
        }
    }
}

/// One transposed sheet: a row per metric, a column per company.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportSheet {
    pub name: &'static str,
    pub companies: Vec<String>,
    pub rows: Vec<(Field, Vec<String>)>,
}

/// Share of one SCR risk submodule.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScrShare {
    pub field: Field,
    pub amount: Decimal,
    /// Share of the submodule total, in percent.
    pub percent: Decimal,
}

/// Composition of a record's SCR over its available, strictly positive
/// risk submodules. The diversification effect is left out.
pub fn scr_shares(record: &CompanyRecord) -> Vec<ScrShare> {
    let parts: Vec<(Field, Decimal)> = Field::RISK_MODULES
        .into_iter()
        .filter_map(|f| record.get(f).map(|v| (f, v)))
        .filter(|(_, v)| v.is_sign_positive() && !v.is_zero())
        .collect();

    let Some(total) = parts.iter().try_fold(Decimal::ZERO, |acc, (_, v)| acc.checked_add(*v)) else {
        return Vec::new();
    };
    if total.is_zero() {
        return Vec::new();
    }

    parts
        .into_iter()
        .filter_map(|(field, amount)| {
            let percent = amount
                .checked_mul(Decimal::ONE_HUNDRED)?
                .checked_div(total)?
                .round_dp(2);
            Some(ScrShare { field, amount, percent })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::bundle::{DocumentBundle, DocumentHandle};
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn record(company: &str, scr: Option<&str>, ratio: Option<&str>) -> CompanyRecord {
        let mut rec = CompanyRecord::new(company);
        rec.set(Field::Scr, scr.map(dec));
        rec.set(Field::SolvencyRatio, ratio.map(dec));
        rec
    }

    fn store() -> BundleStore {
        let mut store = BundleStore::new();
        for (file, rec) in [
            ("a.pdf", record("Alpha", Some("100"), Some("150.125"))),
            ("b.pdf", record("Beta", Some("200"), Some("210.135"))),
            ("c.pdf", record("Gamma", None, None)),
        ] {
            store.insert(DocumentBundle::new(DocumentHandle::new(file), file, vec![rec]));
        }
        store
    }

    #[test]
    fn test_average_row_is_last_and_rounded() {
        let table = ComparisonTable::build(&store(), None, &ReportConfig::default());

        let names: Vec<&str> = table.rows().map(|r| r.company.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Beta", "Gamma", "Moyenne"]);
        assert_eq!(table.average().get(Field::Scr), Some(dec("150")));
        // (150.125 + 210.135) / 2 = 180.13
        assert_eq!(table.average().get(Field::SolvencyRatio), Some(dec("180.13")));
        assert_eq!(table.average().get(Field::Mcr), None);
    }

    #[test]
    fn test_statistics_exclude_average_row() {
        let records = store().iter().flat_map(|b| b.records.clone()).collect::<Vec<_>>();
        let before = StatisticsTable::compute(&records, &[Field::Scr, Field::SolvencyRatio]);

        let table = ComparisonTable::from_records(records, &ReportConfig::default());
        let after = table.statistics(&[Field::Scr, Field::SolvencyRatio]);

        assert_eq!(before, after);
        assert_eq!(after.get(Field::Scr).unwrap().count, 2);
    }

    #[test]
    fn test_selection() {
        let selection = vec!["b.pdf".to_string(), "missing.pdf".to_string()];
        let table = ComparisonTable::build(&store(), Some(&selection), &ReportConfig::default());

        assert_eq!(table.records().len(), 1);
        assert_eq!(table.records()[0].company, "Beta");
    }

    #[test]
    fn test_export_view_is_transposed() {
        let table = ComparisonTable::build(&store(), None, &ReportConfig::default());
        let sheet = table.export(ExportView::Scr, "n/d");

        assert_eq!(sheet.name, "SCR");
        assert_eq!(sheet.companies, vec!["Alpha", "Beta", "Gamma"]);
        assert_eq!(sheet.rows.len(), 10);
        assert_eq!(sheet.rows[0].0, Field::Scr);
        assert_eq!(sheet.rows[0].1, vec!["100", "200", "n/d"]);
    }

    #[test]
    fn test_export_view_fields() {
        assert_eq!(ExportView::Data.fields().len(), 24);
        assert_eq!(ExportView::OwnFunds.fields().len(), 5);
        assert_eq!(ExportView::Assets.fields()[0], Field::TotalAssets);
    }

    #[test]
    fn test_scr_shares() {
        let mut rec = CompanyRecord::new("Acme Re");
        rec.set(Field::MarketRisk, Some(dec("300")));
        rec.set(Field::CounterpartyRisk, Some(dec("100")));
        rec.set(Field::OperationalRisk, Some(dec("0")));
        rec.set(Field::DiversificationEffect, Some(dec("-80")));

        let shares = scr_shares(&rec);
        assert_eq!(shares.len(), 2);
        assert_eq!(shares[0].field, Field::MarketRisk);
        assert_eq!(shares[0].percent, dec("75"));
        assert_eq!(shares[1].percent, dec("25"));

        assert!(scr_shares(&CompanyRecord::new("Vide")).is_empty());
    }
}
