//! Per-document join of the four schema answers.

use tracing::warn;

use crate::models::config::ExtractionConfig;
use crate::models::field::Schema;
use crate::models::record::CompanyRecord;

/// Unified records of one document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Joined {
    /// Primary record first, then any additional base-metrics records.
    pub records: Vec<CompanyRecord>,
    pub warnings: Vec<String>,
}

/// Join per-schema records by company identity.
///
/// The key is the company of the first base-metrics record, or
/// `Société inconnue (<filename>)` when there is none. Breakdown records
/// without a key adopt it; a breakdown carrying another key is discarded,
/// leaving its fields unavailable.
pub fn join(
    base: &[CompanyRecord],
    breakdowns: &[(Schema, Option<&CompanyRecord>)],
    filename: &str,
    config: &ExtractionConfig,
) -> Joined {
    let mut warnings = Vec::new();

    let mut primary = match base.first() {
        Some(rec) if !rec.is_keyless() => CompanyRecord::new(rec.company.clone())
            .with_values(rec.values.restricted_to(Schema::BaseMetrics)),
        _ => CompanyRecord::new(config.unknown_company(filename)),
    };

    for (schema, record) in breakdowns {
        let Some(record) = record else {
            continue;
        };

        if !record.is_keyless() && record.company != primary.company {
            warn!(
                "{} answer of {} names {:?}, expected {:?}; using an empty record",
                schema, filename, record.company, primary.company
            );
            warnings.push(format!(
                "{}: company {:?} does not match {:?}",
                schema, record.company, primary.company
            ));
            continue;
        }

        primary.values.merge(&record.values.restricted_to(*schema));
    }

    let mut records = vec![primary];
    for extra in base.iter().skip(1) {
        let company = if extra.is_keyless() {
            config.unknown_company(filename)
        } else {
            extra.company.clone()
        };
        records.push(
            CompanyRecord::new(company).with_values(extra.values.restricted_to(Schema::BaseMetrics)),
        );
    }

    Joined { records, warnings }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::field::Field;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;

    fn keyed(company: &str, field: Field, value: i64) -> CompanyRecord {
        let mut rec = CompanyRecord::new(company);
        rec.set(field, Some(Decimal::from(value)));
        rec
    }

    fn keyless(field: Field, value: i64) -> CompanyRecord {
        keyed("", field, value)
    }

    #[test]
    fn test_join_same_company() {
        let base = vec![keyed("Acme Re", Field::Scr, 100)];
        let own_funds = keyed("Acme Re", Field::EligibleOwnFunds, 250);
        let scr = keyless(Field::MarketRisk, 60);
        let assets = keyless(Field::Bonds, 1000);

        let joined = join(
            &base,
            &[
                (Schema::OwnFunds, Some(&own_funds)),
                (Schema::ScrBreakdown, Some(&scr)),
                (Schema::Assets, Some(&assets)),
            ],
            "acme.pdf",
            &ExtractionConfig::default(),
        );

        assert_eq!(joined.records.len(), 1);
        let rec = &joined.records[0];
        assert_eq!(rec.company, "Acme Re");
        assert_eq!(rec.get(Field::Scr), Some(Decimal::from(100)));
        assert_eq!(rec.get(Field::EligibleOwnFunds), Some(Decimal::from(250)));
        assert_eq!(rec.get(Field::MarketRisk), Some(Decimal::from(60)));
        assert_eq!(rec.get(Field::Bonds), Some(Decimal::from(1000)));
        assert!(joined.warnings.is_empty());
    }

    #[test]
    fn test_missing_schema_leaves_fields_unavailable() {
        let base = vec![keyed("Acme Re", Field::Scr, 100)];
        let assets = keyless(Field::Bonds, 1000);

        let joined = join(
            &base,
            &[(Schema::OwnFunds, None), (Schema::Assets, Some(&assets))],
            "acme.pdf",
            &ExtractionConfig::default(),
        );

        let rec = &joined.records[0];
        assert_eq!(rec.get(Field::EligibleOwnFunds), None);
        assert_eq!(rec.get(Field::Bonds), Some(Decimal::from(1000)));
    }

    #[test]
    fn test_unknown_company_key() {
        let assets = keyless(Field::Bonds, 10);
        let joined = join(
            &[],
            &[(Schema::Assets, Some(&assets))],
            "rapport.pdf",
            &ExtractionConfig::default(),
        );

        let rec = &joined.records[0];
        assert_eq!(rec.company, "Société inconnue (rapport.pdf)");
        assert_eq!(rec.get(Field::Scr), None);
        assert_eq!(rec.get(Field::Bonds), Some(Decimal::from(10)));
    }

    #[test]
    fn test_mismatched_key_is_replaced() {
        let base = vec![keyed("Acme Re", Field::Scr, 100)];
        let other = keyed("Other SA", Field::EligibleOwnFunds, 5);

        let joined = join(
            &base,
            &[(Schema::OwnFunds, Some(&other))],
            "acme.pdf",
            &ExtractionConfig::default(),
        );

        assert_eq!(joined.records[0].get(Field::EligibleOwnFunds), None);
        assert_eq!(joined.warnings.len(), 1);
    }

    #[test]
    fn test_extra_base_records_become_rows() {
        let base = vec![keyed("Alpha", Field::Scr, 1), keyed("Beta", Field::Scr, 2)];
        let scr = keyless(Field::MarketRisk, 60);

        let joined = join(
            &base,
            &[(Schema::ScrBreakdown, Some(&scr))],
            "groupe.pdf",
            &ExtractionConfig::default(),
        );

        assert_eq!(joined.records.len(), 2);
        assert_eq!(joined.records[1].company, "Beta");
        assert_eq!(joined.records[1].get(Field::Scr), Some(Decimal::from(2)));
        assert_eq!(joined.records[1].get(Field::MarketRisk), None);
    }
}
