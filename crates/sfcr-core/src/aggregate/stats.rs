//! Cross-document statistics over available values.

use rust_decimal::{Decimal, MathematicalOps};
use serde::Serialize;

use crate::models::field::{Field, UnitClass};
use crate::models::record::CompanyRecord;

/// Statistics of one field. Every statistic is `None` when no value is available.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldStatistics {
    pub field: Field,
    /// Number of available values.
    pub count: usize,
    pub mean: Option<Decimal>,
    pub median: Option<Decimal>,
    /// Sample standard deviation (n - 1); `None` below two values.
    pub std_dev: Option<Decimal>,
    pub min: Option<Decimal>,
    pub max: Option<Decimal>,
}

impl FieldStatistics {
    pub fn compute<'a>(field: Field, records: impl IntoIterator<Item = &'a CompanyRecord>) -> Self {
        let values: Vec<Decimal> = records.into_iter().filter_map(|r| r.get(field)).collect();

        Self {
            field,
            count: values.len(),
            mean: mean(&values),
            median: median(&values),
            std_dev: sample_std_dev(&values),
            min: values.iter().min().copied(),
            max: values.iter().max().copied(),
        }
    }
}

/// Statistics table, one row per field.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatisticsTable {
    pub rows: Vec<FieldStatistics>,
}

impl StatisticsTable {
    pub fn compute(records: &[CompanyRecord], fields: &[Field]) -> Self {
        Self {
            rows: fields
                .iter()
                .filter(|f| f.unit() != UnitClass::Text)
                .map(|f| FieldStatistics::compute(*f, records))
                .collect(),
        }
    }

    pub fn get(&self, field: Field) -> Option<&FieldStatistics> {
        self.rows.iter().find(|r| r.field == field)
    }
}

/// Arithmetic mean.
pub fn mean(values: &[Decimal]) -> Option<Decimal> {
    if values.is_empty() {
        return None;
    }

    let sum = values
        .iter()
        .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(*v))?;
    sum.checked_div(Decimal::from(values.len()))
}

pub fn median(values: &[Decimal]) -> Option<Decimal> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort();
    let mid = sorted.len() / 2;

    if sorted.len() % 2 == 1 {
        Some(sorted[mid])
    } else {
        sorted[mid - 1]
            .checked_add(sorted[mid])?
            .checked_div(Decimal::TWO)
    }
}

/// Sample standard deviation, `None` for fewer than two values.
pub fn sample_std_dev(values: &[Decimal]) -> Option<Decimal> {
    if values.len() < 2 {
        return None;
    }

    let avg = mean(values)?;
    let squares = values.iter().try_fold(Decimal::ZERO, |acc, v| {
        let diff = v.checked_sub(avg)?;
        acc.checked_add(diff.checked_mul(diff)?)
    })?;

    squares
        .checked_div(Decimal::from(values.len() - 1))?
        .sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(scr: Option<i64>) -> CompanyRecord {
        let mut rec = CompanyRecord::new("X");
        rec.set(Field::Scr, scr.map(Decimal::from));
        rec
    }

    #[test]
    fn test_statistics_skip_unavailable() {
        let records = vec![record(Some(100)), record(Some(200)), record(None)];
        let stats = FieldStatistics::compute(Field::Scr, &records);

        assert_eq!(stats.count, 2);
        assert_eq!(stats.mean, Some(Decimal::from(150)));
        assert_eq!(stats.median, Some(Decimal::from(150)));
        assert_eq!(stats.min, Some(Decimal::from(100)));
        assert_eq!(stats.max, Some(Decimal::from(200)));

        // sqrt(5000) ~ 70.71
        let std_dev = stats.std_dev.unwrap();
        assert_eq!(std_dev.round_dp(2), Decimal::new(7071, 2));
    }

    #[test]
    fn test_all_unavailable() {
        let records = vec![record(None), record(None)];
        let stats = FieldStatistics::compute(Field::Scr, &records);

        assert_eq!(stats.count, 0);
        assert_eq!(stats.mean, None);
        assert_eq!(stats.median, None);
        assert_eq!(stats.std_dev, None);
        assert_eq!(stats.min, None);
    }

    #[test]
    fn test_single_value_has_no_std_dev() {
        let stats = FieldStatistics::compute(Field::Scr, &[record(Some(42))]);
        assert_eq!(stats.mean, Some(Decimal::from(42)));
        assert_eq!(stats.std_dev, None);
    }

    #[test]
    fn test_median_odd_count() {
        let values = [3, 1, 2].map(Decimal::from);
        assert_eq!(median(&values), Some(Decimal::from(2)));
    }

    #[test]
    fn test_table_ignores_text_fields() {
        let table = StatisticsTable::compute(&[record(Some(1))], &[Field::Company, Field::Scr, Field::Mcr]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.get(Field::Mcr).unwrap().mean, None);
    }
}
