//! Company records built from parsed answers.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::field::{Field, Schema};

/// Resolved numeric values of a record.
///
/// A field missing from the map is unavailable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldValues(BTreeMap<Field, Decimal>);

impl FieldValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of a field, `None` when unavailable.
    pub fn get(&self, field: Field) -> Option<Decimal> {
        self.0.get(&field).copied()
    }

    /// Set or clear a field.
    pub fn set(&mut self, field: Field, value: Option<Decimal>) {
        match value {
            Some(v) => {
                self.0.insert(field, v);
            }
            None => {
                self.0.remove(&field);
            }
        }
    }

    pub fn is_available(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    /// Available values in field order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, Decimal)> + '_ {
        self.0.iter().map(|(f, v)| (*f, *v))
    }

    /// Copy every available value of `other` into `self`.
    pub fn merge(&mut self, other: &FieldValues) {
        for (field, value) in other.iter() {
            self.0.insert(field, value);
        }
    }

    /// Keep only the values belonging to one schema.
    pub fn restricted_to(&self, schema: Schema) -> FieldValues {
        FieldValues(
            self.0
                .iter()
                .filter(|(f, _)| f.schema() == schema)
                .map(|(f, v)| (*f, *v))
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(Field, Decimal)> for FieldValues {
    fn from_iter<I: IntoIterator<Item = (Field, Decimal)>>(iter: I) -> Self {
        FieldValues(iter.into_iter().collect())
    }
}

/// One row of the comparison table, keyed by company name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyRecord {
    /// Company name as reported, trimmed. Empty when the answer carried no key.
    pub company: String,

    /// Resolved values.
    #[serde(default)]
    pub values: FieldValues,
}

impl CompanyRecord {
    /// Record with every field unavailable.
    pub fn new(company: impl Into<String>) -> Self {
        Self {
            company: company.into().trim().to_string(),
            values: FieldValues::new(),
        }
    }

    /// Record without a company key (single-record schemas).
    pub fn keyless(values: FieldValues) -> Self {
        Self {
            company: String::new(),
            values,
        }
    }

    pub fn with_values(mut self, values: FieldValues) -> Self {
        self.values = values;
        self
    }

    pub fn is_keyless(&self) -> bool {
        self.company.is_empty()
    }

    pub fn get(&self, field: Field) -> Option<Decimal> {
        self.values.get(field)
    }

    pub fn set(&mut self, field: Field, value: Option<Decimal>) {
        self.values.set(field, value);
    }

    /// Render one cell, using `unavailable` for missing values.
    pub fn cell(&self, field: Field, unavailable: &str) -> String {
        if field == Field::Company {
            return self.company.clone();
        }
        match self.values.get(field) {
            Some(v) => v.normalize().to_string(),
            None => unavailable.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_set_none_clears_value() {
        let mut values = FieldValues::new();
        values.set(Field::Scr, Some(dec("100")));
        assert!(values.is_available(Field::Scr));

        values.set(Field::Scr, None);
        assert!(!values.is_available(Field::Scr));
        assert!(values.is_empty());
    }

    #[test]
    fn test_merge_keeps_existing_fields() {
        let mut base: FieldValues = [(Field::Scr, dec("1"))].into_iter().collect();
        let other: FieldValues = [(Field::Bonds, dec("2"))].into_iter().collect();
        base.merge(&other);

        assert_eq!(base.get(Field::Scr), Some(dec("1")));
        assert_eq!(base.get(Field::Bonds), Some(dec("2")));
    }

    #[test]
    fn test_cell_rendering() {
        let mut record = CompanyRecord::new("  Acme Re ");
        record.set(Field::Scr, Some(dec("1500000000.0")));

        assert_eq!(record.company, "Acme Re");
        assert_eq!(record.cell(Field::Company, "-"), "Acme Re");
        assert_eq!(record.cell(Field::Scr, "-"), "1500000000");
        assert_eq!(record.cell(Field::Mcr, "Non disponible"), "Non disponible");
    }

    #[test]
    fn test_record_json_uses_field_keys() {
        let mut record = CompanyRecord::new("Acme Re");
        record.set(Field::SolvencyRatio, Some(dec("215.5")));

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["values"]["solvency_ratio"], "215.5");

        let back: CompanyRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }
}
