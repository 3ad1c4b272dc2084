//! Derivation of missing aggregates from their components.

use rust_decimal::Decimal;
use tracing::debug;

use crate::models::field::Field;
use crate::models::record::{CompanyRecord, FieldValues};

/// An aggregate field that can be rebuilt from component fields.
#[derive(Debug, Clone, Copy)]
pub struct Derivation {
    pub target: Field,
    pub components: &'static [Field],
}

/// Total assets as the sum of the asset components.
pub const TOTAL_ASSETS: Derivation = Derivation {
    target: Field::TotalAssets,
    components: &Field::ASSET_COMPONENTS,
};

impl Derivation {
    /// Sum of the available components, `None` when none is available.
    pub fn derive(&self, values: &FieldValues) -> Option<Decimal> {
        let mut available = self.components.iter().filter_map(|f| values.get(*f));
        let first = available.next()?;
        available.try_fold(first, |acc, v| acc.checked_add(v))
    }

    /// Fill the target when it is unavailable. Returns whether a value was derived.
    pub fn apply(&self, record: &mut CompanyRecord) -> bool {
        if record.values.is_available(self.target) {
            return false;
        }

        match self.derive(&record.values) {
            Some(total) => {
                debug!("Derived {} = {} from components", self.target, total);
                record.set(self.target, Some(total));
                true
            }
            None => false,
        }
    }
}

/// Complete an asset record. A reported total is never overwritten and
/// components are never derived from the total.
pub fn reconcile(mut record: CompanyRecord) -> CompanyRecord {
    TOTAL_ASSETS.apply(&mut record);
    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(values: &[(Field, i64)]) -> CompanyRecord {
        CompanyRecord::keyless(values.iter().map(|(f, v)| (*f, Decimal::from(*v))).collect())
    }

    #[test]
    fn test_total_from_available_components() {
        let rec = reconcile(record(&[(Field::Bonds, 100), (Field::RealEstate, 50)]));
        assert_eq!(rec.get(Field::TotalAssets), Some(Decimal::from(150)));
        assert_eq!(rec.get(Field::Equities), None);
    }

    #[test]
    fn test_no_components_keeps_total_unavailable() {
        let rec = reconcile(record(&[]));
        assert_eq!(rec.get(Field::TotalAssets), None);
    }

    #[test]
    fn test_reported_total_wins() {
        let rec = reconcile(record(&[(Field::TotalAssets, 1000), (Field::Bonds, 100)]));
        assert_eq!(rec.get(Field::TotalAssets), Some(Decimal::from(1000)));
    }

    #[test]
    fn test_components_never_derived_from_total() {
        let rec = reconcile(record(&[(Field::TotalAssets, 1000)]));
        assert_eq!(rec.values.len(), 1);
    }
}
