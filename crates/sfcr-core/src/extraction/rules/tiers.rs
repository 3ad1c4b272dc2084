//! Ordered pattern tiers used to locate a field in an answer.

use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::extraction::schema::{self, FieldSpec};
use crate::models::field::{Field, UnitClass};

use super::patterns::{
    BILLION_MARKERS, CURRENCY_MARKERS, HSPACE, MILLION_MARKERS, NUMERAL, PERCENT_MARKERS, SIGN,
};
use super::{ExtractionMatch, FieldExtractor};

/// Matcher strategy, from strictest to loosest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// Numbered marker, exact label, immediate unit marker.
    Strict,
    /// Label anywhere, explicit billion marker.
    LooseBillion,
    /// Label anywhere, explicit million marker.
    LooseMillion,
    /// Case-insensitive label, first numeral with a currency marker on the same line.
    FreeScan,
}

impl Tier {
    /// Regex source of this tier for a field, `None` when the tier does not
    /// apply to the field's unit class.
    pub fn pattern(self, spec: &FieldSpec) -> Option<String> {
        let ordinal = spec.ordinal;
        let label = spec.label_pattern;
        let sign = if spec.signed { SIGN } else { "" };

        match (spec.unit(), self) {
            (UnitClass::Text, Tier::Strict) => {
                Some(format!(r"{ordinal}\)\s*{label}\s*:{HSPACE}*(.+)"))
            }
            (UnitClass::Text, _) => None,
            (UnitClass::Percentage, Tier::Strict) => Some(format!(
                r"{ordinal}\)\s*{label}\s*:\s*({sign}{NUMERAL}){PERCENT_MARKERS}"
            )),
            (UnitClass::Percentage, _) => None,
            (UnitClass::Currency, Tier::Strict) => Some(format!(
                r"{ordinal}\)\s*{label}\s*:\s*({sign}{NUMERAL}){CURRENCY_MARKERS}"
            )),
            (UnitClass::Currency, Tier::LooseBillion) => Some(format!(
                r"{label}\s*:\s*({sign}{NUMERAL}){BILLION_MARKERS}"
            )),
            (UnitClass::Currency, Tier::LooseMillion) => Some(format!(
                r"{label}\s*:\s*({sign}{NUMERAL}){MILLION_MARKERS}"
            )),
            (UnitClass::Currency, Tier::FreeScan) => Some(format!(
                r"(?i){label}.*?({sign}[0-9][0-9,.\t\p{{Zs}}]*)(?:Md€|M€|€)"
            )),
        }
    }
}

/// Extractor trying a field's tiers in order; the first tier that matches wins.
#[derive(Debug, Clone)]
pub struct TieredExtractor {
    unit: UnitClass,
    patterns: Vec<(Tier, Regex)>,
}

impl TieredExtractor {
    /// Compile the tier patterns of a field specification.
    pub fn compile(spec: &FieldSpec) -> Result<Self, regex::Error> {
        let mut patterns = Vec::with_capacity(spec.tiers.len());
        for tier in spec.tiers {
            if let Some(source) = tier.pattern(spec) {
                patterns.push((*tier, Regex::new(&source)?));
            }
        }

        Ok(Self {
            unit: spec.unit(),
            patterns,
        })
    }

    fn to_match(&self, tier: Tier, caps: &regex::Captures<'_>) -> Option<ExtractionMatch<String>> {
        let full = caps.get(0)?;
        let raw = caps.get(1)?.as_str();
        let value = match self.unit {
            UnitClass::Text => raw.trim().to_string(),
            _ => raw.to_string(),
        };

        Some(ExtractionMatch::new(value, tier, full.as_str()))
    }
}

impl FieldExtractor for TieredExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        for (tier, regex) in &self.patterns {
            if let Some(caps) = regex.captures(text) {
                return self.to_match(*tier, &caps);
            }
        }
        None
    }
}

lazy_static! {
    static ref EXTRACTORS: HashMap<Field, TieredExtractor> = schema::all_specs()
        .map(|spec| (spec.field, TieredExtractor::compile(spec).unwrap()))
        .collect();
}

/// Compiled extractor of a field.
pub fn extractor_for(field: Field) -> Option<&'static TieredExtractor> {
    EXTRACTORS.get(&field)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn extract(field: Field, text: &str) -> Option<ExtractionMatch<String>> {
        extractor_for(field).unwrap().extract(text)
    }

    #[test]
    fn test_every_field_compiles() {
        for field in Field::ALL {
            assert!(extractor_for(field).is_some(), "{field}");
        }
    }

    #[test]
    fn test_strict_tier() {
        let m = extract(Field::ReconciliationReserve, "3) Réserve de réconciliation : 1 250 M€").unwrap();
        assert_eq!(m.tier, Tier::Strict);
        assert_eq!(m.value, "1 250 ");
        assert_eq!(m.source, "3) Réserve de réconciliation : 1 250 M€");
    }

    #[test]
    fn test_loose_tiers_in_order() {
        let m = extract(Field::SubordinatedDebt, "Dettes subordonnées : 1,5 milliard").unwrap();
        assert_eq!(m.tier, Tier::LooseBillion);

        let m = extract(Field::SubordinatedDebt, "Dettes subordonnées : 300 millions d'euros").unwrap();
        assert_eq!(m.tier, Tier::LooseMillion);
        assert_eq!(m.value, "300 ");
    }

    #[test]
    fn test_free_scan_is_last_resort() {
        assert!(extract(Field::EligibleOwnFunds, "Éléments éligibles : non communiqués").is_none());

        let text = "Le total des éléments éligibles atteint 4 200 M€ fin 2023.";
        let m = extract(Field::EligibleOwnFunds, text).unwrap();
        assert_eq!(m.tier, Tier::FreeScan);
        assert_eq!(m.value, "4 200 ");

        let text = "Éléments éligibles en 2023 après ajustements 4 200 M€";
        let m = extract(Field::EligibleOwnFunds, text).unwrap();
        assert_eq!(m.tier, Tier::FreeScan);
        assert_eq!(m.value, "4 200 ");
    }

    #[test]
    fn test_strict_match_stops_the_chain() {
        let text = "1) Éléments éligibles (total des fonds propres) : Non disponible\nÉléments éligibles : 3 Md€";
        let m = extract(Field::EligibleOwnFunds, text).unwrap();
        assert_eq!(m.tier, Tier::Strict);
        assert!(m.source.contains("Non disponible"));
    }

    #[test]
    fn test_only_signed_fields_accept_minus() {
        let m = extract(Field::DiversificationEffect, "7) Effet de Diversification : -350 M€").unwrap();
        assert_eq!(m.value, "-350 ");

        assert!(extract(Field::OperationalRisk, "6) SCR Risque Opérationnel : -350 M€").is_none());
    }

    #[test]
    fn test_percentage_and_text() {
        let m = extract(Field::SolvencyRatio, "3) Ratio de solvabilité : 215,4 %").unwrap();
        assert_eq!(m.value, "215,4 ");

        let m = extract(Field::Company, "0) Nom de la société :   Acme Re  ").unwrap();
        assert_eq!(m.value, "Acme Re");
    }
}
