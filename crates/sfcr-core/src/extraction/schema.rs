//! Declarative field specifications for the four answer schemas.
//!
//! Every schema is a list of [`FieldSpec`]s consumed by one generic
//! extractor. Each entry names the numbered marker and label the service is
//! asked to answer with, the regex fragment matching that label, and the
//! ordered pattern tiers tried for the field.

use crate::models::field::{Field, Schema, UnitClass};

use super::rules::Tier;

/// Static schema entry for one field.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// Field key.
    pub field: Field,
    /// Numbered marker in the answer (`1)`, `2)`, ...).
    pub ordinal: u8,
    /// Label as written in the question.
    pub answer_label: &'static str,
    /// Regex fragment matching the label in an answer.
    pub label_pattern: &'static str,
    /// Pattern tiers, tried in order.
    pub tiers: &'static [Tier],
    /// Whether a leading minus sign is admitted.
    pub signed: bool,
}

impl FieldSpec {
    const fn new(
        field: Field,
        ordinal: u8,
        answer_label: &'static str,
        label_pattern: &'static str,
        tiers: &'static [Tier],
    ) -> Self {
        Self {
            field,
            ordinal,
            answer_label,
            label_pattern,
            tiers,
            signed: false,
        }
    }

    const fn signed(mut self) -> Self {
        self.signed = true;
        self
    }

    pub fn unit(&self) -> UnitClass {
        self.field.unit()
    }

    /// Display label of the field.
    pub fn label(&self) -> &'static str {
        self.field.label()
    }

    /// Question line for this field, e.g. `1) SCR : `.
    pub fn question_line(&self) -> String {
        format!("{}) {} : ", self.ordinal, self.answer_label)
    }
}

const STRICT: &[Tier] = &[Tier::Strict];
const LOOSE: &[Tier] = &[Tier::Strict, Tier::LooseBillion, Tier::LooseMillion];
const LOOSE_WITH_SCAN: &[Tier] = &[
    Tier::Strict,
    Tier::LooseBillion,
    Tier::LooseMillion,
    Tier::FreeScan,
];

pub static BASE_METRICS: [FieldSpec; 4] = [
    FieldSpec::new(Field::Company, 0, "Nom de la société", "Nom de la société", STRICT),
    FieldSpec::new(Field::Scr, 1, "SCR", "SCR", STRICT),
    FieldSpec::new(Field::Mcr, 2, "MCR", "MCR", STRICT),
    FieldSpec::new(
        Field::SolvencyRatio,
        3,
        "Ratio de solvabilité",
        "Ratio de solvabilité",
        STRICT,
    ),
];

pub static OWN_FUNDS: [FieldSpec; 5] = [
    FieldSpec::new(
        Field::EligibleOwnFunds,
        1,
        "Éléments éligibles (total des fonds propres)",
        "Éléments éligibles[^:\n0-9]*",
        LOOSE_WITH_SCAN,
    ),
    FieldSpec::new(Field::CapitalAndPremiums, 2, "Capital et primes", "Capital et primes", LOOSE),
    FieldSpec::new(
        Field::ReconciliationReserve,
        3,
        "Réserve de réconciliation",
        "Réserve de réconciliation",
        LOOSE,
    ),
    FieldSpec::new(
        Field::SubordinatedDebt,
        4,
        "Dettes subordonnées",
        "Dettes subordonnées",
        LOOSE,
    ),
    FieldSpec::new(
        Field::SurplusFunds,
        5,
        "Fonds excédentaires",
        "Fonds excédentaires",
        LOOSE,
    ),
];

pub static SCR_BREAKDOWN: [FieldSpec; 7] = [
    FieldSpec::new(
        Field::MarketRisk,
        1,
        "SCR Risque de Marché",
        "SCR Risque de Marché",
        STRICT,
    ),
    FieldSpec::new(
        Field::CounterpartyRisk,
        2,
        "SCR Risque de Contrepartie",
        "SCR Risque de Contrepartie",
        STRICT,
    ),
    FieldSpec::new(
        Field::LifeUnderwritingRisk,
        3,
        "SCR Risque de Souscription Vie",
        "SCR Risque de Souscription Vie",
        STRICT,
    ),
    FieldSpec::new(
        Field::HealthUnderwritingRisk,
        4,
        "SCR Risque de Souscription Santé",
        "SCR Risque de Souscription Santé",
        STRICT,
    ),
    FieldSpec::new(
        Field::NonLifeUnderwritingRisk,
        5,
        "SCR Risque de Souscription Non-Vie",
        "SCR Risque de Souscription Non-Vie",
        STRICT,
    ),
    FieldSpec::new(
        Field::OperationalRisk,
        6,
        "SCR Risque Opérationnel",
        "SCR Risque Opérationnel",
        STRICT,
    ),
    FieldSpec::new(
        Field::DiversificationEffect,
        7,
        "Effet de Diversification",
        "Effet de Diversification",
        STRICT,
    )
    .signed(),
];

pub static ASSETS: [FieldSpec; 9] = [
    FieldSpec::new(Field::TotalAssets, 1, "Total des actifs", "Total des actifs", STRICT),
    FieldSpec::new(Field::Bonds, 2, "Obligations", "Obligations", STRICT),
    FieldSpec::new(Field::Equities, 3, "Actions", "Actions", STRICT),
    FieldSpec::new(
        Field::InvestmentFunds,
        4,
        "Fonds d'investissement",
        "Fonds d['’]investissement",
        STRICT,
    ),
    FieldSpec::new(Field::Derivatives, 5, "Produits dérivés", "Produits dérivés", STRICT),
    FieldSpec::new(Field::RealEstate, 6, "Immobilier", "Immobilier", STRICT),
    FieldSpec::new(
        Field::CashAndDeposits,
        7,
        "Trésorerie et dépôts",
        "Trésorerie et dépôts",
        STRICT,
    ),
    FieldSpec::new(Field::Participations, 8, "Participations", "Participations", STRICT),
    FieldSpec::new(Field::OtherAssets, 9, "Autres actifs", "Autres actifs", STRICT),
];

/// Field specifications of a schema, in answer order.
pub fn specs(schema: Schema) -> &'static [FieldSpec] {
    match schema {
        Schema::BaseMetrics => &BASE_METRICS,
        Schema::OwnFunds => &OWN_FUNDS,
        Schema::ScrBreakdown => &SCR_BREAKDOWN,
        Schema::Assets => &ASSETS,
    }
}

/// Specification of a single field.
pub fn spec(field: Field) -> Option<&'static FieldSpec> {
    specs(field.schema()).iter().find(|s| s.field == field)
}

/// All field specifications across schemas.
pub fn all_specs() -> impl Iterator<Item = &'static FieldSpec> {
    Schema::ALL.into_iter().flat_map(|s| specs(s).iter())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_specs_match_schema_fields() {
        for schema in Schema::ALL {
            let from_specs: Vec<Field> = specs(schema).iter().map(|s| s.field).collect();
            let from_enum: Vec<Field> = schema.fields().collect();
            assert_eq!(from_specs, from_enum, "schema {schema}");
        }
    }

    #[test]
    fn test_ordinals_are_sequential() {
        for schema in Schema::ALL {
            let first = if schema == Schema::BaseMetrics { 0 } else { 1 };
            for (i, spec) in specs(schema).iter().enumerate() {
                assert_eq!(spec.ordinal as usize, first + i);
            }
        }
    }

    #[test]
    fn test_only_diversification_is_signed() {
        let signed: Vec<Field> = all_specs().filter(|s| s.signed).map(|s| s.field).collect();
        assert_eq!(signed, vec![Field::DiversificationEffect]);
    }

    #[test]
    fn test_spec_lookup() {
        assert_eq!(spec(Field::Bonds).unwrap().ordinal, 2);
        assert_eq!(spec(Field::EligibleOwnFunds).unwrap().tiers.len(), 4);
        assert_eq!(spec(Field::Scr).unwrap().question_line(), "1) SCR : ");
        assert!(Field::ALL.iter().all(|f| spec(*f).is_some()));
    }
}
