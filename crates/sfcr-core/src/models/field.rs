//! Field keys and schemas of the SFCR indicator tables.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ExtractionError;

/// Unit class of a field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitClass {
    /// Amount normalized to euros.
    Currency,
    /// Percentage, stored as reported (250 means 250 %).
    Percentage,
    /// Free text (company name).
    Text,
}

/// The four question schemas asked for every document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Schema {
    /// Company name, SCR, MCR, solvency ratio.
    BaseMetrics,
    /// Own-funds breakdown.
    OwnFunds,
    /// SCR risk-module breakdown.
    ScrBreakdown,
    /// Asset composition.
    Assets,
}

impl Schema {
    /// All schemas in the order they are asked.
    pub const ALL: [Schema; 4] = [
        Schema::BaseMetrics,
        Schema::OwnFunds,
        Schema::ScrBreakdown,
        Schema::Assets,
    ];

    /// Stable key.
    pub fn key(self) -> &'static str {
        match self {
            Schema::BaseMetrics => "base_metrics",
            Schema::OwnFunds => "own_funds",
            Schema::ScrBreakdown => "scr_breakdown",
            Schema::Assets => "assets",
        }
    }

    /// Fields produced by this schema, in answer order.
    pub fn fields(self) -> impl Iterator<Item = Field> {
        Field::ALL.into_iter().filter(move |f| f.schema() == self)
    }

    /// Whether the answer may hold several company blocks.
    pub fn is_multi_record(self) -> bool {
        matches!(self, Schema::BaseMetrics)
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Schema {
    type Err = ExtractionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "base_metrics" | "base" => Ok(Schema::BaseMetrics),
            "own_funds" | "fonds_propres" => Ok(Schema::OwnFunds),
            "scr_breakdown" | "scr_detail" | "scr" => Ok(Schema::ScrBreakdown),
            "assets" | "actifs" => Ok(Schema::Assets),
            _ => Err(ExtractionError::UnknownSchema(s.to_string())),
        }
    }
}

/// Every field of the unified company record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Company,
    Scr,
    Mcr,
    SolvencyRatio,

    EligibleOwnFunds,
    CapitalAndPremiums,
    ReconciliationReserve,
    SubordinatedDebt,
    SurplusFunds,

    MarketRisk,
    CounterpartyRisk,
    LifeUnderwritingRisk,
    HealthUnderwritingRisk,
    NonLifeUnderwritingRisk,
    OperationalRisk,
    DiversificationEffect,

    TotalAssets,
    Bonds,
    Equities,
    InvestmentFunds,
    Derivatives,
    RealEstate,
    CashAndDeposits,
    Participations,
    OtherAssets,
}

impl Field {
    /// All fields in table column order.
    pub const ALL: [Field; 25] = [
        Field::Company,
        Field::Scr,
        Field::Mcr,
        Field::SolvencyRatio,
        Field::EligibleOwnFunds,
        Field::CapitalAndPremiums,
        Field::ReconciliationReserve,
        Field::SubordinatedDebt,
        Field::SurplusFunds,
        Field::MarketRisk,
        Field::CounterpartyRisk,
        Field::LifeUnderwritingRisk,
        Field::HealthUnderwritingRisk,
        Field::NonLifeUnderwritingRisk,
        Field::OperationalRisk,
        Field::DiversificationEffect,
        Field::TotalAssets,
        Field::Bonds,
        Field::Equities,
        Field::InvestmentFunds,
        Field::Derivatives,
        Field::RealEstate,
        Field::CashAndDeposits,
        Field::Participations,
        Field::OtherAssets,
    ];

    /// SCR risk submodules, diversification excluded.
    pub const RISK_MODULES: [Field; 6] = [
        Field::MarketRisk,
        Field::CounterpartyRisk,
        Field::LifeUnderwritingRisk,
        Field::HealthUnderwritingRisk,
        Field::NonLifeUnderwritingRisk,
        Field::OperationalRisk,
    ];

    /// Components summed into total assets.
    pub const ASSET_COMPONENTS: [Field; 8] = [
        Field::Bonds,
        Field::Equities,
        Field::InvestmentFunds,
        Field::Derivatives,
        Field::RealEstate,
        Field::CashAndDeposits,
        Field::Participations,
        Field::OtherAssets,
    ];

    /// Numeric fields (everything but the company name).
    pub fn numeric() -> impl Iterator<Item = Field> {
        Field::ALL.into_iter().filter(|f| f.unit() != UnitClass::Text)
    }

    /// Stable snake_case key.
    pub fn key(self) -> &'static str {
        match self {
            Field::Company => "company",
            Field::Scr => "scr",
            Field::Mcr => "mcr",
            Field::SolvencyRatio => "solvency_ratio",
            Field::EligibleOwnFunds => "eligible_own_funds",
            Field::CapitalAndPremiums => "capital_and_premiums",
            Field::ReconciliationReserve => "reconciliation_reserve",
            Field::SubordinatedDebt => "subordinated_debt",
            Field::SurplusFunds => "surplus_funds",
            Field::MarketRisk => "market_risk",
            Field::CounterpartyRisk => "counterparty_risk",
            Field::LifeUnderwritingRisk => "life_underwriting_risk",
            Field::HealthUnderwritingRisk => "health_underwriting_risk",
            Field::NonLifeUnderwritingRisk => "non_life_underwriting_risk",
            Field::OperationalRisk => "operational_risk",
            Field::DiversificationEffect => "diversification_effect",
            Field::TotalAssets => "total_assets",
            Field::Bonds => "bonds",
            Field::Equities => "equities",
            Field::InvestmentFunds => "investment_funds",
            Field::Derivatives => "derivatives",
            Field::RealEstate => "real_estate",
            Field::CashAndDeposits => "cash_and_deposits",
            Field::Participations => "participations",
            Field::OtherAssets => "other_assets",
        }
    }

    /// Display label used as a table column header.
    pub fn label(self) -> &'static str {
        match self {
            Field::Company => "Société",
            Field::Scr => "SCR (€)",
            Field::Mcr => "MCR (€)",
            Field::SolvencyRatio => "Ratio de solvabilité (%)",
            Field::EligibleOwnFunds => "Éléments éligibles (€)",
            Field::CapitalAndPremiums => "Capital et primes (€)",
            Field::ReconciliationReserve => "Réserve de réconciliation (€)",
            Field::SubordinatedDebt => "Dettes subordonnées (€)",
            Field::SurplusFunds => "Fonds excédentaires (€)",
            Field::MarketRisk => "SCR Risque de Marché (€)",
            Field::CounterpartyRisk => "SCR Risque de Contrepartie (€)",
            Field::LifeUnderwritingRisk => "SCR Risque de Souscription Vie (€)",
            Field::HealthUnderwritingRisk => "SCR Risque de Souscription Santé (€)",
            Field::NonLifeUnderwritingRisk => "SCR Risque de Souscription Non-Vie (€)",
            Field::OperationalRisk => "SCR Risque Opérationnel (€)",
            Field::DiversificationEffect => "Effet de Diversification (€)",
            Field::TotalAssets => "Total des actifs (€)",
            Field::Bonds => "Obligations (€)",
            Field::Equities => "Actions (€)",
            Field::InvestmentFunds => "Fonds d'investissement (€)",
            Field::Derivatives => "Produits dérivés (€)",
            Field::RealEstate => "Immobilier (€)",
            Field::CashAndDeposits => "Trésorerie et dépôts (€)",
            Field::Participations => "Participations (€)",
            Field::OtherAssets => "Autres actifs (€)",
        }
    }

    pub fn unit(self) -> UnitClass {
        match self {
            Field::Company => UnitClass::Text,
            Field::SolvencyRatio => UnitClass::Percentage,
            _ => UnitClass::Currency,
        }
    }

    pub fn schema(self) -> Schema {
        match self {
            Field::Company | Field::Scr | Field::Mcr | Field::SolvencyRatio => Schema::BaseMetrics,
            Field::EligibleOwnFunds
            | Field::CapitalAndPremiums
            | Field::ReconciliationReserve
            | Field::SubordinatedDebt
            | Field::SurplusFunds => Schema::OwnFunds,
            Field::MarketRisk
            | Field::CounterpartyRisk
            | Field::LifeUnderwritingRisk
            | Field::HealthUnderwritingRisk
            | Field::NonLifeUnderwritingRisk
            | Field::OperationalRisk
            | Field::DiversificationEffect => Schema::ScrBreakdown,
            _ => Schema::Assets,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Field {
    type Err = ExtractionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase().replace('-', "_");
        Field::ALL
            .into_iter()
            .find(|f| f.key() == key)
            .ok_or_else(|| ExtractionError::UnknownField(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_schema_fields_cover_every_field_once() {
        let total: usize = Schema::ALL.iter().map(|s| s.fields().count()).sum();
        assert_eq!(total, Field::ALL.len());
        assert_eq!(Schema::OwnFunds.fields().count(), 5);
        assert_eq!(Schema::ScrBreakdown.fields().count(), 7);
        assert_eq!(Schema::Assets.fields().count(), 9);
    }

    #[test]
    fn test_field_key_round_trips() {
        for field in Field::ALL {
            assert_eq!(field.key().parse::<Field>().unwrap(), field);
        }
        assert!("ebitda".parse::<Field>().is_err());
    }

    #[test]
    fn test_schema_aliases() {
        assert_eq!("actifs".parse::<Schema>().unwrap(), Schema::Assets);
        assert_eq!("scr-detail".parse::<Schema>().unwrap(), Schema::ScrBreakdown);
        assert!("balance_sheet".parse::<Schema>().is_err());
    }

    #[test]
    fn test_numeric_fields_exclude_company() {
        assert!(Field::numeric().all(|f| f != Field::Company));
        assert_eq!(Field::numeric().count(), 24);
    }
}
