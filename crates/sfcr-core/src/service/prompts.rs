//! Question and guidance texts sent to the question-answering service.

use std::fmt;
use std::str::FromStr;

use crate::error::ExtractionError;
use crate::extraction::schema::specs;
use crate::models::field::{Schema, UnitClass};

/// Opening line of every schema question.
pub const QUESTION_PREAMBLE: &str =
    "Réponds UNIQUEMENT avec les informations demandées, sans aucun texte supplémentaire :";

const CONVERSION_RULES: &str = "\
- Si tu trouves une valeur en millions d'euros (M€), convertis-la en euros (multiplie par 1 000 000)
- Si tu trouves une valeur en milliards d'euros (Md€), convertis-la en euros (multiplie par 1 000 000 000)";

const CAPITAL_NOTE: &str = "Pour le capital et primes, si tu trouves ces éléments séparément \
(capital social + primes d'émission), additionne-les et donne uniquement le total";

const BASE_RULES: &str = "\
- Donne uniquement les chiffres, sans aucune explication
- Respecte EXACTEMENT le format demandé";

const OWN_FUNDS_RULES: &str = "\
- Donne uniquement les chiffres, sans aucune explication ni détail
- Respecte EXACTEMENT le format demandé
- N'ajoute pas de tirets, de puces ou d'autres caractères
- N'ajoute pas de texte explicatif";

const SCR_RULES: &str = "\
- Donne uniquement les chiffres, sans aucune explication
- Respecte EXACTEMENT le format demandé
- Si une valeur n'est pas disponible, indique \"Non disponible\"
- Pour l'Effet de Diversification, indique la valeur avec un signe négatif si c'est une réduction du SCR";

const ASSET_RULES: &str = "\
- Donne uniquement les chiffres, sans aucune explication
- Respecte EXACTEMENT le format demandé
- Si une valeur n'est pas disponible, indique \"Non disponible\"
- Les informations peuvent etre présentées sous différentes normes ou catégories (comme Solvabilité 1, Solvabilité 2, IFRS, etc.), choisit toujours la colonne \"Solvabilité 2 ou Solvabilité II\"
- Pour le total des actifs, cherche le \"Total de l'actif\" ou \"Total actif\"
- Les obligations peuvent aussi être appelées \"Titres obligataires\" ou \"Titres à revenu fixe\"
- Les actions peuvent aussi être appelées \"Titres de participation\" ou \"Titres à revenu variable\"
- Les fonds d'investissement peuvent aussi être appelés \"OPCVM\" ou \"Fonds communs de placement\"
- IMPORTANT : Les informations peuvent se trouver à plusieurs endroits différents dans le document, comme \"Actifs\", \"Investissements\", \"Placements\" ou \"Portefeuille d'investissement\".";

/// Question text of a schema: the preamble followed by one numbered line per field.
pub fn question(schema: Schema) -> String {
    let mut text = format!("{QUESTION_PREAMBLE}\n");
    for spec in specs(schema) {
        text.push_str(&spec.question_line());
        text.push('\n');
    }

    if schema == Schema::OwnFunds {
        text.push('\n');
        text.push_str(CAPITAL_NOTE);
        text.push_str(".\n");
    }

    text
}

/// Formatting guidance sent alongside a schema question.
pub fn guidance(schema: Schema) -> String {
    let expected: String = specs(schema)
        .iter()
        .filter(|s| s.ordinal > 0)
        .map(|s| {
            let unit = if s.unit() == UnitClass::Percentage { "X%" } else { "X€" };
            format!("{}) {} : {}\n", s.ordinal, s.answer_label, unit)
        })
        .collect();

    let rules = match schema {
        Schema::BaseMetrics => BASE_RULES.to_string(),
        Schema::OwnFunds => format!("- {CAPITAL_NOTE}\n{OWN_FUNDS_RULES}"),
        Schema::ScrBreakdown => SCR_RULES.to_string(),
        Schema::Assets => ASSET_RULES.to_string(),
    };

    format!(
        "Analyse le document et donne les réponses sous cette forme EXACTE, sans aucun texte supplémentaire :\n\
         {expected}\nIMPORTANT : \n{CONVERSION_RULES}\n{rules}\n"
    )
}

/// Canned free-form analysis questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    Scr,
    OwnFunds,
    SolvencyRatio,
    Mcr,
    Assets,
}

impl Preset {
    pub const ALL: [Preset; 5] = [
        Preset::Scr,
        Preset::OwnFunds,
        Preset::SolvencyRatio,
        Preset::Mcr,
        Preset::Assets,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Preset::Scr => "scr",
            Preset::OwnFunds => "own_funds",
            Preset::SolvencyRatio => "solvency_ratio",
            Preset::Mcr => "mcr",
            Preset::Assets => "assets",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Preset::Scr => "Analyse du SCR",
            Preset::OwnFunds => "Analyse des fonds propres",
            Preset::SolvencyRatio => "Analyse du ratio de solvabilité",
            Preset::Mcr => "Analyse du MCR",
            Preset::Assets => "Analyse des actifs",
        }
    }

    pub fn text(self) -> &'static str {
        match self {
            Preset::Scr => "Analyse en détail la composition du SCR. Donne la répartition des différents modules de risques (marché, souscription, etc.) et leurs montants, attention à bien convertir les montants qui peuvent être en millions d'euros. Explique quels sont les risques principaux.",
            Preset::OwnFunds => "Analyse la composition des fonds propres. Détaille les différents tiers (Tier 1, 2, 3) et leur montant (attention à bien convertir si en millions d'euros). Compare avec l'année précédente si disponible et explique l'évolution.",
            Preset::SolvencyRatio => "Explique le ratio de solvabilité actuel et son évolution. Compare avec l'année précédente et explique les facteurs qui ont influencé ce ratio. Précise si des mesures particulières ont été prises pour maintenir ou améliorer ce ratio.",
            Preset::Mcr => "Donne les détails sur le MCR (Minimum Capital Requirement). Précise son montant (attention à bien convertir si en millions d'euros), explique son calcul et son évolution par rapport à l'année précédente.",
            Preset::Assets => "Analyse les actifs détenus par l'entreprise. Détaille les différents types d'actifs et leur montant (attention à bien convertir si en millions d'euros). Compare avec l'année précédente si disponible et explique l'évolution.",
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Preset {
    type Err = ExtractionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase().replace('-', "_");
        match key.as_str() {
            "fonds_propres" => return Ok(Preset::OwnFunds),
            "ratio" => return Ok(Preset::SolvencyRatio),
            "actifs" => return Ok(Preset::Assets),
            _ => {}
        }
        Preset::ALL
            .into_iter()
            .find(|p| p.key() == key)
            .ok_or_else(|| ExtractionError::UnknownPreset(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_base_question() {
        let q = question(Schema::BaseMetrics);
        let lines: Vec<&str> = q.lines().collect();
        assert_eq!(lines[0], QUESTION_PREAMBLE);
        assert_eq!(lines[1], "0) Nom de la société : ");
        assert_eq!(lines[4], "3) Ratio de solvabilité : ");
    }

    #[test]
    fn test_own_funds_question_mentions_components() {
        assert!(question(Schema::OwnFunds).contains("capital social + primes d'émission"));
    }

    #[test]
    fn test_guidance_lists_expected_format() {
        let g = guidance(Schema::BaseMetrics);
        assert!(g.starts_with("Analyse le document et donne les réponses sous cette forme EXACTE"));
        assert!(g.contains("1) SCR : X€\n"));
        assert!(g.contains("3) Ratio de solvabilité : X%\n"));
        assert!(!g.contains("Nom de la société"));

        assert!(guidance(Schema::ScrBreakdown).contains("signe négatif"));
        assert!(guidance(Schema::Assets).contains("9) Autres actifs : X€"));
    }

    #[test]
    fn test_preset_parsing() {
        assert_eq!("scr".parse::<Preset>().unwrap(), Preset::Scr);
        assert_eq!("fonds-propres".parse::<Preset>().unwrap(), Preset::OwnFunds);
        assert_eq!("MCR".parse::<Preset>().unwrap(), Preset::Mcr);
        assert!("tarifs".parse::<Preset>().is_err());
        assert!(Preset::Assets.text().starts_with("Analyse les actifs"));
    }
}
