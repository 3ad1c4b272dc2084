//! Amount parsing and unit normalization for French-formatted answers.

use rust_decimal::Decimal;
use std::str::FromStr;

use super::patterns::{BILLION_MARKER, MILLION_MARKER, NOT_AVAILABLE};

/// Scale of an amount as expressed in the answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitScale {
    Euros,
    Millions,
    Billions,
}

impl UnitScale {
    /// Detect the unit from the matched context. Billions win over millions.
    pub fn detect(unit_context: &str) -> Self {
        if BILLION_MARKER.is_match(unit_context) {
            UnitScale::Billions
        } else if MILLION_MARKER.is_match(unit_context) {
            UnitScale::Millions
        } else {
            UnitScale::Euros
        }
    }

    pub fn multiplier(self) -> Decimal {
        match self {
            UnitScale::Euros => Decimal::ONE,
            UnitScale::Millions => Decimal::from(1_000_000i64),
            UnitScale::Billions => Decimal::from(1_000_000_000i64),
        }
    }
}

/// Why a matched numeral did not produce an amount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionMiss {
    /// The service wrote the "Non disponible" marker.
    NotAvailable,
    /// The numeral could not be parsed.
    Malformed(String),
}

/// Convert a matched numeral to euros, explaining misses.
pub fn try_convert(number_text: &str, unit_context: &str) -> Result<Decimal, ConversionMiss> {
    if number_text.contains(NOT_AVAILABLE) || unit_context.contains(NOT_AVAILABLE) {
        return Err(ConversionMiss::NotAvailable);
    }

    let value = parse_french_amount(number_text)
        .ok_or_else(|| ConversionMiss::Malformed(number_text.trim().to_string()))?;

    value
        .checked_mul(UnitScale::detect(unit_context).multiplier())
        .map(|v| v.normalize())
        .ok_or_else(|| ConversionMiss::Malformed(number_text.trim().to_string()))
}

/// Convert a matched numeral to euros; `None` when unavailable.
///
/// `unit_context` is the full matched text (label, numeral and unit marker)
/// and is only inspected for unit markers.
pub fn convert(number_text: &str, unit_context: &str) -> Option<Decimal> {
    try_convert(number_text, unit_context).ok()
}

/// Parse a matched percentage numeral; percentages are never scaled.
pub fn try_convert_percentage(number_text: &str, context: &str) -> Result<Decimal, ConversionMiss> {
    if number_text.contains(NOT_AVAILABLE) || context.contains(NOT_AVAILABLE) {
        return Err(ConversionMiss::NotAvailable);
    }

    parse_french_amount(number_text)
        .map(|v| v.normalize())
        .ok_or_else(|| ConversionMiss::Malformed(number_text.trim().to_string()))
}

/// Parse a French-formatted number (e.g., "1 234,56" or "-12,5").
///
/// Every space character is removed and the comma becomes the decimal point.
pub fn parse_french_amount(s: &str) -> Option<Decimal> {
    let cleaned: String = s
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| match c {
            ',' => '.',
            '−' => '-',
            other => other,
        })
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    Decimal::from_str(&cleaned).ok()
}

/// Format amount in French style (1 234 567,89).
pub fn format_french_amount(amount: Decimal) -> String {
    let s = format!("{:.2}", amount);
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", s.as_str()),
    };

    let Some((integer_part, decimal_part)) = digits.split_once('.') else {
        return s;
    };

    // Add thousand separators
    let chars: Vec<char> = integer_part.chars().collect();
    let mut formatted = String::new();

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            formatted.push(' ');
        }
        formatted.push(*c);
    }

    format!("{}{},{}", sign, formatted, decimal_part)
}
