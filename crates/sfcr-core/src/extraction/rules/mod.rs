//! Rule-based field extractors for SFCR answers.

pub mod amounts;
pub mod patterns;
pub mod tiers;

pub use amounts::{
    convert, format_french_amount, parse_french_amount, try_convert, try_convert_percentage,
    ConversionMiss, UnitScale,
};
pub use tiers::{extractor_for, Tier, TieredExtractor};

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;
}

/// A located field value with the tier that found it.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Tier whose pattern matched.
    pub tier: Tier,
    /// Source text that was matched (label, numeral and unit marker).
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, tier: Tier, source: impl Into<String>) -> Self {
        Self {
            value,
            tier,
            source: source.into(),
        }
    }
}
