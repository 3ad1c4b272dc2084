//! Schema-driven answer parser.

use std::collections::BTreeMap;
use std::time::Instant;

use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::models::field::{Field, Schema, UnitClass};
use crate::models::record::CompanyRecord;

use super::reconcile::reconcile;
use super::rules::patterns::{SHARE_CAPITAL, SHARE_PREMIUM};
use super::rules::{
    extractor_for, try_convert, try_convert_percentage, ConversionMiss, ExtractionMatch,
    FieldExtractor, Tier,
};
use super::schema::{specs, FieldSpec};

/// Result of parsing one answer.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// Schema the answer was parsed against.
    pub schema: Schema,
    /// Parsed records. Single-record schemas always yield exactly one keyless record.
    pub records: Vec<CompanyRecord>,
    /// Extraction warnings.
    pub warnings: Vec<String>,
    /// Tier that resolved each matched field.
    pub tiers: BTreeMap<Field, Tier>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

impl ExtractionResult {
    /// First parsed record, if any.
    pub fn first(&self) -> Option<&CompanyRecord> {
        self.records.first()
    }
}

/// Trait for answer parsing. Malformed text never fails; it yields unavailable values.
pub trait SchemaParser {
    fn parse(&self, text: &str) -> ExtractionResult;
}

/// Parser for one answer schema.
#[derive(Debug, Clone, Copy)]
pub struct AnswerParser {
    schema: Schema,
}

impl AnswerParser {
    pub fn new(schema: Schema) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> Schema {
        self.schema
    }

    /// Line-oriented scan: a company line opens a record, field lines
    /// update the open record, the last match of a field wins.
    fn parse_records(&self, text: &str, state: &mut ParseState) -> Vec<CompanyRecord> {
        let Some(company) = extractor_for(Field::Company) else {
            return Vec::new();
        };

        let mut records = Vec::new();
        let mut current: Option<CompanyRecord> = None;

        for line in text.lines() {
            if let Some(m) = company.extract(line) {
                if let Some(done) = current.take() {
                    records.push(done);
                }
                debug!("Opening record for {:?}", m.value);
                current = Some(CompanyRecord::new(m.value));
                continue;
            }

            let Some(record) = current.as_mut() else {
                continue;
            };

            for spec in specs(self.schema).iter().filter(|s| s.unit() != UnitClass::Text) {
                if let Some(m) = state.locate(spec, line) {
                    let value = state.resolve(spec, &m);
                    record.set(spec.field, value);
                }
            }
        }

        if let Some(done) = current.take() {
            records.push(done);
        }

        records
    }

    /// Whole-text scan producing one keyless record, first match wins.
    fn parse_single(&self, text: &str, state: &mut ParseState) -> CompanyRecord {
        let mut record = CompanyRecord::default();

        for spec in specs(self.schema) {
            let Some(m) = state.locate(spec, text) else {
                continue;
            };

            match spec.unit() {
                UnitClass::Text => record.company = m.value.trim().to_string(),
                _ => {
                    let value = state.resolve(spec, &m);
                    record.set(spec.field, value);
                }
            }
        }

        record
    }

    /// Sum separately reported share capital and share premium.
    fn capital_components(&self, text: &str, state: &mut ParseState) -> Option<Decimal> {
        let mut total: Option<Decimal> = None;

        for (name, regex) in [("share capital", &*SHARE_CAPITAL), ("share premium", &*SHARE_PREMIUM)] {
            let Some(caps) = regex.captures(text) else {
                continue;
            };

            match try_convert(&caps[1], &caps[0]) {
                Ok(v) => {
                    debug!("Found {} component: {}", name, v);
                    total = match total {
                        Some(t) => t.checked_add(v),
                        None => Some(v),
                    };
                }
                Err(ConversionMiss::Malformed(raw)) => state.malformed(Field::CapitalAndPremiums, &raw),
                Err(ConversionMiss::NotAvailable) => {}
            }
        }

        total
    }
}

impl SchemaParser for AnswerParser {
    fn parse(&self, text: &str) -> ExtractionResult {
        let start = Instant::now();
        let mut state = ParseState::default();

        info!("Parsing {} answer from {} characters of text", self.schema, text.len());

        let records = if self.schema.is_multi_record() {
            self.parse_records(text, &mut state)
        } else {
            let mut record = self.parse_single(text, &mut state);

            match self.schema {
                Schema::OwnFunds if !record.values.is_available(Field::CapitalAndPremiums) => {
                    if let Some(sum) = self.capital_components(text, &mut state) {
                        record.set(Field::CapitalAndPremiums, Some(sum));
                    }
                }
                Schema::Assets => record = reconcile(record),
                _ => {}
            }

            vec![record]
        };

        for (field, tier) in &state.tiers {
            debug!("{} resolved by {:?} tier", field, tier);
        }

        debug!("Parsed {} record(s) for {}", records.len(), self.schema);

        ExtractionResult {
            schema: self.schema,
            records,
            warnings: state.warnings,
            tiers: state.tiers,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }
}

#[derive(Debug, Default)]
struct ParseState {
    warnings: Vec<String>,
    tiers: BTreeMap<Field, Tier>,
}

impl ParseState {
    fn locate(&mut self, spec: &FieldSpec, text: &str) -> Option<ExtractionMatch<String>> {
        let m = extractor_for(spec.field)?.extract(text)?;
        self.tiers.insert(spec.field, m.tier);
        Some(m)
    }

    fn resolve(&mut self, spec: &FieldSpec, m: &ExtractionMatch<String>) -> Option<Decimal> {
        let converted = match spec.unit() {
            UnitClass::Percentage => try_convert_percentage(&m.value, &m.source),
            _ => try_convert(&m.value, &m.source),
        };

        match converted {
            Ok(v) => Some(v),
            Err(ConversionMiss::NotAvailable) => None,
            Err(ConversionMiss::Malformed(raw)) => {
                self.malformed(spec.field, &raw);
                None
            }
        }
    }

    fn malformed(&mut self, field: Field, raw: &str) {
        warn!("Unparseable amount for {}: {:?}", field, raw);
        self.warnings
            .push(format!("{}: unparseable amount {:?}", field, raw));
    }
}

/// Parse an answer against a schema.
pub fn parse_answer(schema: Schema, text: &str) -> ExtractionResult {
    AnswerParser::new(schema).parse(text)
}
