//! Answer text extraction: field specifications, pattern tiers, parsing and reconciliation.

mod parser;
pub mod reconcile;
pub mod rules;
pub mod schema;

pub use parser::{parse_answer, AnswerParser, ExtractionResult, SchemaParser};
pub use reconcile::{reconcile, Derivation, TOTAL_ASSETS};
pub use schema::{FieldSpec, all_specs, spec, specs};
