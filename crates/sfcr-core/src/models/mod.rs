//! Data models.

pub mod bundle;
pub mod config;
pub mod field;
pub mod record;

pub use bundle::{BundleStore, DocumentBundle, DocumentHandle};
pub use config::{ExtractionConfig, ReportConfig, ServiceConfig, SfcrConfig};
pub use field::{Field, Schema, UnitClass};
pub use record::{CompanyRecord, FieldValues};
