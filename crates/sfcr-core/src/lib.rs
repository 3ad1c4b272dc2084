//! Core library for SFCR solvency indicator extraction.
//!
//! This crate provides:
//! - Declarative field specifications for the four answer schemas
//! - Tiered pattern extraction and French amount normalization (€, M€, Md€)
//! - Derivation of total assets from its components
//! - Per-document schema join, comparison table and statistics
//! - The question-answering contract and the document pipeline

pub mod error;
pub mod models;
pub mod extraction;
pub mod aggregate;
pub mod service;
pub mod pipeline;

pub use error::{DocumentError, ExtractionError, Result, ServiceError, SfcrError};
pub use models::{
    BundleStore, CompanyRecord, DocumentBundle, DocumentHandle, Field, FieldValues, Schema,
    SfcrConfig,
};
pub use extraction::{parse_answer, AnswerParser, ExtractionResult, SchemaParser};
pub use aggregate::{ComparisonTable, ExportView, StatisticsTable};
pub use service::{Preset, QuestionAnswering};
pub use pipeline::{ingest, ingest_all, process_document, BatchReport, Ingest};
