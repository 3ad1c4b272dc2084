//! Error types for the sfcr-core library.

use thiserror::Error;

/// Main error type for the sfcr library.
#[derive(Error, Debug)]
pub enum SfcrError {
    /// Question-answering service error.
    #[error("service error: {0}")]
    Service(#[from] ServiceError),

    /// Answer extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Why one document of a batch produced no bundle.
#[derive(Error, Debug)]
pub enum DocumentError {
    /// The document file could not be read.
    #[error("cannot read document: {0}")]
    Read(#[from] std::io::Error),

    /// Submission or one of the questions failed.
    #[error(transparent)]
    Service(#[from] ServiceError),
}

/// Errors reported by the question-answering collaborator.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// The request never reached the service or the connection failed.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The service answered with an error status.
    #[error("service rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The service answered, but not in the expected shape.
    #[error("malformed service response: {0}")]
    MalformedResponse(String),

    /// No API key was configured.
    #[error("missing API key (set {0} or service.api_key)")]
    MissingApiKey(String),
}

/// Errors related to schema and field lookups.
///
/// Parse misses are never errors; they resolve to unavailable values.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// Unknown field key.
    #[error("unknown field: {0}")]
    UnknownField(String),

    /// Unknown schema name.
    #[error("unknown schema: {0}")]
    UnknownSchema(String),

    /// Unknown preset question.
    #[error("unknown preset: {0}")]
    UnknownPreset(String),
}

/// Result type for the sfcr library.
pub type Result<T> = std::result::Result<T, SfcrError>;
