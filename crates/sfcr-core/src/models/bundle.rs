//! Per-document results and the session store holding them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::record::CompanyRecord;

/// Opaque handle returned by the question-answering service for an uploaded document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentHandle(String);

impl DocumentHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DocumentHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Everything extracted from one uploaded file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentBundle {
    /// Handle of the uploaded document.
    pub handle: DocumentHandle,

    /// Original file name, also the store key.
    pub filename: String,

    /// Unified records, normally exactly one.
    pub records: Vec<CompanyRecord>,

    /// Warnings collected while parsing the answers.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,

    /// When the document was processed.
    pub processed_at: DateTime<Utc>,
}

impl DocumentBundle {
    /// Bundle stamped with the current time.
    pub fn new(handle: DocumentHandle, filename: impl Into<String>, records: Vec<CompanyRecord>) -> Self {
        Self {
            handle,
            filename: filename.into(),
            records,
            warnings: Vec::new(),
            processed_at: Utc::now(),
        }
    }

    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings = warnings;
        self
    }
}

/// Insertion-ordered store of document bundles keyed by filename.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BundleStore {
    bundles: Vec<DocumentBundle>,
}

impl BundleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, filename: &str) -> bool {
        self.get(filename).is_some()
    }

    pub fn get(&self, filename: &str) -> Option<&DocumentBundle> {
        self.bundles.iter().find(|b| b.filename == filename)
    }

    /// Insert a bundle; returns `false` (and leaves the store untouched)
    /// when the filename is already present.
    pub fn insert(&mut self, bundle: DocumentBundle) -> bool {
        if self.contains(&bundle.filename) {
            return false;
        }
        self.bundles.push(bundle);
        true
    }

    /// Bundles in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &DocumentBundle> {
        self.bundles.iter()
    }

    /// Filenames in insertion order.
    pub fn filenames(&self) -> impl Iterator<Item = &str> {
        self.bundles.iter().map(|b| b.filename.as_str())
    }

    pub fn len(&self) -> usize {
        self.bundles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bundles.is_empty()
    }

    /// Drop every bundle.
    pub fn clear(&mut self) {
        self.bundles.clear();
    }

    /// Load a store from a JSON session file.
    pub fn from_file(path: &std::path::Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save the store to a JSON session file.
    pub fn save(&self, path: &std::path::Path) -> crate::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
