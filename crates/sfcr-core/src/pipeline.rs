//! Document pipeline: submit, ask the schema questions, parse, join, store.

use std::io;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::aggregate::join;
use crate::error::{DocumentError, ServiceError};
use crate::extraction::{parse_answer, ExtractionResult};
use crate::models::bundle::{BundleStore, DocumentBundle, DocumentHandle};
use crate::models::config::ExtractionConfig;
use crate::models::field::Schema;
use crate::service::{guidance, question, QuestionAnswering};

/// Outcome of ingesting one document into a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ingest {
    Processed,
    /// The filename was already in the store; nothing was asked.
    Skipped,
}

/// Per-document outcomes of a batch.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub processed: Vec<String>,
    pub skipped: Vec<String>,
    pub failed: Vec<(String, DocumentError)>,
}

impl BatchReport {
    pub fn record(&mut self, filename: &str, outcome: Result<Ingest, DocumentError>) {
        match outcome {
            Ok(Ingest::Processed) => self.processed.push(filename.to_string()),
            Ok(Ingest::Skipped) => self.skipped.push(filename.to_string()),
            Err(e) => self.failed.push((filename.to_string(), e)),
        }
    }

    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

/// Submit a document and ask the four schema questions in order.
///
/// Any service failure aborts the document; no partial bundle is produced.
pub async fn process_document<Q: QuestionAnswering>(
    qa: &Q,
    bytes: &[u8],
    filename: &str,
    config: &ExtractionConfig,
) -> Result<DocumentBundle, ServiceError> {
    let start = Instant::now();

    let handle = qa.submit_document(bytes, filename).await?;
    info!("Submitted {} as {}", filename, handle);

    let mut answers = Vec::with_capacity(Schema::ALL.len());
    for schema in Schema::ALL {
        let guidance_text = config.send_guidance.then(|| guidance(schema));
        let answer = qa
            .ask(&handle, &question(schema), guidance_text.as_deref())
            .await?;
        debug!("{} answer for {}: {} chars", schema, filename, answer.len());
        answers.push((schema, answer));
    }

    let bundle = bundle_from_answers(handle, filename, &answers, config);
    info!(
        "Processed {} in {} ms ({} record(s))",
        filename,
        start.elapsed().as_millis(),
        bundle.records.len()
    );

    Ok(bundle)
}

/// Parse and join the answers of one document.
pub fn bundle_from_answers(
    handle: DocumentHandle,
    filename: &str,
    answers: &[(Schema, String)],
    config: &ExtractionConfig,
) -> DocumentBundle {
    let results: Vec<ExtractionResult> = answers
        .iter()
        .map(|(schema, text)| parse_answer(*schema, text))
        .collect();

    let base = results
        .iter()
        .find(|r| r.schema == Schema::BaseMetrics)
        .map(|r| r.records.as_slice())
        .unwrap_or_default();

    let breakdowns: Vec<(Schema, Option<_>)> = results
        .iter()
        .filter(|r| r.schema != Schema::BaseMetrics)
        .map(|r| (r.schema, r.first()))
        .collect();

    let joined = join(base, &breakdowns, filename, config);

    let mut warnings: Vec<String> = results.iter().flat_map(|r| r.warnings.clone()).collect();
    warnings.extend(joined.warnings);

    DocumentBundle::new(handle, filename, joined.records).with_warnings(warnings)
}

/// Process a document into the store unless its filename is already there.
///
/// `read` is only called for documents that are not in the store yet.
pub async fn ingest<Q, R>(
    store: &mut BundleStore,
    qa: &Q,
    filename: &str,
    read: R,
    config: &ExtractionConfig,
) -> Result<Ingest, DocumentError>
where
    Q: QuestionAnswering,
    R: FnOnce() -> io::Result<Vec<u8>>,
{
    if store.contains(filename) {
        debug!("{} already processed, skipping", filename);
        return Ok(Ingest::Skipped);
    }

    let bytes = read()?;
    let bundle = process_document(qa, &bytes, filename, config).await?;
    store.insert(bundle);
    Ok(Ingest::Processed)
}

/// Ingest documents one after another; failures are reported and the batch goes on.
pub async fn ingest_all<Q, I, R>(
    store: &mut BundleStore,
    qa: &Q,
    documents: I,
    config: &ExtractionConfig,
) -> BatchReport
where
    Q: QuestionAnswering,
    I: IntoIterator<Item = (String, R)>,
    R: FnOnce() -> io::Result<Vec<u8>>,
{
    let mut report = BatchReport::default();

    for (filename, read) in documents {
        let outcome = ingest(store, qa, &filename, read, config).await;
        if let Err(e) = &outcome {
            warn!("Failed to process {}: {}", filename, e);
        }
        report.record(&filename, outcome);
    }

    report
}
