//! Question-answering collaborator contract.

pub mod prompts;

use std::future::Future;

use crate::error::ServiceError;
use crate::models::bundle::DocumentHandle;

pub use prompts::{guidance, question, Preset};

/// External service that reads an uploaded document and answers questions about it.
///
/// Calls are awaited one at a time; implementations need not be `Send`.
pub trait QuestionAnswering {
    /// Upload a document and return the handle used by later questions.
    fn submit_document(
        &self,
        bytes: &[u8],
        filename: &str,
    ) -> impl Future<Output = Result<DocumentHandle, ServiceError>>;

    /// Ask one question. `guidance` is sent ahead of the question as formatting
    /// instructions; `None` asks the question as is.
    fn ask(
        &self,
        handle: &DocumentHandle,
        question: &str,
        guidance: Option<&str>,
    ) -> impl Future<Output = Result<String, ServiceError>>;
}
