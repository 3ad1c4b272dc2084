//! HTTP client for a ChatPDF-compatible question-answering API.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use sfcr_core::models::bundle::DocumentHandle;
use sfcr_core::models::config::ServiceConfig;
use sfcr_core::{QuestionAnswering, ServiceError};

/// ChatPDF-compatible client.
pub struct ChatPdfClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SourceResponse {
    source_id: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ChatRequest<'a> {
    source_id: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    content: String,
}

impl ChatPdfClient {
    /// Build a client from the service configuration. Fails when no API key is set.
    pub fn new(config: &ServiceConfig) -> Result<Self, ServiceError> {
        let api_key = config
            .resolve_api_key()
            .ok_or_else(|| ServiceError::MissingApiKey(config.api_key_env.clone()))?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(transport)?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

fn transport(e: reqwest::Error) -> ServiceError {
    ServiceError::Transport(e.to_string())
}

fn malformed(e: reqwest::Error) -> ServiceError {
    ServiceError::MalformedResponse(e.to_string())
}

/// Turn a non-success status into a rejection carrying the response body.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ServiceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response.text().await.unwrap_or_default();
    Err(ServiceError::Rejected {
        status: status.as_u16(),
        message,
    })
}

impl QuestionAnswering for ChatPdfClient {
    async fn submit_document(&self, bytes: &[u8], filename: &str) -> Result<DocumentHandle, ServiceError> {
        let part = reqwest::multipart::Part::bytes(bytes.to_vec())
            .file_name(filename.to_string())
            .mime_str("application/pdf")
            .map_err(transport)?;
        let form = reqwest::multipart::Form::new().part("file", part);

        debug!("Uploading {} ({} bytes)", filename, bytes.len());

        let response = self
            .http
            .post(self.url("sources/add-file"))
            .header("x-api-key", &self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(transport)?;

        let body: SourceResponse = check_status(response).await?.json().await.map_err(malformed)?;
        Ok(DocumentHandle::new(body.source_id))
    }

    async fn ask(
        &self,
        handle: &DocumentHandle,
        question: &str,
        guidance: Option<&str>,
    ) -> Result<String, ServiceError> {
        let mut messages = Vec::with_capacity(2);
        if let Some(guidance) = guidance {
            messages.push(ChatMessage {
                role: "assistant",
                content: guidance,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: question,
        });

        let request = ChatRequest {
            source_id: handle.as_str(),
            messages,
        };

        let response = self
            .http
            .post(self.url("chats/message"))
            .header("x-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(transport)?;

        let body: ChatResponse = check_status(response).await?.json().await.map_err(malformed)?;
        Ok(body.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_api_key() {
        let config = ServiceConfig {
            api_key: None,
            api_key_env: "SFCR_TEST_UNSET_KEY".to_string(),
            ..ServiceConfig::default()
        };

        let err = ChatPdfClient::new(&config).err().unwrap();
        assert!(matches!(err, ServiceError::MissingApiKey(ref var) if var == "SFCR_TEST_UNSET_KEY"));
    }

    #[test]
    fn test_chat_request_shape() {
        let request = ChatRequest {
            source_id: "src_1",
            messages: vec![
                ChatMessage { role: "assistant", content: "format" },
                ChatMessage { role: "user", content: "question" },
            ],
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["sourceId"], "src_1");
        assert_eq!(json["messages"][0]["role"], "assistant");
        assert_eq!(json["messages"][1]["content"], "question");
    }

    #[test]
    fn test_url_join() {
        let config = ServiceConfig {
            api_key: Some("k".to_string()),
            base_url: "https://example.test/v1/".to_string(),
            ..ServiceConfig::default()
        };
        let client = ChatPdfClient::new(&config).unwrap();
        assert_eq!(client.url("chats/message"), "https://example.test/v1/chats/message");
    }
}
