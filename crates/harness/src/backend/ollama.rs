//! HTTP backend for a local Ollama-compatible `/api/generate` endpoint.

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::{Client, StatusCode};

use super::{GenerateRequest, GenerationBackend};
use crate::errors::BackendError;

/// Default generation endpoint.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434/api/generate";

/// Default request timeout. Local models can take minutes on long prompts.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

const BACKEND_ID: &str = "OLLAMA";

/// Configuration for [`OllamaBackend`].
#[derive(Debug, Clone)]
pub struct OllamaConfig {
    pub endpoint: String,
    pub request_timeout: Duration,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

/// Generation backend talking JSON over HTTP.
///
/// # Example
///
/// ```ignore
/// use verdict_harness::backend::{OllamaBackend, OllamaConfig};
///
/// let backend = OllamaBackend::new(OllamaConfig::default());
/// ```
pub struct OllamaBackend {
    client: Client,
    endpoint: String,
}

impl OllamaBackend {
    pub fn new(config: OllamaConfig) -> Self {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            endpoint: config.endpoint,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn map_send_error(&self, e: reqwest::Error) -> BackendError {
        if e.is_connect() {
            BackendError::Unreachable {
                endpoint: self.endpoint.clone(),
                message: e.to_string(),
            }
        } else {
            BackendError::Transport(e.to_string())
        }
    }
}

#[async_trait]
impl GenerationBackend for OllamaBackend {
    fn id(&self) -> &str {
        BACKEND_ID
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<String, BackendError> {
        debug!(
            "POST {} model={} prompt_len={} context_id={:?}",
            self.endpoint,
            request.model,
            request.prompt.len(),
            request.context_id
        );

        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if status != StatusCode::OK {
            // Rejections stay rejections even if the body can't be read.
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        response
            .text()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))
    }
}
