//! Generation backend seam.
//!
//! The harness only needs one operation from a backend: post a
//! `{model, prompt, context_id?}` body and get the raw response text back.
//! [`OllamaBackend`] implements it over HTTP; tests plug in scripted fakes.

mod ollama;

pub use ollama::{OllamaBackend, OllamaConfig, DEFAULT_ENDPOINT, DEFAULT_REQUEST_TIMEOUT};

use async_trait::async_trait;
use serde::Serialize;

use crate::errors::BackendError;

/// Body of one generation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerateRequest {
    pub model: String,
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_id: Option<String>,
}

impl GenerateRequest {
    /// A generation call carrying a full prompt.
    pub fn prompt(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            context_id: None,
        }
    }

    /// An empty-prompt call that initializes a fresh context.
    pub fn reset(model: impl Into<String>, context_id: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: String::new(),
            context_id: Some(context_id.into()),
        }
    }
}

/// Trait for text-generation backends.
///
/// Implementations return the raw response body on HTTP 200 and a
/// [`BackendError`] otherwise. They must not retry.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Short identifier used in logs.
    fn id(&self) -> &str;

    /// Issue one generation call.
    async fn generate(&self, request: &GenerateRequest) -> Result<String, BackendError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_request_omits_context_id() {
        let body = serde_json::to_value(GenerateRequest::prompt("filter", "hello")).unwrap();
        assert_eq!(body, serde_json::json!({ "model": "filter", "prompt": "hello" }));
    }

    #[test]
    fn test_reset_request_has_empty_prompt() {
        let body = serde_json::to_value(GenerateRequest::reset("filter", "ctx_1")).unwrap();
        assert_eq!(
            body,
            serde_json::json!({ "model": "filter", "prompt": "", "context_id": "ctx_1" })
        );
    }
}
