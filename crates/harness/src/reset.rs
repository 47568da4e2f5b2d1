//! Context reset controller.
//!
//! Before every prompt the backend is sent an empty prompt under a brand new
//! context id so that no conversational state leaks between prompts.

use std::sync::Arc;

use log::{debug, error};
use uuid::Uuid;

use crate::backend::{GenerateRequest, GenerationBackend};

/// Prefix of generated context ids.
pub const CONTEXT_ID_PREFIX: &str = "ctx_";

/// Returns a fresh context id: `ctx_` followed by a time-ordered UUIDv7.
pub fn new_context_id() -> String {
    format!("{}{}", CONTEXT_ID_PREFIX, Uuid::now_v7().simple())
}

/// Issues the context reset call. Never retries.
pub struct ContextResetController {
    backend: Arc<dyn GenerationBackend>,
}

impl ContextResetController {
    pub fn new(backend: Arc<dyn GenerationBackend>) -> Self {
        Self { backend }
    }

    /// Resets the backend context for `model_name`.
    ///
    /// Returns `true` only for an HTTP 200; the response body is ignored.
    /// Rejections and transport faults are logged and reported as `false`.
    pub async fn reset(&self, model_name: &str) -> bool {
        let context_id = new_context_id();
        debug!("Resetting {} context {}", model_name, context_id);

        match self
            .backend
            .generate(&GenerateRequest::reset(model_name, &context_id))
            .await
        {
            Ok(_) => true,
            Err(e) => {
                error!("Error resetting model {} on {}: {}", model_name, self.backend.id(), e);
                false
            }
        }
    }
}
