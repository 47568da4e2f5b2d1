//! Prompt dispatcher and batch loop.
//!
//! One prompt at a time: pause, reset the backend context, send the full
//! prompt, parse the answer into a [`PromptRecord`]. The loop reacts to
//! failures according to their [`FaultClass`]:
//!
//! - reset failure: stop the batch
//! - backend rejection: skip the prompt, continue
//! - transport fault: stop the batch
//!
//! Records collected before a stop are always returned to the caller.

use std::fmt;
use std::sync::Arc;

use log::{error, info, warn};

use crate::backend::{GenerateRequest, GenerationBackend};
use crate::errors::{BackendError, FaultClass};
use crate::models::{compose_full_prompt, LabeledPrompt, PromptRecord};
use crate::pacing::{FixedDelayPacer, RequestPacer};
use crate::parser::ResponseParser;
use crate::reset::ContextResetController;

/// Why a batch stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Termination {
    /// Every prompt was attempted.
    Completed,
    /// The context reset before prompt `index` failed.
    ResetFailed { index: usize },
    /// The backend became unreachable while sending prompt `index`.
    BackendUnreachable { index: usize, message: String },
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed => write!(f, "completed"),
            Self::ResetFailed { index } => {
                write!(f, "stopped: context reset failed before prompt {}", index + 1)
            }
            Self::BackendUnreachable { index, message } => {
                write!(f, "stopped: backend unreachable at prompt {}: {}", index + 1, message)
            }
        }
    }
}

/// Result of a batch run.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    /// Records in submission order.
    pub records: Vec<PromptRecord>,
    /// Indices of prompts the backend rejected.
    pub skipped: Vec<usize>,
    pub termination: Termination,
}

impl BatchOutcome {
    pub fn is_complete(&self) -> bool {
        self.termination == Termination::Completed
    }
}

/// Sends prompts to a [`GenerationBackend`], one reset-then-generate pair per
/// prompt, strictly sequentially.
pub struct PromptDispatcher {
    backend: Arc<dyn GenerationBackend>,
    resetter: ContextResetController,
    parser: ResponseParser,
    pacer: Arc<dyn RequestPacer>,
    model: String,
}

impl PromptDispatcher {
    /// Creates a dispatcher with the default parser and a one second pause.
    pub fn new(backend: Arc<dyn GenerationBackend>, model: impl Into<String>) -> Self {
        Self {
            resetter: ContextResetController::new(backend.clone()),
            backend,
            parser: ResponseParser::default(),
            pacer: Arc::new(FixedDelayPacer::default()),
            model: model.into(),
        }
    }

    pub fn with_parser(mut self, parser: ResponseParser) -> Self {
        self.parser = parser;
        self
    }

    pub fn with_pacer(mut self, pacer: Arc<dyn RequestPacer>) -> Self {
        self.pacer = pacer;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Issues exactly one generation call and returns the raw response body.
    pub async fn dispatch(&self, model_name: &str, full_prompt: &str) -> Result<String, BackendError> {
        self.backend
            .generate(&GenerateRequest::prompt(model_name, full_prompt))
            .await
    }

    /// Runs every prompt through the backend.
    ///
    /// `context` is prepended to each prompt (see
    /// [`compose_full_prompt`]). Stops early on a reset failure or a transport
    /// fault; the records gathered so far are returned either way.
    pub async fn run_batch(&self, context: &str, prompts: &[LabeledPrompt]) -> BatchOutcome {
        let total = prompts.len();
        let mut records = Vec::with_capacity(total);
        let mut skipped = Vec::new();

        for (index, item) in prompts.iter().enumerate() {
            if index > 0 {
                self.pacer.pause().await;
            }

            info!("Resetting model context...");
            if !self.resetter.reset(&self.model).await {
                error!(
                    "Failed to reset model context before prompt {}/{}, stopping batch",
                    index + 1,
                    total
                );
                return BatchOutcome {
                    records,
                    skipped,
                    termination: Termination::ResetFailed { index },
                };
            }

            let full_prompt = compose_full_prompt(context, &item.text);
            info!("Prompt {}/{}:", index + 1, total);
            info!("Q: {}", item.text);

            let raw = match self.dispatch(&self.model, &full_prompt).await {
                Ok(raw) => raw,
                Err(e) => match e.fault_class() {
                    FaultClass::SkipPrompt => {
                        let body = match &e {
                            BackendError::Rejected { body, .. } => body.as_str(),
                            _ => "",
                        };
                        warn!(
                            "Prompt {}/{} skipped: {} (response: {})",
                            index + 1,
                            total,
                            e,
                            body
                        );
                        skipped.push(index);
                        continue;
                    }
                    FaultClass::AbortBatch => {
                        error!(
                            "Could not reach {} at prompt {}/{}: {}",
                            self.backend.id(),
                            index + 1,
                            total,
                            e
                        );
                        return BatchOutcome {
                            records,
                            skipped,
                            termination: Termination::BackendUnreachable {
                                index,
                                message: e.to_string(),
                            },
                        };
                    }
                },
            };

            let parsed = self.parser.parse(&raw);
            if !parsed.skipped_lines.is_empty() {
                warn!(
                    "Prompt {}/{}: skipped undecodable stream lines {:?}",
                    index + 1,
                    total,
                    parsed.skipped_lines
                );
            }
            info!("A: {}", parsed.final_response);

            records.push(PromptRecord::new(
                context,
                item.text.as_str(),
                item.label.clone(),
                parsed.thinking,
                parsed.final_response,
            ));
        }

        BatchOutcome {
            records,
            skipped,
            termination: Termination::Completed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_termination_display() {
        assert_eq!(Termination::Completed.to_string(), "completed");
        assert_eq!(
            Termination::ResetFailed { index: 2 }.to_string(),
            "stopped: context reset failed before prompt 3"
        );
        assert_eq!(
            Termination::BackendUnreachable {
                index: 0,
                message: "refused".to_string()
            }
            .to_string(),
            "stopped: backend unreachable at prompt 1: refused"
        );
    }
}
