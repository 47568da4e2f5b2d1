//! Records produced and consumed by the harness.

use serde::{Deserialize, Serialize};

/// Separator placed between the shared context and each prompt.
pub const CONTEXT_SEPARATOR: &str = "\n\n";

/// Builds the literal payload sent to the backend.
///
/// `context + "\n\n" + prompt` when the context is non-empty, otherwise the
/// prompt unchanged.
pub fn compose_full_prompt(context: &str, prompt: &str) -> String {
    if context.is_empty() {
        prompt.to_string()
    } else {
        format!("{context}{CONTEXT_SEPARATOR}{prompt}")
    }
}

/// A prompt as produced by a [`PromptSource`](crate::sources::PromptSource).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledPrompt {
    pub text: String,
    pub label: Option<String>,
}

impl LabeledPrompt {
    pub fn new(text: impl Into<String>, label: Option<String>) -> Self {
        Self {
            text: text.into(),
            label,
        }
    }

    pub fn labeled(text: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(text, Some(label.into()))
    }
}

/// One answered prompt.
///
/// Built once after a successful backend call and never mutated afterwards;
/// fields are only readable through accessors. The serialized field names
/// are the persisted artifact format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptRecord {
    context: String,
    prompt: String,
    #[serde(rename = "label", default, skip_serializing_if = "Option::is_none")]
    category_label: Option<String>,
    full_prompt: String,
    #[serde(rename = "thinking_process", default)]
    thinking: String,
    final_response: String,
}

impl PromptRecord {
    pub fn new(
        context: impl Into<String>,
        prompt: impl Into<String>,
        category_label: Option<String>,
        thinking: impl Into<String>,
        final_response: impl Into<String>,
    ) -> Self {
        let context = context.into();
        let prompt = prompt.into();
        let full_prompt = compose_full_prompt(&context, &prompt);
        Self {
            context,
            prompt,
            category_label,
            full_prompt,
            thinking: thinking.into(),
            final_response: final_response.into(),
        }
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn category_label(&self) -> Option<&str> {
        self.category_label.as_deref()
    }

    pub fn full_prompt(&self) -> &str {
        &self.full_prompt
    }

    pub fn thinking(&self) -> &str {
        &self.thinking
    }

    pub fn final_response(&self) -> &str {
        &self.final_response
    }
}

/// Yes/No confidence pair extracted from one final response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub yes_percent: u32,
    pub no_percent: u32,
}

/// Mean confidences over the scored records of one category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryAverage {
    pub mean_yes: f64,
    pub mean_no: f64,
}
