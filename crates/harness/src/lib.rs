//! Verdict harness - batch evaluation of a local text-generation model.
//!
//! Drives a model through categorized prompts, rebuilds each streamed answer
//! into a [`PromptRecord`], extracts the `ANS: <verdict>, Yes: n%, No: n%`
//! trailer and averages the percentages per category.
//!
//! # Architecture
//!
//! ```text
//! PromptSource --> PromptDispatcher --(reset, generate)--> GenerationBackend
//!                        |
//!                        v
//!                  ResponseParser --> PromptRecord[] --> store (JSON)
//!                                          |
//!                                          v
//!                                 scoring::aggregate --> CategoryReport
//! ```
//!
//! - `backend`: backend trait and the HTTP implementation
//! - `reset`: context reset before each prompt
//! - `dispatcher`: the sequential batch loop
//! - `parser`: stream reassembly, thinking split, answer cleanup
//! - `scoring`: verdict extraction and per-category means
//! - `report`: report built from the means
//! - `sources`: prompt sources (text, CSV, chained)
//! - `store`: the persisted response artifact
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use verdict_harness::{OllamaBackend, OllamaConfig, PromptDispatcher};
//!
//! let backend = Arc::new(OllamaBackend::new(OllamaConfig::default()));
//! let dispatcher = PromptDispatcher::new(backend, "filter");
//! let outcome = dispatcher.run_batch(&context, &prompts).await;
//! verdict_harness::store::save_records(&output, &outcome.records)?;
//! ```

pub mod backend;
pub mod dispatcher;
pub mod errors;
pub mod models;
pub mod pacing;
pub mod parser;
pub mod report;
pub mod reset;
pub mod scoring;
pub mod sources;
pub mod store;

pub use backend::{GenerateRequest, GenerationBackend, OllamaBackend, OllamaConfig};
pub use dispatcher::{BatchOutcome, PromptDispatcher, Termination};
pub use errors::{BackendError, FaultClass, HarnessError};
pub use models::{compose_full_prompt, CategoryAverage, LabeledPrompt, PromptRecord, ScoreRecord};
pub use pacing::{FixedDelayPacer, RequestPacer};
pub use parser::{ParsedResponse, ParserConfig, ResponseParser};
pub use report::CategoryReport;
pub use reset::ContextResetController;
pub use scoring::{aggregate, averages, extract_record_scores, extract_scores, CategorySummary};
pub use sources::{
    read_context, ChainedPromptSource, CsvPromptSource, PromptSource, TextFilePromptSource,
};

/// Result type for harness operations.
pub type Result<T> = std::result::Result<T, HarnessError>;
