//! Prompt sources.
//!
//! The harness only needs an ordered list of `(text, label)` pairs. Where they
//! come from (a text file per category, a labelled CSV export, a dataset
//! fetched elsewhere) stays behind [`PromptSource`].

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::Deserialize;

use crate::errors::HarnessError;
use crate::models::LabeledPrompt;
use crate::Result;

/// Produces an ordered sequence of labelled prompts.
pub trait PromptSource {
    /// Human-readable description used in logs.
    fn describe(&self) -> String;

    fn load(&self) -> Result<Vec<LabeledPrompt>>;
}

impl PromptSource for Vec<LabeledPrompt> {
    fn describe(&self) -> String {
        format!("{} in-memory prompts", self.len())
    }

    fn load(&self) -> Result<Vec<LabeledPrompt>> {
        Ok(self.clone())
    }
}

/// One prompt per non-blank line, each trimmed. Every prompt gets the same
/// optional label.
#[derive(Debug, Clone)]
pub struct TextFilePromptSource {
    path: PathBuf,
    label: Option<String>,
}

impl TextFilePromptSource {
    pub fn new(path: impl Into<PathBuf>, label: Option<String>) -> Self {
        Self {
            path: path.into(),
            label,
        }
    }
}

impl PromptSource for TextFilePromptSource {
    fn describe(&self) -> String {
        match &self.label {
            Some(label) => format!("{} [{}]", self.path.display(), label),
            None => self.path.display().to_string(),
        }
    }

    fn load(&self) -> Result<Vec<LabeledPrompt>> {
        let content =
            fs::read_to_string(&self.path).map_err(|e| HarnessError::io(&self.path, e))?;
        Ok(content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| LabeledPrompt::new(line, self.label.clone()))
            .collect())
    }
}

#[derive(Debug, Deserialize)]
struct CsvPromptRow {
    text: String,
    #[serde(default)]
    label: Option<String>,
}

/// CSV file with a header row containing a `text` column and an optional
/// `label` column. Other columns are ignored, rows with a blank text skipped.
#[derive(Debug, Clone)]
pub struct CsvPromptSource {
    path: PathBuf,
}

impl CsvPromptSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn csv_error(&self, e: csv::Error) -> HarnessError {
        HarnessError::Csv {
            path: self.path.clone(),
            message: e.to_string(),
        }
    }
}

impl PromptSource for CsvPromptSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<Vec<LabeledPrompt>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(&self.path)
            .map_err(|e| self.csv_error(e))?;

        let mut prompts = Vec::new();
        for (idx, row) in reader.deserialize::<CsvPromptRow>().enumerate() {
            let row = row.map_err(|e| self.csv_error(e))?;
            if row.text.is_empty() {
                debug!("{}: skipping row {} with empty text", self.describe(), idx + 1);
                continue;
            }
            let label = row.label.filter(|l| !l.is_empty());
            prompts.push(LabeledPrompt::new(row.text, label));
        }
        Ok(prompts)
    }
}

/// Concatenates several sources in order.
#[derive(Default)]
pub struct ChainedPromptSource {
    sources: Vec<Box<dyn PromptSource>>,
}

impl ChainedPromptSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, source: impl PromptSource + 'static) {
        self.sources.push(Box::new(source));
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl PromptSource for ChainedPromptSource {
    fn describe(&self) -> String {
        self.sources
            .iter()
            .map(|s| s.describe())
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn load(&self) -> Result<Vec<LabeledPrompt>> {
        let mut prompts = Vec::new();
        for source in &self.sources {
            let loaded = source.load()?;
            debug!("Loaded {} prompts from {}", loaded.len(), source.describe());
            prompts.extend(loaded);
        }
        Ok(prompts)
    }
}

/// Reads the shared context preamble, trimmed.
///
/// A missing or unreadable file yields an empty context.
pub fn read_context(path: &Path) -> String {
    match fs::read_to_string(path) {
        Ok(content) => content.trim().to_string(),
        Err(e) => {
            warn!("Error reading context file {}: {}", path.display(), e);
            String::new()
        }
    }
}
