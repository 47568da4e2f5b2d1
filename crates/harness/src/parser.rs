//! Response parser: stream reassembly, reasoning split and answer cleanup.
//!
//! The backend answers with newline-delimited JSON fragments, each optionally
//! carrying an incremental `response` chunk. Parsing happens in four steps:
//!
//! 1. reassemble the chunks in stream order, skipping undecodable lines
//! 2. split off the reasoning segment delimited by the thinking markers
//! 3. strip the leading answer label (`ANS:`) from the final answer
//! 4. repair the truncated negative verdict (`"o, "` -> `"No, "`)

use log::debug;
use serde::Deserialize;

/// Default marker opening the reasoning segment.
pub const DEFAULT_THINK_START: &str = "<think>";

/// Default marker closing the reasoning segment.
pub const DEFAULT_THINK_END: &str = "</think>";

/// Label token that opens the verdict grammar.
pub const ANSWER_LABEL: &str = "ANS:";

/// Shape of a verdict whose leading `N` was swallowed by an older
/// character-set based label stripper (`"ANS: No, ..."` -> `"o, ..."`).
const TRUNCATED_VERDICT: &str = "o, ";

/// One decoded line of the backend stream.
#[derive(Debug, Deserialize)]
struct StreamFragment {
    #[serde(default)]
    response: Option<String>,
}

/// Plain text rebuilt from a raw stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReassembledStream {
    pub text: String,
    /// 1-based line numbers of non-blank lines that failed to decode.
    pub skipped_lines: Vec<usize>,
}

/// Concatenates the `response` chunk of every decodable line, in order.
///
/// Lines that are not JSON objects are skipped; a fragment without a
/// `response` field contributes nothing.
pub fn reassemble_stream(raw: &str) -> ReassembledStream {
    let mut text = String::new();
    let mut skipped_lines = Vec::new();

    for (idx, line) in raw.trim().split('\n').enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<StreamFragment>(line) {
            Ok(fragment) => {
                if let Some(chunk) = fragment.response {
                    text.push_str(&chunk);
                }
            }
            Err(e) => {
                debug!("Skipping undecodable stream line {}: {}", idx + 1, e);
                skipped_lines.push(idx + 1);
            }
        }
    }

    ReassembledStream {
        text,
        skipped_lines,
    }
}

/// Configuration for [`ResponseParser`].
#[derive(Debug, Clone)]
pub struct ParserConfig {
    pub think_start: String,
    pub think_end: String,
    /// Leading label stripped from the final answer. `None` disables stripping.
    pub answer_label: Option<String>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            think_start: DEFAULT_THINK_START.to_string(),
            think_end: DEFAULT_THINK_END.to_string(),
            answer_label: Some(ANSWER_LABEL.to_string()),
        }
    }
}

/// Result of parsing one backend response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedResponse {
    pub thinking: String,
    pub final_response: String,
    pub skipped_lines: Vec<usize>,
}

/// Turns a raw backend payload into `(thinking, final_response)`.
#[derive(Debug, Clone, Default)]
pub struct ResponseParser {
    config: ParserConfig,
}

impl ResponseParser {
    pub fn new(config: ParserConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parses a raw stream. Deterministic: identical input always yields an
    /// identical result.
    pub fn parse(&self, raw: &str) -> ParsedResponse {
        let stream = reassemble_stream(raw);
        let (thinking, candidate) = self.split_thinking(&stream.text);

        let answer = match self.config.answer_label.as_deref() {
            Some(label) => strip_answer_label(candidate, label),
            None => candidate,
        };

        ParsedResponse {
            thinking: thinking.to_string(),
            final_response: repair_truncated_verdict(answer),
            skipped_lines: stream.skipped_lines,
        }
    }

    /// Splits plain text into `(thinking, candidate_answer)`.
    ///
    /// Both markers must be present, the end marker after the start marker;
    /// otherwise the whole text is the candidate and thinking is empty.
    pub fn split_thinking<'a>(&self, text: &'a str) -> (&'a str, &'a str) {
        let start = &self.config.think_start;
        let end = &self.config.think_end;

        if let Some(start_idx) = text.find(start.as_str()) {
            let body_start = start_idx + start.len();
            if let Some(end_offset) = text[body_start..].find(end.as_str()) {
                let end_idx = body_start + end_offset;
                let thinking = text[body_start..end_idx].trim();
                let answer = text[end_idx + end.len()..].trim();
                return (thinking, answer);
            }
        }

        ("", text.trim())
    }
}

/// Removes `label` from the start of `text`, plus the whitespace after it.
///
/// Literal prefix match only: the label is left alone anywhere else.
pub fn strip_answer_label<'a>(text: &'a str, label: &str) -> &'a str {
    match text.strip_prefix(label) {
        Some(rest) => rest.trim_start(),
        None => text,
    }
}

/// Restores the leading `N` of a negative verdict truncated to `"o, ..."`.
///
/// Compatibility shim for answers produced by a character-set label stripper.
/// Idempotent: a repaired (or unaffected) string is returned unchanged. Any
/// legitimate answer beginning with `"o, "` is rewritten too.
pub fn repair_truncated_verdict(text: &str) -> String {
    if text.starts_with(TRUNCATED_VERDICT) {
        format!("N{text}")
    } else {
        text.to_string()
    }
}
