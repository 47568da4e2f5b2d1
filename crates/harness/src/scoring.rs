//! Verdict extraction and per-category aggregation.
//!
//! The model is asked to close its answer with a fixed trailer:
//!
//! ```text
//! ANS: <verdict>, Yes: <int>%, No: <int>%
//! ```
//!
//! Everything here is pure: no I/O, no ordering assumptions.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::models::{CategoryAverage, PromptRecord, ScoreRecord};
use crate::parser::ANSWER_LABEL;

static VERDICT_TRAILER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"ANS: \w+, Yes: (\d+)%, No: (\d+)%").expect("Invalid verdict regex")
});

/// Extracts the Yes/No percentages from the first verdict trailer in `text`.
///
/// Returns `None` when no trailer is present. A missing trailer is never
/// reported as `(0, 0)`.
pub fn extract_scores(text: &str) -> Option<ScoreRecord> {
    let caps = VERDICT_TRAILER.captures(text)?;
    let yes_percent = caps.get(1)?.as_str().parse().ok()?;
    let no_percent = caps.get(2)?.as_str().parse().ok()?;
    Some(ScoreRecord {
        yes_percent,
        no_percent,
    })
}

/// Extracts scores from a stored final response.
///
/// Stored answers have their leading `ANS:` label stripped by the parser, so
/// the text is also tried re-anchored with the label. That second attempt only
/// matches answers that begin with the verdict grammar.
pub fn extract_record_scores(final_response: &str) -> Option<ScoreRecord> {
    extract_scores(final_response)
        .or_else(|| extract_scores(&format!("{ANSWER_LABEL} {final_response}")))
}

/// Per-category counts and means.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    /// Records carrying this label.
    pub records: usize,
    /// Records whose final response matched the verdict grammar.
    pub scored: usize,
    /// `None` when no record of the category could be scored.
    pub average: Option<CategoryAverage>,
}

#[derive(Default)]
struct Accumulator {
    records: usize,
    scored: usize,
    yes_sum: f64,
    no_sum: f64,
}

impl Accumulator {
    fn finish(self) -> CategorySummary {
        let average = (self.scored > 0).then(|| CategoryAverage {
            mean_yes: self.yes_sum / self.scored as f64,
            mean_no: self.no_sum / self.scored as f64,
        });
        CategorySummary {
            records: self.records,
            scored: self.scored,
            average,
        }
    }
}

/// Groups labelled records by category and averages their scores.
///
/// Records without a label are ignored; records without a verdict trailer are
/// counted in `records` but excluded from the means.
pub fn aggregate(records: &[PromptRecord]) -> BTreeMap<String, CategorySummary> {
    let mut groups: BTreeMap<String, Accumulator> = BTreeMap::new();

    for record in records {
        let Some(label) = record.category_label() else {
            continue;
        };
        let acc = groups.entry(label.to_string()).or_default();
        acc.records += 1;
        if let Some(score) = extract_record_scores(record.final_response()) {
            acc.scored += 1;
            acc.yes_sum += f64::from(score.yes_percent);
            acc.no_sum += f64::from(score.no_percent);
        }
    }

    groups
        .into_iter()
        .map(|(label, acc)| (label, acc.finish()))
        .collect()
}

/// The mapping handed to reporting consumers: `label -> (mean_yes, mean_no)`.
///
/// Categories whose average is undefined are left out.
pub fn averages(summaries: &BTreeMap<String, CategorySummary>) -> BTreeMap<String, (f64, f64)> {
    summaries
        .iter()
        .filter_map(|(label, summary)| {
            summary
                .average
                .map(|avg| (label.clone(), (avg.mean_yes, avg.mean_no)))
        })
        .collect()
}
