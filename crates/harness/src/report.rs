//! Category report handed to reporting consumers.
//!
//! The report carries the numbers only; rendering charts is left to whoever
//! consumes [`CategoryReport::averages`] or the JSON file.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::HarnessError;
use crate::models::PromptRecord;
use crate::scoring::{aggregate, averages, CategorySummary};
use crate::Result;

/// Aggregated scores for one set of records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryReport {
    pub generated_at: DateTime<Utc>,
    pub total_records: usize,
    /// Records without a category label; never aggregated.
    pub unlabeled_records: usize,
    pub categories: BTreeMap<String, CategorySummary>,
}

impl CategoryReport {
    pub fn from_records(records: &[PromptRecord]) -> Self {
        Self {
            generated_at: Utc::now(),
            total_records: records.len(),
            unlabeled_records: records
                .iter()
                .filter(|r| r.category_label().is_none())
                .count(),
            categories: aggregate(records),
        }
    }

    /// `label -> (mean_yes, mean_no)` for every category with a defined mean.
    pub fn averages(&self) -> BTreeMap<String, (f64, f64)> {
        averages(&self.categories)
    }

    /// Labelled records that carried no verdict trailer.
    pub fn unscored_records(&self) -> usize {
        self.categories
            .values()
            .map(|s| s.records - s.scored)
            .sum()
    }

    /// Plain-text table, one row per category.
    pub fn render_table(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{:<20} {:>8} {:>10} {:>10}",
            "Category", "Scored", "Yes (avg)", "No (avg)"
        );
        for (label, summary) in &self.categories {
            let (yes, no) = match summary.average {
                Some(avg) => (
                    format!("{:.1}%", avg.mean_yes),
                    format!("{:.1}%", avg.mean_no),
                ),
                None => ("n/a".to_string(), "n/a".to_string()),
            };
            let _ = writeln!(
                out,
                "{:<20} {:>8} {:>10} {:>10}",
                display_name(label),
                format!("{}/{}", summary.scored, summary.records),
                yes,
                no
            );
        }
        if self.unlabeled_records > 0 {
            let _ = writeln!(out, "({} unlabeled records not aggregated)", self.unlabeled_records);
        }
        out
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|e| HarnessError::io(path, e))
    }
}

/// `temp_unsafe` -> `Temp Unsafe`.
pub fn display_name(label: &str) -> String {
    label
        .split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    fn records() -> Vec<PromptRecord> {
        vec![
            PromptRecord::new("", "a", Some("safe".into()), "", "Yes, Yes: 10%, No: 90%"),
            PromptRecord::new("", "b", Some("safe".into()), "", "ANS: Yes, Yes: 20%, No: 80%"),
            PromptRecord::new("", "c", Some("temp_unsafe".into()), "", "refused"),
            PromptRecord::new("", "d", None, "", "No, Yes: 1%, No: 99%"),
        ]
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("safe"), "Safe");
        assert_eq!(display_name("temp_unsafe"), "Temp Unsafe");
        assert_eq!(display_name("frame_unsafe"), "Frame Unsafe");
    }

    #[test]
    fn test_report_counts() {
        let report = CategoryReport::from_records(&records());
        assert_eq!(report.total_records, 4);
        assert_eq!(report.unlabeled_records, 1);
        assert_eq!(report.unscored_records(), 1);
        assert_eq!(report.averages()["safe"], (15.0, 85.0));
        assert!(!report.averages().contains_key("temp_unsafe"));
    }

    #[test]
    fn test_render_table() {
        let table = CategoryReport::from_records(&records()).render_table();
        assert!(table.contains("Safe"));
        assert!(table.contains("2/2"));
        assert!(table.contains("15.0%"));
        assert!(table.contains("85.0%"));
        assert!(table.contains("Temp Unsafe"));
        assert!(table.contains("n/a"));
        assert!(table.contains("1 unlabeled"));
    }

    #[test]
    fn test_write_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.json");
        let report = CategoryReport::from_records(&records());
        report.write_json(&path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["totalRecords"], 4);
        assert_eq!(value["categories"]["safe"]["average"]["mean_yes"], 15.0);
        assert!(value["categories"]["temp_unsafe"]["average"].is_null());
    }
}
