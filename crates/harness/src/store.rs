//! Persisted response artifact: a pretty-printed JSON array of records.

use std::fs;
use std::path::Path;

use log::info;

use crate::errors::HarnessError;
use crate::models::PromptRecord;
use crate::Result;

/// Writes all records to `path` in one go, creating parent directories.
pub fn save_records(path: &Path, records: &[PromptRecord]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| HarnessError::io(parent, e))?;
    }
    let json = serde_json::to_string_pretty(records)?;
    fs::write(path, json).map_err(|e| HarnessError::io(path, e))?;
    info!("Saved {} responses to {}", records.len(), path.display());
    Ok(())
}

/// Reads records previously written by [`save_records`].
pub fn load_records(path: &Path) -> Result<Vec<PromptRecord>> {
    let content = fs::read_to_string(path).map_err(|e| HarnessError::io(path, e))?;
    Ok(serde_json::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;
    use crate::scoring::extract_record_scores;

    #[test]
    fn test_save_then_load_preserves_scores() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("runs").join("responses.json");
        let records = vec![
            PromptRecord::new(
                "Context",
                "Is this allowed?",
                Some("safe".to_string()),
                "thinking about it",
                "Yes, Yes: 91%, No: 9%",
            ),
            PromptRecord::new("", "Überprüfen", None, "", "No, Yes: 2%, No: 98%"),
        ];

        save_records(&path, &records).unwrap();
        let reloaded = load_records(&path).unwrap();

        assert_eq!(reloaded, records);
        for (before, after) in records.iter().zip(&reloaded) {
            assert_eq!(
                extract_record_scores(before.final_response()),
                extract_record_scores(after.final_response())
            );
        }
    }

    #[test]
    fn test_saved_file_is_utf8_json_array() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("responses.json");
        let records = vec![PromptRecord::new("", "café", None, "", "ok")];
        save_records(&path, &records).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with('['));
        assert!(content.contains("café"));
        assert!(content.contains("\"thinking_process\""));
    }

    #[test]
    fn test_save_empty_batch() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("responses.json");
        save_records(&path, &[]).unwrap();
        assert!(load_records(&path).unwrap().is_empty());
    }

    #[test]
    fn test_load_missing_file() {
        let result = load_records(Path::new("/nonexistent/responses.json"));
        assert!(matches!(result, Err(HarnessError::Io { .. })));
    }
}
