//! History export for the dataset-generation pipeline
//!
//! One JSON object per line, in ledger order. Each line is a full
//! [`HistoryRecord`]: the command, the outcome (resulting object ids and
//! derived properties, or the stable error code), the backend mode that
//! produced it, and the timestamp. The pipeline recovers
//! (command → resulting-state) training pairs directly from these lines.

use std::fs;
use std::path::Path;

use cadforge_core::errors::Result;
use cadforge_core::model::HistoryRecord;

/// Serialize records as JSON Lines
///
/// # Errors
///
/// Returns `Serialization` if a record fails to encode.
pub fn export_history(records: &[HistoryRecord]) -> Result<String> {
    let mut out = String::new();
    for record in records {
        out.push_str(&serde_json::to_string(record)?);
        out.push('\n');
    }
    Ok(out)
}

/// Write records as JSON Lines to a file
///
/// # Errors
///
/// Returns `Serialization` on encoding failure or `Io` on filesystem
/// failure.
pub fn write_history(records: &[HistoryRecord], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, export_history(records)?)?;
    tracing::debug!(path = %path.display(), records = records.len(), "history exported");
    Ok(())
}

/// Parse a JSON Lines export back into records
///
/// Blank lines are skipped. Round-tripping an export through this
/// function reproduces the original sequence.
///
/// # Errors
///
/// Returns `Serialization` if any line is not a valid record.
pub fn parse_history(jsonl: &str) -> Result<Vec<HistoryRecord>> {
    jsonl
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| Ok(serde_json::from_str(line)?))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadforge_core::Command;
    use cadforge_core_types::{BackendMode, ObjectId};

    fn sample_records() -> Vec<HistoryRecord> {
        vec![
            HistoryRecord::success(
                1,
                Command::new("create_box")
                    .with_param("length", 10.0)
                    .with_param("width", 5.0)
                    .with_param("height", 3.0),
                vec![ObjectId::derived("box", 1)],
                None,
                BackendMode::Simulated,
            ),
            HistoryRecord::failure(
                2,
                Command::new("create_sphere"),
                &cadforge_core::CadError::InvalidParameter {
                    operation: "create_sphere".into(),
                    violations: vec!["radius: missing required parameter".into()],
                },
                BackendMode::Simulated,
            ),
        ]
    }

    #[test]
    fn test_export_emits_one_line_per_record() {
        let records = sample_records();
        let jsonl = export_history(&records).unwrap();
        assert_eq!(jsonl.lines().count(), 2);
    }

    #[test]
    fn test_export_parses_back_identically() {
        let records = sample_records();
        let jsonl = export_history(&records).unwrap();
        let parsed = parse_history(&jsonl).unwrap();
        assert_eq!(parsed, records);
    }
}
