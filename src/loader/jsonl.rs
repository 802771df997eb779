//! JSONL record loader
//!
//! Provides functionality to load records from JSONL format (one JSON object per line).
//! Each object is a flat record as uploaded to the hosted index.

use crate::record::ResultRecord;
use anyhow::{anyhow, Context, Result};
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

/// JSONL loader for reading records from a reader
pub struct JsonlLoader;

impl JsonlLoader {
    /// Load records from a reader (e.g., stdin)
    ///
    /// Each line should be a JSON object.
    /// Empty lines and lines starting with # are skipped.
    pub fn load_from_reader<R: Read>(reader: R) -> Result<Vec<ResultRecord>> {
        let buf_reader = BufReader::new(reader);
        let mut records = Vec::new();

        for (index, line_result) in buf_reader.lines().enumerate() {
            let line_number = index + 1;
            let line = line_result.context(format!("Failed to read line {}", line_number))?;

            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let value: serde_json::Value = serde_json::from_str(trimmed)
                .with_context(|| format!("Failed to parse JSON at line {}: {}", line_number, trimmed))?;
            let object = value
                .as_object()
                .ok_or_else(|| anyhow!("Line {} is not a JSON object", line_number))?;

            records.push(ResultRecord::from_object(object));
        }

        Ok(records)
    }

    /// Load records from a string
    pub fn load_from_string(content: &str) -> Result<Vec<ResultRecord>> {
        Self::load_from_reader(content.as_bytes())
    }

    /// Load records from a file
    pub fn load_from_file(path: &Path) -> Result<Vec<ResultRecord>> {
        let file = std::fs::File::open(path)
            .with_context(|| format!("Failed to open records file {}", path.display()))?;
        Self::load_from_reader(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::FieldValue;

    #[test]
    fn test_load_single_record() {
        let jsonl = r#"{"objectID":"acme.com","domain":"acme.com","phone_numbers":"(555) 123-4567"}"#;

        let records = JsonlLoader::load_from_string(jsonl).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].object_id().as_deref(), Some("acme.com"));
        assert_eq!(
            records[0].field("phone_numbers"),
            Some(&FieldValue::Text("(555) 123-4567".to_string()))
        );
    }

    #[test]
    fn test_skip_empty_and_comment_lines() {
        let jsonl = r#"# exported records
{"domain":"acme.com"}

{"domain":"globex.com"}"#;

        let records = JsonlLoader::load_from_string(jsonl).unwrap();

        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_invalid_json_error() {
        let result = JsonlLoader::load_from_string("not valid json");

        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("line 1"));
    }

    #[test]
    fn test_non_object_line_error() {
        let result = JsonlLoader::load_from_string("{\"domain\":\"a.com\"}\n[1, 2]");

        let err = result.unwrap_err().to_string();
        assert!(err.contains("Line 2"));
    }

    #[test]
    fn test_empty_input() {
        let records = JsonlLoader::load_from_string("").unwrap();

        assert!(records.is_empty());
    }
}
