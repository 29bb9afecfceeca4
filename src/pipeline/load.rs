//! Loading person records from JSON dumps.

use crate::error::{DedupeError, ErrorContext, InputErrorKind, Result};
use crate::model::{PersonRecord, RecordId};
use serde_json::Value;
use std::path::Path;

/// Records read from one dump, along with where they came from.
#[derive(Debug, Clone)]
pub struct LoadedRecords {
    pub records: Vec<PersonRecord>,
    pub path: String,
}

impl LoadedRecords {
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Read a record dump from disk.
///
/// Accepts a top-level JSON array of records or an object with a
/// `records` (or `users`) array, as produced by WordPress user exports.
pub fn load_records(path: &Path) -> Result<LoadedRecords> {
    tracing::debug!("Reading records from {}", path.display());
    let content =
        std::fs::read_to_string(path).map_err(|e| DedupeError::io(path, e))?;
    let records =
        parse_records(&content).with_context(|| format!("parsing {}", path.display()))?;
    tracing::info!("Loaded {} records from {}", records.len(), path.display());

    Ok(LoadedRecords {
        records,
        path: path.display().to_string(),
    })
}

/// Parse records from a JSON string.
pub fn parse_records(content: &str) -> Result<Vec<PersonRecord>> {
    let value: Value = serde_json::from_str(content)?;
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("records").or_else(|| map.remove("users")) {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(DedupeError::input(
                    "reading top-level object",
                    InputErrorKind::UnexpectedShape,
                ))
            }
        },
        _ => {
            return Err(DedupeError::input(
                "reading top-level value",
                InputErrorKind::UnexpectedShape,
            ))
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| parse_record(index, item))
        .collect()
}

fn parse_record(index: usize, item: Value) -> Result<PersonRecord> {
    let record: PersonRecord = serde_json::from_value(item).map_err(|e| {
        if e.to_string().contains("missing field `id`") {
            DedupeError::input(format!("record {index}"), InputErrorKind::MissingId { index })
        } else {
            DedupeError::input(
                format!("record {index}"),
                InputErrorKind::InvalidJson(e.to_string()),
            )
        }
    })?;

    if matches!(&record.id, RecordId::Text(id) if id.trim().is_empty()) {
        return Err(DedupeError::input(
            format!("record {index}"),
            InputErrorKind::MissingId { index },
        ));
    }
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::PairScorer;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_plain_array() {
        let records = parse_records(r#"[{"id": 1, "first_name": "Ann"}, {"id": "x"}]"#).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].first_name, "Ann");
        assert_eq!(records[1].id, RecordId::from("x"));
    }

    #[test]
    fn test_wrapped_object() {
        let records = parse_records(r#"{"records": [{"ID": 7}]}"#).unwrap();
        assert_eq!(records[0].id, RecordId::Int(7));

        let records = parse_records(r#"{"users": [{"user_id": 8}]}"#).unwrap();
        assert_eq!(records[0].id, RecordId::Int(8));
    }

    #[test]
    fn test_numeric_phone_still_matches() {
        let records = parse_records(
            r#"[{"id": 1, "phone": 7065551212},
                {"id": 2, "phone": "(706) 555-1212", "user_email": 42}]"#,
        )
        .unwrap();
        assert_eq!(records[0].phone, "7065551212");
        assert_eq!(records[1].email, "42");

        let explanation = PairScorer::with_threshold(0).explain(&records[0], &records[1]);
        assert_eq!(explanation.raw_total, 20);
    }

    #[test]
    fn test_unexpected_shape() {
        let err = parse_records(r#"{"people": []}"#).unwrap_err();
        assert!(matches!(
            err,
            DedupeError::Input {
                source: InputErrorKind::UnexpectedShape,
                ..
            }
        ));
        assert!(parse_records("42").is_err());
    }

    #[test]
    fn test_missing_and_blank_ids() {
        let err = parse_records(r#"[{"id": 1}, {"first_name": "NoId"}]"#).unwrap_err();
        assert!(matches!(
            err,
            DedupeError::Input {
                source: InputErrorKind::MissingId { index: 1 },
                ..
            }
        ));

        let err = parse_records(r#"[{"id": "  "}]"#).unwrap_err();
        assert!(matches!(
            err,
            DedupeError::Input {
                source: InputErrorKind::MissingId { index: 0 },
                ..
            }
        ));
    }

    #[test]
    fn test_invalid_json() {
        let err = parse_records("[{").unwrap_err();
        assert!(matches!(
            err,
            DedupeError::Input {
                source: InputErrorKind::InvalidJson(_),
                ..
            }
        ));
    }

    #[test]
    fn test_load_records_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"[{{"id": 1, "user_email": "a@b.c"}}]"#).unwrap();
        let loaded = load_records(file.path()).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.records[0].email, "a@b.c");
    }

    #[test]
    fn test_load_records_missing_file() {
        let err = load_records(Path::new("/nonexistent/records.json")).unwrap_err();
        assert!(matches!(err, DedupeError::Io { .. }));
    }

    #[test]
    fn test_context_names_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let err = load_records(file.path()).unwrap_err();
        match err {
            DedupeError::Input { context, .. } => {
                assert!(context.starts_with("parsing "), "{context}");
                assert!(context.ends_with("JSON deserialization"), "{context}");
            }
            other => panic!("Expected Input error, got {other:?}"),
        }
    }
}
