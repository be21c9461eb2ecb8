//! JSON artifact decoder.
//!
//! Two shapes exist in the wild:
//!
//! - an array of objects, each carrying its own `name`/`apiname`/`id` field
//!   (Goldberg's newer exports, Steam Web API user-stats dumps);
//! - a flat object keyed by achievement id, values being either an object of
//!   fields (`{"earned": true, "earned_time": ...}`) or a bare scalar.
//!
//! A JSON syntax error is [`DecodeError::Json`]; a document of an unexpected
//! top-level type is [`DecodeError::Malformed`]. Both mean this artifact is
//! skipped, never that the whole reconciliation fails.

use crate::{DecodeError, RawEntry, RawStatRecord, RawValue, Result};
use serde_json::Value;

/// Decode a JSON artifact into a raw record set.
pub fn decode_json(text: &str) -> Result<RawStatRecord> {
    let root: Value = serde_json::from_str(text)?;

    let entries = match root {
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .filter_map(|(index, item)| entry_from_value(index.to_string(), item))
            .collect(),
        Value::Object(map) => map
            .into_iter()
            .filter_map(|(key, value)| entry_from_value(key, value))
            .collect(),
        other => {
            return Err(DecodeError::Malformed(format!(
                "expected JSON array or object, got {}",
                type_name(&other)
            )))
        }
    };

    Ok(RawStatRecord {
        entries,
        earned_only: false,
    })
}

fn entry_from_value(key: String, value: Value) -> Option<RawEntry> {
    match value {
        Value::Object(fields) => {
            let mut entry = RawEntry::new(key);
            for (name, field) in fields {
                if let Some(raw) = scalar(field) {
                    entry.fields.push((name, raw));
                }
            }
            Some(entry)
        }
        other => {
            let scalar = scalar(other)?;
            Some(RawEntry {
                key,
                scalar: Some(scalar),
                ..Default::default()
            })
        }
    }
}

/// Map a scalar JSON value onto a raw value; nested structures are dropped
/// (some exports nest progress sub-objects that carry no unlock state).
fn scalar(value: Value) -> Option<RawValue> {
    match value {
        Value::Bool(b) => Some(RawValue::Bool(b)),
        Value::Number(n) => n.as_i64().map(RawValue::Int),
        Value::String(s) => Some(RawValue::Text(s)),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize;

    #[test]
    fn array_of_objects() {
        let text = r#"[
            {"name": "ACH_WIN", "achieved": 1, "unlocktime": 1581613000},
            {"name": "ACH_DIE", "achieved": 0, "unlocktime": 0}
        ]"#;
        let record = decode_json(text).unwrap();
        assert_eq!(record.entries.len(), 2);
        assert_eq!(record.entries[0].api_name(), "ACH_WIN");
        let state = normalize(&record.entries[0]);
        assert!(state.achieved);
        assert_eq!(state.unlock_time, 1_581_613_000);
        assert!(!normalize(&record.entries[1]).achieved);
    }

    #[test]
    fn goldberg_object_keyed_by_id() {
        let text = r#"{
            "ACH_WIN": {"earned": true, "earned_time": 1581613000},
            "ACH_DIE": {"earned": false, "earned_time": 0}
        }"#;
        let record = decode_json(text).unwrap();
        assert_eq!(record.entries.len(), 2);

        let win = record
            .entries
            .iter()
            .find(|e| e.api_name() == "ACH_WIN")
            .unwrap();
        let state = normalize(win);
        assert!(state.achieved);
        assert_eq!(state.unlock_time, 1_581_613_000);
    }

    #[test]
    fn flat_scalar_object() {
        let text = r#"{"ACH_WIN": "1", "ACH_DIE": "0"}"#;
        let record = decode_json(text).unwrap();
        let win = record
            .entries
            .iter()
            .find(|e| e.api_name() == "ACH_WIN")
            .unwrap();
        assert!(normalize(win).achieved);
    }

    #[test]
    fn syntax_error_is_json_error() {
        assert!(matches!(
            decode_json("{not json"),
            Err(DecodeError::Json(_))
        ));
    }

    #[test]
    fn scalar_root_is_malformed() {
        assert!(matches!(
            decode_json("42"),
            Err(DecodeError::Malformed(_))
        ));
    }

    #[test]
    fn empty_array_is_a_valid_record() {
        assert!(decode_json("[]").unwrap().is_empty());
    }
}
