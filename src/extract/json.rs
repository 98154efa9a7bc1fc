//! JSON mode
//!
//! Strip an optional surrounding fence, parse, check required top-level
//! keys, then deserialize into the typed record. Syntax problems are
//! `Parse` errors; anything that parses but has the wrong structure is a
//! `Validation` error.

use super::fenced::{info_token, FENCE};
use crate::error::{CodePilotError, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Parse `raw` as a JSON value carrying every key in `required_fields`.
pub fn parse_json_value(raw: &str, required_fields: &[&str]) -> Result<Value> {
    let body = strip_surrounding_fence(raw);
    if body.is_empty() {
        return Err(CodePilotError::Parse("empty response".to_string()));
    }

    let value: Value = serde_json::from_str(body)
        .map_err(|e| CodePilotError::Parse(format!("response is not valid JSON: {}", e)))?;

    let missing: Vec<&str> = match value.as_object() {
        Some(object) => required_fields
            .iter()
            .copied()
            .filter(|field| !object.contains_key(*field))
            .collect(),
        None => required_fields.to_vec(),
    };

    if !missing.is_empty() {
        return Err(CodePilotError::Validation(format!(
            "missing required field(s): {}",
            missing.join(", ")
        )));
    }

    Ok(value)
}

/// Parse `raw` into a typed record.
///
/// A value that has every required key but does not match `T` (wrong types,
/// missing nested fields) is rejected whole as a `Validation` error.
pub fn parse_json_record<T: DeserializeOwned>(raw: &str, required_fields: &[&str]) -> Result<T> {
    let value = parse_json_value(raw, required_fields)?;
    serde_json::from_value(value).map_err(|e| {
        CodePilotError::Validation(format!("record does not match expected structure: {}", e))
    })
}

/// Remove one fenced block wrapping the whole text, if present.
fn strip_surrounding_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(after_open) = trimmed.strip_prefix(FENCE) else {
        return trimmed;
    };

    let body = match after_open.find('\n') {
        Some(nl) if info_token(&after_open[..nl]).is_some() => &after_open[nl + 1..],
        _ => after_open.trim_start_matches(|c: char| c.is_ascii_alphanumeric()),
    };

    let body = body.trim_end();
    body.strip_suffix(FENCE).unwrap_or(body).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{IssueReport, TestPrediction};

    const PREDICTION: &str = "```json\n{\"passed\":3,\"failed\":1,\"total\":4,\"coverage\":\"80%\",\"duration\":\"1.2s\"}\n```";

    #[test]
    fn test_fenced_prediction() {
        let prediction: TestPrediction =
            parse_json_record(PREDICTION, &TestPrediction::REQUIRED_FIELDS).unwrap();
        assert_eq!(
            prediction,
            TestPrediction {
                passed: 3,
                failed: 1,
                total: 4,
                coverage: "80%".to_string(),
                duration: "1.2s".to_string(),
            }
        );
    }

    #[test]
    fn test_unfenced_and_untagged_fences() {
        let bare = r#"{"a": 1}"#;
        assert_eq!(parse_json_value(bare, &["a"]).unwrap()["a"], 1);

        let untagged = "```\n{\"a\": 2}\n```";
        assert_eq!(parse_json_value(untagged, &["a"]).unwrap()["a"], 2);

        let same_line = "```json{\"a\": 3}```";
        assert_eq!(parse_json_value(same_line, &["a"]).unwrap()["a"], 3);
    }

    #[test]
    fn test_missing_required_field_is_validation_error() {
        let raw = r#"{"issues": [], "complexity": {"score": 1, "details": "flat"}}"#;
        let err = parse_json_record::<IssueReport>(raw, &IssueReport::REQUIRED_FIELDS).unwrap_err();
        match err {
            CodePilotError::Validation(msg) => assert!(msg.contains("performance")),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_syntax_is_parse_error() {
        for raw in ["", "   ", "Sure! Here is the JSON you asked for", "{\"passed\": 3,"] {
            let err = parse_json_value(raw, &[]).unwrap_err();
            assert!(matches!(err, CodePilotError::Parse(_)), "input {:?}", raw);
        }
    }

    #[test]
    fn test_non_object_fails_required_fields() {
        let err = parse_json_value("[1, 2, 3]", &["passed"]).unwrap_err();
        assert!(matches!(err, CodePilotError::Validation(_)));
    }

    #[test]
    fn test_wrong_types_are_rejected_whole() {
        let raw = r#"{"passed":"three","failed":1,"total":4,"coverage":"80%","duration":"1s"}"#;
        let err =
            parse_json_record::<TestPrediction>(raw, &TestPrediction::REQUIRED_FIELDS).unwrap_err();
        assert!(matches!(err, CodePilotError::Validation(_)));
    }
}
