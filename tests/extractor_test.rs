//! Extraction of typed records from raw service replies

use codepilot_core::extract::{
    parse_json_record, parse_json_value, parse_labeled_fields, parse_labeled_list,
    parse_list_items, segment, NOT_AVAILABLE,
};
use codepilot_core::{CodePilotError, IssueReport, MessagePart, TestPrediction};

#[test]
fn test_segment_mixed_reply() {
    let parts = segment("intro ```js\ncode1\n``` middle ```\ncode2\n``` end");
    assert_eq!(
        parts,
        vec![
            MessagePart::text("intro "),
            MessagePart::code("code1\n", "js"),
            MessagePart::text(" middle "),
            MessagePart::code("code2\n", ""),
            MessagePart::text(" end"),
        ]
    );
}

#[test]
fn test_fenced_test_prediction() {
    let raw = "```json\n{\"passed\":3,\"failed\":1,\"total\":4,\"coverage\":\"80%\",\"duration\":\"1.2s\"}\n```";
    let prediction: TestPrediction =
        parse_json_record(raw, &["passed", "failed", "total", "coverage", "duration"]).unwrap();

    assert_eq!(prediction.passed, 3);
    assert_eq!(prediction.failed, 1);
    assert_eq!(prediction.total, 4);
    assert_eq!(prediction.coverage, "80%");
    assert_eq!(prediction.duration, "1.2s");
}

#[test]
fn test_issue_report_without_performance_is_rejected() {
    let raw = r#"{
        "issues": [{"type": "security", "line": 12, "message": "eval of user input"}],
        "complexity": {"score": 7, "details": "nested loops"}
    }"#;

    let err = parse_json_record::<IssueReport>(raw, &IssueReport::REQUIRED_FIELDS).unwrap_err();
    assert!(matches!(err, CodePilotError::Validation(_)));
}

#[test]
fn test_prose_around_json_is_parse_error() {
    let raw = "Here is your analysis:\n```json\n{\"issues\": []}\n```";
    let err = parse_json_value(raw, &["issues"]).unwrap_err();
    assert!(matches!(err, CodePilotError::Parse(_)));
}

#[test]
fn test_labeled_fields_and_list() {
    let fields = parse_labeled_fields(
        "Error Type: NullPointerException\nLikely Cause: deref of null\n",
        &["Error Type:", "Likely Cause:", "Severity:"],
    );
    assert_eq!(fields["Error Type:"], "NullPointerException");
    assert_eq!(fields["Likely Cause:"], "deref of null");
    assert_eq!(fields["Severity:"], NOT_AVAILABLE);

    assert_eq!(
        parse_labeled_list("Solutions:\n- Check null\n- Add guard\n", "Solutions:"),
        vec!["Check null", "Add guard"]
    );
}

#[test]
fn test_suggestion_batch_ignores_chatter() {
    let raw = "Sure! Suggestions:\n1. Use const for x\n2. Extract loop body\n\nHope this helps.";
    assert_eq!(
        parse_list_items(raw),
        vec!["Use const for x", "Extract loop body"]
    );
    assert!(parse_list_items("No changes needed.").is_empty());
}
