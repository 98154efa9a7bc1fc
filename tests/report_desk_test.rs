//! Report actions against a scripted gateway

mod common;

use codepilot_core::orchestration::{ANALYSIS_FAILURE, TEST_PREDICTION_FAILURE};
use codepilot_core::{
    CodeBuffer, IssueKind, Language, ReportDesk, ReportSlot, RequestPhase, SessionHandoff,
};
use common::ScriptedService;
use std::sync::Arc;
use std::time::Duration;

const ANALYSIS: &str = r#"```json
{
  "issues": [
    {"type": "performance", "line": 4, "message": "quadratic lookup"},
    {"type": "security", "line": 9, "message": "unsanitized input"}
  ],
  "performance": {"score": 55, "suggestions": ["use a set"]},
  "complexity": {"score": 6, "details": "two nested loops"}
}
```"#;

/// Phase and banner of a slot, as a view would render them
fn render<T: Clone>(slot: &ReportSlot<T>) -> (RequestPhase, Option<String>) {
    (slot.phase(), slot.banner())
}

#[test]
fn test_debug_view_analyzes_handed_off_buffer() {
    let editor = SessionHandoff::new();
    editor.store_buffer(&CodeBuffer::new("def f(xs):\n  pass", Language::Python));

    let debug_view = editor.clone();
    let buffer = debug_view.load_buffer().unwrap();

    let service = Arc::new(ScriptedService::new().reply("python code", Duration::ZERO, ANALYSIS));
    let desk = ReportDesk::new(service.clone());
    let report = tokio_test::block_on(desk.analyze_code(&buffer)).unwrap();

    assert_eq!(report.issues.len(), 2);
    assert_eq!(report.issues[1].kind, IssueKind::Security);
    assert_eq!(report.performance_suggestions, vec!["use a set"]);
    assert!(service.calls()[0].contains("def f(xs):"));
}

#[test]
fn test_new_run_clears_previous_result() {
    let service = Arc::new(
        ScriptedService::new()
            .reply("good code", Duration::ZERO, ANALYSIS)
            .reply("bad code", Duration::ZERO, "not json at all"),
    );
    let desk = ReportDesk::new(service);

    let good = CodeBuffer::new("// good code", Language::JavaScript);
    let bad = CodeBuffer::new("// bad code", Language::JavaScript);

    assert!(tokio_test::block_on(desk.analyze_code(&good)).is_some());
    assert_eq!(desk.analysis().phase(), RequestPhase::Resolved);

    assert!(tokio_test::block_on(desk.analyze_code(&bad)).is_none());
    assert_eq!(
        render(desk.analysis()),
        (RequestPhase::Failed, Some(ANALYSIS_FAILURE.to_string()))
    );
    assert!(desk.analysis().value().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_superseded_prediction_is_ignored() {
    let service = Arc::new(
        ScriptedService::new()
            .reply(
                "old suite",
                Duration::from_secs(5),
                r#"{"passed":1,"failed":0,"total":1,"coverage":"10%","duration":"1s"}"#,
            )
            .reply(
                "new suite",
                Duration::from_secs(1),
                r#"{"passed":8,"failed":2,"total":10,"coverage":"75%","duration":"3s"}"#,
            ),
    );
    let desk = ReportDesk::new(service);

    let (old, new) = tokio::join!(
        desk.predict_test_results(Language::JavaScript, "// old suite"),
        desk.predict_test_results(Language::JavaScript, "// new suite"),
    );

    assert!(old.is_none());
    assert_eq!(new.map(|p| p.passed), Some(8));
    assert_eq!(desk.prediction().value().map(|p| p.total), Some(10));
    assert_eq!(desk.prediction().phase(), RequestPhase::Resolved);
}

#[tokio::test]
async fn test_prediction_with_wrong_types_fails_whole() {
    let service = Arc::new(ScriptedService::new().reply(
        "Tests:",
        Duration::ZERO,
        r#"{"passed":"all","failed":0,"total":3,"coverage":"90%","duration":"2s"}"#,
    ));
    let desk = ReportDesk::new(service);

    assert!(desk
        .predict_test_results(Language::Python, "def test_x(): pass")
        .await
        .is_none());
    assert_eq!(desk.prediction().banner().as_deref(), Some(TEST_PREDICTION_FAILURE));
}

#[tokio::test]
async fn test_diagnosis_end_to_end() {
    let reply = "**Error Type:** TypeError\n**Likely Cause:** calling undefined\n**Solutions:**\n- Check the import\n- Guard the call\n";
    let service = Arc::new(ScriptedService::new().reply("Error Message:", Duration::ZERO, reply));
    let desk = ReportDesk::new(service);

    let diagnosis = desk
        .diagnose_error("TypeError: x is not a function")
        .await
        .unwrap();
    assert_eq!(diagnosis.error_type, "TypeError");
    assert_eq!(diagnosis.cause, "calling undefined");
    assert_eq!(diagnosis.solutions, vec!["Check the import", "Guard the call"]);
}
