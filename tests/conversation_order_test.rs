//! Turn ordering of the conversation engine under out-of-order replies

mod common;

use codepilot_core::orchestration::CHAT_FAILURE;
use codepilot_core::{ChatContext, CodeBuffer, ConversationEngine, Language, MessagePart, Role};
use common::ScriptedService;
use std::sync::Arc;
use std::time::Duration;

fn context(query: &str) -> ChatContext {
    ChatContext::new(CodeBuffer::from_template(Language::Rust), query)
}

#[tokio::test(start_paused = true)]
async fn test_late_reply_keeps_its_reserved_position() {
    let service = Arc::new(
        ScriptedService::new()
            .reply("first question", Duration::from_secs(5), "slow answer")
            .reply("second question", Duration::from_secs(1), "fast answer"),
    );
    let engine = ConversationEngine::new(service);

    let first = context("first question");
    let second = context("second question");
    let (slow_id, fast_id, _) = tokio::join!(
        engine.request_assistant_turn(&first),
        engine.request_assistant_turn(&second),
        async {
            tokio::time::sleep(Duration::from_secs(2)).await;
            assert_eq!(engine.awaiting(), vec![1]);
            let done: Vec<_> = engine.turns().iter().map(|t| t.sequence_id).collect();
            assert_eq!(done, vec![2]);
        }
    );

    assert_eq!((slow_id, fast_id), (1, 2));
    let texts: Vec<_> = engine.turns().iter().map(|t| t.plain_text()).collect();
    assert_eq!(texts, vec!["slow answer", "fast answer"]);
    assert!(engine.awaiting().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_user_turn_issued_during_flight_follows_reservation() {
    let service = Arc::new(ScriptedService::new().reply("explain", Duration::from_secs(3), "ok"));
    let engine = ConversationEngine::new(service);

    let question = context("explain");
    let (reply_id, user_id) = tokio::join!(engine.request_assistant_turn(&question), async {
        tokio::time::sleep(Duration::from_secs(1)).await;
        engine.append_user_turn("and another thing").unwrap()
    });

    assert!(reply_id < user_id);
    let roles: Vec<_> = engine.turns().iter().map(|t| t.role).collect();
    assert_eq!(roles, vec![Role::Assistant, Role::User]);
}

#[tokio::test]
async fn test_sequence_ids_strictly_increase() {
    let service = Arc::new(ScriptedService::new().reply("Current Code", Duration::ZERO, "fine"));
    let engine = ConversationEngine::new(service);
    let buffer = CodeBuffer::default();

    engine.send(&buffer, "one").await.unwrap();
    assert!(engine.send(&buffer, "  ").await.is_err());
    engine.send(&buffer, "two").await.unwrap();

    let ids: Vec<_> = engine.turns().iter().map(|t| t.sequence_id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4]);
}

#[tokio::test]
async fn test_failed_reply_is_error_turn() {
    let service = Arc::new(ScriptedService::new().fail("Current Code", Duration::ZERO, "down"));
    let engine = ConversationEngine::new(service);

    let id = engine.send(&CodeBuffer::default(), "hello?").await.unwrap();
    let turn = engine.turn(id).unwrap();
    assert!(turn.is_error);
    assert_eq!(turn.parts, vec![MessagePart::text(CHAT_FAILURE)]);
    assert_eq!(engine.len(), 2);
}

#[tokio::test]
async fn test_reply_parts_reassemble_to_raw_text_minus_fences() {
    let raw = "Try this:\n```rust\nlet v: Vec<u8> = Vec::new();\n```\nThen push.";
    let service = Arc::new(ScriptedService::new().reply("Current Code", Duration::ZERO, raw));
    let engine = ConversationEngine::new(service);

    let id = engine.send(&CodeBuffer::default(), "vec?").await.unwrap();
    let turn = engine.turn(id).unwrap();
    assert_eq!(turn.parts.iter().filter(|p| p.is_code()).count(), 1);
    assert_eq!(
        turn.plain_text(),
        "Try this:\nlet v: Vec<u8> = Vec::new();\n\nThen push."
    );
}
