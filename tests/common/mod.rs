//! Common test utilities and helpers

#![allow(dead_code)]

use async_trait::async_trait;
use codepilot_core::{CodePilotError, GenerativeService, Result};
use std::sync::Mutex;
use std::time::Duration;

/// In-memory generative service with per-prompt latency and replies.
///
/// The first rule whose needle occurs in the prompt decides the outcome.
/// Every prompt is recorded, in call order.
#[derive(Default)]
pub struct ScriptedService {
    rules: Vec<Rule>,
    calls: Mutex<Vec<String>>,
}

struct Rule {
    needle: String,
    delay: Duration,
    reply: std::result::Result<String, String>,
}

impl ScriptedService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer prompts containing `needle` with `text` after `delay`
    pub fn reply(mut self, needle: &str, delay: Duration, text: &str) -> Self {
        self.rules.push(Rule {
            needle: needle.to_string(),
            delay,
            reply: Ok(text.to_string()),
        });
        self
    }

    /// Fail prompts containing `needle` with a transport error after `delay`
    pub fn fail(mut self, needle: &str, delay: Duration, message: &str) -> Self {
        self.rules.push(Rule {
            needle: needle.to_string(),
            delay,
            reply: Err(message.to_string()),
        });
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl GenerativeService for ScriptedService {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.calls.lock().unwrap().push(prompt.to_string());

        let Some(rule) = self.rules.iter().find(|rule| prompt.contains(&rule.needle)) else {
            return Err(CodePilotError::Transport("no scripted reply".to_string()));
        };

        tokio::time::sleep(rule.delay).await;
        rule.reply.clone().map_err(CodePilotError::Transport)
    }
}

/// Code section of a suggestion prompt for `content`
pub fn code_marker(content: &str) -> String {
    format!("Code:\n{}\n", content)
}
