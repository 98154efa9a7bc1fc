//! CodePilot - Response orchestration and extraction for an AI coding assistant
//!
//! Turns a stream of code edits and user actions into calls to a generative
//! text service, and turns the service's free-form replies into typed records:
//! - Debounced, deduplicated improvement suggestions
//! - An ordered chat log with prose and code segments
//! - Bug/complexity reports, generated tests, predicted test results
//! - Error diagnoses
//!
//! # Architecture
//!
//! - **Types**: Core data structures (CodeBuffer, ConversationTurn, IssueReport, etc.)
//! - **Services**: Generative service gateway and prompt catalogue
//! - **Extract**: Tolerant parsers for JSON, labeled and fenced responses
//! - **Orchestration**: Suggestion coordinator, conversation engine, report actions
//! - **Coordination**: Session handoff between views
//!
//! # Example
//!
//! ```ignore
//! use codepilot_core::{CodeBuffer, CodePilotConfig, ConversationEngine, GeminiService};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = CodePilotConfig::load(None)?;
//!     let service = Arc::new(GeminiService::new(config.gateway)?);
//!     let engine = ConversationEngine::new(service);
//!
//!     engine.send(&CodeBuffer::default(), "What does this do?").await?;
//!     for turn in engine.turns() {
//!         println!("{}", turn.plain_text());
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod coordination;
pub mod error;
pub mod extract;
pub mod orchestration;
pub mod services;
pub mod types;

// Re-export commonly used types
pub use config::{CodePilotConfig, GatewayConfig, SuggestionSettings};
pub use coordination::SessionHandoff;
pub use error::{CodePilotError, Result};
pub use orchestration::{
    ChatContext, ConversationEngine, EditSuggestionCoordinator, ReportDesk, ReportSlot,
    SuggestionState,
};
pub use services::{DeadlineService, GeminiService, GenerativeService};
pub use types::{
    CodeBuffer, ConversationTurn, ErrorDiagnosis, Issue, IssueKind, IssueReport, Language,
    MessagePart, RequestPhase, Role, SequenceId, Suggestion, TestPrediction,
};
