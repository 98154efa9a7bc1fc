//! Services layer for CodePilot
//!
//! Provides the generative service gateway and the prompt catalogue.

pub mod llm;
pub mod prompts;

pub use llm::{DeadlineService, GeminiService, GenerativeService};
