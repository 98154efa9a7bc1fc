//! Error types for the CodePilot orchestration layer
//!
//! This module provides comprehensive error handling using thiserror for
//! structured error definitions and anyhow for error propagation.
//!
//! Every error raised by a gateway call or an extractor is caught by the
//! orchestrator that issued the call and turned into a sentinel state; these
//! types never escape to the view as an unhandled fault.

use std::time::Duration;
use thiserror::Error;

/// Main error type for CodePilot operations
#[derive(Error, Debug)]
pub enum CodePilotError {
    /// Blank or empty input; the request is never dispatched
    #[error("Empty input: {0}")]
    UserInput(String),

    /// The generative service call failed (network, service, rate limit)
    #[error("Transport error: {0}")]
    Transport(String),

    /// HTTP request error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response text does not have the expected syntactic shape
    #[error("Parse error: {0}")]
    Parse(String),

    /// Response parsed but is missing required structure
    #[error("Validation error: {0}")]
    Validation(String),

    /// The call exceeded its deadline
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Language id not in the catalogue
    #[error("Unknown language: {0}")]
    UnknownLanguage(String),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl CodePilotError {
    /// True for failures of the gateway call itself.
    ///
    /// Timeouts are handled exactly like transport faults.
    pub fn is_gateway_failure(&self) -> bool {
        matches!(
            self,
            CodePilotError::Transport(_) | CodePilotError::Http(_) | CodePilotError::Timeout(_)
        )
    }

    /// Short stable label used in diagnostic log entries
    pub fn kind(&self) -> &'static str {
        match self {
            CodePilotError::UserInput(_) => "user_input",
            CodePilotError::Transport(_) | CodePilotError::Http(_) => "transport",
            CodePilotError::Parse(_) => "parse",
            CodePilotError::Validation(_) => "validation",
            CodePilotError::Timeout(_) => "timeout",
            CodePilotError::Config(_) => "config",
            CodePilotError::Io(_) => "io",
            CodePilotError::UnknownLanguage(_) => "unknown_language",
            CodePilotError::Other(_) => "other",
        }
    }
}

/// Result type alias for CodePilot operations
pub type Result<T> = std::result::Result<T, CodePilotError>;

/// Convert anyhow::Error to CodePilotError
impl From<anyhow::Error> for CodePilotError {
    fn from(err: anyhow::Error) -> Self {
        CodePilotError::Other(err.to_string())
    }
}
