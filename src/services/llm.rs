//! Generative service gateway
//!
//! The orchestrators see the generative service as one opaque operation:
//! prompt text in, response text out, or a failure. This module provides:
//! - The `GenerativeService` trait the orchestrators depend on
//! - `GeminiService`, the HTTP implementation against the Generative Language API
//! - `DeadlineService`, a wrapper that bounds every call with a timeout

use crate::config::GatewayConfig;
use crate::error::{CodePilotError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Opaque text-generation gateway
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GenerativeService: Send + Sync {
    /// Generate a response for `prompt`
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Gemini-backed generative service
pub struct GeminiService {
    config: GatewayConfig,
    api_key: String,
    client: reqwest::Client,
}

/// generateContent request format
#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<RequestContent>,
}

#[derive(Debug, Serialize)]
struct RequestContent {
    role: String,
    parts: Vec<TextPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TextPart {
    #[serde(default)]
    text: String,
}

/// generateContent response format
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<TextPart>,
}

impl GeminiService {
    /// Create a new service, resolving the API key from config or environment
    pub fn new(config: GatewayConfig) -> Result<Self> {
        let api_key = config.resolve_api_key()?;

        Ok(Self {
            config,
            api_key,
            client: reqwest::Client::new(),
        })
    }

    fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model
        )
    }
}

#[async_trait]
impl GenerativeService for GeminiService {
    async fn generate(&self, prompt: &str) -> Result<String> {
        debug!(
            "Calling generative service ({} chars, model {})",
            prompt.len(),
            self.config.model
        );

        let request = GenerateRequest {
            contents: vec![RequestContent {
                role: "user".to_string(),
                parts: vec![TextPart {
                    text: prompt.to_string(),
                }],
            }],
        };

        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(CodePilotError::Transport(format!(
                "API request failed with status {}: {}",
                status, error_text
            )));
        }

        let api_response: GenerateResponse = response
            .json()
            .await
            .map_err(|e| CodePilotError::Transport(format!("Failed to decode response: {}", e)))?;

        api_response
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .map(|part| part.text)
                    .collect::<String>()
            })
            .ok_or_else(|| CodePilotError::Transport("Empty response from API".to_string()))
    }
}

/// Wraps a service so that every call is bounded by `deadline`.
///
/// An expired call surfaces as `CodePilotError::Timeout`; the orchestrators
/// route it through the same failure path as a transport fault.
pub struct DeadlineService<S> {
    inner: S,
    deadline: Duration,
}

impl<S: GenerativeService> DeadlineService<S> {
    pub fn new(inner: S, deadline: Duration) -> Self {
        Self { inner, deadline }
    }

    pub fn deadline(&self) -> Duration {
        self.deadline
    }
}

#[async_trait]
impl<S: GenerativeService> GenerativeService for DeadlineService<S> {
    async fn generate(&self, prompt: &str) -> Result<String> {
        match tokio::time::timeout(self.deadline, self.inner.generate(prompt)).await {
            Ok(result) => result,
            Err(_) => {
                warn!("Generative service call exceeded {:?}", self.deadline);
                Err(CodePilotError::Timeout(self.deadline))
            }
        }
    }
}
