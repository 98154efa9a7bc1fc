//! One-shot report actions
//!
//! Analysis, test generation, test prediction and error diagnosis go straight
//! to the service with no debounce or dedup. Each action owns a `ReportSlot`
//! that holds its phase, its last result and the banner shown on failure.

use crate::error::{CodePilotError, Result};
use crate::extract::{parse_error_diagnosis, parse_json_record, strip_fences};
use crate::services::{prompts, GenerativeService};
use crate::types::{CodeBuffer, ErrorDiagnosis, IssueReport, Language, RequestPhase, TestPrediction};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

pub const ANALYSIS_FAILURE: &str = "Failed to analyze code. Please check the code and try again.";
pub const TEST_GENERATION_FAILURE: &str =
    "Failed to generate tests. Please check your code and try again.";
pub const TEST_PREDICTION_FAILURE: &str =
    "Failed to execute tests. Please validate your test cases.";
pub const DIAGNOSIS_FAILURE: &str = "Failed to analyze error. Please try again.";

/// State of a single report action
pub struct ReportSlot<T> {
    state: Mutex<SlotState<T>>,
}

struct SlotState<T> {
    /// Bumped on every start; only the latest start may settle the slot
    generation: u64,
    phase: RequestPhase,
    value: Option<T>,
    banner: Option<String>,
}

impl<T: Clone> ReportSlot<T> {
    fn new() -> Self {
        Self {
            state: Mutex::new(SlotState {
                generation: 0,
                phase: RequestPhase::Idle,
                value: None,
                banner: None,
            }),
        }
    }

    /// Clear the previous outcome and hand out a ticket for this run
    fn begin(&self) -> u64 {
        let mut state = self.lock();
        state.generation += 1;
        state.phase = RequestPhase::InFlight;
        state.value = None;
        state.banner = None;
        state.generation
    }

    fn settle(&self, ticket: u64, outcome: std::result::Result<T, String>) -> Option<T> {
        let mut state = self.lock();
        if state.generation != ticket {
            debug!(ticket, current = state.generation, "Discarding superseded report");
            return None;
        }

        match outcome {
            Ok(value) => {
                state.phase = RequestPhase::Resolved;
                state.value = Some(value.clone());
                Some(value)
            }
            Err(banner) => {
                state.phase = RequestPhase::Failed;
                state.banner = Some(banner);
                None
            }
        }
    }

    pub fn phase(&self) -> RequestPhase {
        self.lock().phase
    }

    /// Result of the last successful run, if it is still current
    pub fn value(&self) -> Option<T> {
        self.lock().value.clone()
    }

    /// Failure banner of the last run
    pub fn banner(&self) -> Option<String> {
        self.lock().banner.clone()
    }

    fn lock(&self) -> MutexGuard<'_, SlotState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Report actions for the analysis, testing and diagnosis views
pub struct ReportDesk {
    service: Arc<dyn GenerativeService>,
    analysis: ReportSlot<IssueReport>,
    generated_tests: ReportSlot<String>,
    prediction: ReportSlot<TestPrediction>,
    diagnosis: ReportSlot<ErrorDiagnosis>,
}

impl ReportDesk {
    pub fn new(service: Arc<dyn GenerativeService>) -> Self {
        Self {
            service,
            analysis: ReportSlot::new(),
            generated_tests: ReportSlot::new(),
            prediction: ReportSlot::new(),
            diagnosis: ReportSlot::new(),
        }
    }

    /// Bug, performance and complexity report for `buffer`
    pub async fn analyze_code(&self, buffer: &CodeBuffer) -> Option<IssueReport> {
        self.run(
            &self.analysis,
            "code analysis",
            prompts::code_analysis(buffer),
            ANALYSIS_FAILURE,
            |raw| parse_json_record(raw, &IssueReport::REQUIRED_FIELDS),
        )
        .await
    }

    /// Test source for `buffer`, fence delimiters removed
    pub async fn generate_tests(&self, buffer: &CodeBuffer) -> Option<String> {
        self.run(
            &self.generated_tests,
            "test generation",
            prompts::test_generation(buffer),
            TEST_GENERATION_FAILURE,
            |raw| {
                let code = strip_fences(raw);
                if code.is_empty() {
                    Err(CodePilotError::Validation("response contains no test code".to_string()))
                } else {
                    Ok(code)
                }
            },
        )
        .await
    }

    /// Predicted outcome of running `tests`
    pub async fn predict_test_results(
        &self,
        language: Language,
        tests: &str,
    ) -> Option<TestPrediction> {
        self.run(
            &self.prediction,
            "test prediction",
            prompts::test_prediction(language, tests),
            TEST_PREDICTION_FAILURE,
            |raw| parse_json_record(raw, &TestPrediction::REQUIRED_FIELDS),
        )
        .await
    }

    /// Explanation of an error message.
    ///
    /// A blank message issues no request and leaves the slot as it was.
    pub async fn diagnose_error(&self, message: &str) -> Option<ErrorDiagnosis> {
        if message.trim().is_empty() {
            debug!("Ignoring blank error message");
            return None;
        }

        self.run(
            &self.diagnosis,
            "error diagnosis",
            prompts::error_diagnosis(message),
            DIAGNOSIS_FAILURE,
            |raw| Ok(parse_error_diagnosis(raw)),
        )
        .await
    }

    pub fn analysis(&self) -> &ReportSlot<IssueReport> {
        &self.analysis
    }

    pub fn generated_tests(&self) -> &ReportSlot<String> {
        &self.generated_tests
    }

    pub fn prediction(&self) -> &ReportSlot<TestPrediction> {
        &self.prediction
    }

    pub fn diagnosis(&self) -> &ReportSlot<ErrorDiagnosis> {
        &self.diagnosis
    }

    async fn run<T, F>(
        &self,
        slot: &ReportSlot<T>,
        action: &'static str,
        prompt: String,
        banner: &'static str,
        extract: F,
    ) -> Option<T>
    where
        T: Clone,
        F: FnOnce(&str) -> Result<T>,
    {
        let ticket = slot.begin();
        info!("Running {}", action);

        let outcome = match self.service.generate(&prompt).await.and_then(|raw| extract(&raw)) {
            Ok(value) => Ok(value),
            Err(e) => {
                warn!("{} failed ({}): {}", action, e.kind(), e);
                Err(banner.to_string())
            }
        };

        slot.settle(ticket, outcome)
    }
}
