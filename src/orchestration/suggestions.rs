//! Debounced improvement suggestions
//!
//! Edits arrive far more often than the generative service can answer. The
//! coordinator waits for a quiet period after the last edit, skips content it
//! has already analyzed, and tags every dispatched request with an epoch so
//! that a slow response can never overwrite the answer to a newer request.
//!
//! ```ignore
//! let coordinator = EditSuggestionCoordinator::new(service, Duration::from_secs(2));
//! coordinator.submit_edit("fn main() {}");
//! let mut state = coordinator.subscribe();
//! state.changed().await?;
//! ```

use super::debounce::Debouncer;
use crate::extract::parse_list_items;
use crate::services::{prompts, GenerativeService};
use crate::types::{RequestPhase, Suggestion};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, warn};

/// Suggestion shown when the current request failed
pub const SUGGESTION_FAILURE: &str = "Could not generate suggestions at this time";

/// Snapshot published to subscribers after every transition
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SuggestionState {
    /// Latest batch, replaced whole
    pub suggestions: Vec<Suggestion>,
    pub phase: RequestPhase,
    /// Epoch of the most recent dispatch
    pub epoch: u64,
}

/// Debounces edits and keeps the suggestion list for one editor view
pub struct EditSuggestionCoordinator {
    shared: Arc<Shared>,
}

struct Shared {
    service: Arc<dyn GenerativeService>,
    inner: Mutex<Inner>,
    state_tx: watch::Sender<SuggestionState>,
}

struct Inner {
    epoch: u64,
    last_dispatched: Option<String>,
    debouncer: Debouncer,
    /// Epoch and content of the request still outstanding
    in_flight: Option<(u64, String)>,
    /// Phase reached by the last applied response
    outcome: RequestPhase,
    suggestions: Vec<Suggestion>,
}

impl Inner {
    fn begin_dispatch(&mut self, content: &str) -> u64 {
        self.epoch += 1;
        self.in_flight = Some((self.epoch, content.to_string()));
        self.epoch
    }

    /// Content of the current epoch's request, if it has not answered yet
    fn current_in_flight(&self) -> Option<&str> {
        match &self.in_flight {
            Some((epoch, content)) if *epoch == self.epoch => Some(content),
            _ => None,
        }
    }

    /// Supersede the outstanding request so its response is dropped
    fn abandon_in_flight(&mut self) {
        self.epoch += 1;
        self.in_flight = None;
    }

    fn phase(&self) -> RequestPhase {
        if self.debouncer.is_armed() {
            RequestPhase::Pending
        } else if self.current_in_flight().is_some() {
            RequestPhase::InFlight
        } else {
            self.outcome
        }
    }

    fn snapshot(&self) -> SuggestionState {
        SuggestionState {
            suggestions: self.suggestions.clone(),
            phase: self.phase(),
            epoch: self.epoch,
        }
    }
}

impl EditSuggestionCoordinator {
    pub fn new(service: Arc<dyn GenerativeService>, quiet_period: Duration) -> Self {
        let (state_tx, _) = watch::channel(SuggestionState::default());
        Self {
            shared: Arc::new(Shared {
                service,
                inner: Mutex::new(Inner {
                    epoch: 0,
                    last_dispatched: None,
                    debouncer: Debouncer::new(quiet_period),
                    in_flight: None,
                    outcome: RequestPhase::Idle,
                    suggestions: Vec::new(),
                }),
                state_tx,
            }),
        }
    }

    /// Record an edit and (re)start the quiet-period timer.
    ///
    /// Content equal to the request in flight, or (with nothing in flight) to
    /// the last successfully analyzed snapshot, schedules nothing and disarms
    /// any timer left by an intermediate edit. Reverting to the analyzed
    /// snapshot while an intermediate edit is in flight drops that request's
    /// response. Returns whether a timer was armed. Must be called within a
    /// Tokio runtime.
    pub fn submit_edit(&self, content: impl Into<String>) -> bool {
        let content = content.into();
        let armed = {
            let mut inner = self.shared.lock();
            let in_flight = inner.current_in_flight().map(|c| c == content);
            let analyzed = inner.last_dispatched.as_deref() == Some(content.as_str());

            if in_flight == Some(true) || analyzed {
                if inner.debouncer.cancel() {
                    debug!("Edit matches requested content, timer disarmed");
                }
                if in_flight == Some(false) {
                    debug!(
                        epoch = inner.epoch,
                        "Edit reverted to analyzed content, dropping request in flight"
                    );
                    inner.abandon_in_flight();
                }
                false
            } else {
                let weak = Arc::downgrade(&self.shared);
                let token = inner.debouncer.schedule(move |token| fire(weak, token, content));
                debug!(token, "Suggestion timer armed");
                true
            }
        };

        self.shared.publish();
        armed
    }

    /// Dispatch immediately, bypassing the timer and the snapshot check.
    ///
    /// Returns whether this request's response was applied; false means a
    /// newer request superseded it while it was in flight.
    pub async fn force_refresh(&self, content: impl Into<String>) -> bool {
        let content = content.into();
        let epoch = {
            let mut inner = self.shared.lock();
            inner.debouncer.cancel();
            inner.begin_dispatch(&content)
        };

        self.shared.publish();
        self.shared.dispatch(epoch, content).await
    }

    /// Subscribe to state transitions
    pub fn subscribe(&self) -> watch::Receiver<SuggestionState> {
        self.shared.state_tx.subscribe()
    }

    pub fn state(&self) -> SuggestionState {
        self.shared.lock().snapshot()
    }

    pub fn suggestions(&self) -> Vec<Suggestion> {
        self.shared.lock().suggestions.clone()
    }

    pub fn phase(&self) -> RequestPhase {
        self.shared.lock().phase()
    }

    pub fn current_epoch(&self) -> u64 {
        self.shared.lock().epoch
    }

    /// Content of the last request whose response was applied successfully
    pub fn last_dispatched(&self) -> Option<String> {
        self.shared.lock().last_dispatched.clone()
    }
}

impl Drop for EditSuggestionCoordinator {
    fn drop(&mut self) {
        self.shared.lock().debouncer.cancel();
    }
}

async fn fire(shared: Weak<Shared>, token: u64, content: String) {
    let Some(shared) = shared.upgrade() else {
        return;
    };

    let epoch = {
        let mut inner = shared.lock();
        if !inner.debouncer.finish(token) {
            return;
        }
        inner.begin_dispatch(&content)
    };

    shared.publish();
    shared.dispatch(epoch, content).await;
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self) {
        let state = self.lock().snapshot();
        self.state_tx.send_replace(state);
    }

    async fn dispatch(&self, epoch: u64, content: String) -> bool {
        debug!(epoch, "Requesting suggestions");
        let result = self.service.generate(&prompts::suggestions(&content)).await;

        let applied = {
            let mut inner = self.lock();
            if inner.epoch != epoch {
                debug!(epoch, current = inner.epoch, "Discarding stale suggestion response");
                return false;
            }

            inner.in_flight = None;
            match result {
                Ok(raw) => {
                    inner.suggestions = parse_list_items(&raw);
                    inner.last_dispatched = Some(content);
                    inner.outcome = RequestPhase::Resolved;
                    debug!(epoch, count = inner.suggestions.len(), "Suggestions updated");
                }
                Err(e) => {
                    warn!("Suggestion request failed ({}): {}", e.kind(), e);
                    inner.suggestions = vec![SUGGESTION_FAILURE.to_string()];
                    inner.outcome = RequestPhase::Failed;
                }
            }
            true
        };

        self.publish();
        applied
    }
}
