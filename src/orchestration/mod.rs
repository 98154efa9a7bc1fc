//! Request orchestration
//!
//! Decides when to call the generative service and which responses may
//! change visible state:
//!
//! - **Suggestions** (`suggestions`): debounced on edits, deduplicated against
//!   the last analyzed snapshot, stale responses dropped by epoch
//! - **Conversation** (`conversation`): append-only turn log ordered by the
//!   sequence id reserved at issue time
//! - **Reports** (`reports`): one-shot analysis, test and diagnosis actions
//!
//! Every gateway failure is caught here and turned into a sentinel state plus
//! a log entry; nothing propagates to the caller.

mod debounce;
pub mod conversation;
pub mod reports;
pub mod suggestions;

pub use conversation::{ChatContext, ConversationEngine, CHAT_FAILURE};
pub use debounce::Debouncer;
pub use reports::{
    ReportDesk, ReportSlot, ANALYSIS_FAILURE, DIAGNOSIS_FAILURE, TEST_GENERATION_FAILURE,
    TEST_PREDICTION_FAILURE,
};
pub use suggestions::{EditSuggestionCoordinator, SuggestionState, SUGGESTION_FAILURE};
