//! Coordination module for handoff between independently routed views
//!
//! Provides the session-scoped key/value bridge views use to pass the active
//! code buffer along on navigation:
//! 1. The editor view writes `currentCode` / `currentLanguage` on every edit
//! 2. The user navigates to the test or debug view
//! 3. The new view reads both keys and restores the buffer

mod handoff;

pub use handoff::{SessionHandoff, CURRENT_CODE_KEY, CURRENT_LANGUAGE_KEY};
