//! Session handoff store
//!
//! Ephemeral string-keyed store shared by the views of one browsing session.
//! Writes are last-write-wins, nothing expires within the session, and
//! nothing survives it.

use crate::types::{CodeBuffer, Language};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, warn};

/// Key holding the active buffer's content
pub const CURRENT_CODE_KEY: &str = "currentCode";

/// Key holding the active buffer's language id
pub const CURRENT_LANGUAGE_KEY: &str = "currentLanguage";

/// Session-scoped key/value bridge
///
/// Cloning yields another handle to the same session; pass it explicitly to
/// every view that needs it.
#[derive(Debug, Clone, Default)]
pub struct SessionHandoff {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl SessionHandoff {
    /// Start a new, empty session
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` under `key`, replacing any previous value
    pub fn put(&self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        debug!("Handoff put {}", key);
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, value.into());
    }

    /// Value stored under `key` in this session, if any
    pub fn get(&self, key: &str) -> Option<String> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// End the session: every entry is dropped
    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Publish `buffer` for the next view
    pub fn store_buffer(&self, buffer: &CodeBuffer) {
        self.put(CURRENT_CODE_KEY, buffer.content.as_str());
        self.put(CURRENT_LANGUAGE_KEY, buffer.language.id());
    }

    /// Restore the buffer published by the previous view.
    ///
    /// Both keys must be present and the language must be known.
    pub fn load_buffer(&self) -> Option<CodeBuffer> {
        let content = self.get(CURRENT_CODE_KEY)?;
        let language_id = self.get(CURRENT_LANGUAGE_KEY)?;

        match language_id.parse::<Language>() {
            Ok(language) => Some(CodeBuffer::new(content, language)),
            Err(e) => {
                warn!("Ignoring handed-off buffer: {}", e);
                None
            }
        }
    }
}
