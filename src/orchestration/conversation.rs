//! Chat turn log
//!
//! Every turn gets its sequence id when the request is issued. A reply that
//! arrives late still lands at the position reserved for it, so the log reads
//! in the order the user asked, not the order the service answered.

use crate::error::{CodePilotError, Result};
use crate::extract::segment;
use crate::services::{prompts, GenerativeService};
use crate::types::{CodeBuffer, ConversationTurn, MessagePart, Role, SequenceId};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, warn};

/// Text of the error turn appended when a chat request fails
pub const CHAT_FAILURE: &str = "⚠️ Error processing request. Please try again.";

/// What a chat request carries to the service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatContext {
    pub buffer: CodeBuffer,
    pub query: String,
}

impl ChatContext {
    pub fn new(buffer: CodeBuffer, query: impl Into<String>) -> Self {
        Self {
            buffer,
            query: query.into(),
        }
    }
}

/// Append-only conversation with the generative service
pub struct ConversationEngine {
    service: Arc<dyn GenerativeService>,
    log: Mutex<TurnLog>,
}

struct TurnLog {
    next_sequence: SequenceId,
    turns: BTreeMap<SequenceId, ConversationTurn>,
    /// Reserved ids whose reply has not arrived yet
    awaiting: BTreeSet<SequenceId>,
}

impl TurnLog {
    fn reserve(&mut self) -> SequenceId {
        let id = self.next_sequence;
        self.next_sequence += 1;
        id
    }
}

impl ConversationEngine {
    pub fn new(service: Arc<dyn GenerativeService>) -> Self {
        Self {
            service,
            log: Mutex::new(TurnLog {
                next_sequence: 1,
                turns: BTreeMap::new(),
                awaiting: BTreeSet::new(),
            }),
        }
    }

    /// Append the user's message as the next turn.
    ///
    /// Blank input is rejected with `UserInput` and leaves the log untouched.
    pub fn append_user_turn(&self, text: &str) -> Result<SequenceId> {
        if text.trim().is_empty() {
            return Err(CodePilotError::UserInput("message is blank".to_string()));
        }

        let mut log = self.lock();
        let id = log.reserve();
        log.turns.insert(
            id,
            ConversationTurn {
                sequence_id: id,
                role: Role::User,
                parts: vec![MessagePart::text(text)],
                is_error: false,
            },
        );
        Ok(id)
    }

    /// Ask the service for a reply and append it under a freshly reserved id.
    ///
    /// Never fails: a gateway fault becomes an error turn.
    pub async fn request_assistant_turn(&self, context: &ChatContext) -> SequenceId {
        let id = {
            let mut log = self.lock();
            let id = log.reserve();
            log.awaiting.insert(id);
            id
        };

        debug!(sequence_id = id, "Requesting chat reply");
        let prompt = prompts::chat(&context.buffer, &context.query);
        let turn = match self.service.generate(&prompt).await {
            Ok(raw) => ConversationTurn {
                sequence_id: id,
                role: Role::Assistant,
                parts: segment(&raw),
                is_error: false,
            },
            Err(e) => {
                warn!(sequence_id = id, "Chat request failed ({}): {}", e.kind(), e);
                ConversationTurn {
                    sequence_id: id,
                    role: Role::Assistant,
                    parts: vec![MessagePart::text(CHAT_FAILURE)],
                    is_error: true,
                }
            }
        };

        let mut log = self.lock();
        log.awaiting.remove(&id);
        log.turns.insert(id, turn);
        id
    }

    /// Append `message` as a user turn, then request the reply.
    ///
    /// Returns the reply's id. Blank messages are rejected before any call.
    pub async fn send(&self, buffer: &CodeBuffer, message: &str) -> Result<SequenceId> {
        self.append_user_turn(message)?;
        let context = ChatContext::new(buffer.clone(), message);
        Ok(self.request_assistant_turn(&context).await)
    }

    /// Completed turns in sequence order
    pub fn turns(&self) -> Vec<ConversationTurn> {
        self.lock().turns.values().cloned().collect()
    }

    pub fn turn(&self, id: SequenceId) -> Option<ConversationTurn> {
        self.lock().turns.get(&id).cloned()
    }

    /// Ids reserved for replies still in flight
    pub fn awaiting(&self) -> Vec<SequenceId> {
        self.lock().awaiting.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, TurnLog> {
        self.log.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
