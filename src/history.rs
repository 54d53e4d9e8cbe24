//! In-memory conversation log.
//!
//! Append-only, process-lifetime. Owned by `AppState` and shared by every
//! browser session; there is no per-user isolation. The mutex guards short
//! critical sections only and is never held across an await.

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub question: String,
    pub response: String,
}

#[derive(Clone, Default)]
pub struct ConversationLog {
    turns: Arc<Mutex<Vec<ConversationTurn>>>,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&self, question: impl Into<String>, response: impl Into<String>) {
        let mut turns = self.lock();
        turns.push(ConversationTurn {
            question: question.into(),
            response: response.into(),
        });
    }

    pub fn snapshot(&self) -> Vec<ConversationTurn> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Serialized transcript handed to the model: "Q: …\nA: …" per turn.
    pub fn transcript(&self) -> String {
        self.lock()
            .iter()
            .map(|turn| format!("Q: {}\nA: {}", turn.question, turn.response))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<ConversationTurn>> {
        self.turns.lock().expect("conversation log mutex poisoned")
    }
}
