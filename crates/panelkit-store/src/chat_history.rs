//! Chat history persistence
//!
//! A capped ring of the most recent chat turns, evicted oldest-first, kept
//! under a single storage key.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::StoreResult;
use crate::kv::KeyValueStore;

/// Storage key for the chat history ring
pub const CHAT_HISTORY_KEY: &str = "chat_history";

/// Maximum number of turns retained by default
pub const DEFAULT_HISTORY_CAP: usize = 50;

/// Who produced a chat turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

/// One chat turn: sender tag, text and timestamp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub sender: Sender,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatTurn {
    /// A user turn stamped with the current time
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }

    /// An assistant turn stamped with the current time
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::Assistant,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }
}

/// In-memory capped ring of chat turns
///
/// Pushing beyond the cap drops the oldest turns first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatHistory {
    turns: Vec<ChatTurn>,
    cap: usize,
}

impl ChatHistory {
    /// Create an empty history with the default cap
    pub fn new() -> Self {
        Self::with_cap(DEFAULT_HISTORY_CAP)
    }

    /// Create an empty history retaining at most `cap` turns
    pub fn with_cap(cap: usize) -> Self {
        Self {
            turns: Vec::new(),
            cap,
        }
    }

    /// Rebuild a history from persisted turns, trimming to `cap`
    pub fn from_turns(mut turns: Vec<ChatTurn>, cap: usize) -> Self {
        if turns.len() > cap {
            let excess = turns.len() - cap;
            turns.drain(0..excess);
        }
        Self { turns, cap }
    }

    /// Append a turn, evicting the oldest if the cap is exceeded
    pub fn push(&mut self, turn: ChatTurn) {
        self.turns.push(turn);
        if self.turns.len() > self.cap {
            let excess = self.turns.len() - self.cap;
            self.turns.drain(0..excess);
        }
    }

    /// All retained turns, oldest first
    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    /// Drop all retained turns
    pub fn clear(&mut self) {
        self.turns.clear();
    }
}

impl Default for ChatHistory {
    fn default() -> Self {
        Self::new()
    }
}

/// Chat history persisted through an injected key/value store
pub struct ChatHistoryStore {
    store: Arc<dyn KeyValueStore>,
    cap: usize,
}

impl ChatHistoryStore {
    /// Create a history store with the default 50-turn cap
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_cap(store, DEFAULT_HISTORY_CAP)
    }

    /// Create a history store retaining at most `cap` turns
    pub fn with_cap(store: Arc<dyn KeyValueStore>, cap: usize) -> Self {
        Self { store, cap }
    }

    /// Load the persisted history
    ///
    /// An absent key yields an empty history; persisted overflow beyond the
    /// cap is trimmed on load.
    pub async fn load(&self) -> StoreResult<ChatHistory> {
        let turns = match self.store.get(CHAT_HISTORY_KEY).await? {
            Some(value) => serde_json::from_value::<Vec<ChatTurn>>(value)?,
            None => Vec::new(),
        };
        Ok(ChatHistory::from_turns(turns, self.cap))
    }

    /// Append a turn and persist the trimmed ring
    pub async fn push(&self, turn: ChatTurn) -> StoreResult<()> {
        let mut history = self.load().await?;
        history.push(turn);
        debug!("Persisting chat history ({} turns)", history.len());
        self.store
            .set(CHAT_HISTORY_KEY, serde_json::to_value(history.turns())?)
            .await
    }

    /// Delete the persisted history
    pub async fn clear(&self) -> StoreResult<()> {
        self.store.remove(CHAT_HISTORY_KEY).await
    }
}
