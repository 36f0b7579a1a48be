//! Client-side state persistence for panelkit
//!
//! The frontend keeps three pieces of state between sessions: the bearer
//! credential, the last-known username and a capped ring of recent chat
//! turns. All of it goes through an injected [`KeyValueStore`] rather than
//! ambient global storage, so the HTTP client and the services stay
//! testable with an in-memory store.

pub mod chat_history;
pub mod credentials;
pub mod error;
pub mod kv;

pub use chat_history::{
    ChatHistory, ChatHistoryStore, ChatTurn, Sender, CHAT_HISTORY_KEY, DEFAULT_HISTORY_CAP,
};
pub use credentials::{CredentialStore, StoredCredentials, TOKEN_KEY, USERNAME_KEY};
pub use error::{StoreError, StoreResult};
pub use kv::{FileStore, KeyValueStore, MemoryStore};
