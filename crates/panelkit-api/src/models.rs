//! Wire models for the backend API

use serde::{Deserialize, Serialize};

/// Session-creation request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Session returned by a successful login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub token_type: String,
    /// Optional human-readable message some backend revisions attach
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Result of verifying the stored token against the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenVerification {
    pub valid: bool,
    pub user: String,
}

/// A backend item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: u64,
    pub name: String,
    pub description: String,
}

/// Item fields for create and update
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemDraft {
    pub name: String,
    pub description: String,
}

impl ItemDraft {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Chat request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub message: String,
}

/// Status tag on a reply produced by the backend
pub const CHAT_STATUS_SUCCESS: &str = "success";
/// Status tag on a locally substituted reply
pub const CHAT_STATUS_FALLBACK: &str = "fallback";

/// Chat reply: response text plus a status tag
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    pub response: String,
    pub status: String,
}

impl ChatReply {
    /// The canned reply substituted when the backend cannot answer
    pub fn fallback() -> Self {
        Self {
            response: "Sorry, the assistant cannot process your message right now. \
                       Please try again later."
                .to_string(),
            status: CHAT_STATUS_FALLBACK.to_string(),
        }
    }

    /// True when this reply was substituted locally
    pub fn is_fallback(&self) -> bool {
        self.status == CHAT_STATUS_FALLBACK
    }
}

/// Generic acknowledgement body, e.g. from item deletion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Acknowledgement {
    pub message: String,
}
