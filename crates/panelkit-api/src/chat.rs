//! Chat service with persisted history and degraded mode
//!
//! The chat feature never blocks on a broken backend: any failure other
//! than `Unauthenticated` is logged and replaced with a canned reply.
//! Authentication failures propagate so the caller can route to login.

use std::sync::Arc;

use serde_json::to_value;
use tracing::{debug, warn};

use panelkit_http::{ApiError, AuthHttpClient, Method, Result};
use panelkit_store::{ChatHistory, ChatHistoryStore, ChatTurn};

use crate::endpoints;
use crate::models::{ChatMessage, ChatReply};

/// Chat exchange over the authenticated client, with a persisted ring of
/// recent turns
pub struct ChatService {
    client: Arc<AuthHttpClient>,
    history: ChatHistoryStore,
}

impl ChatService {
    pub fn new(client: Arc<AuthHttpClient>, history: ChatHistoryStore) -> Self {
        Self { client, history }
    }

    /// Send a message and return the reply, canned if the backend is down
    ///
    /// Both the user turn and the reply turn are recorded in the history
    /// ring, fallback replies included.
    pub async fn send(&self, message: &str) -> Result<ChatReply> {
        self.history.push(ChatTurn::user(message)).await?;

        let reply = match self.request_reply(message).await {
            Ok(reply) => reply,
            Err(err) if err.is_auth_failure() => return Err(err),
            Err(err) => {
                warn!("Chat request failed, substituting canned reply: {}", err);
                ChatReply::fallback()
            }
        };

        self.history.push(ChatTurn::assistant(&reply.response)).await?;
        debug!("Chat reply recorded (status: {})", reply.status);
        Ok(reply)
    }

    /// The persisted history ring, oldest turn first
    pub async fn history(&self) -> Result<ChatHistory> {
        Ok(self.history.load().await?)
    }

    /// Drop all persisted turns
    pub async fn clear_history(&self) -> Result<()> {
        Ok(self.history.clear().await?)
    }

    async fn request_reply(&self, message: &str) -> Result<ChatReply> {
        let payload = to_value(ChatMessage {
            message: message.to_string(),
        })?;
        let body = self
            .client
            .call(endpoints::CHAT, Method::POST, Some(&payload), None)
            .await?;
        serde_json::from_value(body).map_err(ApiError::from)
    }
}
