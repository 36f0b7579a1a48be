//! Bearer credential persistence
//!
//! The credential has no structured lifecycle: it is either present or
//! absent, and expiry is only ever discovered through a 401 response.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::error::StoreResult;
use crate::kv::KeyValueStore;

/// Storage key for the bearer token
pub const TOKEN_KEY: &str = "token";
/// Storage key for the last-known username
pub const USERNAME_KEY: &str = "username";

/// Credential-provider capability injected into the HTTP client
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Read the stored bearer token, if any
    async fn load(&self) -> StoreResult<Option<String>>;

    /// Persist a bearer token, replacing any previous one
    async fn store(&self, token: &str) -> StoreResult<()>;

    /// Delete the stored bearer token; idempotent
    async fn clear(&self) -> StoreResult<()>;
}

/// Credential state backed by an injected key/value store
///
/// Also tracks the last-known username alongside the token, under its own
/// key, so a login view can be pre-filled after the token expires.
pub struct StoredCredentials {
    store: Arc<dyn KeyValueStore>,
}

impl StoredCredentials {
    /// Create credentials persistence over `store`
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Last-known username, if one was recorded
    pub async fn username(&self) -> StoreResult<Option<String>> {
        Ok(self
            .store
            .get(USERNAME_KEY)
            .await?
            .and_then(|v| v.as_str().map(str::to_owned)))
    }

    /// Record the username of the active session
    pub async fn set_username(&self, username: &str) -> StoreResult<()> {
        self.store
            .set(USERNAME_KEY, Value::String(username.to_string()))
            .await
    }

    /// Forget the recorded username
    pub async fn clear_username(&self) -> StoreResult<()> {
        self.store.remove(USERNAME_KEY).await
    }
}

#[async_trait]
impl CredentialStore for StoredCredentials {
    async fn load(&self) -> StoreResult<Option<String>> {
        Ok(self
            .store
            .get(TOKEN_KEY)
            .await?
            .and_then(|v| v.as_str().map(str::to_owned)))
    }

    async fn store(&self, token: &str) -> StoreResult<()> {
        debug!("Storing bearer credential");
        self.store
            .set(TOKEN_KEY, Value::String(token.to_string()))
            .await
    }

    async fn clear(&self) -> StoreResult<()> {
        debug!("Clearing bearer credential");
        self.store.remove(TOKEN_KEY).await
    }
}
