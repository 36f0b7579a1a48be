//! Authentication service: login, verification, logout

use std::sync::Arc;

use serde_json::to_value;
use tracing::{debug, warn};

use panelkit_http::{AuthHttpClient, Method, Result};
use panelkit_store::{CredentialStore, StoredCredentials};

use crate::endpoints;
use crate::models::{LoginRequest, Session, TokenVerification};

/// Login flow and session state over the authenticated client
pub struct AuthService {
    client: Arc<AuthHttpClient>,
    credentials: Arc<StoredCredentials>,
}

impl AuthService {
    pub fn new(client: Arc<AuthHttpClient>, credentials: Arc<StoredCredentials>) -> Self {
        Self {
            client,
            credentials,
        }
    }

    /// Create a session and persist the returned credential
    ///
    /// Goes through the public entry point: the login request is the one
    /// call that cannot yet hold a credential. On success the token and
    /// username are stored before the session is handed back.
    pub async fn login(&self, username: &str, password: &str) -> Result<Session> {
        let payload = to_value(LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        })?;

        let body = self
            .client
            .public_call(endpoints::LOGIN, Method::POST, Some(&payload), None)
            .await
            .inspect_err(|e| warn!("Login failed for {}: {}", username, e))?;

        let session: Session = serde_json::from_value(body)?;
        self.credentials.store(&session.access_token).await?;
        self.credentials.set_username(username).await?;
        debug!("Session established for {}", username);

        Ok(session)
    }

    /// Ask the backend whether the stored credential is still valid
    ///
    /// A 401 clears the stored credential through the client's normal
    /// policy and surfaces as `Unauthenticated`.
    pub async fn verify(&self) -> Result<TokenVerification> {
        let body = self.client.get(endpoints::VERIFY_TOKEN).await?;
        Ok(serde_json::from_value(body)?)
    }

    /// Drop the local session: credential and recorded username
    pub async fn logout(&self) -> Result<()> {
        self.credentials.clear().await?;
        self.credentials.clear_username().await?;
        debug!("Logged out, local session cleared");
        Ok(())
    }

    /// Username recorded at the last successful login, if any
    pub async fn current_username(&self) -> Result<Option<String>> {
        Ok(self.credentials.username().await?)
    }
}
