//! Authenticated HTTP client
//!
//! One suspending operation per call, no retries: a single classified
//! failure goes back to the caller, which decides whether to redirect to
//! login, show a message or substitute a fallback value.

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde_json::Value;
use tracing::{debug, warn};

use panelkit_store::CredentialStore;

use crate::config::ClientConfig;
use crate::error::{ApiError, Result};

/// HTTP client with bearer-token injection, a request deadline and a
/// closed error taxonomy
///
/// The credential is read through an injected [`CredentialStore`] on every
/// authenticated call; a 401 response deletes it unconditionally before any
/// other status handling.
pub struct AuthHttpClient {
    inner: reqwest::Client,
    config: ClientConfig,
    credentials: Arc<dyn CredentialStore>,
}

impl AuthHttpClient {
    /// Create a client over `config` and an injected credential store
    pub fn new(config: ClientConfig, credentials: Arc<dyn CredentialStore>) -> Result<Self> {
        let inner = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| ApiError::Unknown(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            inner,
            config,
            credentials,
        })
    }

    /// Client configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Resolve an endpoint to a full URL
    ///
    /// Absolute `http(s)` endpoints pass through unchanged; relative ones
    /// get the configured base address and versioned prefix prepended.
    pub fn resolve_url(&self, endpoint: &str) -> Result<url::Url> {
        let raw = if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            endpoint.to_string()
        } else {
            format!("{}{}{}", self.config.base_url, self.config.api_prefix, endpoint)
        };

        raw.parse::<url::Url>()
            .map_err(|e| ApiError::Unknown(format!("invalid request URL {raw}: {e}")))
    }

    /// Execute an authenticated call and return the parsed JSON body
    ///
    /// Fails with [`ApiError::Unauthenticated`] before any network I/O when
    /// no credential is stored. Caller-supplied headers win over defaults on
    /// collision, except `Authorization`, which is always the stored
    /// credential.
    pub async fn call(
        &self,
        endpoint: &str,
        method: Method,
        body: Option<&Value>,
        headers: Option<HeaderMap>,
    ) -> Result<Value> {
        let token = self
            .credentials
            .load()
            .await?
            .ok_or(ApiError::Unauthenticated)?;

        self.execute(endpoint, method, body, headers, Some(&token))
            .await
    }

    /// Execute an unauthenticated call (the login path)
    ///
    /// Identical to [`call`](Self::call) except no credential is read and no
    /// `Authorization` header is attached.
    pub async fn public_call(
        &self,
        endpoint: &str,
        method: Method,
        body: Option<&Value>,
        headers: Option<HeaderMap>,
    ) -> Result<Value> {
        self.execute(endpoint, method, body, headers, None).await
    }

    /// Authenticated GET
    pub async fn get(&self, endpoint: &str) -> Result<Value> {
        self.call(endpoint, Method::GET, None, None).await
    }

    /// Authenticated POST with a JSON body
    pub async fn post(&self, endpoint: &str, body: &Value) -> Result<Value> {
        self.call(endpoint, Method::POST, Some(body), None).await
    }

    /// Authenticated PUT with a JSON body
    pub async fn put(&self, endpoint: &str, body: &Value) -> Result<Value> {
        self.call(endpoint, Method::PUT, Some(body), None).await
    }

    /// Authenticated DELETE
    pub async fn delete(&self, endpoint: &str) -> Result<Value> {
        self.call(endpoint, Method::DELETE, None, None).await
    }

    async fn execute(
        &self,
        endpoint: &str,
        method: Method,
        body: Option<&Value>,
        extra_headers: Option<HeaderMap>,
        token: Option<&str>,
    ) -> Result<Value> {
        let url = self.resolve_url(endpoint)?;
        debug!("{} {}", method, url);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(extra) = extra_headers {
            for (name, value) in extra.iter() {
                headers.insert(name.clone(), value.clone());
            }
        }
        if let Some(token) = token {
            // Inserted last: the Authorization header is never
            // caller-overridable.
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| ApiError::Unknown(format!("credential is not header-safe: {e}")))?;
            headers.insert(AUTHORIZATION, value);
        }

        let mut request = self.inner.request(method, url).headers(headers);
        if let Some(body) = body {
            request = request.json(body);
        }

        // Racing the send against the deadline drops the in-flight request
        // on expiry, so nothing fires after this function returns.
        let response = match tokio::time::timeout(self.config.timeout, request.send()).await {
            Ok(sent) => sent.map_err(|e| ApiError::from_transport(e, self.config.timeout))?,
            Err(_) => {
                warn!("Request to {} exceeded {:?}", endpoint, self.config.timeout);
                return Err(ApiError::Timeout(self.config.timeout));
            }
        };

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            warn!("Server rejected credential, clearing stored token");
            self.credentials.clear().await?;
            return Err(ApiError::Unauthenticated);
        }

        if !status.is_success() {
            let detail = response
                .bytes()
                .await
                .ok()
                .and_then(|bytes| serde_json::from_slice::<Value>(&bytes).ok())
                .and_then(|body| {
                    body.get("detail")
                        .and_then(Value::as_str)
                        .map(str::to_owned)
                })
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("unknown error")
                        .to_string()
                });
            return Err(ApiError::Http { status, detail });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| ApiError::Unknown(format!("invalid JSON in response body: {e}")))
    }
}
