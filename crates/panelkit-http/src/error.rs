//! Classified API errors
//!
//! Every failure a call can produce collapses into this closed set. Raw
//! transport errors never cross the crate boundary.

use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

/// Result type for API calls
pub type Result<T> = std::result::Result<T, ApiError>;

/// Classified API call failure
#[derive(Debug, Error)]
pub enum ApiError {
    /// No credential is stored, or the server rejected the one we sent
    #[error("Not authenticated: credential missing or rejected")]
    Unauthenticated,

    /// No response arrived within the configured deadline
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// The transport failed before any response arrived
    #[error("Network unavailable: {0}")]
    NetworkUnavailable(String),

    /// The server rejected the request with a non-success status
    #[error("HTTP {status}: {detail}")]
    Http { status: StatusCode, detail: String },

    /// Anything uncategorized
    #[error("Unexpected error: {0}")]
    Unknown(String),
}

impl ApiError {
    /// True when the caller should route the user to a login view
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, ApiError::Unauthenticated)
    }

    /// Classify a reqwest transport failure
    pub(crate) fn from_transport(err: reqwest::Error, deadline: Duration) -> Self {
        if err.is_timeout() {
            ApiError::Timeout(deadline)
        } else if err.is_connect() || err.is_request() {
            ApiError::NetworkUnavailable(err.to_string())
        } else {
            ApiError::Unknown(err.to_string())
        }
    }
}

impl From<panelkit_store::StoreError> for ApiError {
    fn from(err: panelkit_store::StoreError) -> Self {
        ApiError::Unknown(format!("credential store failure: {err}"))
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Unknown(format!("JSON encoding failure: {err}"))
    }
}
