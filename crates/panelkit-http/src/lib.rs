//! Authenticated HTTP client for the panelkit backend
//!
//! Wraps every backend call with bearer-token injection, a request
//! deadline and structured error classification. One reactive policy: a
//! 401 response clears the stored credential and surfaces
//! [`ApiError::Unauthenticated`].
//!
//! ## Features
//!
//! - **Injected credentials**: the token comes from a
//!   [`CredentialStore`](panelkit_store::CredentialStore), never from
//!   ambient global state
//! - **Closed error taxonomy**: callers match on [`ApiError`] instead of
//!   raw transport errors
//! - **Configurable**: base address, versioned prefix, deadlines
//! - **No retries**: a single classified failure per call

pub mod client;
pub mod config;
pub mod error;

pub use client::AuthHttpClient;
pub use config::ClientConfig;
pub use error::{ApiError, Result};

/// Re-export commonly used types
pub use reqwest::{header, Method, StatusCode};
