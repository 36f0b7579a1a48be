//! Typed endpoint services for the panelkit backend
//!
//! Thin, typed wrappers over [`panelkit_http::AuthHttpClient`] for the
//! backend surface the frontend consumes: session creation and
//! verification, the item collection and the chat endpoint. Error policy
//! follows the caller contracts of the original frontend: authentication
//! failures propagate for routing to a login view, and the chat service
//! degrades to a canned reply instead of failing.

pub mod auth;
pub mod chat;
pub mod endpoints;
pub mod items;
pub mod models;

pub use auth::AuthService;
pub use chat::ChatService;
pub use items::ItemsService;
pub use models::{
    Acknowledgement, ChatMessage, ChatReply, Item, ItemDraft, LoginRequest, Session,
    TokenVerification, CHAT_STATUS_FALLBACK, CHAT_STATUS_SUCCESS,
};

/// Re-export the classified error and result types callers match on
pub use panelkit_http::{ApiError, Result};
