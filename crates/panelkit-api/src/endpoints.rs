//! Backend endpoint paths
//!
//! Relative to the client's configured base address and versioned prefix.

/// Session creation
pub const LOGIN: &str = "/auth/login";
/// Stored-token verification
pub const VERIFY_TOKEN: &str = "/auth/verify-token";
/// Item collection (list and create)
pub const ITEMS: &str = "/items/";
/// Chat message exchange
pub const CHAT: &str = "/chat";

/// Path for a single item
pub fn item(id: u64) -> String {
    format!("/items/{id}")
}
