//! Bearer token helpers
//!
//! Tokens are opaque random strings handed to a user once. Only their
//! SHA-256 digest is stored.

use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Generate a new random bearer token (64 hex characters)
///
/// # Examples
///
/// ```
/// use textscope_common::api::auth::generate_token;
///
/// let token = generate_token();
/// assert_eq!(token.len(), 64);
/// assert_ne!(token, generate_token());
/// ```
pub fn generate_token() -> String {
    format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
}

/// Hex-encoded SHA-256 digest of a token, as stored in `users.token_hash`
///
/// # Examples
///
/// ```
/// use textscope_common::api::auth::hash_token;
///
/// let hash = hash_token("secret");
/// assert_eq!(hash.len(), 64);
/// assert_eq!(hash, hash_token("secret"));
/// ```
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Extract the token from an `Authorization: Bearer <token>` header value
///
/// The scheme is matched case-insensitively. Returns `None` for other
/// schemes or an empty token.
pub fn parse_bearer(header_value: &str) -> Option<&str> {
    let (scheme, token) = header_value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}
