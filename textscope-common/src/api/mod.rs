//! Framework-independent pieces of the HTTP API
//!
//! Only pure functions live here; the server wraps them in axum middleware.

pub mod auth;

pub use auth::{generate_token, hash_token, parse_bearer};
