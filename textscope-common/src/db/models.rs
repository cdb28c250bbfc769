//! Database row models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

/// A registered user
///
/// The bearer token itself is never stored; see [`crate::api::auth::hash_token`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Map a `users` row (columns id, username, email, is_active, created_at)
    pub fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            username: row.try_get("username")?,
            email: row.try_get("email")?,
            is_active: row.try_get("is_active")?,
            created_at: parse_timestamp(&row.try_get::<String, _>("created_at")?)?,
        })
    }
}

/// Parse an RFC 3339 timestamp column into UTC
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, sqlx::Error> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| sqlx::Error::Decode(Box::new(e)))
}

/// Format a timestamp the way it is stored
pub fn format_timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339()
}
