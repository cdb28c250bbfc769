//! User queries
//!
//! Users are provisioned by operators (`textscope-server add-user`); the
//! service itself only looks them up by token.

use chrono::Utc;
use sqlx::SqlitePool;
use textscope_common::db::{format_timestamp, User};
use textscope_common::Error;

const USER_COLUMNS: &str = "id, username, email, is_active, created_at";

/// Insert a new active user holding the given token hash
pub async fn create_user(
    pool: &SqlitePool,
    username: &str,
    email: &str,
    token_hash: &str,
) -> Result<User, sqlx::Error> {
    let created_at = Utc::now();
    let id = sqlx::query(
        "INSERT INTO users (username, email, token_hash, is_active, created_at) VALUES (?, ?, ?, 1, ?)",
    )
    .bind(username)
    .bind(email)
    .bind(token_hash)
    .bind(format_timestamp(&created_at))
    .execute(pool)
    .await?
    .last_insert_rowid();

    Ok(User {
        id,
        username: username.to_string(),
        email: email.to_string(),
        is_active: true,
        created_at,
    })
}

/// Look up the user owning a token hash
pub async fn find_by_token_hash(
    pool: &SqlitePool,
    token_hash: &str,
) -> Result<Option<User>, sqlx::Error> {
    let row = sqlx::query(&format!(
        "SELECT {} FROM users WHERE token_hash = ?",
        USER_COLUMNS
    ))
    .bind(token_hash)
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(User::from_row).transpose()
}

pub async fn find_by_username(
    pool: &SqlitePool,
    username: &str,
) -> Result<Option<User>, sqlx::Error> {
    let row = sqlx::query(&format!(
        "SELECT {} FROM users WHERE username = ?",
        USER_COLUMNS
    ))
    .bind(username)
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(User::from_row).transpose()
}

/// Validate operator input and create the user
///
/// Blank names and already registered usernames or emails are
/// [`Error::InvalidInput`].
pub async fn register_user(
    pool: &SqlitePool,
    username: &str,
    email: &str,
    token_hash: &str,
) -> textscope_common::Result<User> {
    let username = username.trim();
    let email = email.trim();
    if username.is_empty() || email.is_empty() {
        return Err(Error::InvalidInput(
            "username and email must not be empty".to_string(),
        ));
    }

    match create_user(pool, username, email, token_hash).await {
        Ok(user) => Ok(user),
        Err(e) if is_unique_violation(&e) => Err(Error::InvalidInput(
            "Username or email already registered".to_string(),
        )),
        Err(e) => Err(e.into()),
    }
}

/// Activate or deactivate a user
pub async fn set_active(
    pool: &SqlitePool,
    username: &str,
    active: bool,
) -> textscope_common::Result<()> {
    let result = sqlx::query("UPDATE users SET is_active = ? WHERE username = ?")
        .bind(active)
        .bind(username)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("No such user: {}", username)));
    }
    Ok(())
}

/// Whether an insert failed on a UNIQUE constraint
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.is_unique_violation(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;
    use textscope_common::api::auth::hash_token;

    async fn setup_test_db() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        textscope_common::db::create_schema(&pool).await.unwrap();
        pool
    }

    #[tokio::test]
    async fn test_create_and_find_user() {
        let pool = setup_test_db().await;
        let created = create_user(&pool, "alice", "alice@example.com", &hash_token("t1"))
            .await
            .unwrap();

        let found = find_by_token_hash(&pool, &hash_token("t1"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, created.id);
        assert_eq!(found.username, "alice");
        assert!(found.is_active);

        assert!(find_by_token_hash(&pool, &hash_token("other"))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_is_unique_violation() {
        let pool = setup_test_db().await;
        create_user(&pool, "alice", "alice@example.com", "h1")
            .await
            .unwrap();
        let err = create_user(&pool, "alice2", "alice@example.com", "h2")
            .await
            .unwrap_err();
        assert!(is_unique_violation(&err));
    }

    #[tokio::test]
    async fn test_set_active() {
        let pool = setup_test_db().await;
        create_user(&pool, "bob", "bob@example.com", "h").await.unwrap();

        set_active(&pool, "bob", false).await.unwrap();
        let bob = find_by_username(&pool, "bob").await.unwrap().unwrap();
        assert!(!bob.is_active);

        let err = set_active(&pool, "nobody", false).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_register_user_rejects_bad_input() {
        let pool = setup_test_db().await;
        let user = register_user(&pool, "  carol ", "carol@example.com", "h1")
            .await
            .unwrap();
        assert_eq!(user.username, "carol");

        let err = register_user(&pool, "   ", "x@example.com", "h2")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));

        let err = register_user(&pool, "carol", "other@example.com", "h3")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(ref msg) if msg.contains("already registered")));
    }
}
