//! Database schema migrations
//!
//! Versioned, idempotent schema upgrades tracked in the `schema_version`
//! table. Tables are created with `CREATE TABLE IF NOT EXISTS` by
//! [`crate::db::init`]; migrations only add what older databases lack.
//!
//! Never modify an existing migration. Add a new `migrate_vN` and bump
//! [`CURRENT_SCHEMA_VERSION`].

use crate::Result;
use sqlx::SqlitePool;
use tracing::{info, warn};

/// Current schema version
pub const CURRENT_SCHEMA_VERSION: i32 = 2;

/// Get current schema version from database
///
/// Returns 0 if schema_version table doesn't exist or has no rows
pub async fn get_schema_version(pool: &SqlitePool) -> Result<i32> {
    let table_exists: bool = sqlx::query_scalar(
        r#"
        SELECT EXISTS(
            SELECT 1 FROM sqlite_master
            WHERE type='table' AND name='schema_version'
        )
        "#,
    )
    .fetch_one(pool)
    .await?;

    if !table_exists {
        return Ok(0);
    }

    let version: Option<i32> =
        sqlx::query_scalar("SELECT version FROM schema_version ORDER BY version DESC LIMIT 1")
            .fetch_optional(pool)
            .await?;

    Ok(version.unwrap_or(0))
}

async fn set_schema_version(pool: &SqlitePool, version: i32) -> Result<()> {
    sqlx::query("INSERT OR IGNORE INTO schema_version (version) VALUES (?)")
        .bind(version)
        .execute(pool)
        .await?;

    Ok(())
}

/// Run all pending migrations
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    let current_version = get_schema_version(pool).await?;

    if current_version == CURRENT_SCHEMA_VERSION {
        info!("Database schema is up to date (v{})", current_version);
        return Ok(());
    }

    if current_version > CURRENT_SCHEMA_VERSION {
        warn!(
            "Database schema version ({}) is newer than code version ({})",
            current_version, CURRENT_SCHEMA_VERSION
        );
        warn!("This may indicate a downgrade. Proceeding with caution.");
        return Ok(());
    }

    info!(
        "Running database migrations: v{} -> v{}",
        current_version, CURRENT_SCHEMA_VERSION
    );

    if current_version < 1 {
        migrate_v1(pool).await?;
        set_schema_version(pool, 1).await?;
        info!("✓ Migration v1 completed");
    }

    if current_version < 2 {
        migrate_v2(pool).await?;
        set_schema_version(pool, 2).await?;
        info!("✓ Migration v2 completed");
    }

    info!("All migrations completed successfully");
    Ok(())
}

/// Migration v1: initial schema
///
/// Only verifies that the base tables exist; they are created by
/// `create_schema` before migrations run.
async fn migrate_v1(pool: &SqlitePool) -> Result<()> {
    info!("Running migration v1: Initial schema");

    for table in ["users", "text_analyses"] {
        if !table_exists(pool, table).await? {
            warn!("  {} table missing at migration v1", table);
        }
    }

    Ok(())
}

/// Migration v2: `is_english` column and per-user listing index
///
/// Databases created before language flags were stored lack the column.
async fn migrate_v2(pool: &SqlitePool) -> Result<()> {
    info!("Running migration v2: Add is_english column and user/created_at index");

    if !table_exists(pool, "text_analyses").await? {
        info!("  text_analyses table doesn't exist yet - skipping migration");
        return Ok(());
    }

    let has_column: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM pragma_table_info('text_analyses') WHERE name = 'is_english'",
    )
    .fetch_one(pool)
    .await?;

    if has_column == 0 {
        sqlx::query("ALTER TABLE text_analyses ADD COLUMN is_english INTEGER")
            .execute(pool)
            .await?;
        info!("  ✓ Added is_english column to text_analyses table");
    } else {
        info!("  is_english column already exists - skipping");
    }

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_text_analyses_user_created \
         ON text_analyses(user_id, created_at)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn table_exists(pool: &SqlitePool, name: &str) -> Result<bool> {
    let exists: bool = sqlx::query_scalar(
        r#"
        SELECT EXISTS(
            SELECT 1 FROM sqlite_master
            WHERE type='table' AND name=?
        )
        "#,
    )
    .bind(name)
    .fetch_one(pool)
    .await?;

    Ok(exists)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn setup_test_db() -> SqlitePool {
        SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap()
    }

    async fn column_count(pool: &SqlitePool, column: &str) -> i64 {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM pragma_table_info('text_analyses') WHERE name = ?",
        )
        .bind(column)
        .fetch_one(pool)
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_get_schema_version_no_table() {
        let pool = setup_test_db().await;
        assert_eq!(get_schema_version(&pool).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_set_and_get_schema_version() {
        let pool = setup_test_db().await;
        sqlx::query(
            "CREATE TABLE schema_version (version INTEGER PRIMARY KEY, applied_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP)",
        )
        .execute(&pool)
        .await
        .unwrap();

        set_schema_version(&pool, 1).await.unwrap();
        set_schema_version(&pool, 2).await.unwrap();
        assert_eq!(get_schema_version(&pool).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_migrate_v2_no_table() {
        let pool = setup_test_db().await;
        migrate_v2(&pool).await.unwrap();
    }

    #[tokio::test]
    async fn test_migrate_v2_adds_column_to_old_table() {
        let pool = setup_test_db().await;
        sqlx::query("CREATE TABLE text_analyses (id INTEGER PRIMARY KEY, user_id INTEGER, created_at TEXT)")
            .execute(&pool)
            .await
            .unwrap();
        assert_eq!(column_count(&pool, "is_english").await, 0);

        migrate_v2(&pool).await.unwrap();
        assert_eq!(column_count(&pool, "is_english").await, 1);

        // Second run is a no-op
        migrate_v2(&pool).await.unwrap();
        assert_eq!(column_count(&pool, "is_english").await, 1);

        let index_exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='index' AND name='idx_text_analyses_user_created')",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        assert!(index_exists);
    }

    #[tokio::test]
    async fn test_run_migrations_complete_flow() {
        let pool = setup_test_db().await;
        crate::db::init::create_schema(&pool).await.unwrap();
        assert_eq!(get_schema_version(&pool).await.unwrap(), CURRENT_SCHEMA_VERSION);
        assert_eq!(column_count(&pool, "is_english").await, 1);

        // Re-running is safe
        run_migrations(&pool).await.unwrap();
        assert_eq!(get_schema_version(&pool).await.unwrap(), CURRENT_SCHEMA_VERSION);
    }
}
