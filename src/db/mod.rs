mod models;
mod seeders;

pub use models::*;
pub use seeders::seed_exercise_catalog;

use anyhow::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

pub type DbPool = SqlitePool;

/// Execute a SQL migration file, properly handling comments
async fn execute_sql(pool: &SqlitePool, sql: &str) -> Result<()> {
    for statement in sql.split(';') {
        // Strip SQL comment lines (lines starting with --)
        let cleaned: String = statement
            .lines()
            .filter(|line| !line.trim().starts_with("--"))
            .collect::<Vec<_>>()
            .join("\n");
        let trimmed = cleaned.trim();
        if !trimmed.is_empty() {
            sqlx::query(trimmed).execute(pool).await?;
        }
    }
    Ok(())
}

pub async fn init(data_dir: &Path) -> Result<DbPool> {
    let db_path = data_dir.join("ironlog.db");
    let db_url = format!("sqlite:{}?mode=rwc", db_path.display());

    info!("Initializing database at {}", db_path.display());

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&db_url)
        .await?;

    // Enable WAL mode for better concurrency
    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(&pool)
        .await?;
    sqlx::query("PRAGMA synchronous = NORMAL")
        .execute(&pool)
        .await?;
    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(&pool)
        .await?;

    run_migrations(&pool).await?;

    info!("Database initialized successfully");
    Ok(pool)
}

async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    info!("Running database migrations...");

    // Migration 001: Initial schema
    execute_sql(pool, include_str!("../../migrations/001_initial.sql")).await?;

    // Migration 002: Add image_url column to exercises
    let has_image_url: Option<(String,)> = sqlx::query_as(
        "SELECT name FROM pragma_table_info('exercises') WHERE name = 'image_url'",
    )
    .fetch_optional(pool)
    .await?;
    if has_image_url.is_none() {
        execute_sql(pool, include_str!("../../migrations/002_exercise_images.sql")).await?;
    }

    // Seed/update the built-in exercise catalog (runs on every startup to
    // pick up new entries)
    seeders::seed_exercise_catalog(pool).await?;

    info!("Migrations completed");
    Ok(())
}

#[cfg(test)]
pub(crate) async fn init_test_pool() -> DbPool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(&pool)
        .await
        .unwrap();
    run_migrations(&pool).await.unwrap();
    pool
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_init_creates_schema_and_seeds_catalog() {
        let tmp = tempfile::tempdir().unwrap();
        let pool = init(tmp.path()).await.unwrap();

        let tables: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type='table' ORDER BY name",
        )
        .fetch_all(&pool)
        .await
        .unwrap();
        let names: Vec<&str> = tables.iter().map(|(n,)| n.as_str()).collect();
        for expected in ["users", "workouts", "templates", "exercises", "workout_logs"] {
            assert!(names.contains(&expected), "missing table {expected}");
        }

        let (builtin_count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM exercises WHERE is_custom = 0")
                .fetch_one(&pool)
                .await
                .unwrap();
        assert!(builtin_count > 0, "catalog should be seeded");
    }

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let pool = init(tmp.path()).await.unwrap();

        let (count_before,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM exercises")
            .fetch_one(&pool)
            .await
            .unwrap();

        run_migrations(&pool).await.unwrap();

        let (count_after,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM exercises")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count_before, count_after);
    }
}
