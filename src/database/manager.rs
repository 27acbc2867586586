use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use tracing::info;

use super::StoreError;
use crate::config::DatabaseConfig;

/// Statements that create the feed tables when they are missing
const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id UUID PRIMARY KEY,
        username TEXT NOT NULL UNIQUE,
        avatar TEXT NOT NULL DEFAULT ''
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS posts (
        id UUID PRIMARY KEY,
        author UUID NOT NULL,
        content TEXT NOT NULL,
        image TEXT NOT NULL DEFAULT '',
        likes UUID[] NOT NULL DEFAULT '{}',
        comments JSONB NOT NULL DEFAULT '[]'::jsonb,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS posts_created_at_idx ON posts (created_at DESC)",
    "CREATE INDEX IF NOT EXISTS posts_author_idx ON posts (author)",
];

/// Builds the PostgreSQL pool shared by every request
pub struct DatabaseManager;

impl DatabaseManager {
    pub async fn connect(url: &str, config: &DatabaseConfig) -> Result<PgPool, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(url)
            .await?;

        info!("Created database pool (max_connections={})", config.max_connections);
        Ok(pool)
    }

    pub async fn ensure_schema(pool: &PgPool) -> Result<(), StoreError> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(pool).await?;
        }
        info!("Database schema ready");
        Ok(())
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check(pool: &PgPool) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(pool).await?;
        Ok(())
    }
}
