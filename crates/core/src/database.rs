use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use tracing::info;

use crate::config::DatabaseConfig;

/// Shared connection pool
pub type Database = SqlitePool;

/// Open a pool for the configured database URL
pub async fn connect(config: &DatabaseConfig) -> Result<Database, sqlx::Error> {
    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.url)
        .await?;

    info!(max_connections = config.max_connections, "database pool ready");
    Ok(pool)
}

/// Single-connection in-memory database, used by tests
pub async fn connect_in_memory() -> Result<Database, sqlx::Error> {
    SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
}
