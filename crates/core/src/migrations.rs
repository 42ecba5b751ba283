use tracing::info;

use crate::database::Database;

/// Schema steps in the order they are applied
const MIGRATIONS: &[(&str, &str)] = &[
    (
        "create_users_table",
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY NOT NULL,
            email TEXT NOT NULL,
            password_hash TEXT NOT NULL,
            fullname TEXT NOT NULL,
            phone TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        CREATE UNIQUE INDEX IF NOT EXISTS idx_users_email ON users (email);
        "#,
    ),
    (
        "create_sessions_table",
        r#"
        CREATE TABLE IF NOT EXISTS sessions (
            id TEXT PRIMARY KEY NOT NULL,
            user_id TEXT NOT NULL REFERENCES users (id),
            refresh_token TEXT NOT NULL,
            user_agent TEXT NOT NULL,
            client_ip TEXT NOT NULL,
            is_blocked INTEGER NOT NULL DEFAULT 0,
            expires_at TEXT NOT NULL,
            created_at TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_sessions_user_id ON sessions (user_id);
        "#,
    ),
    (
        "create_carts_table",
        r#"
        CREATE TABLE IF NOT EXISTS carts (
            id TEXT PRIMARY KEY NOT NULL,
            user_id TEXT NOT NULL REFERENCES users (id),
            product_id TEXT NOT NULL,
            qty INTEGER NOT NULL CHECK (qty > 0),
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        CREATE UNIQUE INDEX IF NOT EXISTS idx_carts_user_product ON carts (user_id, product_id);
        "#,
    ),
];

/// Apply every schema step. Steps are idempotent, so running twice is a no-op.
pub async fn run(db: &Database) -> Result<(), sqlx::Error> {
    for (name, sql) in MIGRATIONS {
        sqlx::raw_sql(sql).execute(db).await?;
        info!(migration = name, "migration applied");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::connect_in_memory;

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let db = connect_in_memory().await.unwrap();

        run(&db).await.unwrap();
        run(&db).await.unwrap();

        let tables: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name",
        )
        .fetch_all(&db)
        .await
        .unwrap();

        assert_eq!(tables, vec!["carts", "sessions", "users"]);
    }
}
