use async_trait::async_trait;
use auth::{AuthError, Result, User, UserStore};
use orderin_core::Database;
use uuid::Uuid;

use crate::map_db_error;
use crate::model::UserRow;

/// `users` table backed user store
#[derive(Clone)]
pub struct SqliteUserStore {
    db: Database,
}

impl SqliteUserStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for SqliteUserStore {
    async fn create(&self, user: User) -> Result<User> {
        // The unique index on email decides duplicates
        sqlx::query(
            "INSERT INTO users (id, email, password_hash, fullname, phone, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(user.id.to_string())
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.fullname)
        .bind(&user.phone)
        .bind(user.created_at.to_rfc3339())
        .bind(user.updated_at.to_rfc3339())
        .execute(&self.db)
        .await
        .map_err(|e| map_db_error(e, AuthError::DuplicateEmail))?;

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<User> {
        sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.db)
            .await
            .map_err(|e| AuthError::Storage(e.to_string()))?
            .ok_or_else(|| AuthError::NotFound("User".to_string()))?
            .into_entity()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<User> {
        sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.db)
            .await
            .map_err(|e| AuthError::Storage(e.to_string()))?
            .ok_or_else(|| AuthError::NotFound("User".to_string()))?
            .into_entity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orderin_core::{database::connect_in_memory, migrations};

    async fn store() -> SqliteUserStore {
        let db = connect_in_memory().await.unwrap();
        migrations::run(&db).await.unwrap();
        SqliteUserStore::new(db)
    }

    fn user(email: &str) -> User {
        User::new(
            email.to_string(),
            "$argon2id$hash".to_string(),
            "A B".to_string(),
            "000".to_string(),
        )
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let store = store().await;
        let created = store.create(user("a@b.com")).await.unwrap();

        let by_email = store.find_by_email("a@b.com").await.unwrap();
        let by_id = store.find_by_id(created.id).await.unwrap();

        assert_eq!(by_email.id, created.id);
        assert_eq!(by_id.email, "a@b.com");
        assert_eq!(by_id.fullname, "A B");
        assert_eq!(by_id.password_hash, created.password_hash);
    }

    #[tokio::test]
    async fn test_duplicate_email() {
        let store = store().await;
        store.create(user("a@b.com")).await.unwrap();

        let result = store.create(user("a@b.com")).await;
        assert_eq!(result, Err(AuthError::DuplicateEmail));
    }

    #[tokio::test]
    async fn test_not_found() {
        let store = store().await;

        assert!(matches!(
            store.find_by_email("missing@b.com").await,
            Err(AuthError::NotFound(_))
        ));
        assert!(matches!(
            store.find_by_id(Uuid::new_v4()).await,
            Err(AuthError::NotFound(_))
        ));
    }
}
