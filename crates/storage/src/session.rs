use async_trait::async_trait;
use auth::{AuthError, Result, Session, SessionStore};
use orderin_core::Database;
use uuid::Uuid;

use crate::map_db_error;
use crate::model::SessionRow;

/// `sessions` table backed session store
#[derive(Clone)]
pub struct SqliteSessionStore {
    db: Database,
}

impl SqliteSessionStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SessionStore for SqliteSessionStore {
    async fn create(&self, session: Session) -> Result<Session> {
        sqlx::query(
            "INSERT INTO sessions (id, user_id, refresh_token, user_agent, client_ip, is_blocked, expires_at, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(session.id.to_string())
        .bind(session.user_id.to_string())
        .bind(&session.refresh_token)
        .bind(&session.user_agent)
        .bind(&session.client_ip)
        .bind(session.is_blocked)
        .bind(session.expires_at.to_rfc3339())
        .bind(session.created_at.to_rfc3339())
        .execute(&self.db)
        .await
        .map_err(|e| map_db_error(e, AuthError::DuplicateSession))?;

        Ok(session)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Session> {
        sqlx::query_as::<_, SessionRow>("SELECT * FROM sessions WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.db)
            .await
            .map_err(|e| AuthError::Storage(e.to_string()))?
            .ok_or_else(|| AuthError::NotFound("Session".to_string()))?
            .into_entity()
    }

    async fn block(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("UPDATE sessions SET is_blocked = 1 WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.db)
            .await
            .map_err(|e| AuthError::Storage(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(AuthError::NotFound("Session".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SqliteUserStore;
    use auth::{User, UserStore};
    use chrono::{Duration, SubsecRound, Utc};
    use orderin_core::{database::connect_in_memory, migrations};

    async fn stores() -> (SqliteUserStore, SqliteSessionStore) {
        let db = connect_in_memory().await.unwrap();
        migrations::run(&db).await.unwrap();
        (SqliteUserStore::new(db.clone()), SqliteSessionStore::new(db))
    }

    async fn owner(users: &SqliteUserStore) -> User {
        users
            .create(User::new(
                "a@b.com".to_string(),
                "hash".to_string(),
                "A B".to_string(),
                "000".to_string(),
            ))
            .await
            .unwrap()
    }

    fn session(user_id: Uuid) -> Session {
        Session {
            id: Uuid::new_v4(),
            user_id,
            refresh_token: "refresh.token.value".to_string(),
            user_agent: "curl/8.0".to_string(),
            client_ip: "192.168.1.10".to_string(),
            is_blocked: false,
            expires_at: (Utc::now() + Duration::days(1)).trunc_subsecs(0),
            created_at: Utc::now().trunc_subsecs(0),
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let (users, sessions) = stores().await;
        let user = owner(&users).await;

        let created = sessions.create(session(user.id)).await.unwrap();
        let found = sessions.find_by_id(created.id).await.unwrap();

        assert_eq!(found, created);
    }

    #[tokio::test]
    async fn test_duplicate_session_id() {
        let (users, sessions) = stores().await;
        let user = owner(&users).await;
        let s = sessions.create(session(user.id)).await.unwrap();

        let result = sessions.create(s).await;
        assert_eq!(result, Err(AuthError::DuplicateSession));
    }

    #[tokio::test]
    async fn test_block() {
        let (users, sessions) = stores().await;
        let user = owner(&users).await;
        let s = sessions.create(session(user.id)).await.unwrap();

        sessions.block(s.id).await.unwrap();
        assert!(sessions.find_by_id(s.id).await.unwrap().is_blocked);

        assert!(matches!(
            sessions.block(Uuid::new_v4()).await,
            Err(AuthError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_session() {
        let (_, sessions) = stores().await;

        assert!(matches!(
            sessions.find_by_id(Uuid::new_v4()).await,
            Err(AuthError::NotFound(_))
        ));
    }
}
