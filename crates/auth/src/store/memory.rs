//! In-memory stores for development and tests

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use super::{SessionStore, UserStore};
use crate::error::{AuthError, Result};
use crate::model::{Session, User};

#[derive(Default)]
struct UserTables {
    /// id -> User
    users: HashMap<Uuid, User>,
    /// email -> id
    emails: HashMap<String, Uuid>,
}

/// In-memory user store
#[derive(Clone, Default)]
pub struct MemoryUserStore {
    tables: Arc<RwLock<UserTables>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create(&self, user: User) -> Result<User> {
        let mut tables = self.tables.write().await;

        if tables.emails.contains_key(&user.email) {
            return Err(AuthError::DuplicateEmail);
        }
        if tables.users.contains_key(&user.id) {
            return Err(AuthError::Storage(format!("duplicate user id {}", user.id)));
        }

        tables.emails.insert(user.email.clone(), user.id);
        tables.users.insert(user.id, user.clone());
        debug!(user_id = %user.id, "user saved to memory store");

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<User> {
        let tables = self.tables.read().await;
        tables
            .emails
            .get(email)
            .and_then(|id| tables.users.get(id))
            .cloned()
            .ok_or_else(|| AuthError::NotFound("User".to_string()))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<User> {
        let tables = self.tables.read().await;
        tables
            .users
            .get(&id)
            .cloned()
            .ok_or_else(|| AuthError::NotFound("User".to_string()))
    }
}

/// In-memory session store
#[derive(Clone, Default)]
pub struct MemorySessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, Session>>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All sessions of one user, oldest first
    pub async fn sessions_for_user(&self, user_id: Uuid) -> Vec<Session> {
        let sessions = self.sessions.read().await;
        let mut owned: Vec<Session> = sessions
            .values()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect();
        owned.sort_by_key(|s| s.created_at);
        owned
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create(&self, session: Session) -> Result<Session> {
        let mut sessions = self.sessions.write().await;

        if sessions.contains_key(&session.id) {
            return Err(AuthError::DuplicateSession);
        }

        sessions.insert(session.id, session.clone());
        debug!(session_id = %session.id, "session saved to memory store");

        Ok(session)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Session> {
        let sessions = self.sessions.read().await;
        sessions
            .get(&id)
            .cloned()
            .ok_or_else(|| AuthError::NotFound("Session".to_string()))
    }

    async fn block(&self, id: Uuid) -> Result<()> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(&id)
            .ok_or_else(|| AuthError::NotFound("Session".to_string()))?;
        session.is_blocked = true;
        Ok(())
    }
}
