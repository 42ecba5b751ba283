use auth::{AuthError, Session, User};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Row shape of the `users` table
#[derive(Debug, FromRow)]
pub(crate) struct UserRow {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub fullname: String,
    pub phone: String,
    pub created_at: String,
    pub updated_at: String,
}

impl UserRow {
    pub fn into_entity(self) -> Result<User, AuthError> {
        Ok(User {
            id: parse_uuid(&self.id)?,
            email: self.email,
            password_hash: self.password_hash,
            fullname: self.fullname,
            phone: self.phone,
            created_at: parse_timestamp(&self.created_at)?,
            updated_at: parse_timestamp(&self.updated_at)?,
        })
    }
}

/// Row shape of the `sessions` table
#[derive(Debug, FromRow)]
pub(crate) struct SessionRow {
    pub id: String,
    pub user_id: String,
    pub refresh_token: String,
    pub user_agent: String,
    pub client_ip: String,
    pub is_blocked: bool,
    pub expires_at: String,
    pub created_at: String,
}

impl SessionRow {
    pub fn into_entity(self) -> Result<Session, AuthError> {
        Ok(Session {
            id: parse_uuid(&self.id)?,
            user_id: parse_uuid(&self.user_id)?,
            refresh_token: self.refresh_token,
            user_agent: self.user_agent,
            client_ip: self.client_ip,
            is_blocked: self.is_blocked,
            expires_at: parse_timestamp(&self.expires_at)?,
            created_at: parse_timestamp(&self.created_at)?,
        })
    }
}

fn parse_uuid(value: &str) -> Result<Uuid, AuthError> {
    Uuid::parse_str(value).map_err(|e| AuthError::Storage(format!("invalid uuid {value:?}: {e}")))
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, AuthError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| AuthError::Storage(format!("invalid timestamp {value:?}: {e}")))
}
