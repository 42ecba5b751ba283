use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::token::TokenPayload;

/// User model for authentication
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub fullname: String,
    pub phone: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with an already hashed password
    pub fn new(email: String, password_hash: String, fullname: String, phone: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email,
            password_hash,
            fullname,
            phone,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Persisted binding between a refresh token and a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Equal to the `id` of the refresh token payload
    pub id: Uuid,
    pub user_id: Uuid,
    pub refresh_token: String,
    pub user_agent: String,
    pub client_ip: String,
    pub is_blocked: bool,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Bind a freshly minted refresh token to a new, unblocked session
    pub fn for_refresh_token(refresh_token: String, payload: &TokenPayload, client: &ClientMeta) -> Self {
        Self {
            id: payload.id,
            user_id: payload.user_id,
            refresh_token,
            user_agent: client.user_agent.clone(),
            client_ip: client.client_ip.clone(),
            is_blocked: false,
            expires_at: payload.expired_at,
            created_at: Utc::now(),
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }
}

/// Request metadata stored verbatim on new sessions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientMeta {
    pub user_agent: String,
    pub client_ip: String,
}

impl ClientMeta {
    pub fn new(user_agent: impl Into<String>, client_ip: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
            client_ip: client_ip.into(),
        }
    }
}

/// Identity proven by a verified access token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthIdentity {
    pub user_id: Uuid,
    pub token_id: Uuid,
}

impl From<TokenPayload> for AuthIdentity {
    fn from(payload: TokenPayload) -> Self {
        Self {
            user_id: payload.user_id,
            token_id: payload.id,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RegisterInput {
    pub email: String,
    pub password: String,
    pub fullname: String,
    pub phone: String,
}

/// Token pair handed back after register, login and renewal
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthTokens {
    pub session_id: Uuid,
    pub access_token: String,
    pub access_token_issued_at: DateTime<Utc>,
    pub access_token_expires_at: DateTime<Utc>,
    pub refresh_token: String,
    pub refresh_token_expires_at: DateTime<Utc>,
}

/// Public view of a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub fullname: String,
    pub email: String,
    pub phone: String,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            fullname: user.fullname,
            email: user.email,
            phone: user.phone,
        }
    }
}
