use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;

/// Decoded claims of a signed token.
///
/// `id` identifies the token instance; for refresh tokens it doubles as the
/// primary key of the session the token is bound to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPayload {
    pub id: Uuid,
    pub user_id: Uuid,
    pub issued_at: DateTime<Utc>,
    pub expired_at: DateTime<Utc>,
}

impl TokenPayload {
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expired_at
    }
}

/// Creates and verifies signed, time-bounded tokens.
///
/// Implementations are stateless: verification never touches a store, so
/// checking an access token costs no I/O.
pub trait TokenMaker: Send + Sync {
    /// Sign a fresh payload for `user_id` valid for `duration`.
    ///
    /// Returns the token string together with the payload it encodes.
    fn create_token(&self, secret: &str, user_id: Uuid, duration: Duration)
        -> Result<(String, TokenPayload)>;

    /// Check the signature and expiry of `token` and return its payload.
    ///
    /// Fails with `InvalidSignature` when signed with another secret,
    /// `TokenExpired` once `expired_at` has passed and `InvalidToken` for
    /// anything that cannot be decoded.
    fn verify_token(&self, secret: &str, token: &str) -> Result<TokenPayload>;
}
