use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AuthError, Result};
use crate::token::{TokenMaker, TokenPayload};

/// JWT Claims structure
#[derive(Debug, Serialize, Deserialize, Clone)]
struct Claims {
    /// Token ID
    jti: Uuid,
    /// Subject (user ID)
    sub: Uuid,
    /// Issued at (timestamp)
    iat: i64,
    /// Expiration time (timestamp)
    exp: i64,
}

impl Claims {
    fn new(user_id: Uuid, duration: Duration) -> Self {
        let iat = Utc::now().timestamp();

        Self {
            jti: Uuid::new_v4(),
            sub: user_id,
            iat,
            exp: iat.saturating_add(duration.num_seconds()),
        }
    }

    fn into_payload(self) -> Result<TokenPayload> {
        let issued_at = DateTime::from_timestamp(self.iat, 0).ok_or(AuthError::InvalidToken)?;
        let expired_at = DateTime::from_timestamp(self.exp, 0).ok_or(AuthError::InvalidToken)?;

        Ok(TokenPayload {
            id: self.jti,
            user_id: self.sub,
            issued_at,
            expired_at,
        })
    }
}

/// HS256 JSON Web Token implementation of [`TokenMaker`]
#[derive(Debug, Clone, Copy, Default)]
pub struct JwtMaker;

impl JwtMaker {
    pub fn new() -> Self {
        Self
    }

    fn validation() -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against the decoded payload with no leeway
        validation.validate_exp = false;
        validation
    }
}

impl TokenMaker for JwtMaker {
    fn create_token(
        &self,
        secret: &str,
        user_id: Uuid,
        duration: Duration,
    ) -> Result<(String, TokenPayload)> {
        let claims = Claims::new(user_id, duration);

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .map_err(|e| AuthError::TokenGenerationError(e.to_string()))?;

        let payload = claims
            .into_payload()
            .map_err(|_| AuthError::TokenGenerationError("timestamp out of range".to_string()))?;

        Ok((token, payload))
    }

    fn verify_token(&self, secret: &str, token: &str) -> Result<TokenPayload> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Self::validation(),
        )
        .map_err(|e| match e.kind() {
            ErrorKind::InvalidSignature => AuthError::InvalidSignature,
            ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::InvalidToken,
        })?;

        let payload = token_data.claims.into_payload()?;

        if payload.is_expired() {
            return Err(AuthError::TokenExpired);
        }

        Ok(payload)
    }
}
