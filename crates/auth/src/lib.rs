// Core modules
mod error;
mod password;
mod jwt;
mod token;

pub mod model;
pub mod service;
pub mod store;

// Re-export error types
pub use error::{AuthError, Result};

// Re-export crypto primitives
pub use password::{hash_password, verify_password};
pub use jwt::JwtMaker;
pub use token::{TokenMaker, TokenPayload};

// Re-export service types
pub use model::{AuthIdentity, AuthTokens, ClientMeta, RegisterInput, Session, User, UserProfile};
pub use service::{AuthService, TokenConfig};
pub use store::{SessionStore, UserStore};
pub use store::memory::{MemorySessionStore, MemoryUserStore};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        AuthError, Result,
        AuthService, TokenConfig,
        AuthIdentity, AuthTokens, ClientMeta,
        SessionStore, UserStore,
        TokenMaker, JwtMaker,
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use uuid::Uuid;

    #[test]
    fn test_password_hashing() {
        let password = "test_password_123";
        let hash = hash_password(password).unwrap();

        assert!(verify_password(password, &hash).is_ok());
        assert!(verify_password("wrong_password", &hash).is_err());
    }

    #[test]
    fn test_jwt_token() {
        let secret = "test_secret_key_for_jwt_0123456789";
        let user_id = Uuid::new_v4();

        let (token, _) = JwtMaker::new()
            .create_token(secret, user_id, Duration::hours(1))
            .unwrap();
        let payload = JwtMaker::new().verify_token(secret, &token).unwrap();

        assert_eq!(payload.user_id, user_id);
    }
}
