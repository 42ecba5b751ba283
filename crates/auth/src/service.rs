use std::sync::Arc;

use chrono::Duration;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    error::{AuthError, Result},
    model::{AuthIdentity, AuthTokens, ClientMeta, RegisterInput, Session, User, UserProfile},
    password::{hash_password, verify_dummy, verify_password},
    store::{SessionStore, UserStore},
    token::{TokenMaker, TokenPayload},
};

/// Secrets and lifetimes for the two token kinds
#[derive(Debug, Clone)]
pub struct TokenConfig {
    pub access_secret: String,
    pub refresh_secret: String,
    pub access_duration: Duration,
    pub refresh_duration: Duration,
}

/// Authentication service tying user and session stores to token issuance
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    sessions: Arc<dyn SessionStore>,
    tokens: Arc<dyn TokenMaker>,
    config: TokenConfig,
}

impl AuthService {
    /// Create a new AuthService
    ///
    /// # Arguments
    /// * `users` - User persistence
    /// * `sessions` - Session persistence
    /// * `tokens` - Token signing primitive
    /// * `config` - Token secrets and durations
    pub fn new(
        users: Arc<dyn UserStore>,
        sessions: Arc<dyn SessionStore>,
        tokens: Arc<dyn TokenMaker>,
        config: TokenConfig,
    ) -> Self {
        Self {
            users,
            sessions,
            tokens,
            config,
        }
    }

    /// Register a new user and open its first session.
    ///
    /// The user row and the session row are written in two steps. If the
    /// session insert fails the user stays registered without a session;
    /// a later `login` opens one.
    pub async fn register(&self, input: RegisterInput, client: &ClientMeta) -> Result<AuthTokens> {
        let password_hash = hash_password(&input.password)?;
        let user = User::new(input.email, password_hash, input.fullname, input.phone);

        // Tokens first: a signing failure must not leave a user behind
        let pair = self.mint_pair(user.id)?;

        let user = self.users.create(user).await?;
        info!(user_id = %user.id, "user registered");

        self.store_session(pair, client).await.inspect_err(|e| {
            warn!(user_id = %user.id, error = %e, "user registered without a session");
        })
    }

    /// Login with email and password.
    ///
    /// Unknown email and wrong password both fail with `InvalidCredentials`.
    pub async fn login(&self, email: &str, password: &str, client: &ClientMeta) -> Result<AuthTokens> {
        let user = match self.users.find_by_email(email).await {
            Ok(user) => user,
            Err(AuthError::NotFound(_)) => {
                let _ = verify_dummy(password);
                return Err(AuthError::InvalidCredentials);
            }
            Err(e) => return Err(e),
        };

        verify_password(password, &user.password_hash).map_err(|_| AuthError::InvalidCredentials)?;

        let tokens = self.open_session(user.id, client).await?;
        info!(user_id = %user.id, session_id = %tokens.session_id, "user logged in");

        Ok(tokens)
    }

    /// Mint a new access token from a refresh token.
    ///
    /// Reads the bound session but never changes it: the refresh token stays
    /// valid until it expires or its session is blocked.
    pub async fn renew_access_token(&self, refresh_token: &str) -> Result<AuthTokens> {
        let refresh_payload = self
            .tokens
            .verify_token(&self.config.refresh_secret, refresh_token)?;

        let session = self.sessions.find_by_id(refresh_payload.id).await?;

        if session.is_blocked {
            warn!(session_id = %session.id, "renewal attempted on blocked session");
            return Err(AuthError::SessionBlocked);
        }

        if session.user_id != refresh_payload.user_id {
            warn!(session_id = %session.id, "refresh token user does not match session");
            return Err(AuthError::SessionMismatch);
        }

        if session.is_expired() {
            return Err(AuthError::SessionExpired);
        }

        let (access_token, access_payload) = self.tokens.create_token(
            &self.config.access_secret,
            session.user_id,
            self.config.access_duration,
        )?;

        Ok(build_tokens(
            access_token,
            &access_payload,
            refresh_token.to_string(),
            &refresh_payload,
            &session,
        ))
    }

    /// Verify an access token. No store is consulted.
    pub fn authenticate(&self, access_token: &str) -> Result<AuthIdentity> {
        self.tokens
            .verify_token(&self.config.access_secret, access_token)
            .map(AuthIdentity::from)
    }

    /// Profile of the authenticated user
    pub async fn profile(&self, identity: &AuthIdentity) -> Result<UserProfile> {
        self.users
            .find_by_id(identity.user_id)
            .await
            .map(UserProfile::from)
    }

    /// Block one of the caller's own sessions.
    ///
    /// Sessions of other users are reported as `NotFound`.
    pub async fn block_session(&self, identity: &AuthIdentity, session_id: Uuid) -> Result<()> {
        let session = self.sessions.find_by_id(session_id).await?;
        if session.user_id != identity.user_id {
            return Err(AuthError::NotFound("Session".to_string()));
        }

        self.sessions.block(session_id).await?;
        info!(user_id = %identity.user_id, session_id = %session_id, "session blocked");

        Ok(())
    }

    async fn open_session(&self, user_id: Uuid, client: &ClientMeta) -> Result<AuthTokens> {
        let pair = self.mint_pair(user_id)?;
        self.store_session(pair, client).await
    }

    fn mint_pair(&self, user_id: Uuid) -> Result<TokenPair> {
        let access = self.tokens.create_token(
            &self.config.access_secret,
            user_id,
            self.config.access_duration,
        )?;
        let refresh = self.tokens.create_token(
            &self.config.refresh_secret,
            user_id,
            self.config.refresh_duration,
        )?;
        Ok(TokenPair { access, refresh })
    }

    async fn store_session(&self, pair: TokenPair, client: &ClientMeta) -> Result<AuthTokens> {
        let TokenPair {
            access: (access_token, access_payload),
            refresh: (refresh_token, refresh_payload),
        } = pair;

        let session = Session::for_refresh_token(refresh_token.clone(), &refresh_payload, client);
        let session = self.sessions.create(session).await?;

        Ok(build_tokens(
            access_token,
            &access_payload,
            refresh_token,
            &refresh_payload,
            &session,
        ))
    }
}

struct TokenPair {
    access: (String, TokenPayload),
    refresh: (String, TokenPayload),
}

fn build_tokens(
    access_token: String,
    access_payload: &TokenPayload,
    refresh_token: String,
    refresh_payload: &TokenPayload,
    session: &Session,
) -> AuthTokens {
    AuthTokens {
        session_id: session.id,
        access_token,
        access_token_issued_at: access_payload.issued_at,
        access_token_expires_at: access_payload.expired_at,
        refresh_token,
        refresh_token_expires_at: refresh_payload.expired_at,
    }
}
