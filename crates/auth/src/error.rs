use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Email is already registered")]
    DuplicateEmail,

    #[error("Session already exists")]
    DuplicateSession,

    /// Returned for both an unknown email and a wrong password.
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Password hashing failed: {0}")]
    HashingError(String),

    #[error("Password does not match")]
    PasswordMismatch,

    #[error("Token generation failed: {0}")]
    TokenGenerationError(String),

    #[error("Token signature is invalid")]
    InvalidSignature,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Refresh token is blocked")]
    SessionBlocked,

    #[error("Refresh token does not belong to this session")]
    SessionMismatch,

    #[error("Session expired")]
    SessionExpired,

    #[error("{0} not found")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

pub type Result<T> = std::result::Result<T, AuthError>;
