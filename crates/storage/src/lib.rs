//! SQLite persistence for the authentication stores
//!
//! Implements [`auth::UserStore`] and [`auth::SessionStore`] over the
//! `users` and `sessions` tables created by `orderin_core::migrations`.

mod model;
pub mod session;
pub mod user;

pub use session::SqliteSessionStore;
pub use user::SqliteUserStore;

use auth::AuthError;

/// Map a write failure, turning unique violations into `duplicate`
pub(crate) fn map_db_error(error: sqlx::Error, duplicate: AuthError) -> AuthError {
    match &error {
        sqlx::Error::Database(db_error) if db_error.is_unique_violation() => duplicate,
        _ => AuthError::Storage(error.to_string()),
    }
}
