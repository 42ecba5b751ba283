//! Persistence contracts consumed by [`AuthService`](crate::AuthService).
//!
//! Stores must be atomic per call: `create` either inserts the record or
//! reports the conflict, and uniqueness of user emails is enforced here,
//! never by a lookup-then-insert in the service.

pub mod memory;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::model::{Session, User};

/// User storage
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user. Fails with `DuplicateEmail` if the email is taken.
    async fn create(&self, user: User) -> Result<User>;

    /// Fails with `NotFound` if no user has this email.
    async fn find_by_email(&self, email: &str) -> Result<User>;

    /// Fails with `NotFound` if no user has this id.
    async fn find_by_id(&self, id: Uuid) -> Result<User>;
}

/// Session storage
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Insert a new session. Fails with `DuplicateSession` on an id clash.
    async fn create(&self, session: Session) -> Result<Session>;

    /// Fails with `NotFound` if no session has this id.
    async fn find_by_id(&self, id: Uuid) -> Result<Session>;

    /// Mark a session blocked. Blocking is terminal.
    async fn block(&self, id: Uuid) -> Result<()>;
}
