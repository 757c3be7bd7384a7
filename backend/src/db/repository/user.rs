//! User account and session repository traits.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::api::{User, UserId};
use crate::db::models::Session;

/// Repository trait for user accounts.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Store a new user. The `id` field is ignored and a fresh one assigned.
    ///
    /// # Returns
    /// * `Err(RepositoryError::Conflict)` - If the username is already taken
    async fn insert_user(&self, user: User) -> RepositoryResult<User>;

    /// Retrieve a user by ID.
    async fn get_user(&self, user_id: UserId) -> RepositoryResult<User>;

    /// Look up a user by exact username.
    async fn find_user_by_username(&self, username: &str) -> RepositoryResult<Option<User>>;

    /// List all users ordered by ID.
    async fn list_users(&self) -> RepositoryResult<Vec<User>>;

    /// Overwrite a stored user.
    async fn update_user(&self, user: &User) -> RepositoryResult<()>;

    /// Delete a user.
    async fn delete_user(&self, user_id: UserId) -> RepositoryResult<()>;
}

/// Repository trait for login sessions.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Persist a session, dropping sessions already expired at its creation time.
    async fn store_session(&self, session: Session) -> RepositoryResult<()>;

    /// Look up a session by token.
    async fn find_session(&self, token: &str) -> RepositoryResult<Option<Session>>;

    /// Remove a session. Returns whether it existed.
    async fn revoke_session(&self, token: &str) -> RepositoryResult<bool>;

    /// Remove every session of a user. Returns the number removed.
    async fn revoke_user_sessions(&self, user_id: UserId) -> RepositoryResult<usize>;
}
