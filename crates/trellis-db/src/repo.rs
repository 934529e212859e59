//! Repository traits
//!
//! Define async repository interfaces for database operations. The auth
//! core is generic over these traits; tests substitute in-memory
//! implementations.

use async_trait::async_trait;
use trellis_types::{LoginTypes, TokenPurpose, UserRole, UserStatus};
use uuid::Uuid;

use crate::error::DbResult;
use crate::models::*;

/// User directory trait
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by ID
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<UserRow>>;

    /// Find a user by email
    async fn find_by_email(&self, email: &str) -> DbResult<Option<UserRow>>;

    /// Create a new user
    ///
    /// Fails with [`crate::DbError::Duplicate`] when the email is taken.
    async fn create(&self, user: CreateUser) -> DbResult<UserRow>;

    /// Update account status, returning the number of affected rows
    async fn set_status(&self, id: Uuid, status: UserStatus) -> DbResult<u64>;

    /// Apply a partial update; only present fields are written.
    /// Returns the updated row, or `None` when the user does not exist.
    async fn update(&self, id: Uuid, update: UserUpdate) -> DbResult<Option<UserRow>>;

    /// Which login mechanisms exist for an email
    async fn login_types(&self, email: &str) -> DbResult<LoginTypes>;
}

/// Create user input
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
}

/// Partial user update: every field optional, only present fields applied
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
}

/// Session store trait
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Find a session by ID
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<SessionRow>>;

    /// Create a new session row with a placeholder refresh-token hash.
    /// The ID is assigned by the store.
    async fn create(&self, user_id: Uuid) -> DbResult<SessionRow>;

    /// Atomically replace the refresh-token hash.
    ///
    /// The row must match on ID, owning user, AND the current hash; a
    /// racing rotation loses by observing `None`. This is a single
    /// compare-and-swap statement, never a set-then-select.
    async fn rotate(
        &self,
        id: Uuid,
        user_id: Uuid,
        expected_hash: &str,
        new_hash: &str,
    ) -> DbResult<Option<SessionRow>>;

    /// Delete a session, returning the number of deleted rows
    async fn delete_by_id(&self, id: Uuid) -> DbResult<u64>;

    /// Delete every session belonging to a user
    async fn delete_all_for_user(&self, user_id: Uuid) -> DbResult<u64>;
}

/// Verification token store trait
#[async_trait]
pub trait VerificationTokenRepository: Send + Sync {
    /// Store a token for (user, purpose), replacing any prior token for
    /// the pair in one atomic statement.
    async fn put(&self, user_id: Uuid, purpose: TokenPurpose, token: &str) -> DbResult<()>;

    /// Fetch the active token for (user, purpose)
    async fn find(
        &self,
        user_id: Uuid,
        purpose: TokenPurpose,
    ) -> DbResult<Option<VerificationTokenRow>>;

    /// Delete the token for (user, purpose), returning deleted-row count
    async fn delete(&self, user_id: Uuid, purpose: TokenPurpose) -> DbResult<u64>;
}
