//! Database row models
//!
//! These types map directly to database rows using SQLx's FromRow derive.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use trellis_types::{SessionId, User, UserId, UserRole, UserStatus};
use uuid::Uuid;

/// User row from the database
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub status: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Session row from the database
///
/// `refresh_token_hash` holds the fingerprint of the refresh token
/// currently accepted for this session; it starts as an empty placeholder
/// and is replaced on every rotation.
#[derive(Debug, Clone, FromRow)]
pub struct SessionRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub refresh_token_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Verification token row from the database
///
/// At most one row exists per (user, purpose); issuing a new token
/// replaces the old row.
#[derive(Debug, Clone, FromRow)]
pub struct VerificationTokenRow {
    pub user_id: Uuid,
    pub purpose: String,
    pub token: String,
    pub created_at: DateTime<Utc>,
}

impl UserRow {
    /// Convert to domain UserId
    pub fn user_id(&self) -> UserId {
        UserId(self.id)
    }

    /// Convert to the sanitized domain view (drops the password hash)
    pub fn to_user(&self) -> User {
        User {
            id: self.user_id(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            status: self.status.parse().unwrap_or(UserStatus::Unverified),
            role: self.role.parse().unwrap_or(UserRole::Member),
        }
    }

    /// Whether the account has completed registration verification
    pub fn is_verified(&self) -> bool {
        self.status.parse() == Ok(UserStatus::Verified)
    }
}

impl SessionRow {
    /// Convert to domain SessionId
    pub fn session_id(&self) -> SessionId {
        SessionId(self.id)
    }

    /// Convert to domain UserId
    pub fn user_id(&self) -> UserId {
        UserId(self.user_id)
    }
}
