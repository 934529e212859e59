//! Single-use verification tokens
//!
//! One active token exists per (user, purpose). Issuing rotates the
//! active token; consuming deletes it so it cannot be replayed.

use chrono::{Duration as ChronoDuration, Utc};
use std::sync::Arc;
use std::time::Duration;
use trellis_db::VerificationTokenRepository;
use trellis_types::{TokenPurpose, UserId};

use crate::crypto;
use crate::AuthError;

/// Issues and consumes single-use verification tokens
#[derive(Clone)]
pub struct VerificationTokens<V: VerificationTokenRepository> {
    repo: Arc<V>,
    reset_max_age: ChronoDuration,
}

impl<V: VerificationTokenRepository> VerificationTokens<V> {
    /// Create a verification token store.
    ///
    /// `reset_max_age` is the age ceiling for password-reset tokens;
    /// registration tokens carry no ceiling since they are re-issuable
    /// via resend.
    pub fn new(repo: Arc<V>, reset_max_age: Duration) -> Self {
        Self {
            repo,
            reset_max_age: ChronoDuration::from_std(reset_max_age)
                .unwrap_or(ChronoDuration::MAX),
        }
    }

    /// Issue a fresh token for (user, purpose), invalidating any prior one
    pub async fn issue(&self, user_id: UserId, purpose: TokenPurpose) -> Result<String, AuthError> {
        let token = crypto::random_token();
        self.repo.put(user_id.0, purpose, &token).await?;
        Ok(token)
    }

    /// Consume the active token for (user, purpose).
    ///
    /// The presented value must match the stored one exactly; a match
    /// deletes the row, so a second consume with the same value fails.
    pub async fn consume(
        &self,
        user_id: UserId,
        purpose: TokenPurpose,
        presented: &str,
    ) -> Result<(), AuthError> {
        let row = self
            .repo
            .find(user_id.0, purpose)
            .await?
            .ok_or(AuthError::InvalidVerificationToken)?;

        if !crypto::constant_time_str_eq(&row.token, presented) {
            return Err(AuthError::InvalidVerificationToken);
        }

        if purpose == TokenPurpose::PasswordReset
            && Utc::now().signed_duration_since(row.created_at) > self.reset_max_age
        {
            self.repo.delete(user_id.0, purpose).await?;
            return Err(AuthError::VerificationTokenExpired);
        }

        self.repo.delete(user_id.0, purpose).await?;
        Ok(())
    }
}

impl<V: VerificationTokenRepository> std::fmt::Debug for VerificationTokens<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerificationTokens")
            .field("reset_max_age", &self.reset_max_age)
            .finish_non_exhaustive()
    }
}
