//! Session lifecycle: creation, refresh rotation, teardown
//!
//! Every session holds the fingerprint of exactly one refresh token.
//! Refreshing rotates the token: the presented one is retired, a new
//! one takes its place. A retired token showing up again is reuse,
//! and reuse destroys the session.

use std::sync::Arc;
use std::time::Duration;
use trellis_db::SessionRepository;
use trellis_types::{TokenPair, UserId};

use crate::crypto;
use crate::token::TokenSigner;
use crate::AuthError;

/// Manages login sessions and their refresh-token rotation
#[derive(Clone)]
pub struct SessionManager<S: SessionRepository> {
    repo: Arc<S>,
    signer: TokenSigner,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl<S: SessionRepository> SessionManager<S> {
    /// Create a session manager
    pub fn new(
        repo: Arc<S>,
        signer: TokenSigner,
        access_ttl: Duration,
        refresh_ttl: Duration,
    ) -> Self {
        Self {
            repo,
            signer,
            access_ttl,
            refresh_ttl,
        }
    }

    /// Open a new session for a user and return the initial token pair.
    ///
    /// The row is created with a placeholder hash and immediately rotated
    /// to the fingerprint of the freshly signed refresh token. If that
    /// rotation loses, the orphaned row is removed before erroring.
    pub async fn start(&self, user_id: UserId) -> Result<TokenPair, AuthError> {
        let access_token = self.signer.issue_access(user_id, self.access_ttl)?;

        let row = self.repo.create(user_id.0).await?;
        let refresh_token = self
            .signer
            .issue_refresh(row.session_id(), user_id, self.refresh_ttl)?;
        let hash = crypto::fingerprint(&refresh_token);

        let rotated = self
            .repo
            .rotate(row.id, row.user_id, &row.refresh_token_hash, &hash)
            .await?;
        if rotated.is_none() {
            self.repo.delete_by_id(row.id).await?;
            return Err(AuthError::SessionNotUpdated);
        }

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    /// Exchange a refresh token for a new pair, rotating the stored hash.
    ///
    /// Structural verification failures surface as `SessionExpired`,
    /// indistinguishable from a genuinely expired session. A token whose
    /// fingerprint no longer matches the stored one is a replay of a
    /// rotated-away value: the session is destroyed on the spot.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AuthError> {
        let claims = self
            .signer
            .verify_refresh(refresh_token)
            .map_err(|_| AuthError::SessionExpired)?;
        let session_id = claims.session_id().ok_or(AuthError::SessionExpired)?;
        let user_id = claims.user_id().ok_or(AuthError::SessionExpired)?;

        let session = self
            .repo
            .find_by_id(session_id.0)
            .await?
            .ok_or(AuthError::SessionExpired)?;

        let presented = crypto::fingerprint(refresh_token);
        if !crypto::constant_time_str_eq(&session.refresh_token_hash, &presented) {
            tracing::warn!(%session_id, "stale refresh token replayed, destroying session");
            self.repo.delete_by_id(session.id).await?;
            return Err(AuthError::InvalidToken);
        }

        if claims.is_expired() {
            self.repo.delete_by_id(session.id).await?;
            return Err(AuthError::SessionExpired);
        }

        let new_refresh = self
            .signer
            .issue_refresh(session_id, user_id, self.refresh_ttl)?;
        let new_hash = crypto::fingerprint(&new_refresh);

        self.repo
            .rotate(session.id, session.user_id, &presented, &new_hash)
            .await?
            .ok_or(AuthError::SessionNotUpdated)?;

        let access_token = self.signer.issue_access(user_id, self.access_ttl)?;
        Ok(TokenPair {
            access_token,
            refresh_token: new_refresh,
        })
    }

    /// Tear down the session named by a refresh token.
    ///
    /// A token that fails verification means there is nothing left to
    /// log out of; the call succeeds either way (idempotent).
    pub async fn end(&self, refresh_token: &str) -> Result<(), AuthError> {
        let Ok(claims) = self.signer.verify_refresh(refresh_token) else {
            return Ok(());
        };
        let Some(session_id) = claims.session_id() else {
            return Ok(());
        };
        self.repo.delete_by_id(session_id.0).await?;
        Ok(())
    }

    /// Delete every session a user holds, returning the count
    pub async fn revoke_all(&self, user_id: UserId) -> Result<u64, AuthError> {
        Ok(self.repo.delete_all_for_user(user_id.0).await?)
    }
}

impl<S: SessionRepository> std::fmt::Debug for SessionManager<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish_non_exhaustive()
    }
}
