//! Signed access and refresh tokens

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use trellis_types::{SessionId, UserId};

use crate::keys::{KeyKind, SigningKeys};
use crate::AuthError;

/// Claims carried by an access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject (user ID)
    pub sub: String,
    /// Issued-at timestamp
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
}

impl AccessClaims {
    /// Get the authenticated user ID
    pub fn user_id(&self) -> Option<UserId> {
        UserId::parse(&self.sub).ok()
    }

    /// Check if the token is expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }
}

/// Claims carried by a refresh token
///
/// The subject is the session ID, not the user; `uid` names the owning
/// user so rotation can match on both.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshClaims {
    /// Subject (session ID)
    pub sub: String,
    /// Owning user ID
    pub uid: String,
    /// Issued-at timestamp
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
}

impl RefreshClaims {
    /// Get the session ID
    pub fn session_id(&self) -> Option<SessionId> {
        SessionId::parse(&self.sub).ok()
    }

    /// Get the owning user ID
    pub fn user_id(&self) -> Option<UserId> {
        UserId::parse(&self.uid).ok()
    }

    /// Check the embedded expiry against the current time
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }
}

/// Issues and verifies tokens with the two process-wide key pairs
#[derive(Clone)]
pub struct TokenSigner {
    keys: Arc<SigningKeys>,
}

impl TokenSigner {
    /// Create a signer from loaded key material
    pub fn new(keys: SigningKeys) -> Self {
        Self {
            keys: Arc::new(keys),
        }
    }

    /// Issue an access token for a user
    pub fn issue_access(&self, user_id: UserId, ttl: Duration) -> Result<String, AuthError> {
        let now = Utc::now().timestamp();
        let claims = AccessClaims {
            sub: user_id.to_string(),
            iat: now,
            exp: now + ttl.as_secs() as i64,
        };
        self.sign(&claims, KeyKind::Access)
    }

    /// Issue a refresh token bound to a session
    pub fn issue_refresh(
        &self,
        session_id: SessionId,
        user_id: UserId,
        ttl: Duration,
    ) -> Result<String, AuthError> {
        let now = Utc::now().timestamp();
        let claims = RefreshClaims {
            sub: session_id.to_string(),
            uid: user_id.to_string(),
            iat: now,
            exp: now + ttl.as_secs() as i64,
        };
        self.sign(&claims, KeyKind::Refresh)
    }

    /// Verify an access token, including its expiry
    pub fn verify_access(&self, token: &str) -> Result<AccessClaims, AuthError> {
        let validation = Validation::new(Algorithm::EdDSA);
        decode::<AccessClaims>(token, &self.keys.access.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!("access token rejected: {}", e);
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                    _ => AuthError::InvalidToken,
                }
            })
    }

    /// Verify a refresh token's signature and structure only.
    ///
    /// The embedded expiry is deliberately not checked here; the session
    /// layer re-validates it against the stored row so an expired token
    /// can still identify the session it should destroy.
    pub fn verify_refresh(&self, token: &str) -> Result<RefreshClaims, AuthError> {
        let mut validation = Validation::new(Algorithm::EdDSA);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();
        decode::<RefreshClaims>(token, &self.keys.refresh.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!("refresh token rejected: {}", e);
                AuthError::InvalidToken
            })
    }

    fn sign<T: Serialize>(&self, claims: &T, kind: KeyKind) -> Result<String, AuthError> {
        encode(
            &Header::new(Algorithm::EdDSA),
            claims,
            &self.keys.for_kind(kind).encoding,
        )
        .map_err(|e| {
            tracing::error!("failed to sign token: {}", e);
            AuthError::Internal("failed to sign token".to_string())
        })
    }
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSigner").finish_non_exhaustive()
    }
}
