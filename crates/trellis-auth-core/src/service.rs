//! Auth orchestrator - ties together the user directory, session store,
//! verification tokens, and token signing

use std::sync::Arc;
use trellis_db::{
    CreateUser, SessionRepository, UserRepository, UserUpdate, VerificationTokenRepository,
};
use trellis_types::{LoginTypes, TokenPair, TokenPurpose, User, UserId, UserRole, UserStatus};
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::crypto;
use crate::keys::SigningKeys;
use crate::mailer::Mailer;
use crate::session::SessionManager;
use crate::token::TokenSigner;
use crate::verification::VerificationTokens;
use crate::AuthError;

/// Registration input
#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

/// Authentication service
///
/// One method per flow; every method returns either a success payload
/// or a typed [`AuthError`], never both.
pub struct AuthService<U, S, V>
where
    U: UserRepository,
    S: SessionRepository,
    V: VerificationTokenRepository,
{
    users: Arc<U>,
    sessions: SessionManager<S>,
    verification: VerificationTokens<V>,
    signer: TokenSigner,
    mailer: Arc<dyn Mailer>,
}

impl<U, S, V> AuthService<U, S, V>
where
    U: UserRepository,
    S: SessionRepository,
    V: VerificationTokenRepository,
{
    /// Create a new auth service
    pub fn new(
        config: AuthConfig,
        keys: SigningKeys,
        users: Arc<U>,
        sessions: Arc<S>,
        verification_tokens: Arc<V>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        let signer = TokenSigner::new(keys);
        Self {
            sessions: SessionManager::new(
                sessions,
                signer.clone(),
                config.access_token_ttl,
                config.refresh_token_ttl,
            ),
            verification: VerificationTokens::new(verification_tokens, config.reset_token_max_age),
            signer,
            users,
            mailer,
        }
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Register a new account.
    ///
    /// The account starts `Unverified`; a registration token is issued
    /// and handed to the mailer.
    pub async fn register(&self, new_user: NewUser) -> Result<User, AuthError> {
        let password_hash = hash_password(&new_user.password)?;

        let row = self
            .users
            .create(CreateUser {
                id: Uuid::new_v4(),
                first_name: new_user.first_name,
                last_name: new_user.last_name,
                email: new_user.email,
                password_hash,
                role: UserRole::Member,
            })
            .await?;

        let token = self
            .verification
            .issue(row.user_id(), TokenPurpose::Registration)
            .await?;
        self.mailer
            .send_registration(&row.email, row.user_id(), &token)
            .await?;

        Ok(row.to_user())
    }

    /// Reissue the registration token, rotating any prior one
    pub async fn resend_registration_email(&self, email: &str) -> Result<(), AuthError> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or(AuthError::UserNotFound)?;
        if user.is_verified() {
            return Err(AuthError::AlreadyVerified);
        }

        let token = self
            .verification
            .issue(user.user_id(), TokenPurpose::Registration)
            .await?;
        self.mailer
            .send_registration(&user.email, user.user_id(), &token)
            .await?;
        Ok(())
    }

    /// Flip the account to `Verified`, consuming the registration token
    pub async fn verify_registration(&self, email: &str, uid: &str) -> Result<(), AuthError> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or(AuthError::UserNotFound)?;
        if user.is_verified() {
            return Err(AuthError::AlreadyVerified);
        }

        self.verification
            .consume(user.user_id(), TokenPurpose::Registration, uid)
            .await?;

        let affected = self.users.set_status(user.id, UserStatus::Verified).await?;
        if affected == 0 {
            return Err(AuthError::UserNotFound);
        }
        Ok(())
    }

    // =========================================================================
    // Login and sessions
    // =========================================================================

    /// Password login: verify credentials, open a session, return the
    /// sanitized user and initial token pair
    pub async fn login(&self, email: &str, password: &str) -> Result<(User, TokenPair), AuthError> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if !crypto::verify_password(password, &user.password_hash) {
            return Err(AuthError::WrongPassword);
        }

        let tokens = self.sessions.start(user.user_id()).await?;
        Ok((user.to_user(), tokens))
    }

    /// Exchange a refresh token for a new pair
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<TokenPair, AuthError> {
        self.sessions.refresh(refresh_token).await
    }

    /// Tear down the session named by a refresh token (idempotent)
    pub async fn logout(&self, refresh_token: &str) -> Result<(), AuthError> {
        self.sessions.end(refresh_token).await
    }

    /// Validate an access token and return the authenticated user ID
    pub fn verify_access(&self, token: &str) -> Result<UserId, AuthError> {
        let claims = self.signer.verify_access(token)?;
        claims.user_id().ok_or(AuthError::InvalidToken)
    }

    /// Delete every session a user holds
    pub async fn revoke_all_sessions(&self, user_id: UserId) -> Result<u64, AuthError> {
        self.sessions.revoke_all(user_id).await
    }

    // =========================================================================
    // Passwords
    // =========================================================================

    /// Change the password after verifying the current one.
    ///
    /// Existing sessions stay valid; callers wanting a clean slate chain
    /// [`Self::revoke_all_sessions`].
    pub async fn change_password(
        &self,
        user_id: UserId,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        let user = self
            .users
            .find_by_id(user_id.0)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if !crypto::verify_password(current_password, &user.password_hash) {
            return Err(AuthError::WrongPassword);
        }

        let password_hash = hash_password(new_password)?;
        self.users
            .update(
                user.id,
                UserUpdate {
                    password_hash: Some(password_hash),
                    ..Default::default()
                },
            )
            .await?
            .ok_or(AuthError::UserNotFound)?;
        Ok(())
    }

    /// Issue a password-reset token and hand it to the mailer.
    ///
    /// Always succeeds from the caller's view; an unknown email is not
    /// distinguishable from a known one, which blocks account
    /// enumeration through this endpoint.
    pub async fn send_reset_password_email(&self, email: &str) -> Result<(), AuthError> {
        let Some(user) = self.users.find_by_email(email).await? else {
            return Ok(());
        };

        let token = self
            .verification
            .issue(user.user_id(), TokenPurpose::PasswordReset)
            .await?;
        self.mailer
            .send_password_reset(&user.email, user.user_id(), &token)
            .await?;
        Ok(())
    }

    /// Set a new password, consuming the reset token
    pub async fn reset_password(
        &self,
        email: &str,
        uid: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        self.verification
            .consume(user.user_id(), TokenPurpose::PasswordReset, uid)
            .await?;

        let password_hash = hash_password(new_password)?;
        self.users
            .update(
                user.id,
                UserUpdate {
                    password_hash: Some(password_hash),
                    ..Default::default()
                },
            )
            .await?
            .ok_or(AuthError::UserNotFound)?;
        Ok(())
    }

    // =========================================================================
    // Account lookup
    // =========================================================================

    /// Which login mechanisms exist for an email; all-false when unknown
    pub async fn login_types(&self, email: &str) -> Result<LoginTypes, AuthError> {
        Ok(self.users.login_types(email).await?)
    }
}

fn hash_password(password: &str) -> Result<String, AuthError> {
    crypto::hash_password(password).map_err(|e| {
        tracing::error!("password hashing failed: {}", e);
        AuthError::Internal("password hashing failed".to_string())
    })
}

impl<U, S, V> std::fmt::Debug for AuthService<U, S, V>
where
    U: UserRepository,
    S: SessionRepository,
    V: VerificationTokenRepository,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("sessions", &self.sessions)
            .field("verification", &self.verification)
            .finish_non_exhaustive()
    }
}
