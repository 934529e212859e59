//! Outbound mail hooks
//!
//! Delivery itself is an external concern; the trait receives the
//! verification token that a real mailer would embed in a link.

use async_trait::async_trait;
use thiserror::Error;
use trellis_types::UserId;

/// Errors from an outbound mail backend
#[derive(Debug, Error)]
pub enum MailerError {
    #[error("mail delivery failed: {0}")]
    Delivery(String),
}

/// Outbound mail backend
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Send the registration-confirmation email carrying the token
    async fn send_registration(
        &self,
        email: &str,
        user_id: UserId,
        token: &str,
    ) -> Result<(), MailerError>;

    /// Send the password-reset email carrying the token
    async fn send_password_reset(
        &self,
        email: &str,
        user_id: UserId,
        token: &str,
    ) -> Result<(), MailerError>;
}

/// Mailer that only logs. Used in tests and local development.
#[derive(Debug, Default, Clone)]
pub struct NoopMailer;

#[async_trait]
impl Mailer for NoopMailer {
    async fn send_registration(
        &self,
        email: &str,
        user_id: UserId,
        token: &str,
    ) -> Result<(), MailerError> {
        tracing::debug!(%user_id, email, token, "registration email (noop)");
        Ok(())
    }

    async fn send_password_reset(
        &self,
        email: &str,
        user_id: UserId,
        token: &str,
    ) -> Result<(), MailerError> {
        tracing::debug!(%user_id, email, token, "password reset email (noop)");
        Ok(())
    }
}
