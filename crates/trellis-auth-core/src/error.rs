//! Auth errors

use thiserror::Error;

/// Authentication errors
///
/// Every downstream fault is classified into one of these before it
/// crosses the service boundary; raw store errors never leak out.
#[derive(Error, Debug)]
pub enum AuthError {
    /// Invalid token (malformed, bad signature, refresh reuse)
    #[error("invalid token")]
    InvalidToken,

    /// Access token has expired
    #[error("token expired")]
    TokenExpired,

    /// Session is gone or its refresh token has expired
    #[error("session expired")]
    SessionExpired,

    /// Session rotation lost a race (no row matched the expected hash)
    #[error("session not updated")]
    SessionNotUpdated,

    /// User not found
    #[error("user not found")]
    UserNotFound,

    /// Email already registered
    #[error("email already used")]
    EmailAlreadyUsed,

    /// Account already completed registration verification
    #[error("already verified")]
    AlreadyVerified,

    /// Password mismatch
    #[error("wrong password")]
    WrongPassword,

    /// Verification token absent or mismatched
    #[error("invalid verification token")]
    InvalidVerificationToken,

    /// Verification token older than the allowed ceiling
    #[error("verification token expired")]
    VerificationTokenExpired,

    /// Database error
    #[error("database error: {0}")]
    Database(String),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidToken
            | Self::TokenExpired
            | Self::SessionExpired
            | Self::WrongPassword => 401,
            Self::UserNotFound => 404,
            Self::EmailAlreadyUsed | Self::AlreadyVerified | Self::SessionNotUpdated => 409,
            Self::InvalidVerificationToken | Self::VerificationTokenExpired => 400,
            Self::Database(_) | Self::Internal(_) => 500,
        }
    }

    /// Get error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidToken => "INVALID_TOKEN",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::SessionExpired => "SESSION_EXPIRED",
            Self::SessionNotUpdated => "SESSION_NOT_UPDATED",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::EmailAlreadyUsed => "EMAIL_ALREADY_USED",
            Self::AlreadyVerified => "ALREADY_VERIFIED",
            Self::WrongPassword => "WRONG_PASSWORD",
            Self::InvalidVerificationToken => "INVALID_VERIFICATION_TOKEN",
            Self::VerificationTokenExpired => "VERIFICATION_TOKEN_EXPIRED",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<trellis_db::DbError> for AuthError {
    fn from(err: trellis_db::DbError) -> Self {
        match err {
            trellis_db::DbError::Duplicate => Self::EmailAlreadyUsed,
            trellis_db::DbError::NotFound => Self::UserNotFound,
            trellis_db::DbError::Sqlx(e) => {
                tracing::error!("database error: {}", e);
                Self::Database(e.to_string())
            }
        }
    }
}

impl From<crate::mailer::MailerError> for AuthError {
    fn from(err: crate::mailer::MailerError) -> Self {
        tracing::error!("mailer error: {}", err);
        Self::Internal(err.to_string())
    }
}
