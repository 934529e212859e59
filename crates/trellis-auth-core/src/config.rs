//! Configuration types for the auth core

use std::time::Duration;

/// Auth core configuration
///
/// Key material is injected separately (see [`crate::SigningKeys`]);
/// this only carries lifetimes.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Access token lifetime (short, minutes)
    pub access_token_ttl: Duration,
    /// Refresh token lifetime (long, days)
    pub refresh_token_ttl: Duration,
    /// Maximum age of a password-reset verification token
    pub reset_token_max_age: Duration,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            access_token_ttl: Duration::from_secs(15 * 60),
            refresh_token_ttl: Duration::from_secs(7 * 24 * 60 * 60),
            reset_token_max_age: Duration::from_secs(24 * 60 * 60),
        }
    }
}

impl AuthConfig {
    /// Set access token lifetime
    pub fn with_access_token_ttl(mut self, ttl: Duration) -> Self {
        self.access_token_ttl = ttl;
        self
    }

    /// Set refresh token lifetime
    pub fn with_refresh_token_ttl(mut self, ttl: Duration) -> Self {
        self.refresh_token_ttl = ttl;
        self
    }

    /// Set the password-reset token age ceiling
    pub fn with_reset_token_max_age(mut self, max_age: Duration) -> Self {
        self.reset_token_max_age = max_age;
        self
    }
}
