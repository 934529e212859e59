//! Authentication wire types

use serde::{Deserialize, Serialize};

/// A freshly issued access/refresh token pair
///
/// The raw refresh token is handed to the client exactly once; the server
/// keeps only its fingerprint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    /// Short-lived signed credential authorizing individual requests
    pub access_token: String,
    /// Longer-lived signed credential exchanged for a new pair on every use
    pub refresh_token: String,
}

/// Purpose of a single-use verification token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenPurpose {
    /// Gates the Unverified -> Verified account transition
    Registration,
    /// Gates a password reset
    PasswordReset,
}

impl TokenPurpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Registration => "registration",
            Self::PasswordReset => "password_reset",
        }
    }
}

impl std::fmt::Display for TokenPurpose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which login mechanisms exist for an email address
///
/// An unknown email yields all-false rather than an error.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct LoginTypes {
    /// A password login exists (the account carries a real password hash)
    pub password: bool,
    /// A linked Google OAuth account exists
    pub google: bool,
    /// A linked LinkedIn OAuth account exists
    pub linked_in: bool,
}
