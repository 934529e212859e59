//! Trellis Auth Core - authentication and session lifecycle
//!
//! Issues and rotates signed token pairs, detects refresh-token reuse,
//! and gates account-state transitions (registration confirmation,
//! password reset) behind single-use verification tokens.

pub mod config;
pub mod crypto;
pub mod error;
pub mod keys;
pub mod mailer;
pub mod service;
pub mod session;
pub mod token;
pub mod verification;

pub use config::AuthConfig;
pub use error::AuthError;
pub use keys::{KeyError, KeyKind, KeyPair, SigningKeys};
pub use mailer::{Mailer, MailerError, NoopMailer};
pub use service::{AuthService, NewUser};
pub use session::SessionManager;
pub use token::{AccessClaims, RefreshClaims, TokenSigner};
pub use verification::VerificationTokens;
