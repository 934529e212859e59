//! Signing key pairs
//!
//! Two disjoint Ed25519 pairs, one for access tokens and one for refresh
//! tokens. Loaded once at startup and immutable thereafter; the core
//! receives them as an injected read-only dependency.

use jsonwebtoken::{DecodingKey, EncodingKey};
use ring::rand::SystemRandom;
use ring::signature::{Ed25519KeyPair, KeyPair as _};
use thiserror::Error;

/// Errors that can occur when loading or generating key material
#[derive(Debug, Error)]
pub enum KeyError {
    #[error("invalid key material: {0}")]
    InvalidKey(#[from] jsonwebtoken::errors::Error),

    #[error("key generation failed")]
    Generation,
}

/// Which of the two disjoint key pairs a token must be signed with.
/// A token signed with one is never acceptable where the other is
/// expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    Access,
    Refresh,
}

/// A single Ed25519 signing/verifying pair
pub struct KeyPair {
    pub(crate) encoding: EncodingKey,
    pub(crate) decoding: DecodingKey,
}

impl KeyPair {
    /// Load a pair from PEM-encoded private and public keys
    pub fn from_ed_pem(private_pem: &[u8], public_pem: &[u8]) -> Result<Self, KeyError> {
        Ok(Self {
            encoding: EncodingKey::from_ed_pem(private_pem)?,
            decoding: DecodingKey::from_ed_pem(public_pem)?,
        })
    }

    /// Generate a fresh pair. Meant for tests and local development;
    /// production loads PEM files so tokens survive restarts.
    pub fn generate() -> Result<Self, KeyError> {
        let rng = SystemRandom::new();
        let doc = Ed25519KeyPair::generate_pkcs8(&rng).map_err(|_| KeyError::Generation)?;
        let pair = Ed25519KeyPair::from_pkcs8(doc.as_ref()).map_err(|_| KeyError::Generation)?;
        Ok(Self {
            encoding: EncodingKey::from_ed_der(doc.as_ref()),
            decoding: DecodingKey::from_ed_der(pair.public_key().as_ref()),
        })
    }
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair").finish_non_exhaustive()
    }
}

/// The two process-wide key pairs
pub struct SigningKeys {
    pub(crate) access: KeyPair,
    pub(crate) refresh: KeyPair,
}

impl SigningKeys {
    /// Bundle an access pair and a refresh pair
    pub fn new(access: KeyPair, refresh: KeyPair) -> Self {
        Self { access, refresh }
    }

    /// Load both pairs from PEM-encoded key material
    pub fn from_ed_pem(
        access_private: &[u8],
        access_public: &[u8],
        refresh_private: &[u8],
        refresh_public: &[u8],
    ) -> Result<Self, KeyError> {
        Ok(Self {
            access: KeyPair::from_ed_pem(access_private, access_public)?,
            refresh: KeyPair::from_ed_pem(refresh_private, refresh_public)?,
        })
    }

    /// Generate two fresh pairs (tests and local development)
    pub fn generate() -> Result<Self, KeyError> {
        Ok(Self {
            access: KeyPair::generate()?,
            refresh: KeyPair::generate()?,
        })
    }

    pub(crate) fn for_kind(&self, kind: KeyKind) -> &KeyPair {
        match kind {
            KeyKind::Access => &self.access,
            KeyKind::Refresh => &self.refresh,
        }
    }
}

impl std::fmt::Debug for SigningKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKeys").finish_non_exhaustive()
    }
}
