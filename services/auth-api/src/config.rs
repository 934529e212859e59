//! Configuration for the Auth API service.

use std::time::Duration;
use trellis_auth_core::{AuthConfig, SigningKeys};

/// Auth API configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub http_port: u16,

    /// Database URL
    pub database_url: String,

    /// Auth core configuration
    pub auth: AuthConfig,

    /// Paths to the four PEM files (access/refresh, private/public)
    key_paths: KeyPaths,
}

#[derive(Debug, Clone)]
struct KeyPaths {
    access_private: String,
    access_public: String,
    refresh_private: String,
    refresh_public: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url =
            std::env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;

        let http_port = std::env::var("HTTP_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("HTTP_PORT"))?;

        let key_paths = KeyPaths {
            access_private: std::env::var("ACCESS_PRIVATE_KEY_PATH")
                .map_err(|_| ConfigError::Missing("ACCESS_PRIVATE_KEY_PATH"))?,
            access_public: std::env::var("ACCESS_PUBLIC_KEY_PATH")
                .map_err(|_| ConfigError::Missing("ACCESS_PUBLIC_KEY_PATH"))?,
            refresh_private: std::env::var("REFRESH_PRIVATE_KEY_PATH")
                .map_err(|_| ConfigError::Missing("REFRESH_PRIVATE_KEY_PATH"))?,
            refresh_public: std::env::var("REFRESH_PUBLIC_KEY_PATH")
                .map_err(|_| ConfigError::Missing("REFRESH_PUBLIC_KEY_PATH"))?,
        };

        // Token lifetimes (defaults: 15 minute access, 7 day refresh)
        let access_ttl_mins: u64 = std::env::var("ACCESS_TOKEN_TTL_MINS")
            .unwrap_or_else(|_| "15".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("ACCESS_TOKEN_TTL_MINS"))?;

        let refresh_ttl_days: u64 = std::env::var("REFRESH_TOKEN_TTL_DAYS")
            .unwrap_or_else(|_| "7".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("REFRESH_TOKEN_TTL_DAYS"))?;

        let reset_max_age_hours: u64 = std::env::var("RESET_TOKEN_MAX_AGE_HOURS")
            .unwrap_or_else(|_| "24".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("RESET_TOKEN_MAX_AGE_HOURS"))?;

        let auth = AuthConfig::default()
            .with_access_token_ttl(Duration::from_secs(access_ttl_mins * 60))
            .with_refresh_token_ttl(Duration::from_secs(refresh_ttl_days * 24 * 3600))
            .with_reset_token_max_age(Duration::from_secs(reset_max_age_hours * 3600));

        Ok(Self {
            http_port,
            database_url,
            auth,
            key_paths,
        })
    }

    /// Read and parse the configured PEM files
    pub fn load_signing_keys(&self) -> Result<SigningKeys, ConfigError> {
        let read = |path: &str| {
            std::fs::read(path).map_err(|e| ConfigError::KeyFile(format!("{path}: {e}")))
        };

        SigningKeys::from_ed_pem(
            &read(&self.key_paths.access_private)?,
            &read(&self.key_paths.access_public)?,
            &read(&self.key_paths.refresh_private)?,
            &read(&self.key_paths.refresh_public)?,
        )
        .map_err(|e| ConfigError::KeyFile(e.to_string()))
    }
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),

    #[error("Key material error: {0}")]
    KeyFile(String),
}
