//! Shared test harness: mock repositories, a capturing mailer, and a
//! fully wired auth service over in-memory stores.

pub mod mock_repos;

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use trellis_auth_core::{AuthConfig, AuthService, Mailer, MailerError, SigningKeys};
use trellis_types::UserId;
use uuid::Uuid;

use mock_repos::{MockSessionRepository, MockUserRepository, MockVerificationTokenRepository};

pub type TestService =
    AuthService<MockUserRepository, MockSessionRepository, MockVerificationTokenRepository>;

/// Mailer that records the last token sent per user instead of sending
#[derive(Default)]
pub struct CaptureMailer {
    registration: DashMap<Uuid, String>,
    reset: DashMap<Uuid, String>,
}

impl CaptureMailer {
    #[allow(dead_code)]
    pub fn registration_token(&self, user_id: UserId) -> Option<String> {
        self.registration.get(&user_id.0).map(|r| r.value().clone())
    }

    #[allow(dead_code)]
    pub fn reset_token(&self, user_id: UserId) -> Option<String> {
        self.reset.get(&user_id.0).map(|r| r.value().clone())
    }
}

#[async_trait]
impl Mailer for CaptureMailer {
    async fn send_registration(
        &self,
        _email: &str,
        user_id: UserId,
        token: &str,
    ) -> Result<(), MailerError> {
        self.registration.insert(user_id.0, token.to_string());
        Ok(())
    }

    async fn send_password_reset(
        &self,
        _email: &str,
        user_id: UserId,
        token: &str,
    ) -> Result<(), MailerError> {
        self.reset.insert(user_id.0, token.to_string());
        Ok(())
    }
}

/// Auth service wired to in-memory stores, with handles kept for
/// inspecting state the public API hides
pub struct TestAuth {
    pub service: TestService,
    pub users: Arc<MockUserRepository>,
    pub sessions: Arc<MockSessionRepository>,
    pub tokens: Arc<MockVerificationTokenRepository>,
    pub mailer: Arc<CaptureMailer>,
}

impl TestAuth {
    #[allow(dead_code)]
    pub fn new() -> Self {
        Self::with_config(AuthConfig::default())
    }

    pub fn with_config(config: AuthConfig) -> Self {
        let users = Arc::new(MockUserRepository::new());
        let sessions = Arc::new(MockSessionRepository::new());
        let tokens = Arc::new(MockVerificationTokenRepository::new());
        let mailer = Arc::new(CaptureMailer::default());

        let service = AuthService::new(
            config,
            SigningKeys::generate().expect("key generation"),
            Arc::clone(&users),
            Arc::clone(&sessions),
            Arc::clone(&tokens),
            Arc::clone(&mailer) as Arc<dyn Mailer>,
        );

        Self {
            service,
            users,
            sessions,
            tokens,
            mailer,
        }
    }
}
