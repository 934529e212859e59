//! Mock repositories for testing

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use trellis_db::{
    CreateUser, DbError, DbResult, SessionRepository, SessionRow, UserRepository, UserRow,
    UserUpdate, VerificationTokenRepository, VerificationTokenRow,
};
use trellis_types::{LoginTypes, TokenPurpose, UserStatus};
use uuid::Uuid;

/// In-memory user repository for testing
#[derive(Default, Clone)]
pub struct MockUserRepository {
    users: Arc<DashMap<Uuid, UserRow>>,
    by_email: Arc<DashMap<String, Uuid>>,
    oauth_providers: Arc<DashMap<Uuid, Vec<String>>>,
}

impl MockUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Link an OAuth provider to a user, as account linking would
    #[allow(dead_code)]
    pub fn link_oauth(&self, user_id: Uuid, provider: &str) {
        self.oauth_providers
            .entry(user_id)
            .or_default()
            .push(provider.to_string());
    }
}

#[async_trait]
impl UserRepository for MockUserRepository {
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<UserRow>> {
        Ok(self.users.get(&id).map(|r| r.value().clone()))
    }

    async fn find_by_email(&self, email: &str) -> DbResult<Option<UserRow>> {
        Ok(self
            .by_email
            .get(email)
            .and_then(|id| self.users.get(id.value()).map(|r| r.value().clone())))
    }

    async fn create(&self, user: CreateUser) -> DbResult<UserRow> {
        if self.by_email.contains_key(&user.email) {
            return Err(DbError::Duplicate);
        }
        let row = UserRow {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email.clone(),
            password_hash: user.password_hash,
            status: UserStatus::Unverified.as_str().to_string(),
            role: user.role.as_str().to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.by_email.insert(user.email, user.id);
        self.users.insert(user.id, row.clone());
        Ok(row)
    }

    async fn set_status(&self, id: Uuid, status: UserStatus) -> DbResult<u64> {
        match self.users.get_mut(&id) {
            Some(mut user) => {
                user.status = status.as_str().to_string();
                user.updated_at = Utc::now();
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn update(&self, id: Uuid, update: UserUpdate) -> DbResult<Option<UserRow>> {
        let Some(mut user) = self.users.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(first_name) = update.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = update.last_name {
            user.last_name = last_name;
        }
        if let Some(email) = update.email {
            self.by_email.remove(&user.email);
            self.by_email.insert(email.clone(), id);
            user.email = email;
        }
        if let Some(password_hash) = update.password_hash {
            user.password_hash = password_hash;
        }
        user.updated_at = Utc::now();
        Ok(Some(user.value().clone()))
    }

    async fn login_types(&self, email: &str) -> DbResult<LoginTypes> {
        let Some(id) = self.by_email.get(email).map(|r| *r.value()) else {
            return Ok(LoginTypes::default());
        };
        let password = self
            .users
            .get(&id)
            .is_some_and(|u| !u.password_hash.is_empty());
        let providers = self.oauth_providers.get(&id);
        let has = |name: &str| {
            providers
                .as_ref()
                .is_some_and(|p| p.iter().any(|v| v == name))
        };
        Ok(LoginTypes {
            password,
            google: has("google"),
            linked_in: has("linked_in"),
        })
    }
}

/// In-memory session repository for testing
#[derive(Default, Clone)]
pub struct MockSessionRepository {
    sessions: Arc<DashMap<Uuid, SessionRow>>,
}

impl MockSessionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live sessions
    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }
}

#[async_trait]
impl SessionRepository for MockSessionRepository {
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<SessionRow>> {
        Ok(self.sessions.get(&id).map(|r| r.value().clone()))
    }

    async fn create(&self, user_id: Uuid) -> DbResult<SessionRow> {
        let row = SessionRow {
            id: Uuid::new_v4(),
            user_id,
            refresh_token_hash: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.sessions.insert(row.id, row.clone());
        Ok(row)
    }

    async fn rotate(
        &self,
        id: Uuid,
        user_id: Uuid,
        expected_hash: &str,
        new_hash: &str,
    ) -> DbResult<Option<SessionRow>> {
        // the per-entry lock makes this a compare-and-swap, matching the
        // single-statement UPDATE of the real store
        let Some(mut session) = self.sessions.get_mut(&id) else {
            return Ok(None);
        };
        if session.user_id != user_id || session.refresh_token_hash != expected_hash {
            return Ok(None);
        }
        session.refresh_token_hash = new_hash.to_string();
        session.updated_at = Utc::now();
        Ok(Some(session.value().clone()))
    }

    async fn delete_by_id(&self, id: Uuid) -> DbResult<u64> {
        Ok(self.sessions.remove(&id).map_or(0, |_| 1))
    }

    async fn delete_all_for_user(&self, user_id: Uuid) -> DbResult<u64> {
        let ids: Vec<Uuid> = self
            .sessions
            .iter()
            .filter(|r| r.user_id == user_id)
            .map(|r| r.id)
            .collect();
        let mut count = 0;
        for id in ids {
            if self.sessions.remove(&id).is_some() {
                count += 1;
            }
        }
        Ok(count)
    }
}

/// Session repository whose next rotation can be forced to lose, as if a
/// concurrent request had already swapped the stored hash
#[derive(Default, Clone)]
pub struct ContestedSessionRepository {
    inner: MockSessionRepository,
    lose_next_rotate: Arc<AtomicBool>,
}

impl ContestedSessionRepository {
    #[allow(dead_code)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next rotate observe a changed hash and return `None`
    #[allow(dead_code)]
    pub fn lose_next_rotate(&self) {
        self.lose_next_rotate.store(true, Ordering::SeqCst);
    }

    /// Number of live sessions
    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.inner.len()
    }
}

#[async_trait]
impl SessionRepository for ContestedSessionRepository {
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<SessionRow>> {
        self.inner.find_by_id(id).await
    }

    async fn create(&self, user_id: Uuid) -> DbResult<SessionRow> {
        self.inner.create(user_id).await
    }

    async fn rotate(
        &self,
        id: Uuid,
        user_id: Uuid,
        expected_hash: &str,
        new_hash: &str,
    ) -> DbResult<Option<SessionRow>> {
        if self.lose_next_rotate.swap(false, Ordering::SeqCst) {
            return Ok(None);
        }
        self.inner.rotate(id, user_id, expected_hash, new_hash).await
    }

    async fn delete_by_id(&self, id: Uuid) -> DbResult<u64> {
        self.inner.delete_by_id(id).await
    }

    async fn delete_all_for_user(&self, user_id: Uuid) -> DbResult<u64> {
        self.inner.delete_all_for_user(user_id).await
    }
}

/// In-memory verification token repository for testing
#[derive(Default, Clone)]
pub struct MockVerificationTokenRepository {
    tokens: Arc<DashMap<(Uuid, TokenPurpose), VerificationTokenRow>>,
}

impl MockVerificationTokenRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backdate a stored token, as if it had been issued in the past
    #[allow(dead_code)]
    pub fn backdate(&self, user_id: Uuid, purpose: TokenPurpose, age: chrono::Duration) {
        if let Some(mut row) = self.tokens.get_mut(&(user_id, purpose)) {
            row.created_at = Utc::now() - age;
        }
    }
}

#[async_trait]
impl VerificationTokenRepository for MockVerificationTokenRepository {
    async fn put(&self, user_id: Uuid, purpose: TokenPurpose, token: &str) -> DbResult<()> {
        self.tokens.insert(
            (user_id, purpose),
            VerificationTokenRow {
                user_id,
                purpose: purpose.as_str().to_string(),
                token: token.to_string(),
                created_at: Utc::now(),
            },
        );
        Ok(())
    }

    async fn find(
        &self,
        user_id: Uuid,
        purpose: TokenPurpose,
    ) -> DbResult<Option<VerificationTokenRow>> {
        Ok(self
            .tokens
            .get(&(user_id, purpose))
            .map(|r| r.value().clone()))
    }

    async fn delete(&self, user_id: Uuid, purpose: TokenPurpose) -> DbResult<u64> {
        Ok(self.tokens.remove(&(user_id, purpose)).map_or(0, |_| 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_types::UserRole;

    #[tokio::test]
    async fn test_mock_user_repo_crud() {
        let repo = MockUserRepository::new();

        let user = repo
            .create(CreateUser {
                id: Uuid::new_v4(),
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
                email: "ada@example.com".to_string(),
                password_hash: "hash".to_string(),
                role: UserRole::Member,
            })
            .await
            .unwrap();
        assert_eq!(user.status, "unverified");

        let found = repo.find_by_email("ada@example.com").await.unwrap();
        assert_eq!(found.unwrap().id, user.id);

        // duplicate email rejected
        let dup = repo
            .create(CreateUser {
                id: Uuid::new_v4(),
                first_name: "Other".to_string(),
                last_name: "Person".to_string(),
                email: "ada@example.com".to_string(),
                password_hash: "hash2".to_string(),
                role: UserRole::Member,
            })
            .await;
        assert!(matches!(dup, Err(DbError::Duplicate)));

        // status flip
        let affected = repo.set_status(user.id, UserStatus::Verified).await.unwrap();
        assert_eq!(affected, 1);
        assert!(repo.find_by_id(user.id).await.unwrap().unwrap().is_verified());

        // partial update only touches present fields
        let updated = repo
            .update(
                user.id,
                UserUpdate {
                    password_hash: Some("newhash".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.password_hash, "newhash");
        assert_eq!(updated.first_name, "Ada");
    }

    #[tokio::test]
    async fn test_mock_session_rotation_is_cas() {
        let repo = MockSessionRepository::new();
        let user_id = Uuid::new_v4();
        let session = repo.create(user_id).await.unwrap();
        assert_eq!(session.refresh_token_hash, "");

        // first rotation from the placeholder applies
        let rotated = repo
            .rotate(session.id, user_id, "", "hash-a")
            .await
            .unwrap();
        assert!(rotated.is_some());

        // a second rotation expecting the stale hash loses the race
        let lost = repo
            .rotate(session.id, user_id, "", "hash-b")
            .await
            .unwrap();
        assert!(lost.is_none());

        // wrong user never matches even with the right hash
        let wrong_user = repo
            .rotate(session.id, Uuid::new_v4(), "hash-a", "hash-c")
            .await
            .unwrap();
        assert!(wrong_user.is_none());

        let row = repo.find_by_id(session.id).await.unwrap().unwrap();
        assert_eq!(row.refresh_token_hash, "hash-a");
    }

    #[tokio::test]
    async fn test_contested_session_repo_loses_once() {
        let repo = ContestedSessionRepository::new();
        let session = repo.create(Uuid::new_v4()).await.unwrap();

        repo.lose_next_rotate();
        let lost = repo
            .rotate(session.id, session.user_id, "", "hash-a")
            .await
            .unwrap();
        assert!(lost.is_none());

        // only the next rotation is contested
        let ok = repo
            .rotate(session.id, session.user_id, "", "hash-a")
            .await
            .unwrap();
        assert!(ok.is_some());
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn test_mock_verification_tokens_replace() {
        let repo = MockVerificationTokenRepository::new();
        let user_id = Uuid::new_v4();

        repo.put(user_id, TokenPurpose::Registration, "first")
            .await
            .unwrap();
        repo.put(user_id, TokenPurpose::Registration, "second")
            .await
            .unwrap();

        let row = repo
            .find(user_id, TokenPurpose::Registration)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(row.token, "second");

        // purposes are independent
        repo.put(user_id, TokenPurpose::PasswordReset, "reset")
            .await
            .unwrap();
        assert_eq!(
            repo.delete(user_id, TokenPurpose::Registration)
                .await
                .unwrap(),
            1
        );
        assert!(repo
            .find(user_id, TokenPurpose::PasswordReset)
            .await
            .unwrap()
            .is_some());
    }
}
