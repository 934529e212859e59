//! PostgreSQL session store implementation

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::DbResult;
use crate::models::SessionRow;
use crate::repo::SessionRepository;

const SESSION_COLUMNS: &str = "id, user_id, refresh_token_hash, created_at, updated_at";

/// PostgreSQL session repository
#[derive(Clone)]
pub struct PgSessionRepository {
    pool: PgPool,
}

impl PgSessionRepository {
    /// Create a new session repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionRepository for PgSessionRepository {
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<SessionRow>> {
        let session = sqlx::query_as::<_, SessionRow>(&format!(
            "SELECT {SESSION_COLUMNS} FROM sessions WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(session)
    }

    async fn create(&self, user_id: Uuid) -> DbResult<SessionRow> {
        let row = sqlx::query_as::<_, SessionRow>(&format!(
            r#"
            INSERT INTO sessions (id, user_id, refresh_token_hash)
            VALUES (gen_random_uuid(), $1, '')
            RETURNING {SESSION_COLUMNS}
            "#
        ))
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn rotate(
        &self,
        id: Uuid,
        user_id: Uuid,
        expected_hash: &str,
        new_hash: &str,
    ) -> DbResult<Option<SessionRow>> {
        // Single compare-and-swap statement: a concurrent rotation that
        // already replaced the hash makes this match nothing, and the
        // caller observes the lost race as `None`.
        let row = sqlx::query_as::<_, SessionRow>(&format!(
            r#"
            UPDATE sessions
            SET refresh_token_hash = $4, updated_at = NOW()
            WHERE id = $1 AND user_id = $2 AND refresh_token_hash = $3
            RETURNING {SESSION_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(user_id)
        .bind(expected_hash)
        .bind(new_hash)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn delete_by_id(&self, id: Uuid) -> DbResult<u64> {
        let result = sqlx::query("DELETE FROM sessions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn delete_all_for_user(&self, user_id: Uuid) -> DbResult<u64> {
        let result = sqlx::query("DELETE FROM sessions WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
