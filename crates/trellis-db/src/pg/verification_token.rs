//! PostgreSQL verification token store implementation

use async_trait::async_trait;
use sqlx::PgPool;
use trellis_types::TokenPurpose;
use uuid::Uuid;

use crate::error::DbResult;
use crate::models::VerificationTokenRow;
use crate::repo::VerificationTokenRepository;

/// PostgreSQL verification token repository
#[derive(Clone)]
pub struct PgVerificationTokenRepository {
    pool: PgPool,
}

impl PgVerificationTokenRepository {
    /// Create a new verification token repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VerificationTokenRepository for PgVerificationTokenRepository {
    async fn put(&self, user_id: Uuid, purpose: TokenPurpose, token: &str) -> DbResult<()> {
        // Upsert keyed on (user_id, purpose): issuing rotates the active
        // token in one atomic statement, so a racing resend and verify
        // can never leave two valid tokens behind.
        sqlx::query(
            r#"
            INSERT INTO verification_tokens (user_id, purpose, token)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, purpose)
            DO UPDATE SET token = EXCLUDED.token, created_at = NOW()
            "#,
        )
        .bind(user_id)
        .bind(purpose.as_str())
        .bind(token)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find(
        &self,
        user_id: Uuid,
        purpose: TokenPurpose,
    ) -> DbResult<Option<VerificationTokenRow>> {
        let row = sqlx::query_as::<_, VerificationTokenRow>(
            r#"
            SELECT user_id, purpose, token, created_at
            FROM verification_tokens
            WHERE user_id = $1 AND purpose = $2
            "#,
        )
        .bind(user_id)
        .bind(purpose.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn delete(&self, user_id: Uuid, purpose: TokenPurpose) -> DbResult<u64> {
        let result =
            sqlx::query("DELETE FROM verification_tokens WHERE user_id = $1 AND purpose = $2")
                .bind(user_id)
                .bind(purpose.as_str())
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected())
    }
}
