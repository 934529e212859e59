//! PostgreSQL user directory implementation

use async_trait::async_trait;
use sqlx::PgPool;
use trellis_types::{LoginTypes, UserStatus};
use uuid::Uuid;

use crate::error::{classify_insert, DbResult};
use crate::models::UserRow;
use crate::repo::{CreateUser, UserRepository, UserUpdate};

const USER_COLUMNS: &str =
    "id, first_name, last_name, email, password_hash, status, role, created_at, updated_at";

/// PostgreSQL user repository
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<UserRow>> {
        let user = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> DbResult<Option<UserRow>> {
        let user = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn create(&self, user: CreateUser) -> DbResult<UserRow> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            INSERT INTO users (id, first_name, last_name, email, password_hash, role)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(user.id)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(classify_insert)?;

        Ok(row)
    }

    async fn set_status(&self, id: Uuid, status: UserStatus) -> DbResult<u64> {
        let result = sqlx::query("UPDATE users SET status = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(status.as_str())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn update(&self, id: Uuid, update: UserUpdate) -> DbResult<Option<UserRow>> {
        // COALESCE keeps the stored value for absent fields, so the whole
        // partial update stays one statement.
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            UPDATE users
            SET first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                email = COALESCE($4, email),
                password_hash = COALESCE($5, password_hash),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&update.first_name)
        .bind(&update.last_name)
        .bind(&update.email)
        .bind(&update.password_hash)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn login_types(&self, email: &str) -> DbResult<LoginTypes> {
        let row = sqlx::query_as::<_, (bool, bool, bool)>(
            r#"
            SELECT
                (u.password_hash <> '') AS password,
                EXISTS(
                    SELECT 1 FROM oauth_accounts o
                    WHERE o.user_id = u.id AND o.provider = 'google'
                ) AS google,
                EXISTS(
                    SELECT 1 FROM oauth_accounts o
                    WHERE o.user_id = u.id AND o.provider = 'linked_in'
                ) AS linked_in
            FROM users u
            WHERE u.email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row
            .map(|(password, google, linked_in)| LoginTypes {
                password,
                google,
                linked_in,
            })
            .unwrap_or_default())
    }
}
