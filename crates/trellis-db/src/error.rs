//! Database errors

use thiserror::Error;

/// Database errors
#[derive(Error, Debug)]
pub enum DbError {
    /// SQLx error
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// Record not found
    #[error("record not found")]
    NotFound,

    /// A unique constraint was violated (e.g. duplicate email)
    #[error("duplicate record")]
    Duplicate,
}

/// Result alias for repository operations
pub type DbResult<T> = Result<T, DbError>;

/// Classify an insert failure, surfacing unique-constraint violations
/// (PostgreSQL SQLSTATE 23505) as [`DbError::Duplicate`].
pub(crate) fn classify_insert(err: sqlx::Error) -> DbError {
    if let sqlx::Error::Database(ref db) = err {
        if db.code().as_deref() == Some("23505") {
            return DbError::Duplicate;
        }
    }
    DbError::Sqlx(err)
}
