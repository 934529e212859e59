//! Trellis DB - Database abstractions
//!
//! SQLx-based storage layer for Trellis services. The auth core only ever
//! talks to the repository traits in [`repo`]; the PostgreSQL
//! implementations live in [`pg`].
//!
//! # Example
//!
//! ```rust,ignore
//! use trellis_db::{create_pool, Repositories, MIGRATOR};
//!
//! let pool = create_pool("postgres://localhost/trellis").await?;
//! MIGRATOR.run(&pool).await?;
//! let repos = Repositories::new(pool);
//!
//! let user = repos.users.find_by_email("user@example.com").await?;
//! ```

pub mod error;
pub mod models;
pub mod pg;
pub mod pool;
pub mod repo;

pub use error::{DbError, DbResult};
pub use models::*;
pub use pg::Repositories;
pub use pool::{create_pool, DbPool};
pub use repo::*;

/// Embedded migrations for the Trellis schema
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
