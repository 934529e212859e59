//! Connection pool setup

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;

/// Database connection pool used across the Trellis services
pub type DbPool = PgPool;

/// Connect a pool against the given PostgreSQL URL.
///
/// Sizing is deliberately modest; the auth workload is latency bound,
/// not throughput bound.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await
}
