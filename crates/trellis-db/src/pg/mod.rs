//! PostgreSQL repository implementations

mod session;
mod user;
mod verification_token;

pub use session::PgSessionRepository;
pub use user::PgUserRepository;
pub use verification_token::PgVerificationTokenRepository;

use crate::DbPool;

/// All repositories bundled together
#[derive(Clone)]
pub struct Repositories {
    pub users: PgUserRepository,
    pub sessions: PgSessionRepository,
    pub verification_tokens: PgVerificationTokenRepository,
}

impl Repositories {
    /// Create all repositories from a database pool
    pub fn new(pool: DbPool) -> Self {
        Self {
            users: PgUserRepository::new(pool.clone()),
            sessions: PgSessionRepository::new(pool.clone()),
            verification_tokens: PgVerificationTokenRepository::new(pool),
        }
    }
}
