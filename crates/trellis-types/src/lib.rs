//! Trellis Types - Shared domain types
//!
//! This crate contains domain types used across Trellis services:
//! - User identity, account status, and roles
//! - Session identifiers
//! - Auth wire types (token pairs, login-type lookups)

pub mod auth;
pub mod session;
pub mod user;

pub use auth::*;
pub use session::*;
pub use user::*;
