//! HTTP handlers

mod auth;
mod health;

pub use auth::{
    change_password, forgot_password, login, login_types, logout, refresh, register,
    resend_registration_email, reset_password, verify_registration,
};
pub use health::{health, ready};
