//! Trellis Auth API
//!
//! REST service exposing registration, login, refresh rotation, and
//! password management on top of the auth core.

use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use trellis_auth_core::{AuthService, NoopMailer};
use trellis_db::pg::Repositories;

mod config;
mod error;
mod extractors;
mod handlers;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    tracing::info!("Starting Trellis Auth API");

    let config = Config::from_env()?;
    let keys = config.load_signing_keys()?;

    let pool = trellis_db::create_pool(&config.database_url).await?;
    trellis_db::MIGRATOR.run(&pool).await?;

    let repos = Repositories::new(pool.clone());
    let auth = AuthService::new(
        config.auth.clone(),
        keys,
        Arc::new(repos.users),
        Arc::new(repos.sessions),
        Arc::new(repos.verification_tokens),
        Arc::new(NoopMailer),
    );

    let state = AppState::new(auth, pool, config);
    let http_port = state.config.http_port;

    let auth_routes = Router::new()
        .route("/register", post(handlers::register))
        .route("/verify", post(handlers::verify_registration))
        .route("/resend", post(handlers::resend_registration_email))
        .route("/login", post(handlers::login))
        .route("/refresh", post(handlers::refresh))
        .route("/logout", post(handlers::logout))
        .route("/change-password", post(handlers::change_password))
        .route("/forgot-password", post(handlers::forgot_password))
        .route("/reset-password", post(handlers::reset_password))
        .route("/login-types", get(handlers::login_types));

    let app = Router::new()
        .route("/health", get(handlers::health))
        .route("/ready", get(handlers::ready))
        .nest("/api/v1/auth", auth_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], http_port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
