//! Authentication handlers (register, verify, login, refresh, logout,
//! password change and reset)

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use trellis_auth_core::NewUser;
use trellis_types::{LoginTypes, TokenPair, User};

use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    pub email: String,
    pub uid: String,
}

#[derive(Debug, Deserialize)]
pub struct ResendRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: User,
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Deserialize)]
pub struct LogoutRequest {
    pub refresh_token: String,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub email: String,
    pub uid: String,
    pub new_password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginTypesQuery {
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    fn ok() -> Json<Self> {
        Json(Self { success: true })
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/v1/auth/register
///
/// Create an account; it stays unverified until the emailed token is
/// consumed.
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<User>)> {
    let user = state
        .auth
        .register(NewUser {
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// POST /api/v1/auth/verify
pub async fn verify_registration(
    State(state): State<AppState>,
    Json(req): Json<VerifyRequest>,
) -> ApiResult<Json<SuccessResponse>> {
    state.auth.verify_registration(&req.email, &req.uid).await?;
    Ok(SuccessResponse::ok())
}

/// POST /api/v1/auth/resend
pub async fn resend_registration_email(
    State(state): State<AppState>,
    Json(req): Json<ResendRequest>,
) -> ApiResult<Json<SuccessResponse>> {
    state.auth.resend_registration_email(&req.email).await?;
    Ok(SuccessResponse::ok())
}

/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let (user, tokens) = state.auth.login(&req.email, &req.password).await?;

    Ok(Json(LoginResponse {
        user,
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
    }))
}

/// POST /api/v1/auth/refresh
///
/// Exchange a refresh token for a fresh pair; the presented token is
/// retired in the process.
pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> ApiResult<Json<TokenPair>> {
    let tokens = state.auth.refresh_token(&req.refresh_token).await?;
    Ok(Json(tokens))
}

/// POST /api/v1/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    Json(req): Json<LogoutRequest>,
) -> ApiResult<Json<SuccessResponse>> {
    state.auth.logout(&req.refresh_token).await?;
    Ok(SuccessResponse::ok())
}

/// POST /api/v1/auth/change-password
///
/// Requires a valid access token; the current password is re-checked
/// regardless.
pub async fn change_password(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(req): Json<ChangePasswordRequest>,
) -> ApiResult<Json<SuccessResponse>> {
    state
        .auth
        .change_password(auth_user.user_id, &req.current_password, &req.new_password)
        .await?;
    Ok(SuccessResponse::ok())
}

/// POST /api/v1/auth/forgot-password
///
/// Responds identically whether or not the email exists.
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(req): Json<ForgotPasswordRequest>,
) -> ApiResult<Json<SuccessResponse>> {
    state.auth.send_reset_password_email(&req.email).await?;
    Ok(SuccessResponse::ok())
}

/// POST /api/v1/auth/reset-password
pub async fn reset_password(
    State(state): State<AppState>,
    Json(req): Json<ResetPasswordRequest>,
) -> ApiResult<Json<SuccessResponse>> {
    state
        .auth
        .reset_password(&req.email, &req.uid, &req.new_password)
        .await?;
    Ok(SuccessResponse::ok())
}

/// GET /api/v1/auth/login-types?email=...
pub async fn login_types(
    State(state): State<AppState>,
    Query(query): Query<LoginTypesQuery>,
) -> ApiResult<Json<LoginTypes>> {
    let types = state.auth.login_types(&query.email).await?;
    Ok(Json(types))
}
