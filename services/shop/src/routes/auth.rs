//! Authentication routes: local register/login, token refresh/logout,
//! and social login

use axum::{
    Extension, Json,
    extract::{ConnectInfo, State},
    response::Response,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::net::SocketAddr;
use tracing::info;

use crate::AppState;
use crate::error::{ApiError, ApiResult, ErrorCode};
use crate::models::{PublicUser, User};
use crate::response::{created, ok};
use crate::validation::{require_non_empty, validate_login, validate_register};

/// Registration request body
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub nickname: String,
}

/// Login request body
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Refresh/logout request body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

/// Kakao login request body
#[derive(Debug, Deserialize)]
pub struct KakaoLoginRequest {
    pub code: String,
}

/// Firebase login request body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirebaseLoginRequest {
    pub id_token: String,
}

/// Login response: the user plus a fresh token pair
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user: PublicUser,
    pub access_token: String,
    pub refresh_token: String,
}

async fn issue_login_response(state: &AppState, user: &User) -> ApiResult<LoginResponse> {
    let pair = state.token_service.issue_pair(user).await?;
    Ok(LoginResponse {
        user: PublicUser::from(user),
        access_token: pair.access_token,
        refresh_token: pair.refresh_token,
    })
}

async fn check_rate_limit(state: &AppState, route: &str, addr: &SocketAddr) -> ApiResult<()> {
    let key = format!("{}:{}", route, addr.ip());
    if !state.rate_limiter.is_allowed(&key).await {
        return Err(ErrorCode::RateLimitExceeded.into());
    }
    Ok(())
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult<Response> {
    check_rate_limit(&state, "register", &addr).await?;
    validate_register(&payload.email, &payload.password, &payload.nickname)?;

    if state
        .user_repository
        .find_by_email(&payload.email)
        .await?
        .is_some()
    {
        return Err(ErrorCode::AuthEmailExists.into());
    }

    let user = state
        .user_repository
        .create_local(&payload.email, &payload.password, payload.nickname.trim())
        .await?;

    info!("Registered user {}", user.id);

    Ok(created(PublicUser::from(&user)))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Response> {
    check_rate_limit(&state, "login", &addr).await?;
    validate_login(&payload.email, &payload.password)?;

    let user = state
        .user_repository
        .find_by_email(&payload.email)
        .await?
        .ok_or(ErrorCode::AuthInvalidCredentials)?;

    if !state
        .user_repository
        .verify_password(&user, &payload.password)?
    {
        return Err(ErrorCode::AuthInvalidCredentials.into());
    }

    info!("Login for user {}", user.id);

    Ok(ok(issue_login_response(&state, &user).await?))
}

/// POST /api/auth/refresh
///
/// A refresh token is single-use: a successful rotation invalidates it
/// before the new pair is issued.
pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshTokenRequest>,
) -> ApiResult<Response> {
    require_non_empty(&payload.refresh_token, ErrorCode::RefreshTokenRequired)?;

    let user_id = state
        .token_service
        .verify_refresh(&payload.refresh_token)
        .await?
        .ok_or(ErrorCode::AuthRefreshInvalid)?;

    let user = state
        .user_repository
        .find_by_id(user_id)
        .await?
        .ok_or(ErrorCode::AuthRefreshInvalid)?;

    let pair = state
        .token_service
        .rotate(&user, &payload.refresh_token)
        .await?;

    Ok(ok(pair))
}

/// POST /api/auth/logout (bearer access token required)
pub async fn logout(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(payload): Json<RefreshTokenRequest>,
) -> ApiResult<Response> {
    require_non_empty(&payload.refresh_token, ErrorCode::RefreshTokenRequired)?;

    state
        .token_service
        .revoke(user.id, &payload.refresh_token)
        .await?;

    Ok(ok(json!({ "loggedOut": true })))
}

/// GET /api/auth/me (bearer access token required)
pub async fn me(Extension(user): Extension<User>) -> ApiResult<Response> {
    Ok(ok(json!({
        "id": user.id,
        "email": user.email,
        "nickname": user.nickname,
        "role": user.role,
        "createdAt": user.created_at,
    })))
}

/// POST /api/auth/kakao
pub async fn kakao_login(
    State(state): State<AppState>,
    Json(payload): Json<KakaoLoginRequest>,
) -> ApiResult<Response> {
    require_non_empty(&payload.code, ErrorCode::KakaoCodeRequired)?;

    let kakao = state.kakao_client.as_ref().ok_or_else(|| {
        ApiError::with_details(
            ErrorCode::SocialLoginFailed,
            json!({ "message": "Kakao login is not configured" }),
        )
    })?;

    let profile = kakao.fetch_profile(&payload.code).await?;
    let user = state.user_repository.find_or_create_social(&profile).await?;

    Ok(ok(issue_login_response(&state, &user).await?))
}

/// POST /api/auth/firebase
pub async fn firebase_login(
    State(state): State<AppState>,
    Json(payload): Json<FirebaseLoginRequest>,
) -> ApiResult<Response> {
    require_non_empty(&payload.id_token, ErrorCode::FirebaseIdTokenRequired)?;

    let firebase = state.firebase_client.as_ref().ok_or_else(|| {
        ApiError::with_details(
            ErrorCode::SocialLoginFailed,
            json!({ "message": "Firebase login is not configured" }),
        )
    })?;

    let profile = firebase.fetch_profile(&payload.id_token).await?;
    let user = state.user_repository.find_or_create_social(&profile).await?;

    Ok(ok(issue_login_response(&state, &user).await?))
}
