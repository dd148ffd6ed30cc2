//! Request guards: bearer-token authentication and admin role checks

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};

use crate::AppState;
use crate::error::{ApiError, ErrorCode};
use crate::jwt::TokenVerification;
use crate::models::{Role, User};

/// Validate the bearer access token and attach the authenticated user to
/// the request
///
/// The token is stateless: signature plus expiry decide validity. The user
/// row is still loaded so downstream handlers see current role/nickname.
pub async fn auth_guard(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .ok_or(ErrorCode::AuthNoToken)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(ErrorCode::AuthNoToken)?;

    let claims = match state.token_service.jwt().verify_access_token(token) {
        TokenVerification::Valid(claims) => claims,
        TokenVerification::Expired => return Err(ErrorCode::AuthTokenExpired.into()),
        TokenVerification::Invalid => return Err(ErrorCode::AuthTokenInvalid.into()),
    };

    let user = state
        .user_repository
        .find_by_id(claims.sub)
        .await?
        .ok_or(ErrorCode::UserNotFound)?;

    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}

/// Require the authenticated user to be an admin; runs after `auth_guard`
pub async fn require_admin(req: Request<Body>, next: Next) -> Result<Response, ApiError> {
    let user = req
        .extensions()
        .get::<User>()
        .ok_or(ErrorCode::AuthForbidden)?;

    if user.role != Role::Admin {
        return Err(ErrorCode::AuthForbidden.into());
    }

    Ok(next.run(req).await)
}
