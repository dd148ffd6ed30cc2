//! Error taxonomy for the shop service
//!
//! Every failure a handler can produce is one of the closed set of
//! [`ErrorCode`] variants. Each variant carries its HTTP status and default
//! message, matched exhaustively, so the boundary cannot invent ad-hoc
//! status/code combinations. Unexpected storage failures are logged and
//! collapsed to a generic 500; low-level detail never reaches clients.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde_json::{Value, json};
use thiserror::Error;

/// Stable machine-readable error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // 400
    ValidationFailed,
    InvalidEmail,
    PasswordTooShort,
    PasswordRequired,
    NicknameLengthInvalid,
    RefreshTokenRequired,
    KakaoCodeRequired,
    FirebaseIdTokenRequired,
    ItemNameInvalid,
    ItemPriceMustBeNumber,
    ItemPriceMustBePositive,
    ItemDescriptionInvalid,
    ItemRarityInvalid,
    ItemStatInvalid,
    ItemStockInvalid,
    ItemCategoryInvalid,
    ItemIdInvalid,
    InvalidQueryParam,
    EmptyCart,
    // 401
    AuthNoToken,
    AuthInvalidCredentials,
    AuthTokenExpired,
    AuthTokenInvalid,
    AuthRefreshInvalid,
    // 403
    AuthForbidden,
    // 404
    UserNotFound,
    ItemNotFound,
    OrderNotFound,
    ResourceNotFound,
    // 409
    AuthEmailExists,
    // 422
    SocialLoginFailed,
    UnprocessableEntity,
    // 429
    RateLimitExceeded,
    // 500
    InternalServerError,
    DatabaseError,
}

impl ErrorCode {
    pub fn status(self) -> StatusCode {
        match self {
            ErrorCode::ValidationFailed
            | ErrorCode::InvalidEmail
            | ErrorCode::PasswordTooShort
            | ErrorCode::PasswordRequired
            | ErrorCode::NicknameLengthInvalid
            | ErrorCode::RefreshTokenRequired
            | ErrorCode::KakaoCodeRequired
            | ErrorCode::FirebaseIdTokenRequired
            | ErrorCode::ItemNameInvalid
            | ErrorCode::ItemPriceMustBeNumber
            | ErrorCode::ItemPriceMustBePositive
            | ErrorCode::ItemDescriptionInvalid
            | ErrorCode::ItemRarityInvalid
            | ErrorCode::ItemStatInvalid
            | ErrorCode::ItemStockInvalid
            | ErrorCode::ItemCategoryInvalid
            | ErrorCode::ItemIdInvalid
            | ErrorCode::InvalidQueryParam
            | ErrorCode::EmptyCart => StatusCode::BAD_REQUEST,
            ErrorCode::AuthNoToken
            | ErrorCode::AuthInvalidCredentials
            | ErrorCode::AuthTokenExpired
            | ErrorCode::AuthTokenInvalid
            | ErrorCode::AuthRefreshInvalid => StatusCode::UNAUTHORIZED,
            ErrorCode::AuthForbidden => StatusCode::FORBIDDEN,
            ErrorCode::UserNotFound
            | ErrorCode::ItemNotFound
            | ErrorCode::OrderNotFound
            | ErrorCode::ResourceNotFound => StatusCode::NOT_FOUND,
            ErrorCode::AuthEmailExists => StatusCode::CONFLICT,
            ErrorCode::SocialLoginFailed | ErrorCode::UnprocessableEntity => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ErrorCode::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
            ErrorCode::InternalServerError | ErrorCode::DatabaseError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::ValidationFailed => "VALIDATION_FAILED",
            ErrorCode::InvalidEmail => "INVALID_EMAIL",
            ErrorCode::PasswordTooShort => "PASSWORD_TOO_SHORT",
            ErrorCode::PasswordRequired => "PASSWORD_REQUIRED",
            ErrorCode::NicknameLengthInvalid => "NICKNAME_LENGTH_INVALID",
            ErrorCode::RefreshTokenRequired => "REFRESH_TOKEN_REQUIRED",
            ErrorCode::KakaoCodeRequired => "KAKAO_CODE_REQUIRED",
            ErrorCode::FirebaseIdTokenRequired => "FIREBASE_ID_TOKEN_REQUIRED",
            ErrorCode::ItemNameInvalid => "ITEM_NAME_INVALID",
            ErrorCode::ItemPriceMustBeNumber => "ITEM_PRICE_MUST_BE_NUMBER",
            ErrorCode::ItemPriceMustBePositive => "ITEM_PRICE_MUST_BE_POSITIVE",
            ErrorCode::ItemDescriptionInvalid => "ITEM_DESCRIPTION_INVALID",
            ErrorCode::ItemRarityInvalid => "ITEM_RARITY_INVALID",
            ErrorCode::ItemStatInvalid => "ITEM_STAT_INVALID",
            ErrorCode::ItemStockInvalid => "ITEM_STOCK_INVALID",
            ErrorCode::ItemCategoryInvalid => "ITEM_CATEGORY_INVALID",
            ErrorCode::ItemIdInvalid => "ITEM_ID_INVALID",
            ErrorCode::InvalidQueryParam => "INVALID_QUERY_PARAM",
            ErrorCode::EmptyCart => "EMPTY_CART",
            ErrorCode::AuthNoToken => "AUTH_NO_TOKEN",
            ErrorCode::AuthInvalidCredentials => "AUTH_INVALID_CREDENTIALS",
            ErrorCode::AuthTokenExpired => "AUTH_TOKEN_EXPIRED",
            ErrorCode::AuthTokenInvalid => "AUTH_TOKEN_INVALID",
            ErrorCode::AuthRefreshInvalid => "AUTH_REFRESH_INVALID",
            ErrorCode::AuthForbidden => "AUTH_FORBIDDEN",
            ErrorCode::UserNotFound => "USER_NOT_FOUND",
            ErrorCode::ItemNotFound => "ITEM_NOT_FOUND",
            ErrorCode::OrderNotFound => "ORDER_NOT_FOUND",
            ErrorCode::ResourceNotFound => "RESOURCE_NOT_FOUND",
            ErrorCode::AuthEmailExists => "AUTH_EMAIL_EXISTS",
            ErrorCode::SocialLoginFailed => "SOCIAL_LOGIN_FAILED",
            ErrorCode::UnprocessableEntity => "UNPROCESSABLE_ENTITY",
            ErrorCode::RateLimitExceeded => "RATE_LIMIT_EXCEEDED",
            ErrorCode::InternalServerError => "INTERNAL_SERVER_ERROR",
            ErrorCode::DatabaseError => "DATABASE_ERROR",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::InvalidEmail => "Invalid email format",
            ErrorCode::PasswordTooShort => "Password must be at least 6 characters",
            ErrorCode::PasswordRequired => "Password is required",
            ErrorCode::NicknameLengthInvalid => "Nickname must be 1-20 characters",
            ErrorCode::RefreshTokenRequired => "Refresh token is required",
            ErrorCode::KakaoCodeRequired => "Kakao authorization code is required",
            ErrorCode::FirebaseIdTokenRequired => "Firebase ID token is required",
            ErrorCode::ItemNameInvalid => "Item name invalid",
            ErrorCode::ItemPriceMustBeNumber => "Item price must be a number",
            ErrorCode::ItemPriceMustBePositive => "Item price must be zero or greater",
            ErrorCode::ItemDescriptionInvalid => "Item description invalid",
            ErrorCode::ItemRarityInvalid => "Item rarity invalid",
            ErrorCode::ItemStatInvalid => "Item stat invalid",
            ErrorCode::ItemStockInvalid => "Item stock invalid",
            ErrorCode::ItemCategoryInvalid => "Item category invalid",
            ErrorCode::ItemIdInvalid => "Item id invalid",
            ErrorCode::InvalidQueryParam => "Invalid query parameter",
            ErrorCode::EmptyCart => "Cart is empty",
            ErrorCode::AuthNoToken => "Authorization header missing",
            ErrorCode::AuthInvalidCredentials => "Invalid credentials",
            ErrorCode::AuthTokenExpired => "Token expired",
            ErrorCode::AuthTokenInvalid => "Invalid token",
            ErrorCode::AuthRefreshInvalid => "Invalid refresh token",
            ErrorCode::AuthForbidden => "Forbidden",
            ErrorCode::UserNotFound => "User not found",
            ErrorCode::ItemNotFound => "Item not found",
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::ResourceNotFound => "Resource not found",
            ErrorCode::AuthEmailExists => "Email already exists",
            ErrorCode::SocialLoginFailed => "Social login failed",
            ErrorCode::UnprocessableEntity => "Request could not be processed",
            ErrorCode::RateLimitExceeded => "Too many requests",
            ErrorCode::InternalServerError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned from handlers, carrying the code and optional details
#[derive(Error, Debug)]
#[error("{code}")]
pub struct ApiError {
    pub code: ErrorCode,
    pub details: Option<Value>,
}

impl ApiError {
    pub fn new(code: ErrorCode) -> Self {
        Self {
            code,
            details: None,
        }
    }

    pub fn with_details(code: ErrorCode, details: Value) -> Self {
        Self {
            code,
            details: Some(details),
        }
    }
}

impl From<ErrorCode> for ApiError {
    fn from(code: ErrorCode) -> Self {
        ApiError::new(code)
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!("Database error: {}", err);
        ApiError::new(ErrorCode::DatabaseError)
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        tracing::error!("Internal error: {:#}", err);
        ApiError::new(ErrorCode::InternalServerError)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.code.status();

        let mut payload = json!({
            "timestamp": Utc::now().to_rfc3339(),
            "status": status.as_u16(),
            "code": self.code.as_str(),
            "message": self.code.message(),
        });

        if let Some(details) = self.details {
            payload["details"] = details;
        }

        (status, Json(payload)).into_response()
    }
}

/// Type alias for handler results
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ErrorCode::EmptyCart.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ErrorCode::AuthRefreshInvalid.status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ErrorCode::AuthForbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(ErrorCode::ItemNotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::AuthEmailExists.status(), StatusCode::CONFLICT);
        assert_eq!(
            ErrorCode::SocialLoginFailed.status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ErrorCode::RateLimitExceeded.status(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            ErrorCode::DatabaseError.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_code_strings_are_screaming_snake() {
        for code in [
            ErrorCode::ValidationFailed,
            ErrorCode::AuthTokenExpired,
            ErrorCode::EmptyCart,
            ErrorCode::RateLimitExceeded,
        ] {
            let s = code.as_str();
            assert!(
                s.chars().all(|c| c.is_ascii_uppercase() || c == '_'),
                "unexpected code format: {s}"
            );
        }
    }
}
