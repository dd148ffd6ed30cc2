//! JWT signing and verification
//!
//! Access and refresh tokens are signed with HS256 under two independent
//! secrets, so neither kind of token can stand in for the other. Access
//! tokens are stateless: validity is signature plus expiry, nothing else.
//! Refresh-token revocation lives in the Redis side-store (see `tokens`).

use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{ApiError, ErrorCode};
use crate::models::{Role, User};

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret for signing/verifying access tokens
    pub access_secret: String,
    /// Secret for signing/verifying refresh tokens
    pub refresh_secret: String,
    /// Access token expiration in seconds (default: 15 minutes)
    pub access_token_expiry: u64,
    /// Refresh token expiration in seconds (default: 7 days)
    pub refresh_token_expiry: u64,
}

impl JwtConfig {
    /// Create a new JwtConfig from environment variables
    ///
    /// # Environment Variables
    /// - `JWT_ACCESS_SECRET`: access-token signing secret
    /// - `JWT_REFRESH_SECRET`: refresh-token signing secret
    /// - `JWT_ACCESS_TOKEN_EXPIRY`: access expiry in seconds (default: 900)
    /// - `JWT_REFRESH_TOKEN_EXPIRY`: refresh expiry in seconds (default: 604800)
    pub fn from_env() -> Self {
        let access_secret = std::env::var("JWT_ACCESS_SECRET")
            .unwrap_or_else(|_| "dev-access-secret".to_string());
        let refresh_secret = std::env::var("JWT_REFRESH_SECRET")
            .unwrap_or_else(|_| "dev-refresh-secret".to_string());

        let access_token_expiry = std::env::var("JWT_ACCESS_TOKEN_EXPIRY")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(900);

        let refresh_token_expiry = std::env::var("JWT_REFRESH_TOKEN_EXPIRY")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(604_800);

        JwtConfig {
            access_secret,
            refresh_secret,
            access_token_expiry,
            refresh_token_expiry,
        }
    }
}

/// Claims carried by an access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// User ID
    pub sub: i64,
    /// User role
    pub role: Role,
    /// Issued at time
    pub iat: u64,
    /// Expiration time
    pub exp: u64,
}

/// Claims carried by a refresh token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshClaims {
    /// User ID
    pub sub: i64,
    /// Issued at time
    pub iat: u64,
    /// Expiration time
    pub exp: u64,
}

/// Outcome of access-token verification
///
/// Verification never raises: the caller picks the user-facing error code
/// from this tri-state. Signature failures, malformed tokens, and
/// not-yet-valid tokens all fold into `Invalid`.
#[derive(Debug, Clone)]
pub enum TokenVerification {
    Valid(AccessClaims),
    Expired,
    Invalid,
}

/// JWT service
#[derive(Clone)]
pub struct JwtService {
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
    validation: Validation,
    config: JwtConfig,
}

impl JwtService {
    /// Initialize a new JWT service
    pub fn new(config: JwtConfig) -> Self {
        let access_encoding = EncodingKey::from_secret(config.access_secret.as_bytes());
        let access_decoding = DecodingKey::from_secret(config.access_secret.as_bytes());
        let refresh_encoding = EncodingKey::from_secret(config.refresh_secret.as_bytes());
        let refresh_decoding = DecodingKey::from_secret(config.refresh_secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;

        JwtService {
            access_encoding,
            access_decoding,
            refresh_encoding,
            refresh_decoding,
            validation,
            config,
        }
    }

    fn now() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }

    /// Sign an access token for a user
    pub fn sign_access_token(&self, user: &User) -> Result<String, ApiError> {
        let now = Self::now();
        let claims = AccessClaims {
            sub: user.id,
            role: user.role,
            iat: now,
            exp: now + self.config.access_token_expiry,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.access_encoding).map_err(|e| {
            tracing::error!("Failed to sign access token: {}", e);
            ApiError::new(ErrorCode::InternalServerError)
        })
    }

    /// Sign a refresh token for a user id
    pub fn sign_refresh_token(&self, user_id: i64) -> Result<String, ApiError> {
        let now = Self::now();
        let claims = RefreshClaims {
            sub: user_id,
            iat: now,
            exp: now + self.config.refresh_token_expiry,
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &self.refresh_encoding,
        )
        .map_err(|e| {
            tracing::error!("Failed to sign refresh token: {}", e);
            ApiError::new(ErrorCode::InternalServerError)
        })
    }

    /// Verify an access token and return the tri-state outcome
    pub fn verify_access_token(&self, token: &str) -> TokenVerification {
        match decode::<AccessClaims>(token, &self.access_decoding, &self.validation) {
            Ok(data) => TokenVerification::Valid(data.claims),
            Err(e) => match e.kind() {
                ErrorKind::ExpiredSignature => TokenVerification::Expired,
                _ => TokenVerification::Invalid,
            },
        }
    }

    /// Decode a refresh token; any failure (expiry, signature, format)
    /// yields `None` and is reported upstream as AUTH_REFRESH_INVALID
    pub fn decode_refresh_token(&self, token: &str) -> Option<RefreshClaims> {
        decode::<RefreshClaims>(token, &self.refresh_decoding, &self.validation)
            .map(|data| data.claims)
            .ok()
    }

    /// Access token expiry window in seconds
    pub fn access_token_expiry(&self) -> u64 {
        self.config.access_token_expiry
    }

    /// Refresh token expiry window in seconds
    pub fn refresh_token_expiry(&self) -> u64 {
        self.config.refresh_token_expiry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Provider;
    use chrono::Utc;

    fn test_config() -> JwtConfig {
        JwtConfig {
            access_secret: "test-access-secret".to_string(),
            refresh_secret: "test-refresh-secret".to_string(),
            access_token_expiry: 900,
            refresh_token_expiry: 604_800,
        }
    }

    fn test_user(id: i64, role: Role) -> User {
        User {
            id,
            email: format!("user{id}@example.com"),
            password_hash: "unused".to_string(),
            nickname: format!("user{id}"),
            role,
            provider: Provider::Local,
            provider_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_access_token_round_trip() {
        let service = JwtService::new(test_config());
        let user = test_user(42, Role::Admin);

        let token = service.sign_access_token(&user).unwrap();
        match service.verify_access_token(&token) {
            TokenVerification::Valid(claims) => {
                assert_eq!(claims.sub, 42);
                assert_eq!(claims.role, Role::Admin);
                assert!(claims.exp > claims.iat);
            }
            other => panic!("expected valid token, got {other:?}"),
        }
    }

    #[test]
    fn test_expired_access_token_reports_expired() {
        let mut config = test_config();
        config.access_token_expiry = 0;
        let service = JwtService::new(config);
        let user = test_user(1, Role::User);

        // exp == iat with zero leeway: already expired
        let token = service.sign_access_token(&user).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(1100));
        match service.verify_access_token(&token) {
            TokenVerification::Expired => {}
            other => panic!("expected expired, got {other:?}"),
        }
    }

    #[test]
    fn test_tampered_token_is_invalid() {
        let service = JwtService::new(test_config());
        let user = test_user(7, Role::User);

        let mut token = service.sign_access_token(&user).unwrap();
        token.push('x');
        match service.verify_access_token(&token) {
            TokenVerification::Invalid => {}
            other => panic!("expected invalid, got {other:?}"),
        }
    }

    #[test]
    fn test_garbage_token_is_invalid() {
        let service = JwtService::new(test_config());
        match service.verify_access_token("not-a-jwt") {
            TokenVerification::Invalid => {}
            other => panic!("expected invalid, got {other:?}"),
        }
    }

    #[test]
    fn test_refresh_token_cannot_pass_as_access_token() {
        let service = JwtService::new(test_config());

        let refresh = service.sign_refresh_token(9).unwrap();
        // signed under the refresh secret, so access verification must fail
        match service.verify_access_token(&refresh) {
            TokenVerification::Invalid => {}
            other => panic!("expected invalid, got {other:?}"),
        }
    }

    #[test]
    fn test_refresh_token_round_trip() {
        let service = JwtService::new(test_config());

        let token = service.sign_refresh_token(13).unwrap();
        let claims = service.decode_refresh_token(&token).unwrap();
        assert_eq!(claims.sub, 13);
    }

    #[test]
    fn test_access_token_is_not_a_refresh_token() {
        let service = JwtService::new(test_config());
        let user = test_user(3, Role::User);

        let access = service.sign_access_token(&user).unwrap();
        assert!(service.decode_refresh_token(&access).is_none());
    }

    #[test]
    #[serial_test::serial]
    fn test_jwt_config_from_env_defaults() {
        unsafe {
            std::env::remove_var("JWT_ACCESS_SECRET");
            std::env::remove_var("JWT_REFRESH_SECRET");
            std::env::remove_var("JWT_ACCESS_TOKEN_EXPIRY");
            std::env::remove_var("JWT_REFRESH_TOKEN_EXPIRY");
        }

        let config = JwtConfig::from_env();
        assert_eq!(config.access_secret, "dev-access-secret");
        assert_eq!(config.refresh_secret, "dev-refresh-secret");
        assert_eq!(config.access_token_expiry, 900);
        assert_eq!(config.refresh_token_expiry, 604_800);
    }
}
