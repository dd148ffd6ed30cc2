//! Token pair issuance, rotation, and revocation
//!
//! This bridges the stateless JWT layer to the Redis side-store. A refresh
//! token is usable only while its record `refresh:{user_id}:{token}` exists;
//! the record carries a TTL equal to the token's validity window, so Redis
//! expiry and JWT expiry track each other. Records are per exact token:
//! two refresh tokens for the same user are independently revocable.

use serde::Serialize;
use tracing::info;

use common::cache::RedisPool;

use crate::error::ApiError;
use crate::jwt::JwtService;
use crate::models::User;

/// An access/refresh token pair
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

fn refresh_key(user_id: i64, token: &str) -> String {
    format!("refresh:{}:{}", user_id, token)
}

/// Token lifecycle service
#[derive(Clone)]
pub struct TokenService {
    jwt: JwtService,
    redis: RedisPool,
}

impl TokenService {
    pub fn new(jwt: JwtService, redis: RedisPool) -> Self {
        Self { jwt, redis }
    }

    /// Issue a fresh token pair for a user and record the refresh token
    /// as valid in the side-store
    ///
    /// Side-store unavailability is a hard failure: without the record the
    /// refresh token would never be accepted, so there is nothing useful to
    /// hand back.
    pub async fn issue_pair(&self, user: &User) -> Result<TokenPair, ApiError> {
        let access_token = self.jwt.sign_access_token(user)?;
        let refresh_token = self.jwt.sign_refresh_token(user.id)?;

        self.redis
            .set(
                &refresh_key(user.id, &refresh_token),
                "1",
                Some(self.jwt.refresh_token_expiry()),
            )
            .await?;

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    /// Check whether a refresh token is currently recorded as valid
    pub async fn is_refresh_valid(&self, user_id: i64, token: &str) -> Result<bool, ApiError> {
        let record = self.redis.get(&refresh_key(user_id, token)).await?;
        Ok(record.is_some())
    }

    /// Rotate a refresh token: invalidate the old one, issue a new pair
    ///
    /// The old record is deleted before the new pair is issued, so an
    /// interruption partway leaves the old token already unusable
    /// (fail-closed). The caller must have verified the old token's
    /// signature and side-store record beforehand.
    pub async fn rotate(&self, user: &User, old_token: &str) -> Result<TokenPair, ApiError> {
        self.redis.delete(&refresh_key(user.id, old_token)).await?;

        info!("Rotated refresh token for user {}", user.id);
        self.issue_pair(user).await
    }

    /// Revoke a specific refresh token; revoking an already-invalid token
    /// is a no-op, not an error
    pub async fn revoke(&self, user_id: i64, token: &str) -> Result<(), ApiError> {
        self.redis.delete(&refresh_key(user_id, token)).await?;
        info!("Revoked refresh token for user {}", user_id);
        Ok(())
    }

    /// Resolve the user id a refresh token claims to belong to, if both the
    /// signature verifies and the side-store record is present
    pub async fn verify_refresh(&self, token: &str) -> Result<Option<i64>, ApiError> {
        let Some(claims) = self.jwt.decode_refresh_token(token) else {
            return Ok(None);
        };

        if self.is_refresh_valid(claims.sub, token).await? {
            Ok(Some(claims.sub))
        } else {
            Ok(None)
        }
    }

    pub fn jwt(&self) -> &JwtService {
        &self.jwt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refresh_key_scopes_user_and_token() {
        let k1 = refresh_key(1, "tok-a");
        let k2 = refresh_key(1, "tok-b");
        let k3 = refresh_key(2, "tok-a");

        assert_eq!(k1, "refresh:1:tok-a");
        assert_ne!(k1, k2, "tokens for one user must be independent");
        assert_ne!(k1, k3, "tokens are scoped per user");
    }
}
