//! Refresh-token lifecycle tests against a live Redis instance
//!
//! Run with `cargo test -- --ignored` with REDIS_URL pointing at a local
//! Redis.

use chrono::Utc;

use common::cache::{RedisConfig, RedisPool};
use shop::jwt::{JwtConfig, JwtService};
use shop::models::{Provider, Role, User};
use shop::tokens::TokenService;

fn test_user(id: i64) -> User {
    User {
        id,
        email: format!("user{id}@example.com"),
        password_hash: "unused".to_string(),
        nickname: format!("user{id}"),
        role: Role::User,
        provider: Provider::Local,
        provider_id: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

async fn token_service() -> TokenService {
    let redis_config = RedisConfig::from_env().expect("redis config");
    let redis_pool = RedisPool::new(&redis_config).await.expect("redis pool");

    let jwt = JwtService::new(JwtConfig {
        access_secret: "test-access-secret".to_string(),
        refresh_secret: "test-refresh-secret".to_string(),
        access_token_expiry: 900,
        refresh_token_expiry: 60,
    });

    TokenService::new(jwt, redis_pool)
}

#[tokio::test]
#[ignore = "requires a running Redis instance"]
async fn test_rotation_is_one_time_use() {
    let service = token_service().await;
    let user = test_user(9001);

    let pair = service.issue_pair(&user).await.unwrap();
    assert_eq!(
        service.verify_refresh(&pair.refresh_token).await.unwrap(),
        Some(user.id)
    );

    let rotated = service.rotate(&user, &pair.refresh_token).await.unwrap();

    // the old token is gone, the new one is live
    assert_eq!(service.verify_refresh(&pair.refresh_token).await.unwrap(), None);
    assert_eq!(
        service.verify_refresh(&rotated.refresh_token).await.unwrap(),
        Some(user.id)
    );

    service.revoke(user.id, &rotated.refresh_token).await.unwrap();
}

#[tokio::test]
#[ignore = "requires a running Redis instance"]
async fn test_revoke_is_idempotent() {
    let service = token_service().await;
    let user = test_user(9002);

    let pair = service.issue_pair(&user).await.unwrap();

    service.revoke(user.id, &pair.refresh_token).await.unwrap();
    // revoking an already-invalid token is a no-op, not an error
    service.revoke(user.id, &pair.refresh_token).await.unwrap();

    assert_eq!(service.verify_refresh(&pair.refresh_token).await.unwrap(), None);
}

#[tokio::test]
#[ignore = "requires a running Redis instance"]
async fn test_refresh_tokens_are_independently_revocable() {
    let service = token_service().await;
    let user = test_user(9003);

    let first = service.issue_pair(&user).await.unwrap();
    let second = service.issue_pair(&user).await.unwrap();

    service.revoke(user.id, &first.refresh_token).await.unwrap();

    assert_eq!(service.verify_refresh(&first.refresh_token).await.unwrap(), None);
    assert_eq!(
        service.verify_refresh(&second.refresh_token).await.unwrap(),
        Some(user.id)
    );

    service.revoke(user.id, &second.refresh_token).await.unwrap();
}

#[tokio::test]
#[ignore = "requires a running Redis instance"]
async fn test_unrecorded_refresh_token_is_rejected() {
    let service = token_service().await;

    // a well-signed token with no side-store record must not verify
    let orphan = service.jwt().sign_refresh_token(9004).unwrap();
    assert_eq!(service.verify_refresh(&orphan).await.unwrap(), None);
}
