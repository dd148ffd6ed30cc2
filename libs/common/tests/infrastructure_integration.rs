//! Integration tests for the infrastructure components
//!
//! These tests verify that the PostgreSQL database and Redis side-store are
//! properly configured and reachable. They need live services, so they are
//! ignored by default; run with `cargo test -- --ignored` against a local
//! Postgres/Redis.

use common::{
    cache::{RedisConfig, RedisPool},
    database::{DatabaseConfig, health_check, init_pool},
};
use sqlx::Row;

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_database_connectivity() -> Result<(), Box<dyn std::error::Error>> {
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    assert!(health_check(&pool).await?, "Database health check failed");

    let row = sqlx::query("SELECT 1 as result").fetch_one(&pool).await?;
    let result: i32 = row.get("result");
    assert_eq!(result, 1);

    Ok(())
}

#[tokio::test]
#[ignore = "requires a running Redis instance"]
async fn test_redis_set_get_delete() -> Result<(), Box<dyn std::error::Error>> {
    let redis_config = RedisConfig::from_env()?;
    let redis_pool = RedisPool::new(&redis_config).await?;

    assert!(redis_pool.health_check().await?, "Redis health check failed");

    let test_key = "infra_test_key";
    let test_value = "infra_test_value";

    redis_pool.set(test_key, test_value, Some(10)).await?;
    assert_eq!(
        redis_pool.get(test_key).await?,
        Some(test_value.to_string())
    );

    redis_pool.delete(test_key).await?;
    assert_eq!(redis_pool.get(test_key).await?, None);

    // deleting again must not error
    redis_pool.delete(test_key).await?;

    Ok(())
}
