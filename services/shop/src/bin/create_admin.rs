//! One-shot admin provisioning
//!
//! Upserts the admin account named by ADMIN_EMAIL/ADMIN_PASSWORD: an
//! existing row gets its password replaced and its role promoted, a missing
//! one is created.

use anyhow::Result;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use common::database::{DatabaseConfig, init_pool};
use shop::repositories::user::hash_password;

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let email = std::env::var("ADMIN_EMAIL")
        .map_err(|_| anyhow::anyhow!("ADMIN_EMAIL environment variable not set"))?;
    let password = std::env::var("ADMIN_PASSWORD")
        .map_err(|_| anyhow::anyhow!("ADMIN_PASSWORD environment variable not set"))?;
    let nickname = std::env::var("ADMIN_NICKNAME").unwrap_or_else(|_| "admin".to_string());

    info!("Provisioning admin account for {}", email);

    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    let password_hash = hash_password(&password)?;

    sqlx::query(
        r#"
        INSERT INTO users (email, password_hash, nickname, role, provider)
        VALUES ($1, $2, $3, 'ROLE_ADMIN', 'local')
        ON CONFLICT (email)
        DO UPDATE SET password_hash = EXCLUDED.password_hash,
                      role = 'ROLE_ADMIN',
                      provider = 'local',
                      updated_at = now()
        "#,
    )
    .bind(&email)
    .bind(&password_hash)
    .bind(&nickname)
    .execute(&pool)
    .await?;

    info!("Admin account ready: {}", email);

    Ok(())
}
