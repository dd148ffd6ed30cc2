//! User repository for database operations

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::info;

use crate::error::{ApiError, ErrorCode};
use crate::models::{Provider, Role, User};
use crate::oauth::SocialProfile;

fn user_from_row(row: &PgRow) -> User {
    User {
        id: row.get("id"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        nickname: row.get("nickname"),
        role: row.get("role"),
        provider: row.get("provider"),
        provider_id: row.get("provider_id"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

/// Hash a password with argon2 and a fresh salt
pub fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| {
            tracing::error!("Failed to hash password: {}", e);
            ApiError::new(ErrorCode::InternalServerError)
        })?
        .to_string();
    Ok(hash)
}

/// User repository
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a local account; a taken email maps to AUTH_EMAIL_EXISTS
    pub async fn create_local(
        &self,
        email: &str,
        password: &str,
        nickname: &str,
    ) -> Result<User, ApiError> {
        info!("Creating local user: {}", email);

        let password_hash = hash_password(password)?;

        let row = sqlx::query(
            r#"
            INSERT INTO users (email, password_hash, nickname, role, provider)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, email, password_hash, nickname, role, provider, provider_id,
                      created_at, updated_at
            "#,
        )
        .bind(email)
        .bind(&password_hash)
        .bind(nickname)
        .bind(Role::User)
        .bind(Provider::Local)
        .fetch_one(&self.pool)
        .await
        .map_err(Self::map_unique_email)?;

        Ok(user_from_row(&row))
    }

    /// Find a user by email
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        let row = sqlx::query(
            r#"
            SELECT id, email, password_hash, nickname, role, provider, provider_id,
                   created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| user_from_row(&row)))
    }

    /// Find a user by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<User>, ApiError> {
        let row = sqlx::query(
            r#"
            SELECT id, email, password_hash, nickname, role, provider, provider_id,
                   created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| user_from_row(&row)))
    }

    /// Find a user by (provider, provider id)
    pub async fn find_by_provider(
        &self,
        provider: Provider,
        provider_id: &str,
    ) -> Result<Option<User>, ApiError> {
        let row = sqlx::query(
            r#"
            SELECT id, email, password_hash, nickname, role, provider, provider_id,
                   created_at, updated_at
            FROM users
            WHERE provider = $1 AND provider_id = $2
            "#,
        )
        .bind(provider)
        .bind(provider_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| user_from_row(&row)))
    }

    /// Map a verified social identity to a local user, creating the account
    /// on first login
    ///
    /// Social accounts store a hash of a dummy secret so the password
    /// column stays non-null without ever matching a login attempt.
    pub async fn find_or_create_social(
        &self,
        profile: &SocialProfile,
    ) -> Result<User, ApiError> {
        if let Some(user) = self
            .find_by_provider(profile.provider, &profile.provider_id)
            .await?
        {
            return Ok(user);
        }

        info!(
            "Creating {} user for provider id {}",
            profile.provider.as_str(),
            profile.provider_id
        );

        let dummy_secret = format!(
            "{}_{}_dummy",
            profile.provider.as_str(),
            profile.provider_id
        );
        let password_hash = hash_password(&dummy_secret)?;

        let row = sqlx::query(
            r#"
            INSERT INTO users (email, password_hash, nickname, role, provider, provider_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, email, password_hash, nickname, role, provider, provider_id,
                      created_at, updated_at
            "#,
        )
        .bind(&profile.email)
        .bind(&password_hash)
        .bind(&profile.nickname)
        .bind(Role::User)
        .bind(profile.provider)
        .bind(&profile.provider_id)
        .fetch_one(&self.pool)
        .await
        .map_err(Self::map_unique_email)?;

        Ok(user_from_row(&row))
    }

    /// Verify a user's password against the stored hash
    pub fn verify_password(&self, user: &User, password: &str) -> Result<bool, ApiError> {
        let parsed_hash = PasswordHash::new(&user.password_hash).map_err(|e| {
            tracing::error!("Failed to parse password hash: {}", e);
            ApiError::new(ErrorCode::InternalServerError)
        })?;

        let argon2 = Argon2::default();
        Ok(argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    fn map_unique_email(err: sqlx::Error) -> ApiError {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.constraint() == Some("users_email_key") {
                return ApiError::new(ErrorCode::AuthEmailExists);
            }
        }
        err.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_password() {
        let hash = hash_password("correct horse").unwrap();
        assert_ne!(hash, "correct horse");

        let parsed = PasswordHash::new(&hash).unwrap();
        let argon2 = Argon2::default();
        assert!(argon2.verify_password(b"correct horse", &parsed).is_ok());
        assert!(argon2.verify_password(b"wrong horse", &parsed).is_err());
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("same-input").unwrap();
        let b = hash_password("same-input").unwrap();
        assert_ne!(a, b);
    }
}
