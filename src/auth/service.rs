/// Auth orchestrator.
///
/// The register / login / refresh / revoke flows. Route handlers stay thin;
/// every business rule lives here or in the modules this composes.

use chrono::Utc;
use sqlx::PgPool;

use crate::auth::jwt::generate_access_token;
use crate::auth::models::{RefreshToken, User};
use crate::auth::password::{generate_salt, hash_password, verify_password};
use crate::auth::refresh_token::{
    generate_refresh_token, revoke_refresh_token, rotate_refresh_token, save_refresh_token,
};
use crate::configuration::JwtSettings;
use crate::error::{AppError, AuthError, DatabaseError};

/// The pair returned by a successful login or refresh. The full refresh-token
/// row is included so adapters can set the cookie and echo its expiry.
pub struct LoginTokens {
    pub access_token: String,
    pub refresh_token: RefreshToken,
}

/// Create a new account. The username is pre-checked for duplicates; the
/// unique index backstops the race between check and insert.
pub async fn register(pool: &PgPool, username: &str, password: &str) -> Result<User, AppError> {
    let taken = sqlx::query_scalar::<_, i64>("SELECT id FROM users WHERE username = $1")
        .bind(username)
        .fetch_optional(pool)
        .await?;
    if taken.is_some() {
        return Err(AuthError::DuplicateUsername.into());
    }

    let salt = generate_salt();
    let digest = hash_password(password, &salt)?;

    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (username, password_hash, password_salt, created_at)
        VALUES ($1, $2, $3, $4)
        RETURNING id, username, password_hash, password_salt, created_at
        "#,
    )
    .bind(username)
    .bind(&digest)
    .bind(&salt)
    .bind(Utc::now())
    .fetch_one(pool)
    .await
    .map_err(|e| match AppError::from(e) {
        AppError::Database(DatabaseError::UniqueConstraintViolation(_)) => {
            AppError::Auth(AuthError::DuplicateUsername)
        }
        other => other,
    })?;

    tracing::info!(user_id = user.id, "User registered");
    Ok(user)
}

/// Verify credentials and start a session. An unknown username and a wrong
/// password resolve to the same error so callers cannot probe for accounts.
pub async fn login(
    pool: &PgPool,
    jwt_config: &JwtSettings,
    username: &str,
    password: &str,
    ip: &str,
) -> Result<LoginTokens, AppError> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, username, password_hash, password_salt, created_at FROM users WHERE username = $1",
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;

    let user = match user {
        Some(u) if verify_password(password, &u.password_salt, &u.password_hash) => u,
        _ => return Err(AuthError::InvalidCredentials.into()),
    };

    let access_token = generate_access_token(&user, jwt_config)?;
    let token = generate_refresh_token();
    let refresh_token = save_refresh_token(pool, user.id, &token, ip).await?;

    tracing::info!(user_id = user.id, "User logged in");
    Ok(LoginTokens {
        access_token,
        refresh_token,
    })
}

/// Exchange a refresh token for a new access token, rotating it in the same
/// step. A failed exchange leaves the ledger untouched.
pub async fn refresh_access_token(
    pool: &PgPool,
    jwt_config: &JwtSettings,
    presented: Option<&str>,
    ip: &str,
) -> Result<LoginTokens, AppError> {
    let presented = presented.ok_or(AuthError::MissingToken)?;

    let (user, refresh_token) = rotate_refresh_token(pool, presented, ip).await?;
    let access_token = generate_access_token(&user, jwt_config)?;

    tracing::info!(user_id = user.id, "Access token refreshed");
    Ok(LoginTokens {
        access_token,
        refresh_token,
    })
}

/// Logout. Delegates to the ledger's idempotent revoke.
pub async fn revoke_token(pool: &PgPool, token: &str, ip: &str) -> Result<(), AppError> {
    revoke_refresh_token(pool, token, ip).await
}
