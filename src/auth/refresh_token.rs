/// Refresh-token ledger.
///
/// Issues opaque high-entropy tokens, records revocations and performs the
/// rotation (revoke old, issue successor) inside a single transaction. Rows
/// are append-only apart from the revocation fields; the unique index on the
/// token string makes every lookup an exact indexed match.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::{Duration, Utc};
use rand::{thread_rng, Rng};
use sqlx::PgPool;

use crate::auth::models::{RefreshToken, User};
use crate::error::{AppError, AuthError};

pub const REFRESH_TOKEN_TTL_DAYS: i64 = 7;

const TOKEN_BYTES: usize = 64;

/// Generate a new opaque refresh token: 64 random bytes, base64-encoded.
pub fn generate_refresh_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    thread_rng().fill(&mut bytes[..]);
    BASE64.encode(bytes)
}

/// Append a token to the owning user's ledger. Generic over the executor so
/// rotation can run it inside its transaction.
pub async fn save_refresh_token<'e, E>(
    executor: E,
    user_id: i64,
    token: &str,
    ip: &str,
) -> Result<RefreshToken, AppError>
where
    E: sqlx::Executor<'e, Database = sqlx::Postgres>,
{
    let now = Utc::now();

    let row = sqlx::query_as::<_, RefreshToken>(
        r#"
        INSERT INTO refresh_tokens
            (user_id, token, created_at, created_by_ip, expires_at)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, user_id, token, created_at, created_by_ip, expires_at,
                  revoked_at, revoked_by_ip, replaced_by_token
        "#,
    )
    .bind(user_id)
    .bind(token)
    .bind(now)
    .bind(ip)
    .bind(now + Duration::days(REFRESH_TOKEN_TTL_DAYS))
    .fetch_one(executor)
    .await?;

    Ok(row)
}

/// Revoke a token. Idempotent: an unknown or already-inactive token affects
/// zero rows and still returns Ok, so logout never fails.
pub async fn revoke_refresh_token(pool: &PgPool, token: &str, ip: &str) -> Result<(), AppError> {
    let now = Utc::now();

    let result = sqlx::query(
        r#"
        UPDATE refresh_tokens
        SET revoked_at = $1, revoked_by_ip = $2
        WHERE token = $3 AND revoked_at IS NULL AND expires_at > $1
        "#,
    )
    .bind(now)
    .bind(ip)
    .bind(token)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        tracing::debug!("Revoke requested for unknown or inactive refresh token");
    }

    Ok(())
}

/// Rotate a refresh token: revoke the presented one and issue its successor
/// for the same user, atomically. The presented row is locked for the length
/// of the transaction, so concurrent rotations of the same token serialize;
/// the loser finds it revoked and fails.
///
/// Fails with `InvalidToken` when no user owns the token and `InactiveToken`
/// when it is expired or already revoked (replay of a rotated token). On
/// failure nothing is written.
pub async fn rotate_refresh_token(
    pool: &PgPool,
    old_token: &str,
    ip: &str,
) -> Result<(User, RefreshToken), AppError> {
    let mut tx = pool.begin().await?;

    let old = sqlx::query_as::<_, RefreshToken>(
        r#"
        SELECT id, user_id, token, created_at, created_by_ip, expires_at,
               revoked_at, revoked_by_ip, replaced_by_token
        FROM refresh_tokens
        WHERE token = $1
        FOR UPDATE
        "#,
    )
    .bind(old_token)
    .fetch_optional(&mut tx)
    .await?
    .ok_or(AppError::Auth(AuthError::InvalidToken))?;

    if !old.is_active(Utc::now()) {
        tracing::warn!(user_id = old.user_id, "Rotation attempted with inactive refresh token");
        return Err(AppError::Auth(AuthError::InactiveToken));
    }

    let user = sqlx::query_as::<_, User>(
        "SELECT id, username, password_hash, password_salt, created_at FROM users WHERE id = $1",
    )
    .bind(old.user_id)
    .fetch_one(&mut tx)
    .await?;

    let new_token = generate_refresh_token();
    let successor = save_refresh_token(&mut tx, user.id, &new_token, ip).await?;

    sqlx::query(
        r#"
        UPDATE refresh_tokens
        SET revoked_at = $1, revoked_by_ip = $2, replaced_by_token = $3
        WHERE id = $4
        "#,
    )
    .bind(Utc::now())
    .bind(ip)
    .bind(&successor.token)
    .bind(old.id)
    .execute(&mut tx)
    .await?;

    tx.commit().await?;

    Ok((user, successor))
}

/// Look up the user owning a refresh token. Exact match against the unique
/// token index.
pub async fn find_user_by_token(pool: &PgPool, token: &str) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT u.id, u.username, u.password_hash, u.password_salt, u.created_at
        FROM users u
        JOIN refresh_tokens t ON t.user_id = u.id
        WHERE t.token = $1
        "#,
    )
    .bind(token)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}
