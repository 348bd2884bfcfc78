/// Authentication endpoints.
///
/// Thin adapters over `auth::service`: deserialize the payload, resolve the
/// client address and the refresh-token cookie, delegate, serialize. The
/// refresh token travels in an HttpOnly cookie; the access token in the body.

use actix_web::cookie::{time::Duration as CookieDuration, Cookie, SameSite};
use actix_web::{web, HttpRequest, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::auth::service::{self, LoginTokens};
use crate::auth::{Claims, REFRESH_TOKEN_TTL_DAYS};
use crate::configuration::JwtSettings;
use crate::error::{AppError, ValidationError};
use crate::validators::is_valid_username;

pub const REFRESH_TOKEN_COOKIE: &str = "refreshToken";

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct RevokeTokenRequest {
    pub token: Option<String>,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Access token plus the rotated refresh token; `expires` is the refresh
/// token's expiry.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub token: String,
    pub refresh_token: String,
    pub expires: DateTime<Utc>,
}

#[derive(Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
}

fn client_ip(req: &HttpRequest) -> String {
    req.peer_addr()
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn refresh_token_cookie(token: String) -> Cookie<'static> {
    Cookie::build(REFRESH_TOKEN_COOKIE, token)
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::None)
        .max_age(CookieDuration::days(REFRESH_TOKEN_TTL_DAYS))
        .finish()
}

fn token_response(tokens: LoginTokens) -> HttpResponse {
    let cookie = refresh_token_cookie(tokens.refresh_token.token.clone());
    HttpResponse::Ok().cookie(cookie).json(TokenResponse {
        token: tokens.access_token,
        refresh_token: tokens.refresh_token.token,
        expires: tokens.refresh_token.expires_at,
    })
}

/// POST /auth/register
pub async fn register(
    form: web::Json<RegisterRequest>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    let username = is_valid_username(&form.username)?;

    service::register(pool.get_ref(), &username, &form.password).await?;

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Registration successful".to_string(),
    }))
}

/// POST /auth/login
pub async fn login(
    req: HttpRequest,
    form: web::Json<LoginRequest>,
    pool: web::Data<PgPool>,
    jwt_config: web::Data<JwtSettings>,
) -> Result<HttpResponse, AppError> {
    let tokens = service::login(
        pool.get_ref(),
        jwt_config.get_ref(),
        &form.username,
        &form.password,
        &client_ip(&req),
    )
    .await?;

    Ok(token_response(tokens))
}

/// POST /auth/refresh-token
///
/// Reads the refresh token from the cookie; the rotated replacement goes
/// back out the same way.
pub async fn refresh_token(
    req: HttpRequest,
    pool: web::Data<PgPool>,
    jwt_config: web::Data<JwtSettings>,
) -> Result<HttpResponse, AppError> {
    let presented = req
        .cookie(REFRESH_TOKEN_COOKIE)
        .map(|c| c.value().to_string());

    let tokens = service::refresh_access_token(
        pool.get_ref(),
        jwt_config.get_ref(),
        presented.as_deref(),
        &client_ip(&req),
    )
    .await?;

    Ok(token_response(tokens))
}

/// POST /auth/revoke-token
///
/// Takes the token from the body, falling back to the cookie. Revoking an
/// unknown or already-revoked token still reports success.
pub async fn revoke_token(
    req: HttpRequest,
    body: Option<web::Json<RevokeTokenRequest>>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    let token = body
        .and_then(|b| b.into_inner().token)
        .or_else(|| {
            req.cookie(REFRESH_TOKEN_COOKIE)
                .map(|c| c.value().to_string())
        })
        .ok_or(ValidationError::EmptyField("token"))?;

    service::revoke_token(pool.get_ref(), &token, &client_ip(&req)).await?;

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Token revoked".to_string(),
    }))
}

/// GET /auth/me (requires a valid access token)
pub async fn me(
    claims: web::ReqData<Claims>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    let user_id = claims.user_id()?;

    let row = sqlx::query_as::<_, (i64, String)>("SELECT id, username FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_one(pool.get_ref())
        .await?;

    Ok(HttpResponse::Ok().json(UserResponse {
        id: row.0,
        username: row.1,
    }))
}
