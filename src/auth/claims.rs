/// JWT claims for access tokens (RFC 7519).

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,
    /// Username
    pub name: String,
    /// Unique token identifier, fresh per issuance
    pub jti: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Issuer
    pub iss: String,
    /// Audience
    pub aud: String,
}

impl Claims {
    pub fn new(
        user_id: i64,
        username: String,
        expire_minutes: i64,
        issuer: String,
        audience: String,
    ) -> Self {
        let now = chrono::Utc::now().timestamp();
        Self {
            sub: user_id.to_string(),
            name: username,
            jti: Uuid::new_v4().to_string(),
            exp: now + expire_minutes * 60,
            iat: now,
            iss: issuer,
            aud: audience,
        }
    }

    /// Extract the numeric user id from the subject claim.
    pub fn user_id(&self) -> Result<i64, AppError> {
        self.sub
            .parse::<i64>()
            .map_err(|_| AppError::Internal("Invalid user id in token".to_string()))
    }
}
