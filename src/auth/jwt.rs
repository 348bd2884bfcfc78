/// Access-token signing and validation.
///
/// Tokens are signed with HS256 using the configured shared secret and carry
/// subject, username, a per-issuance jti, issuer, audience and expiry.
/// Signing is pure and synchronous; it reads nothing but configuration.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::auth::claims::Claims;
use crate::auth::models::User;
use crate::configuration::JwtSettings;
use crate::error::AppError;

pub fn generate_access_token(user: &User, config: &JwtSettings) -> Result<String, AppError> {
    let claims = Claims::new(
        user.id,
        user.username.clone(),
        config.expire_minutes,
        config.issuer.clone(),
        config.audience.clone(),
    );

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))
}

/// Validate signature, lifetime, issuer and audience, returning the claims.
pub fn validate_access_token(token: &str, config: &JwtSettings) -> Result<Claims, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[&config.issuer]);
    validation.set_audience(&[&config.audience]);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| {
        tracing::warn!("JWT validation error: {}", e);
        AppError::Internal("Invalid or expired token".to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn get_test_config() -> JwtSettings {
        JwtSettings {
            secret: "test-secret-key-at-least-32-characters-long".to_string(),
            issuer: "taskboard-api".to_string(),
            audience: "taskboard-client".to_string(),
            expire_minutes: 30,
        }
    }

    fn test_user() -> User {
        User {
            id: 7,
            username: "alice".to_string(),
            password_hash: Vec::new(),
            password_salt: Vec::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn generate_and_validate_token() {
        let config = get_test_config();
        let user = test_user();

        let token = generate_access_token(&user, &config).expect("Failed to generate token");
        let claims = validate_access_token(&token, &config).expect("Failed to validate token");

        assert_eq!(claims.sub, "7");
        assert_eq!(claims.name, "alice");
        assert_eq!(claims.iss, "taskboard-api");
        assert_eq!(claims.aud, "taskboard-client");
    }

    #[test]
    fn garbage_token_is_rejected() {
        let config = get_test_config();
        assert!(validate_access_token("invalid.token.here", &config).is_err());
    }

    #[test]
    fn tampered_token_is_rejected() {
        let config = get_test_config();
        let token = generate_access_token(&test_user(), &config).expect("Failed to generate token");

        let tampered = format!("{}X", token);
        assert!(validate_access_token(&tampered, &config).is_err());
    }

    #[test]
    fn wrong_issuer_is_rejected() {
        let mut config = get_test_config();
        let token = generate_access_token(&test_user(), &config).expect("Failed to generate token");

        config.issuer = "someone-else".to_string();
        assert!(validate_access_token(&token, &config).is_err());
    }

    #[test]
    fn wrong_audience_is_rejected() {
        let mut config = get_test_config();
        let token = generate_access_token(&test_user(), &config).expect("Failed to generate token");

        config.audience = "someone-else".to_string();
        assert!(validate_access_token(&token, &config).is_err());
    }

    #[test]
    fn two_tokens_for_the_same_user_differ() {
        let config = get_test_config();
        let user = test_user();

        let first = generate_access_token(&user, &config).expect("Failed to generate token");
        let second = generate_access_token(&user, &config).expect("Failed to generate token");

        // jti is fresh per issuance
        assert_ne!(first, second);
    }
}
