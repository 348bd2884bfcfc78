/// Authentication core
///
/// Credential verification, access-token issuance and the refresh-token
/// lifecycle (issue, rotate, revoke). Route handlers stay thin and delegate
/// to `service`.

mod claims;
mod jwt;
mod models;
mod password;
mod refresh_token;
pub mod service;

pub use claims::Claims;
pub use jwt::generate_access_token;
pub use jwt::validate_access_token;
pub use models::{RefreshToken, User};
pub use password::{generate_salt, hash_password, verify_password};
pub use refresh_token::{
    find_user_by_token, generate_refresh_token, revoke_refresh_token, rotate_refresh_token,
    save_refresh_token, REFRESH_TOKEN_TTL_DAYS,
};
