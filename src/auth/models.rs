use chrono::{DateTime, Utc};

/// A registered account. Password fields are immutable after creation; there
/// is no password-change flow.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: Vec<u8>,
    pub password_salt: Vec<u8>,
    pub created_at: DateTime<Utc>,
}

/// One row in a user's refresh-token ledger. Rows are never deleted in
/// normal operation; revocation only fills in the `revoked_*` fields, and
/// rotation additionally records which token superseded this one.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RefreshToken {
    pub id: i64,
    pub user_id: i64,
    pub token: String,
    pub created_at: DateTime<Utc>,
    pub created_by_ip: String,
    pub expires_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
    pub revoked_by_ip: Option<String>,
    pub replaced_by_token: Option<String>,
}

impl RefreshToken {
    /// Not revoked and not yet expired, evaluated against `now` at call
    /// time. Never cached.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.revoked_at.is_none() && now < self.expires_at
    }
}
